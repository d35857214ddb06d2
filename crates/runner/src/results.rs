//! Protocol-line parsing and per-case verdicts.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use scales_domain::error::{Error, Result};
use scales_problems::Problem;

use crate::exec::{CommandOutput, ExitKind};
use crate::normalize::outputs_match;
use crate::{RunOutcome, TestResult};

fn case_line() -> &'static Regex {
    static CASE_LINE: OnceLock<Regex> = OnceLock::new();
    CASE_LINE.get_or_init(|| {
        Regex::new(r"^CASE\s+(\d+)\s+(PASS|FAIL|ERROR)(?:\s(.*))?$").expect("static case pattern")
    })
}

enum Parsed {
    Output(String),
    Error(String),
}

/// Turn a harness run's combined output into ordered `TestResult`s.
///
/// Cases the subprocess never reported are marked `Timeout` when the run
/// was killed by the deadline, and otherwise carry the tail of the
/// diagnostic (non-protocol) output, typically a compile or import error.
pub fn collect_results(problem: &Problem, output: &CommandOutput) -> Result<RunOutcome> {
    if output.exit == ExitKind::Cancelled {
        return Err(Error::Cancelled);
    }

    let mut parsed: HashMap<usize, Parsed> = HashMap::new();
    let mut diagnostics: Vec<&str> = Vec::new();
    for line in &output.lines {
        match case_line().captures(line) {
            Some(caps) => {
                let index: usize = match caps[1].parse() {
                    Ok(i) => i,
                    Err(_) => continue,
                };
                let payload = caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string();
                let entry = match &caps[2] {
                    "ERROR" => Parsed::Error(payload),
                    _ => Parsed::Output(payload),
                };
                parsed.insert(index, entry);
            }
            None => diagnostics.push(line),
        }
    }

    let mut results = Vec::with_capacity(problem.test_cases.len());
    for (i, case) in problem.test_cases.iter().enumerate() {
        let result = match parsed.remove(&i) {
            Some(Parsed::Output(actual)) => {
                let passed = outputs_match(&case.expected, &actual);
                TestResult {
                    input: case.input.clone(),
                    expected: case.expected.clone(),
                    actual,
                    passed,
                    error: None,
                }
            }
            Some(Parsed::Error(message)) => TestResult {
                input: case.input.clone(),
                expected: case.expected.clone(),
                actual: String::new(),
                passed: false,
                error: Some(message),
            },
            None => TestResult {
                input: case.input.clone(),
                expected: case.expected.clone(),
                actual: String::new(),
                passed: false,
                error: Some(unreported_reason(output, &diagnostics)),
            },
        };
        results.push(result);
    }

    let all_passed = !results.is_empty() && results.iter().all(|r| r.passed);
    Ok(RunOutcome { results, all_passed })
}

/// An outcome where every declared case passed, used by the self-test
/// sentinel path where no per-case output exists.
pub fn all_passed_outcome(problem: &Problem) -> RunOutcome {
    let results = problem
        .test_cases
        .iter()
        .map(|case| TestResult {
            input: case.input.clone(),
            expected: case.expected.clone(),
            actual: case.expected.clone(),
            passed: true,
            error: None,
        })
        .collect();
    RunOutcome {
        results,
        all_passed: true,
    }
}

fn unreported_reason(output: &CommandOutput, diagnostics: &[&str]) -> String {
    match output.exit {
        ExitKind::TimedOut => "Timeout".to_string(),
        _ => {
            // Keep the last few diagnostic lines; compile errors end with
            // the useful part.
            let tail: Vec<&str> = diagnostics.iter().rev().take(5).rev().copied().collect();
            if tail.is_empty() {
                "no output for this test case".to_string()
            } else {
                tail.join(" | ")
            }
        }
    }
}
