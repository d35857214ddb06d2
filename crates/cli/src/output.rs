//! Editor-integration wire format.
//!
//! Under `VIM_MODE=1` every command prints exactly one JSON object to
//! stdout; logs go to stderr.  Without it, commands print plain text.

use serde_json::json;

use scales_domain::types::{scale_for, Language};
use scales_problems::Problem;
use scales_runner::RunOutcome;
use scales_sessions::{Hint, Session};

pub fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

/// The problem payload emitted when a session starts.
pub fn problem_payload(session: &Session) -> serde_json::Value {
    let problem = session.problem();
    let language = session.language();
    let scale = problem.patterns.first().and_then(|p| scale_for(p));
    json!({
        "id": problem.id,
        "title": problem.title,
        "difficulty": problem.difficulty,
        "description": problem.description,
        "starter_code": problem.starter_for(language).unwrap_or_default(),
        "language": language,
        "patterns": problem.patterns,
        "scale": scale.map(|(name, _)| name),
        "scale_desc": scale.map(|(_, desc)| desc),
        "workspace_path": session.workspace_dir().display().to_string(),
        "session_id": session.id(),
    })
}

/// The test-results payload.
pub fn results_payload(outcome: &RunOutcome) -> serde_json::Value {
    json!({
        "passed": outcome.all_passed,
        "test_results": outcome
            .results
            .iter()
            .map(|r| {
                json!({
                    "input": r.input,
                    "expected": r.expected,
                    "actual": r.actual,
                    "passed": r.passed,
                    "error": r.error,
                })
            })
            .collect::<Vec<_>>(),
    })
}

/// The hint payload: progressive levels 1..=3.
pub fn hint_payload(hint: &Hint, language: Language) -> serde_json::Value {
    json!({
        "level": hint.level,
        "hint": hint.pattern_explanation,
        "walkthrough": hint.walkthrough,
        "solution": hint.solution,
        "language": hint.solution.as_ref().map(|_| language),
    })
}

pub fn error_payload(message: &str) -> serde_json::Value {
    json!({ "error": message })
}

/// Plain-text summary of a finished run for non-editor use.
pub fn print_results_text(problem: &Problem, outcome: &RunOutcome) {
    let passed = outcome.results.iter().filter(|r| r.passed).count();
    println!(
        "{}: {}/{} test cases passed",
        problem.id,
        passed,
        outcome.results.len()
    );
    for (i, result) in outcome.results.iter().enumerate() {
        let mark = if result.passed { "ok" } else { "FAIL" };
        match &result.error {
            Some(error) => println!("  case {i}: {mark} ({error})"),
            None => println!("  case {i}: {mark} expected {} got {}", result.expected, result.actual),
        }
    }
}
