//! Harness synthesis and entry-point discovery.
//!
//! The harness wraps the user's source, invokes the entry point once per
//! test case, and prints one protocol line per case:
//!
//! ```text
//! CASE <i> PASS <actual>
//! CASE <i> FAIL <actual>
//! CASE <i> ERROR <message>
//! ```
//!
//! The harness's own PASS/FAIL verdict is a naive trimmed comparison; the
//! engine recomputes `passed` from the parsed `actual` using the
//! normalization rules, so the protocol verdict is advisory.

use regex::Regex;

use scales_domain::error::{Error, Result};
use scales_domain::types::Language;
use scales_problems::TestCase;

use crate::literal;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Entry-point discovery
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Candidate entry-point names for a problem id, in trial order:
/// snake_case, camelCase, then the generic `solve`.
pub fn entry_candidates(problem_id: &str) -> Vec<String> {
    let segments: Vec<String> = problem_id
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect();

    let mut candidates = Vec::new();
    if !segments.is_empty() {
        candidates.push(segments.join("_"));
        let mut camel = segments[0].clone();
        for segment in &segments[1..] {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                camel.push(first.to_ascii_uppercase());
                camel.push_str(chars.as_str());
            }
        }
        if !candidates.contains(&camel) {
            candidates.push(camel);
        }
    }
    if !candidates.iter().any(|c| c == "solve") {
        candidates.push("solve".to_string());
    }
    candidates
}

/// Find the first candidate the source actually defines, by a static scan
/// for a definition site.  `EntryPointMissing` when none match.
pub fn find_entry_point(language: Language, source: &str, problem_id: &str) -> Result<String> {
    let candidates = entry_candidates(problem_id);
    for candidate in &candidates {
        if defines(language, source, candidate)? {
            return Ok(candidate.clone());
        }
    }
    Err(Error::EntryPointMissing(candidates.join(", ")))
}

fn defines(language: Language, source: &str, name: &str) -> Result<bool> {
    let name = regex::escape(name);
    let pattern = match language {
        Language::Go => format!(r"(?m)^\s*func\s+{name}\s*\("),
        Language::Python => format!(r"(?m)^\s*def\s+{name}\s*\("),
        Language::Javascript => {
            format!(r"(?m)^\s*(?:function\s+{name}\s*\(|(?:const|let|var)\s+{name}\s*=)")
        }
    };
    let re = Regex::new(&pattern).map_err(|e| Error::Other(format!("entry scan: {e}")))?;
    Ok(re.is_match(source))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Python
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const PYTHON_DRIVER: &str = r#"import json
import os
import sys

sys.path.insert(0, os.path.dirname(os.path.abspath(__file__)))
import solution


def _fmt(value):
    if isinstance(value, str):
        return value
    return json.dumps(value, separators=(",", ":"), default=str)


def _case(i, expected, thunk):
    try:
        actual = _fmt(thunk())
        verdict = "PASS" if actual.strip() == expected.strip() else "FAIL"
        print("CASE %d %s %s" % (i, verdict, actual))
    except Exception as exc:
        print("CASE %d ERROR %s" % (i, str(exc).replace("\n", " ")))


"#;

/// A `harness.py` that imports the sibling `solution.py`.
pub fn python_harness(entry: &str, cases: &[TestCase]) -> String {
    let mut out = String::from(PYTHON_DRIVER);
    for (i, case) in cases.iter().enumerate() {
        let args: Vec<String> = literal::parse_arguments(&case.input)
            .iter()
            .map(literal::python_literal)
            .collect();
        out.push_str(&format!(
            "_case({i}, {expected}, lambda: solution.{entry}({args}))\n",
            expected = quoted(&case.expected),
            args = args.join(", "),
        ));
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JavaScript
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const JS_DRIVER: &str = r#"

function __fmt(value) {
  if (typeof value === "string") { return value; }
  if (value === undefined) { return "null"; }
  return JSON.stringify(value);
}

function __case(i, expected, thunk) {
  try {
    var actual = __fmt(thunk());
    var verdict = actual.trim() === expected.trim() ? "PASS" : "FAIL";
    console.log("CASE " + i + " " + verdict + " " + actual);
  } catch (err) {
    var message = err && err.message ? err.message : String(err);
    console.log("CASE " + i + " ERROR " + message.replace(/\n/g, " "));
  }
}

"#;

/// A single `main.js` concatenating the user source with the driver.
pub fn javascript_harness(source: &str, entry: &str, cases: &[TestCase]) -> String {
    let mut out = String::new();
    out.push_str(source);
    out.push_str(JS_DRIVER);
    for (i, case) in cases.iter().enumerate() {
        let args: Vec<String> = literal::parse_arguments(&case.input)
            .iter()
            .map(literal::javascript_literal)
            .collect();
        out.push_str(&format!(
            "__case({i}, {expected}, function () {{ return {entry}({args}); }});\n",
            expected = quoted(&case.expected),
            args = args.join(", "),
        ));
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Go
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const GO_DRIVER: &str = r#"package main

import (
	"encoding/json"
	"fmt"
	"strings"
)

func __fmt(v interface{}) string {
	if s, ok := v.(string); ok {
		return s
	}
	b, err := json.Marshal(v)
	if err != nil {
		return fmt.Sprintf("%v", v)
	}
	return string(b)
}

func __case(i int, expected string, f func() string) {
	defer func() {
		if r := recover(); r != nil {
			fmt.Printf("CASE %d ERROR %v\n", i, r)
		}
	}()
	actual := f()
	verdict := "FAIL"
	if strings.TrimSpace(actual) == strings.TrimSpace(expected) {
		verdict = "PASS"
	}
	fmt.Printf("CASE %d %s %s\n", i, verdict, actual)
}

func main() {
"#;

/// A `harness.go` compiled next to the user's `solution.go` (both in
/// package main).  Each case runs behind `recover` so one panic cannot
/// swallow the remaining cases.
pub fn go_harness(entry: &str, cases: &[TestCase]) -> String {
    let mut out = String::from(GO_DRIVER);
    for (i, case) in cases.iter().enumerate() {
        let rendered: std::result::Result<Vec<String>, String> =
            literal::parse_arguments(&case.input)
                .iter()
                .map(|fragment| literal::go_literal(fragment).map(|e| e.expr))
                .collect();
        match rendered {
            Ok(args) => out.push_str(&format!(
                "\t__case({i}, {expected}, func() string {{ return __fmt({entry}({args})) }})\n",
                expected = quoted(&case.expected),
                args = args.join(", "),
            )),
            Err(reason) => out.push_str(&format!(
                "\tfmt.Println({msg})\n",
                msg = quoted(&format!("CASE {i} ERROR {reason}")),
            )),
        }
    }
    out.push_str("}\n");
    out
}

/// Quote a string for embedding in any of the three harness languages.
/// JSON string syntax is valid in Go, Python, and JavaScript alike.
fn quoted(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
