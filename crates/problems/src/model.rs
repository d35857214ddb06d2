//! Problem definitions as persisted on disk.
//!
//! One JSON file per (pattern, problem) pair; a problem tagged with several
//! patterns appears once under each pattern directory.  Canonical identity
//! is the `id` field, never the file path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use scales_domain::types::{is_known_pattern, Difficulty, Language};

/// A worked example shown in the problem description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One declarative test case.  Inputs and expected outputs are plain
/// strings; the execution engine owns their interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected: String,
}

/// An immutable problem definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    /// Ordered pattern tags.  Unknown tags are tolerated (logged on load).
    pub patterns: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    /// Estimated solve time in minutes.
    #[serde(default)]
    pub estimated_time: u32,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub pattern_explanation: String,
    #[serde(default)]
    pub solution_walkthrough: Vec<String>,
    /// language tag → starter source.
    #[serde(default)]
    pub starter_code: HashMap<String, String>,
    /// language tag → canonical solution source.
    #[serde(default)]
    pub solutions: HashMap<String, String>,
    pub test_cases: Vec<TestCase>,
}

impl Problem {
    /// Structural validation applied at load time.  Returns the first
    /// violation as a message; unknown patterns only warn.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("missing id".into());
        }
        if self.title.trim().is_empty() {
            return Err("missing title".into());
        }
        if self.patterns.is_empty() {
            return Err("at least one pattern is required".into());
        }
        if self.test_cases.is_empty() {
            return Err("at least one test case is required".into());
        }
        for lang in self.starter_code.keys() {
            if !self.solutions.contains_key(lang) {
                return Err(format!("starter_code has '{lang}' but solutions does not"));
            }
        }
        for pattern in &self.patterns {
            if !is_known_pattern(pattern) {
                tracing::warn!(
                    problem_id = %self.id,
                    pattern = %pattern,
                    "problem tagged with unknown pattern"
                );
            }
        }
        Ok(())
    }

    pub fn starter_for(&self, language: Language) -> Option<&str> {
        self.starter_code.get(language.tag()).map(String::as_str)
    }

    pub fn solution_for(&self, language: Language) -> Option<&str> {
        self.solutions.get(language.tag()).map(String::as_str)
    }

    pub fn has_pattern(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }

    /// Any language a starter exists for, in the fixed `Language::ALL`
    /// order.  Used when the requested language has no starter.
    pub fn any_starter_language(&self) -> Option<Language> {
        Language::ALL
            .into_iter()
            .find(|lang| self.starter_code.contains_key(lang.tag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Problem {
        Problem {
            id: "two-sum".into(),
            title: "Two Sum".into(),
            difficulty: Difficulty::Easy,
            patterns: vec!["hash-map".into()],
            companies: vec!["acme".into()],
            estimated_time: 15,
            description: "Find two numbers that add to target.".into(),
            examples: vec![Example {
                input: "[2,7,11,15], 9".into(),
                output: "[0,1]".into(),
                explanation: None,
            }],
            constraints: vec!["2 <= nums.length".into()],
            pattern_explanation: "Use a complement map.".into(),
            solution_walkthrough: vec!["Walk the array once.".into()],
            starter_code: HashMap::from([("python".into(), "def two_sum(nums, target):\n    pass\n".into())]),
            solutions: HashMap::from([("python".into(), "def two_sum(nums, target):\n    ...\n".into())]),
            test_cases: vec![TestCase {
                input: "[2,7,11,15], 9".into(),
                expected: "[0,1]".into(),
            }],
        }
    }

    #[test]
    fn valid_problem_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn empty_test_cases_rejected() {
        let mut p = sample();
        p.test_cases.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn starter_without_solution_rejected() {
        let mut p = sample();
        p.starter_code.insert("go".into(), "func twoSum() {}".into());
        assert!(p.validate().is_err());
    }

    #[test]
    fn missing_pattern_rejected() {
        let mut p = sample();
        p.patterns.clear();
        assert!(p.validate().is_err());
    }

    #[test]
    fn json_round_trip_is_identity() {
        let p = sample();
        let json = serde_json::to_string(&p).unwrap();
        let back: Problem = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
