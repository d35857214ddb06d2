//! Progressive hints, Learn mode only.
//!
//! Level 1 reveals the pattern explanation, level 2 adds the solution
//! walkthrough, level 3 adds the canonical solution for the session's
//! language.  Requests past level 3 clamp.

use scales_domain::types::Language;
use scales_problems::Problem;

pub const MAX_HINT_LEVEL: u8 = 3;

#[derive(Debug, Clone)]
pub struct Hint {
    pub level: u8,
    pub pattern_explanation: String,
    pub walkthrough: Option<Vec<String>>,
    pub solution: Option<String>,
}

pub fn hint_at_level(problem: &Problem, language: Language, level: u8) -> Hint {
    let level = level.clamp(1, MAX_HINT_LEVEL);
    Hint {
        level,
        pattern_explanation: problem.pattern_explanation.clone(),
        walkthrough: (level >= 2).then(|| problem.solution_walkthrough.clone()),
        solution: (level >= 3)
            .then(|| problem.solution_for(language).map(str::to_string))
            .flatten(),
    }
}
