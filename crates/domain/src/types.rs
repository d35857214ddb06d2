//! Core vocabulary: target languages, difficulties, session modes, and the
//! closed set of practice patterns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The eleven practice patterns ("scales"), in canonical order.
///
/// The daily scheduler walks this list in order; problem files live under a
/// directory named after each pattern.
pub const CANONICAL_PATTERNS: [&str; 11] = [
    "sliding-window",
    "two-pointers",
    "fast-slow-pointers",
    "hash-map",
    "binary-search",
    "dfs",
    "bfs",
    "dynamic-programming",
    "greedy",
    "union-find",
    "heap",
];

/// Whether a pattern tag belongs to the canonical set.  Unknown tags are
/// tolerated on load (logged, never rejected).
pub fn is_known_pattern(tag: &str) -> bool {
    CANONICAL_PATTERNS.contains(&tag)
}

/// Musical-scale names for the patterns, surfaced in editor payloads.
const SCALES: [(&str, &str, &str); 11] = [
    ("sliding-window", "C Major", "the foundational scale, smooth and continuous"),
    ("two-pointers", "G Major", "two voices moving toward harmony"),
    ("fast-slow-pointers", "D Major", "one voice racing ahead of the other"),
    ("hash-map", "A Major", "instant recall of every note played"),
    ("binary-search", "E Major", "halving the interval until the note rings true"),
    ("dfs", "B Major", "following one melodic line to its end"),
    ("bfs", "F# Major", "widening circles of sound"),
    ("dynamic-programming", "Db Major", "building passages from remembered phrases"),
    ("greedy", "Ab Major", "always reaching for the nearest resolution"),
    ("union-find", "Eb Major", "voices merging into chords"),
    ("heap", "Bb Major", "the highest note always on top"),
];

/// The musical scale name and description for a pattern, if it is one of
/// the canonical eleven.
pub fn scale_for(pattern: &str) -> Option<(&'static str, &'static str)> {
    SCALES
        .iter()
        .find(|(tag, _, _)| *tag == pattern)
        .map(|(_, name, desc)| (*name, *desc))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Language
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A supported target language for solutions and runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Python,
    Javascript,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Go, Language::Python, Language::Javascript];

    /// The tag used in problem JSON keys and CLI flags.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "python",
            Language::Javascript => "javascript",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "py",
            Language::Javascript => "js",
        }
    }

    /// The native tool invoked by the execution engine.
    pub fn tool(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "python3",
            Language::Javascript => "node",
        }
    }

    /// Infer the language from a source file extension.
    pub fn from_extension(ext: &str) -> Result<Language> {
        match ext.trim_start_matches('.') {
            "go" => Ok(Language::Go),
            "py" => Ok(Language::Python),
            "js" => Ok(Language::Javascript),
            other => Err(Error::UnsupportedLanguage(format!(".{other}"))),
        }
    }

    /// Parse a user-supplied tag, accepting common aliases.
    pub fn parse(tag: &str) -> Result<Language> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "go" | "golang" => Ok(Language::Go),
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" | "node" => Ok(Language::Javascript),
            other => Err(Error::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Difficulty
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn tag(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(tag: &str) -> Result<Difficulty> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::Other(format!("unknown difficulty: {other}"))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Mode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session mode.  Learn shows hints and solutions freely; Practice and Cram
/// keep them hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Learn,
    Practice,
    Cram,
}

impl Mode {
    pub fn tag(&self) -> &'static str {
        match self {
            Mode::Learn => "learn",
            Mode::Practice => "practice",
            Mode::Cram => "cram",
        }
    }

    pub fn parse(tag: &str) -> Result<Mode> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "learn" => Ok(Mode::Learn),
            "practice" => Ok(Mode::Practice),
            "cram" => Ok(Mode::Cram),
            other => Err(Error::Other(format!("unknown mode: {other}"))),
        }
    }

    /// Hints and solutions are only surfaced in Learn mode.
    pub fn allows_hints(&self) -> bool {
        matches!(self, Mode::Learn)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_patterns_count() {
        assert_eq!(CANONICAL_PATTERNS.len(), 11);
        assert!(is_known_pattern("hash-map"));
        assert!(!is_known_pattern("backtracking"));
    }

    #[test]
    fn language_aliases_parse() {
        assert_eq!(Language::parse("Go").unwrap(), Language::Go);
        assert_eq!(Language::parse("js").unwrap(), Language::Javascript);
        assert_eq!(Language::parse("py").unwrap(), Language::Python);
        assert!(Language::parse("rust").is_err());
    }

    #[test]
    fn language_serde_tags() {
        let json = serde_json::to_string(&Language::Javascript).unwrap();
        assert_eq!(json, "\"javascript\"");
    }

    #[test]
    fn mode_gates_hints() {
        assert!(Mode::Learn.allows_hints());
        assert!(!Mode::Practice.allows_hints());
        assert!(!Mode::Cram.allows_hints());
    }
}
