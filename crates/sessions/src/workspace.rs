//! Per-attempt workspace provisioning.
//!
//! A workspace is a directory holding the rendered `problem.md` and one
//! seeded source file.  Provisioning is idempotent: the description is
//! always rewritten, but an existing code file is never overwritten, so a
//! resumed attempt keeps the learner's edits.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use scales_domain::config::Config;
use scales_domain::error::Result;
use scales_domain::trace::TraceEvent;
use scales_domain::types::Language;
use scales_problems::Problem;

/// A provisioned attempt directory.  All paths are absolute.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    pub code_file: PathBuf,
    /// The language actually seeded.  May differ from the request when the
    /// problem carries no starter for it.
    pub language: Language,
    /// Whether an existing code file was kept (resume).
    pub reused_code: bool,
}

pub struct WorkspaceManager {
    config: Config,
}

impl WorkspaceManager {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Provision a workspace for a non-daily session under the config root.
    pub fn provision(
        &self,
        problem: &Problem,
        language: Language,
        session_id: &str,
    ) -> Result<Workspace> {
        let language = effective_language(problem, language);
        let dir = absolute(self.config.sessions_dir().join(session_id));
        let code_file = dir.join(format!("solution.{}", language.extension()));
        self.provision_at(problem, language, dir, code_file)
    }

    /// Provision a daily-mode workspace at the fixed practice-tree layout
    /// `<practice>/Daily/<date>/<pattern>/<problem_id>.<ext>`.
    pub fn provision_daily(
        &self,
        problem: &Problem,
        language: Language,
        date: NaiveDate,
        pattern: &str,
    ) -> Result<Workspace> {
        let language = effective_language(problem, language);
        let dir = absolute(self.config.daily_workspace_dir(date, pattern));
        let code_file = dir.join(format!("{}.{}", problem.id, language.extension()));
        self.provision_at(problem, language, dir, code_file)
    }

    fn provision_at(
        &self,
        problem: &Problem,
        language: Language,
        dir: PathBuf,
        code_file: PathBuf,
    ) -> Result<Workspace> {
        let reused_code = code_file.exists();

        let provisioned = (|| -> Result<()> {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(dir.join("problem.md"), render_description(problem))?;
            if !reused_code {
                let starter = problem.starter_for(language).unwrap_or_default();
                std::fs::write(&code_file, starter)?;
            }
            Ok(())
        })();

        if let Err(e) = provisioned {
            // Partial creation is cleaned up only when no learner code is at
            // risk.
            if !reused_code {
                let _ = std::fs::remove_dir_all(&dir);
            }
            return Err(e);
        }

        TraceEvent::WorkspaceProvisioned {
            dir: dir.display().to_string(),
            language: language.tag().to_string(),
            reused_code,
        }
        .emit();

        Ok(Workspace {
            dir,
            code_file,
            language,
            reused_code,
        })
    }
}

/// The requested language when a starter exists for it, otherwise any
/// language the problem does carry a starter for.
fn effective_language(problem: &Problem, requested: Language) -> Language {
    if problem.starter_for(requested).is_some() {
        requested
    } else {
        problem.any_starter_language().unwrap_or(requested)
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&path))
            .unwrap_or(path)
    }
}

/// Render the problem description markdown written to `problem.md`.
pub fn render_description(problem: &Problem) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", problem.title));
    out.push_str(&format!("**Difficulty:** {}\n", problem.difficulty));
    out.push_str(&format!("**Patterns:** {}\n", problem.patterns.join(", ")));
    if problem.estimated_time > 0 {
        out.push_str(&format!("**Estimated time:** {} minutes\n", problem.estimated_time));
    }
    out.push('\n');
    out.push_str(problem.description.trim_end());
    out.push('\n');

    if !problem.examples.is_empty() {
        out.push_str("\n## Examples\n");
        for (i, example) in problem.examples.iter().enumerate() {
            out.push_str(&format!("\n### Example {}\n\n", i + 1));
            out.push_str(&format!("Input: `{}`\n\n", example.input));
            out.push_str(&format!("Output: `{}`\n", example.output));
            if let Some(explanation) = &example.explanation {
                out.push_str(&format!("\nExplanation: {explanation}\n"));
            }
        }
    }

    if !problem.constraints.is_empty() {
        out.push_str("\n## Constraints\n\n");
        for constraint in &problem.constraints {
            out.push_str(&format!("- {constraint}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use scales_domain::types::Difficulty;
    use scales_problems::TestCase;

    fn config(root: &Path) -> Config {
        Config {
            root: root.to_path_buf(),
            practice_dir: root.join("practice"),
            ..Config::default()
        }
    }

    fn problem() -> Problem {
        Problem {
            id: "two-sum".into(),
            title: "Two Sum".into(),
            difficulty: Difficulty::Easy,
            patterns: vec!["hash-map".into()],
            companies: vec![],
            estimated_time: 15,
            description: "Find the pair.".into(),
            examples: vec![],
            constraints: vec!["n >= 2".into()],
            pattern_explanation: String::new(),
            solution_walkthrough: vec![],
            starter_code: HashMap::from([("python".into(), "def two_sum(nums, target):\n    pass\n".into())]),
            solutions: HashMap::from([("python".into(), "def two_sum(nums, target):\n    return []\n".into())]),
            test_cases: vec![TestCase {
                input: "[1,2], 3".into(),
                expected: "[0,1]".into(),
            }],
        }
    }

    #[test]
    fn seeds_description_and_starter() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(config(tmp.path()));
        let ws = manager.provision(&problem(), Language::Python, "s1").unwrap();

        assert!(ws.dir.is_absolute());
        assert!(ws.dir.join("problem.md").exists());
        let code = std::fs::read_to_string(&ws.code_file).unwrap();
        assert!(code.contains("def two_sum"));
        assert!(!ws.reused_code);
    }

    #[test]
    fn existing_code_survives_reprovision() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(config(tmp.path()));
        let ws = manager.provision(&problem(), Language::Python, "s1").unwrap();

        std::fs::write(&ws.code_file, "my edits").unwrap();
        let again = manager.provision(&problem(), Language::Python, "s1").unwrap();

        assert!(again.reused_code);
        assert_eq!(std::fs::read_to_string(&again.code_file).unwrap(), "my edits");
        // The description is always rewritten.
        assert!(again.dir.join("problem.md").exists());
    }

    #[test]
    fn falls_back_to_an_available_starter_language() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(config(tmp.path()));
        let ws = manager.provision(&problem(), Language::Go, "s1").unwrap();

        assert_eq!(ws.language, Language::Python);
        assert!(ws.code_file.to_string_lossy().ends_with("solution.py"));
    }

    #[test]
    fn daily_layout_matches_practice_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = WorkspaceManager::new(config(tmp.path()));
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let ws = manager
            .provision_daily(&problem(), Language::Python, date, "hash-map")
            .unwrap();

        let expected = tmp
            .path()
            .join("practice/Daily/2025-01-02/hash-map/two-sum.py");
        assert_eq!(ws.code_file, expected);
    }

    #[test]
    fn description_rendering_covers_sections() {
        let mut p = problem();
        p.examples.push(scales_problems::Example {
            input: "[1,2], 3".into(),
            output: "[0,1]".into(),
            explanation: Some("the only pair".into()),
        });
        let md = render_description(&p);
        assert!(md.starts_with("# Two Sum"));
        assert!(md.contains("**Patterns:** hash-map"));
        assert!(md.contains("### Example 1"));
        assert!(md.contains("## Constraints"));
    }
}
