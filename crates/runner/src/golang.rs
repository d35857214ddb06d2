//! Go runner.
//!
//! Two paths.  A source carrying its own `func main` is a self-testing
//! program: it is run directly and the `All tests passed` sentinel marks
//! every case passed.  Otherwise (or when the direct run yields no
//! sentinel) the harness path compiles `harness.go` + `solution.go` as one
//! main package with `go run`, renaming any user `func main` first so it
//! cannot collide with the harness's own.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use scales_domain::error::{Error, Result};
use scales_domain::types::Language;
use scales_problems::Problem;

use crate::exec::{self, ExitKind};
use crate::{harness, results, LanguageRunner, RunOutcome, SELF_TEST_SENTINEL};

pub struct GoRunner;

fn main_fn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^(\s*)func\s+main\s*\(").expect("static main pattern"))
}

fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*package\s+[A-Za-z_][A-Za-z0-9_]*").expect("static package pattern"))
}

/// Rewrite (or insert) the package clause so the user file links with the
/// harness as package main.
fn ensure_package_main(source: &str) -> String {
    if package_re().is_match(source) {
        package_re().replace(source, "package main").into_owned()
    } else {
        format!("package main\n\n{source}")
    }
}

/// Rename the user's `func main` so the file can link with the harness,
/// which declares its own.  Go tolerates the resulting unused function.
fn neutralize_user_main(source: &str) -> String {
    main_fn_re()
        .replace_all(source, "${1}func __userMain(")
        .into_owned()
}

#[async_trait]
impl LanguageRunner for GoRunner {
    fn language(&self) -> Language {
        Language::Go
    }

    async fn execute_tests(
        &self,
        cancel: &CancellationToken,
        problem: &Problem,
        source: &str,
        timeout: Duration,
    ) -> Result<RunOutcome> {
        let workdir = tempfile::tempdir()?;
        let solution_path = workdir.path().join("solution.go");

        // Direct-run path for self-testing sources.
        if main_fn_re().is_match(source) {
            std::fs::write(&solution_path, source)?;
            let mut cmd = Command::new(Language::Go.tool());
            cmd.arg("run").arg(&solution_path);
            cmd.current_dir(workdir.path());

            let output = exec::run_streaming(cmd, cancel, timeout).await?;
            match output.exit {
                ExitKind::Cancelled => return Err(Error::Cancelled),
                ExitKind::TimedOut => return results::collect_results(problem, &output),
                ExitKind::Finished { code } => {
                    if code == Some(0) && output.contains_line_with(SELF_TEST_SENTINEL) {
                        return Ok(results::all_passed_outcome(problem));
                    }
                    tracing::debug!(
                        problem_id = %problem.id,
                        "self-test run produced no sentinel, falling back to harness"
                    );
                }
            }
        }

        let entry = harness::find_entry_point(Language::Go, source, &problem.id)?;
        // The harness declares `func main`; rename any user main so the two
        // files still compile as one package.
        std::fs::write(
            &solution_path,
            ensure_package_main(&neutralize_user_main(source)),
        )?;
        let harness_path = workdir.path().join("harness.go");
        std::fs::write(&harness_path, harness::go_harness(&entry, &problem.test_cases))?;

        let mut cmd = Command::new(Language::Go.tool());
        cmd.arg("run").arg(&harness_path).arg(&solution_path);
        cmd.current_dir(workdir.path());

        let output = exec::run_streaming(cmd, cancel, timeout).await?;
        results::collect_results(problem, &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_clause_rewritten_to_main() {
        let source = "package solution\n\nfunc twoSum() {}\n";
        assert!(ensure_package_main(source).starts_with("package main\n"));
    }

    #[test]
    fn missing_package_clause_is_inserted() {
        let source = "func twoSum() {}\n";
        let rewritten = ensure_package_main(source);
        assert!(rewritten.starts_with("package main\n\n"));
        assert!(rewritten.contains("func twoSum"));
    }

    #[test]
    fn own_main_detection() {
        assert!(main_fn_re().is_match("package main\n\nfunc main() {\n}\n"));
        assert!(!main_fn_re().is_match("package main\n\nfunc mainHelper() {}\n"));
    }

    #[test]
    fn user_main_is_renamed_for_the_harness() {
        let source = "package main\n\nfunc twoSum() {}\n\nfunc main() {\n\ttwoSum()\n}\n";
        let rewritten = neutralize_user_main(source);
        assert!(rewritten.contains("func __userMain("));
        assert!(!main_fn_re().is_match(&rewritten));
        assert!(rewritten.contains("func twoSum"));
    }

    #[test]
    fn sources_without_main_are_untouched() {
        let source = "package main\n\nfunc twoSum() {}\n";
        assert_eq!(neutralize_user_main(source), source);
    }
}
