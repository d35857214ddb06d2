//! Python runner — `python3 harness.py` with the user source as a sibling
//! `solution.py` module.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use scales_domain::error::Result;
use scales_domain::types::Language;
use scales_problems::Problem;

use crate::{exec, harness, results, LanguageRunner, RunOutcome};

pub struct PythonRunner;

#[async_trait]
impl LanguageRunner for PythonRunner {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn execute_tests(
        &self,
        cancel: &CancellationToken,
        problem: &Problem,
        source: &str,
        timeout: Duration,
    ) -> Result<RunOutcome> {
        let entry = harness::find_entry_point(Language::Python, source, &problem.id)?;

        let workdir = tempfile::tempdir()?;
        std::fs::write(workdir.path().join("solution.py"), source)?;
        let harness_path = workdir.path().join("harness.py");
        std::fs::write(&harness_path, harness::python_harness(&entry, &problem.test_cases))?;

        let mut cmd = Command::new(Language::Python.tool());
        cmd.arg(&harness_path);
        cmd.current_dir(workdir.path());

        let output = exec::run_streaming(cmd, cancel, timeout).await?;
        results::collect_results(problem, &output)
    }
}
