//! JavaScript runner — `node main.js` where `main.js` is the user source
//! with the driver appended.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use scales_domain::error::Result;
use scales_domain::types::Language;
use scales_problems::Problem;

use crate::{exec, harness, results, LanguageRunner, RunOutcome};

pub struct JsRunner;

#[async_trait]
impl LanguageRunner for JsRunner {
    fn language(&self) -> Language {
        Language::Javascript
    }

    async fn execute_tests(
        &self,
        cancel: &CancellationToken,
        problem: &Problem,
        source: &str,
        timeout: Duration,
    ) -> Result<RunOutcome> {
        let entry = harness::find_entry_point(Language::Javascript, source, &problem.id)?;

        let workdir = tempfile::tempdir()?;
        let main_path = workdir.path().join("main.js");
        std::fs::write(
            &main_path,
            harness::javascript_harness(source, &entry, &problem.test_cases),
        )?;

        let mut cmd = Command::new(Language::Javascript.tool());
        cmd.arg(&main_path);
        cmd.current_dir(workdir.path());

        let output = exec::run_streaming(cmd, cancel, timeout).await?;
        results::collect_results(problem, &output)
    }
}
