//! Multi-language execution engine.
//!
//! A registry of per-language runners behind one contract: given a problem,
//! a candidate source, and a timeout, produce per-test-case results and an
//! overall verdict.  Runners synthesize a harness around the user's entry
//! point, run the language's native tool in a throwaway temp directory, and
//! parse `CASE <i> PASS|FAIL|ERROR <payload>` lines from the combined
//! output stream.

mod exec;
mod golang;
mod harness;
mod javascript;
mod literal;
mod normalize;
mod python;
mod registry;
mod results;

pub use exec::{CommandOutput, ExitKind};
pub use golang::GoRunner;
pub use javascript::JsRunner;
pub use normalize::{normalize, outputs_match};
pub use python::PythonRunner;
pub use registry::RunnerRegistry;

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use scales_domain::error::Result;
use scales_domain::types::Language;
use scales_problems::Problem;

/// Sentinel printed by self-testing sources on success.
pub const SELF_TEST_SENTINEL: &str = "All tests passed";

/// Outcome of one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
    pub error: Option<String>,
}

/// Outcome of a full test run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// One entry per declared test case, in declaration order.
    pub results: Vec<TestResult>,
    pub all_passed: bool,
}

/// Uniform contract implemented by every language runner.
///
/// Runners touch nothing outside the temp workspace they create, honor the
/// cancellation token by killing the child, and honor the per-invocation
/// timeout by killing the child and marking unfinished cases.
#[async_trait]
pub trait LanguageRunner: Send + Sync {
    fn language(&self) -> Language;

    async fn execute_tests(
        &self,
        cancel: &CancellationToken,
        problem: &Problem,
        source: &str,
        timeout: Duration,
    ) -> Result<RunOutcome>;
}
