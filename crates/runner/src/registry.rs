//! Static language → runner registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scales_domain::error::{Error, Result};
use scales_domain::trace::TraceEvent;
use scales_domain::types::Language;
use scales_problems::Problem;

use crate::{GoRunner, JsRunner, LanguageRunner, PythonRunner, RunOutcome};

/// Registry of language runners, built once at process start and immutable
/// thereafter.  Safe to share across concurrent sessions; runners keep no
/// state between invocations.
pub struct RunnerRegistry {
    runners: HashMap<Language, Arc<dyn LanguageRunner>>,
}

impl RunnerRegistry {
    /// The standard registry: Go, Python, JavaScript.
    pub fn standard() -> Self {
        Self::with_runners(vec![
            Arc::new(GoRunner) as Arc<dyn LanguageRunner>,
            Arc::new(PythonRunner),
            Arc::new(JsRunner),
        ])
    }

    /// Build a registry from an explicit runner set.
    pub fn with_runners(list: Vec<Arc<dyn LanguageRunner>>) -> Self {
        let mut runners: HashMap<Language, Arc<dyn LanguageRunner>> = HashMap::new();
        for runner in list {
            runners.insert(runner.language(), runner);
        }
        Self { runners }
    }

    pub fn supports(&self, language: Language) -> bool {
        self.runners.contains_key(&language)
    }

    pub fn get(&self, language: Language) -> Result<Arc<dyn LanguageRunner>> {
        self.runners
            .get(&language)
            .cloned()
            .ok_or_else(|| Error::UnsupportedLanguage(language.tag().to_string()))
    }

    /// Dispatch a test run to the runner registered for `language`.
    pub async fn execute_tests(
        &self,
        cancel: &CancellationToken,
        language: Language,
        problem: &Problem,
        source: &str,
        timeout: Duration,
    ) -> Result<RunOutcome> {
        let runner = self.get(language)?;
        let started = std::time::Instant::now();
        let outcome = runner.execute_tests(cancel, problem, source, timeout).await?;

        TraceEvent::TestRunFinished {
            problem_id: problem.id.clone(),
            language: language.tag().to_string(),
            total: outcome.results.len(),
            passed: outcome.results.iter().filter(|r| r.passed).count(),
            all_passed: outcome.all_passed,
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();

        Ok(outcome)
    }
}
