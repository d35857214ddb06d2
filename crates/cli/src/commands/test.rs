use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scales_domain::config::is_vim_mode;
use scales_domain::error::{Error, Result};
use scales_domain::types::Language;

use crate::output;
use crate::state::AppContext;

pub async fn run(
    ctx: &AppContext,
    problem_id: &str,
    file: &Path,
    language: Option<String>,
    timeout_secs: u64,
) -> Result<()> {
    let problem = ctx.problems.get_by_id(problem_id)?;
    let language = match language {
        Some(tag) => Language::parse(&tag)?,
        None => {
            let ext = file
                .extension()
                .and_then(|e| e.to_str())
                .ok_or_else(|| Error::Other(format!("cannot infer language from {}", file.display())))?;
            Language::from_extension(ext)?
        }
    };
    let source = std::fs::read_to_string(file)?;

    let cancel = CancellationToken::new();
    let outcome = ctx
        .runners
        .execute_tests(
            &cancel,
            language,
            &problem,
            &source,
            Duration::from_secs(timeout_secs),
        )
        .await?;

    if is_vim_mode() {
        output::print_json(&output::results_payload(&outcome));
    } else {
        output::print_results_text(&problem, &outcome);
    }
    // Test failures are reported in the payload, never via the exit code.
    Ok(())
}
