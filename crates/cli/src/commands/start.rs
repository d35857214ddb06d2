use scales_domain::config::is_vim_mode;
use scales_domain::error::Result;
use scales_domain::types::{Difficulty, Language, Mode};
use scales_sessions::SessionOptions;

use crate::output;
use crate::state::AppContext;

pub fn run(
    ctx: &AppContext,
    problem: Option<String>,
    pattern: Option<String>,
    difficulty: Option<String>,
    language: Option<String>,
    mode: Option<String>,
) -> Result<()> {
    let options = SessionOptions {
        mode: mode
            .as_deref()
            .map(Mode::parse)
            .transpose()?
            .unwrap_or(ctx.config.mode),
        language: language
            .as_deref()
            .map(Language::parse)
            .transpose()?
            .unwrap_or(ctx.config.language),
        timer_minutes: ctx.config.timer_minutes,
        pattern,
        difficulty: difficulty.as_deref().map(Difficulty::parse).transpose()?,
        problem_id: problem,
    };

    let session = ctx.sessions.create(options)?;

    if is_vim_mode() {
        output::print_json(&output::problem_payload(&session));
    } else {
        let problem = session.problem();
        println!("{} — {} [{}]", problem.id, problem.title, problem.difficulty);
        println!("workspace: {}", session.workspace_dir().display());
        println!("edit:      {}", session.code_file().display());
    }
    Ok(())
}
