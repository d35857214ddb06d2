use scales_domain::config::is_vim_mode;
use scales_domain::error::Result;
use scales_domain::types::Language;
use scales_sessions::hint_at_level;

use crate::output;
use crate::state::AppContext;

pub fn run(
    ctx: &AppContext,
    problem_id: &str,
    level: u8,
    language: Option<String>,
) -> Result<()> {
    let problem = ctx.problems.get_by_id(problem_id)?;
    let language = language
        .as_deref()
        .map(Language::parse)
        .transpose()?
        .unwrap_or(ctx.config.language);

    let hint = hint_at_level(&problem, language, level);

    if is_vim_mode() {
        output::print_json(&output::hint_payload(&hint, language));
    } else {
        println!("hint (level {}):", hint.level);
        println!("{}", hint.pattern_explanation);
        if let Some(walkthrough) = &hint.walkthrough {
            println!();
            for (i, step) in walkthrough.iter().enumerate() {
                println!("{}. {step}", i + 1);
            }
        }
        if let Some(solution) = &hint.solution {
            println!("\n{solution}");
        }
    }
    Ok(())
}
