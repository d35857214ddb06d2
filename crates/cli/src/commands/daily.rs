use chrono::NaiveDate;
use serde_json::json;

use scales_domain::config::is_vim_mode;
use scales_domain::error::{Error, Result};
use scales_domain::types::{Difficulty, Language, Mode};
use scales_scheduler::DailyScheduler;
use scales_sessions::SessionOptions;

use crate::output;
use crate::state::AppContext;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn load(ctx: &AppContext, difficulty: Option<Difficulty>) -> Result<DailyScheduler> {
    DailyScheduler::load_or_create(&ctx.config, &ctx.problems, today(), difficulty)
}

pub fn status(ctx: &AppContext) -> Result<()> {
    let scheduler = load(ctx, None)?;
    let streak = scheduler.streak();

    if is_vim_mode() {
        let plan = scheduler.plan();
        output::print_json(&json!({
            "date": plan.date.format("%Y-%m-%d").to_string(),
            "completed": scheduler.completed_count(),
            "skipped": scheduler.skipped_count(),
            "pending": scheduler.pending_count(),
            "in_progress": scheduler.in_progress_count(),
            "total": scheduler.total(),
            "current_streak": streak.current_streak,
            "longest_streak": streak.longest_streak,
        }));
    } else {
        println!(
            "{}: {}/{} completed, {} skipped, {} pending",
            scheduler.date().format("%Y-%m-%d"),
            scheduler.completed_count(),
            scheduler.total(),
            scheduler.skipped_count(),
            scheduler.pending_count(),
        );
        println!(
            "streak: {} (longest {})",
            streak.current_streak, streak.longest_streak
        );
        for (pattern, entry) in scheduler.plan().problems {
            println!("  {:<20} {:<12} {}", pattern, entry.state.tag(), entry.problem_id);
        }
    }
    Ok(())
}

pub fn start(
    ctx: &AppContext,
    pattern: Option<String>,
    language: Option<String>,
    difficulty: Option<String>,
) -> Result<()> {
    let difficulty = difficulty.as_deref().map(Difficulty::parse).transpose()?;
    let scheduler = load(ctx, difficulty)?;

    let (pattern, problem_id) = match pattern {
        Some(pattern) => {
            let entry = scheduler.entry(&pattern).ok_or_else(|| {
                Error::NotFound(format!("pattern '{pattern}' in today's plan"))
            })?;
            (pattern, entry.problem_id)
        }
        None => scheduler.next_pending().ok_or_else(|| {
            Error::Other(
                "every pattern is handled today; use `daily resume <pattern>` to revisit a skipped one"
                    .into(),
            )
        })?,
    };

    scheduler.start(&pattern)?;

    let problem = ctx.problems.get_by_id(&problem_id)?;
    let options = SessionOptions {
        mode: Mode::Practice,
        language: language
            .as_deref()
            .map(Language::parse)
            .transpose()?
            .unwrap_or(ctx.config.language),
        timer_minutes: ctx.config.timer_minutes,
        pattern: Some(pattern.clone()),
        difficulty,
        problem_id: Some(problem_id),
    };
    let session = ctx
        .sessions
        .create_daily(problem, scheduler.date(), &pattern, options)?;

    if is_vim_mode() {
        output::print_json(&output::problem_payload(&session));
    } else {
        println!(
            "{}: {} — {}",
            pattern,
            session.problem().id,
            session.problem().title
        );
        println!("edit: {}", session.code_file().display());
    }
    Ok(())
}

pub fn complete(ctx: &AppContext, pattern: &str) -> Result<()> {
    let scheduler = load(ctx, None)?;
    scheduler.complete(pattern)?;
    after_transition(&scheduler, pattern, "completed")
}

pub fn skip(ctx: &AppContext, pattern: &str) -> Result<()> {
    let scheduler = load(ctx, None)?;
    scheduler.skip(pattern)?;
    after_transition(&scheduler, pattern, "skipped")
}

pub fn resume(ctx: &AppContext, pattern: &str) -> Result<()> {
    let scheduler = load(ctx, None)?;
    scheduler.resume(pattern)?;
    after_transition(&scheduler, pattern, "resumed")
}

fn after_transition(scheduler: &DailyScheduler, pattern: &str, verb: &str) -> Result<()> {
    if is_vim_mode() {
        let streak = scheduler.streak();
        output::print_json(&json!({
            "pattern": pattern,
            "state": scheduler.entry(pattern).map(|e| e.state.tag()),
            "completed": scheduler.completed_count(),
            "total": scheduler.total(),
            "current_streak": streak.current_streak,
        }));
    } else {
        println!(
            "{verb} {pattern} ({}/{} completed)",
            scheduler.completed_count(),
            scheduler.total()
        );
    }
    Ok(())
}
