use serde_json::json;

use scales_domain::config::is_vim_mode;
use scales_domain::error::Result;

use crate::output;
use crate::state::AppContext;

pub fn summary(ctx: &AppContext) -> Result<()> {
    let summary = ctx.stats.summary()?;
    if is_vim_mode() {
        output::print_json(&serde_json::to_value(&summary)?);
    } else {
        println!("sessions:  {}", summary.total_sessions);
        println!("solved:    {} ({:.0}%)", summary.solved, summary.solve_rate * 100.0);
        println!("avg time:  {}s", summary.avg_duration_ms / 1000);
        println!("patterns:  {}", summary.patterns_touched);
    }
    Ok(())
}

pub fn patterns(ctx: &AppContext) -> Result<()> {
    let by_pattern = ctx.stats.by_pattern()?;
    if is_vim_mode() {
        output::print_json(&serde_json::to_value(&by_pattern)?);
    } else {
        for (pattern, stats) in by_pattern {
            println!("{:<20} {}/{} solved", pattern, stats.solved, stats.attempted);
        }
    }
    Ok(())
}

pub fn trends(ctx: &AppContext, days: u32) -> Result<()> {
    let trends = ctx.stats.trends(days)?;
    if is_vim_mode() {
        output::print_json(&json!({ "days": trends }));
    } else {
        for day in trends {
            println!(
                "{}  {:>3} attempted  {:>3} solved",
                day.date, day.attempted, day.solved
            );
        }
    }
    Ok(())
}
