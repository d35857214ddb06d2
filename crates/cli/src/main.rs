mod cli;
mod commands;
mod output;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, DailyCommand, StatsCommand};
use scales_domain::config::is_vim_mode;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        if is_vim_mode() {
            output::print_json(&output::error_payload(&e.to_string()));
        } else {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so vim-mode stdout stays a single JSON object.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = match cli.command {
        Command::Version => {
            println!("algo-scales {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        command => command,
    };

    let ctx = state::AppContext::init(cli.root)?;

    match command {
        Command::List { by } => commands::list::run(&ctx, &by)?,
        Command::Start {
            problem,
            pattern,
            difficulty,
            language,
            mode,
        } => commands::start::run(&ctx, problem, pattern, difficulty, language, mode)?,
        Command::Test {
            problem,
            file,
            language,
            timeout,
        } => commands::test::run(&ctx, &problem, &file, language, timeout).await?,
        Command::Daily(daily) => match daily {
            DailyCommand::Status => commands::daily::status(&ctx)?,
            DailyCommand::Start {
                pattern,
                language,
                difficulty,
            } => commands::daily::start(&ctx, pattern, language, difficulty)?,
            DailyCommand::Complete { pattern } => commands::daily::complete(&ctx, &pattern)?,
            DailyCommand::Skip { pattern } => commands::daily::skip(&ctx, &pattern)?,
            DailyCommand::Resume { pattern } => commands::daily::resume(&ctx, &pattern)?,
        },
        Command::Stats(stats) => match stats {
            StatsCommand::Summary => commands::stats::summary(&ctx)?,
            StatsCommand::Patterns => commands::stats::patterns(&ctx)?,
            StatsCommand::Trends { days } => commands::stats::trends(&ctx, days)?,
        },
        Command::Hint {
            problem,
            level,
            language,
        } => commands::hint::run(&ctx, &problem, level, language)?,
        Command::Version => {}
    }

    Ok(())
}
