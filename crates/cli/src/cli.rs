use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AlgoScales — practice algorithm patterns like musical scales.
#[derive(Debug, Parser)]
#[command(name = "algo-scales", version, about)]
pub struct Cli {
    /// Override the state root (default: ~/.algo-scales).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List problems, optionally grouped.
    List {
        /// Group by: pattern, difficulty, or company.
        #[arg(long, default_value = "pattern")]
        by: String,
    },
    /// Start a practice session and print the problem.
    Start {
        /// Pick this specific problem.
        #[arg(long)]
        problem: Option<String>,
        /// Restrict the random pick to a pattern.
        #[arg(long)]
        pattern: Option<String>,
        /// Restrict the random pick to a difficulty.
        #[arg(long)]
        difficulty: Option<String>,
        /// Target language (go | python | javascript).
        #[arg(long)]
        language: Option<String>,
        /// Session mode (learn | practice | cram).
        #[arg(long)]
        mode: Option<String>,
    },
    /// Run a problem's test suite against a source file.
    Test {
        /// Problem id.
        problem: String,
        /// Source file with the candidate solution.
        #[arg(long)]
        file: PathBuf,
        /// Language override (inferred from the file extension otherwise).
        #[arg(long)]
        language: Option<String>,
        /// Per-run timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Daily scales: one problem per pattern per day.
    #[command(subcommand)]
    Daily(DailyCommand),
    /// Practice statistics.
    #[command(subcommand)]
    Stats(StatsCommand),
    /// Progressive hint for a problem.
    Hint {
        /// Problem id.
        problem: String,
        /// Hint level (1..=3).
        #[arg(long, default_value_t = 1)]
        level: u8,
        /// Language for the level-3 solution.
        #[arg(long)]
        language: Option<String>,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum DailyCommand {
    /// Today's plan and streak.
    Status,
    /// Start the next pending pattern (or a named one) and print its problem.
    Start {
        pattern: Option<String>,
        /// Target language.
        #[arg(long)]
        language: Option<String>,
        /// Restrict problem choice when the plan is first built today.
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Mark a pattern's problem as completed.
    Complete { pattern: String },
    /// Skip the in-progress pattern.
    Skip { pattern: String },
    /// Resume a skipped pattern.
    Resume { pattern: String },
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Totals and solve rate.
    Summary,
    /// Per-pattern attempted/solved counts.
    Patterns,
    /// Per-day counts over a trailing window.
    Trends {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}
