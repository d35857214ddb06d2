//! Shared command context: configuration plus the wired-up stores.

use std::path::PathBuf;
use std::sync::Arc;

use scales_domain::config::Config;
use scales_domain::error::Result;
use scales_problems::ProblemStore;
use scales_runner::RunnerRegistry;
use scales_sessions::SessionManager;
use scales_stats::StatsStore;

pub struct AppContext {
    pub config: Config,
    pub problems: Arc<ProblemStore>,
    pub stats: Arc<StatsStore>,
    pub runners: Arc<RunnerRegistry>,
    pub sessions: SessionManager,
}

impl AppContext {
    pub fn init(root: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(root)?;
        for issue in config.validate() {
            tracing::warn!("config: {issue}");
        }
        config.ensure_layout()?;

        let problems = Arc::new(ProblemStore::load(&config.problems_dir())?);
        let stats = Arc::new(StatsStore::new(&config.stats_dir())?);
        let runners = Arc::new(RunnerRegistry::standard());
        let sessions = SessionManager::new(
            config.clone(),
            problems.clone(),
            stats.clone(),
            runners.clone(),
        );

        Ok(Self {
            config,
            problems,
            stats,
            runners,
            sessions,
        })
    }
}
