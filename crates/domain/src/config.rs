//! Configuration for the AlgoScales core.
//!
//! State lives under a single root directory (default `$HOME/.algo-scales`).
//! An optional `config.toml` at the root overrides the defaults field by
//! field.  `TESTING=1` suppresses first-run provisioning side effects.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Language, Mode};

/// Version stamped into `version.json` on first initialization.
pub const CORE_VERSION: &str = "1.0.0";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root state directory.
    #[serde(default = "d_root")]
    pub root: PathBuf,

    /// Directory holding daily-mode workspaces.
    #[serde(default = "d_practice_dir")]
    pub practice_dir: PathBuf,

    /// Default target language for new sessions.
    #[serde(default = "d_language")]
    pub language: Language,

    /// Default session mode.
    #[serde(default = "d_mode")]
    pub mode: Mode,

    /// Advisory session timer in minutes (15 | 30 | 45 | 60).
    #[serde(default = "d_timer_minutes")]
    pub timer_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: d_root(),
            practice_dir: d_practice_dir(),
            language: d_language(),
            mode: d_mode(),
            timer_minutes: d_timer_minutes(),
        }
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn d_root() -> PathBuf {
    home_dir().join(".algo-scales")
}

fn d_practice_dir() -> PathBuf {
    home_dir().join("Dev").join("AlgoScalesPractice")
}

fn d_language() -> Language {
    Language::Go
}

fn d_mode() -> Mode {
    Mode::Practice
}

fn d_timer_minutes() -> u32 {
    30
}

impl Config {
    /// Load the configuration rooted at `root` (or the default root),
    /// applying `<root>/config.toml` when present.
    pub fn load(root: Option<PathBuf>) -> Result<Config> {
        let root = root.unwrap_or_else(d_root);
        let toml_path = root.join("config.toml");
        let mut config = if toml_path.exists() {
            let raw = std::fs::read_to_string(&toml_path)?;
            toml::from_str::<Config>(&raw).map_err(|e| Error::Config(e.to_string()))?
        } else {
            Config::default()
        };
        // The root that located the file wins over any root stated inside it.
        config.root = root;
        Ok(config)
    }

    /// Configuration issues worth surfacing.  Advisory only; the timer never
    /// enforces anything, so odd values are warnings rather than errors.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if ![15, 30, 45, 60].contains(&self.timer_minutes) {
            issues.push(format!(
                "timer_minutes = {} is outside the recognized set (15|30|45|60)",
                self.timer_minutes
            ));
        }
        issues
    }

    // ── Paths ────────────────────────────────────────────────────────

    pub fn problems_dir(&self) -> PathBuf {
        self.root.join("problems")
    }

    pub fn stats_dir(&self) -> PathBuf {
        self.root.join("stats")
    }

    pub fn stats_file(&self) -> PathBuf {
        self.stats_dir().join("sessions.jsonl")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    pub fn daily_dir(&self) -> PathBuf {
        self.root.join("daily")
    }

    pub fn daily_plan_path(&self, date: NaiveDate) -> PathBuf {
        self.daily_dir().join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    pub fn progress_path(&self) -> PathBuf {
        self.daily_dir().join("progress.json")
    }

    pub fn version_path(&self) -> PathBuf {
        self.root.join("version.json")
    }

    /// Workspace directory for a daily-mode attempt.
    pub fn daily_workspace_dir(&self, date: NaiveDate, pattern: &str) -> PathBuf {
        self.practice_dir
            .join("Daily")
            .join(date.format("%Y-%m-%d").to_string())
            .join(pattern)
    }

    /// Create the state directory layout and stamp `version.json` on first
    /// run.  Skipped entirely under `TESTING=1`.
    pub fn ensure_layout(&self) -> Result<()> {
        if is_testing() {
            return Ok(());
        }
        for dir in [
            self.root.clone(),
            self.problems_dir(),
            self.stats_dir(),
            self.sessions_dir(),
            self.daily_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        let version_path = self.version_path();
        if !version_path.exists() {
            VersionInfo::current().write(&version_path)?;
            tracing::info!(path = %version_path.display(), "state directory initialized");
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// version.json
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub last_updated: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: CORE_VERSION.to_string(),
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<VersionInfo> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Environment toggles
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `TESTING=1` disables interactive prompts and first-run provisioning.
pub fn is_testing() -> bool {
    std::env::var("TESTING").map(|v| v == "1").unwrap_or(false)
}

/// `VIM_MODE=1` routes command output as single JSON objects on stdout.
pub fn is_vim_mode() -> bool {
    std::env::var("VIM_MODE").map(|v| v == "1").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_hang_off_root() {
        let config = Config {
            root: PathBuf::from("/tmp/scales"),
            ..Config::default()
        };
        assert_eq!(config.stats_file(), PathBuf::from("/tmp/scales/stats/sessions.jsonl"));
        assert_eq!(
            config.daily_plan_path(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()),
            PathBuf::from("/tmp/scales/daily/2025-01-02.json")
        );
    }

    #[test]
    fn toml_overrides_apply() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "language = \"python\"\ntimer_minutes = 45\n",
        )
        .unwrap();
        let config = Config::load(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(config.language, Language::Python);
        assert_eq!(config.timer_minutes, 45);
        assert_eq!(config.root, tmp.path());
    }

    #[test]
    fn unrecognized_timer_warns() {
        let config = Config {
            timer_minutes: 7,
            ..Config::default()
        };
        assert_eq!(config.validate().len(), 1);
    }
}
