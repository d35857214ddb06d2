//! The attempt state machine.
//!
//! READY → EDIT ⇄ TESTING → SOLVED → FINISHED, with FINISHED reachable
//! from any live state via `finish()`.  A finished session rejects every
//! further operation with `SessionEnded`.  `run_tests` is not reentrant;
//! a second call while one is in flight fails with `Busy`, and a
//! `set_code` issued during a run is queued and applied once the run
//! settles.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use scales_domain::config::Config;
use scales_domain::error::{Error, Result};
use scales_domain::trace::TraceEvent;
use scales_domain::types::{Difficulty, Language, Mode};
use scales_problems::{Problem, ProblemStore};
use scales_runner::{RunOutcome, RunnerRegistry};
use scales_stats::{SessionRecord, StatsStore};

use crate::hints::{self, Hint, MAX_HINT_LEVEL};
use crate::workspace::WorkspaceManager;

const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(30);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Options & state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub mode: Mode,
    pub language: Language,
    /// Advisory timer; elapsed time is recorded, never enforced.
    pub timer_minutes: u32,
    pub pattern: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub problem_id: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Practice,
            language: Language::Go,
            timer_minutes: 30,
            pattern: None,
            difficulty: None,
            problem_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Edit,
    Testing,
    Solved,
    Finished,
}

struct SessionInner {
    state: SessionState,
    code: String,
    pending_code: Option<String>,
    hint_level: u8,
    show_pattern: bool,
    show_solution: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A bound attempt: one problem, one workspace, one learner.
pub struct Session {
    id: String,
    problem: Arc<Problem>,
    options: SessionOptions,
    /// Effective language.  May differ from `options.language` when the
    /// workspace fell back to an available starter.
    language: Language,
    workspace_dir: PathBuf,
    code_file: PathBuf,
    start_time: DateTime<Utc>,
    test_timeout: Duration,
    runners: Arc<RunnerRegistry>,
    stats: Arc<StatsStore>,
    inner: Mutex<SessionInner>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    pub fn code_file(&self) -> &Path {
        &self.code_file
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    pub fn code(&self) -> String {
        self.inner.lock().code.clone()
    }

    pub fn hint_count(&self) -> u8 {
        self.inner.lock().hint_level
    }

    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.start_time
    }

    /// Replace the working source.  During a test run the edit is queued
    /// and applied after the run settles.
    pub fn set_code(&self, code: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Finished => Err(Error::SessionEnded),
            SessionState::Testing => {
                inner.pending_code = Some(code.to_string());
                Ok(())
            }
            state => {
                write_atomic(&self.code_file, code)?;
                inner.code = code.to_string();
                if state == SessionState::Ready {
                    inner.state = SessionState::Edit;
                }
                Ok(())
            }
        }
    }

    /// Run the problem's test suite against the current source.
    pub async fn run_tests(&self, cancel: &CancellationToken) -> Result<RunOutcome> {
        let code = {
            let mut inner = self.inner.lock();
            match inner.state {
                SessionState::Finished => return Err(Error::SessionEnded),
                SessionState::Testing => {
                    return Err(Error::Busy("a test run is already in flight".into()))
                }
                _ => {}
            }
            inner.state = SessionState::Testing;
            inner.code.clone()
        };

        let outcome = self
            .runners
            .execute_tests(cancel, self.language, &self.problem, &code, self.test_timeout)
            .await;

        let mut inner = self.inner.lock();
        let settled = match outcome {
            Ok(outcome) => {
                inner.state = if outcome.all_passed {
                    SessionState::Solved
                } else {
                    SessionState::Edit
                };
                Ok(outcome)
            }
            Err(e) => {
                inner.state = SessionState::Edit;
                Err(e)
            }
        };

        if let Some(code) = inner.pending_code.take() {
            match write_atomic(&self.code_file, &code) {
                Ok(()) => inner.code = code,
                Err(e) => tracing::warn!(error = %e, "dropping queued edit after failed write"),
            }
        }

        settled
    }

    /// Toggle pattern/hint visibility.  Learn mode only.
    pub fn show_hints(&self, show: bool) -> Result<()> {
        self.require_learn()?;
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Finished {
            return Err(Error::SessionEnded);
        }
        inner.show_pattern = show;
        Ok(())
    }

    /// Toggle solution visibility.  Learn mode only.
    pub fn show_solution(&self, show: bool) -> Result<()> {
        self.require_learn()?;
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Finished {
            return Err(Error::SessionEnded);
        }
        inner.show_solution = show;
        Ok(())
    }

    pub fn pattern_shown(&self) -> bool {
        self.inner.lock().show_pattern
    }

    pub fn solution_shown(&self) -> bool {
        self.inner.lock().show_solution
    }

    /// Advance the monotone hint level and return the hint content at the
    /// new level.  Learn mode only; clamps at level 3.
    pub fn next_hint(&self) -> Result<Hint> {
        self.require_learn()?;
        let level = {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::Finished {
                return Err(Error::SessionEnded);
            }
            inner.hint_level = (inner.hint_level + 1).min(MAX_HINT_LEVEL);
            inner.hint_level
        };
        TraceEvent::HintServed {
            problem_id: self.problem.id.clone(),
            level,
        }
        .emit();
        Ok(hints::hint_at_level(&self.problem, self.language, level))
    }

    /// Settle the attempt and append its record.  Terminal: every
    /// subsequent operation fails with `SessionEnded`.
    pub fn finish(&self, solved: bool) -> Result<()> {
        let hint_count = {
            let mut inner = self.inner.lock();
            if inner.state == SessionState::Finished {
                return Err(Error::SessionEnded);
            }
            inner.state = SessionState::Finished;
            inner.hint_level
        };

        let end_time = Utc::now();
        let duration_ms = (end_time - self.start_time).num_milliseconds().max(0) as u64;
        let record = SessionRecord {
            problem_id: self.problem.id.clone(),
            patterns: self.problem.patterns.clone(),
            language: self.language,
            mode: self.options.mode,
            start_time: self.start_time,
            end_time,
            duration_ms,
            solved,
            hint_count: hint_count as u32,
        };
        self.stats.append(&record)?;

        TraceEvent::SessionFinished {
            session_id: self.id.clone(),
            problem_id: self.problem.id.clone(),
            solved,
            duration_ms,
        }
        .emit();

        Ok(())
    }

    fn require_learn(&self) -> Result<()> {
        if self.options.mode.allows_hints() {
            Ok(())
        } else {
            Err(Error::ModeForbidden(self.options.mode.tag().to_string()))
        }
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SessionManager
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session factory: resolves a problem, provisions its workspace, and
/// binds the two into a READY session.
pub struct SessionManager {
    problems: Arc<ProblemStore>,
    stats: Arc<StatsStore>,
    runners: Arc<RunnerRegistry>,
    workspaces: WorkspaceManager,
    test_timeout: Duration,
}

impl SessionManager {
    pub fn new(
        config: Config,
        problems: Arc<ProblemStore>,
        stats: Arc<StatsStore>,
        runners: Arc<RunnerRegistry>,
    ) -> Self {
        Self {
            problems,
            stats,
            runners,
            workspaces: WorkspaceManager::new(config),
            test_timeout: DEFAULT_TEST_TIMEOUT,
        }
    }

    pub fn with_test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = timeout;
        self
    }

    /// Create a session: explicit problem id when given, otherwise a
    /// uniform pick over the requested filters.
    pub fn create(&self, options: SessionOptions) -> Result<Arc<Session>> {
        let problem = match &options.problem_id {
            Some(id) => self.problems.get_by_id(id)?,
            None => self
                .problems
                .random(options.pattern.as_deref(), options.difficulty)?,
        };
        let session_id = Uuid::new_v4().to_string();
        let workspace = self
            .workspaces
            .provision(&problem, options.language, &session_id)?;
        self.bind(session_id, problem, options, workspace)
    }

    /// Create a session for a daily-plan entry, using the fixed daily
    /// workspace layout.
    pub fn create_daily(
        &self,
        problem: Arc<Problem>,
        date: NaiveDate,
        pattern: &str,
        options: SessionOptions,
    ) -> Result<Arc<Session>> {
        let session_id = Uuid::new_v4().to_string();
        let workspace = self
            .workspaces
            .provision_daily(&problem, options.language, date, pattern)?;
        self.bind(session_id, problem, options, workspace)
    }

    fn bind(
        &self,
        id: String,
        problem: Arc<Problem>,
        options: SessionOptions,
        workspace: crate::workspace::Workspace,
    ) -> Result<Arc<Session>> {
        // On resume the file already holds the learner's code.
        let code = std::fs::read_to_string(&workspace.code_file)?;

        TraceEvent::SessionStarted {
            session_id: id.clone(),
            problem_id: problem.id.clone(),
            mode: options.mode.tag().to_string(),
            language: workspace.language.tag().to_string(),
        }
        .emit();

        Ok(Arc::new(Session {
            id,
            problem,
            language: workspace.language,
            options,
            workspace_dir: workspace.dir,
            code_file: workspace.code_file,
            start_time: Utc::now(),
            test_timeout: self.test_timeout,
            runners: self.runners.clone(),
            stats: self.stats.clone(),
            inner: Mutex::new(SessionInner {
                state: SessionState::Ready,
                code,
                pending_code: None,
                hint_level: 0,
                show_pattern: false,
                show_solution: false,
            }),
        }))
    }
}
