//! Plan construction, state transitions, and idempotent persistence.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use scales_domain::config::Config;
use scales_domain::error::{Error, Result};
use scales_domain::trace::TraceEvent;
use scales_domain::types::{Difficulty, CANONICAL_PATTERNS};
use scales_problems::ProblemStore;

use crate::plan::{DailyEntry, DailyPlan, EntryState};
use crate::streak::StreakRecord;

/// Scheduler for one calendar date.
///
/// Mutations are serialized behind the plan lock.  Every transition is
/// written to disk before it commits in memory; a failed write rolls the
/// transition back and the call errors.
pub struct DailyScheduler {
    date: NaiveDate,
    plan_path: PathBuf,
    progress_path: PathBuf,
    state: Mutex<SchedulerState>,
}

struct SchedulerState {
    plan: DailyPlan,
    streak: StreakRecord,
}

impl DailyScheduler {
    /// Load the plan persisted for `date`, or construct one by walking the
    /// canonical pattern order and picking one problem per pattern.
    /// Re-invocation on the same date always reloads the persisted plan.
    pub fn load_or_create(
        config: &Config,
        problems: &ProblemStore,
        date: NaiveDate,
        difficulty: Option<Difficulty>,
    ) -> Result<Self> {
        let plan_path = config.daily_plan_path(date);
        let progress_path = config.progress_path();

        let plan = if plan_path.exists() {
            let raw = std::fs::read_to_string(&plan_path)?;
            serde_json::from_str(&raw)?
        } else {
            let mut plan = DailyPlan::new(date);
            for pattern in CANONICAL_PATTERNS {
                match problems.random(Some(pattern), difficulty) {
                    Ok(problem) => {
                        plan.problems.insert(
                            pattern.to_string(),
                            DailyEntry {
                                problem_id: problem.id.clone(),
                                state: EntryState::Pending,
                                started_at: None,
                                completed_at: None,
                            },
                        );
                    }
                    Err(Error::NoMatch(_)) => {
                        tracing::warn!(
                            pattern,
                            "no problem available, pattern left out of today's plan"
                        );
                    }
                    Err(e) => return Err(e),
                }
            }
            write_json(&plan_path, &plan)?;
            TraceEvent::PlanCreated {
                date: date.format("%Y-%m-%d").to_string(),
                patterns: plan.total(),
            }
            .emit();
            plan
        };

        let streak = if progress_path.exists() {
            let raw = std::fs::read_to_string(&progress_path)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            StreakRecord::default()
        };

        Ok(Self {
            date,
            plan_path,
            progress_path,
            state: Mutex::new(SchedulerState { plan, streak }),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn plan(&self) -> DailyPlan {
        self.state.lock().plan.clone()
    }

    pub fn streak(&self) -> StreakRecord {
        self.state.lock().streak.clone()
    }

    pub fn entry(&self, pattern: &str) -> Option<DailyEntry> {
        self.state.lock().plan.problems.get(pattern).cloned()
    }

    /// The first pattern, in canonical order, still pending.  `None` means
    /// every pattern has been handled and callers can offer resume-skipped.
    pub fn next_pending(&self) -> Option<(String, String)> {
        let state = self.state.lock();
        for pattern in CANONICAL_PATTERNS {
            if let Some(entry) = state.plan.problems.get(pattern) {
                if entry.state == EntryState::Pending {
                    return Some((pattern.to_string(), entry.problem_id.clone()));
                }
            }
        }
        None
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Pending → InProgress.  Any other pattern currently in progress is
    /// demoted back to Pending with a warning.
    pub fn start(&self, pattern: &str) -> Result<()> {
        self.mutate(|plan| {
            let mut changes = Vec::new();

            if let Some(current) = plan.in_progress().map(str::to_string) {
                if current == pattern {
                    return Ok(changes);
                }
                tracing::warn!(
                    demoted = %current,
                    started = %pattern,
                    "another pattern was in progress, demoting it to pending"
                );
                if let Some(entry) = plan.problems.get_mut(&current) {
                    entry.state = EntryState::Pending;
                    entry.started_at = None;
                }
                changes.push((current, EntryState::InProgress, EntryState::Pending));
            }

            let entry = plan
                .problems
                .get_mut(pattern)
                .ok_or_else(|| Error::NotFound(format!("pattern '{pattern}' in today's plan")))?;
            if entry.state != EntryState::Pending {
                return Err(Error::Other(format!(
                    "pattern '{pattern}' is {}, expected pending",
                    entry.state.tag()
                )));
            }
            entry.state = EntryState::InProgress;
            entry.started_at = Some(Utc::now());
            changes.push((pattern.to_string(), EntryState::Pending, EntryState::InProgress));
            Ok(changes)
        })
    }

    /// InProgress → Completed, with streak accounting.
    pub fn complete(&self, pattern: &str) -> Result<()> {
        let mut state = self.state.lock();

        let mut plan = state.plan.clone();
        let entry = plan
            .problems
            .get_mut(pattern)
            .ok_or_else(|| Error::NotFound(format!("pattern '{pattern}' in today's plan")))?;
        if entry.state != EntryState::InProgress {
            return Err(Error::Other(format!(
                "pattern '{pattern}' is {}, expected in progress",
                entry.state.tag()
            )));
        }
        entry.state = EntryState::Completed;
        entry.completed_at = Some(Utc::now());

        let mut streak = state.streak.clone();
        streak.record_completion(self.date);

        // Write-after-transition: plan first, then the streak; restore the
        // old plan file if the second write fails so disk and memory agree.
        write_json(&self.plan_path, &plan)?;
        if let Err(e) = write_json(&self.progress_path, &streak) {
            let _ = write_json(&self.plan_path, &state.plan);
            return Err(e);
        }

        state.plan = plan;
        state.streak = streak.clone();

        TraceEvent::PlanStateChanged {
            date: self.date.format("%Y-%m-%d").to_string(),
            pattern: pattern.to_string(),
            from: EntryState::InProgress.tag().to_string(),
            to: EntryState::Completed.tag().to_string(),
        }
        .emit();
        TraceEvent::StreakUpdated {
            current: streak.current_streak,
            longest: streak.longest_streak,
        }
        .emit();

        Ok(())
    }

    /// InProgress → Skipped.
    pub fn skip(&self, pattern: &str) -> Result<()> {
        self.mutate(|plan| {
            let entry = plan
                .problems
                .get_mut(pattern)
                .ok_or_else(|| Error::NotFound(format!("pattern '{pattern}' in today's plan")))?;
            if entry.state != EntryState::InProgress {
                return Err(Error::Other(format!(
                    "pattern '{pattern}' is {}, expected in progress",
                    entry.state.tag()
                )));
            }
            entry.state = EntryState::Skipped;
            Ok(vec![(
                pattern.to_string(),
                EntryState::InProgress,
                EntryState::Skipped,
            )])
        })
    }

    /// Skipped → InProgress, preserving the original `started_at`.
    pub fn resume(&self, pattern: &str) -> Result<()> {
        self.mutate(|plan| {
            let mut changes = Vec::new();

            if let Some(current) = plan.in_progress().map(str::to_string) {
                if current == pattern {
                    return Ok(changes);
                }
                tracing::warn!(
                    demoted = %current,
                    resumed = %pattern,
                    "another pattern was in progress, demoting it to pending"
                );
                if let Some(entry) = plan.problems.get_mut(&current) {
                    entry.state = EntryState::Pending;
                    entry.started_at = None;
                }
                changes.push((current, EntryState::InProgress, EntryState::Pending));
            }

            let entry = plan
                .problems
                .get_mut(pattern)
                .ok_or_else(|| Error::NotFound(format!("pattern '{pattern}' in today's plan")))?;
            if entry.state != EntryState::Skipped {
                return Err(Error::Other(format!(
                    "pattern '{pattern}' is {}, expected skipped",
                    entry.state.tag()
                )));
            }
            entry.state = EntryState::InProgress;
            changes.push((pattern.to_string(), EntryState::Skipped, EntryState::InProgress));
            Ok(changes)
        })
    }

    // ── Counts ───────────────────────────────────────────────────────

    pub fn completed_count(&self) -> usize {
        self.state.lock().plan.count(EntryState::Completed)
    }

    pub fn skipped_count(&self) -> usize {
        self.state.lock().plan.count(EntryState::Skipped)
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().plan.count(EntryState::Pending)
    }

    pub fn in_progress_count(&self) -> usize {
        self.state.lock().plan.count(EntryState::InProgress)
    }

    pub fn total(&self) -> usize {
        self.state.lock().plan.total()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Apply a transition to a copy of the plan, persist it, then commit.
    fn mutate<F>(&self, transition: F) -> Result<()>
    where
        F: FnOnce(&mut DailyPlan) -> Result<Vec<(String, EntryState, EntryState)>>,
    {
        let mut state = self.state.lock();
        let mut candidate = state.plan.clone();
        let changes = transition(&mut candidate)?;
        if changes.is_empty() {
            return Ok(());
        }
        write_json(&self.plan_path, &candidate)?;
        state.plan = candidate;

        for (pattern, from, to) in changes {
            TraceEvent::PlanStateChanged {
                date: self.date.format("%Y-%m-%d").to_string(),
                pattern,
                from: from.tag().to_string(),
                to: to.tag().to_string(),
            }
            .emit();
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_config(root: &Path) -> Config {
        Config {
            root: root.to_path_buf(),
            ..Config::default()
        }
    }

    fn seed_problem(config: &Config, id: &str, pattern: &str) {
        let dir = config.problems_dir().join(pattern);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{id}.json")),
            format!(
                r#"{{
                  "id": "{id}",
                  "title": "{id}",
                  "difficulty": "easy",
                  "patterns": ["{pattern}"],
                  "description": "d",
                  "starter_code": {{"python": "def solve(x):\n    pass\n"}},
                  "solutions": {{"python": "def solve(x):\n    return x\n"}},
                  "test_cases": [{{"input": "1", "expected": "1"}}]
                }}"#
            ),
        )
        .unwrap();
    }

    fn fixture(root: &Path) -> (Config, ProblemStore) {
        let config = fixture_config(root);
        seed_problem(&config, "window-max", "sliding-window");
        seed_problem(&config, "two-sum", "hash-map");
        seed_problem(&config, "islands", "dfs");
        let store = ProblemStore::load(&config.problems_dir()).unwrap();
        (config, store)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn plan_covers_patterns_with_problems() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();

        assert_eq!(scheduler.total(), 3);
        assert_eq!(scheduler.pending_count(), 3);
        assert!(scheduler.entry("hash-map").is_some());
        assert!(scheduler.entry("heap").is_none());
    }

    #[test]
    fn same_date_reload_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let first = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();
        let second = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();
        assert_eq!(first.plan(), second.plan());
    }

    #[test]
    fn next_pending_follows_canonical_order() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();

        let (pattern, _) = scheduler.next_pending().unwrap();
        assert_eq!(pattern, "sliding-window");

        scheduler.start("sliding-window").unwrap();
        scheduler.complete("sliding-window").unwrap();
        let (pattern, _) = scheduler.next_pending().unwrap();
        assert_eq!(pattern, "hash-map");
    }

    #[test]
    fn start_sets_started_at_and_demotes_previous() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();

        scheduler.start("hash-map").unwrap();
        assert!(scheduler.entry("hash-map").unwrap().started_at.is_some());
        assert_eq!(scheduler.in_progress_count(), 1);

        scheduler.start("dfs").unwrap();
        assert_eq!(scheduler.in_progress_count(), 1);
        let demoted = scheduler.entry("hash-map").unwrap();
        assert_eq!(demoted.state, EntryState::Pending);
        assert!(demoted.started_at.is_none());
    }

    #[test]
    fn completion_extends_streak_from_previous_day() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());

        std::fs::create_dir_all(config.daily_dir()).unwrap();
        let prior = StreakRecord {
            current_streak: 3,
            longest_streak: 3,
            last_practiced: Some(day(1)),
        };
        std::fs::write(
            config.progress_path(),
            serde_json::to_string(&prior).unwrap(),
        )
        .unwrap();

        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();
        scheduler.start("hash-map").unwrap();
        scheduler.complete("hash-map").unwrap();

        let streak = scheduler.streak();
        assert_eq!(streak.current_streak, 4);
        assert_eq!(streak.longest_streak, 4);
        assert_eq!(streak.last_practiced, Some(day(2)));

        // The second completion of the day leaves the streak alone.
        scheduler.start("dfs").unwrap();
        scheduler.complete("dfs").unwrap();
        assert_eq!(scheduler.streak().current_streak, 4);
    }

    #[test]
    fn skip_then_resume_preserves_started_at() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();

        scheduler.start("sliding-window").unwrap();
        let started_at = scheduler.entry("sliding-window").unwrap().started_at;
        scheduler.skip("sliding-window").unwrap();
        assert_eq!(scheduler.skipped_count(), 1);

        scheduler.resume("sliding-window").unwrap();
        let entry = scheduler.entry("sliding-window").unwrap();
        assert_eq!(entry.state, EntryState::InProgress);
        assert_eq!(entry.started_at, started_at);
    }

    #[test]
    fn transitions_reject_wrong_states() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();

        assert!(scheduler.complete("hash-map").is_err());
        assert!(scheduler.skip("hash-map").is_err());
        assert!(scheduler.resume("hash-map").is_err());
        assert!(matches!(
            scheduler.start("heap"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn transitions_survive_a_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        {
            let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();
            scheduler.start("hash-map").unwrap();
            scheduler.complete("hash-map").unwrap();
        }
        let reloaded = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();
        assert_eq!(reloaded.completed_count(), 1);
        assert_eq!(
            reloaded.entry("hash-map").unwrap().state,
            EntryState::Completed
        );
    }

    #[test]
    fn all_handled_yields_none() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, store) = fixture(tmp.path());
        let scheduler = DailyScheduler::load_or_create(&config, &store, day(2), None).unwrap();

        for pattern in ["sliding-window", "hash-map", "dfs"] {
            scheduler.start(pattern).unwrap();
            scheduler.complete(pattern).unwrap();
        }
        assert!(scheduler.next_pending().is_none());
        assert_eq!(scheduler.completed_count(), 3);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
