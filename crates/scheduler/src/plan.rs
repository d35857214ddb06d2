//! The per-date plan model.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// State of one pattern's entry within a daily plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Pending,
    InProgress,
    Skipped,
    Completed,
}

impl EntryState {
    pub fn tag(&self) -> &'static str {
        match self {
            EntryState::Pending => "pending",
            EntryState::InProgress => "in_progress",
            EntryState::Skipped => "skipped",
            EntryState::Completed => "completed",
        }
    }
}

/// One pattern's slot in the plan.  The problem is chosen once and never
/// replaced within the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub problem_id: String,
    pub state: EntryState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A full day's plan: pattern → entry, keyed by calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub problems: BTreeMap<String, DailyEntry>,
}

impl DailyPlan {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            problems: BTreeMap::new(),
        }
    }

    /// The pattern currently in progress, if any.  At most one exists.
    pub fn in_progress(&self) -> Option<&str> {
        self.problems
            .iter()
            .find(|(_, e)| e.state == EntryState::InProgress)
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn count(&self, state: EntryState) -> usize {
        self.problems.values().filter(|e| e.state == state).count()
    }

    pub fn total(&self) -> usize {
        self.problems.len()
    }
}
