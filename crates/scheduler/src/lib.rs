//! Daily-scales scheduling: per-date plans over the eleven patterns, with
//! streak accounting.

mod plan;
mod scheduler;
mod streak;

pub use plan::{DailyEntry, DailyPlan, EntryState};
pub use scheduler::DailyScheduler;
pub use streak::StreakRecord;
