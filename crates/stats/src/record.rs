use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scales_domain::types::{Language, Mode};

/// A settled attempt.  One JSON line in `stats/sessions.jsonl`; never
/// mutated after write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub problem_id: String,
    pub patterns: Vec<String>,
    pub language: Language,
    pub mode: Mode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: u64,
    pub solved: bool,
    #[serde(default)]
    pub hint_count: u32,
}
