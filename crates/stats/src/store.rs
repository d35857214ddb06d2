//! JSONL-backed stats store.
//!
//! Records are appended in `finish()` call order.  Each append rewrites the
//! file through a temp-file-then-rename in the same directory, so readers
//! never observe a torn line.  Reads tolerate malformed lines.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use scales_domain::error::Result;
use scales_domain::trace::TraceEvent;

use crate::record::SessionRecord;
use crate::summary::{self, DayTrend, PatternStats, StatsSummary};

pub struct StatsStore {
    path: PathBuf,
    // Serializes append-rewrite cycles within this process.
    write_lock: Mutex<()>,
}

impl StatsStore {
    /// Open (or lazily create) the store at `stats_dir/sessions.jsonl`.
    pub fn new(stats_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(stats_dir)?;
        Ok(Self {
            path: stats_dir.join("sessions.jsonl"),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record atomically.
    pub fn append(&self, record: &SessionRecord) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut buf = if self.path.exists() {
            std::fs::read_to_string(&self.path)?
        } else {
            String::new()
        };
        if !buf.is_empty() && !buf.ends_with('\n') {
            buf.push('\n');
        }
        buf.push_str(&serde_json::to_string(record)?);
        buf.push('\n');

        let tmp = self.path.with_extension("jsonl.tmp");
        std::fs::write(&tmp, &buf)?;
        std::fs::rename(&tmp, &self.path)?;

        TraceEvent::RecordAppended {
            problem_id: record.problem_id.clone(),
            solved: record.solved,
        }
        .emit();

        Ok(())
    }

    /// Read every record, skipping malformed lines with a warning.
    pub fn read_all(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SessionRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed stats line");
                }
            }
        }
        Ok(records)
    }

    pub fn summary(&self) -> Result<StatsSummary> {
        Ok(summary::summarize(&self.read_all()?))
    }

    pub fn by_pattern(&self) -> Result<std::collections::BTreeMap<String, PatternStats>> {
        Ok(summary::by_pattern(&self.read_all()?))
    }

    /// Per-calendar-day counts over the trailing `days` window ending today.
    pub fn trends(&self, days: u32) -> Result<Vec<DayTrend>> {
        let today = chrono::Local::now().date_naive();
        Ok(summary::trends(&self.read_all()?, days, today))
    }
}
