//! Derivations over the record log.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::SessionRecord;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSummary {
    pub total_sessions: usize,
    pub solved: usize,
    pub solve_rate: f64,
    pub total_duration_ms: u64,
    pub avg_duration_ms: u64,
    pub patterns_touched: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternStats {
    pub attempted: usize,
    pub solved: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayTrend {
    pub date: NaiveDate,
    pub attempted: usize,
    pub solved: usize,
}

pub fn summarize(records: &[SessionRecord]) -> StatsSummary {
    let total_sessions = records.len();
    let solved = records.iter().filter(|r| r.solved).count();
    let total_duration_ms: u64 = records.iter().map(|r| r.duration_ms).sum();
    let patterns: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.patterns.iter().map(String::as_str))
        .collect();

    StatsSummary {
        total_sessions,
        solved,
        solve_rate: if total_sessions == 0 {
            0.0
        } else {
            solved as f64 / total_sessions as f64
        },
        total_duration_ms,
        avg_duration_ms: if total_sessions == 0 {
            0
        } else {
            total_duration_ms / total_sessions as u64
        },
        patterns_touched: patterns.len(),
    }
}

pub fn by_pattern(records: &[SessionRecord]) -> BTreeMap<String, PatternStats> {
    let mut map: BTreeMap<String, PatternStats> = BTreeMap::new();
    for record in records {
        for pattern in &record.patterns {
            let entry = map.entry(pattern.clone()).or_default();
            entry.attempted += 1;
            if record.solved {
                entry.solved += 1;
            }
        }
    }
    map
}

/// Per-day counts for the trailing window ending at `today`, oldest first.
/// Days with no activity appear with zero counts.
pub fn trends(records: &[SessionRecord], days: u32, today: NaiveDate) -> Vec<DayTrend> {
    let days = days.max(1);
    let mut window: Vec<DayTrend> = (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(back as u64)))
        .map(|date| DayTrend {
            date,
            attempted: 0,
            solved: 0,
        })
        .collect();

    for record in records {
        let date = record.end_time.date_naive();
        if let Some(day) = window.iter_mut().find(|d| d.date == date) {
            day.attempted += 1;
            if record.solved {
                day.solved += 1;
            }
        }
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use scales_domain::types::{Language, Mode};

    fn record_on(day: u32, solved: bool, pattern: &str) -> SessionRecord {
        let start = Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap();
        SessionRecord {
            problem_id: format!("p{day}"),
            patterns: vec![pattern.into()],
            language: Language::Go,
            mode: Mode::Learn,
            start_time: start,
            end_time: start + chrono::Duration::minutes(10),
            duration_ms: 600_000,
            solved,
            hint_count: 1,
        }
    }

    #[test]
    fn summary_math() {
        let records = vec![
            record_on(1, true, "dfs"),
            record_on(2, false, "dfs"),
            record_on(3, true, "bfs"),
        ];
        let s = summarize(&records);
        assert_eq!(s.total_sessions, 3);
        assert_eq!(s.solved, 2);
        assert!((s.solve_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.avg_duration_ms, 600_000);
        assert_eq!(s.patterns_touched, 2);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let s = summarize(&[]);
        assert_eq!(s.total_sessions, 0);
        assert_eq!(s.solve_rate, 0.0);
    }

    #[test]
    fn pattern_breakdown() {
        let records = vec![record_on(1, true, "dfs"), record_on(2, false, "dfs")];
        let map = by_pattern(&records);
        assert_eq!(map["dfs"].attempted, 2);
        assert_eq!(map["dfs"].solved, 1);
    }

    #[test]
    fn trend_window_includes_quiet_days() {
        let records = vec![record_on(2, true, "dfs")];
        let today = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        let window = trends(&records, 4, today);
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(window[1].attempted, 1);
        assert_eq!(window[1].solved, 1);
        assert_eq!(window[3].attempted, 0);
    }
}
