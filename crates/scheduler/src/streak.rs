//! Consecutive-day streak arithmetic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted at `daily/progress.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<NaiveDate>,
}

impl StreakRecord {
    /// Account for a completion on `today`.
    ///
    /// A gap of exactly one day extends the streak; the same day changes
    /// nothing; anything longer (or a fresh record) restarts at 1.
    pub fn record_completion(&mut self, today: NaiveDate) {
        match self.last_practiced {
            Some(last) if today == last => return,
            Some(last) if (today - last).num_days() == 1 => {
                self.current_streak += 1;
            }
            _ => {
                self.current_streak = 1;
            }
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_practiced = Some(today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn consecutive_day_extends() {
        let mut streak = StreakRecord {
            current_streak: 3,
            longest_streak: 5,
            last_practiced: Some(day(1)),
        };
        streak.record_completion(day(2));
        assert_eq!(streak.current_streak, 4);
        assert_eq!(streak.longest_streak, 5);
        assert_eq!(streak.last_practiced, Some(day(2)));
    }

    #[test]
    fn same_day_is_a_no_op() {
        let mut streak = StreakRecord {
            current_streak: 3,
            longest_streak: 3,
            last_practiced: Some(day(2)),
        };
        streak.record_completion(day(2));
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.last_practiced, Some(day(2)));
    }

    #[test]
    fn gap_resets_to_one() {
        let mut streak = StreakRecord {
            current_streak: 7,
            longest_streak: 7,
            last_practiced: Some(day(1)),
        };
        streak.record_completion(day(4));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 7);
    }

    #[test]
    fn fresh_record_starts_at_one() {
        let mut streak = StreakRecord::default();
        streak.record_completion(day(1));
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.longest_streak, 1);
    }

    #[test]
    fn longest_tracks_current() {
        let mut streak = StreakRecord {
            current_streak: 5,
            longest_streak: 5,
            last_practiced: Some(day(1)),
        };
        streak.record_completion(day(2));
        assert_eq!(streak.longest_streak, 6);
        assert!(streak.longest_streak >= streak.current_streak);
        assert!(streak.current_streak >= 1);
    }
}
