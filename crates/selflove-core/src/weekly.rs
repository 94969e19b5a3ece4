//! Weekly challenge window: a Mon-Sun completion tracker that resets every
//! ISO week.
//!
//! Rollover is lazy -- evaluated whenever the state is read, never on a
//! timer. A stored window from a past week is replaced by an empty window
//! anchored at the current week's Monday.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: u8 = 7;

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ISO day number for `date`: Monday = 1 .. Sunday = 7.
pub fn day_number(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyChallengeState {
    /// Monday anchoring this window.
    pub week_start: NaiveDate,
    /// Completed day numbers (1-7), set semantics.
    #[serde(default)]
    pub completed: Vec<u8>,
}

impl WeeklyChallengeState {
    /// Empty window for the week containing `date`.
    pub fn for_week_of(date: NaiveDate) -> Self {
        Self {
            week_start: week_start(date),
            completed: Vec::new(),
        }
    }

    /// Reset when the stored Monday no longer matches `today`'s week.
    ///
    /// Returns `true` if the window rolled over.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let monday = week_start(today);
        if self.week_start == monday {
            return false;
        }
        *self = Self {
            week_start: monday,
            completed: Vec::new(),
        };
        true
    }

    /// Mark `day` (1-7) completed. Idempotent; out-of-range days are
    /// ignored. Returns `true` if the set changed.
    pub fn complete_day(&mut self, day: u8) -> bool {
        if !(1..=DAYS_PER_WEEK).contains(&day) || self.completed.contains(&day) {
            return false;
        }
        self.completed.push(day);
        true
    }

    pub fn is_completed(&self, day: u8) -> bool {
        self.completed.contains(&day)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn week_start_is_monday_for_every_weekday() {
        // 2026-08-03 is a Monday.
        for d in 3..=9 {
            assert_eq!(week_start(date(&format!("2026-08-0{d}"))), date("2026-08-03"));
        }
        assert_eq!(week_start(date("2026-08-10")), date("2026-08-10"));
    }

    #[test]
    fn day_numbers_run_monday_to_sunday() {
        assert_eq!(day_number(date("2026-08-03")), 1);
        assert_eq!(day_number(date("2026-08-09")), 7);
    }

    #[test]
    fn stale_window_rolls_over_to_current_monday() {
        let mut weekly = WeeklyChallengeState {
            week_start: date("2026-07-27"),
            completed: vec![1, 2, 3],
        };
        assert!(weekly.roll_over(date("2026-08-06")));
        assert_eq!(weekly.week_start, date("2026-08-03"));
        assert!(weekly.completed.is_empty());
    }

    #[test]
    fn same_week_does_not_roll() {
        let mut weekly = WeeklyChallengeState {
            week_start: date("2026-08-03"),
            completed: vec![2],
        };
        assert!(!weekly.roll_over(date("2026-08-09")));
        assert_eq!(weekly.completed, vec![2]);
    }

    #[test]
    fn complete_day_is_idempotent() {
        let mut weekly = WeeklyChallengeState::for_week_of(date("2026-08-06"));
        assert!(weekly.complete_day(4));
        assert!(!weekly.complete_day(4));
        assert_eq!(weekly.completed_count(), 1);
        assert!(weekly.is_completed(4));
    }

    #[test]
    fn out_of_range_days_are_ignored() {
        let mut weekly = WeeklyChallengeState::for_week_of(date("2026-08-06"));
        assert!(!weekly.complete_day(0));
        assert!(!weekly.complete_day(8));
        assert!(weekly.completed.is_empty());
    }
}
