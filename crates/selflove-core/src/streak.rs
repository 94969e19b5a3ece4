//! Consecutive-day streak tracking.
//!
//! A streak counts calendar days with qualifying activity. The advance rule
//! runs at most once per date: a day that follows the last counted date
//! extends the run, any gap restarts it at 1 -- today's activity always
//! counts as streak-day 1, never 0.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub longest: u32,
    /// Last date the streak was advanced. `None` before first use.
    #[serde(default)]
    pub last_counted: Option<NaiveDate>,
}

impl StreakState {
    /// Apply the once-per-day advance rule for `today`.
    ///
    /// Returns `false` when `today` was already counted (the state is
    /// unchanged), `true` when the streak advanced or restarted.
    pub fn advance(&mut self, today: NaiveDate) -> bool {
        if self.last_counted == Some(today) {
            return false;
        }

        let yesterday = today.pred_opt();
        if yesterday.is_some() && self.last_counted == yesterday {
            self.current += 1;
        } else {
            self.current = 1;
        }

        self.last_counted = Some(today);
        if self.current > self.longest {
            self.longest = self.current;
        }
        true
    }
}
