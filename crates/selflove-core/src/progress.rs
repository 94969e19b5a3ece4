//! Daily task tracking and the activity-derived calendar.
//!
//! One [`DayProgress`] record exists per date the user was active. The
//! calendar view is a pure function over the stored map -- it is never
//! cached, so it cannot diverge from the flags.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The four daily self-care tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyTask {
    Affirmation,
    Journal,
    Challenge,
    Mirror,
}

impl DailyTask {
    pub const ALL: [DailyTask; 4] = [
        DailyTask::Affirmation,
        DailyTask::Journal,
        DailyTask::Challenge,
        DailyTask::Mirror,
    ];
}

/// Completion flags for one calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    #[serde(default)]
    pub affirmation: bool,
    #[serde(default)]
    pub journal: bool,
    #[serde(default)]
    pub challenge: bool,
    #[serde(default)]
    pub mirror: bool,
}

impl DayProgress {
    pub fn set(&mut self, task: DailyTask, done: bool) {
        match task {
            DailyTask::Affirmation => self.affirmation = done,
            DailyTask::Journal => self.journal = done,
            DailyTask::Challenge => self.challenge = done,
            DailyTask::Mirror => self.mirror = done,
        }
    }

    pub fn done(&self, task: DailyTask) -> bool {
        match task {
            DailyTask::Affirmation => self.affirmation,
            DailyTask::Journal => self.journal,
            DailyTask::Challenge => self.challenge,
            DailyTask::Mirror => self.mirror,
        }
    }

    pub fn completed_count(&self) -> u32 {
        [self.affirmation, self.journal, self.challenge, self.mirror]
            .iter()
            .filter(|&&done| done)
            .count() as u32
    }

    /// 0..=100 completion percentage for the progress ring.
    pub fn completion_pct(&self) -> u32 {
        self.completed_count() * 100 / DailyTask::ALL.len() as u32
    }
}

/// Calendar activity classification for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// 3 or 4 of the daily tasks done.
    Full,
    /// 1 or 2 done.
    Partial,
}

impl ActivityLevel {
    /// Dates with zero completed tasks classify as absent (`None`).
    pub fn classify(day: DayProgress) -> Option<Self> {
        match day.completed_count() {
            0 => None,
            1 | 2 => Some(ActivityLevel::Partial),
            _ => Some(ActivityLevel::Full),
        }
    }
}

/// Date-keyed map of daily completion flags. Entries are never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLog(BTreeMap<NaiveDate, DayProgress>);

impl DailyLog {
    /// Lazily materialize the record for `date` with all flags false.
    pub fn ensure_day(&mut self, date: NaiveDate) -> &mut DayProgress {
        self.0.entry(date).or_default()
    }

    pub fn day(&self, date: NaiveDate) -> DayProgress {
        self.0.get(&date).copied().unwrap_or_default()
    }

    /// Apply a single flag mutation for `date`, materializing it if needed.
    pub fn set_task(&mut self, date: NaiveDate, task: DailyTask, done: bool) -> DayProgress {
        let day = self.ensure_day(date);
        day.set(task, done);
        *day
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayProgress)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Derived calendar view: dates with at least one completed task.
    pub fn activity_levels(&self) -> BTreeMap<NaiveDate, ActivityLevel> {
        self.0
            .iter()
            .filter_map(|(date, day)| ActivityLevel::classify(*day).map(|level| (*date, level)))
            .collect()
    }

    /// Number of dates with any activity at all.
    pub fn active_days(&self) -> u32 {
        self.0
            .values()
            .filter(|day| day.completed_count() > 0)
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn ensure_day_materializes_all_false() {
        let mut log = DailyLog::default();
        let day = *log.ensure_day(date("2026-08-06"));
        assert_eq!(day, DayProgress::default());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn set_task_flips_one_flag() {
        let mut log = DailyLog::default();
        let day = log.set_task(date("2026-08-06"), DailyTask::Journal, true);
        assert!(day.journal);
        assert!(!day.affirmation && !day.challenge && !day.mirror);
    }

    #[test]
    fn three_of_four_classifies_full() {
        let mut day = DayProgress::default();
        day.set(DailyTask::Affirmation, true);
        day.set(DailyTask::Journal, true);
        day.set(DailyTask::Challenge, true);
        assert_eq!(ActivityLevel::classify(day), Some(ActivityLevel::Full));
    }

    #[test]
    fn one_or_two_classifies_partial() {
        let mut day = DayProgress::default();
        day.set(DailyTask::Mirror, true);
        assert_eq!(ActivityLevel::classify(day), Some(ActivityLevel::Partial));
        day.set(DailyTask::Journal, true);
        assert_eq!(ActivityLevel::classify(day), Some(ActivityLevel::Partial));
    }

    #[test]
    fn zero_done_is_absent_from_activity_map() {
        let mut log = DailyLog::default();
        log.ensure_day(date("2026-08-05"));
        log.set_task(date("2026-08-06"), DailyTask::Mirror, true);
        let activity = log.activity_levels();
        assert!(!activity.contains_key(&date("2026-08-05")));
        assert_eq!(activity.get(&date("2026-08-06")), Some(&ActivityLevel::Partial));
        assert_eq!(log.active_days(), 1);
    }

    #[test]
    fn completion_pct() {
        let mut day = DayProgress::default();
        assert_eq!(day.completion_pct(), 0);
        day.set(DailyTask::Affirmation, true);
        day.set(DailyTask::Mirror, true);
        assert_eq!(day.completion_pct(), 50);
    }

    #[test]
    fn serializes_with_date_keys() {
        let mut log = DailyLog::default();
        log.set_task(date("2026-08-06"), DailyTask::Affirmation, true);
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"2026-08-06\""));
        let parsed: DailyLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log);
    }
}
