//! The progress engine: reads, mutates, and persists every record.
//!
//! The engine owns an injected [`StateStore`] and holds no entity state
//! between calls -- each operation reads current state, mutates it,
//! persists it, and returns it. Every operation is total: a read failure
//! (missing or corrupt record) falls back to the documented default, and a
//! write failure is dropped so the computed in-memory result still reaches
//! the caller. An action may come back non-durable, but it never fails.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::affirmations;
use crate::badges::{self, BadgeId, BadgeSnapshot};
use crate::error::{CoreError, Result};
use crate::journal::{JournalDraft, JournalEntry};
use crate::profile::{Settings, UserProfile};
use crate::progress::{ActivityLevel, DailyLog, DailyTask, DayProgress};
use crate::stats::{PlayerStats, XpGain, XP_AFFIRMATION, XP_CHALLENGE, XP_JOURNAL, XP_MIRROR, XP_WEEKLY_DAY};
use crate::storage::{keys, SqliteStore, StateStore};
use crate::streak::StreakState;
use crate::weekly::WeeklyChallengeState;

/// State returned to the presentation layer after a completed action:
/// enough to render the result without another read.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// Today's task flags after the action.
    pub today: DayProgress,
    pub stats: PlayerStats,
    /// True if the action's XP grant crossed a level threshold.
    pub leveled_up: bool,
    /// Newly earned badges, evaluation order. The first is the primary
    /// celebration event.
    pub new_badges: Vec<BadgeId>,
}

/// Result of per-launch session activation.
#[derive(Debug, Clone)]
pub struct SessionActivation {
    pub streak: StreakState,
    pub stats: PlayerStats,
    pub new_badges: Vec<BadgeId>,
}

/// Record-owning facade over the persistence port.
pub struct ProgressEngine<S: StateStore> {
    store: S,
}

impl ProgressEngine<SqliteStore> {
    /// Open the engine over the default on-disk store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be opened.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(SqliteStore::open()?))
    }
}

impl<S: StateStore> ProgressEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Record plumbing ──────────────────────────────────────────────

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read(key).unwrap_or_default()
    }

    /// Best-effort write. A full or unavailable store must not fail the
    /// action, so the result is discarded.
    fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Ok(raw) = serde_json::to_string(value) {
            let _ = self.store.set(key, &raw);
        }
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    // ── User & settings ──────────────────────────────────────────────

    pub fn user(&self) -> UserProfile {
        self.read_or_default(keys::USER)
    }

    pub fn set_user(&mut self, user: &UserProfile) {
        self.write(keys::USER, user);
    }

    pub fn settings(&self) -> Settings {
        self.read_or_default(keys::SETTINGS)
    }

    pub fn set_settings(&mut self, settings: &Settings) {
        self.write(keys::SETTINGS, settings);
    }

    // ── Daily progress ───────────────────────────────────────────────

    /// The full date map with today's record materialized (all flags false
    /// if the user has not acted yet today).
    pub fn daily_progress(&self) -> DailyLog {
        let mut log: DailyLog = self.read_or_default(keys::DAILY);
        log.ensure_day(self.today());
        log
    }

    pub fn today_progress(&self) -> DayProgress {
        self.daily_progress().day(self.today())
    }

    /// Apply a single flag mutation for today and persist the whole map.
    pub fn set_daily_task(&mut self, task: DailyTask, done: bool) -> DayProgress {
        let mut log = self.daily_progress();
        let day = log.set_task(self.today(), task, done);
        self.write(keys::DAILY, &log);
        day
    }

    /// Derived calendar view. Always recomputed from the stored flags,
    /// never cached.
    pub fn activity_levels(&self) -> BTreeMap<NaiveDate, ActivityLevel> {
        self.read_or_default::<DailyLog>(keys::DAILY).activity_levels()
    }

    // ── Streak ───────────────────────────────────────────────────────

    pub fn streak(&self) -> StreakState {
        self.read_or_default(keys::STREAK)
    }

    /// Apply the once-per-day streak rule for today. Idempotent within a
    /// calendar date.
    pub fn update_streak(&mut self) -> StreakState {
        let mut streak = self.streak();
        if streak.advance(self.today()) {
            self.write(keys::STREAK, &streak);
        }
        streak
    }

    // ── XP & lifetime counters ───────────────────────────────────────

    pub fn stats(&self) -> PlayerStats {
        self.read_or_default(keys::STATS)
    }

    /// Grant XP, normalizing across however many level thresholds the
    /// grant crosses.
    pub fn add_xp(&mut self, amount: u32) -> XpGain {
        let mut stats = self.stats();
        let leveled_up = stats.add_xp(amount);
        self.write(keys::STATS, &stats);
        XpGain { stats, leveled_up }
    }

    /// Increment a named lifetime counter. Unknown names are a silent
    /// no-op, not an error.
    pub fn increment_stat(&mut self, name: &str) -> PlayerStats {
        let mut stats = self.stats();
        stats.increment(name);
        self.write(keys::STATS, &stats);
        stats
    }

    // ── Journal ──────────────────────────────────────────────────────

    /// All entries, newest first.
    pub fn journals(&self) -> Vec<JournalEntry> {
        self.read_or_default(keys::JOURNALS)
    }

    /// The `n` most recent entries.
    pub fn recent_journals(&self, n: usize) -> Vec<JournalEntry> {
        self.journals().into_iter().take(n).collect()
    }

    /// Assign an id and timestamp, prepend, persist.
    pub fn add_journal(&mut self, draft: JournalDraft) -> JournalEntry {
        let mut journals = self.journals();
        let last_id = journals.iter().map(|entry| entry.id).max();
        let entry = JournalEntry::from_draft(draft, Utc::now(), last_id);
        journals.insert(0, entry.clone());
        self.write(keys::JOURNALS, &journals);
        entry
    }

    // ── Affirmations ─────────────────────────────────────────────────

    pub fn fav_affirmations(&self) -> Vec<String> {
        self.read_or_default(keys::FAV_AFFIRMATIONS)
    }

    pub fn is_fav_affirmation(&self, text: &str) -> bool {
        affirmations::is_favorite(&self.fav_affirmations(), text)
    }

    /// Toggle membership. Returns `true` if the text is a favorite after
    /// the call.
    pub fn toggle_fav_affirmation(&mut self, text: &str) -> bool {
        let mut favs = self.fav_affirmations();
        let now_favorite = affirmations::toggle_favorite(&mut favs, text);
        self.write(keys::FAV_AFFIRMATIONS, &favs);
        now_favorite
    }

    pub fn custom_affirmations(&self) -> Vec<String> {
        self.read_or_default(keys::CUSTOM_AFFIRMATIONS)
    }

    /// Append a user-authored affirmation; exact duplicates are silently
    /// ignored. Returns the stored list.
    pub fn add_custom_affirmation(&mut self, text: &str) -> Vec<String> {
        let mut customs = self.custom_affirmations();
        if affirmations::add_custom(&mut customs, text) {
            self.write(keys::CUSTOM_AFFIRMATIONS, &customs);
        }
        customs
    }

    // ── Weekly challenge ─────────────────────────────────────────────

    /// Current window, rolling over lazily when the stored Monday is no
    /// longer this week's.
    pub fn weekly_progress(&mut self) -> WeeklyChallengeState {
        let today = self.today();
        match self.read::<WeeklyChallengeState>(keys::WEEKLY) {
            Some(mut weekly) => {
                if weekly.roll_over(today) {
                    self.write(keys::WEEKLY, &weekly);
                }
                weekly
            }
            None => {
                let weekly = WeeklyChallengeState::for_week_of(today);
                self.write(keys::WEEKLY, &weekly);
                weekly
            }
        }
    }

    /// Idempotently mark a day (1-7) of the current window completed.
    pub fn complete_weekly_day(&mut self, day: u8) -> WeeklyChallengeState {
        let mut weekly = self.weekly_progress();
        if weekly.complete_day(day) {
            self.write(keys::WEEKLY, &weekly);
        }
        weekly
    }

    // ── Counters ─────────────────────────────────────────────────────

    pub fn mirror_count(&self) -> u32 {
        self.read_or_default(keys::MIRROR_COUNT)
    }

    pub fn increment_mirror_count(&mut self) -> u32 {
        let count = self.mirror_count() + 1;
        self.write(keys::MIRROR_COUNT, &count);
        count
    }

    pub fn challenge_count(&self) -> u32 {
        self.read_or_default(keys::CHALLENGE_COUNT)
    }

    pub fn increment_challenge_count(&mut self) -> u32 {
        let count = self.challenge_count() + 1;
        self.write(keys::CHALLENGE_COUNT, &count);
        count
    }

    // ── Badges ───────────────────────────────────────────────────────

    pub fn earned_badges(&self) -> Vec<BadgeId> {
        self.read_or_default(keys::BADGES)
    }

    /// Idempotent award. Returns `true` only the first time.
    pub fn earn_badge(&mut self, id: BadgeId) -> bool {
        let mut earned = self.earned_badges();
        let newly = badges::earn(&mut earned, id);
        if newly {
            self.write(keys::BADGES, &earned);
        }
        newly
    }

    /// Evaluate every unlock rule against current state, persisting all
    /// newly satisfied badges. Returns them in rule-table order.
    pub fn check_badges(&mut self) -> Vec<BadgeId> {
        let snapshot = BadgeSnapshot {
            streak_current: self.streak().current,
            journal_count: self.journals().len(),
            mirror_count: self.mirror_count(),
            challenge_count: self.challenge_count(),
            level: self.stats().level,
        };
        let mut earned = self.earned_badges();
        let newly = badges::evaluate(&mut earned, &snapshot);
        if !newly.is_empty() {
            self.write(keys::BADGES, &earned);
        }
        newly
    }

    // ── Action flows ─────────────────────────────────────────────────

    /// Per-launch activation: advance the streak, award the first-step
    /// badge, recount active days, and evaluate unlock rules.
    pub fn activate_session(&mut self) -> SessionActivation {
        let streak = self.update_streak();

        let mut new_badges = Vec::new();
        if self.earn_badge(BadgeId::FirstStep) {
            new_badges.push(BadgeId::FirstStep);
        }

        // total_days is derived from the activity map but stored with the
        // stats record; recounted on every activation.
        let mut stats = self.stats();
        stats.total_days = self.activity_levels().len() as u32;
        self.write(keys::STATS, &stats);

        new_badges.extend(self.check_badges());
        SessionActivation {
            streak,
            stats,
            new_badges,
        }
    }

    /// The daily affirmation was read aloud.
    pub fn complete_affirmation(&mut self) -> ActionOutcome {
        let today = self.set_daily_task(DailyTask::Affirmation, true);
        self.increment_stat("total_affirmations");
        let gain = self.add_xp(XP_AFFIRMATION);
        let new_badges = self.check_badges();
        ActionOutcome {
            today,
            stats: gain.stats,
            leveled_up: gain.leveled_up,
            new_badges,
        }
    }

    /// Save a journal entry and credit the daily task.
    pub fn save_journal(&mut self, draft: JournalDraft) -> (JournalEntry, ActionOutcome) {
        let entry = self.add_journal(draft);
        let today = self.set_daily_task(DailyTask::Journal, true);
        let gain = self.add_xp(XP_JOURNAL);
        let new_badges = self.check_badges();
        (
            entry,
            ActionOutcome {
                today,
                stats: gain.stats,
                leveled_up: gain.leveled_up,
                new_badges,
            },
        )
    }

    /// A mindfulness challenge finished. `xp` overrides the default award
    /// for challenges that grant more.
    pub fn complete_challenge(&mut self, xp: Option<u32>) -> ActionOutcome {
        let today = self.set_daily_task(DailyTask::Challenge, true);
        self.increment_challenge_count();
        self.increment_stat("total_challenges");
        let gain = self.add_xp(xp.unwrap_or(XP_CHALLENGE));
        let new_badges = self.check_badges();
        ActionOutcome {
            today,
            stats: gain.stats,
            leveled_up: gain.leveled_up,
            new_badges,
        }
    }

    /// A mirror-work session was explicitly completed.
    pub fn complete_mirror_session(&mut self) -> ActionOutcome {
        let today = self.set_daily_task(DailyTask::Mirror, true);
        self.increment_mirror_count();
        self.increment_stat("total_mirror_sessions");
        let gain = self.add_xp(XP_MIRROR);
        let new_badges = self.check_badges();
        ActionOutcome {
            today,
            stats: gain.stats,
            leveled_up: gain.leveled_up,
            new_badges,
        }
    }

    /// A weekly-challenge day was completed.
    pub fn record_weekly_day(&mut self, day: u8) -> (WeeklyChallengeState, ActionOutcome) {
        let weekly = self.complete_weekly_day(day);
        let gain = self.add_xp(XP_WEEKLY_DAY);
        let new_badges = self.check_badges();
        (
            weekly,
            ActionOutcome {
                today: self.today_progress(),
                stats: gain.stats,
                leveled_up: gain.leveled_up,
                new_badges,
            },
        )
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Concatenate every record into one JSON document for download.
    /// Absent records export as `null`.
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized.
    pub fn export_data(&self) -> Result<String> {
        let mut doc = Map::new();
        for key in keys::ALL {
            let value = match self.store.get(key).ok().flatten() {
                Some(raw) => serde_json::from_str(&raw).unwrap_or(Value::Null),
                None => Value::Null,
            };
            doc.insert(key.to_string(), value);
        }
        Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
    }

    /// Restore every known record from an exported document. Unknown keys
    /// and `null` records are skipped.
    ///
    /// # Errors
    /// Returns an error if `data` is not a JSON object.
    pub fn import_data(&mut self, data: &str) -> Result<()> {
        let doc: Value = serde_json::from_str(data)?;
        let map = doc
            .as_object()
            .ok_or_else(|| CoreError::Custom("export document must be a JSON object".into()))?;

        for key in keys::ALL {
            if let Some(value) = map.get(key) {
                if value.is_null() {
                    continue;
                }
                if let Ok(raw) = serde_json::to_string(value) {
                    let _ = self.store.set(key, &raw);
                }
            }
        }
        Ok(())
    }
}
