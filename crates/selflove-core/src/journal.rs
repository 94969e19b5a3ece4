//! Mood and gratitude journal records.
//!
//! Entries are immutable once created and stored newest-first. Ids are
//! creation timestamps in epoch milliseconds, bumped when the clock has not
//! advanced past the newest entry so they stay unique and increasing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gratitude lines kept per entry.
pub const MAX_GRATITUDE_ITEMS: usize = 3;

/// Mood recorded with a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Great,
    Good,
    Neutral,
    Down,
    Rough,
}

impl Mood {
    /// 1..=5 scale for the mood history chart.
    pub fn score(self) -> u8 {
        match self {
            Mood::Great => 5,
            Mood::Good => 4,
            Mood::Neutral => 3,
            Mood::Down => 2,
            Mood::Rough => 1,
        }
    }
}

/// Unsaved entry as collected from the journal form.
#[derive(Debug, Clone, Default)]
pub struct JournalDraft {
    pub mood: Option<Mood>,
    pub text: String,
    /// Raw gratitude lines; blanks are dropped on save.
    pub gratitude: Vec<String>,
    /// The writing prompt shown when the entry was written.
    pub prompt: String,
}

impl JournalDraft {
    /// True when there is nothing worth saving.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.gratitude.iter().all(|g| g.trim().is_empty())
    }
}

/// A saved journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Creation timestamp in epoch milliseconds; unique and increasing.
    pub id: i64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub gratitude: Vec<String>,
    #[serde(default)]
    pub prompt: String,
}

impl JournalEntry {
    /// Materialize a draft at `now`.
    ///
    /// `last_id` is the newest existing id; the new id is bumped past it
    /// when two saves land within the same millisecond.
    pub fn from_draft(draft: JournalDraft, now: DateTime<Utc>, last_id: Option<i64>) -> Self {
        let mut id = now.timestamp_millis();
        if let Some(last) = last_id {
            if id <= last {
                id = last + 1;
            }
        }

        let gratitude: Vec<String> = draft
            .gratitude
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .take(MAX_GRATITUDE_ITEMS)
            .collect();

        Self {
            id,
            date: now,
            mood: draft.mood,
            text: draft.text,
            gratitude,
            prompt: draft.prompt,
        }
    }
}
