//! Player XP, levels, and lifetime counters.
//!
//! Leveling is linear: advancing past level L costs L * 100 XP, and `xp`
//! always holds the remainder toward the next level.

use serde::{Deserialize, Serialize};

/// XP awarded for reading/speaking the daily affirmation.
pub const XP_AFFIRMATION: u32 = 10;
/// XP awarded per completed weekly-challenge day.
pub const XP_WEEKLY_DAY: u32 = 15;
/// Default XP for a mindfulness challenge (challenges may override).
pub const XP_CHALLENGE: u32 = 20;
/// XP awarded for saving a journal entry.
pub const XP_JOURNAL: u32 = 25;
/// XP awarded for a completed mirror-work session.
pub const XP_MIRROR: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Remainder toward the next level. Invariant: `xp < level * 100`.
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Number of calendar dates with any activity.
    #[serde(default)]
    pub total_days: u32,
    #[serde(default)]
    pub total_affirmations: u32,
    #[serde(default)]
    pub total_challenges: u32,
    #[serde(default)]
    pub total_mirror_sessions: u32,
}

fn default_level() -> u32 {
    1
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_days: 0,
            total_affirmations: 0,
            total_challenges: 0,
            total_mirror_sessions: 0,
        }
    }
}

impl PlayerStats {
    /// XP required to advance past the current level.
    pub fn xp_for_next_level(&self) -> u32 {
        self.level * 100
    }

    /// Grant XP and normalize against the linear threshold.
    ///
    /// A single large grant can cross several thresholds; every crossing is
    /// applied before returning. Returns `true` if at least one level was
    /// gained.
    pub fn add_xp(&mut self, amount: u32) -> bool {
        self.xp += amount;

        let mut leveled_up = false;
        while self.xp >= self.xp_for_next_level() {
            self.xp -= self.xp_for_next_level();
            self.level += 1;
            leveled_up = true;
        }
        leveled_up
    }

    /// Increment a named lifetime counter. Unknown names are a no-op.
    pub fn increment(&mut self, name: &str) {
        match name {
            "total_days" => self.total_days += 1,
            "total_affirmations" => self.total_affirmations += 1,
            "total_challenges" => self.total_challenges += 1,
            "total_mirror_sessions" => self.total_mirror_sessions += 1,
            _ => {}
        }
    }
}

/// Result of an XP grant.
#[derive(Debug, Clone)]
pub struct XpGain {
    pub stats: PlayerStats,
    /// True if the grant crossed at least one level threshold.
    pub leveled_up: bool,
}
