//! Badge identifiers, unlock rules, and the idempotent evaluator.
//!
//! Badge display data (names, icons, descriptions) is catalog content owned
//! by the presentation layer; this module owns only the identifiers and the
//! predicates that unlock them.

use serde::{Deserialize, Serialize};

/// One-time-unlockable achievements.
///
/// Serialized with the stable string ids the persisted earned-set uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeId {
    /// Awarded on first session activation, not via a rule.
    #[serde(rename = "first_step")]
    FirstStep,
    #[serde(rename = "3day_streak")]
    Streak3,
    #[serde(rename = "7day_streak")]
    Streak7,
    #[serde(rename = "14day_streak")]
    Streak14,
    #[serde(rename = "30day_streak")]
    Streak30,
    #[serde(rename = "first_journal")]
    FirstJournal,
    #[serde(rename = "10_journals")]
    TenJournals,
    #[serde(rename = "mirror_master")]
    MirrorMaster,
    #[serde(rename = "challenge_5")]
    FiveChallenges,
    #[serde(rename = "level_5")]
    Level5,
    #[serde(rename = "level_10")]
    Level10,
    #[serde(rename = "self_love_100")]
    SelfLove100,
}

/// Engine state visible to badge predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeSnapshot {
    pub streak_current: u32,
    pub journal_count: usize,
    pub mirror_count: u32,
    pub challenge_count: u32,
    pub level: u32,
}

/// Unlock rules in evaluation order.
///
/// When one pass satisfies several rules, the first in this table is the
/// primary celebration event; all are persisted.
pub const RULES: &[(BadgeId, fn(&BadgeSnapshot) -> bool)] = &[
    (BadgeId::Streak3, |s| s.streak_current >= 3),
    (BadgeId::Streak7, |s| s.streak_current >= 7),
    (BadgeId::Streak14, |s| s.streak_current >= 14),
    (BadgeId::Streak30, |s| s.streak_current >= 30),
    (BadgeId::FirstJournal, |s| s.journal_count >= 1),
    (BadgeId::TenJournals, |s| s.journal_count >= 10),
    (BadgeId::MirrorMaster, |s| s.mirror_count >= 5),
    (BadgeId::FiveChallenges, |s| s.challenge_count >= 5),
    (BadgeId::Level5, |s| s.level >= 5),
    (BadgeId::Level10, |s| s.level >= 10),
    (BadgeId::SelfLove100, |s| s.level >= 20),
];

/// Idempotent set insertion. Returns `true` only the first time `id` is
/// earned; callers use this to avoid re-triggering celebrations.
pub fn earn(earned: &mut Vec<BadgeId>, id: BadgeId) -> bool {
    if earned.contains(&id) {
        false
    } else {
        earned.push(id);
        true
    }
}

/// Run every rule against `snapshot`, recording newly satisfied badges.
///
/// Returns the newly earned ids in table order.
pub fn evaluate(earned: &mut Vec<BadgeId>, snapshot: &BadgeSnapshot) -> Vec<BadgeId> {
    let mut newly = Vec::new();
    for (id, rule) in RULES {
        if rule(snapshot) && earn(earned, *id) {
            newly.push(*id);
        }
    }
    newly
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earn_is_true_exactly_once() {
        let mut earned = Vec::new();
        assert!(earn(&mut earned, BadgeId::FirstStep));
        assert!(!earn(&mut earned, BadgeId::FirstStep));
        assert!(!earn(&mut earned, BadgeId::FirstStep));
        assert_eq!(earned.len(), 1);
    }

    #[test]
    fn evaluate_returns_newly_earned_in_table_order() {
        let snapshot = BadgeSnapshot {
            streak_current: 7,
            journal_count: 1,
            level: 5,
            ..Default::default()
        };
        let mut earned = Vec::new();
        let newly = evaluate(&mut earned, &snapshot);
        assert_eq!(
            newly,
            vec![
                BadgeId::Streak3,
                BadgeId::Streak7,
                BadgeId::FirstJournal,
                BadgeId::Level5,
            ]
        );
    }

    #[test]
    fn evaluate_skips_already_earned() {
        let snapshot = BadgeSnapshot {
            journal_count: 1,
            ..Default::default()
        };
        let mut earned = vec![BadgeId::FirstJournal];
        assert!(evaluate(&mut earned, &snapshot).is_empty());
        assert_eq!(earned, vec![BadgeId::FirstJournal]);
    }

    #[test]
    fn unsatisfied_rules_award_nothing() {
        let mut earned = Vec::new();
        assert!(evaluate(&mut earned, &BadgeSnapshot::default()).is_empty());
        assert!(earned.is_empty());
    }

    #[test]
    fn ids_serialize_with_stable_strings() {
        let earned = vec![BadgeId::Streak3, BadgeId::SelfLove100];
        let json = serde_json::to_string(&earned).unwrap();
        assert_eq!(json, r#"["3day_streak","self_love_100"]"#);
        let parsed: Vec<BadgeId> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, earned);
    }
}
