//! User profile and application settings records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who is using the app. Created on first launch, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    /// First launch timestamp.
    pub first_use: DateTime<Utc>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            first_use: Utc::now(),
        }
    }
}

/// Visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Zen,
    Sakura,
    Mint,
    Night,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Zen
    }
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    /// Daily reminder notification enabled.
    #[serde(default)]
    pub reminder: bool,
    /// Reminder time as "HH:MM".
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
}

fn default_reminder_time() -> String {
    "08:00".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Zen,
            reminder: false,
            reminder_time: default_reminder_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Zen);
        assert!(!settings.reminder);
        assert_eq!(settings.reminder_time, "08:00");
    }

    #[test]
    fn settings_roundtrip() {
        let settings = Settings {
            theme: Theme::Night,
            reminder: true,
            reminder_time: "21:30".into(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Sakura).unwrap(), r#""sakura""#);
    }
}
