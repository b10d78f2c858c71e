//! Enumerated setting types.

use serde::{Deserialize, Serialize};

/// What the session does with tabs when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartupBehavior {
    /// Start with a single tab for the default location
    Nothing,
    /// Open the owner's configured preset tab set
    Preset,
    /// Restore the tabs persisted from the previous session (default)
    #[default]
    Remember,
}

impl StartupBehavior {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nothing => "Do Nothing",
            Self::Preset => "Open Preset Tabs",
            Self::Remember => "Remember Last Session",
        }
    }

    /// All available behaviors for UI iteration
    pub fn all() -> &'static [StartupBehavior] {
        &[
            StartupBehavior::Nothing,
            StartupBehavior::Preset,
            StartupBehavior::Remember,
        ]
    }
}

/// One entry of a named preset tab set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabPreset {
    /// Space the location lives in (`None` = no space)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    /// Location to open
    pub location_id: String,
    /// Display density override (falls back to `default_compact`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_behavior_serde_names() {
        let yaml = serde_yaml_ng::to_string(&StartupBehavior::Preset).unwrap();
        assert_eq!(yaml.trim(), "preset");
        let back: StartupBehavior = serde_yaml_ng::from_str("remember").unwrap();
        assert_eq!(back, StartupBehavior::Remember);
    }

    #[test]
    fn test_startup_behavior_all_has_distinct_names() {
        let names: Vec<_> = StartupBehavior::all()
            .iter()
            .map(|b| b.display_name())
            .collect();
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| !n.is_empty()));
    }

    #[test]
    fn test_preset_optional_fields_default() {
        let preset: TabPreset = serde_yaml_ng::from_str("location_id: inbox").unwrap();
        assert_eq!(preset.location_id, "inbox");
        assert!(preset.space_id.is_none());
        assert!(preset.compact.is_none());
    }
}
