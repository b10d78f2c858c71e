//! The `Config` struct, its defaults, and YAML persistence.
//!
//! Config lives at `~/.config/tab-session/config.yaml`. Saves are atomic:
//! the YAML is written to a sibling temp file and renamed over the target.

use crate::error::ConfigError;
use crate::types::{StartupBehavior, TabPreset};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tab session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========================================================================
    // Startup
    // ========================================================================
    /// What to open when the session starts
    #[serde(default = "crate::defaults::on_startup")]
    pub on_startup: StartupBehavior,

    /// Name of a host feature that owns the tab strip when enabled.
    /// Restoration is skipped while it is on.
    #[serde(default = "crate::defaults::conflicting_feature")]
    pub conflicting_feature: String,

    /// Preset tab sets keyed by session-owner id (used by `on_startup: preset`)
    #[serde(default = "crate::defaults::presets")]
    pub presets: BTreeMap<String, Vec<TabPreset>>,

    // ========================================================================
    // Navigation Policy
    // ========================================================================
    /// When the location changes, switch to an open tab that already shows it
    #[serde(default = "crate::defaults::bool_false")]
    pub switch_to_existing_tab: bool,

    /// When the location changes, open a new tab for it
    #[serde(default = "crate::defaults::bool_false")]
    pub create_new_tab_automatically: bool,

    /// Fold fast sequential navigation into the current tab instead of
    /// opening one tab per hop (only with `create_new_tab_automatically`)
    #[serde(default = "crate::defaults::bool_true")]
    pub rapid_navigation_merge: bool,

    /// Window in milliseconds inside which navigation counts as rapid
    #[serde(default = "crate::defaults::rapid_navigation_threshold_ms")]
    pub rapid_navigation_threshold_ms: u64,

    /// Visiting a bookmark displays it without touching the tab strip
    #[serde(default = "crate::defaults::bool_false")]
    pub bookmarks_independent_of_tabs: bool,

    /// Remember each tab's scroll offset and restore it on switch
    #[serde(default = "crate::defaults::bool_true")]
    pub restore_scroll_position: bool,

    /// Display density for tabs created without an explicit `compact` flag
    #[serde(default = "crate::defaults::bool_false")]
    pub default_compact: bool,

    /// Synthetic location marker -> host path
    #[serde(default = "crate::defaults::synthetic_routes")]
    pub synthetic_routes: BTreeMap<String, String>,

    // ========================================================================
    // Timers
    // ========================================================================
    /// Age after which a recorded navigation context is treated as absent
    #[serde(default = "crate::defaults::navigation_context_ttl_ms")]
    pub navigation_context_ttl_ms: u64,

    /// How long the ghost tab placeholder stays after a close
    #[serde(default = "crate::defaults::ghost_tab_timeout_ms")]
    pub ghost_tab_timeout_ms: u64,

    /// How long the "navigating via tab" flag survives a tab switch
    #[serde(default = "crate::defaults::tab_navigation_flag_ms")]
    pub tab_navigation_flag_ms: u64,

    /// Delay before a cached scroll offset is re-applied after a switch
    #[serde(default = "crate::defaults::scroll_restore_delay_ms")]
    pub scroll_restore_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_startup: crate::defaults::on_startup(),
            conflicting_feature: crate::defaults::conflicting_feature(),
            presets: crate::defaults::presets(),
            switch_to_existing_tab: crate::defaults::bool_false(),
            create_new_tab_automatically: crate::defaults::bool_false(),
            rapid_navigation_merge: crate::defaults::bool_true(),
            rapid_navigation_threshold_ms: crate::defaults::rapid_navigation_threshold_ms(),
            bookmarks_independent_of_tabs: crate::defaults::bool_false(),
            restore_scroll_position: crate::defaults::bool_true(),
            default_compact: crate::defaults::bool_false(),
            synthetic_routes: crate::defaults::synthetic_routes(),
            navigation_context_ttl_ms: crate::defaults::navigation_context_ttl_ms(),
            ghost_tab_timeout_ms: crate::defaults::ghost_tab_timeout_ms(),
            tab_navigation_flag_ms: crate::defaults::tab_navigation_flag_ms(),
            scroll_restore_delay_ms: crate::defaults::scroll_restore_delay_ms(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the startup behavior
    pub fn with_startup(mut self, behavior: StartupBehavior) -> Self {
        self.on_startup = behavior;
        self
    }

    /// Enable or disable bookmark viewing independent of tabs
    pub fn with_independent_bookmarks(mut self, enabled: bool) -> Self {
        self.bookmarks_independent_of_tabs = enabled;
        self
    }

    /// Set the navigation policy toggles in one call
    pub fn with_navigation_policy(
        mut self,
        switch_to_existing_tab: bool,
        create_new_tab_automatically: bool,
        rapid_navigation_merge: bool,
    ) -> Self {
        self.switch_to_existing_tab = switch_to_existing_tab;
        self.create_new_tab_automatically = create_new_tab_automatically;
        self.rapid_navigation_merge = rapid_navigation_merge;
        self
    }

    /// Add a preset tab set for an owner
    pub fn with_preset(mut self, owner_id: impl Into<String>, tabs: Vec<TabPreset>) -> Self {
        self.presets.insert(owner_id.into(), tabs);
        self
    }

    pub fn rapid_navigation_threshold(&self) -> Duration {
        Duration::from_millis(self.rapid_navigation_threshold_ms)
    }

    pub fn navigation_context_ttl(&self) -> Duration {
        Duration::from_millis(self.navigation_context_ttl_ms)
    }

    pub fn ghost_tab_timeout(&self) -> Duration {
        Duration::from_millis(self.ghost_tab_timeout_ms)
    }

    pub fn tab_navigation_flag(&self) -> Duration {
        Duration::from_millis(self.tab_navigation_flag_ms)
    }

    pub fn scroll_restore_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_restore_delay_ms)
    }

    /// Check field values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timers = [
            ("navigation_context_ttl_ms", self.navigation_context_ttl_ms),
            ("rapid_navigation_threshold_ms", self.rapid_navigation_threshold_ms),
        ];
        if let Some(&(field, _)) = timers.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::ZeroDuration { field });
        }
        for (marker, path) in &self.synthetic_routes {
            if marker.is_empty() {
                return Err(ConfigError::EmptyRouteMarker);
            }
            if !path.starts_with('/') {
                return Err(ConfigError::RelativeRoutePath {
                    marker: marker.clone(),
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    ///
    /// A missing or empty file yields defaults. A malformed file or a file
    /// that fails validation is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        config.validate()?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let yaml = serde_yaml_ng::to_string(self).context("Failed to serialize config")?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)
            .with_context(|| format!("Failed to write config to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move config into place at {:?}", path))?;

        Ok(())
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tab-session")
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }
}
