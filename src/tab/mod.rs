//! Tab management for the multi-tab browsing session
//!
//! This module provides the core tab infrastructure including:
//! - `Tab`: One open location, whether or not it is currently displayed
//! - `TabDescriptor`: What a caller asks to open (space, location, density)
//! - `TabSessionManager`: Owns open tabs, closed tabs, history and the active pointer
//! - `TabStateCache`: Transient per-tab UI state (scroll offsets)

mod close_ops;
mod manager;
mod navigation_ops;
mod state_cache;

pub use manager::TabSessionManager;
pub use state_cache::{TabStateCache, TabStateEntry};

use crate::navigation::normalize_space_id;

/// Unique identifier for a tab, never reused within a process
pub type TabId = u64;

/// A request to open a location in a tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    /// Space the location lives in (`None` = no space)
    pub space_id: Option<String>,
    pub location_id: String,
    /// Display density; `None` falls back to the configured default
    pub compact: Option<bool>,
}

impl TabDescriptor {
    pub fn new(space_id: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            space_id: Some(space_id.into()),
            location_id: location_id.into(),
            compact: None,
        }
    }

    /// A location outside any space
    pub fn without_space(location_id: impl Into<String>) -> Self {
        Self {
            space_id: None,
            location_id: location_id.into(),
            compact: None,
        }
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = Some(compact);
        self
    }
}

impl From<&Tab> for TabDescriptor {
    fn from(tab: &Tab) -> Self {
        Self {
            space_id: Some(tab.space_id.clone()),
            location_id: tab.location_id.clone(),
            compact: Some(tab.compact),
        }
    }
}

impl From<&tab_session_config::TabPreset> for TabDescriptor {
    fn from(preset: &tab_session_config::TabPreset) -> Self {
        Self {
            space_id: preset.space_id.clone(),
            location_id: preset.location_id.clone(),
            compact: preset.compact,
        }
    }
}

/// One open location in the session
///
/// Tabs are owned by [`TabSessionManager`]; callers only ever see shared
/// references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    /// Normalized space id (never empty, `@me` for "no space")
    pub space_id: String,
    /// Location id, or a synthetic marker from the route table
    pub location_id: String,
    /// Display density flag
    pub compact: bool,
    /// One-shot sub-location to jump to on the next switch
    pub pending_anchor: Option<String>,
}

impl Tab {
    fn from_descriptor(
        id: TabId,
        descriptor: &TabDescriptor,
        default_compact: bool,
        pending_anchor: Option<String>,
    ) -> Self {
        Self {
            id,
            space_id: normalize_space_id(descriptor.space_id.as_deref()),
            location_id: descriptor.location_id.clone(),
            compact: descriptor.compact.unwrap_or(default_compact),
            pending_anchor,
        }
    }

    /// Whether this tab shows the given (normalized) space and location
    pub fn shows(&self, space_id: &str, location_id: &str) -> bool {
        self.location_id == location_id && self.space_id == space_id
    }
}
