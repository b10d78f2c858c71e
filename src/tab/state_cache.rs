//! Transient per-tab UI state.

use super::TabId;
use std::collections::HashMap;
use std::time::Instant;

/// Cached UI state for one tab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabStateEntry {
    /// Scroll offset of the tab's content when it was last displayed
    pub scroll_position: f64,
    /// When the offset was recorded
    pub timestamp: Instant,
}

/// Keyed storage of per-tab UI state
///
/// Entries are removed when their tab closes; the cache never outlives the
/// tabs it describes.
#[derive(Debug, Default, Clone)]
pub struct TabStateCache {
    entries: HashMap<TabId, TabStateEntry>,
}

impl TabStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scroll_position(&mut self, tab_id: TabId, scroll_position: f64, now: Instant) {
        self.entries.insert(
            tab_id,
            TabStateEntry {
                scroll_position,
                timestamp: now,
            },
        );
    }

    pub fn get(&self, tab_id: TabId) -> Option<&TabStateEntry> {
        self.entries.get(&tab_id)
    }

    pub fn scroll_position(&self, tab_id: TabId) -> Option<f64> {
        self.entries.get(&tab_id).map(|entry| entry.scroll_position)
    }

    pub fn remove(&mut self, tab_id: TabId) -> Option<TabStateEntry> {
        self.entries.remove(&tab_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
