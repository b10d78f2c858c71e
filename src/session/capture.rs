//! Capture the current session state from a live manager

use super::{PersistedSession, PersistedTab};
use crate::tab::TabSessionManager;

/// Capture the open tabs and the active index
///
/// The active index is recomputed from the active id at capture time.
pub fn capture_session(manager: &TabSessionManager) -> PersistedSession {
    let open_tabs = manager
        .tabs()
        .iter()
        .map(|tab| PersistedTab {
            id: tab.id,
            space_id: tab.space_id.clone(),
            location_id: tab.location_id.clone(),
            compact: tab.compact,
        })
        .collect();

    let open_tab_index = manager.active_tab_index().unwrap_or(0) as i64;

    PersistedSession {
        open_tabs,
        open_tab_index,
    }
}
