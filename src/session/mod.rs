//! Session persistence and startup restoration
//!
//! The open tabs of each session owner are saved into one shared blob in
//! the persistence store, keyed by owner id:
//!
//! ```json
//! { "<owner id>": { "openTabs": [ ... ], "openTabIndex": 0 } }
//! ```
//!
//! On the next start, [`restore::StartupRestorer`] replays that blob (or a
//! preset, or nothing) into a fresh `TabSessionManager`.

pub mod capture;
pub mod persist;
pub mod restore;
pub mod storage;

pub use persist::SessionPersister;
pub use restore::{RestoreOutcome, StartupRestorer};
pub use storage::{FileStore, MemoryStore, PersistenceStore, StoreError};

use crate::tab::{TabDescriptor, TabId};
use serde::{Deserialize, Serialize};

/// Store key under which all owners' sessions are kept
pub const STORE_KEY: &str = "tab-session.open-tabs";

/// One owner's saved session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Open tabs in strip order
    pub open_tabs: Vec<PersistedTab>,
    /// Position of the active tab in `open_tabs`
    ///
    /// Signed so hand-edited or corrupt data still parses; anything out of
    /// range restores as 0.
    #[serde(default)]
    pub open_tab_index: i64,
}

impl PersistedSession {
    /// The active index if it is valid for `open_tabs`
    pub fn active_index(&self) -> Option<usize> {
        usize::try_from(self.open_tab_index)
            .ok()
            .filter(|index| *index < self.open_tabs.len())
    }
}

/// A saved tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTab {
    /// Id at save time; informational only, restored tabs get fresh ids
    pub id: TabId,
    pub space_id: String,
    pub location_id: String,
    #[serde(default)]
    pub compact: bool,
}

impl PersistedTab {
    pub fn descriptor(&self) -> TabDescriptor {
        TabDescriptor {
            space_id: Some(self.space_id.clone()),
            location_id: self.location_id.clone(),
            compact: Some(self.compact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_camel_case() {
        let session = PersistedSession {
            open_tabs: vec![PersistedTab {
                id: 4,
                space_id: "S1".to_string(),
                location_id: "L1".to_string(),
                compact: true,
            }],
            open_tab_index: 0,
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["openTabIndex"], 0);
        assert_eq!(value["openTabs"][0]["spaceId"], "S1");
        assert_eq!(value["openTabs"][0]["locationId"], "L1");
        assert_eq!(value["openTabs"][0]["compact"], true);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut session = PersistedSession {
            open_tabs: vec![
                PersistedTab {
                    id: 1,
                    space_id: "S1".to_string(),
                    location_id: "L1".to_string(),
                    compact: false,
                };
                2
            ],
            open_tab_index: 1,
        };
        assert_eq!(session.active_index(), Some(1));
        session.open_tab_index = 2;
        assert_eq!(session.active_index(), None);
        session.open_tab_index = -1;
        assert_eq!(session.active_index(), None);
    }
}
