//! Saving the open tabs of a session owner

use super::storage::{PersistenceStore, StoreError};
use super::{STORE_KEY, capture::capture_session};
use crate::tab::TabSessionManager;
use serde_json::{Map, Value};

/// Writes manager snapshots into the shared open-tabs blob
pub struct SessionPersister<'a, S: PersistenceStore> {
    store: &'a S,
}

impl<'a, S: PersistenceStore> SessionPersister<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Save `manager`'s open tabs under `owner_id`
    ///
    /// No-op for an empty owner id. Other owners' entries are kept; a blob
    /// that is not a JSON object is replaced.
    pub async fn save(
        &self,
        manager: &TabSessionManager,
        owner_id: &str,
    ) -> Result<(), StoreError> {
        if owner_id.is_empty() {
            log::debug!("Not saving tabs: no session owner");
            return Ok(());
        }

        let entry = serde_json::to_value(capture_session(manager))?;
        let tab_count = manager.tab_count();
        self.store
            .update(STORE_KEY, |current| {
                let mut owners = match current {
                    Some(Value::Object(map)) => map,
                    Some(other) => {
                        log::warn!("Replacing malformed open-tabs blob: {}", other);
                        Map::new()
                    }
                    None => Map::new(),
                };
                owners.insert(owner_id.to_string(), entry);
                Value::Object(owners)
            })
            .await?;

        crate::debug_info!("SESSION", "Saved {} tabs for owner {}", tab_count, owner_id);
        Ok(())
    }
}
