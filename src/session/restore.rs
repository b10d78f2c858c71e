//! Startup restoration of a session owner's tabs

use super::storage::PersistenceStore;
use super::{PersistedSession, STORE_KEY};
use crate::tab::{TabDescriptor, TabSessionManager};
use crate::traits::{FeatureQuery, NoticeSink};
use serde_json::Value;
use tab_session_config::StartupBehavior;

/// Notice shown when a remembered session could not be loaded
pub const RESTORE_FAILED_NOTICE: &str = "Failed to restore tabs";

/// What the restorer did before committing the initial tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A conflicting feature is enabled; nothing was loaded
    Skipped,
    /// Only the default tab was opened
    Default,
    /// This many preset tabs were opened
    Preset(usize),
    /// This many remembered tabs were reopened
    Restored(usize),
    /// The remembered session was missing or unreadable
    Failed,
}

/// Replays saved or preset tabs into a fresh manager at startup
pub struct StartupRestorer<'a, S: PersistenceStore> {
    store: &'a S,
    features: &'a dyn FeatureQuery,
    notices: &'a dyn NoticeSink,
}

impl<'a, S: PersistenceStore> StartupRestorer<'a, S> {
    pub fn new(store: &'a S, features: &'a dyn FeatureQuery, notices: &'a dyn NoticeSink) -> Self {
        Self {
            store,
            features,
            notices,
        }
    }

    /// Populate `manager` according to its configured startup behavior
    ///
    /// Whatever the branch, the manager ends with at least one tab (falling
    /// back to `default`), a history holding only the active tab, and the
    /// router pointed at it.
    pub async fn restore(
        &self,
        manager: &mut TabSessionManager,
        owner_id: &str,
        default: &TabDescriptor,
    ) -> RestoreOutcome {
        let conflicting = manager.config().conflicting_feature.clone();
        let outcome = if !conflicting.is_empty() && self.features.is_feature_enabled(&conflicting) {
            log::warn!("Skipping tab restoration: {} is enabled", conflicting);
            self.notices.show_failure_toast(&format!(
                "Tabs were not restored because \"{}\" is enabled",
                conflicting
            ));
            RestoreOutcome::Skipped
        } else {
            match manager.config().on_startup {
                StartupBehavior::Nothing => RestoreOutcome::Default,
                StartupBehavior::Preset => self.open_preset(manager, owner_id),
                StartupBehavior::Remember => self.restore_remembered(manager, owner_id).await,
            }
        };

        finalize(manager, default);
        crate::debug_info!(
            "RESTORE",
            "Startup restore for {:?}: {:?} ({} tabs open)",
            owner_id,
            outcome,
            manager.tab_count()
        );
        outcome
    }

    fn open_preset(&self, manager: &mut TabSessionManager, owner_id: &str) -> RestoreOutcome {
        let Some(preset) = manager.config().presets.get(owner_id).cloned() else {
            log::info!("No tab preset configured for owner {:?}", owner_id);
            return RestoreOutcome::Default;
        };
        for entry in &preset {
            manager.create_tab(&TabDescriptor::from(entry), false, None, false);
        }
        RestoreOutcome::Preset(preset.len())
    }

    async fn restore_remembered(
        &self,
        manager: &mut TabSessionManager,
        owner_id: &str,
    ) -> RestoreOutcome {
        if owner_id.is_empty() {
            log::debug!("No session owner; not loading remembered tabs");
            return RestoreOutcome::Default;
        }

        let Some(session) = self.load(owner_id).await else {
            self.notices.show_failure_toast(RESTORE_FAILED_NOTICE);
            return RestoreOutcome::Failed;
        };

        manager.clear_tabs();
        for tab in &session.open_tabs {
            manager.create_tab(&tab.descriptor(), false, None, false);
        }
        let index = session.active_index().unwrap_or_else(|| {
            if !session.open_tabs.is_empty() {
                log::warn!(
                    "Saved active index {} out of range for {} tabs, using 0",
                    session.open_tab_index,
                    session.open_tabs.len()
                );
            }
            0
        });
        manager.select_index_silently(index);
        RestoreOutcome::Restored(session.open_tabs.len())
    }

    /// Load one owner's saved session, logging why it is unusable
    async fn load(&self, owner_id: &str) -> Option<PersistedSession> {
        let blob = match self.store.get(STORE_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                log::info!("No saved tabs found");
                return None;
            }
            Err(e) => {
                crate::debug_error!("RESTORE", "Failed to read saved tabs: {}", e);
                log::error!("Failed to read saved tabs: {}", e);
                return None;
            }
        };

        let entry = match blob {
            Value::Object(mut owners) => owners.remove(owner_id),
            other => {
                log::error!("Saved tabs blob is not an object: {}", other);
                return None;
            }
        };
        let Some(entry) = entry else {
            log::info!("No saved tabs for owner {:?}", owner_id);
            return None;
        };

        serde_json::from_value(entry)
            .map_err(|e| log::error!("Saved tabs for owner {:?} are malformed: {}", owner_id, e))
            .ok()
    }
}

/// Guarantee a tab, reset history to the active tab and navigate to it
fn finalize(manager: &mut TabSessionManager, default: &TabDescriptor) {
    if manager.tab_count() == 0 {
        manager.create_tab(default, false, None, false);
    }
    manager.reset_history();
    let active = manager
        .current_tab_id()
        .or_else(|| manager.tabs().first().map(|tab| tab.id));
    if let Some(id) = active {
        manager.move_to_tab(id);
    }
}
