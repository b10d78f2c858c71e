//! Null implementations of the traits defined in [`crate::traits`].
//!
//! Used when the session runs without a UI (the CLI, batch tooling) and as
//! defaults for `TabSessionManager::headless`.

use crate::traits::{FeatureQuery, NoticeSink, RouterBridge, SessionObserver};

/// Router that accepts and drops every transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRouter;

impl RouterBridge for NullRouter {
    fn transition_to_path(&self, path: &str) {
        log::trace!("NullRouter: dropping transition to path {path}");
    }

    fn transition_to_location(&self, space_id: &str, location_id: &str, _anchor: Option<&str>) {
        log::trace!("NullRouter: dropping transition to {space_id}/{location_id}");
    }

    fn current_location_id(&self) -> Option<String> {
        None
    }

    fn current_space_id(&self) -> Option<String> {
        None
    }
}

/// Observer that ignores all notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_changed(&self) {}

    fn on_ghost_tab(&self, _count: usize) {}
}

/// Feature registry in which nothing is enabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeatures;

impl FeatureQuery for NoFeatures {
    fn is_feature_enabled(&self, _name: &str) -> bool {
        false
    }
}

/// Notice sink that writes notices to the log instead of the screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn show_failure_toast(&self, message: &str) {
        log::warn!("{message}");
    }
}
