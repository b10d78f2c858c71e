//! Shared trait definitions for the seams between the tab session and its host.
//!
//! The session never talks to a real router, UI, or feature registry
//! directly. Each collaborator is described here and injected at
//! construction, so the whole session can run headless in tests.
//!
//! Null implementations live in [`crate::traits_impl`]; recording doubles
//! for tests live in [`crate::testing`].

use crate::tab::TabId;

// ── RouterBridge ─────────────────────────────────────────────────────────────

/// The host router: changes what is visibly displayed.
///
/// Transitions are fire-and-forget. The session never waits for them; the
/// host reports the resulting location back through
/// `TabSessionManager::handle_channel_switch`, possibly before the
/// transition call even returns.
pub trait RouterBridge {
    /// Navigate to a host-level path (used for synthetic locations).
    fn transition_to_path(&self, path: &str);

    /// Navigate to a location inside a space, optionally jumping to an anchor.
    fn transition_to_location(&self, space_id: &str, location_id: &str, anchor: Option<&str>);

    /// Location the router currently reports as displayed.
    ///
    /// Synchronous read, used only to skip redundant transitions.
    fn current_location_id(&self) -> Option<String>;

    /// Space the router currently reports as displayed (`None` = no space).
    fn current_space_id(&self) -> Option<String>;
}

// ── SessionObserver ──────────────────────────────────────────────────────────

/// The UI layer watching the session.
///
/// # Notes
///
/// `scroll_position` and `on_restore_scroll` have defaults so observers that
/// do not track scroll offsets only implement the two change callbacks.
pub trait SessionObserver {
    /// Tab state changed: redraw the strip and persist if desired.
    fn on_changed(&self);

    /// Number of ghost placeholders to show after the last tab close.
    ///
    /// Zero means the placeholder should be removed.
    fn on_ghost_tab(&self, count: usize);

    /// Scroll offset of the content currently on screen, if known.
    fn scroll_position(&self) -> Option<f64> {
        None
    }

    /// Re-apply a cached scroll offset for the tab that is now displayed.
    fn on_restore_scroll(&self, _tab_id: TabId, _offset: f64) {}
}

// ── FeatureQuery ─────────────────────────────────────────────────────────────

/// Lookup of other host features that may conflict with tab restoration.
pub trait FeatureQuery {
    /// Returns `true` if the named feature is enabled.
    fn is_feature_enabled(&self, name: &str) -> bool;
}

// ── NoticeSink ───────────────────────────────────────────────────────────────

/// User-facing notices (toasts).
pub trait NoticeSink {
    fn show_failure_toast(&self, message: &str);
}
