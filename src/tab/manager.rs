//! Tab session manager: the registry of open tabs for one browsing session

use super::{Tab, TabDescriptor, TabId, TabStateCache};
use crate::clock::{Clock, SystemClock};
use crate::navigation::{NavigationContextTracker, NavigationSource, normalize_space_id};
use crate::routes::RouteTable;
use crate::session::PersistedSession;
use crate::traits::{RouterBridge, SessionObserver};
use crate::traits_impl::{NullObserver, NullRouter};
use std::time::Instant;
use tab_session_config::Config;

/// Ghost placeholder shown after closing a tab that had tabs to its right
#[derive(Debug, Default, Clone, Copy)]
struct GhostTab {
    count: usize,
    expires_at: Option<Instant>,
}

/// A cached scroll offset waiting for the destination content to mount
#[derive(Debug, Clone, Copy)]
struct PendingScrollRestore {
    tab_id: TabId,
    offset: f64,
    due: Instant,
}

/// Manages the open tabs of one browsing session
///
/// Every mutation goes through this type. Operations never fail: bad input
/// (unknown ids, out-of-range indices, closing the last tab) is logged and
/// ignored so bookkeeping never blocks browsing.
pub struct TabSessionManager {
    config: Config,
    routes: RouteTable,
    /// All open tabs, in strip order
    pub(super) tabs: Vec<Tab>,
    /// Closed tabs, most recently closed last
    pub(super) closed_tabs: Vec<Tab>,
    /// Ids in the order they became active; may reference closed tabs
    pub(super) history: Vec<TabId>,
    /// Currently active tab ID
    pub(super) active_tab_id: Option<TabId>,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
    pub(super) state_cache: TabStateCache,
    pub(super) navigation: NavigationContextTracker,
    /// Set while a bookmark is displayed independently of the tab strip
    pub(super) viewing_via_bookmark: bool,
    /// Deadline of the "navigating via tab" flag
    navigating_via_tab_until: Option<Instant>,
    /// When `handle_channel_switch` last acted on a location change
    pub(super) last_channel_switch: Option<Instant>,
    ghost: GhostTab,
    pending_scroll: Option<PendingScrollRestore>,
    pub(super) router: Box<dyn RouterBridge>,
    pub(super) observer: Box<dyn SessionObserver>,
    clock: Box<dyn Clock>,
}

impl TabSessionManager {
    /// Create a new empty session
    ///
    /// The session has no tabs until the first `create_tab` (normally issued
    /// by `StartupRestorer`).
    pub fn new(
        config: Config,
        router: Box<dyn RouterBridge>,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        Self {
            routes: RouteTable::from_config(&config),
            navigation: NavigationContextTracker::new(config.navigation_context_ttl()),
            config,
            tabs: Vec::new(),
            closed_tabs: Vec::new(),
            history: Vec::new(),
            active_tab_id: None,
            next_tab_id: 1,
            state_cache: TabStateCache::new(),
            viewing_via_bookmark: false,
            navigating_via_tab_until: None,
            last_channel_switch: None,
            ghost: GhostTab::default(),
            pending_scroll: None,
            router,
            observer,
            clock: Box::new(SystemClock),
        }
    }

    /// A session with no router and no UI attached
    pub fn headless(config: Config) -> Self {
        Self::new(config, Box::new(NullRouter), Box::new(NullObserver))
    }

    /// Replace the time source (tests use `ManualClock`)
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swap in new settings (e.g. after the settings UI saved)
    ///
    /// Turning independent bookmarks off while one is displayed hands the
    /// view back to the tab strip.
    pub fn set_config(&mut self, config: Config) {
        if self.viewing_via_bookmark && !config.bookmarks_independent_of_tabs {
            log::debug!("Independent bookmarks disabled; leaving bookmark view");
            self.viewing_via_bookmark = false;
        }
        self.routes = RouteTable::from_config(&config);
        self.navigation = NavigationContextTracker::new(config.navigation_context_ttl());
        self.config = config;
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub(super) fn now(&self) -> Instant {
        self.clock.now()
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Create a new tab and return its ID
    ///
    /// # Arguments
    /// * `descriptor` - Location to open; `compact` falls back to `default_compact`
    /// * `switch_to_it` - Make the new tab active and navigate to it
    /// * `pending_anchor` - One-shot sub-location to jump to on first switch
    /// * `persist` - Notify the observer; batch restores pass `false`
    ///
    /// The first tab of an empty session becomes active even when
    /// `switch_to_it` is false, without navigating.
    pub fn create_tab(
        &mut self,
        descriptor: &TabDescriptor,
        switch_to_it: bool,
        pending_anchor: Option<&str>,
        persist: bool,
    ) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        let tab = Tab::from_descriptor(
            id,
            descriptor,
            self.config.default_compact,
            pending_anchor.map(str::to_string),
        );
        log::info!(
            "Created new tab {} for {}/{} (total: {})",
            id,
            tab.space_id,
            tab.location_id,
            self.tabs.len() + 1
        );
        self.tabs.push(tab);

        if switch_to_it {
            self.move_to_tab(id);
        } else if self.active_tab_id.is_none() {
            self.active_tab_id = Some(id);
            self.history.push(id);
        }

        self.clear_ghost_tab();
        if persist {
            self.observer.on_changed();
        }
        id
    }

    // ========================================================================
    // Switching
    // ========================================================================

    /// Switch to a tab by ID
    ///
    /// This is the only path that changes what is displayed. The
    /// navigating-via-tab flag and the navigation context are both set
    /// before the router is called, because the router may report the
    /// location change back synchronously.
    pub fn move_to_tab(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("move_to_tab", id);
            return;
        };
        let now = self.now();

        // A real tab interaction always reclaims the view from a bookmark
        self.viewing_via_bookmark = false;

        if self.config.restore_scroll_position
            && let Some(outgoing) = self.active_tab_id
            && self.index_of(outgoing).is_some()
            && let Some(offset) = self.observer.scroll_position()
        {
            self.state_cache.set_scroll_position(outgoing, offset, now);
        }

        self.active_tab_id = Some(id);
        self.history.push(id);
        self.navigating_via_tab_until = Some(now + self.config.tab_navigation_flag());

        let space_id = self.tabs[index].space_id.clone();
        let location_id = self.tabs[index].location_id.clone();
        self.navigation.set_navigation_source(
            Some(&space_id),
            &location_id,
            NavigationSource::Tab,
            now,
        );

        if let Some(path) = self.routes.path_for(&location_id) {
            log::debug!("Switched to tab {} (synthetic route {})", id, path);
            self.router.transition_to_path(path);
        } else if let Some(anchor) = self.tabs[index].pending_anchor.take() {
            log::debug!("Switched to tab {} (anchor {})", id, anchor);
            self.router
                .transition_to_location(&space_id, &location_id, Some(&anchor));
        } else if !self.router_shows(&space_id, &location_id) {
            log::debug!("Switched to tab {}", id);
            self.router
                .transition_to_location(&space_id, &location_id, None);
            self.schedule_scroll_restore(id, now);
        } else {
            log::debug!("Switched to tab {} (already displayed)", id);
        }

        self.observer.on_changed();
    }

    /// Switch to the next tab (wraps around)
    pub fn next_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current_idx = self.active_tab_index().unwrap_or(0);
        let next_idx = (current_idx + 1) % self.tabs.len();
        self.move_to_tab(self.tabs[next_idx].id);
    }

    /// Switch to the previous tab (wraps around)
    pub fn previous_tab(&mut self) {
        if self.tabs.len() <= 1 {
            return;
        }
        let current_idx = self.active_tab_index().unwrap_or(0);
        let prev_idx = if current_idx == 0 {
            self.tabs.len() - 1
        } else {
            current_idx - 1
        };
        self.move_to_tab(self.tabs[prev_idx].id);
    }

    /// Switch to tab by index (1-based, for Ctrl+1-9)
    pub fn switch_to_index(&mut self, index: usize) {
        if index > 0 && index <= self.tabs.len() {
            self.move_to_tab(self.tabs[index - 1].id);
        }
    }

    fn router_shows(&self, space_id: &str, location_id: &str) -> bool {
        self.router.current_location_id().as_deref() == Some(location_id)
            && normalize_space_id(self.router.current_space_id().as_deref()) == space_id
    }

    // ========================================================================
    // Reordering and per-tab state
    // ========================================================================

    /// Move a tab from one strip position to another (drag-and-drop)
    pub fn move_dragged_tabs(&mut self, from: usize, to: usize) {
        let len = self.tabs.len();
        if from >= len || to >= len {
            log::error!(
                "Cannot move tab from index {} to {}: only {} tabs open",
                from,
                to,
                len
            );
            return;
        }
        if from == to {
            return;
        }

        let tab = self.tabs.remove(from);
        log::debug!("Moved tab {} from index {} to {}", tab.id, from, to);
        self.tabs.insert(to, tab);
        self.clear_ghost_tab();
        self.observer.on_changed();
    }

    /// Flip a tab's display density
    pub fn toggle_compact(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("toggle_compact", id);
            return;
        };
        let tab = &mut self.tabs[index];
        tab.compact = !tab.compact;
        self.observer.on_changed();
    }

    /// Set the one-shot anchor used on the tab's next switch
    pub fn set_pending_anchor(&mut self, id: TabId, anchor: impl Into<String>) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("set_pending_anchor", id);
            return;
        };
        self.tabs[index].pending_anchor = Some(anchor.into());
    }

    /// Record a scroll offset for an open tab
    pub fn record_scroll_position(&mut self, id: TabId, offset: f64) {
        if self.index_of(id).is_none() {
            self.log_unknown_tab("record_scroll_position", id);
            return;
        }
        let now = self.now();
        self.state_cache.set_scroll_position(id, offset, now);
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Expire elapsed timers and fire due deferred work
    ///
    /// Hosts call this from their frame or event loop. Calling it late only
    /// delays the effects; calling it often is harmless.
    pub fn tick(&mut self) {
        let now = self.now();

        if self.ghost.expires_at.is_some_and(|at| now >= at) {
            self.clear_ghost_tab();
        }

        self.navigation.clear_stale_navigation_context(now);

        if self.navigating_via_tab_until.is_some_and(|at| now >= at) {
            self.navigating_via_tab_until = None;
        }

        if let Some(pending) = self.pending_scroll
            && now >= pending.due
        {
            self.pending_scroll = None;
            // Only restore if the user is still looking at that tab
            if self.active_tab_id == Some(pending.tab_id) && !self.viewing_via_bookmark {
                crate::debug_trace!(
                    "TABS",
                    "Restoring scroll offset {} for tab {}",
                    pending.offset,
                    pending.tab_id
                );
                self.observer.on_restore_scroll(pending.tab_id, pending.offset);
            }
        }
    }

    fn schedule_scroll_restore(&mut self, id: TabId, now: Instant) {
        if !self.config.restore_scroll_position {
            return;
        }
        self.pending_scroll = self
            .state_cache
            .scroll_position(id)
            .map(|offset| PendingScrollRestore {
                tab_id: id,
                offset,
                due: now + self.config.scroll_restore_delay(),
            });
    }

    pub(super) fn bump_ghost_tab(&mut self) {
        self.ghost.count += 1;
        self.ghost.expires_at = Some(self.now() + self.config.ghost_tab_timeout());
        self.observer.on_ghost_tab(self.ghost.count);
    }

    pub(super) fn clear_ghost_tab(&mut self) {
        let had_ghost = self.ghost.count > 0;
        self.ghost = GhostTab::default();
        if had_ghost {
            self.observer.on_ghost_tab(0);
        }
    }

    // ========================================================================
    // Restoration support
    // ========================================================================

    /// Drop every open tab, closed tab and history entry
    ///
    /// Leaves the session empty; only the restorer calls this, right before
    /// recreating tabs.
    pub(crate) fn clear_tabs(&mut self) {
        self.tabs.clear();
        self.closed_tabs.clear();
        self.history.clear();
        self.active_tab_id = None;
        self.state_cache.clear();
        self.pending_scroll = None;
    }

    /// Make the tab at `index` active without navigating
    pub(crate) fn select_index_silently(&mut self, index: usize) {
        if let Some(tab) = self.tabs.get(index) {
            self.active_tab_id = Some(tab.id);
        }
    }

    pub(crate) fn reset_history(&mut self) {
        self.history.clear();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get all open tabs as a slice, in strip order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Closed tabs, most recently closed last
    pub fn closed_tabs(&self) -> &[Tab] {
        &self.closed_tabs
    }

    /// Activation history, oldest first
    pub fn history(&self) -> &[TabId] {
        &self.history
    }

    /// Get the active tab ID
    pub fn current_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Get a reference to the active tab
    pub fn current_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.get_tab(id))
    }

    /// Get index of active tab (0-based)
    pub fn active_tab_index(&self) -> Option<usize> {
        self.active_tab_id.and_then(|id| self.index_of(id))
    }

    /// Get a tab by ID
    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Get the number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn state_cache(&self) -> &TabStateCache {
        &self.state_cache
    }

    /// Whether the tab strip should show `id` as selected
    ///
    /// Always `false` while a bookmark is being viewed independently.
    pub fn is_tab_selected(&self, id: TabId) -> bool {
        !self.viewing_via_bookmark && self.active_tab_id == Some(id)
    }

    pub fn is_viewing_via_bookmark(&self) -> bool {
        self.viewing_via_bookmark
    }

    /// Whether a tab switch happened within the flag window
    pub fn is_navigating_via_tab(&self) -> bool {
        let now = self.now();
        self.navigating_via_tab_until.is_some_and(|until| now < until)
    }

    /// Number of ghost placeholders currently shown
    pub fn ghost_tab_count(&self) -> usize {
        self.ghost.count
    }

    pub fn navigation(&self) -> &NavigationContextTracker {
        &self.navigation
    }

    /// Persistable view of the open tabs and the active index
    pub fn snapshot(&self) -> PersistedSession {
        crate::session::capture::capture_session(self)
    }

    pub(super) fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub(super) fn log_unknown_tab(&self, operation: &str, id: TabId) {
        let open: Vec<TabId> = self.tabs.iter().map(|t| t.id).collect();
        log::error!(
            "{}: unknown tab {} (open tabs: {:?})",
            operation,
            id,
            open
        );
    }
}
