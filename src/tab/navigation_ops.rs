//! Reacting to location changes and independent bookmark viewing.
//!
//! `handle_channel_switch` is the router's callback for every displayed
//! location change, including ones this session caused itself. The
//! navigating-via-tab flag and the navigation context let it tell those
//! apart from free navigation.

use super::{TabDescriptor, TabSessionManager};
use crate::navigation::{NavigationSource, normalize_space_id};

impl TabSessionManager {
    /// React to the router reporting a new displayed location
    ///
    /// Policy, first match wins:
    /// 1. `switch_to_existing_tab` and an open tab shows the location: switch to it.
    /// 2. `create_new_tab_automatically`: open a new tab, or retarget the
    ///    active tab when `rapid_navigation_merge` is on and the previous
    ///    location change was within the rapid-navigation threshold.
    /// 3. Otherwise retarget the active tab in place.
    pub fn handle_channel_switch(&mut self, descriptor: &TabDescriptor) {
        if self.viewing_via_bookmark {
            log::debug!(
                "Ignoring location change to {} while viewing a bookmark",
                descriptor.location_id
            );
            return;
        }

        let now = self.now();
        let space_id = normalize_space_id(descriptor.space_id.as_deref());
        let location_id = descriptor.location_id.as_str();

        if self.navigation.is_navigation_from_source(
            Some(&space_id),
            location_id,
            NavigationSource::Bookmark,
            now,
        ) {
            log::debug!("Ignoring bookmark-driven location change to {}", location_id);
            return;
        }

        if self.is_navigating_via_tab()
            && self
                .current_tab()
                .is_some_and(|tab| tab.shows(&space_id, location_id))
        {
            log::trace!("Location change to {} came from a tab switch", location_id);
            return;
        }

        let within_rapid_window = self.last_channel_switch.is_some_and(|at| {
            now.saturating_duration_since(at) < self.config().rapid_navigation_threshold()
        });
        self.last_channel_switch = Some(now);

        let existing = self
            .tabs
            .iter()
            .find(|tab| tab.shows(&space_id, location_id))
            .map(|tab| tab.id);

        if self.config().switch_to_existing_tab
            && let Some(id) = existing
        {
            self.move_to_tab(id);
            return;
        }

        if self.config().create_new_tab_automatically {
            if self.config().rapid_navigation_merge && within_rapid_window {
                crate::debug_log!("TABS", "Rapid navigation to {}: reusing active tab", location_id);
                self.retarget_active_tab(&space_id, location_id);
            } else {
                self.create_tab(descriptor, true, None, true);
            }
            return;
        }

        self.retarget_active_tab(&space_id, location_id);
    }

    /// Visit a bookmark
    ///
    /// With `bookmarks_independent_of_tabs` on, the router is driven directly
    /// and no tab is created, moved or selected until the next tab switch.
    /// Otherwise this behaves like free navigation followed by a tab switch.
    pub fn navigate_to_bookmark(&mut self, descriptor: &TabDescriptor) {
        let space_id = normalize_space_id(descriptor.space_id.as_deref());
        let location_id = descriptor.location_id.as_str();

        if !self.config().bookmarks_independent_of_tabs {
            if let Some(id) = self
                .tabs
                .iter()
                .find(|tab| tab.shows(&space_id, location_id))
                .map(|tab| tab.id)
            {
                self.move_to_tab(id);
                return;
            }

            let switches_before = self.history.len();
            self.handle_channel_switch(descriptor);
            // Commit the navigation unless the policy already switched tabs
            if self.history.len() == switches_before
                && let Some(id) = self.current_tab_id()
            {
                self.move_to_tab(id);
            }
            return;
        }

        let now = self.now();
        self.viewing_via_bookmark = true;
        self.navigation.set_navigation_source(
            Some(&space_id),
            location_id,
            NavigationSource::Bookmark,
            now,
        );
        log::debug!("Viewing bookmark {}/{} independently of tabs", space_id, location_id);

        match self.routes().path_for(location_id) {
            Some(path) => self.router.transition_to_path(path),
            None => self
                .router
                .transition_to_location(&space_id, location_id, None),
        }
        self.observer.on_changed();
    }

    /// Point the active tab at a new location, keeping its id and density
    fn retarget_active_tab(&mut self, space_id: &str, location_id: &str) {
        let Some(index) = self.active_tab_index() else {
            log::warn!("No active tab to retarget to {}/{}", space_id, location_id);
            return;
        };
        let tab = &mut self.tabs[index];
        if tab.shows(space_id, location_id) {
            return;
        }
        log::debug!(
            "Retargeting tab {} from {}/{} to {}/{}",
            tab.id,
            tab.space_id,
            tab.location_id,
            space_id,
            location_id
        );
        tab.space_id = space_id.to_string();
        tab.location_id = location_id.to_string();
        tab.pending_anchor = None;
        self.observer.on_changed();
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::tab::{TabDescriptor, TabId, TabSessionManager};
    use crate::testing::{RecordingObserver, RecordingRouter, RouterCall};
    use tab_session_config::Config;

    fn manager(config: Config) -> (TabSessionManager, RecordingRouter, ManualClock) {
        let router = RecordingRouter::new();
        let clock = ManualClock::new();
        let mut mgr = TabSessionManager::new(
            config,
            Box::new(router.clone()),
            Box::new(RecordingObserver::new()),
        )
        .with_clock(Box::new(clock.clone()));
        let first = mgr.create_tab(&TabDescriptor::new("S1", "L1"), false, None, false);
        mgr.move_to_tab(first);
        router.clear();
        clock.advance_ms(5000);
        (mgr, router, clock)
    }

    fn locations(mgr: &TabSessionManager) -> Vec<String> {
        mgr.tabs().iter().map(|t| t.location_id.clone()).collect()
    }

    #[test]
    fn legacy_policy_retargets_active_tab() {
        let (mut mgr, _, _) = manager(Config::default());
        let id = mgr.current_tab_id().unwrap();
        mgr.handle_channel_switch(&TabDescriptor::new("S2", "L9"));
        assert_eq!(mgr.tab_count(), 1);
        let tab = mgr.current_tab().unwrap();
        assert_eq!(tab.id, id);
        assert_eq!((tab.space_id.as_str(), tab.location_id.as_str()), ("S2", "L9"));
    }

    #[test]
    fn missing_space_matches_sentinel_tab() {
        let config = Config::default().with_navigation_policy(true, false, false);
        let (mut mgr, _, _) = manager(config);
        let dm = mgr.create_tab(&TabDescriptor::without_space("dm-1"), false, None, true);
        mgr.handle_channel_switch(&TabDescriptor {
            space_id: Some(String::new()),
            location_id: "dm-1".to_string(),
            compact: None,
        });
        assert_eq!(mgr.current_tab_id(), Some(dm));
    }

    #[test]
    fn switch_to_existing_tab_wins() {
        let config = Config::default().with_navigation_policy(true, true, true);
        let (mut mgr, _, _) = manager(config);
        let other = mgr.create_tab(&TabDescriptor::new("S1", "L2"), false, None, true);
        mgr.handle_channel_switch(&TabDescriptor::new("S1", "L2"));
        assert_eq!(mgr.current_tab_id(), Some(other));
        assert_eq!(mgr.tab_count(), 2);
    }

    #[test]
    fn slow_navigation_creates_one_tab_per_location() {
        let config = Config::default().with_navigation_policy(false, true, true);
        let (mut mgr, _, clock) = manager(config);
        mgr.handle_channel_switch(&TabDescriptor::new("S1", "L2"));
        clock.advance_ms(1500);
        mgr.handle_channel_switch(&TabDescriptor::new("S1", "L3"));
        assert_eq!(locations(&mgr), vec!["L1", "L2", "L3"]);
    }

    #[test]
    fn tab_driven_change_is_not_free_navigation() {
        let config = Config::default().with_navigation_policy(false, true, false);
        let (mut mgr, router, _) = manager(config);
        let second = mgr.create_tab(&TabDescriptor::new("S1", "L2"), false, None, true);
        mgr.move_to_tab(second);
        assert_eq!(router.calls(), vec![RouterCall::location("S1", "L2", None)]);

        // Router echoes the change back before the flag expires
        mgr.handle_channel_switch(&TabDescriptor::new("S1", "L2"));
        assert_eq!(mgr.tab_count(), 2);
    }

    #[test]
    fn bookmark_without_independent_mode_switches_tabs() {
        let (mut mgr, router, _) = manager(Config::default());
        let first = mgr.current_tab_id().unwrap();
        mgr.navigate_to_bookmark(&TabDescriptor::new("S1", "L7"));

        assert!(!mgr.is_viewing_via_bookmark());
        assert_eq!(mgr.current_tab_id(), Some(first));
        assert_eq!(mgr.current_tab().unwrap().location_id, "L7");
        assert_eq!(router.calls(), vec![RouterCall::location("S1", "L7", None)]);
    }

    #[test]
    fn independent_bookmark_leaves_tabs_untouched() {
        let config = Config::default().with_independent_bookmarks(true);
        let (mut mgr, router, _) = manager(config);
        let before: Vec<TabId> = mgr.tabs().iter().map(|t| t.id).collect();

        mgr.navigate_to_bookmark(&TabDescriptor::new("S1", "L5"));
        assert_eq!(mgr.tabs().iter().map(|t| t.id).collect::<Vec<_>>(), before);
        assert!(before.iter().all(|id| !mgr.is_tab_selected(*id)));
        assert_eq!(router.calls(), vec![RouterCall::location("S1", "L5", None)]);

        // The router's echo does not disturb the strip
        mgr.handle_channel_switch(&TabDescriptor::new("S1", "L5"));
        assert_eq!(locations(&mgr), vec!["L1"]);
    }

    #[test]
    fn tab_switch_reclaims_view_from_bookmark() {
        let config = Config::default().with_independent_bookmarks(true);
        let (mut mgr, _, _) = manager(config);
        let first = mgr.current_tab_id().unwrap();
        mgr.navigate_to_bookmark(&TabDescriptor::new("S1", "L5"));
        assert!(!mgr.is_tab_selected(first));

        mgr.move_to_tab(first);
        assert!(!mgr.is_viewing_via_bookmark());
        assert!(mgr.is_tab_selected(first));
    }

    #[test]
    fn independent_bookmark_to_synthetic_location_uses_path() {
        let config = Config::default().with_independent_bookmarks(true);
        let (mut mgr, router, _) = manager(config);
        mgr.navigate_to_bookmark(&TabDescriptor::without_space("@store"));
        assert_eq!(router.calls(), vec![RouterCall::Path("/store".to_string())]);
    }
}
