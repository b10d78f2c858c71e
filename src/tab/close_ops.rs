//! Closing and reopening tabs.
//!
//! Closed tabs are pushed onto `closed_tabs` as plain data. Bulk closes push
//! right-to-left so the tabs that were visible nearest the kept tab end up
//! on top of the undo stack.

use super::{Tab, TabDescriptor, TabId, TabSessionManager};

impl TabSessionManager {
    /// Close a tab by ID
    ///
    /// Refuses to close the last open tab. When the closed tab was active,
    /// the most recent still-open tab in history becomes active; with no
    /// usable history, the tab left of the closed position does.
    pub fn close_tab(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("close_tab", id);
            return;
        };
        if self.tabs.len() <= 1 {
            log::debug!("Refusing to close tab {}: it is the last open tab", id);
            return;
        }

        log::info!("Closing tab {} (index {})", id, index);
        let was_rightmost = index == self.tabs.len() - 1;
        let tab = self.tabs.remove(index);
        self.retire(tab);

        if self.active_tab_id == Some(id) {
            let successor = self.resolve_successor(index);
            self.move_to_tab(successor);
        }

        if was_rightmost {
            self.clear_ghost_tab();
        } else {
            self.bump_ghost_tab();
        }
        self.observer.on_changed();
    }

    /// Close every tab except `id`
    pub fn close_other_tabs(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("close_other_tabs", id);
            return;
        };
        self.retain_range(id, index, index + 1);
    }

    /// Close every tab right of `id`
    pub fn close_tabs_to_the_right(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("close_tabs_to_the_right", id);
            return;
        };
        self.retain_range(id, 0, index + 1);
    }

    /// Close every tab left of `id`
    pub fn close_tabs_to_the_left(&mut self, id: TabId) {
        let Some(index) = self.index_of(id) else {
            self.log_unknown_tab("close_tabs_to_the_left", id);
            return;
        };
        let len = self.tabs.len();
        self.retain_range(id, index, len);
    }

    /// Reopen the most recently closed tab as a new tab and switch to it
    ///
    /// The reopened tab gets a fresh id; its location, density and pending
    /// anchor are carried over. Returns `None` when nothing was closed.
    pub fn reopen_closed_tab(&mut self) -> Option<TabId> {
        let Some(tab) = self.closed_tabs.pop() else {
            log::debug!("No recently closed tabs to reopen");
            return None;
        };
        log::info!("Reopening closed tab {} as a new tab", tab.id);
        let descriptor = TabDescriptor::from(&tab);
        Some(self.create_tab(&descriptor, true, tab.pending_anchor.as_deref(), true))
    }

    /// Keep `tabs[start..end]` (which contains `anchor`) and close the rest
    fn retain_range(&mut self, anchor: TabId, start: usize, end: usize) {
        let right: Vec<Tab> = self.tabs.drain(end..).collect();
        let left: Vec<Tab> = self.tabs.drain(..start).collect();
        if left.is_empty() && right.is_empty() {
            log::debug!("Nothing to close around tab {}", anchor);
            return;
        }

        log::info!(
            "Closing {} tabs around tab {} (remaining: {})",
            left.len() + right.len(),
            anchor,
            self.tabs.len()
        );
        for tab in left.into_iter().chain(right).rev() {
            self.retire(tab);
        }

        // The anchor is the nearest retained tab in every variant
        if self.current_tab().is_none() {
            self.move_to_tab(anchor);
        }

        self.clear_ghost_tab();
        self.observer.on_changed();
    }

    /// Push a removed tab onto the undo stack and drop its cached state
    fn retire(&mut self, tab: Tab) {
        self.state_cache.remove(tab.id);
        self.closed_tabs.push(tab);
    }

    /// Pop history until it names a tab that is still open
    fn resolve_successor(&mut self, removed_index: usize) -> TabId {
        while let Some(candidate) = self.history.pop() {
            if self.index_of(candidate).is_some() {
                return candidate;
            }
        }
        let fallback = removed_index
            .saturating_sub(1)
            .min(self.tabs.len().saturating_sub(1));
        self.tabs[fallback].id
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::tab::{TabDescriptor, TabId, TabSessionManager};
    use crate::testing::{RecordingObserver, RecordingRouter};
    use tab_session_config::Config;

    fn manager_with_locations(
        locations: &[&str],
    ) -> (TabSessionManager, RecordingObserver, ManualClock) {
        let observer = RecordingObserver::new();
        let clock = ManualClock::new();
        let mut mgr = TabSessionManager::new(
            Config::default(),
            Box::new(RecordingRouter::new()),
            Box::new(observer.clone()),
        )
        .with_clock(Box::new(clock.clone()));
        for loc in locations {
            mgr.create_tab(&TabDescriptor::new("S1", *loc), false, None, true);
        }
        (mgr, observer, clock)
    }

    fn ids(mgr: &TabSessionManager) -> Vec<TabId> {
        mgr.tabs().iter().map(|t| t.id).collect()
    }

    fn closed_ids(mgr: &TabSessionManager) -> Vec<TabId> {
        mgr.closed_tabs().iter().map(|t| t.id).collect()
    }

    #[test]
    fn last_tab_cannot_be_closed() {
        let (mut mgr, _, _) = manager_with_locations(&["L1"]);
        mgr.close_tab(1);
        assert_eq!(ids(&mgr), vec![1]);
        assert!(mgr.closed_tabs().is_empty());
    }

    #[test]
    fn unknown_id_is_ignored() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2"]);
        mgr.close_tab(42);
        mgr.close_other_tabs(42);
        mgr.close_tabs_to_the_left(42);
        mgr.close_tabs_to_the_right(42);
        assert_eq!(ids(&mgr), vec![1, 2]);
    }

    #[test]
    fn closing_active_tab_prefers_history() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3"]);
        mgr.move_to_tab(3);
        mgr.move_to_tab(2);
        mgr.close_tab(2);
        assert_eq!(mgr.current_tab_id(), Some(3));
    }

    #[test]
    fn history_entries_for_closed_tabs_are_skipped() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3", "L4"]);
        mgr.move_to_tab(2);
        mgr.move_to_tab(4);
        mgr.move_to_tab(3);
        mgr.close_tab(4);
        // history tail is now [.., 2, 4, 3]; closing 3 skips the dead 4
        mgr.close_tab(3);
        assert_eq!(mgr.current_tab_id(), Some(2));
    }

    #[test]
    fn exhausted_history_falls_back_to_left_neighbor() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3", "L4"]);
        mgr.move_to_tab(3);
        mgr.close_tab(1);
        // Every history entry now names a closed tab
        mgr.close_tab(3);
        assert_eq!(ids(&mgr), vec![2, 4]);
        assert_eq!(mgr.current_tab_id(), Some(2));
    }

    #[test]
    fn closing_cached_tab_drops_its_state() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2"]);
        mgr.record_scroll_position(2, 90.0);
        mgr.close_tab(2);
        assert!(mgr.state_cache().get(2).is_none());
    }

    #[test]
    fn ghost_tab_bumps_for_inner_close_and_expires() {
        let (mut mgr, observer, clock) = manager_with_locations(&["L1", "L2", "L3"]);
        mgr.close_tab(2);
        assert_eq!(mgr.ghost_tab_count(), 1);
        assert_eq!(observer.ghost_events(), vec![1]);

        clock.advance_ms(2999);
        mgr.tick();
        assert_eq!(mgr.ghost_tab_count(), 1);

        clock.advance_ms(1);
        mgr.tick();
        assert_eq!(mgr.ghost_tab_count(), 0);
        assert_eq!(observer.ghost_events(), vec![1, 0]);
    }

    #[test]
    fn closing_rightmost_tab_clears_ghost() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3", "L4"]);
        mgr.close_tab(2);
        assert_eq!(mgr.ghost_tab_count(), 1);
        mgr.close_tab(4);
        assert_eq!(mgr.ghost_tab_count(), 0);
    }

    #[test]
    fn close_other_tabs_keeps_only_target() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3", "L4"]);
        mgr.close_other_tabs(3);
        assert_eq!(ids(&mgr), vec![3]);
        assert_eq!(closed_ids(&mgr), vec![4, 2, 1]);
        assert_eq!(mgr.current_tab_id(), Some(3));
    }

    #[test]
    fn close_to_the_left_switches_to_leftmost_retained() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3", "L4"]);
        assert_eq!(mgr.current_tab_id(), Some(1));
        mgr.close_tabs_to_the_left(3);
        assert_eq!(ids(&mgr), vec![3, 4]);
        assert_eq!(closed_ids(&mgr), vec![2, 1]);
        assert_eq!(mgr.current_tab_id(), Some(3));
    }

    #[test]
    fn bulk_close_keeps_active_tab_if_retained() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3", "L4"]);
        mgr.move_to_tab(4);
        mgr.close_tabs_to_the_left(3);
        assert_eq!(mgr.current_tab_id(), Some(4));
    }

    #[test]
    fn reopen_pops_most_recent_close() {
        let (mut mgr, _, _) = manager_with_locations(&["L1", "L2", "L3"]);
        mgr.close_tab(2);
        mgr.close_tab(3);
        let reopened = mgr.reopen_closed_tab().unwrap();
        let tab = mgr.get_tab(reopened).unwrap();
        assert_eq!(tab.location_id, "L3");
        assert_eq!(mgr.current_tab_id(), Some(reopened));
        assert_eq!(closed_ids(&mgr), vec![2]);
    }

    #[test]
    fn reopen_with_empty_stack_returns_none() {
        let (mut mgr, _, _) = manager_with_locations(&["L1"]);
        assert!(mgr.reopen_closed_tab().is_none());
        assert_eq!(ids(&mgr), vec![1]);
    }
}
