//! Recording test doubles for the host seams.
//!
//! Each double is a cheap handle over shared state: keep one clone in the
//! test and hand the other to the session, then inspect what the session did.
//! Single-threaded by construction, like the session itself.

use crate::tab::TabId;
use crate::traits::{FeatureQuery, NoticeSink, RouterBridge, SessionObserver};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// One call made to a [`RecordingRouter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCall {
    Path(String),
    Location {
        space_id: String,
        location_id: String,
        anchor: Option<String>,
    },
}

impl RouterCall {
    pub fn location(space_id: &str, location_id: &str, anchor: Option<&str>) -> Self {
        RouterCall::Location {
            space_id: space_id.to_string(),
            location_id: location_id.to_string(),
            anchor: anchor.map(str::to_string),
        }
    }
}

#[derive(Debug, Default)]
struct RouterState {
    calls: Vec<RouterCall>,
    current: Option<(Option<String>, String)>,
    frozen: bool,
}

/// Router that records transitions
///
/// By default the reported current location follows each location
/// transition, like a router that settles instantly. `set_following(false)`
/// freezes it.
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    state: Rc<RefCell<RouterState>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RouterCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn set_current(&self, space_id: Option<&str>, location_id: &str) {
        self.state.borrow_mut().current =
            Some((space_id.map(str::to_string), location_id.to_string()));
    }

    pub fn set_following(&self, following: bool) {
        self.state.borrow_mut().frozen = !following;
    }
}

impl RouterBridge for RecordingRouter {
    fn transition_to_path(&self, path: &str) {
        self.state
            .borrow_mut()
            .calls
            .push(RouterCall::Path(path.to_string()));
    }

    fn transition_to_location(&self, space_id: &str, location_id: &str, anchor: Option<&str>) {
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(RouterCall::location(space_id, location_id, anchor));
        if !state.frozen {
            state.current = Some((Some(space_id.to_string()), location_id.to_string()));
        }
    }

    fn current_location_id(&self) -> Option<String> {
        self.state
            .borrow()
            .current
            .as_ref()
            .map(|(_, location)| location.clone())
    }

    fn current_space_id(&self) -> Option<String> {
        self.state
            .borrow()
            .current
            .as_ref()
            .and_then(|(space, _)| space.clone())
    }
}

#[derive(Debug, Default)]
struct ObserverState {
    changed: usize,
    ghost_events: Vec<usize>,
    scroll_position: Option<f64>,
    restores: Vec<(TabId, f64)>,
}

/// Observer that counts notifications and reports a settable scroll offset
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    state: Rc<RefCell<ObserverState>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changed_count(&self) -> usize {
        self.state.borrow().changed
    }

    pub fn ghost_events(&self) -> Vec<usize> {
        self.state.borrow().ghost_events.clone()
    }

    /// Offset reported as currently on screen
    pub fn set_scroll_position(&self, offset: Option<f64>) {
        self.state.borrow_mut().scroll_position = offset;
    }

    pub fn restores(&self) -> Vec<(TabId, f64)> {
        self.state.borrow().restores.clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_changed(&self) {
        self.state.borrow_mut().changed += 1;
    }

    fn on_ghost_tab(&self, count: usize) {
        self.state.borrow_mut().ghost_events.push(count);
    }

    fn scroll_position(&self) -> Option<f64> {
        self.state.borrow().scroll_position
    }

    fn on_restore_scroll(&self, tab_id: TabId, offset: f64) {
        self.state.borrow_mut().restores.push((tab_id, offset));
    }
}

/// Feature registry with a fixed set of enabled features
#[derive(Debug, Clone, Default)]
pub struct StaticFeatures {
    enabled: HashSet<String>,
}

impl StaticFeatures {
    pub fn with_enabled(names: &[&str]) -> Self {
        Self {
            enabled: names.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl FeatureQuery for StaticFeatures {
    fn is_feature_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}

/// Notice sink that keeps every message
#[derive(Debug, Clone, Default)]
pub struct RecordingNotices {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl NoticeSink for RecordingNotices {
    fn show_failure_toast(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
