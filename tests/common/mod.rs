//! Shared integration test helpers for tab-session.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::{Session, session, session_with_tabs};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use tab_session::clock::ManualClock;
use tab_session::tab::{TabDescriptor, TabId, TabSessionManager};
use tab_session::testing::{RecordingObserver, RecordingRouter};
use tab_session_config::Config;

/// A manager wired to recording doubles and a manual clock
pub struct Session {
    pub mgr: TabSessionManager,
    pub router: RecordingRouter,
    pub observer: RecordingObserver,
    pub clock: ManualClock,
}

impl Session {
    pub fn ids(&self) -> Vec<TabId> {
        self.mgr.tabs().iter().map(|t| t.id).collect()
    }

    pub fn closed_ids(&self) -> Vec<TabId> {
        self.mgr.closed_tabs().iter().map(|t| t.id).collect()
    }

    pub fn locations(&self) -> Vec<String> {
        self.mgr.tabs().iter().map(|t| t.location_id.clone()).collect()
    }
}

/// An empty session using `config`
pub fn session(config: Config) -> Session {
    let router = RecordingRouter::new();
    let observer = RecordingObserver::new();
    let clock = ManualClock::new();
    let mgr = TabSessionManager::new(config, Box::new(router.clone()), Box::new(observer.clone()))
        .with_clock(Box::new(clock.clone()));
    Session {
        mgr,
        router,
        observer,
        clock,
    }
}

/// A session with one background tab per location in space `S1`
///
/// The first tab is active; the router log is cleared afterwards.
pub fn session_with_tabs(config: Config, locations: &[&str]) -> Session {
    let mut s = session(config);
    for loc in locations {
        s.mgr
            .create_tab(&TabDescriptor::new("S1", *loc), false, None, true);
    }
    s.router.clear();
    s
}

/// Assert the structural invariants that must hold after every operation
pub fn assert_invariants(mgr: &TabSessionManager) {
    assert!(mgr.tab_count() >= 1, "session must keep at least one tab");

    let active = mgr.current_tab_id().expect("session must have an active tab");
    assert!(
        mgr.get_tab(active).is_some(),
        "active tab {} is not open (open: {:?})",
        active,
        mgr.tabs().iter().map(|t| t.id).collect::<Vec<_>>()
    );

    let mut all: Vec<TabId> = mgr
        .tabs()
        .iter()
        .chain(mgr.closed_tabs())
        .map(|t| t.id)
        .collect();
    let total = all.len();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), total, "tab ids must be unique across open and closed tabs");
}
