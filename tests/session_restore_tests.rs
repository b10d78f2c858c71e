//! Save and restore through real store backends
//!
//! Covers the remember/preset/nothing startup policies end to end, including
//! a file-backed store in a temp directory.

mod common;

use common::{assert_invariants, session, session_with_tabs};
use serde_json::json;
use tab_session::session::restore::RESTORE_FAILED_NOTICE;
use tab_session::session::{
    FileStore, MemoryStore, PersistenceStore, RestoreOutcome, STORE_KEY, SessionPersister,
    StartupRestorer,
};
use tab_session::tab::TabDescriptor;
use tab_session::testing::{RecordingNotices, RouterCall, StaticFeatures};
use tab_session_config::{Config, StartupBehavior, TabPreset};
use tempfile::TempDir;

fn fingerprint(s: &common::Session) -> Vec<(String, String, bool)> {
    s.mgr
        .tabs()
        .iter()
        .map(|t| (t.space_id.clone(), t.location_id.clone(), t.compact))
        .collect()
}

fn home() -> TabDescriptor {
    TabDescriptor::without_space("@home")
}

#[tokio::test]
async fn test_save_then_restore_reproduces_tabs_and_active_index() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().join("store.json"));

    let mut original = session_with_tabs(Config::default(), &["L1", "L2"]);
    original
        .mgr
        .create_tab(&TabDescriptor::without_space("dm-4").with_compact(true), false, None, true);
    original
        .mgr
        .create_tab(&TabDescriptor::without_space("@library"), false, None, true);
    original.mgr.move_to_tab(3);
    SessionPersister::new(&store)
        .save(&original.mgr, "alice")
        .await
        .unwrap();

    let mut restored = session(Config::default());
    let notices = RecordingNotices::new();
    let features = StaticFeatures::default();
    let outcome = StartupRestorer::new(&store, &features, &notices)
        .restore(&mut restored.mgr, "alice", &home())
        .await;

    assert_eq!(outcome, RestoreOutcome::Restored(4));
    assert_eq!(fingerprint(&restored), fingerprint(&original));
    assert_eq!(restored.mgr.active_tab_index(), original.mgr.active_tab_index());
    assert!(notices.messages().is_empty());

    // Only the committed initial navigation is in history
    let active = restored.mgr.current_tab_id().unwrap();
    assert_eq!(restored.mgr.history(), &[active]);
    assert_eq!(
        restored.router.calls(),
        vec![RouterCall::location("@me", "dm-4", None)]
    );
    assert_invariants(&restored.mgr);
}

#[tokio::test]
async fn test_restore_replaces_existing_tabs() {
    let store = MemoryStore::new();
    let saved = session_with_tabs(Config::default(), &["L7"]);
    SessionPersister::new(&store).save(&saved.mgr, "alice").await.unwrap();

    let mut s = session_with_tabs(Config::default(), &["X1", "X2"]);
    let outcome = StartupRestorer::new(&store, &StaticFeatures::default(), &RecordingNotices::new())
        .restore(&mut s.mgr, "alice", &home())
        .await;

    assert_eq!(outcome, RestoreOutcome::Restored(1));
    assert_eq!(s.locations(), vec!["L7"]);
    assert!(s.mgr.closed_tabs().is_empty());
}

#[tokio::test]
async fn test_owners_are_saved_independently() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().join("store.json"));

    let alice = session_with_tabs(Config::default(), &["A1", "A2"]);
    let bob = session_with_tabs(Config::default(), &["B1"]);
    let persister = SessionPersister::new(&store);
    persister.save(&alice.mgr, "alice").await.unwrap();
    persister.save(&bob.mgr, "bob").await.unwrap();

    let blob = store.get(STORE_KEY).await.unwrap().unwrap();
    assert_eq!(blob["alice"]["openTabs"].as_array().map(Vec::len), Some(2));
    assert_eq!(blob["bob"]["openTabs"][0]["locationId"], "B1");
}

#[tokio::test]
async fn test_missing_session_shows_notice_and_opens_default() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().join("never-written.json"));
    let mut s = session(Config::default());
    let notices = RecordingNotices::new();

    let outcome = StartupRestorer::new(&store, &StaticFeatures::default(), &notices)
        .restore(&mut s.mgr, "alice", &home())
        .await;

    assert_eq!(outcome, RestoreOutcome::Failed);
    assert_eq!(notices.messages(), vec![RESTORE_FAILED_NOTICE.to_string()]);
    assert_eq!(s.locations(), vec!["@home"]);
    assert_eq!(s.router.calls(), vec![RouterCall::Path("/".to_string())]);
}

#[tokio::test]
async fn test_corrupt_store_file_shows_notice() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    std::fs::write(&path, "{{{").unwrap();
    let store = FileStore::new(path);
    let mut s = session(Config::default());
    let notices = RecordingNotices::new();

    let outcome = StartupRestorer::new(&store, &StaticFeatures::default(), &notices)
        .restore(&mut s.mgr, "alice", &home())
        .await;

    assert_eq!(outcome, RestoreOutcome::Failed);
    assert_eq!(notices.messages().len(), 1);
    assert_invariants(&s.mgr);
}

#[tokio::test]
async fn test_empty_saved_tab_list_falls_back_to_default() {
    let store = MemoryStore::new();
    store.insert(STORE_KEY, json!({"alice": {"openTabs": [], "openTabIndex": 0}}));
    let mut s = session(Config::default());

    let outcome = StartupRestorer::new(&store, &StaticFeatures::default(), &RecordingNotices::new())
        .restore(&mut s.mgr, "alice", &home())
        .await;

    assert_eq!(outcome, RestoreOutcome::Restored(0));
    assert_eq!(s.locations(), vec!["@home"]);
}

#[tokio::test]
async fn test_conflicting_feature_wins_over_remember() {
    let store = MemoryStore::new();
    let saved = session_with_tabs(Config::default(), &["L1", "L2"]);
    SessionPersister::new(&store).save(&saved.mgr, "alice").await.unwrap();

    let mut s = session(Config::default());
    let notices = RecordingNotices::new();
    let features = StaticFeatures::with_enabled(&["legacy-tab-bar"]);
    let outcome = StartupRestorer::new(&store, &features, &notices)
        .restore(&mut s.mgr, "alice", &home())
        .await;

    assert_eq!(outcome, RestoreOutcome::Skipped);
    assert_eq!(notices.messages().len(), 1);
    assert_eq!(s.locations(), vec!["@home"]);
}

#[tokio::test]
async fn test_preset_for_other_owner_is_ignored() {
    let config = Config::default()
        .with_startup(StartupBehavior::Preset)
        .with_preset(
            "bob",
            vec![TabPreset {
                space_id: Some("S9".to_string()),
                location_id: "L9".to_string(),
                compact: None,
            }],
        );
    let mut s = session(config);
    let outcome = StartupRestorer::new(
        &MemoryStore::new(),
        &StaticFeatures::default(),
        &RecordingNotices::new(),
    )
    .restore(&mut s.mgr, "alice", &home())
    .await;

    assert_eq!(outcome, RestoreOutcome::Default);
    assert_eq!(s.locations(), vec!["@home"]);
}

#[tokio::test]
async fn test_nothing_policy_keeps_existing_tabs() {
    let mut s = session_with_tabs(
        Config::default().with_startup(StartupBehavior::Nothing),
        &["L1", "L2"],
    );
    s.mgr.move_to_tab(2);

    let outcome = StartupRestorer::new(
        &MemoryStore::new(),
        &StaticFeatures::default(),
        &RecordingNotices::new(),
    )
    .restore(&mut s.mgr, "alice", &home())
    .await;

    assert_eq!(outcome, RestoreOutcome::Default);
    assert_eq!(s.locations(), vec!["L1", "L2"]);
    assert_eq!(s.mgr.history(), &[2]);
}
