//! Default value functions for configuration.
//!
//! Each function is used as a `#[serde(default = "crate::defaults::...")]`
//! attribute on a `Config` field.

use crate::types::{StartupBehavior, TabPreset};
use std::collections::BTreeMap;

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

pub fn bool_true() -> bool {
    true
}

// ── Startup ────────────────────────────────────────────────────────────────

pub fn on_startup() -> StartupBehavior {
    StartupBehavior::Remember
}

pub fn conflicting_feature() -> String {
    "legacy-tab-bar".to_string()
}

pub fn presets() -> BTreeMap<String, Vec<TabPreset>> {
    BTreeMap::new()
}

// ── Navigation ─────────────────────────────────────────────────────────────

pub fn rapid_navigation_threshold_ms() -> u64 {
    1000
}

pub fn synthetic_routes() -> BTreeMap<String, String> {
    [
        ("@home", "/"),
        ("@library", "/library"),
        ("@discover", "/discover"),
        ("@store", "/store"),
    ]
    .into_iter()
    .map(|(marker, path)| (marker.to_string(), path.to_string()))
    .collect()
}

// ── Timers ─────────────────────────────────────────────────────────────────

pub fn navigation_context_ttl_ms() -> u64 {
    2000
}

pub fn ghost_tab_timeout_ms() -> u64 {
    3000
}

pub fn tab_navigation_flag_ms() -> u64 {
    100 // Safety bound for asynchronous router transitions
}

pub fn scroll_restore_delay_ms() -> u64 {
    16 + 50 // One animation frame plus a short mount timer
}
