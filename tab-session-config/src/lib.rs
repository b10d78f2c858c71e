//! Configuration system for the tab-session browsing session manager.
//!
//! This crate provides configuration loading, saving, and default values
//! for the tab session. It includes:
//!
//! - Navigation policy toggles (switch to existing tab, auto-create, rapid merge)
//! - Startup restoration policy and per-owner tab presets
//! - The static route table for synthetic locations
//! - Timing windows for the session's deadline-based timers

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{StartupBehavior, TabPreset};
