//! Command-line interface for tab-session.
//!
//! The binary is an inspection tool: it prints what a host would restore
//! on its next start and where settings are read from.

use crate::session::{FileStore, PersistedSession, PersistenceStore, STORE_KEY, StartupRestorer};
use crate::tab::{TabDescriptor, TabSessionManager};
use crate::traits_impl::{LogNotices, NoFeatures};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::PathBuf;
use tab_session_config::Config;

/// Location opened when a preview falls back to a default tab
const PREVIEW_DEFAULT_LOCATION: &str = "@home";

/// tab-session - inspect saved multi-tab browsing sessions
#[derive(Parser)]
#[command(name = "tab-session")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log verbosity (overrides RUST_LOG and DEBUG_LEVEL)
    #[arg(long, value_enum, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print saved sessions (default command)
    Show {
        /// Store file to read (default: store.json in the config directory)
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,

        /// Only print this session owner
        #[arg(long, value_name = "ID")]
        owner: Option<String>,
    },
    /// Replay startup restoration headless and print the resulting tabs
    Preview {
        /// Session owner to restore
        owner: String,

        /// Store file to read (default: store.json in the config directory)
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,
    },
    /// Print the config file location
    ConfigPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Run a parsed command line
pub async fn run(command: Option<Commands>) -> anyhow::Result<()> {
    match command.unwrap_or(Commands::Show {
        store: None,
        owner: None,
    }) {
        Commands::Show { store, owner } => {
            let config = Config::load()?;
            println!("On startup: {}", config.on_startup.display_name());
            let store = store.map(FileStore::new).unwrap_or_else(FileStore::at_default_location);
            print!("{}", render_sessions(&store, owner.as_deref()).await?);
        }
        Commands::Preview { owner, store } => {
            let config = Config::load()?;
            let store = store.map(FileStore::new).unwrap_or_else(FileStore::at_default_location);
            print!("{}", preview_restore(&store, config, &owner).await);
        }
        Commands::ConfigPath => {
            println!("{}", Config::config_path().display());
        }
    }
    Ok(())
}

/// Render the saved sessions in `store`, optionally for one owner only
pub async fn render_sessions<S: PersistenceStore>(
    store: &S,
    owner: Option<&str>,
) -> anyhow::Result<String> {
    let blob = store
        .get(STORE_KEY)
        .await
        .context("Failed to read the session store")?;

    let owners = match blob {
        None => return Ok("No saved sessions\n".to_string()),
        Some(Value::Object(owners)) => owners,
        Some(_) => anyhow::bail!("Saved sessions are not a JSON object"),
    };

    let mut out = String::new();
    let mut shown = 0;
    for (owner_id, entry) in &owners {
        if owner.is_some_and(|wanted| wanted != owner_id.as_str()) {
            continue;
        }
        shown += 1;
        match serde_json::from_value::<PersistedSession>(entry.clone()) {
            Ok(session) => render_session(&mut out, owner_id, &session),
            Err(e) => {
                let _ = writeln!(out, "{}: unreadable ({})", owner_id, e);
            }
        }
    }

    if shown == 0 {
        match owner {
            Some(wanted) => {
                let _ = writeln!(out, "No saved session for owner {}", wanted);
            }
            None => out.push_str("No saved sessions\n"),
        }
    }
    Ok(out)
}

/// Run the configured startup restoration against `store` without a host
///
/// Nothing is written back. Notices go to the log.
pub async fn preview_restore<S: PersistenceStore>(store: &S, config: Config, owner: &str) -> String {
    let mut manager = TabSessionManager::headless(config);
    let default = TabDescriptor::without_space(PREVIEW_DEFAULT_LOCATION);
    let outcome = StartupRestorer::new(store, &NoFeatures, &LogNotices)
        .restore(&mut manager, owner, &default)
        .await;

    let mut out = String::new();
    let _ = writeln!(out, "Outcome: {:?}", outcome);
    render_session(&mut out, owner, &manager.snapshot());
    out
}

fn render_session(out: &mut String, owner_id: &str, session: &PersistedSession) {
    let active = session.active_index().unwrap_or(0);
    let _ = writeln!(out, "{} ({} tabs)", owner_id, session.open_tabs.len());
    for (index, tab) in session.open_tabs.iter().enumerate() {
        let marker = if index == active { '*' } else { ' ' };
        let density = if tab.compact { " [compact]" } else { "" };
        let _ = writeln!(
            out,
            "  {} {}. {}/{}{}",
            marker,
            index + 1,
            tab.space_id,
            tab.location_id,
            density
        );
    }
}
