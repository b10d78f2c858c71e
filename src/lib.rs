// Library exports for hosts embedding the tab session, and for testing
//
// # Threading
//
// The session is single-threaded and event driven. `TabSessionManager` and
// the test doubles in `testing` use `Rc`/`Cell` and are not
// `Send`; hosts drive them from their UI thread. Only the persistence
// store is async, and `MemoryStore` guards its map with `parking_lot::Mutex`
// so it can also be shared with background save tasks.

/// Crate version, reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod clock;
pub mod navigation;
pub mod routes;
pub mod session;
pub mod tab;
pub mod testing;
pub mod traits;
pub mod traits_impl;

pub use session::{
    FileStore, MemoryStore, PersistenceStore, RestoreOutcome, SessionPersister, StartupRestorer,
};
pub use tab::{Tab, TabDescriptor, TabId, TabSessionManager};
pub use tab_session_config::{Config, StartupBehavior, TabPreset};
