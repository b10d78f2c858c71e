use parking_lot::Mutex;
/// Debug logging for the tab session
///
/// Controlled by the DEBUG_LEVEL environment variable:
/// - 0 or unset: No debugging
/// - 1: Errors only
/// - 2: Info level (restores, saves, tab lifecycle)
/// - 3: Debug level (navigation decisions)
/// - 4: Trace level (timers, scroll restores)
///
/// Output goes to `tab_session_debug.log` in the system temp directory so it
/// never interleaves with whatever the host prints. `init_log_bridge` routes
/// the `log` crate's records into the same file.
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        std::env::var("DEBUG_LEVEL")
            .ok()
            .and_then(|val| val.trim().parse::<u8>().ok())
            .map(Self::from_u8)
            .unwrap_or(DebugLevel::Off)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => DebugLevel::Error,
            2 => DebugLevel::Info,
            3 => DebugLevel::Debug,
            4.. => DebugLevel::Trace,
            0 => DebugLevel::Off,
        }
    }

    fn from_log_level(level: log::Level) -> Self {
        match level {
            log::Level::Error | log::Level::Warn => DebugLevel::Error,
            log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }

    fn from_filter(filter: log::LevelFilter) -> Self {
        filter
            .to_level()
            .map(Self::from_log_level)
            .unwrap_or(DebugLevel::Off)
    }
}

/// Location of the debug log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("tab_session_debug.log")
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new() -> Self {
        let mut logger = DebugLogger {
            level: DebugLevel::from_env(),
            file: None,
        };
        if logger.level != DebugLevel::Off {
            logger.open_file();
        }
        logger
    }

    fn open_file(&mut self) {
        if self.file.is_some() {
            return;
        }
        // Silently run without a file if it can't be opened
        if let Ok(f) = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            self.file = Some(f);
            self.write_raw(&format!(
                "\n{}\ntab-session debug log started at {} (level={:?})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                self.level,
                "=".repeat(80)
            ));
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            let level_str = match level {
                DebugLevel::Error => "ERROR",
                DebugLevel::Info => "INFO ",
                DebugLevel::Debug => "DEBUG",
                DebugLevel::Trace => "TRACE",
                DebugLevel::Off => return,
            };
            self.write_raw(&format!(
                "[{}] [{}] [{}] {}\n",
                get_timestamp(),
                level_str,
                category,
                msg
            ));
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn get_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Change the active level, opening the log file if needed
pub fn set_level(level: DebugLevel) {
    let mut logger = get_logger().lock();
    logger.level = level;
    if level != DebugLevel::Off {
        logger.open_file();
    }
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

// ── log crate bridge ─────────────────────────────────────────────────────────

/// Forwards `log` records into the debug file, and to stderr when asked
struct LogBridge {
    mirror_to_stderr: bool,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = DebugLevel::from_log_level(record.level());
        crate::debug::log(level, record.target(), &record.args().to_string());
        if self.mirror_to_stderr {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Install the `log` facade bridge
///
/// Precedence for the level: `cli_level`, then RUST_LOG, then DEBUG_LEVEL.
/// When RUST_LOG is set, records are mirrored to stderr as well.
/// Calling this more than once keeps the first logger and only adjusts the level.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let rust_log = std::env::var("RUST_LOG")
        .ok()
        .and_then(|val| val.trim().parse::<log::LevelFilter>().ok());

    let filter = cli_level.or(rust_log).unwrap_or_else(|| {
        match get_logger().lock().level {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Warn,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    });

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        mirror_to_stderr: rust_log.is_some(),
    });
    if log::set_logger(bridge).is_err() {
        log::debug!("Log bridge already installed");
    }
    log::set_max_level(filter);
    set_level(DebugLevel::from_filter(filter));
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_levels_map_in_order() {
        assert_eq!(DebugLevel::from_u8(0), DebugLevel::Off);
        assert_eq!(DebugLevel::from_u8(2), DebugLevel::Info);
        assert_eq!(DebugLevel::from_u8(9), DebugLevel::Trace);
        assert!(DebugLevel::Error < DebugLevel::Trace);
    }

    #[test]
    fn log_filters_map_to_debug_levels() {
        assert_eq!(DebugLevel::from_filter(log::LevelFilter::Off), DebugLevel::Off);
        assert_eq!(DebugLevel::from_filter(log::LevelFilter::Warn), DebugLevel::Error);
        assert_eq!(DebugLevel::from_filter(log::LevelFilter::Debug), DebugLevel::Debug);
    }
}
