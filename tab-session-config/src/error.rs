//! Failure modes of loading, saving and validating tab-session settings.
//!
//! `Config::load_from` wraps these in `anyhow` context; match on them with
//! `downcast_ref::<ConfigError>()`.

use std::fmt;

/// Why a settings file could not be used
///
/// ```rust,no_run
/// use tab_session_config::{Config, ConfigError};
///
/// if let Err(e) = Config::load() {
///     match e.downcast_ref::<ConfigError>() {
///         Some(ConfigError::RelativeRoutePath { marker, .. }) => {
///             eprintln!("fix the route for {marker}")
///         }
///         _ => eprintln!("{e:#}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml_ng::Error),
    /// A `*_ms` timer that must be positive was set to zero
    ZeroDuration { field: &'static str },
    /// `synthetic_routes` has an entry keyed by the empty string
    EmptyRouteMarker,
    /// A synthetic marker maps to a host path that does not start with `/`
    RelativeRoutePath { marker: String, path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not access settings file: {e}"),
            ConfigError::Parse(e) => write!(f, "settings file is not valid YAML: {e}"),
            ConfigError::ZeroDuration { field } => {
                write!(f, "{field} must be greater than zero")
            }
            ConfigError::EmptyRouteMarker => {
                write!(f, "synthetic_routes contains an empty marker")
            }
            ConfigError::RelativeRoutePath { marker, path } => write!(
                f,
                "synthetic route '{marker}' must map to an absolute path, got '{path}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::Parse(e)
    }
}
