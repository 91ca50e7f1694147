//! Error types for connection-profile handling

use std::path::PathBuf;

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading or validating a profile
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Profile file could not be read
    #[error("failed to read profile '{path}': {source}")]
    Io {
        /// Path to the profile file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Profile file is not valid TOML
    #[error("failed to parse profile '{path}': {source}")]
    Parse {
        /// Path to the profile file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A required connection parameter is absent
    #[error("missing required configuration key: {key}")]
    MissingKey {
        /// Name of the missing key
        key: &'static str,
    },

    /// The profile names a store backend this build does not know
    #[error("unknown store backend '{kind}' (expected 'local' or 'webdav')")]
    UnknownBackend {
        /// The unrecognized backend name
        kind: String,
    },

    /// No profile files were found in the profiles directory
    #[error("no profile files found in '{dir}'")]
    NoProfiles {
        /// Directory that was searched
        dir: PathBuf,
    },
}

impl From<ConfigError> for remsync_types::Error {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string())
    }
}
