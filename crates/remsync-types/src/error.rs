//! Error types and handling for remsync
//!
//! The error taxonomy mirrors the run's propagation rules: configuration,
//! connection, and index-build failures abort the whole run, while anything
//! scoped to a single file or directory-creation step is contained by the
//! walker and only counted.

/// Main error type for remsync operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// File or directory not found
    #[error("not found: {path}")]
    NotFound {
        /// Path that was not found
        path: String,
    },

    /// Permission denied
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Path with permission issues
        path: String,
    },

    /// Target already exists
    #[error("already exists: {path}")]
    AlreadyExists {
        /// Path that already exists
        path: String,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Failure to establish or operate the store session
    #[error("connection error: {message}")]
    Connection {
        /// Error message describing the connection issue
        message: String,
    },

    /// Unexpected failure while enumerating the remote tree
    #[error("index build error: {message}")]
    IndexBuild {
        /// Error message describing the enumeration failure
        message: String,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Custom error message
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Missing file or directory
    NotFound,
    /// Permission errors
    PermissionDenied,
    /// Already-existing target
    AlreadyExists,
    /// Configuration errors
    Config,
    /// Session errors
    Connection,
    /// Remote enumeration errors
    IndexBuild,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Config { .. } => ErrorKind::Config,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::IndexBuild { .. } => ErrorKind::IndexBuild,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Whether this error aborts the whole run
    ///
    /// Everything else is scoped to one file or one directory-creation step
    /// and is reported and counted without stopping the walk.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Connection { .. } | Self::IndexBuild { .. }
        )
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a new index-build error
    pub fn index_build<S: Into<String>>(message: S) -> Self {
        Self::IndexBuild {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify a raw I/O error against the path it touched
    pub fn from_io(path: &str, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path: path.into() },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path: path.into() },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists { path: path.into() },
            _ => Self::Io {
                message: format!("{path}: {error}"),
            },
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
