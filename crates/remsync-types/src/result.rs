//! Result type alias for remsync operations

/// Result type used throughout remsync
pub type Result<T> = std::result::Result<T, crate::Error>;
