//! Core type system and error handling for remsync
//!
//! This crate provides the foundational types shared by the remsync crates:
//!
//! - **Error handling**: structured error types with a kind/fatality
//!   classification matching the run's propagation rules
//! - **Core types**: transfer counters, conflict policies, remote entries
//! - **Traits**: the remote-store session and conflict-resolver seams
//!
//! # Examples
//!
//! ```rust
//! use remsync_types::{ConflictPolicy, Result, TransferCounters};
//!
//! fn example_run() -> Result<TransferCounters> {
//!     let mut counters = TransferCounters::new();
//!     counters.uploaded = 3;
//!     counters.total_bytes = 4096;
//!     Ok(counters)
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod result;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use result::Result;
pub use traits::{ByteStream, ConflictResolver, RemoteStore};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_creation() {
        let counters = TransferCounters::new();
        assert_eq!(counters.uploaded, 0);
        assert_eq!(counters.skipped, 0);
        assert_eq!(counters.total_bytes, 0);
    }

    #[test]
    fn test_fatal_classification() {
        let config_error = Error::config("missing remote_path");
        assert!(config_error.is_fatal());

        let io_error = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "test"));
        assert!(!io_error.is_fatal());
    }
}
