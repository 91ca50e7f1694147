//! Core data types for remsync
//!
//! Shared data structures for a reconciliation run: transfer counters,
//! conflict policies, and remote directory entries.

use serde::{Deserialize, Serialize};

/// Aggregated bookkeeping for one reconciliation run
///
/// Owned by a single run and mutated only by the walking task; a parallel
/// extension would have to protect it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCounters {
    /// Number of files uploaded
    pub uploaded: u64,
    /// Number of files skipped
    pub skipped: u64,
    /// Total bytes transferred
    pub total_bytes: u64,
    /// Number of per-file failures that were contained
    pub errors: u64,
}

impl TransferCounters {
    /// Create a new empty counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge counters from another run segment
    pub fn merge(&mut self, other: &TransferCounters) {
        self.uploaded += other.uploaded;
        self.skipped += other.skipped;
        self.total_bytes += other.total_bytes;
        self.errors += other.errors;
    }
}

/// Rule for resolving files whose content differs from the remote copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Replace every differing remote file
    ReplaceAll,
    /// Keep every differing remote file
    SkipAll,
    /// Resolve each differing file through the injected resolver
    AskEach,
}

/// Outcome of the decision policy for one local file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Transfer the file, overwriting any remote copy
    Upload,
    /// Leave the remote tree untouched
    Skip,
    /// Defer to the conflict resolver
    AskUser,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Entry name within its directory
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
    /// Size in bytes (zero for directories)
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_merge() {
        let mut first = TransferCounters {
            uploaded: 5,
            skipped: 2,
            total_bytes: 1000,
            errors: 0,
        };
        let second = TransferCounters {
            uploaded: 3,
            skipped: 1,
            total_bytes: 500,
            errors: 2,
        };

        first.merge(&second);
        assert_eq!(first.uploaded, 8);
        assert_eq!(first.skipped, 3);
        assert_eq!(first.total_bytes, 1500);
        assert_eq!(first.errors, 2);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&ConflictPolicy::ReplaceAll).unwrap();
        assert_eq!(json, "\"replace_all\"");

        let parsed: ConflictPolicy = serde_json::from_str("\"ask_each\"").unwrap();
        assert_eq!(parsed, ConflictPolicy::AskEach);
    }
}
