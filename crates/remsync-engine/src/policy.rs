//! Decision policy for one local file
//!
//! A pure mapping from the comparison outcome and the configured conflict
//! policy to an action. The walker supplies the inputs; everything with a
//! side effect happens elsewhere.

use async_trait::async_trait;
use remsync_types::{ConflictPolicy, ConflictResolver, Result, SyncAction};

/// Classify one local file against its remote counterpart
///
/// - No counterpart: the file is new, upload it.
/// - Counterpart without content comparison: skip. An existing path is
///   trusted even though its content may differ; callers opting out of
///   hashing opted into that.
/// - Counterpart with equal digests: skip.
/// - Counterpart with differing digests (a missing remote digest counts
///   as differing): the conflict policy decides.
pub fn decide(
    has_remote_match: bool,
    compare_hashes: bool,
    hashes_equal: bool,
    policy: ConflictPolicy,
) -> SyncAction {
    if !has_remote_match {
        return SyncAction::Upload;
    }
    if !compare_hashes || hashes_equal {
        return SyncAction::Skip;
    }
    match policy {
        ConflictPolicy::ReplaceAll => SyncAction::Upload,
        ConflictPolicy::SkipAll => SyncAction::Skip,
        ConflictPolicy::AskEach => SyncAction::AskUser,
    }
}

/// Resolver with a fixed answer
///
/// `Always(true)` replaces every differing file, `Always(false)` keeps
/// them; used for non-interactive runs and in tests.
#[derive(Debug, Clone, Copy)]
pub struct Always(
    /// The fixed answer returned for every prompt
    pub bool,
);

#[async_trait]
impl ConflictResolver for Always {
    async fn confirm_replace(&self, _remote_path: &str) -> Result<bool> {
        Ok(self.0)
    }
}
