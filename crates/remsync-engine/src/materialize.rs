//! Remote directory materialization
//!
//! Ensures every ancestor of a target directory exists before an upload,
//! creating missing segments from root to leaf. Best-effort and idempotent:
//! a segment that cannot be created is reported and the remaining segments
//! are still attempted, so one bad ancestor never aborts a run.

use crate::path;
use remsync_types::{ErrorKind, RemoteStore};
use tracing::{debug, warn};

/// Ensure `remote_dir` and all its ancestors exist
///
/// Safe to call when the full chain already exists and when only part of
/// it does. A concurrent creation of the same segment is treated as
/// success.
pub async fn ensure_remote_dir<S: RemoteStore + ?Sized>(store: &S, remote_dir: &str) {
    for segment in path::ancestry(remote_dir) {
        match store.stat_exists(&segment).await {
            Ok(true) => {}
            Ok(false) => match store.create_directory(&segment).await {
                Ok(()) => debug!("created remote directory: {segment}"),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => warn!("failed to create remote directory '{segment}': {e}"),
            },
            Err(e) => warn!("failed to stat remote directory '{segment}': {e}"),
        }
    }
}
