//! Core traits for remsync operations
//!
//! These traits are the seams between the reconciliation engine and its
//! collaborators: the remote-store session the transfer goes through, and
//! the resolver consulted when a differing file needs a human decision.

use crate::{RemoteEntry, Result};
use async_trait::async_trait;
use std::path::Path;

/// Readable byte stream handed out by a store
pub type ByteStream = Box<dyn tokio::io::AsyncRead + Send + Unpin>;

/// One open session against a remote directory tree
///
/// Paths are canonical forward-slash strings rooted in the remote tree.
/// Implementations are not required to be safe for concurrent use; the
/// engine drives a session strictly sequentially.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List the immediate entries of a remote directory
    ///
    /// Fails with a not-found error when the directory is absent.
    async fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    /// Check whether a remote path exists
    async fn stat_exists(&self, path: &str) -> Result<bool>;

    /// Create a single remote directory
    ///
    /// Ancestors must already exist. An already-existing target surfaces as
    /// an already-exists error so callers can tell a benign race from a
    /// real failure.
    async fn create_directory(&self, path: &str) -> Result<()>;

    /// Open a remote file for reading
    async fn open_for_read(&self, path: &str) -> Result<ByteStream>;

    /// Upload a local file to a remote path, overwriting any existing file
    async fn write_whole(&self, local_path: &Path, remote_path: &str) -> Result<()>;

    /// Tear down the session; idempotent
    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Box<T> {
    async fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        (**self).list_entries(path).await
    }

    async fn stat_exists(&self, path: &str) -> Result<bool> {
        (**self).stat_exists(path).await
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        (**self).create_directory(path).await
    }

    async fn open_for_read(&self, path: &str) -> Result<ByteStream> {
        (**self).open_for_read(path).await
    }

    async fn write_whole(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        (**self).write_whole(local_path, remote_path).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

/// Blocking yes/no decision for a remote file whose content differs
///
/// Implementations must keep asking until they obtain a valid answer;
/// a malformed response is never silently defaulted.
#[async_trait]
pub trait ConflictResolver: Send + Sync {
    /// Ask whether the differing remote file should be replaced
    async fn confirm_replace(&self, remote_path: &str) -> Result<bool>;
}
