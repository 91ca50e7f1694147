//! Remote tree snapshot
//!
//! The index is built once per run by recursively listing the destination
//! subtree, and is read-only afterwards. External mutation of the remote
//! tree during a run is not detected; comparisons may go stale.

use crate::{hasher, path};
use remsync_types::{Error, ErrorKind, RemoteStore, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Snapshot record of one remote file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    /// Canonical remote path
    pub path: String,
    /// Content digest, when the index was built with hashing
    pub hash: Option<String>,
}

/// Mapping from canonical remote path to its snapshot record
#[derive(Debug, Default)]
pub struct RemoteIndex {
    entries: HashMap<String, RemoteFileRecord>,
}

impl RemoteIndex {
    /// Look up the record for a canonical remote path
    pub fn get(&self, path: &str) -> Option<&RemoteFileRecord> {
        self.entries.get(path)
    }

    /// Insert a record, keyed by its own path
    pub fn insert(&mut self, record: RemoteFileRecord) {
        self.entries.insert(record.path.clone(), record);
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`RemoteIndex`] by recursive enumeration
#[derive(Debug)]
pub struct IndexBuilder<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
    include_hashes: bool,
}

impl<'a, S: RemoteStore + ?Sized> IndexBuilder<'a, S> {
    /// Create a builder over an open store session
    pub fn new(store: &'a S, include_hashes: bool) -> Self {
        Self {
            store,
            include_hashes,
        }
    }

    /// Snapshot the subtree rooted at `remote_root`
    ///
    /// A missing root is the normal first-run condition and yields an empty
    /// index; any other enumeration failure is fatal.
    pub async fn build(&self, remote_root: &str) -> Result<RemoteIndex> {
        let root = path::normalize(remote_root);
        let mut index = RemoteIndex::default();

        let entries = match self.store.list_entries(&root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("remote path does not exist: {root}");
                return Ok(index);
            }
            Err(e) => {
                return Err(Error::index_build(format!("failed to list '{root}': {e}")));
            }
        };

        self.collect(root.clone(), entries, &mut index).await?;
        info!("indexed {} remote files under '{}'", index.len(), root);
        Ok(index)
    }

    fn collect<'b>(
        &'b self,
        dir: String,
        entries: Vec<remsync_types::RemoteEntry>,
        index: &'b mut RemoteIndex,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'b>> {
        Box::pin(async move {
            for entry in entries {
                let entry_path = if dir.is_empty() {
                    entry.name.clone()
                } else if dir.ends_with('/') {
                    format!("{dir}{}", entry.name)
                } else {
                    format!("{dir}/{}", entry.name)
                };

                if entry.is_dir {
                    let children = match self.store.list_entries(&entry_path).await {
                        Ok(children) => children,
                        Err(e) if e.kind() == ErrorKind::NotFound => {
                            debug!("directory vanished while indexing: {entry_path}");
                            continue;
                        }
                        Err(e) => {
                            return Err(Error::index_build(format!(
                                "failed to list '{entry_path}': {e}"
                            )));
                        }
                    };
                    self.collect(entry_path, children, index).await?;
                } else {
                    let hash = if self.include_hashes {
                        match self.hash_remote(&entry_path).await {
                            Ok(hash) => Some(hash),
                            Err(e) if e.kind() == ErrorKind::NotFound => {
                                debug!("file vanished while indexing: {entry_path}");
                                continue;
                            }
                            Err(e) => {
                                return Err(Error::index_build(format!(
                                    "failed to hash '{entry_path}': {e}"
                                )));
                            }
                        }
                    } else {
                        None
                    };

                    index.insert(RemoteFileRecord {
                        path: entry_path,
                        hash,
                    });
                }
            }
            Ok(())
        })
    }

    async fn hash_remote(&self, remote_path: &str) -> Result<String> {
        debug!("hashing remote file: {remote_path}");
        let mut reader = self.store.open_for_read(remote_path).await?;
        hasher::hash_stream(&mut reader).await
    }
}
