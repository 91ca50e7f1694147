//! Reconciliation walk
//!
//! One run snapshots the destination subtree, then walks the local tree
//! depth-first, classifying every file through the decision policy and
//! uploading through the store. The run is strictly sequential: one logical
//! task, counters owned by the run, blocking prompts suspending the walk.

use crate::{
    hasher,
    index::{IndexBuilder, RemoteIndex},
    materialize::ensure_remote_dir,
    path,
    policy::decide,
};
use remsync_types::{
    ConflictPolicy, ConflictResolver, Error, RemoteStore, Result, SyncAction, TransferCounters,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

/// One reconciliation request: what to upload and where to
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Local file or directory to upload
    pub local_root: PathBuf,
    /// Destination directory inside the remote tree
    pub remote_base: String,
}

impl UploadRequest {
    /// Create a new upload request
    pub fn new<P: Into<PathBuf>, R: Into<String>>(local_root: P, remote_base: R) -> Self {
        Self {
            local_root: local_root.into(),
            remote_base: remote_base.into(),
        }
    }
}

/// Tunable behavior of a reconciliation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Whether content digests are used to detect divergence
    pub compare_hashes: bool,
    /// Rule applied to files whose content differs
    pub policy: ConflictPolicy,
}

impl UploadOptions {
    /// Create options with defaults: no hashing, differing files kept
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether content digests are compared
    pub fn with_compare(mut self, compare_hashes: bool) -> Self {
        self.compare_hashes = compare_hashes;
        self
    }

    /// Set the conflict policy
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            compare_hashes: false,
            policy: ConflictPolicy::SkipAll,
        }
    }
}

/// Drives reconciliation runs over one open store session
pub struct UploadEngine<S> {
    store: S,
    options: UploadOptions,
    resolver: Arc<dyn ConflictResolver>,
}

impl<S: RemoteStore> UploadEngine<S> {
    /// Create an engine over an open session
    ///
    /// The resolver is only consulted under [`ConflictPolicy::AskEach`];
    /// pass [`crate::Always`] for non-interactive runs.
    pub fn new(store: S, options: UploadOptions, resolver: Arc<dyn ConflictResolver>) -> Self {
        Self {
            store,
            options,
            resolver,
        }
    }

    /// Perform one reconciliation run
    ///
    /// Returns the aggregated counters. Per-file failures are reported and
    /// counted without stopping the walk; only configuration, session, and
    /// index-build failures abort the run.
    pub async fn run(&self, request: &UploadRequest) -> Result<TransferCounters> {
        let local_root = &request.local_root;
        let metadata = fs::metadata(local_root)
            .await
            .map_err(|e| Error::from_io(&local_root.display().to_string(), &e))?;

        let remote_base = path::normalize(&request.remote_base);
        info!(
            "starting upload sync: {} -> {}",
            local_root.display(),
            remote_base
        );

        ensure_remote_dir(&self.store, &remote_base).await;

        let index = IndexBuilder::new(&self.store, self.options.compare_hashes)
            .build(&remote_base)
            .await?;

        // For a single-file root the relative paths are taken from its
        // parent directory, so the file keeps its own name remotely.
        let walk_root = if metadata.is_dir() {
            local_root.clone()
        } else {
            local_root
                .parent()
                .map_or_else(|| local_root.clone(), Path::to_path_buf)
        };

        let mut counters = TransferCounters::new();
        self.visit(
            &walk_root,
            local_root.clone(),
            &remote_base,
            &index,
            &mut counters,
        )
        .await;

        info!(
            "upload sync finished: {} uploaded, {} skipped, {} bytes, {} errors",
            counters.uploaded, counters.skipped, counters.total_bytes, counters.errors
        );
        Ok(counters)
    }

    /// Close the underlying store session
    pub async fn shutdown(self) -> Result<()> {
        self.store.close().await
    }

    fn visit<'a>(
        &'a self,
        walk_root: &'a Path,
        local: PathBuf,
        remote_base: &'a str,
        index: &'a RemoteIndex,
        counters: &'a mut TransferCounters,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let metadata = match fs::symlink_metadata(&local).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    // The entry may have vanished since it was listed
                    warn!("skipping '{}': {e}", local.display());
                    counters.errors += 1;
                    return;
                }
            };

            if metadata.file_type().is_symlink() {
                debug!("skipping symlink: {}", local.display());
                return;
            }

            if metadata.is_dir() {
                let mut entries = match fs::read_dir(&local).await {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!("cannot read directory '{}': {e}", local.display());
                        counters.errors += 1;
                        return;
                    }
                };
                loop {
                    match entries.next_entry().await {
                        Ok(Some(entry)) => {
                            self.visit(walk_root, entry.path(), remote_base, index, counters)
                                .await;
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!("failed to read entry in '{}': {e}", local.display());
                            counters.errors += 1;
                            break;
                        }
                    }
                }
            } else if let Err(e) = self
                .sync_file(walk_root, &local, metadata.len(), remote_base, index, counters)
                .await
            {
                warn!("failed to process '{}': {e}", local.display());
                counters.errors += 1;
            }
        })
    }

    async fn sync_file(
        &self,
        walk_root: &Path,
        local: &Path,
        size: u64,
        remote_base: &str,
        index: &RemoteIndex,
        counters: &mut TransferCounters,
    ) -> Result<()> {
        let relative = local.strip_prefix(walk_root).unwrap_or(local);
        let remote_target = path::join(remote_base, relative);

        if let Some(parent) = path::parent(&remote_target) {
            ensure_remote_dir(&self.store, &parent).await;
        }

        let record = index.get(&remote_target);
        let hashes_equal = match record {
            Some(record) if self.options.compare_hashes => {
                let local_hash = hasher::hash_local_file(local).await?;
                match record.hash.as_deref() {
                    Some(remote_hash) => remote_hash == local_hash,
                    // No digest was captured for the remote copy; treat it
                    // as differing so the policy decides.
                    None => false,
                }
            }
            _ => false,
        };

        match decide(
            record.is_some(),
            self.options.compare_hashes,
            hashes_equal,
            self.options.policy,
        ) {
            SyncAction::Upload => self.upload(local, &remote_target, size, counters).await?,
            SyncAction::Skip => {
                debug!("skipping: {remote_target}");
                counters.skipped += 1;
            }
            SyncAction::AskUser => {
                info!("remote copy of '{remote_target}' differs");
                if self.resolver.confirm_replace(&remote_target).await? {
                    self.upload(local, &remote_target, size, counters).await?;
                } else {
                    debug!("kept remote copy: {remote_target}");
                    counters.skipped += 1;
                }
            }
        }
        Ok(())
    }

    async fn upload(
        &self,
        local: &Path,
        remote_target: &str,
        size: u64,
        counters: &mut TransferCounters,
    ) -> Result<()> {
        info!("uploading: {} -> {remote_target}", local.display());
        self.store.write_whole(local, remote_target).await?;
        counters.uploaded += 1;
        counters.total_bytes += size;
        Ok(())
    }
}
