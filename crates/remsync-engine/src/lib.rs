//! Directory diff and reconciliation engine for remsync
//!
//! This crate is the core of remsync: it walks a local file tree, maps each
//! file onto its counterpart in a pre-built snapshot of the remote tree, and
//! decides whether to upload, skip, or conditionally replace it:
//!
//! - **Remote Index**: one recursive snapshot of the destination subtree,
//!   optionally carrying content digests
//! - **Content Hashing**: chunked SHA-256 digests comparable across local
//!   and remote sources
//! - **Directory Materialization**: idempotent root-to-leaf creation of
//!   missing remote ancestors
//! - **Decision Policy**: a pure function from comparison outcome and
//!   conflict policy to an action
//! - **Reconciliation Walk**: depth-first traversal with per-file error
//!   containment and transfer bookkeeping
//!
//! # Examples
//!
//! ```rust,no_run
//! use remsync_engine::{Always, UploadEngine, UploadOptions, UploadRequest};
//! use remsync_types::ConflictPolicy;
//! use std::sync::Arc;
//!
//! # async fn example(store: remsync_store::LocalStore) -> remsync_types::Result<()> {
//! let options = UploadOptions::new()
//!     .with_compare(true)
//!     .with_policy(ConflictPolicy::ReplaceAll);
//! let engine = UploadEngine::new(store, options, Arc::new(Always(false)));
//! let counters = engine.run(&UploadRequest::new("./site", "/backups/site")).await?;
//! println!("uploaded {} files", counters.uploaded);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod hasher;
pub mod index;
pub mod materialize;
pub mod path;
pub mod policy;

pub use engine::{UploadEngine, UploadOptions, UploadRequest};
pub use hasher::{hash_local_file, hash_stream};
pub use index::{IndexBuilder, RemoteFileRecord, RemoteIndex};
pub use materialize::ensure_remote_dir;
pub use policy::{decide, Always};
