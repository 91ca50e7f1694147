//! Remote store sessions for remsync
//!
//! This crate ships the concrete [`RemoteStore`] backends the engine can
//! upload through:
//!
//! - [`LocalStore`]: a directory tree on a local (or mounted) filesystem
//! - [`DavStore`]: a WebDAV server, driven through `opendal`
//!
//! Backend selection and credentials come from a connection profile; the
//! engine only ever sees the trait.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use remsync_config::Profile;
use remsync_types::{Error, RemoteStore, Result};
use tracing::info;

pub mod dav;
pub mod local;

pub use dav::DavStore;
pub use local::LocalStore;

/// Open the store session a profile describes
///
/// Session-establishment failures come back as connection errors; the
/// profile is assumed to have been validated on load.
pub async fn open_store(profile: &Profile) -> Result<Box<dyn RemoteStore>> {
    match profile.store.kind.as_str() {
        "local" => {
            let root = profile
                .store
                .root
                .as_ref()
                .ok_or_else(|| Error::config("local store requires store.root"))?;
            info!("opening local store at '{}'", root.display());
            Ok(Box::new(LocalStore::open(root)?))
        }
        "webdav" => {
            let endpoint = profile
                .store
                .endpoint
                .as_deref()
                .ok_or_else(|| Error::config("webdav store requires store.endpoint"))?;
            let username = profile
                .store
                .username
                .as_deref()
                .ok_or_else(|| Error::config("webdav store requires store.username"))?;
            let password = profile
                .store
                .password
                .as_deref()
                .ok_or_else(|| Error::config("webdav store requires store.password"))?;
            info!("opening webdav store at '{endpoint}'");
            Ok(Box::new(DavStore::open(endpoint, username, password).await?))
        }
        other => Err(Error::config(format!("unknown store backend '{other}'"))),
    }
}
