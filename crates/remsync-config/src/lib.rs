//! Connection-profile management for remsync
//!
//! A profile is a small TOML file describing one upload destination: which
//! store backend to talk to, the credentials the backend needs, and the
//! destination directory inside the remote tree. Profiles live together in
//! a profiles directory so a destination can be picked by name.
//!
//! ```toml
//! # profiles/nas.toml
//! remote_path = "/backups"
//!
//! [store]
//! kind = "webdav"
//! endpoint = "https://dav.example.com"
//! username = "alice"
//! password = "s3cret"
//! ```
//!
//! Every required connection parameter is validated up front; a missing key
//! aborts before any transfer is attempted.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;
pub mod loader;

pub use error::{ConfigError, ConfigResult};
pub use loader::{available_profiles, load_profile};

/// One upload destination: store backend, credentials, remote base path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Destination directory inside the remote tree
    pub remote_path: Option<String>,
    /// Store backend section
    pub store: StoreSection,
    /// Display name, taken from the profile file stem
    #[serde(skip)]
    pub name: String,
}

/// Store backend parameters, shaped like the raw TOML section
///
/// Fields are optional at parse time; [`Profile::validate`] enforces the
/// per-backend required set, mirroring how the backends themselves consume
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// Backend kind: `local` or `webdav`
    pub kind: String,
    /// Filesystem root (local backend)
    pub root: Option<PathBuf>,
    /// Server endpoint URL (webdav backend)
    pub endpoint: Option<String>,
    /// Account name (webdav backend)
    pub username: Option<String>,
    /// Account password (webdav backend)
    pub password: Option<String>,
}

impl Profile {
    /// Check that every connection parameter the backend needs is present
    pub fn validate(&self) -> ConfigResult<()> {
        if self.remote_path.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingKey { key: "remote_path" });
        }

        match self.store.kind.as_str() {
            "local" => {
                if self.store.root.is_none() {
                    return Err(ConfigError::MissingKey { key: "store.root" });
                }
            }
            "webdav" => {
                if self.store.endpoint.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::MissingKey {
                        key: "store.endpoint",
                    });
                }
                if self.store.username.is_none() {
                    return Err(ConfigError::MissingKey {
                        key: "store.username",
                    });
                }
                if self.store.password.is_none() {
                    return Err(ConfigError::MissingKey {
                        key: "store.password",
                    });
                }
            }
            other => {
                return Err(ConfigError::UnknownBackend { kind: other.into() });
            }
        }

        Ok(())
    }

    /// Destination directory inside the remote tree
    ///
    /// Only call after [`Profile::validate`] has succeeded.
    pub fn remote_path(&self) -> &str {
        self.remote_path.as_deref().unwrap_or_default()
    }
}
