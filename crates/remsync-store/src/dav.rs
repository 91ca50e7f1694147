//! Store backend over a WebDAV server
//!
//! Driven through `opendal`'s WebDAV service. Paths handed to the operator
//! are rooted-relative (no leading slash) and directory paths carry a
//! trailing slash, per opendal's conventions.

use async_trait::async_trait;
use futures::TryStreamExt;
use opendal::{Metakey, Operator};
use remsync_types::{ByteStream, Error, RemoteEntry, RemoteStore, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// A remote-store session against a WebDAV server
#[derive(Debug)]
pub struct DavStore {
    operator: Operator,
    endpoint: String,
}

impl DavStore {
    /// Open an authenticated session against `endpoint`
    pub async fn open(endpoint: &str, username: &str, password: &str) -> Result<Self> {
        use opendal::services::Webdav;

        let builder = Webdav::default()
            .endpoint(endpoint)
            .username(username)
            .password(password);

        let operator = Operator::new(builder)
            .map_err(|e| Error::connection(format!("cannot open webdav session: {e}")))?
            .finish();

        // Some servers refuse operations until the collection root exists;
        // the result is irrelevant when it already does.
        let _ = operator.create_dir("/").await;

        Ok(Self {
            operator,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn relative(path: &str) -> &str {
        path.trim_start_matches('/')
    }

    fn dir_path(path: &str) -> String {
        let trimmed = Self::relative(path);
        if trimmed.is_empty() || trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        }
    }

    fn map_err(path: &str, error: &opendal::Error) -> Error {
        match error.kind() {
            opendal::ErrorKind::NotFound => Error::NotFound { path: path.into() },
            opendal::ErrorKind::PermissionDenied => Error::PermissionDenied { path: path.into() },
            opendal::ErrorKind::AlreadyExists => Error::AlreadyExists { path: path.into() },
            _ => Error::Io {
                message: format!("{path}: {error}"),
            },
        }
    }
}

#[async_trait]
impl RemoteStore for DavStore {
    async fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = Self::dir_path(path);

        let mut lister = self
            .operator
            .lister_with(&dir)
            .metakey(Metakey::ContentLength | Metakey::Mode)
            .await
            .map_err(|e| Self::map_err(path, &e))?;

        let mut entries = Vec::new();
        while let Some(entry) = lister
            .try_next()
            .await
            .map_err(|e| Self::map_err(path, &e))?
        {
            let entry_path = entry.path().to_string();

            // The listing includes the directory itself
            if entry_path == dir || entry_path.is_empty() || entry_path == "/" {
                continue;
            }

            let name = entry_path
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            if name.is_empty() {
                continue;
            }

            let meta = entry.metadata();
            entries.push(RemoteEntry {
                name,
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { 0 } else { meta.content_length() },
            });
        }
        Ok(entries)
    }

    async fn stat_exists(&self, path: &str) -> Result<bool> {
        match self.operator.stat(Self::relative(path)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::map_err(path, &e)),
        }
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        self.operator
            .create_dir(&Self::dir_path(path))
            .await
            .map_err(|e| Self::map_err(path, &e))
    }

    async fn open_for_read(&self, path: &str) -> Result<ByteStream> {
        // Buffer the object; the digest reader consumes it in fixed-size
        // chunks either way.
        let data = self
            .operator
            .read(Self::relative(path))
            .await
            .map_err(|e| Self::map_err(path, &e))?;
        Ok(Box::new(std::io::Cursor::new(data.to_vec())))
    }

    async fn write_whole(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let data = fs::read(local_path)
            .await
            .map_err(|e| Error::from_io(&local_path.display().to_string(), &e))?;

        self.operator
            .write(Self::relative(remote_path), data)
            .await
            .map_err(|e| Self::map_err(remote_path, &e))?;

        debug!("wrote '{}' -> '{}'", local_path.display(), remote_path);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        debug!("closed webdav session to '{}'", self.endpoint);
        Ok(())
    }
}
