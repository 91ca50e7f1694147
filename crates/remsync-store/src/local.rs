//! Store backend over a rooted local directory tree
//!
//! Useful for mounted remotes and as the backend the test suite runs
//! against. Remote paths are resolved beneath the root; the session cannot
//! escape it.

use async_trait::async_trait;
use remsync_types::{ByteStream, Error, RemoteEntry, RemoteStore, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A remote-store session backed by a local directory
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open a session rooted at `root`, creating the root if needed
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            Error::connection(format!(
                "cannot open store root '{}': {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            self.root.clone()
        } else {
            self.root.join(trimmed)
        }
    }
}

#[async_trait]
impl RemoteStore for LocalStore {
    async fn list_entries(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = self.resolve(path);
        let mut reader = fs::read_dir(&dir)
            .await
            .map_err(|e| Error::from_io(path, &e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| Error::from_io(path, &e))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| Error::from_io(path, &e))?;
            entries.push(RemoteEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
            });
        }
        Ok(entries)
    }

    async fn stat_exists(&self, path: &str) -> Result<bool> {
        match fs::metadata(self.resolve(path)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::from_io(path, &e)),
        }
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        fs::create_dir(self.resolve(path))
            .await
            .map_err(|e| Error::from_io(path, &e))
    }

    async fn open_for_read(&self, path: &str) -> Result<ByteStream> {
        let file = fs::File::open(self.resolve(path))
            .await
            .map_err(|e| Error::from_io(path, &e))?;
        Ok(Box::new(file))
    }

    async fn write_whole(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        let data = fs::read(local_path)
            .await
            .map_err(|e| Error::from_io(&local_path.display().to_string(), &e))?;

        // Stage next to the target and rename so a failed upload never
        // leaves a half-written remote file behind.
        let target = self.resolve(remote_path);
        let staged = target.with_extension("remsync-part");
        fs::write(&staged, data)
            .await
            .map_err(|e| Error::from_io(remote_path, &e))?;
        fs::rename(&staged, &target)
            .await
            .map_err(|e| Error::from_io(remote_path, &e))?;

        debug!("wrote '{}' -> '{}'", local_path.display(), remote_path);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        debug!("closed local store at '{}'", self.root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remsync_types::ErrorKind;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    async fn store_with_file(content: &[u8]) -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("docs")).await.unwrap();
        fs::write(dir.path().join("docs/a.txt"), content)
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_list_entries() {
        let (_dir, store) = store_with_file(b"hello").await;

        let mut entries = store.list_entries("/").await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "docs");
        assert!(entries[0].is_dir);

        let entries = store.list_entries("/docs").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
        assert!(!entries[0].is_dir);
        assert_eq!(entries[0].size, 5);
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let (_dir, store) = store_with_file(b"hello").await;

        let error = store.list_entries("/nowhere").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_stat_and_create_directory() {
        let (_dir, store) = store_with_file(b"hello").await;

        assert!(store.stat_exists("/docs/a.txt").await.unwrap());
        assert!(!store.stat_exists("/docs/new").await.unwrap());

        store.create_directory("/docs/new").await.unwrap();
        assert!(store.stat_exists("/docs/new").await.unwrap());

        // Second creation surfaces the race as already-exists
        let error = store.create_directory("/docs/new").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_write_whole_overwrites() {
        let (dir, store) = store_with_file(b"old").await;

        let source = dir.path().join("source.bin");
        fs::write(&source, b"fresh content").await.unwrap();
        store.write_whole(&source, "/docs/a.txt").await.unwrap();

        let mut reader = store.open_for_read("/docs/a.txt").await.unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).await.unwrap();
        assert_eq!(content, "fresh content");
    }
}
