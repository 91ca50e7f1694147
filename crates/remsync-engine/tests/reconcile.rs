//! End-to-end reconciliation runs against a temp-dir store

use remsync_engine::{Always, UploadEngine, UploadOptions, UploadRequest};
use remsync_store::LocalStore;
use remsync_types::{ConflictPolicy, ConflictResolver, Result, TransferCounters};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;

struct Fixture {
    _local_dir: TempDir,
    _remote_dir: TempDir,
    local_root: std::path::PathBuf,
    remote_root: std::path::PathBuf,
}

impl Fixture {
    async fn new() -> Self {
        let local_dir = TempDir::new().unwrap();
        let remote_dir = TempDir::new().unwrap();
        let local_root = local_dir.path().join("site");
        fs::create_dir_all(&local_root).await.unwrap();
        Self {
            local_root,
            remote_root: remote_dir.path().to_path_buf(),
            _local_dir: local_dir,
            _remote_dir: remote_dir,
        }
    }

    async fn write_local(&self, relative: &str, content: &str) {
        let path = self.local_root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, content).await.unwrap();
    }

    async fn write_remote(&self, relative: &str, content: &str) {
        let path = self.remote_root.join("backups/site").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, content).await.unwrap();
    }

    async fn read_remote(&self, relative: &str) -> String {
        let path = self.remote_root.join("backups/site").join(relative);
        String::from_utf8(fs::read(path).await.unwrap()).unwrap()
    }

    fn store(&self) -> LocalStore {
        LocalStore::open(&self.remote_root).unwrap()
    }

    async fn run(&self, options: UploadOptions) -> Result<TransferCounters> {
        self.run_with(options, Arc::new(Always(false))).await
    }

    async fn run_with(
        &self,
        options: UploadOptions,
        resolver: Arc<dyn ConflictResolver>,
    ) -> Result<TransferCounters> {
        let engine = UploadEngine::new(self.store(), options, resolver);
        let request = UploadRequest::new(&self.local_root, "/backups/site");
        let counters = engine.run(&request).await;
        engine.shutdown().await.unwrap();
        counters
    }
}

#[tokio::test]
async fn test_new_file_into_empty_remote() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;

    let counters = fixture.run(UploadOptions::new()).await.unwrap();

    assert_eq!(counters.uploaded, 1);
    assert_eq!(counters.skipped, 0);
    assert_eq!(counters.total_bytes, 5);
    assert_eq!(fixture.read_remote("a.txt").await, "hello");
}

#[tokio::test]
async fn test_nested_tree_upload_creates_directories() {
    let fixture = Fixture::new().await;
    fixture.write_local("docs/img/logo.png", "png-bytes").await;
    fixture.write_local("docs/readme.md", "docs").await;
    fixture.write_local("top.txt", "top").await;

    let counters = fixture.run(UploadOptions::new()).await.unwrap();

    assert_eq!(counters.uploaded, 3);
    assert_eq!(counters.errors, 0);
    assert_eq!(fixture.read_remote("docs/img/logo.png").await, "png-bytes");
    assert_eq!(fixture.read_remote("docs/readme.md").await, "docs");
}

#[tokio::test]
async fn test_existing_path_skipped_without_comparison() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    fixture.write_remote("a.txt", "entirely different").await;

    let counters = fixture.run(UploadOptions::new()).await.unwrap();

    assert_eq!(counters.uploaded, 0);
    assert_eq!(counters.skipped, 1);
    // The remote copy is trusted in this mode, divergent or not
    assert_eq!(fixture.read_remote("a.txt").await, "entirely different");
}

#[tokio::test]
async fn test_identical_content_skipped_with_comparison() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    fixture.write_remote("a.txt", "hello").await;

    let options = UploadOptions::new().with_compare(true);
    let counters = fixture.run(options).await.unwrap();

    assert_eq!(counters.uploaded, 0);
    assert_eq!(counters.skipped, 1);
}

#[tokio::test]
async fn test_differing_content_skip_all() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    fixture.write_remote("a.txt", "world").await;

    let options = UploadOptions::new()
        .with_compare(true)
        .with_policy(ConflictPolicy::SkipAll);
    let counters = fixture.run(options).await.unwrap();

    assert_eq!(counters.uploaded, 0);
    assert_eq!(counters.skipped, 1);
    assert_eq!(fixture.read_remote("a.txt").await, "world");
}

#[tokio::test]
async fn test_differing_content_replace_all() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    fixture.write_remote("a.txt", "world").await;

    let options = UploadOptions::new()
        .with_compare(true)
        .with_policy(ConflictPolicy::ReplaceAll);
    let counters = fixture.run(options).await.unwrap();

    assert_eq!(counters.uploaded, 1);
    assert_eq!(counters.total_bytes, 5);
    assert_eq!(fixture.read_remote("a.txt").await, "hello");
}

#[tokio::test]
async fn test_ask_each_follows_the_answer() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    fixture.write_remote("a.txt", "world").await;

    let options = UploadOptions::new()
        .with_compare(true)
        .with_policy(ConflictPolicy::AskEach);

    let counters = fixture
        .run_with(options.clone(), Arc::new(Always(false)))
        .await
        .unwrap();
    assert_eq!(counters.uploaded, 0);
    assert_eq!(counters.skipped, 1);

    let counters = fixture
        .run_with(options, Arc::new(Always(true)))
        .await
        .unwrap();
    assert_eq!(counters.uploaded, 1);
    assert_eq!(fixture.read_remote("a.txt").await, "hello");
}

/// Counting resolver: verifies only differing files reach the prompt.
struct CountingResolver {
    asked: AtomicUsize,
}

#[async_trait::async_trait]
impl ConflictResolver for CountingResolver {
    async fn confirm_replace(&self, _remote_path: &str) -> Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[tokio::test]
async fn test_ask_each_only_prompts_for_differing_files() {
    let fixture = Fixture::new().await;
    fixture.write_local("same.txt", "same").await;
    fixture.write_local("diff.txt", "local").await;
    fixture.write_local("new.txt", "new").await;
    fixture.write_remote("same.txt", "same").await;
    fixture.write_remote("diff.txt", "remote").await;

    let resolver = Arc::new(CountingResolver {
        asked: AtomicUsize::new(0),
    });
    let options = UploadOptions::new()
        .with_compare(true)
        .with_policy(ConflictPolicy::AskEach);
    let counters = fixture.run_with(options, resolver.clone()).await.unwrap();

    assert_eq!(resolver.asked.load(Ordering::SeqCst), 1);
    assert_eq!(counters.uploaded, 2); // the new file and the replaced one
    assert_eq!(counters.skipped, 1);
}

#[tokio::test]
async fn test_second_run_is_all_skips() {
    let fixture = Fixture::new().await;
    fixture.write_local("docs/a.txt", "alpha").await;
    fixture.write_local("docs/b.txt", "beta").await;

    let options = UploadOptions::new()
        .with_compare(true)
        .with_policy(ConflictPolicy::ReplaceAll);

    let first = fixture.run(options.clone()).await.unwrap();
    assert_eq!(first.uploaded, 2);

    let second = fixture.run(options).await.unwrap();
    assert_eq!(second.uploaded, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.total_bytes, 0);
}

#[tokio::test]
async fn test_single_file_local_root() {
    let fixture = Fixture::new().await;
    fixture.write_local("only.txt", "solo").await;

    let store = fixture.store();
    let engine = UploadEngine::new(store, UploadOptions::new(), Arc::new(Always(false)));
    let request = UploadRequest::new(fixture.local_root.join("only.txt"), "/backups/site");
    let counters = engine.run(&request).await.unwrap();
    engine.shutdown().await.unwrap();

    assert_eq!(counters.uploaded, 1);
    assert_eq!(fixture.read_remote("only.txt").await, "solo");
}

#[tokio::test]
async fn test_every_leaf_visited_exactly_once() {
    let fixture = Fixture::new().await;
    for i in 0..5 {
        fixture
            .write_local(&format!("dir{i}/file{i}.txt"), &format!("content {i}"))
            .await;
    }

    let counters = fixture.run(UploadOptions::new()).await.unwrap();
    assert_eq!(counters.uploaded + counters.skipped, 5);
    assert_eq!(counters.uploaded, 5);
}

#[tokio::test]
async fn test_symlink_cycle_is_not_followed() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    #[cfg(unix)]
    std::os::unix::fs::symlink(&fixture.local_root, fixture.local_root.join("loop")).unwrap();

    let counters = fixture.run(UploadOptions::new()).await.unwrap();
    assert_eq!(counters.uploaded, 1);
    assert_eq!(counters.errors, 0);
}

#[tokio::test]
async fn test_total_bytes_accumulates_upload_sizes() {
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "12345").await;
    fixture.write_local("b.txt", "1234567890").await;

    let counters = fixture.run(UploadOptions::new()).await.unwrap();
    assert_eq!(counters.total_bytes, 15);
}

#[tokio::test]
async fn test_remote_base_used_verbatim_when_present() {
    // The walk also reconciles into a base that already has unrelated
    // content; only the matching subtree is consulted.
    let fixture = Fixture::new().await;
    fixture.write_local("a.txt", "hello").await;
    let unrelated = fixture.remote_root.join("backups/other.txt");
    fs::create_dir_all(unrelated.parent().unwrap()).await.unwrap();
    fs::write(&unrelated, "unrelated").await.unwrap();

    let counters = fixture.run(UploadOptions::new()).await.unwrap();
    assert_eq!(counters.uploaded, 1);
    assert!(Path::new(&fixture.remote_root.join("backups/other.txt")).exists());
}
