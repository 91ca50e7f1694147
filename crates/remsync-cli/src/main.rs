//! remsync - upload-synchronize a local tree to a remote store
//!
//! Walks a local file or directory, compares it against the destination
//! subtree of a configured remote store, and uploads what is new or — per
//! the chosen policy — what differs.

mod display;
mod prompt;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use remsync_config::{load_profile, Profile};
use remsync_engine::{path, Always, UploadEngine, UploadOptions, UploadRequest};
use remsync_store::open_store;
use remsync_types::{ConflictPolicy, ConflictResolver, RemoteStore, TransferCounters};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// remsync - upload-synchronize a local tree to a remote store
#[derive(Parser)]
#[command(
    name = "remsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Upload-synchronize a local tree to a remote store",
    long_about = "remsync uploads a local file or directory tree into a remote store,\n\
                  skipping files the remote already has and resolving differing\n\
                  files by content digest and a configurable conflict policy."
)]
struct Cli {
    /// Local file or directory to upload
    local_path: PathBuf,

    /// Directory containing connection profiles
    #[arg(long, default_value = "./profiles")]
    profiles_dir: PathBuf,

    /// Profile name (file stem) to use without prompting
    #[arg(short, long)]
    profile: Option<String>,

    /// Compare content digests before uploading
    #[arg(long, conflicts_with = "no_compare")]
    compare: bool,

    /// Upload without comparing content digests
    #[arg(long)]
    no_compare: bool,

    /// How to handle files whose content differs
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Replace differing files without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum PolicyArg {
    ReplaceAll,
    SkipAll,
    Ask,
}

impl From<PolicyArg> for ConflictPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::ReplaceAll => ConflictPolicy::ReplaceAll,
            PolicyArg::SkipAll => ConflictPolicy::SkipAll,
            PolicyArg::Ask => ConflictPolicy::AskEach,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.quiet, cli.verbose)?;
    info!("remsync v{} starting", env!("CARGO_PKG_VERSION"));

    let profile = select_profile(&cli)?;
    let options = select_options(&cli)?;
    let resolver = select_resolver(&cli, &options);

    let remote_base = remote_base_for(&profile, &cli.local_path)?;

    if !cli.quiet {
        println!(
            "{} Uploading {} to {} ({})",
            style("→").green().bold(),
            style(cli.local_path.display()).cyan(),
            style(&remote_base).cyan(),
            style(&profile.name).dim(),
        );
    }

    let store = open_store(&profile).await?;
    let counters = run_sync(&cli, store, options, resolver, &remote_base).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&counters)?);
    } else if !cli.quiet {
        display::print_summary(&counters);
    }

    info!("upload sync completed");
    Ok(())
}

/// Run the reconciliation and tear the session down on every exit path
async fn run_sync(
    cli: &Cli,
    store: Box<dyn RemoteStore>,
    options: UploadOptions,
    resolver: Arc<dyn ConflictResolver>,
    remote_base: &str,
) -> Result<TransferCounters> {
    let interactive = options.policy == ConflictPolicy::AskEach && !cli.yes;
    let spinner = if cli.quiet || cli.json || interactive {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.set_message("Reconciling...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    let engine = UploadEngine::new(store, options, resolver);
    let request = UploadRequest::new(&cli.local_path, remote_base);

    let started = Instant::now();
    let result = engine.run(&request).await;

    if let Err(e) = engine.shutdown().await {
        warn!("failed to close store session: {e}");
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let counters = result.context("upload sync failed")?;
    info!("run took {:?}", started.elapsed());
    Ok(counters)
}

fn init_logging(debug: bool, quiet: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap();

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn select_profile(cli: &Cli) -> Result<Profile> {
    let path = match &cli.profile {
        Some(name) => cli.profiles_dir.join(format!("{name}.toml")),
        None => prompt::choose_profile(&cli.profiles_dir)?,
    };

    let profile =
        load_profile(&path).with_context(|| format!("cannot load profile '{}'", path.display()))?;
    info!("using profile '{}'", profile.name);
    Ok(profile)
}

fn select_options(cli: &Cli) -> Result<UploadOptions> {
    let compare_hashes = if cli.compare {
        true
    } else if cli.no_compare {
        false
    } else {
        prompt::choose_compare()?
    };

    let policy = if !compare_hashes {
        // Without digests an existing path is always skipped; the policy
        // never fires.
        ConflictPolicy::SkipAll
    } else if cli.yes {
        ConflictPolicy::ReplaceAll
    } else {
        match cli.policy {
            Some(policy) => policy.into(),
            None => prompt::choose_policy()?,
        }
    };

    Ok(UploadOptions::new()
        .with_compare(compare_hashes)
        .with_policy(policy))
}

fn select_resolver(cli: &Cli, options: &UploadOptions) -> Arc<dyn ConflictResolver> {
    if options.policy != ConflictPolicy::AskEach {
        return Arc::new(Always(false));
    }
    if cli.yes {
        Arc::new(Always(true))
    } else {
        Arc::new(prompt::TerminalResolver)
    }
}

/// Destination subtree: the profile's remote path, plus the local folder
/// name when a directory is uploaded
fn remote_base_for(profile: &Profile, local_path: &Path) -> Result<String> {
    if local_path.is_dir() {
        let base_name = local_path
            .file_name()
            .with_context(|| format!("'{}' has no usable folder name", local_path.display()))?;
        Ok(path::join(profile.remote_path(), Path::new(base_name)))
    } else {
        Ok(path::normalize(profile.remote_path()))
    }
}
