//! Interactive terminal prompts
//!
//! Everything that assumes a terminal lives here; the engine only ever sees
//! the [`ConflictResolver`] trait.

use anyhow::Result;
use async_trait::async_trait;
use dialoguer::{Confirm, Select};
use remsync_config::available_profiles;
use remsync_types::{ConflictPolicy, ConflictResolver, Error};
use std::path::{Path, PathBuf};

/// Let the user pick one of the profile files in `dir`
pub fn choose_profile(dir: &Path) -> Result<PathBuf> {
    let profiles = available_profiles(dir)?;
    let names: Vec<String> = profiles
        .iter()
        .map(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
        .collect();

    let selection = Select::new()
        .with_prompt("Connection profile")
        .items(&names)
        .default(0)
        .interact()?;

    Ok(profiles[selection].clone())
}

/// Ask whether content digests should be compared before uploading
pub fn choose_compare() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Compare content digests before uploading?")
        .default(true)
        .interact()?)
}

/// Ask how differing files should be handled
pub fn choose_policy() -> Result<ConflictPolicy> {
    let choices = [
        "Replace all differing files",
        "Skip all differing files",
        "Decide for each file",
    ];

    let selection = Select::new()
        .with_prompt("How should differing files be handled?")
        .items(&choices)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => ConflictPolicy::ReplaceAll,
        1 => ConflictPolicy::SkipAll,
        _ => ConflictPolicy::AskEach,
    })
}

/// Per-file yes/no prompt on the terminal
///
/// `Confirm` without a default keeps asking until the answer is a valid
/// yes or no, so a stray keypress never silently decides a file's fate.
pub struct TerminalResolver;

#[async_trait]
impl ConflictResolver for TerminalResolver {
    async fn confirm_replace(&self, remote_path: &str) -> remsync_types::Result<bool> {
        Confirm::new()
            .with_prompt(format!("Remote copy of '{remote_path}' differs. Replace?"))
            .interact()
            .map_err(|e| Error::other(format!("conflict prompt failed: {e}")))
    }
}
