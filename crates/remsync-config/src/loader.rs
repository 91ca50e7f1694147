//! Loading and enumerating profile files

use crate::{ConfigError, ConfigResult, Profile};
use std::path::{Path, PathBuf};

/// Load and validate a single profile file
pub fn load_profile(path: &Path) -> ConfigResult<Profile> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut profile: Profile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    profile.name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    profile.validate()?;
    Ok(profile)
}

/// List the profile files in a directory, sorted by name
///
/// Fails when the directory cannot be read or contains no `.toml` files.
pub fn available_profiles(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut profiles: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    profiles.sort();

    if profiles.is_empty() {
        return Err(ConfigError::NoProfiles {
            dir: dir.to_path_buf(),
        });
    }
    Ok(profiles)
}
