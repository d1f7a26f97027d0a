//! Profiles: named directories of profile documents
//!
//! ```text
//! ~/.bekind/profiles/
//! └── dev/
//!     ├── 10-cluster.yaml
//!     └── 20-apps.yaml
//! ```
//!
//! `bekind run dev` processes every `*.yaml` file in `dev/` in file name order.

use std::path::{Path, PathBuf};

use crate::config::flatten;
use crate::{Error, Result};

/// Profile root relative to the home directory
pub const PROFILE_SUBDIR: &str = ".bekind/profiles";

/// `$HOME/.bekind/profiles`
pub fn default_profile_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(PROFILE_SUBDIR))
        .ok_or_else(|| Error::validation("could not determine the home directory"))
}

/// Names of the profiles under `root`, sorted
///
/// A missing or unreadable root yields no profiles.
pub fn list_profiles(root: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return vec![];
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

/// The profile documents for `name`, sorted by file name
pub fn profile_files(root: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let dir = root.join(name);
    if !dir.is_dir() {
        return Err(Error::ProfileNotFound {
            path: dir,
            available: list_profiles(root),
        });
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "yaml"))
        .collect();

    if files.is_empty() {
        return Err(Error::NoProfileFiles { path: dir });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Render a profile document as `---` followed by flattened `key: value` lines
pub fn render_view(contents: &str) -> Result<String> {
    let value: serde_yaml::Value = if contents.trim().is_empty() {
        serde_yaml::Value::Null
    } else {
        serde_yaml::from_str(contents)?
    };

    let mut out = String::from("---\n");
    for (key, value) in flatten(&value) {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
