//! CLI commands

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::BekindConfig;
use crate::{Error, Result};

pub mod create;
pub mod destroy;
pub mod purge;
pub mod run;
pub mod showconfig;
pub mod start;

/// Profile document used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = ".bekind/config.yaml";

/// Default cluster name for every command
pub const DEFAULT_CLUSTER_NAME: &str = "kind";

/// `$HOME/.bekind/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
}

/// Load the profile document for `create`/`start`
///
/// An explicit path must exist. Without one, the default file is used when
/// present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<BekindConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::validation(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), "Using config file");
        return BekindConfig::load(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            debug!(path = %path.display(), "Using default config file");
            BekindConfig::load(&path)
        }
        _ => {
            debug!("No config file, using defaults");
            Ok(BekindConfig::default())
        }
    }
}
