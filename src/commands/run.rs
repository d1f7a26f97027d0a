//! Run command: process every document of a profile
//!
//! Each document is loaded into its own config value, so nothing from one
//! document (charts, images, domain, node image) leaks into the next.

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use super::start;
use super::DEFAULT_CLUSTER_NAME;
use crate::cluster::KindProvider;
use crate::config::BekindConfig;
use crate::profile::{default_profile_root, profile_files, render_view};
use crate::Result;

/// Run the specified profile
///
/// Profiles are directories under ~/.bekind/profiles containing one or more
/// YAML config files, processed in file name order.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Profile name (a directory under the profile root)
    pub profile: String,

    /// Print the profile configuration instead of running it
    #[arg(short, long)]
    pub view: bool,

    /// Directory where profiles are stored
    #[arg(short = 'p', long = "profile-dir")]
    pub profile_dir: Option<PathBuf>,

    /// Name of the kind cluster, unless a profile document names one
    #[arg(short, long, default_value = DEFAULT_CLUSTER_NAME)]
    pub name: String,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let root = match &args.profile_dir {
        Some(dir) => dir.clone(),
        None => default_profile_root()?,
    };
    let files = profile_files(&root, &args.profile)?;

    if args.view {
        for file in &files {
            print!("{}", view_file(file)?);
        }
        return Ok(());
    }

    let provider = KindProvider::from_env();
    for file in &files {
        info!(
            profile = %args.profile,
            file = %file.display(),
            "Running profile"
        );
        let config = BekindConfig::load(file)?;
        start::start(&provider, &config, &args.name).await?;
    }

    Ok(())
}

fn view_file(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)?;
    render_view(&contents)
}
