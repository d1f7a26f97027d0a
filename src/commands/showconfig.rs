//! Showconfig command
//!
//! Prints the config last applied to the current cluster. With `--config`,
//! prints the given file in flattened form instead.

use std::path::Path;

use clap::Args;

use crate::k8s;
use crate::profile::render_view;
use crate::Result;

/// Display the current configuration
#[derive(Args, Debug)]
pub struct ShowConfigArgs {}

pub async fn run(_args: ShowConfigArgs, config_path: Option<&Path>) -> Result<()> {
    if let Some(path) = config_path {
        let contents = std::fs::read_to_string(path)?;
        print!("{}", render_view(&contents)?);
        println!("\nConfiguration file used: {}", path.display());
        return Ok(());
    }

    let client = k8s::client().await?;
    let stored = k8s::state::load(&client).await?;
    print!("{}", stored);
    Ok(())
}
