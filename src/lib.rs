//! bekind - local Kubernetes clusters from YAML profiles
//!
//! Creates kind clusters, installs Helm charts and applies post-install
//! manifests, patches and actions described by a profile document.

pub mod argocd;
pub mod cluster;
pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod helm;
pub mod k8s;
pub mod postinstall;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{CommandErrorExt, Error, Result};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bekind - kind clusters with charts and post-install config
#[derive(Parser, Debug)]
#[command(name = "bekind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.bekind/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a kind cluster without charts or post-install steps
    Create(commands::create::CreateArgs),

    /// Delete a kind cluster
    #[command(visible_aliases = ["delete", "del"])]
    Destroy(commands::destroy::DestroyArgs),

    /// Start a kind cluster from the config file
    Start(commands::start::StartArgs),

    /// Stop (delete) a kind cluster
    Stop(commands::destroy::DestroyArgs),

    /// Run the specified profile
    Run(commands::run::RunArgs),

    /// Display the current configuration
    #[command(name = "showconfig", visible_aliases = ["sc", "showConfig", "configShow"])]
    ShowConfig(commands::showconfig::ShowConfigArgs),

    /// Delete every kind cluster
    Purge(commands::purge::PurgeArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        let config = self.config.as_deref();
        match self.command {
            Commands::Create(args) => commands::create::run(args, config).await,
            Commands::Destroy(args) => commands::destroy::run(args).await,
            Commands::Start(args) => commands::start::run(args, config).await,
            Commands::Stop(args) => commands::destroy::stop(args).await,
            Commands::Run(args) => {
                if args.profile_dir.is_some() && config.is_some() {
                    return Err(Error::validation(
                        "--profile-dir and --config cannot be used together",
                    ));
                }
                commands::run::run(args).await
            }
            Commands::ShowConfig(args) => commands::showconfig::run(args, config).await,
            Commands::Purge(args) => commands::purge::run(args).await,
        }
    }
}
