//! Destroy and stop commands
//!
//! kind clusters cannot be paused, so `stop` removes the cluster as well.

use clap::Args;

use super::DEFAULT_CLUSTER_NAME;
use crate::cluster::{ClusterProvider, KindProvider};
use crate::Result;

/// Delete a kind cluster
#[derive(Args, Debug)]
pub struct DestroyArgs {
    /// Name of the kind cluster
    #[arg(short, long, default_value = DEFAULT_CLUSTER_NAME)]
    pub name: String,
}

/// Deleting a cluster that does not exist succeeds
pub async fn run(args: DestroyArgs) -> Result<()> {
    let provider = KindProvider::from_env();
    destroy(&provider, &args.name).await?;
    println!("kind cluster '{}' deleted", args.name);
    Ok(())
}

pub async fn stop(args: DestroyArgs) -> Result<()> {
    let provider = KindProvider::from_env();
    destroy(&provider, &args.name).await?;
    println!("kind cluster '{}' stopped and removed", args.name);
    Ok(())
}

pub async fn destroy(provider: &dyn ClusterProvider, name: &str) -> Result<()> {
    provider.delete_cluster(name).await
}
