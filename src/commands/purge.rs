//! Purge command: delete every kind cluster on this host

use clap::Args;
use tracing::info;

use crate::cluster::{ClusterProvider, KindProvider};
use crate::Result;

/// Delete all kind clusters
#[derive(Args, Debug)]
pub struct PurgeArgs {}

pub async fn run(_args: PurgeArgs) -> Result<()> {
    let provider = KindProvider::from_env();
    let deleted = purge(&provider).await?;

    if deleted.is_empty() {
        println!("No kind clusters found");
    } else {
        println!("Deleted kind clusters: {}", deleted.join(", "));
    }
    Ok(())
}

/// Delete every listed cluster, stopping at the first failure
pub async fn purge(provider: &dyn ClusterProvider) -> Result<Vec<String>> {
    let clusters = provider.list_clusters().await?;
    for name in &clusters {
        info!(cluster = %name, "Purging cluster");
        provider.delete_cluster(name).await?;
    }
    Ok(clusters)
}
