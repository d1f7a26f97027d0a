//! Create command: a bare kind cluster, no charts or post-install steps

use std::path::Path;

use clap::Args;
use tracing::info;

use super::{load_config, DEFAULT_CLUSTER_NAME};
use crate::cluster::topology::{self, resolve_topology};
use crate::cluster::{ClusterProvider, KindProvider};
use crate::k8s;
use crate::Result;

/// Create a kind cluster
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the kind cluster
    #[arg(short, long, default_value = DEFAULT_CLUSTER_NAME)]
    pub name: String,

    /// Cluster layout: single, full, or custom (custom reads kindConfig from --config)
    #[arg(short = 't', long = "installtype", default_value = "")]
    pub install_type: String,

    /// kind node image, overriding kindImageVersion
    #[arg(short = 'i', long = "kindimage")]
    pub kind_image: Option<String>,
}

pub async fn run(args: CreateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let topology = resolve_topology(&args.install_type, &config.kind_config)?;

    let name = topology::cluster_name(&topology)?.unwrap_or(args.name);
    let node_image = args
        .kind_image
        .unwrap_or_else(|| config.kind_image_version.clone());

    let provider = KindProvider::from_env();
    provider.create_cluster(&name, &topology, &node_image).await?;

    if topology::node_count(&topology)? > 1 {
        info!("Labeling workers");
        let client = k8s::client().await?;
        k8s::workers::label_workers(&client).await?;
    }

    println!("kind cluster '{}' created successfully", name);
    Ok(())
}
