//! Start command: the full profile sequence
//!
//! # Sequence
//! 1. Resolve the topology (and the cluster name it may declare)
//! 2. Create the kind cluster
//! 3. Label worker nodes when the topology has more than one node
//! 4. Preload images
//! 5. Install Helm charts in order
//! 6. Post-install manifests, patches and actions
//! 7. Save the applied config in the cluster
//!
//! Every step up to the charts aborts the run on failure. Post-install steps
//! only log what they skip. Nothing is rolled back.

use std::path::Path;

use clap::Args;
use tracing::{info, warn};

use super::{load_config, DEFAULT_CLUSTER_NAME};
use crate::argocd::{self, ArgoAccess};
use crate::cluster::topology::{self, resolve_topology};
use crate::cluster::{load_images, ClusterProvider, KindProvider};
use crate::config::BekindConfig;
use crate::helm::{self, DEFAULT_WAIT_TIMEOUT};
use crate::{k8s, postinstall, Result};

/// Create a kind cluster and apply the config file to it
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Name of the kind cluster (a `name:` in kindConfig takes precedence)
    #[arg(short, long, default_value = DEFAULT_CLUSTER_NAME)]
    pub name: String,
}

/// What `start` will create, derived from the config before touching anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPlan {
    pub cluster_name: String,
    pub topology: String,
    pub label_workers: bool,
}

impl StartPlan {
    pub fn new(config: &BekindConfig, requested_name: &str) -> Result<Self> {
        if config.kind_config.trim().is_empty() {
            warn!("No kindConfig in config file, using the single-node layout");
        }
        let topology = resolve_topology("", &config.kind_config)?;

        let cluster_name = topology::cluster_name(&topology)?
            .unwrap_or_else(|| requested_name.to_string());
        let label_workers = topology::node_count(&topology)? > 1;

        Ok(StartPlan {
            cluster_name,
            topology,
            label_workers,
        })
    }
}

pub async fn run(args: StartArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = KindProvider::from_env();
    start(&provider, &config, &args.name).await
}

/// Run the full sequence for one profile document
pub async fn start(provider: &dyn ClusterProvider, config: &BekindConfig, name: &str) -> Result<()> {
    let plan = StartPlan::new(config, name)?;
    let cluster = plan.cluster_name.as_str();
    info!(cluster = %cluster, "Starting kind cluster");

    if config.uses_custom_domain() {
        warn!(domain = %config.domain, "Using custom domain");
    }
    if config.kind_image_version.is_empty() {
        info!("Using default kind node image");
    } else {
        warn!(image = %config.kind_image_version, "Using custom kind node image");
    }

    provider
        .create_cluster(cluster, &plan.topology, &config.kind_image_version)
        .await?;

    let client = k8s::client().await?;

    if plan.label_workers {
        info!("Labeling workers");
        k8s::workers::label_workers(&client).await?;
    }

    let images = &config.load_docker_images.images;
    if !images.is_empty() {
        info!(cluster = %cluster, "Loading images into kind cluster");
        load_images(provider, images, cluster, config.load_docker_images.pull_images).await?;
    }

    let mut argo: Option<ArgoAccess> = None;
    for chart in &config.helm_charts {
        helm::install(chart, DEFAULT_WAIT_TIMEOUT).await?;

        if argocd::is_argocd(chart) {
            let access =
                argocd::lookup(&client, argocd::namespace_for(chart), DEFAULT_WAIT_TIMEOUT).await?;
            argo = Some(access);
        }
    }

    postinstall::run(&client, config).await;

    k8s::state::save(&client, cluster, config).await?;

    match argo {
        Some(access) => println!("{}", access),
        None => println!("kind cluster {} is ready", cluster),
    }
    Ok(())
}
