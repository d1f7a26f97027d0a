//! kind cluster provider
//!
//! Wraps the `kind` CLI and the container engine it runs nodes on.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::command::CommandExt;
use crate::Result;

/// Environment variable kind reads to pick its node runtime
pub const PROVIDER_ENV: &str = "KIND_EXPERIMENTAL_PROVIDER";

/// Node image used when the profile does not pin one
pub const DEFAULT_NODE_IMAGE: &str = "kindest/node:v1.32.2";

/// Container engine backing the kind nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeRuntime {
    /// Let kind auto-detect (docker first)
    #[default]
    Default,
    Docker,
    /// Rootless podman
    Podman,
}

impl NodeRuntime {
    /// Interpret a `KIND_EXPERIMENTAL_PROVIDER` value
    ///
    /// Unrecognized values fall back to [`NodeRuntime::Default`] with a warning.
    pub fn from_provider(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => NodeRuntime::Default,
            Some("docker") => NodeRuntime::Docker,
            Some("podman") => NodeRuntime::Podman,
            Some(other) => {
                warn!(
                    provider = %other,
                    "Ignoring unknown {} value, using default runtime", PROVIDER_ENV
                );
                NodeRuntime::Default
            }
        }
    }

    pub fn from_env() -> Self {
        Self::from_provider(std::env::var(PROVIDER_ENV).ok().as_deref())
    }

    /// Value to export to kind, if any
    pub fn provider_value(&self) -> Option<&'static str> {
        match self {
            NodeRuntime::Default => None,
            NodeRuntime::Docker => Some("docker"),
            NodeRuntime::Podman => Some("podman"),
        }
    }

    /// CLI used to pull and save images
    pub fn engine_binary(&self) -> &'static str {
        match self {
            NodeRuntime::Podman => "podman",
            NodeRuntime::Default | NodeRuntime::Docker => "docker",
        }
    }
}

/// Cluster lifecycle and node image operations
///
/// Implemented by [`KindProvider`]; tests substitute an in-memory fake.
#[async_trait]
pub trait ClusterProvider: Send + Sync {
    /// Create `name` from a kind `Cluster` document
    async fn create_cluster(&self, name: &str, topology: &str, node_image: &str) -> Result<()>;

    /// Delete `name`; deleting a missing cluster succeeds
    async fn delete_cluster(&self, name: &str) -> Result<()>;

    async fn list_clusters(&self) -> Result<Vec<String>>;

    /// Node (container) names of `cluster`
    async fn list_nodes(&self, cluster: &str) -> Result<Vec<String>>;

    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Save `images` into a single archive at `dest`
    async fn save_images(&self, images: &[String], dest: &Path) -> Result<()>;

    /// Load an image archive onto a single node
    async fn load_image_archive(&self, cluster: &str, archive: &Path, node: &str) -> Result<()>;
}

/// [`ClusterProvider`] backed by the `kind` binary
#[derive(Debug, Clone, Default)]
pub struct KindProvider {
    runtime: NodeRuntime,
}

impl KindProvider {
    pub fn new(runtime: NodeRuntime) -> Self {
        KindProvider { runtime }
    }

    /// Provider for the runtime selected by the environment
    pub fn from_env() -> Self {
        Self::new(NodeRuntime::from_env())
    }

    pub fn runtime(&self) -> NodeRuntime {
        self.runtime
    }

    fn kind(&self) -> Command {
        let mut cmd = Command::new("kind");
        match self.runtime.provider_value() {
            Some(value) => {
                cmd.env(PROVIDER_ENV, value);
            }
            None => {
                cmd.env_remove(PROVIDER_ENV);
            }
        }
        cmd
    }

    fn engine(&self) -> Command {
        Command::new(self.runtime.engine_binary())
    }
}

/// Arguments for `kind create cluster`, topology read from stdin
pub fn create_args(name: &str, node_image: &str) -> Vec<String> {
    let image = if node_image.is_empty() {
        DEFAULT_NODE_IMAGE
    } else {
        node_image
    };
    vec![
        "create".to_string(),
        "cluster".to_string(),
        "--name".to_string(),
        name.to_string(),
        "--config".to_string(),
        "-".to_string(),
        "--image".to_string(),
        image.to_string(),
    ]
}

fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ClusterProvider for KindProvider {
    async fn create_cluster(&self, name: &str, topology: &str, node_image: &str) -> Result<()> {
        info!(cluster = %name, runtime = ?self.runtime, "Creating kind cluster");
        self.kind()
            .args(create_args(name, node_image))
            .output_checked_with_stdin(topology.as_bytes())
            .await
            .map_err(|e| {
                crate::Error::command_failed(format!("failed to create cluster {}: {}", name, e))
            })?;
        info!(cluster = %name, "kind cluster created");
        Ok(())
    }

    async fn delete_cluster(&self, name: &str) -> Result<()> {
        info!(cluster = %name, "Deleting kind cluster");
        self.kind()
            .args(["delete", "cluster", "--name", name])
            .output_checked()
            .await?;
        Ok(())
    }

    async fn list_clusters(&self) -> Result<Vec<String>> {
        let out = self.kind().args(["get", "clusters"]).output_checked().await?;
        // kind prints a notice instead of an empty list
        Ok(non_empty_lines(&out)
            .into_iter()
            .filter(|l| !l.starts_with("No kind clusters found"))
            .collect())
    }

    async fn list_nodes(&self, cluster: &str) -> Result<Vec<String>> {
        let out = self
            .kind()
            .args(["get", "nodes", "--name", cluster])
            .output_checked()
            .await?;
        Ok(non_empty_lines(&out)
            .into_iter()
            .filter(|l| !l.starts_with("No kind nodes found"))
            .collect())
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        info!(image = %image, engine = self.runtime.engine_binary(), "Pulling image");
        self.engine().args(["pull", image]).output_checked().await?;
        Ok(())
    }

    async fn save_images(&self, images: &[String], dest: &Path) -> Result<()> {
        self.engine()
            .arg("save")
            .arg("-o")
            .arg(dest)
            .args(images)
            .output_checked()
            .await?;
        Ok(())
    }

    async fn load_image_archive(&self, cluster: &str, archive: &Path, node: &str) -> Result<()> {
        self.kind()
            .args(["load", "image-archive"])
            .arg(archive)
            .args(["--name", cluster, "--nodes", node])
            .output_checked()
            .await?;
        Ok(())
    }
}
