//! Shared test helpers

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use kube::{Client, Config};

use crate::cluster::ClusterProvider;
use crate::{Error, Result};

/// In-memory provider that records every call
#[derive(Default)]
pub struct FakeProvider {
    pub nodes: Vec<String>,
    pub clusters: Vec<String>,
    pub fail_save: bool,
    pub fail_delete: Option<String>,
    pub(crate) calls: Mutex<Vec<String>>,
    pub archive: Mutex<Option<PathBuf>>,
}

impl FakeProvider {
    pub fn with_nodes(nodes: &[&str]) -> Self {
        FakeProvider {
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_clusters(clusters: &[&str]) -> Self {
        FakeProvider {
            clusters: clusters.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ClusterProvider for FakeProvider {
    async fn create_cluster(&self, name: &str, _topology: &str, _node_image: &str) -> Result<()> {
        self.record(format!("create {}", name));
        Ok(())
    }

    async fn delete_cluster(&self, name: &str) -> Result<()> {
        if self.fail_delete.as_deref() == Some(name) {
            return Err(Error::command_failed("kind delete failed"));
        }
        self.record(format!("delete {}", name));
        Ok(())
    }

    async fn list_clusters(&self) -> Result<Vec<String>> {
        Ok(self.clusters.clone())
    }

    async fn list_nodes(&self, cluster: &str) -> Result<Vec<String>> {
        self.record(format!("list-nodes {}", cluster));
        Ok(self.nodes.clone())
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        self.record(format!("pull {}", image));
        Ok(())
    }

    async fn save_images(&self, images: &[String], dest: &Path) -> Result<()> {
        self.record(format!("save {}", images.join(",")));
        *self.archive.lock().unwrap() = Some(dest.to_path_buf());
        if self.fail_save {
            return Err(Error::command_failed("docker save failed"));
        }
        std::fs::write(dest, b"archive")?;
        Ok(())
    }

    async fn load_image_archive(&self, cluster: &str, archive: &Path, node: &str) -> Result<()> {
        assert!(archive.exists(), "archive must exist while loading");
        self.record(format!("load {} {}", cluster, node));
        Ok(())
    }
}

/// Client for an API server that refuses every connection
pub fn unreachable_client() -> Client {
    let config = Config::new("http://127.0.0.1:1".parse().unwrap());
    Client::try_from(config).unwrap()
}
