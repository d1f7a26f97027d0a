//! Preload local container images into a kind cluster

use tracing::{info, warn};

use super::provider::ClusterProvider;
use crate::{Error, Result};

const ARCHIVE_NAME: &str = "images.tar";

/// Save `images` from the local image store and load them into `cluster`
///
/// # Behavior
/// - Empty `images` or a cluster without nodes is an error
/// - With `pull`, every image is pulled before saving
/// - All images go into one archive inside a temporary directory that is
///   removed on every exit path
/// - The archive is loaded onto the first node returned by the provider only
///
/// # Returns
/// The node that received the images
pub async fn load_images(
    provider: &dyn ClusterProvider,
    images: &[String],
    cluster: &str,
    pull: bool,
) -> Result<String> {
    if images.is_empty() {
        return Err(Error::validation("no images given to load"));
    }
    if cluster.is_empty() {
        return Err(Error::validation("cluster name is required to load images"));
    }

    let nodes = provider.list_nodes(cluster).await?;
    let Some(node) = nodes.first() else {
        return Err(Error::NoNodes {
            cluster: cluster.to_string(),
        });
    };

    if pull {
        for image in images {
            provider.pull_image(image).await?;
        }
    }

    let dir = tempfile::Builder::new().prefix("images-tar").tempdir()?;
    let archive = dir.path().join(ARCHIVE_NAME);

    provider.save_images(images, &archive).await?;

    if nodes.len() > 1 {
        warn!(
            cluster = %cluster,
            node = %node,
            skipped = nodes.len() - 1,
            "Loading images onto the first node only"
        );
    }

    info!(cluster = %cluster, node = %node, count = images.len(), "Loading image archive");
    provider.load_image_archive(cluster, &archive, node).await?;

    Ok(node.clone())
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
