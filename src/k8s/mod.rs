//! Kubernetes API helpers used after the cluster is up

pub mod discovery;
pub mod state;
pub mod wait;
pub mod workers;

use kube::Client;
use tracing::info;

use crate::{CommandErrorExt, Result};

/// Field manager recorded on server-side applies
pub const FIELD_MANAGER: &str = "bekind";

/// Build a client for the current kubeconfig context
///
/// Honours `KUBECONFIG`; kind switches the current context to the new cluster.
pub async fn client() -> Result<Client> {
    let client = Client::try_default().await.cmd_err()?;
    info!("Connected to Kubernetes cluster");
    Ok(client)
}
