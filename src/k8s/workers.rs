//! Worker node role labels
//!
//! kind leaves worker nodes without a role, so `kubectl get nodes` shows
//! `<none>`. Multi-node clusters get `node-role.kubernetes.io/worker` added.

use k8s_openapi::api::core::v1::Node;
use kube::api::{ListParams, Patch, PatchParams};
use kube::{Api, Client};
use serde_json::json;
use tracing::info;

use crate::Result;

pub const CONTROL_PLANE_LABEL: &str = "node-role.kubernetes.io/control-plane";
pub const WORKER_LABEL: &str = "node-role.kubernetes.io/worker";

/// Selector matching every node without the control-plane role
pub fn worker_selector() -> String {
    format!("!{}", CONTROL_PLANE_LABEL)
}

/// Merge patch adding the worker role label
pub fn worker_label_patch() -> serde_json::Value {
    json!({
        "metadata": {
            "labels": {
                WORKER_LABEL: ""
            }
        }
    })
}

/// Label every non-control-plane node as a worker
///
/// Stops at the first failed update. Returns the labeled node names.
pub async fn label_workers(client: &Client) -> Result<Vec<String>> {
    let nodes: Api<Node> = Api::all(client.clone());
    let list = nodes
        .list(&ListParams::default().labels(&worker_selector()))
        .await?;

    let patch = worker_label_patch();
    let mut labeled = Vec::with_capacity(list.items.len());
    for node in list.items {
        let Some(name) = node.metadata.name else {
            continue;
        };
        nodes
            .patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        info!(node = %name, "Labeled worker node");
        labeled.push(name);
    }

    Ok(labeled)
}
