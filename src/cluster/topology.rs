//! kind cluster topologies
//!
//! Resolves the node layout for a new cluster. A user-supplied raw `Cluster`
//! document always wins; otherwise the install type selects one of the
//! built-in layouts below.

use crate::{Error, Result};

/// One control-plane node that also serves ingress on host ports 80/443
pub const KIND_SINGLE_NODE: &str = r#"kind: Cluster
apiVersion: kind.x-k8s.io/v1alpha4
networking:
  disableDefaultCNI: True
  podSubnet: "10.254.0.0/16"
  serviceSubnet: "172.30.0.0/16"
nodes:
- role: control-plane
  kubeadmConfigPatches:
  - |
    kind: InitConfiguration
    nodeRegistration:
      kubeletExtraArgs:
        node-labels: "nginx=ingresshost"
  extraPortMappings:
  - containerPort: 80
    hostPort: 80
    listenAddress: 0.0.0.0
  - containerPort: 443
    hostPort: 443
    listenAddress: 0.0.0.0
"#;

/// Three control-plane nodes and three workers; the first worker serves ingress
pub const KIND_FULL_STACK: &str = r#"kind: Cluster
apiVersion: kind.x-k8s.io/v1alpha4
networking:
  disableDefaultCNI: True
  podSubnet: "10.254.0.0/16"
  serviceSubnet: "172.30.0.0/16"
nodes:
- role: control-plane
- role: control-plane
- role: control-plane
- role: worker
  kubeadmConfigPatches:
  - |
    kind: JoinConfiguration
    nodeRegistration:
      kubeletExtraArgs:
        node-labels: "haproxy=ingresshost"
  extraPortMappings:
  - containerPort: 80
    hostPort: 80
    listenAddress: 0.0.0.0
  - containerPort: 443
    hostPort: 443
    listenAddress: 0.0.0.0
- role: worker
- role: worker
"#;

/// Requested cluster layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallType {
    Single,
    Full,
    Custom,
}

impl InstallType {
    /// Parse the `--installtype` value; empty selects [`InstallType::Single`]
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "" | "single" => Ok(InstallType::Single),
            "full" => Ok(InstallType::Full),
            "custom" => Ok(InstallType::Custom),
            other => Err(Error::InvalidInstallType(other.to_string())),
        }
    }
}

/// Resolve the kind `Cluster` document to create
///
/// # Precedence
/// 1. Non-empty `raw_spec` (regardless of `install_type`)
/// 2. Built-in layout for `install_type`
///
/// `custom` without a raw spec is an error, as is any unrecognized type.
pub fn resolve_topology(install_type: &str, raw_spec: &str) -> Result<String> {
    // validate the name even when the raw spec wins
    let requested = InstallType::parse(install_type)?;

    if !raw_spec.trim().is_empty() {
        return Ok(raw_spec.to_string());
    }

    match requested {
        InstallType::Single => Ok(KIND_SINGLE_NODE.to_string()),
        InstallType::Full => Ok(KIND_FULL_STACK.to_string()),
        InstallType::Custom => Err(Error::validation(
            "install type 'custom' requires kindConfig in the config file",
        )),
    }
}

/// Number of entries under `nodes:` in a topology document
///
/// kind creates a single control-plane node when the list is absent.
pub fn node_count(topology: &str) -> Result<usize> {
    let doc: serde_yaml::Value = serde_yaml::from_str(topology)?;
    Ok(doc
        .get("nodes")
        .and_then(|n| n.as_sequence())
        .map(|nodes| nodes.len())
        .unwrap_or(1))
}

/// Cluster `name:` declared inside the topology document, if any
pub fn cluster_name(topology: &str) -> Result<Option<String>> {
    let doc: serde_yaml::Value = serde_yaml::from_str(topology)?;
    Ok(doc
        .get("name")
        .and_then(|n| n.as_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string))
}

#[cfg(test)]
#[path = "topology_test.rs"]
mod tests;
