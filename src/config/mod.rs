//! Profile documents
//!
//! A profile document is one YAML file describing a cluster: its kind
//! topology, images to preload, Helm charts and post-install steps. Each file
//! is deserialized into its own [`BekindConfig`], so settings from one
//! document never carry over into the next.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default wildcard DNS domain for ingress hosts
pub const DEFAULT_DOMAIN: &str = "127.0.0.1.nip.io";

/// Namespace for Helm releases that do not set one
pub const DEFAULT_CHART_NAMESPACE: &str = "default";

/// Resolved configuration for a single `start`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BekindConfig {
    /// Raw kind `Cluster` document
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind_config: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    /// Node image reference; empty selects the pinned default
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind_image_version: String,

    #[serde(default)]
    pub load_docker_images: LoadDockerImages,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub helm_charts: Vec<HelmChart>,

    /// Manifest references (http://, https:// or file://)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_install_manifests: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_install_patches: Vec<PostInstallPatch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_install_actions: Vec<PostInstallAction>,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BekindConfig {
    fn default() -> Self {
        BekindConfig {
            kind_config: String::new(),
            domain: default_domain(),
            kind_image_version: String::new(),
            load_docker_images: LoadDockerImages::default(),
            helm_charts: vec![],
            post_install_manifests: vec![],
            post_install_patches: vec![],
            post_install_actions: vec![],
        }
    }
}

impl BekindConfig {
    /// Parse a profile document
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Read and parse a profile document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn uses_custom_domain(&self) -> bool {
        self.domain != DEFAULT_DOMAIN
    }
}

/// Images to copy from the local image store into the cluster
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadDockerImages {
    #[serde(default)]
    pub images: Vec<String>,

    /// Pull each image before saving it
    #[serde(default = "default_true")]
    pub pull_images: bool,
}

impl Default for LoadDockerImages {
    fn default() -> Self {
        LoadDockerImages {
            images: vec![],
            pull_images: true,
        }
    }
}

/// A Helm release to install, in list order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmChart {
    /// Repository URL, or an `oci://` chart reference
    #[serde(default)]
    pub url: String,

    /// Local name for the repository
    #[serde(default)]
    pub repo: String,

    #[serde(default)]
    pub chart: String,

    #[serde(default)]
    pub release: String,

    #[serde(default)]
    pub namespace: String,

    /// Inline chart values, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values_object: Option<serde_yaml::Value>,

    /// Block until the release's workloads are ready
    #[serde(default)]
    pub wait: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl HelmChart {
    pub fn is_oci(&self) -> bool {
        self.url.starts_with("oci://")
    }

    /// Namespace the release is installed into; empty means `default`
    pub fn namespace_or_default(&self) -> &str {
        if self.namespace.is_empty() {
            DEFAULT_CHART_NAMESPACE
        } else {
            &self.namespace
        }
    }
}

/// A restart or delete to run against existing workloads
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostInstallAction {
    #[serde(default)]
    pub action: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label_selector: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

/// A JSON patch against one named resource
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PostInstallPatch {
    #[serde(default)]
    pub target: PatchTarget,

    /// JSON-patch document (JSON, or the same list written as YAML)
    #[serde(default)]
    pub patch: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PatchTarget {
    /// API group; empty is the core group
    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub namespace: String,
}

/// Flatten a YAML document into dotted `key -> value` pairs
///
/// Mappings are walked recursively (`helm.repo.url`); sequences and scalars
/// are rendered inline as leaf values. Keys come back sorted.
pub fn flatten(value: &serde_yaml::Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into("", value, &mut out);
    out
}

fn flatten_into(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = scalar_to_string(k);
                let full = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(&full, v, out);
            }
        }
        serde_yaml::Value::Null if prefix.is_empty() => {}
        other => {
            out.insert(prefix.to_string(), render_leaf(other));
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => render_leaf(other),
    }
}

fn render_leaf(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(_) | serde_yaml::Value::Number(_) | serde_yaml::Value::Null => {
            scalar_to_string(value)
        }
        // sequences and tagged values render as compact JSON
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
