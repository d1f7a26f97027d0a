//! Dynamic resource resolution through API discovery

use kube::api::{Api, DynamicObject};
use kube::core::GroupVersionKind;
use kube::discovery::{ApiCapabilities, ApiResource, Discovery, Scope};
use kube::Client;
use tracing::debug;

use crate::{Error, Result};

/// Split an `apiVersion` into `(group, version)`; core types have an empty group
pub fn parse_api_version(api_version: &str) -> (String, String) {
    match api_version.split_once('/') {
        Some((group, version)) => (group.to_string(), version.to_string()),
        None => (String::new(), api_version.to_string()),
    }
}

/// Cached discovery that refreshes once on a miss
///
/// A manifest list may install a CRD and then an instance of it, so an
/// unknown kind triggers one new discovery pass before giving up.
pub struct Resolver {
    client: Client,
    discovery: Option<Discovery>,
}

impl Resolver {
    pub fn new(client: Client) -> Self {
        Resolver {
            client,
            discovery: None,
        }
    }

    async fn refresh(&mut self) -> Result<&Discovery> {
        debug!("Running API discovery");
        let discovery = Discovery::new(self.client.clone()).run().await?;
        Ok(self.discovery.insert(discovery))
    }

    /// Resolve a GVK to its resource and capabilities
    pub async fn resolve(&mut self, gvk: &GroupVersionKind) -> Result<(ApiResource, ApiCapabilities)> {
        if let Some(found) = self.discovery.as_ref().and_then(|d| d.resolve_gvk(gvk)) {
            return Ok(found);
        }

        self.refresh().await?.resolve_gvk(gvk).ok_or_else(|| {
            Error::validation(format!(
                "unknown resource type: {}/{} {}",
                gvk.group, gvk.version, gvk.kind
            ))
        })
    }

    /// Api handle for a GVK, scoped to `namespace` when the type is namespaced
    pub async fn api(&mut self, gvk: &GroupVersionKind, namespace: &str) -> Result<Api<DynamicObject>> {
        let (resource, caps) = self.resolve(gvk).await?;
        Ok(match caps.scope {
            Scope::Namespaced => Api::namespaced_with(self.client.clone(), namespace, &resource),
            Scope::Cluster => Api::all_with(self.client.clone(), &resource),
        })
    }
}
