//! Last-applied configuration, stored in the cluster
//!
//! `start` records what it applied in a Secret so `showconfig` can print it
//! later without access to the profile it was started from.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::FIELD_MANAGER;
use crate::config::BekindConfig;
use crate::{Error, Result};

pub const STATE_NAMESPACE: &str = "kube-public";
pub const STATE_SECRET: &str = "bekind-config";
pub const STATE_KEY: &str = "config.yaml";

/// What gets written to the state Secret
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub cluster_name: String,

    #[serde(flatten)]
    pub config: BekindConfig,
}

/// Build the state Secret for a cluster
pub fn build_secret(cluster_name: &str, config: &BekindConfig) -> Result<Secret> {
    let state = SavedState {
        cluster_name: cluster_name.to_string(),
        config: config.clone(),
    };
    let rendered = serde_yaml::to_string(&state)?;

    let mut labels = BTreeMap::new();
    labels.insert(
        "app.kubernetes.io/managed-by".to_string(),
        FIELD_MANAGER.to_string(),
    );

    let mut data = BTreeMap::new();
    data.insert(STATE_KEY.to_string(), ByteString(rendered.into_bytes()));

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(STATE_SECRET.to_string()),
            namespace: Some(STATE_NAMESPACE.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        data: Some(data),
        ..Default::default()
    })
}

/// Extract the stored YAML from a state Secret
pub fn read_secret(secret: &Secret) -> Result<String> {
    let bytes = secret
        .data
        .as_ref()
        .and_then(|d| d.get(STATE_KEY))
        .ok_or_else(|| {
            Error::validation(format!(
                "secret {}/{} has no {} key",
                STATE_NAMESPACE, STATE_SECRET, STATE_KEY
            ))
        })?;

    String::from_utf8(bytes.0.clone())
        .map_err(|e| Error::validation(format!("stored config is not UTF-8: {}", e)))
}

/// Create or replace the state Secret
pub async fn save(client: &Client, cluster_name: &str, config: &BekindConfig) -> Result<()> {
    let secret = build_secret(cluster_name, config)?;
    let secrets: Api<Secret> = Api::namespaced(client.clone(), STATE_NAMESPACE);

    secrets
        .patch(
            STATE_SECRET,
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(&secret),
        )
        .await?;

    info!(
        namespace = STATE_NAMESPACE,
        secret = STATE_SECRET,
        "Saved bekind config to cluster"
    );
    Ok(())
}

/// Fetch the stored YAML from the current cluster
pub async fn load(client: &Client) -> Result<String> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), STATE_NAMESPACE);
    match secrets.get(STATE_SECRET).await {
        Ok(secret) => read_secret(&secret),
        Err(kube::Error::Api(err)) if err.code == 404 => Err(Error::validation(format!(
            "no bekind config found in {}/{}; was this cluster created with bekind?",
            STATE_NAMESPACE, STATE_SECRET
        ))),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
