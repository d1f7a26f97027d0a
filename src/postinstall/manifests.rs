//! Post-install manifests
//!
//! Each reference is fetched, split into YAML documents and server-side
//! applied one document at a time.

use kube::api::{DynamicObject, Patch, PatchParams};
use kube::core::GroupVersionKind;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::StageReport;
use crate::k8s::discovery::{parse_api_version, Resolver};
use crate::k8s::FIELD_MANAGER;
use crate::{Error, Result};

/// Fetch the raw contents of a manifest reference
///
/// Supports `http://`, `https://` and `file://`.
pub async fn fetch_manifest(reference: &str) -> Result<String> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        let body = reqwest::get(reference)
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    } else if let Some(path) = reference.strip_prefix("file://") {
        Ok(tokio::fs::read_to_string(path).await?)
    } else {
        Err(Error::UnsupportedScheme(reference.to_string()))
    }
}

/// Split a multi-document YAML stream, dropping empty documents
pub fn split_documents(contents: &str) -> Result<Vec<serde_yaml::Value>> {
    let mut documents = vec![];
    for doc in serde_yaml::Deserializer::from_str(contents) {
        let value = serde_yaml::Value::deserialize(doc)?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

/// A document ready to apply
#[derive(Debug)]
pub struct PreparedObject {
    pub gvk: GroupVersionKind,
    pub name: String,
    pub namespace: String,
    pub object: DynamicObject,
}

/// Parse a document into a dynamic object and its target coordinates
///
/// Documents without a namespace target `default`; the namespace is ignored
/// for cluster-scoped kinds.
pub fn prepare(document: serde_yaml::Value) -> Result<PreparedObject> {
    let object: DynamicObject = serde_yaml::from_value(document)?;

    let types = object
        .types
        .as_ref()
        .ok_or_else(|| Error::validation("manifest is missing apiVersion or kind"))?;
    let name = object
        .metadata
        .name
        .clone()
        .ok_or_else(|| Error::validation(format!("{} manifest is missing metadata.name", types.kind)))?;

    let (group, version) = parse_api_version(&types.api_version);
    let gvk = GroupVersionKind::gvk(&group, &version, &types.kind);
    let namespace = object
        .metadata
        .namespace
        .clone()
        .unwrap_or_else(|| "default".to_string());

    Ok(PreparedObject {
        gvk,
        name,
        namespace,
        object,
    })
}

async fn apply_document(resolver: &mut Resolver, document: serde_yaml::Value) -> Result<()> {
    let prepared = prepare(document)?;
    let api = resolver.api(&prepared.gvk, &prepared.namespace).await?;

    api.patch(
        &prepared.name,
        &PatchParams::apply(FIELD_MANAGER).force(),
        &Patch::Apply(&prepared.object),
    )
    .await?;

    debug!(kind = %prepared.gvk.kind, name = %prepared.name, "Applied manifest document");
    Ok(())
}

/// Fetch and apply one manifest reference
///
/// Stops at the first document that fails.
pub async fn apply_manifest(resolver: &mut Resolver, reference: &str) -> Result<usize> {
    let contents = fetch_manifest(reference).await?;
    let documents = split_documents(&contents)?;
    let count = documents.len();

    for document in documents {
        apply_document(resolver, document).await?;
    }

    Ok(count)
}

/// Apply every manifest reference in order
pub async fn apply_all(resolver: &mut Resolver, references: &[String]) -> StageReport {
    let mut report = StageReport::default();

    for reference in references {
        match apply_manifest(resolver, reference).await {
            Ok(count) => {
                info!(manifest = %reference, documents = count, "Applied manifest");
                report.record(true);
            }
            Err(e) => {
                warn!(manifest = %reference, error = %e, "Skipping manifest");
                report.record(false);
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "manifests_test.rs"]
mod tests;
