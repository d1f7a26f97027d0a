//! Post-install JSON patches against named resources

use kube::api::{Patch, PatchParams};
use kube::core::GroupVersionKind;
use tracing::{info, warn};

use super::StageReport;
use crate::config::PostInstallPatch;
use crate::k8s::discovery::Resolver;
use crate::{Error, Result};

/// A patch entry with defaults filled in and its body parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPatch {
    pub gvk: GroupVersionKind,
    pub name: String,
    pub namespace: String,
    pub patch: json_patch::Patch,
}

/// Validate an entry and fill in defaults
///
/// Group defaults to the core group and namespace to `default`. The patch
/// body may be JSON or the equivalent YAML list of operations.
pub fn resolve(entry: &PostInstallPatch) -> Result<ResolvedPatch> {
    let target = &entry.target;

    let mut missing = vec![];
    if target.version.is_empty() {
        missing.push("target.version");
    }
    if target.kind.is_empty() {
        missing.push("target.kind");
    }
    if target.name.is_empty() {
        missing.push("target.name");
    }
    if entry.patch.trim().is_empty() {
        missing.push("patch");
    }
    if !missing.is_empty() {
        return Err(Error::validation(format!(
            "patch is missing required fields: {}",
            missing.join(", ")
        )));
    }

    let patch: json_patch::Patch = serde_yaml::from_str(&entry.patch).map_err(|e| {
        Error::validation(format!("invalid patch for {}/{}: {}", target.kind, target.name, e))
    })?;

    let namespace = if target.namespace.is_empty() {
        "default".to_string()
    } else {
        target.namespace.clone()
    };

    Ok(ResolvedPatch {
        gvk: GroupVersionKind::gvk(&target.group, &target.version, &target.kind),
        name: target.name.clone(),
        namespace,
        patch,
    })
}

async fn apply(resolver: &mut Resolver, patch: ResolvedPatch) -> Result<()> {
    let api = resolver.api(&patch.gvk, &patch.namespace).await?;
    api.patch(
        &patch.name,
        &PatchParams::default(),
        &Patch::Json::<()>(patch.patch),
    )
    .await?;
    Ok(())
}

/// Apply every patch entry in order
pub async fn apply_all(resolver: &mut Resolver, entries: &[PostInstallPatch]) -> StageReport {
    let mut report = StageReport::default();

    for entry in entries {
        let resolved = match resolve(entry) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(error = %e, "Skipping invalid post-install patch");
                report.record(false);
                continue;
            }
        };

        let kind = resolved.gvk.kind.clone();
        let name = resolved.name.clone();
        let namespace = resolved.namespace.clone();
        match apply(resolver, resolved).await {
            Ok(()) => {
                info!(kind = %kind, name = %name, namespace = %namespace, "Patched resource");
                report.record(true);
            }
            Err(e) => {
                warn!(kind = %kind, name = %name, namespace = %namespace, error = %e, "Failed to patch resource");
                report.record(false);
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "patches_test.rs"]
mod tests;
