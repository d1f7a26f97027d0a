//! Post-install actions: rolling restarts and deletes

use kube::api::{DeleteParams, ListParams, Patch, PatchParams};
use kube::core::GroupVersionKind;
use serde_json::json;
use tracing::{info, warn};

use super::StageReport;
use crate::config::PostInstallAction;
use crate::k8s::discovery::Resolver;
use crate::{Error, Result};

/// Annotation touched on the pod template to trigger a rollout
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Restart,
    Delete,
}

impl ActionKind {
    pub fn parse(action: &str) -> Result<Self> {
        match action.to_ascii_lowercase().as_str() {
            "restart" => Ok(ActionKind::Restart),
            "delete" => Ok(ActionKind::Delete),
            other => Err(Error::validation(format!(
                "unsupported action {:?}, expected restart or delete",
                other
            ))),
        }
    }

    /// Resource kinds this action may target, as (group, version, kind)
    fn allowed_kinds(self) -> &'static [(&'static str, &'static str, &'static str)] {
        match self {
            ActionKind::Restart => &[
                ("apps", "v1", "Deployment"),
                ("apps", "v1", "StatefulSet"),
                ("apps", "v1", "DaemonSet"),
            ],
            ActionKind::Delete => &[("", "v1", "Pod"), ("batch", "v1", "Job")],
        }
    }

    /// Look up a kind case-insensitively
    pub fn resolve_kind(self, kind: &str) -> Result<GroupVersionKind> {
        self.allowed_kinds()
            .iter()
            .find(|(_, _, k)| k.eq_ignore_ascii_case(kind))
            .map(|(g, v, k)| GroupVersionKind::gvk(g, v, k))
            .ok_or_else(|| {
                let allowed: Vec<_> = self.allowed_kinds().iter().map(|(_, _, k)| *k).collect();
                Error::validation(format!(
                    "kind {:?} is not supported for {:?}, expected one of {}",
                    kind,
                    self,
                    allowed.join(", ")
                ))
            })
    }
}

/// How the action finds its objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    Selector(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAction {
    pub action: ActionKind,
    pub gvk: GroupVersionKind,
    pub target: Target,
    pub namespace: String,
}

/// Check an action entry without touching the cluster
///
/// The label selector wins when both a name and a selector are given.
pub fn validate(entry: &PostInstallAction) -> Result<ValidatedAction> {
    if entry.action.is_empty() {
        return Err(Error::validation("action is required"));
    }
    if entry.kind.is_empty() {
        return Err(Error::validation("kind is required"));
    }

    let action = ActionKind::parse(&entry.action)?;
    let gvk = action.resolve_kind(&entry.kind)?;

    let target = if !entry.label_selector.is_empty() {
        Target::Selector(entry.label_selector.clone())
    } else if !entry.name.is_empty() {
        Target::Name(entry.name.clone())
    } else {
        return Err(Error::validation(format!(
            "{} action on {} needs a name or labelSelector",
            entry.action, entry.kind
        )));
    };

    let namespace = if entry.namespace.is_empty() {
        "default".to_string()
    } else {
        entry.namespace.clone()
    };

    Ok(ValidatedAction {
        action,
        gvk,
        target,
        namespace,
    })
}

/// Merge patch that triggers a rolling restart
pub fn restart_patch(timestamp: &str) -> serde_json::Value {
    json!({
        "spec": {
            "template": {
                "metadata": {
                    "annotations": {
                        RESTARTED_AT_ANNOTATION: timestamp
                    }
                }
            }
        }
    })
}

/// Run one validated action, returning the names it touched
pub async fn execute(resolver: &mut Resolver, action: &ValidatedAction) -> Result<Vec<String>> {
    let api = resolver.api(&action.gvk, &action.namespace).await?;

    let names = match &action.target {
        Target::Name(name) => vec![name.clone()],
        Target::Selector(selector) => api
            .list(&ListParams::default().labels(selector))
            .await?
            .items
            .into_iter()
            .filter_map(|obj| obj.metadata.name)
            .collect(),
    };

    if names.is_empty() {
        warn!(kind = %action.gvk.kind, namespace = %action.namespace, target = ?action.target, "No objects matched");
        return Ok(names);
    }

    match action.action {
        ActionKind::Restart => {
            let patch = restart_patch(&chrono::Utc::now().to_rfc3339());
            for name in &names {
                api.patch(name, &PatchParams::default(), &Patch::Merge(&patch))
                    .await?;
                info!(kind = %action.gvk.kind, name = %name, namespace = %action.namespace, "Restarted");
            }
        }
        ActionKind::Delete => {
            for name in &names {
                api.delete(name, &DeleteParams::background()).await?;
                info!(kind = %action.gvk.kind, name = %name, namespace = %action.namespace, "Deleted");
            }
        }
    }

    Ok(names)
}

/// Run every action entry in order
pub async fn run_all(resolver: &mut Resolver, entries: &[PostInstallAction]) -> StageReport {
    let mut report = StageReport::default();

    for entry in entries {
        let action = match validate(entry) {
            Ok(action) => action,
            Err(e) => {
                warn!(error = %e, "Skipping invalid post-install action");
                report.record(false);
                continue;
            }
        };

        match execute(resolver, &action).await {
            Ok(_) => report.record(true),
            Err(e) => {
                warn!(action = ?action.action, kind = %action.gvk.kind, error = %e, "Post-install action failed");
                report.record(false);
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;
