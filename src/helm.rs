//! Helm chart installation
//!
//! Drives the `helm` CLI. Regular repositories are added (or refreshed) under
//! their configured name before install; `oci://` references are installed
//! directly. Every install is an upgrade-in-place when the release exists.

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::info;

use crate::command::CommandExt;
use crate::config::HelmChart;
use crate::{Error, Result};

/// Client-side timeout for `--wait` installs
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Chart reference passed to `helm upgrade --install`
///
/// - OCI: the URL itself, pulled by reference (`chart` is not consulted)
/// - Otherwise: `repo/chart` resolved from the local repository cache
pub fn chart_reference(chart: &HelmChart) -> String {
    if chart.is_oci() {
        chart.url.clone()
    } else {
        format!("{}/{}", chart.repo, chart.chart)
    }
}

fn validate(chart: &HelmChart) -> Result<()> {
    let mut missing = vec![];
    if chart.url.is_empty() {
        missing.push("url");
    }
    if chart.release.is_empty() {
        missing.push("release");
    }
    if !chart.is_oci() {
        if chart.chart.is_empty() {
            missing.push("chart");
        }
        if chart.repo.is_empty() {
            missing.push("repo");
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "helm chart is missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Arguments for `helm upgrade --install`
pub fn install_args(chart: &HelmChart, values_file: Option<&Path>, timeout: Duration) -> Vec<String> {
    let mut args = vec![
        "upgrade".to_string(),
        "--install".to_string(),
        chart.release.clone(),
        chart_reference(chart),
        "--namespace".to_string(),
        chart.namespace_or_default().to_string(),
        "--create-namespace".to_string(),
    ];

    if !chart.version.is_empty() {
        args.push("--version".to_string());
        args.push(chart.version.clone());
    }

    if let Some(path) = values_file {
        args.push("--values".to_string());
        args.push(path.to_string_lossy().into_owned());
    }

    if chart.wait {
        args.push("--wait".to_string());
        args.push("--timeout".to_string());
        args.push(format!("{}s", timeout.as_secs()));
    }

    args
}

/// Add or refresh a named chart repository
pub async fn repo_add(name: &str, url: &str) -> Result<()> {
    if name.is_empty() || url.is_empty() {
        return Err(Error::validation("helm repo name and url are required"));
    }
    Command::new("helm")
        .args(["repo", "add", name, url, "--force-update"])
        .output_checked()
        .await?;
    Command::new("helm")
        .args(["repo", "update", name])
        .output_checked()
        .await?;
    Ok(())
}

/// Install or upgrade one chart
///
/// Errors are returned to the caller unchanged; a failed install aborts the run.
pub async fn install(chart: &HelmChart, timeout: Duration) -> Result<()> {
    validate(chart)?;

    info!(
        release = %chart.release,
        chart = %chart_reference(chart),
        namespace = %chart.namespace_or_default(),
        wait = chart.wait,
        "Installing Helm chart"
    );

    if !chart.is_oci() {
        repo_add(&chart.repo, &chart.url).await?;
    }

    // dropped (and deleted) when the install returns
    let values_file = match &chart.values_object {
        Some(values) if !values.is_null() => {
            let file = tempfile::Builder::new()
                .prefix("bekind-values-")
                .suffix(".yaml")
                .tempfile()?;
            std::fs::write(file.path(), serde_yaml::to_string(values)?)?;
            Some(file)
        }
        _ => None,
    };

    let args = install_args(chart, values_file.as_ref().map(|f| f.path()), timeout);
    Command::new("helm")
        .args(&args)
        .output_checked()
        .await
        .map_err(|e| {
            Error::command_failed(format!(
                "failed to install chart {}: {}",
                chart_reference(chart),
                e
            ))
        })?;

    info!(release = %chart.release, "Helm chart installed");
    Ok(())
}

#[cfg(test)]
#[path = "helm_test.rs"]
mod tests;
