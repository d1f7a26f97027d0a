//! Readiness polling

use std::future::Future;
use std::time::{Duration, Instant};

use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, Client};
use tracing::{debug, info};

use crate::{Error, Result};

/// Interval between readiness checks
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Poll `check` until it reports ready, fails, or `timeout` elapses
///
/// The first check runs immediately.
///
/// # Arguments
/// * `timeout` - Overall deadline
/// * `interval` - Sleep between checks
/// * `description` - What is being waited for (used in errors and logs)
/// * `check` - `Ok(true)` when ready, `Ok(false)` to keep polling, `Err` to stop
pub async fn poll_until<F, Fut>(
    timeout: Duration,
    interval: Duration,
    description: &str,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();

    loop {
        if check().await? {
            return Ok(());
        }

        if start.elapsed() + interval > timeout {
            return Err(Error::Timeout(description.to_string()));
        }

        debug!("Waiting for {}...", description);
        tokio::time::sleep(interval).await;
    }
}

/// A deployment counts as running once any replica is ready
pub fn deployment_ready(deployment: &Deployment) -> bool {
    deployment
        .status
        .as_ref()
        .and_then(|s| s.ready_replicas)
        .unwrap_or(0)
        > 0
}

/// Wait for a deployment to have at least one ready replica
///
/// A missing deployment is treated as not ready yet.
pub async fn wait_for_deployment(
    client: &Client,
    namespace: &str,
    name: &str,
    timeout: Duration,
) -> Result<()> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let description = format!("deployment {}/{}", namespace, name);

    poll_until(timeout, POLL_INTERVAL, &description, || {
        let deployments = deployments.clone();
        async move {
            match deployments.get(name).await {
                Ok(deployment) => Ok(deployment_ready(&deployment)),
                Err(kube::Error::Api(err)) if err.code == 404 => Ok(false),
                Err(e) => Err(Error::Kube(e)),
            }
        }
    })
    .await?;

    info!(namespace = %namespace, deployment = %name, "Deployment ready");
    Ok(())
}
