//! Argo CD access details
//!
//! When a profile installs the `argo-cd` chart, the run ends by printing the
//! server URL and the initial admin password instead of the usual ready line.

use std::fmt;
use std::time::Duration;

use gateway_api::apis::standard::httproutes::HTTPRoute;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Api, Client};
use tracing::{info, warn};

use crate::config::HelmChart;
use crate::k8s::wait::wait_for_deployment;
use crate::Result;

pub const ARGOCD_CHART: &str = "argo-cd";
pub const SERVER_NAME: &str = "argocd-server";
pub const ADMIN_SECRET: &str = "argocd-initial-admin-secret";

/// Shown when the chart values supply the admin password
pub const PASSWORD_FROM_CHART: &str = "~* provided in helm chart *~";

/// Matches the chart name, or the last path segment of an OCI reference
pub fn is_argocd(chart: &HelmChart) -> bool {
    chart.chart == ARGOCD_CHART
        || (chart.is_oci()
            && chart.url.trim_end_matches('/').rsplit('/').next() == Some(ARGOCD_CHART))
}

/// Namespace the chart was installed into, as resolved for `helm install`
pub fn namespace_for(chart: &HelmChart) -> &str {
    chart.namespace_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgoAccess {
    pub url: Option<String>,
    pub password: String,
}

impl fmt::Display for ArgoAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(
                f,
                "Argo CD is available at {} username: admin password: {}",
                url, self.password
            ),
            None => write!(
                f,
                "Argo CD is installed (no Ingress or HTTPRoute found) username: admin password: {}",
                self.password
            ),
        }
    }
}

pub fn password_from_secret(secret: &Secret) -> Option<String> {
    secret
        .data
        .as_ref()
        .and_then(|d| d.get("password"))
        .map(|p| String::from_utf8_lossy(&p.0).into_owned())
}

pub fn host_from_ingress(ingress: &Ingress) -> Option<String> {
    ingress
        .spec
        .as_ref()?
        .rules
        .as_ref()?
        .first()?
        .host
        .clone()
}

pub fn host_from_route(route: &HTTPRoute) -> Option<String> {
    route.spec.hostnames.as_ref()?.first().cloned()
}

fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404)
}

async fn server_host(client: &Client, namespace: &str) -> Result<Option<String>> {
    let ingresses: Api<Ingress> = Api::namespaced(client.clone(), namespace);
    match ingresses.get(SERVER_NAME).await {
        Ok(ingress) => return Ok(host_from_ingress(&ingress)),
        Err(e) if is_not_found(&e) => info!("Ingress not found, trying HTTPRoute"),
        Err(e) => return Err(e.into()),
    }

    let routes: Api<HTTPRoute> = Api::namespaced(client.clone(), namespace);
    match routes.get(SERVER_NAME).await {
        Ok(route) => Ok(host_from_route(&route)),
        // also covers clusters without the Gateway API CRDs
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Wait for the Argo CD server and collect its access details
pub async fn lookup(client: &Client, namespace: &str, timeout: Duration) -> Result<ArgoAccess> {
    wait_for_deployment(client, namespace, SERVER_NAME, timeout).await?;

    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let password = match secrets.get(ADMIN_SECRET).await {
        Ok(secret) => password_from_secret(&secret).unwrap_or_else(|| PASSWORD_FROM_CHART.to_string()),
        Err(e) if is_not_found(&e) => PASSWORD_FROM_CHART.to_string(),
        Err(e) => return Err(e.into()),
    };

    let url = server_host(client, namespace)
        .await?
        .map(|host| format!("https://{}", host));
    if url.is_none() {
        warn!(namespace = %namespace, "Could not find an Argo CD Ingress or HTTPRoute host");
    }

    Ok(ArgoAccess { url, password })
}

#[cfg(test)]
#[path = "argocd_test.rs"]
mod tests;
