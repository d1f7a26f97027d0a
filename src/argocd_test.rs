use super::*;
use k8s_openapi::api::networking::v1::{IngressRule, IngressSpec};
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

fn route_from_yaml(yaml: &str) -> HTTPRoute {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn test_is_argocd() {
    let chart = HelmChart {
        chart: "argo-cd".to_string(),
        ..Default::default()
    };
    assert!(is_argocd(&chart));
    assert!(!is_argocd(&HelmChart {
        chart: "argo-workflows".to_string(),
        ..Default::default()
    }));
}

#[test]
fn test_is_argocd_oci_reference() {
    let chart = HelmChart {
        url: "oci://ghcr.io/argoproj/argo-helm/argo-cd".to_string(),
        ..Default::default()
    };
    assert!(is_argocd(&chart));
}

#[test]
fn test_namespace_matches_helm_install() {
    for namespace in ["", "gitops"] {
        let chart = HelmChart {
            url: "https://argoproj.github.io/argo-helm".to_string(),
            repo: "argo".to_string(),
            chart: "argo-cd".to_string(),
            release: "argocd".to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        };

        let args = crate::helm::install_args(&chart, None, crate::helm::DEFAULT_WAIT_TIMEOUT);
        let pos = args.iter().position(|a| a == "--namespace").unwrap();
        assert_eq!(args[pos + 1], namespace_for(&chart));
    }

    assert_eq!(namespace_for(&HelmChart::default()), "default");
}

#[test]
fn test_password_from_secret() {
    let mut data = BTreeMap::new();
    data.insert("password".to_string(), ByteString(b"s3cret".to_vec()));
    let secret = Secret {
        data: Some(data),
        ..Default::default()
    };
    assert_eq!(password_from_secret(&secret).as_deref(), Some("s3cret"));
    assert_eq!(password_from_secret(&Secret::default()), None);
}

#[test]
fn test_host_from_ingress_uses_first_rule() {
    let ingress = Ingress {
        spec: Some(IngressSpec {
            rules: Some(vec![
                IngressRule {
                    host: Some("argocd.127.0.0.1.nip.io".to_string()),
                    ..Default::default()
                },
                IngressRule {
                    host: Some("other.example.com".to_string()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(
        host_from_ingress(&ingress).as_deref(),
        Some("argocd.127.0.0.1.nip.io")
    );
    assert_eq!(host_from_ingress(&Ingress::default()), None);
}

#[test]
fn test_host_from_route() {
    let route = route_from_yaml(
        r#"
apiVersion: gateway.networking.k8s.io/v1
kind: HTTPRoute
metadata:
  name: argocd-server
  namespace: argocd
spec:
  hostnames:
    - argocd.example.dev
"#,
    );
    assert_eq!(host_from_route(&route).as_deref(), Some("argocd.example.dev"));

    let bare = route_from_yaml(
        r#"
apiVersion: gateway.networking.k8s.io/v1
kind: HTTPRoute
metadata:
  name: argocd-server
spec: {}
"#,
    );
    assert_eq!(host_from_route(&bare), None);
}

#[test]
fn test_access_display() {
    let access = ArgoAccess {
        url: Some("https://argocd.127.0.0.1.nip.io".to_string()),
        password: "abc".to_string(),
    };
    assert_eq!(
        access.to_string(),
        "Argo CD is available at https://argocd.127.0.0.1.nip.io username: admin password: abc"
    );

    let no_url = ArgoAccess {
        url: None,
        password: PASSWORD_FROM_CHART.to_string(),
    };
    assert!(no_url.to_string().contains("~* provided in helm chart *~"));
}
