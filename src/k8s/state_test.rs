use super::*;
use crate::config::HelmChart;

fn sample_config() -> BekindConfig {
    BekindConfig {
        domain: "example.dev".to_string(),
        helm_charts: vec![HelmChart {
            url: "https://charts.example.com".to_string(),
            repo: "example".to_string(),
            chart: "app".to_string(),
            release: "app".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[test]
fn test_build_secret_location() {
    let secret = build_secret("dev", &sample_config()).unwrap();

    assert_eq!(secret.metadata.name.as_deref(), Some("bekind-config"));
    assert_eq!(secret.metadata.namespace.as_deref(), Some("kube-public"));
    assert_eq!(
        secret
            .metadata
            .labels
            .as_ref()
            .and_then(|l| l.get("app.kubernetes.io/managed-by"))
            .map(String::as_str),
        Some("bekind")
    );
}

#[test]
fn test_secret_contents_round_trip() {
    let config = sample_config();
    let secret = build_secret("dev", &config).unwrap();

    let stored = read_secret(&secret).unwrap();
    assert!(stored.contains("clusterName: dev"));
    assert!(stored.contains("domain: example.dev"));

    let state: SavedState = serde_yaml::from_str(&stored).unwrap();
    assert_eq!(state.cluster_name, "dev");
    assert_eq!(state.config, config);
}

#[test]
fn test_read_secret_without_key() {
    let secret = Secret::default();
    let err = read_secret(&secret).unwrap_err();
    assert!(err.to_string().contains("config.yaml"));
}
