use super::*;

const FULL_PROFILE: &str = r#"
domain: "apps.example.com"
kindImageVersion: "kindest/node:v1.30.0"
kindConfig: |
  kind: Cluster
  apiVersion: kind.x-k8s.io/v1alpha4
  nodes:
  - role: control-plane
loadDockerImages:
  pullImages: false
  images:
    - quay.io/example/app:latest
helmCharts:
  - url: "https://argoproj.github.io/argo-helm"
    repo: "argo"
    chart: "argo-cd"
    release: "argocd"
    namespace: "argocd"
    wait: true
    version: "7.6.8"
    valuesObject:
      server:
        ingress:
          enabled: true
          ingressClassName: nginx
      configs:
        params:
          serverInsecureSkipVerify: true
postInstallManifests:
  - "file:///tmp/app.yaml"
postInstallPatches:
  - target:
      group: apps
      version: v1
      kind: Deployment
      name: coredns
      namespace: kube-system
    patch: |
      [{"op": "replace", "path": "/spec/replicas", "value": 1}]
postInstallActions:
  - action: restart
    kind: Deployment
    labelSelector: "app=web"
    namespace: web
"#;

#[test]
fn test_parse_full_profile() {
    let config = BekindConfig::from_yaml(FULL_PROFILE).unwrap();

    assert_eq!(config.domain, "apps.example.com");
    assert!(config.uses_custom_domain());
    assert_eq!(config.kind_image_version, "kindest/node:v1.30.0");
    assert!(config.kind_config.contains("kind: Cluster"));
    assert!(!config.load_docker_images.pull_images);
    assert_eq!(
        config.load_docker_images.images,
        vec!["quay.io/example/app:latest".to_string()]
    );

    assert_eq!(config.helm_charts.len(), 1);
    let chart = &config.helm_charts[0];
    assert_eq!(chart.repo, "argo");
    assert_eq!(chart.chart, "argo-cd");
    assert_eq!(chart.release, "argocd");
    assert!(chart.wait);
    assert_eq!(chart.version, "7.6.8");
    assert!(!chart.is_oci());

    assert_eq!(config.post_install_manifests, vec!["file:///tmp/app.yaml"]);
    assert_eq!(config.post_install_patches[0].target.kind, "Deployment");
    assert!(config.post_install_patches[0].patch.contains("replace"));
    assert_eq!(config.post_install_actions[0].label_selector, "app=web");
}

#[test]
fn test_values_object_preserves_key_case() {
    let config = BekindConfig::from_yaml(FULL_PROFILE).unwrap();
    let values = config.helm_charts[0].values_object.as_ref().unwrap();

    let flat = flatten(values);
    assert_eq!(
        flat.get("server.ingress.ingressClassName").map(String::as_str),
        Some("nginx")
    );
    assert_eq!(
        flat.get("configs.params.serverInsecureSkipVerify")
            .map(String::as_str),
        Some("true")
    );
}

#[test]
fn test_empty_document_yields_defaults() {
    let config = BekindConfig::from_yaml("").unwrap();
    assert_eq!(config, BekindConfig::default());
    assert_eq!(config.domain, DEFAULT_DOMAIN);
    assert!(config.load_docker_images.pull_images);
    assert!(config.helm_charts.is_empty());
    assert!(config.kind_image_version.is_empty());
}

// Settings from one profile document must not leak into the next one.
#[test]
fn test_sequential_documents_do_not_share_state() {
    let first = BekindConfig::from_yaml(FULL_PROFILE).unwrap();
    assert!(!first.helm_charts.is_empty());

    let second = BekindConfig::from_yaml("kindConfig: \"kind: Cluster\"\n").unwrap();
    assert!(second.helm_charts.is_empty());
    assert!(second.load_docker_images.images.is_empty());
    assert!(second.load_docker_images.pull_images);
    assert_eq!(second.domain, DEFAULT_DOMAIN);
    assert!(second.kind_image_version.is_empty());
}

#[test]
fn test_pull_images_defaults_to_true_when_block_present() {
    let config = BekindConfig::from_yaml("loadDockerImages:\n  images: [nginx]\n").unwrap();
    assert!(config.load_docker_images.pull_images);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config = BekindConfig::from_yaml("somethingElse: 42\ndomain: foo.io\n").unwrap();
    assert_eq!(config.domain, "foo.io");
}

#[test]
fn test_invalid_yaml_is_an_error() {
    assert!(BekindConfig::from_yaml("helmCharts: [").is_err());
}

#[test]
fn test_oci_chart_detection() {
    let chart = HelmChart {
        url: "oci://ghcr.io/example/charts".to_string(),
        ..Default::default()
    };
    assert!(chart.is_oci());
}

#[test]
fn test_flatten_nested_document() {
    let value: serde_yaml::Value = serde_yaml::from_str(
        r#"
domain: foo.io
loadDockerImages:
  pullImages: true
  images: [a, b]
"#,
    )
    .unwrap();

    let flat = flatten(&value);
    let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "domain",
            "loadDockerImages.images",
            "loadDockerImages.pullImages"
        ]
    );
    assert_eq!(flat["loadDockerImages.images"], r#"["a","b"]"#);
    assert_eq!(flat["loadDockerImages.pullImages"], "true");
}

#[test]
fn test_flatten_empty_document() {
    assert!(flatten(&serde_yaml::Value::Null).is_empty());
}

#[test]
fn test_serialized_config_round_trips_through_yaml() {
    let config = BekindConfig::from_yaml(FULL_PROFILE).unwrap();
    let yaml = serde_yaml::to_string(&config).unwrap();
    assert!(yaml.contains("helmCharts"));
    assert_eq!(BekindConfig::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn test_chart_namespace_defaults() {
    let mut chart = HelmChart::default();
    assert_eq!(chart.namespace_or_default(), DEFAULT_CHART_NAMESPACE);

    chart.namespace = "argocd".to_string();
    assert_eq!(chart.namespace_or_default(), "argocd");
}
