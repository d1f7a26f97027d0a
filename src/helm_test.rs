use super::*;

fn argo_chart() -> HelmChart {
    HelmChart {
        url: "https://argoproj.github.io/argo-helm".to_string(),
        repo: "argo".to_string(),
        chart: "argo-cd".to_string(),
        release: "argocd".to_string(),
        namespace: "argocd".to_string(),
        values_object: None,
        wait: false,
        version: String::new(),
    }
}

#[test]
fn test_repo_chart_reference() {
    assert_eq!(chart_reference(&argo_chart()), "argo/argo-cd");
}

#[test]
fn test_oci_chart_reference_is_the_url() {
    let chart = HelmChart {
        url: "oci://ghcr.io/example/charts/app".to_string(),
        chart: "app".to_string(),
        ..argo_chart()
    };
    assert_eq!(chart_reference(&chart), "oci://ghcr.io/example/charts/app");
}

#[test]
fn test_oci_chart_reference_ignores_chart_name() {
    let chart = HelmChart {
        url: "oci://ghcr.io/example/charts/app".to_string(),
        chart: "something-else".to_string(),
        ..argo_chart()
    };
    assert_eq!(chart_reference(&chart), "oci://ghcr.io/example/charts/app");
}

#[test]
fn test_install_args_minimal() {
    let args = install_args(&argo_chart(), None, DEFAULT_WAIT_TIMEOUT);
    assert_eq!(
        args,
        vec![
            "upgrade",
            "--install",
            "argocd",
            "argo/argo-cd",
            "--namespace",
            "argocd",
            "--create-namespace"
        ]
    );
}

#[test]
fn test_install_args_with_version_values_and_wait() {
    let chart = HelmChart {
        wait: true,
        version: "7.6.8".to_string(),
        ..argo_chart()
    };
    let args = install_args(
        &chart,
        Some(Path::new("/tmp/values.yaml")),
        Duration::from_secs(600),
    );

    let joined = args.join(" ");
    assert!(joined.contains("--version 7.6.8"));
    assert!(joined.contains("--values /tmp/values.yaml"));
    assert!(joined.ends_with("--wait --timeout 600s"));
}

#[test]
fn test_install_args_default_namespace() {
    let chart = HelmChart {
        namespace: String::new(),
        ..argo_chart()
    };
    let args = install_args(&chart, None, DEFAULT_WAIT_TIMEOUT);
    assert!(args.join(" ").contains("--namespace default"));
}

#[test]
fn test_validate_rejects_missing_fields() {
    let err = validate(&HelmChart::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("url"));
    assert!(msg.contains("chart"));
    assert!(msg.contains("release"));
}

#[test]
fn test_validate_oci_does_not_need_chart() {
    let chart = HelmChart {
        url: "oci://registry.example.com/charts/app".to_string(),
        release: "test-release".to_string(),
        version: "1.0.0".to_string(),
        ..Default::default()
    };
    assert!(validate(&chart).is_ok());

    let args = install_args(&chart, None, DEFAULT_WAIT_TIMEOUT);
    assert_eq!(args[3], "oci://registry.example.com/charts/app");
    assert!(args.join(" ").contains("--version 1.0.0"));
}

#[test]
fn test_validate_repo_chart_needs_chart() {
    let chart = HelmChart {
        chart: String::new(),
        ..argo_chart()
    };
    let err = validate(&chart).unwrap_err();
    assert!(err.to_string().ends_with("missing required fields: chart"));
}

#[test]
fn test_validate_oci_does_not_need_repo() {
    let chart = HelmChart {
        url: "oci://ghcr.io/example/charts".to_string(),
        repo: String::new(),
        ..argo_chart()
    };
    assert!(validate(&chart).is_ok());
}

#[tokio::test]
async fn test_install_with_empty_chart_fails_before_running_helm() {
    let result = install(&HelmChart::default(), DEFAULT_WAIT_TIMEOUT).await;
    assert!(matches!(result, Err(Error::Validation { .. })));
}

#[tokio::test]
async fn test_repo_add_requires_name() {
    let result = repo_add("", "https://charts.example.com").await;
    assert!(matches!(result, Err(Error::Validation { .. })));
}
