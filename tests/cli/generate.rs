//! Tests for `kubify generate`.

use crate::support::*;

#[test]
fn test_generate_full_stack() {
    let t = Test::full_stack();

    let output = t.generate(&["--namespace", "shop"]);
    assert_success(&output);
    assert_stdout_contains(&output, "wrote 11 manifests");

    assert_eq!(
        t.manifest_files(),
        vec![
            "00-namespace.yaml",
            "01-configmap.yaml",
            "02-secret.yaml",
            "03-postgres-init.yaml",
            "04-postgres-pvc.yaml",
            "05-postgres-deployment.yaml",
            "06-postgres-service.yaml",
            "10-backend-deployment.yaml",
            "10-frontend-deployment.yaml",
            "11-backend-service.yaml",
            "11-frontend-service.yaml",
        ]
    );

    let config = t.manifest_yaml("01-configmap.yaml");
    assert_eq!(
        config["data"]["DATABASE_HOST"].as_str(),
        Some("postgres.shop.svc.cluster.local")
    );
    assert_eq!(config["data"]["LOG_LEVEL"].as_str(), Some("info"));

    let secret = t.manifest_yaml("02-secret.yaml");
    assert_eq!(secret["stringData"]["DATABASE_PASSWORD"].as_str(), Some("x"));

    let backend = t.manifest_yaml("11-backend-service.yaml");
    assert_eq!(backend["spec"]["ports"][0]["targetPort"].as_i64(), Some(5000));
    let frontend = t.manifest_yaml("11-frontend-service.yaml");
    assert_eq!(frontend["spec"]["ports"][0]["targetPort"].as_i64(), Some(80));
}

#[test]
fn test_generate_is_idempotent() {
    let t = Test::full_stack();

    assert_success(&t.generate(&["--namespace", "shop"]));
    let first: Vec<String> = t.manifest_files().iter().map(|f| t.manifest(f)).collect();

    assert_success(&t.generate(&["--namespace", "shop"]));
    let second: Vec<String> = t.manifest_files().iter().map(|f| t.manifest(f)).collect();

    assert_eq!(first, second);
}

#[test]
fn test_generate_custom_role_port() {
    let t = Test::with_files(&[("worker/Dockerfile", WORKER_DOCKERFILE)]);

    let output = t.generate(&["--namespace", "jobs"]);
    assert_success(&output);

    let deployment = t.manifest_yaml("10-worker-deployment.yaml");
    let container = &deployment["spec"]["template"]["spec"]["containers"][0];
    assert_eq!(container["ports"][0]["containerPort"].as_i64(), Some(9000));
    assert_eq!(container["image"].as_str(), Some("jobs-worker:test"));

    let service = t.manifest_yaml("11-worker-service.yaml");
    assert_eq!(service["spec"]["ports"][0]["targetPort"].as_i64(), Some(9000));
}

#[test]
fn test_generate_missing_expose_warns() {
    let t = Test::with_files(&[("api/Dockerfile", "FROM python:3.12\nRUN pip install flask\n")]);

    let output = t.generate(&["--namespace", "shop"]);
    assert_success(&output);
    assert_stderr_contains(&output, "backend: no EXPOSE directive, using port 5000");
}

#[test]
fn test_generate_sanitizes_namespace() {
    let t = Test::with_files(&[("Dockerfile", NGINX_DOCKERFILE)]);

    let output = t.generate(&["--namespace", "My_App 2024!"]);
    assert_success(&output);
    assert_stderr_contains(&output, "using my-app-2024");

    let ns = t.manifest_yaml("00-namespace.yaml");
    assert_eq!(ns["metadata"]["name"].as_str(), Some("my-app-2024"));
}

#[test]
fn test_generate_without_env_has_no_config_objects() {
    let t = Test::with_files(&[("api/Dockerfile", FLASK_DOCKERFILE)]);

    assert_success(&t.generate(&["--namespace", "shop"]));

    let files = t.manifest_files();
    assert!(!files.contains(&"01-configmap.yaml".to_string()));
    assert!(!files.contains(&"02-secret.yaml".to_string()));
}

#[test]
fn test_generate_with_host_renders_ingress() {
    let t = Test::full_stack();

    assert_success(&t.generate(&["--namespace", "shop", "--host", "shop.local"]));

    let ingress = t.manifest_yaml("90-ingress.yaml");
    assert_eq!(ingress["spec"]["rules"][0]["host"].as_str(), Some("shop.local"));
}

#[test]
fn test_generate_absence_policy() {
    let t = Test::with_files(&[("api/Dockerfile", FLASK_DOCKERFILE)]);

    let output = t.generate(&["--namespace", "shop", "--db-policy", "absence", "--pvc-size", "abc"]);
    assert_success(&output);
    assert_stderr_contains(&output, "invalid PVC size \"abc\", using 10Gi");

    let sts = t.manifest_yaml("05-postgres-statefulset.yaml");
    assert_eq!(sts["kind"].as_str(), Some("StatefulSet"));
}

#[test]
fn test_generate_reads_project_config() {
    let t = Test::with_files(&[
        ("api/Dockerfile", FLASK_DOCKERFILE),
        (
            ".kubify.toml",
            "[project]\nnamespace = \"configured\"\nreplicas = 2\noutput = \"deploy\"\n",
        ),
    ]);

    let output = t.cmd().args(["--yes", "generate"]).output().unwrap();
    assert_success(&output);

    let deployment: serde_yaml::Value = serde_yaml::from_str(
        &std::fs::read_to_string(t.path("deploy/10-backend-deployment.yaml")).unwrap(),
    )
    .unwrap();
    assert_eq!(deployment["metadata"]["namespace"].as_str(), Some("configured"));
    assert_eq!(deployment["spec"]["replicas"].as_i64(), Some(2));
}

#[test]
fn test_generate_explicit_path() {
    let t = Test::with_files(&[("app/api/Dockerfile", FLASK_DOCKERFILE)]);

    let output = t
        .cmd()
        .args(["--yes", "generate", "app", "--tag", "v2"])
        .output()
        .unwrap();
    assert_success(&output);

    let deployment: serde_yaml::Value = serde_yaml::from_str(
        &std::fs::read_to_string(t.path("app/k8s/10-backend-deployment.yaml")).unwrap(),
    )
    .unwrap();
    assert_eq!(deployment["metadata"]["namespace"].as_str(), Some("app"));
    assert_eq!(
        deployment["spec"]["template"]["spec"]["containers"][0]["image"].as_str(),
        Some("app-backend:v2")
    );
}
