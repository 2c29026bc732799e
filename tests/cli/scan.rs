//! Tests for `kubify scan`.

use crate::support::*;

#[test]
fn test_scan_lists_roles_and_classes() {
    let t = Test::full_stack();

    let output = t.scan();
    assert_success(&output);
    assert_stdout_contains(&output, "backend, port 5000");
    assert_stdout_contains(&output, "frontend, port 80");
    assert_stdout_contains(&output, "DATABASE_HOST (config)");
    assert_stdout_contains(&output, "DATABASE_PASSWORD (secret)");
    assert_stdout_contains(&output, "init.sql");
}

#[test]
fn test_scan_never_prints_secret_values() {
    let t = Test::with_files(&[
        ("api/Dockerfile", FLASK_DOCKERFILE),
        (".env", "API_TOKEN=hunter2-very-secret\n"),
    ]);

    let output = t.scan();
    assert_success(&output);
    assert_stdout_excludes(&output, "hunter2-very-secret");

    let json = t.scan_json().to_string();
    assert!(!json.contains("hunter2-very-secret"));
}

#[test]
fn test_scan_json() {
    let t = Test::full_stack();
    t.file("worker/Dockerfile", "FROM golang:1.22\n");

    let json = t.scan_json();

    let dockerfiles = json["dockerfiles"].as_array().unwrap();
    assert_eq!(dockerfiles.len(), 3);
    assert_eq!(dockerfiles[0]["path"], "backend/Dockerfile");
    assert_eq!(dockerfiles[0]["role"], "backend");
    assert_eq!(dockerfiles[0]["port"], 5000);
    assert_eq!(dockerfiles[2]["role"], "custom");
    assert_eq!(dockerfiles[2]["directory"], "worker");
    assert!(dockerfiles[2]["port"].is_null());

    assert_eq!(json["init_sql"], "init.sql");
    assert_eq!(json["config_keys"], serde_json::json!(["DATABASE_HOST", "LOG_LEVEL"]));
    assert_eq!(json["secret_keys"], serde_json::json!(["DATABASE_PASSWORD"]));
}

#[test]
fn test_scan_skips_example_env_and_output_dir() {
    let t = Test::with_files(&[
        ("Dockerfile", NGINX_DOCKERFILE),
        (".env.example", "EXAMPLE_ONLY=1\n"),
        ("k8s/Dockerfile", FLASK_DOCKERFILE),
    ]);

    let json = t.scan_json();

    assert_eq!(json["dockerfiles"].as_array().unwrap().len(), 1);
    assert!(json["env_files"].as_array().unwrap().is_empty());
}

#[test]
fn test_scan_empty_project_warns() {
    let t = Test::new();

    let output = t.scan();
    assert_success(&output);
    assert_stderr_contains(&output, "no Dockerfiles found");
}
