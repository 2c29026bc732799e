//! Tests for error handling and CLI flags.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("kubify").and(predicate::str::contains("generate")));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    t.cmd().arg("unknown-command").assert().failure();
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_dockerfiles_is_fatal() {
    let t = Test::with_files(&[(".env", "LOG_LEVEL=info\n")]);

    let output = t.generate(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no Dockerfiles found");
    assert!(!t.path("k8s").exists());
}

#[test]
fn test_missing_directory_is_fatal() {
    let t = Test::new();

    let output = t.generate(&["does-not-exist"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "project directory not found");
}

#[test]
fn test_invalid_repo_url_is_fatal() {
    let t = Test::new();

    let output = t.generate(&["--repo", "https://gitlab.com/acme/shop", "checkout"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid GitHub repository URL");
    assert_stderr_contains(&output, "https://github.com/<owner>/<repo>");
}

#[test]
fn test_invalid_tag_is_fatal() {
    let t = Test::with_files(&[("Dockerfile", NGINX_DOCKERFILE)]);

    let output = t
        .cmd()
        .args(["--yes", "generate", "--tag", "bad tag!"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid image tag");
}

#[test]
fn test_unknown_policy_rejected_by_parser() {
    let t = Test::with_files(&[("Dockerfile", NGINX_DOCKERFILE)]);

    t.cmd()
        .args(["--yes", "generate", "--db-policy", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown database policy"));
}

#[test]
fn test_bad_project_config_is_fatal() {
    let t = Test::with_files(&[
        ("Dockerfile", NGINX_DOCKERFILE),
        (".kubify.toml", "[project]\nnamespce = \"typo\"\n"),
    ]);

    let output = t.generate(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid .kubify.toml");
    assert_stderr_contains(&output, "allowed keys");
}

#[test]
fn test_zero_replicas_rejected() {
    let t = Test::with_files(&[("Dockerfile", NGINX_DOCKERFILE)]);

    let output = t.generate(&["--replicas", "0"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "replicas must be at least 1");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_kubify"));
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef kubify"));
}

#[test]
fn test_invalid_repo_url_never_writes_output() {
    let t = Test::new();

    t.cmd()
        .args(["--yes", "generate", "--repo", "https://github.com/acme/..", "checkout"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid GitHub repository URL"));
    assert!(!t.path("checkout").exists());
}
