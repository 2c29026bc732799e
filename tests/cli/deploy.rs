//! Tests for `kubify deploy` against stand-in tools.
//!
//! A throwaway `bin/` directory replaces PATH so the real docker, kind and
//! kubectl are never touched.

use std::fs;
use std::path::PathBuf;

use crate::support::*;

impl Test {
    /// Empty PATH directory; returns its path.
    fn bin(&self) -> PathBuf {
        let bin = self.path(".bin");
        fs::create_dir_all(&bin).unwrap();
        bin
    }

    /// Install a shell script that logs its arguments and succeeds.
    #[cfg(unix)]
    fn fake_tool(&self, name: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin().join(name);
        let script = format!(
            "#!/bin/sh\necho \"{name} $*\" >> \"{log}\"\nif [ \"$1 $2\" = \"get all\" ]; then echo \"NAME READY\"; fi\nexit 0\n",
            log = self.path("tools.log").display()
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn tool_log(&self) -> String {
        fs::read_to_string(self.path("tools.log")).unwrap_or_default()
    }
}

#[test]
fn test_deploy_without_kubectl_fails_with_hint() {
    let t = Test::full_stack();

    let output = t
        .cmd()
        .env("PATH", t.bin())
        .args(["--yes", "deploy", "--tag", "test", "--namespace", "shop", "--skip-build"])
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "required tool not found on PATH: kubectl");
    assert_stderr_contains(&output, "install kubectl");
    // Manifests are written before any tool runs.
    assert!(t.path("k8s/00-namespace.yaml").exists());
}

#[cfg(unix)]
#[test]
fn test_deploy_without_docker_fails() {
    let t = Test::full_stack();
    t.fake_tool("kubectl");

    let output = t
        .cmd()
        .env("PATH", t.bin())
        .args(["--yes", "deploy", "--tag", "test", "--namespace", "shop"])
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "required tool not found on PATH: docker");
    assert!(!t.tool_log().contains("apply"));
}

#[cfg(unix)]
#[test]
fn test_deploy_skip_build_applies_in_order() {
    let t = Test::full_stack();
    t.fake_tool("kubectl");

    let output = t
        .cmd()
        .env("PATH", t.bin())
        .args([
            "--yes",
            "deploy",
            "--tag",
            "test",
            "--namespace",
            "shop",
            "--skip-build",
            "--skip-wait",
        ])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "namespace shop already exists");
    assert_stdout_contains(&output, "NAME READY");
    assert_stdout_contains(&output, "deployed shop");

    let log = t.tool_log();
    let applies: Vec<&str> = log
        .lines()
        .filter(|line| line.starts_with("kubectl apply"))
        .collect();
    assert_eq!(applies.len(), 10);
    assert!(applies[0].ends_with("01-configmap.yaml"));
    assert!(applies[9].ends_with("11-frontend-service.yaml"));
    assert!(!log.contains("docker"));
}

#[cfg(unix)]
#[test]
fn test_deploy_builds_and_loads_images() {
    let t = Test::with_files(&[("api/Dockerfile", FLASK_DOCKERFILE)]);
    for tool in ["docker", "kind", "kubectl"] {
        t.fake_tool(tool);
    }

    let output = t
        .cmd()
        .env("PATH", t.bin())
        .args([
            "--yes",
            "deploy",
            "--tag",
            "v1",
            "--namespace",
            "shop",
            "--cluster",
            "dev",
            "--skip-wait",
        ])
        .output()
        .unwrap();

    assert_success(&output);
    let log = t.tool_log();
    assert!(log.contains("docker build -t shop-backend:v1 -f"));
    assert!(log.contains("kind load docker-image shop-backend:v1 --name dev"));
}
