//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a kubify command running inside the project.
    ///
    /// Colors and log filters from the caller's environment are cleared so
    /// output is stable.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("kubify").expect("failed to find kubify binary");
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("KUBIFY_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `kubify scan`.
    pub fn scan(&self) -> Output {
        self.cmd()
            .args(["--yes", "scan"])
            .output()
            .expect("failed to run kubify scan")
    }

    /// Shortcut for `kubify scan --json`, parsed.
    pub fn scan_json(&self) -> serde_json::Value {
        let output = self
            .cmd()
            .args(["--yes", "scan", "--json"])
            .output()
            .expect("failed to run kubify scan --json");
        super::assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("scan --json prints JSON")
    }

    /// Shortcut for `kubify --yes generate --tag test <args>`.
    pub fn generate(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(["--yes", "generate", "--tag", "test"])
            .args(args)
            .output()
            .expect("failed to run kubify generate")
    }

    /// Shortcut for `kubify --yes deploy --tag test <args>`.
    pub fn deploy(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(["--yes", "deploy", "--tag", "test"])
            .args(args)
            .output()
            .expect("failed to run kubify deploy")
    }
}
