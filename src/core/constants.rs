//! Constants used throughout kubify.
//!
//! Centralizes magic strings and default values.

/// Project configuration file name, looked up in the scanned root.
pub const CONFIG_FILE: &str = ".kubify.toml";

/// Directory manifests are written to, relative to the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "k8s";

/// Namespace used when sanitization leaves nothing behind.
pub const DEFAULT_NAMESPACE: &str = "kubify-app";

/// PVC size used when none is given or the input is malformed.
pub const DEFAULT_PVC_SIZE: &str = "10Gi";

/// Name of the local kind cluster images are loaded into.
pub const DEFAULT_CLUSTER: &str = "kind";

pub const DEFAULT_REPLICAS: i32 = 1;

/// Fallback container ports when a Dockerfile has no EXPOSE directive.
pub const FRONTEND_PORT: u16 = 8080;
pub const BACKEND_PORT: u16 = 5000;
pub const CUSTOM_PORT: u16 = 8000;
pub const DATABASE_PORT: u16 = 5432;

/// Port every generated ClusterIP Service listens on.
pub const SERVICE_PORT: i32 = 80;

/// Path probed by readiness and liveness checks.
pub const HEALTH_PATH: &str = "/health";

/// Key substrings that mark an env variable as secret (case-sensitive).
pub const SECRET_MARKERS: &[&str] = &["PASS", "PASSWORD", "TOKEN", "SECRET", "KEY", "USER"];

/// Config keys rewritten to the in-cluster database host.
pub const DATABASE_HOST_KEYS: &[&str] = &["DATABASE_HOST", "DB_HOST"];

/// Candidate env keys for database credentials, in lookup order.
pub const DATABASE_USER_KEYS: &[&str] = &["POSTGRES_USER", "DATABASE_USER", "DB_USER"];
pub const DATABASE_PASSWORD_KEYS: &[&str] =
    &["POSTGRES_PASSWORD", "DATABASE_PASSWORD", "DB_PASSWORD"];
pub const DATABASE_NAME_KEYS: &[&str] = &["POSTGRES_DB", "DATABASE_NAME", "DB_NAME"];

pub const DEFAULT_DATABASE_USER: &str = "postgres";
pub const DEFAULT_DATABASE_NAME: &str = "app";
/// Written to the Secret when the env names no database password.
pub const DEFAULT_DATABASE_PASSWORD: &str = "postgres";

/// Name of the managed database workload and its Service.
pub const DATABASE_SERVICE: &str = "postgres";
pub const DATABASE_IMAGE: &str = "postgres:16-alpine";
pub const DATABASE_DATA_PATH: &str = "/var/lib/postgresql/data";
pub const DATABASE_INIT_PATH: &str = "/docker-entrypoint-initdb.d";

/// File name of the SQL script that seeds the database.
pub const INIT_SQL: &str = "init.sql";

/// Value of the `app.kubernetes.io/managed-by` label.
pub const MANAGED_BY: &str = "kubify";

/// Pod template annotation holding the config/secret digest.
pub const CHECKSUM_ANNOTATION: &str = "kubify.io/config-checksum";

/// Directories never descended into while scanning.
pub const SKIPPED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "vendor",
    "__pycache__",
    ".venv",
];

/// Readiness polling: attempts and spacing in seconds.
pub const ROLLOUT_ATTEMPTS: u32 = 30;
pub const ROLLOUT_INTERVAL_SECS: u64 = 1;

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "KUBIFY_LOG";
