//! Service role.

use crate::core::constants::{BACKEND_PORT, CUSTOM_PORT, DATABASE_PORT, FRONTEND_PORT};
use serde::Serialize;

/// Logical function of a container image.
///
/// Dockerfile classification only ever yields `Frontend`, `Backend` or
/// `Custom`; `Database` is reserved for the managed database kubify adds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "role", content = "directory")]
pub enum Role {
    Frontend,
    Backend,
    Database,
    /// Catch-all bucket keyed by the Dockerfile's directory name.
    Custom(String),
}

impl Role {
    /// Port used when the Dockerfile has no EXPOSE directive.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Frontend => FRONTEND_PORT,
            Self::Backend => BACKEND_PORT,
            Self::Database => DATABASE_PORT,
            Self::Custom(_) => CUSTOM_PORT,
        }
    }

    /// Base workload name for this role.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Custom(dir) => dir,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(dir) => write!(f, "custom ({dir})"),
            other => f.write_str(other.base_name()),
        }
    }
}
