//! Run outcome.
//!
//! Separates the three ways a run can end: clean, degraded to defaults or
//! best-effort steps that failed, and aborted on a fatal condition.

use crate::error::Error;

/// A non-fatal condition recorded during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Namespace input was rewritten or replaced by the default.
    NamespaceAdjusted { input: String, namespace: String },
    /// PVC size input did not match the size pattern.
    PvcSizeDefaulted { input: String, size: String },
    /// Dockerfile has no EXPOSE directive; role default port used.
    PortDefaulted { service: String, port: u16 },
    /// No password variable found for the managed database.
    MissingDatabasePassword { key: String },
    /// Workload did not report ready replicas in time.
    RolloutTimeout { kind: String, name: String },
    /// Final status listing could not be produced.
    StatusUnavailable(String),
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NamespaceAdjusted { input, namespace } => {
                write!(f, "namespace {input:?} is not valid, using {namespace}")
            }
            Self::PvcSizeDefaulted { input, size } => {
                write!(f, "invalid PVC size {input:?}, using {size}")
            }
            Self::PortDefaulted { service, port } => {
                write!(f, "{service}: no EXPOSE directive, using port {port}")
            }
            Self::MissingDatabasePassword { key } => write!(
                f,
                "no database password variable found, {key} in the Secret is set to a default"
            ),
            Self::RolloutTimeout { kind, name } => {
                write!(f, "{kind} {name} did not become ready in time")
            }
            Self::StatusUnavailable(reason) => write!(f, "could not list resources: {reason}"),
        }
    }
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    Completed,
    CompletedWithWarnings(Vec<Warning>),
    Aborted(Error),
}

impl Outcome {
    /// `Completed` when there are no warnings, otherwise
    /// `CompletedWithWarnings`.
    pub fn from_warnings(warnings: Vec<Warning>) -> Self {
        if warnings.is_empty() {
            Self::Completed
        } else {
            Self::CompletedWithWarnings(warnings)
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::CompletedWithWarnings(warnings) => warnings,
            _ => &[],
        }
    }

    /// Convert into a `Result`, keeping warnings on success.
    pub fn into_result(self) -> crate::error::Result<Vec<Warning>> {
        match self {
            Self::Completed => Ok(Vec::new()),
            Self::CompletedWithWarnings(warnings) => Ok(warnings),
            Self::Aborted(error) => Err(error),
        }
    }
}

impl<E: Into<Error>> From<Result<Vec<Warning>, E>> for Outcome {
    fn from(result: Result<Vec<Warning>, E>) -> Self {
        match result {
            Ok(warnings) => Self::from_warnings(warnings),
            Err(error) => Self::Aborted(error.into()),
        }
    }
}
