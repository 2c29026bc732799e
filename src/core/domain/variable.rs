//! Env variable type.

use crate::core::classify;
use serde::Serialize;

/// A classified env variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVariable {
    key: String,
    value: String,
    is_secret: bool,
}

impl EnvVariable {
    /// Create a variable, classifying it by key.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let is_secret = classify::is_secret(&key);

        Self {
            key,
            value: value.into(),
            is_secret,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_secret(&self) -> bool {
        self.is_secret
    }
}

impl std::fmt::Display for EnvVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}
