//! Image tag.

use crate::error::{ConfigError, Result};
use regex::Regex;
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid regex"));

/// Tag applied to every built image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag(String);

impl ImageTag {
    /// Validate a user supplied tag against Docker's tag grammar.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTag` if the tag is malformed.
    pub fn new(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if TAG_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ConfigError::InvalidTag(raw.to_string()).into())
        }
    }

    /// Tag derived from the current UTC time, e.g. `20250101120000`.
    pub fn timestamp() -> Self {
        Self(chrono::Utc::now().format("%Y%m%d%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
