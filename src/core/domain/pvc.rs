//! Persistent volume size.

use crate::core::constants::DEFAULT_PVC_SIZE;
use regex::Regex;
use std::sync::LazyLock;

static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(Gi|Mi|G|M)$").expect("valid regex"));

/// Storage request for the managed database volume (e.g. `10Gi`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvcSize(String);

impl PvcSize {
    /// Accept input matching `^[0-9]+(Gi|Mi|G|M)$`, surrounding whitespace
    /// ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        SIZE_PATTERN.is_match(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PvcSize {
    fn default() -> Self {
        Self(DEFAULT_PVC_SIZE.to_string())
    }
}

impl std::fmt::Display for PvcSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sizes() {
        for size in ["1Gi", "500Mi", "20G", "512M", " 5Gi "] {
            assert!(PvcSize::parse(size).is_some(), "{size} should be valid");
        }
        assert_eq!(PvcSize::parse(" 5Gi ").unwrap().as_str(), "5Gi");
    }

    #[test]
    fn test_invalid_sizes() {
        for size in ["", "10", "Gi", "1.5Gi", "10Ti", "10gi", "-1Gi", "10 Gi"] {
            assert!(PvcSize::parse(size).is_none(), "{size} should be invalid");
        }
    }

    #[test]
    fn test_default() {
        assert_eq!(PvcSize::default().as_str(), "10Gi");
    }
}
