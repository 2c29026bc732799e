//! Namespace type.
//!
//! A Kubernetes namespace name sanitized from free-form user input.

use crate::core::constants::DEFAULT_NAMESPACE;

/// Longest name a namespace (an RFC 1123 label) may have.
const MAX_LEN: usize = 63;

/// A sanitized namespace name
///
/// Always non-empty, lowercase, made of `[a-z0-9-]` with no leading or
/// trailing hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Sanitize input into a namespace name.
    ///
    /// Lowercases, turns every run of characters outside `[a-z0-9-]` into a
    /// single hyphen, collapses repeated hyphens, trims hyphens at both ends
    /// and truncates to 63 characters. Returns `None` when nothing is left.
    pub fn try_sanitize(raw: &str) -> Option<Self> {
        let mut name = String::with_capacity(raw.len());

        for ch in raw.trim().to_lowercase().chars() {
            let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                ch
            } else {
                '-'
            };
            if ch == '-' && (name.is_empty() || name.ends_with('-')) {
                continue;
            }
            name.push(ch);
        }

        name.truncate(MAX_LEN);
        let name = name.trim_matches('-');

        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    /// Sanitize input, falling back to the default namespace.
    pub fn sanitize(raw: &str) -> Self {
        Self::try_sanitize(raw).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(DEFAULT_NAMESPACE.to_string())
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
