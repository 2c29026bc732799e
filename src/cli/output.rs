//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, commands, keys, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info

use console::{style, StyledObject};
use std::fmt::Display;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Apply a style unless colors are disabled.
fn paint(text: impl Display, f: fn(StyledObject<String>) -> StyledObject<String>) -> String {
    if colors_enabled() {
        f(style(text.to_string())).to_string()
    } else {
        text.to_string()
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ wrote 9 manifests to k8s`
pub fn success(msg: &str) {
    println!("{} {}", paint("✓", StyledObject::green), msg);
}

/// Print an error message to stderr (red).
pub fn error(msg: &str) {
    eprintln!("{} {}", paint("✗", StyledObject::red), msg);
}

/// Print a warning message to stderr (yellow).
///
/// Example: `⚠ backend: no EXPOSE directive, using port 5000`
pub fn warn(msg: &str) {
    eprintln!("{} {}", paint("⚠", StyledObject::yellow), msg);
}

/// Print a hint message (cyan) to stderr, next to the error it explains.
pub fn hint(msg: &str) {
    eprintln!(
        "{} {}",
        paint("→", StyledObject::cyan),
        paint(msg, StyledObject::cyan)
    );
}

/// Print a bold section header.
pub fn header(title: &str) {
    println!("{}", paint(title, StyledObject::bold));
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  namespace  shop`
pub fn kv(label: &str, value: impl Display) {
    println!(
        "  {}  {}",
        paint(format!("{label:<10}"), StyledObject::dim),
        paint(value, StyledObject::bold)
    );
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a step of a longer operation.
///
/// Example: `  ▸ building shop-backend:20250101120000`
pub fn step(msg: &str) {
    println!("  {} {}", paint("▸", StyledObject::dim), msg);
}

pub fn rule() {
    println!("{}", paint("─".repeat(RULE_WIDTH), StyledObject::dim));
}

/// Format a path in cyan for inline use.
pub fn path(p: impl Display) -> String {
    paint(p, StyledObject::cyan)
}

/// Format a command in green for inline use.
pub fn cmd(c: &str) -> String {
    paint(c, StyledObject::green)
}

/// Format a key name in cyan for inline use.
pub fn key(k: &str) -> String {
    paint(k, StyledObject::cyan)
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    println!("{}", paint(msg, StyledObject::dim));
}

/// Print a section header with a separator line.
///
/// Example:
/// ```text
/// Services
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}
