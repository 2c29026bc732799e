//! Kubify - Kubernetes manifests from a Dockerfile project.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── project       # Flag/config/prompt merging, shared pipeline
//! │   ├── scan          # Show what a scan finds
//! │   ├── generate      # Write manifests
//! │   ├── deploy        # Build, load and apply
//! │   ├── prompt        # Interactive input
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── scan          # Project walker
//!     ├── env           # .env file parsing
//!     ├── dockerfile    # EXPOSE extraction
//!     ├── classify      # Secret and role heuristics
//!     ├── plan          # Derive phase, database policies
//!     ├── manifest/     # Typed Kubernetes objects and YAML output
//!     ├── deploy/       # Deployer and Toolchain trait
//!     ├── source        # GitHub clone
//!     ├── config        # .kubify.toml
//!     └── outcome       # Completed / warnings / aborted
//! ```
//!
//! # Pipeline
//!
//! Scan → Classify → Derive → Render → Write → Deploy. Each phase consumes
//! the previous phase's output by value; overrides such as the in-cluster
//! database host are applied while deriving, before anything is rendered.

pub mod cli;
pub mod core;
pub mod error;
