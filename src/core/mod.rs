//! Core library components.
//!
//! The pipeline phases (scan, classify, derive, render, deploy) and the
//! types they pass between each other. Nothing in here prompts or prints.

pub mod classify;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod dockerfile;
pub mod domain;
pub mod env;
pub mod manifest;
pub mod outcome;
pub mod plan;
pub mod scan;
pub mod source;
