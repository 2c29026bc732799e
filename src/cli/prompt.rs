//! Interactive input.
//!
//! Prompts only when stdin is a terminal and `--yes` was not given;
//! otherwise every question silently takes its default.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, Copy)]
pub struct Prompter {
    interactive: bool,
}

impl Prompter {
    pub fn new(yes: bool) -> Self {
        let interactive = !yes && io::stdin().is_terminal() && console::user_attended();
        debug!(interactive, "prompter");
        Self { interactive }
    }

    /// A prompter that never asks.
    pub fn unattended() -> Self {
        Self { interactive: false }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Ask for a value, offering `default`.
    pub fn text(&self, prompt: &str, default: &str) -> Result<String> {
        if !self.interactive {
            return Ok(default.to_string());
        }

        let value: String = Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()?;
        Ok(value)
    }

    /// Ask for a value that may be left empty.
    pub fn optional(&self, prompt: &str) -> Result<Option<String>> {
        if !self.interactive {
            return Ok(None);
        }

        let value: String = Input::new()
            .with_prompt(format!("{prompt} (leave empty to skip)"))
            .allow_empty(true)
            .interact_text()?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}
