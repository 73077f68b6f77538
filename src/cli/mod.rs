//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes the clap command definitions, the one-shot status/SMART/weather reports
//! and the prompts used by the interactive menu.

mod commands;
mod report;

pub use commands::*;

use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Asks before running a privileged action from the interactive menu.
pub fn confirm_action(what: &str) -> Result<bool> {
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Really {}?", what))
        .default(false)
        .interact_opt()?;
    Ok(answer.unwrap_or(false))
}
