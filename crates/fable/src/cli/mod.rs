//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fable binary.

mod commands;
mod run;

pub use commands::{Cli, Commands, StoryArgs};
pub use run::{check_model, run_story};
