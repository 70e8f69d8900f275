//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fable - illustrated story generation with a local text-generation model
#[derive(Parser, Debug)]
#[command(name = "fable")]
#[command(about = "Generate illustrated story pages and character metadata with a local model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a story and its title page
    Story(StoryArgs),

    /// Check that the Ollama server is reachable and the model is pulled
    Check {
        /// Model to look for (defaults to the configured one)
        #[arg(long)]
        model: Option<String>,
    },
}

/// Overrides for a story run. Unset flags keep the configured value.
#[derive(Args, Debug, Default, Clone)]
pub struct StoryArgs {
    /// Text-generation model
    #[arg(long)]
    pub model: Option<String>,

    /// Story genre
    #[arg(long)]
    pub genre: Option<String>,

    /// Plot outline
    #[arg(long)]
    pub plot: Option<String>,

    /// Number of pages
    #[arg(long)]
    pub pages: Option<usize>,

    /// Directory that receives the timestamped story folder
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Protagonist name
    #[arg(long)]
    pub hero: Option<String>,

    /// Protagonist narrative description
    #[arg(long)]
    pub hero_description: Option<String>,

    /// Protagonist gender tag
    #[arg(long)]
    pub hero_gender: Option<String>,

    /// Protagonist render tags
    #[arg(long)]
    pub hero_tags: Option<String>,

    /// Protagonist identity model
    #[arg(long)]
    pub lora: Option<String>,

    /// Supporting character name
    #[arg(long)]
    pub support: Option<String>,

    /// Supporting character narrative description
    #[arg(long)]
    pub support_description: Option<String>,

    /// Supporting character gender tag
    #[arg(long)]
    pub support_gender: Option<String>,

    /// Supporting character render tags
    #[arg(long)]
    pub support_tags: Option<String>,

    /// Supporting character identity model
    #[arg(long)]
    pub support_lora: Option<String>,

    /// Skip checking the server for the model before starting
    #[arg(long)]
    pub skip_check: bool,
}
