//! Fable CLI binary.
//!
//! This binary provides command-line access to Fable's functionality:
//! - Generate a story and its title page into a timestamped folder
//! - Check that the configured model is available

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_model, run_story};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    #[cfg(feature = "observability")]
    fable::otel::init_telemetry(log_level)?;

    #[cfg(not(feature = "observability"))]
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Story(args) => run_story(args, config).await,
        Commands::Check { model } => check_model(model.as_deref(), config).await,
    };

    #[cfg(feature = "observability")]
    fable::otel::shutdown_telemetry();

    result?;
    Ok(())
}
