//! ml-aoi - command-line interface for the STAC ML-AOI extension
//!
//! Validates Items and Collections against the extension, lists the assets
//! an Item exposes to a training pipeline and sets ML-AOI fields in place.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // The `[logging]` section is needed before the subscriber is installed
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e, cli.use_color()),
    };

    control::set_override(cli.use_color() && config.output.color);

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli, config).await {
        exit_with(&e, control::SHOULD_COLORIZE.should_colorize());
    }
}

fn exit_with(e: &error::Error, use_color: bool) -> ! {
    eprintln!("{}", error::format_error(e, use_color));

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(e.exit_code());
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(cli.output, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Assets(args) => handlers::handle_assets(args, &config, &mut output).await,
        Commands::Apply(args) => handlers::handle_apply(args, &config, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_file(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["ml-aoi", "validate", "item.json"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["ml-aoi", "-vv", "validate", "item.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["ml-aoi", "--quiet", "assets", "item.json"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[tokio::test]
    async fn test_run_dispatches_config_show() {
        let cli = Cli::parse_from(["ml-aoi", "--quiet", "config", "show", "--format", "json"]);
        assert!(run(cli, Config::default()).await.is_ok());
    }
}
