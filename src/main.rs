//! dspack - packaging and live-preview toolchain for design system libraries.

mod cli;
mod comments;
mod config;
mod core;
mod logger;
mod markup;
mod package;
mod pipeline;
mod serve;
mod style;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ToolConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ToolConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { npm, .. } => {
            let mode = if *npm {
                config::OutputMode::Package
            } else {
                config::OutputMode::Archive
            };
            cli::build::run_build(&config, mode)
        }
        Commands::Serve { .. } => cli::serve::run_serve(config),
    }
}
