//! assetman - front-end asset pipeline.

mod cli;

use anyhow::Result;
use assetman::config::AssetConfig;
use assetman::logger;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Build { build_args } => {
            logger::set_verbose(build_args.verbose);
            let mut config = AssetConfig::load(&cli.config)?;
            config.apply_overrides(&build_args.overrides());
            cli::build::build_assets(&config, build_args)
        }
        Commands::Deps { args } => {
            logger::set_verbose(args.verbose);
            cli::deps::list_dependencies(args)
        }
    }
}
