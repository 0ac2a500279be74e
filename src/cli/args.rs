//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use assetman::config::{BuildOverrides, CONFIG_FILE};

/// Front-end asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build every configured bundle and print the published assets
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Resolve component manifests and list the deduplicated dependencies
    #[command(visible_alias = "d")]
    Deps {
        #[command(flatten)]
        args: DepsArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Remove the output directory before building
    #[arg(short, long)]
    pub clean: bool,

    /// Build minified bundles (false: publish sources as is)
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Splice content checksums into published urls
    #[arg(short = 'k', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub checksums: Option<bool>,

    /// Output directory (relative to the current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Print the compiled assets as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub fn overrides(&self) -> BuildOverrides {
        BuildOverrides {
            minify: self.minify,
            checksums: self.checksums,
            output: self.output.clone(),
        }
    }
}

/// Deps command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct DepsArgs {
    /// Manifest files or directories holding bower.json / package.json
    #[arg(required = true, value_name = "MANIFEST", value_hint = clap::ValueHint::AnyPath)]
    pub manifests: Vec<PathBuf>,

    /// List main files with this extension instead of dependencies
    #[arg(short, long)]
    pub ext: Option<String>,

    /// Print JSON
    #[arg(short, long)]
    pub json: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from(["assetman", "build", "--minify=false", "-k", "-V"]).unwrap();
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.minify, Some(false));
        assert_eq!(build_args.checksums, Some(true));
        assert!(build_args.verbose);
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
    }

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::try_parse_from(["assetman", "-C", "web/assets.toml", "b"]).unwrap();
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.overrides(), BuildOverrides::default());
        assert_eq!(cli.config, PathBuf::from("web/assets.toml"));
    }

    #[test]
    fn test_parse_deps() {
        let cli = Cli::try_parse_from(["assetman", "deps", "bower.json", "lib", "--ext", "css"]).unwrap();
        let Commands::Deps { args } = cli.command else {
            panic!("expected deps");
        };
        assert_eq!(args.manifests.len(), 2);
        assert_eq!(args.ext.as_deref(), Some("css"));
    }

    #[test]
    fn test_deps_requires_manifest() {
        assert!(Cli::try_parse_from(["assetman", "deps"]).is_err());
    }
}
