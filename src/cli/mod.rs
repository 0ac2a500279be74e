//! Command-line interface module.

mod args;
pub mod build;
pub mod deps;

pub use args::{BuildArgs, Cli, Commands, DepsArgs};
