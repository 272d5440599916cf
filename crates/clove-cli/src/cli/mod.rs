//! Command-line interface definition.
//!
//! - `clove build` - convert sources and write them to the output directory
//! - `clove check` - report diagnostics without writing anything
//! - `clove deps` - print the `goog.addDependency` manifest

mod commands;
pub mod enums;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, DepsArgs, SourceArgs};
pub use enums::*;

/// clove - Closure namespace to ES module converter
#[derive(Parser, Debug)]
#[command(
    name = "clove",
    version,
    about = "Convert Closure namespace sources to ES modules",
    long_about = "clove reads sources written with goog.provide, goog.module and goog.require,\n\
                  orders them by dependency, reports duplicate, missing and circular namespaces,\n\
                  and rewrites every file to import/export syntax."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
