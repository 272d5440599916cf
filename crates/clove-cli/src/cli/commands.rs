use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::enums::*;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert sources and write them to the output directory
    ///
    /// Every scanned file is parsed, registered in the module graph and
    /// rewritten; files keep their path relative to the root they were found in.
    Build(BuildArgs),

    /// Report parse and graph diagnostics without writing output
    Check(CheckArgs),

    /// Print the goog.addDependency manifest in dependency order
    Deps(DepsArgs),
}

/// Where sources come from. Shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Files or directories to scan (overrides `roots` from the config)
    #[arg(value_name = "ROOT")]
    pub roots: Vec<PathBuf>,

    /// Glob pattern to skip; may be repeated
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Path to a clove.toml or package.json
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Working directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output directory
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Module syntax of the output
    #[arg(short = 's', long, value_enum)]
    pub style: Option<Style>,

    /// Override a goog.define constant, e.g. `--define goog.DEBUG=false`
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    pub defines: Vec<String>,

    /// Write a .map file next to each output
    #[arg(long)]
    pub sourcemap: bool,

    /// Also write the dependency manifest to this file
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Report missing namespaces as warnings instead of failing
    #[arg(long)]
    pub allow_missing: bool,

    /// Rebuild when sources change
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Shorthand for `--format json`
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl CheckArgs {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DepsArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Write the manifest here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory the manifest paths are relative to
    #[arg(long, value_name = "DIR")]
    pub base: Option<PathBuf>,
}
