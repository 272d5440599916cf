//! clove CLI - converts Closure namespace sources to ES modules.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `build`, `check` and `deps`
//! - [`project`] - scanned sources loaded into a module graph
//! - [`scan`] - source discovery under the configured roots
//! - [`watch`] - file watcher feeding incremental rebuilds
//! - [`error`] - CLI errors and their miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines on stderr

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod project;
pub mod scan;
pub mod ui;
pub mod watch;

pub use error::{CliError, Result};
