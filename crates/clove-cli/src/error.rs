//! CLI error types.
//!
//! Library errors convert into [`CliError`] via `#[from]`; [`cli_error_to_miette`]
//! turns the result of a command into a report at the process boundary.

mod miette;

use std::path::PathBuf;

use thiserror::Error;

pub use self::miette::cli_error_to_miette;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] clove_config::ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] clove_graph::Error),

    #[error(transparent)]
    Transform(#[from] clove_transform::TransformError),

    #[error("{0}")]
    Cycle(#[from] clove_graph::CycleError),

    /// Errors were reported as diagnostics; the command fails without output.
    #[error("{count} error(s) found")]
    Diagnostics { count: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No sources found under {}", roots_list(.roots))]
    NoSources { roots: Vec<PathBuf> },

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] ignore::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attach the path to I/O failures.
pub trait ResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| CliError::io(path, source))
    }
}

fn roots_list(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_path() {
        let err = std::fs::read_to_string("/definitely/not/here.js")
            .with_path("/definitely/not/here.js")
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to access /definitely/not/here.js"));
    }

    #[test]
    fn test_no_sources_lists_roots() {
        let err = CliError::NoSources {
            roots: vec![PathBuf::from("src"), PathBuf::from("lib")],
        };
        assert_eq!(err.to_string(), "No sources found under src, lib");
    }
}
