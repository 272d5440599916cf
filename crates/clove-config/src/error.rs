//! Error types for configuration discovery, loading and validation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no clove.toml or package.json \"clove\" field found in {}", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("invalid config value for '{field}'{}", .hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("no source roots specified")]
    NoRoots,

    #[error("source root not found: {}", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Suggested fix, when one is known.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { hint, .. } | Self::SchemaValidation { hint, .. } => {
                hint.as_deref()
            }
            Self::NotFound { .. } => Some("Create a clove.toml or pass the roots on the command line"),
            Self::NoRoots => Some("Set 'roots' in clove.toml or pass paths on the command line"),
            _ => None,
        }
    }
}
