//! Error types for graph construction and ordering.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::span::SourceSpan;

/// A cycle in the require graph.
///
/// `files` lists the participating files in require order starting at the
/// first file entered; `namespaces[i]` is the namespace through which
/// `files[i]` requires `files[(i + 1) % len]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub files: Vec<PathBuf>,
    pub namespaces: Vec<String>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "circular require: ")?;
        for (file, namespace) in self.files.iter().zip(&self.namespaces) {
            write!(f, "{} -({namespace})-> ", file.display())?;
        }
        match self.files.first() {
            Some(first) => write!(f, "{}", first.display()),
            None => Ok(()),
        }
    }
}

impl std::error::Error for CycleError {}

/// Structural errors found while assembling the module graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Namespace is explicitly provided by more than one file. The first owner is kept.
    #[error("namespace '{namespace}' is already provided by {}", .existing.display())]
    DuplicateProvide {
        namespace: String,
        existing: PathBuf,
        duplicate: PathBuf,
        span: SourceSpan,
    },

    /// Require that resolves to no owner.
    #[error("required namespace '{namespace}' is not provided by any file")]
    MissingDependency {
        requirer: PathBuf,
        namespace: String,
        span: SourceSpan,
    },

    #[error(transparent)]
    Cycle(#[from] CycleError),
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<CycleError> for Error {
    fn from(err: CycleError) -> Self {
        Self::Graph(GraphError::Cycle(err))
    }
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;
