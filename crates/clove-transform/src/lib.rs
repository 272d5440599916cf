//! # clove-transform
//!
//! Rewrites the Closure namespace vocabulary of one file into standard
//! import/export syntax using a resolved [`ModuleGraph`].
//!
//! The transform never regenerates code from the AST: it plans a list of
//! [`Edit`]s against the original text (declaration statements, require call
//! sites, `goog.define` calls and an import block) and applies them with
//! [`apply_edits`], which also yields an [`OffsetMap`] for source maps.
//!
//! ```rust
//! use clove_graph::{ModuleGraph, parse_source};
//! use clove_transform::{TransformConfig, transform};
//!
//! let mut graph = ModuleGraph::new();
//! graph.add_or_update(parse_source("/src/a.js", "goog.module('a');\nexports.x = 1;\n"));
//! graph.add_or_update(parse_source("/src/main.js", "const a = goog.require('a');\n"));
//!
//! let main = graph.get("/src/main.js".as_ref()).unwrap();
//! let output = transform(main, &graph, &TransformConfig::default()).unwrap();
//! assert_eq!(output.code, "import module$a from './a.js';\nconst a = module$a;\n");
//! ```

pub mod config;
pub mod edits;
pub mod naming;
mod rules;
pub mod sourcemap;

use std::path::PathBuf;
use std::sync::Arc;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;
use tracing::debug;

use clove_graph::{Diagnostic, ModuleGraph, SourceRecord};

pub use config::{DefineValue, TargetStyle, TransformConfig};
pub use edits::{Edit, EditError, EditedText, OffsetMap, Segment, apply_edits};
pub use oxc_sourcemap::SourceMap;

/// Errors raised by [`transform`].
#[derive(Debug, Error, MietteDiagnostic)]
pub enum TransformError {
    /// Rewrite rules produced overlapping edits.
    #[error("cannot rewrite {}: {source}", .path.display())]
    #[diagnostic(code(clove::transform::overlapping_edit))]
    OverlappingEdit {
        path: PathBuf,
        #[source]
        source: EditError,
    },
}

/// Rewritten file.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub request: PathBuf,
    pub code: String,
    pub edit_count: usize,
    /// Graph diagnostics located in this file.
    pub diagnostics: Vec<Diagnostic>,
    pub offsets: OffsetMap,
    original: Arc<str>,
}

impl TransformOutput {
    pub fn is_unchanged(&self) -> bool {
        self.edit_count == 0
    }

    /// Source map from the generated code back to the original file,
    /// which is recorded under `source_name`.
    pub fn source_map(&self, source_name: &str) -> SourceMap {
        sourcemap::build_source_map(source_name, &self.original, &self.code, &self.offsets)
    }
}

/// Rewrite `record` against `graph`.
///
/// Only vocabulary call sites, declaration statements and define calls are
/// edited. Requires that resolve to nothing are left as they are.
pub fn transform(
    record: &SourceRecord,
    graph: &ModuleGraph,
    config: &TransformConfig,
) -> Result<TransformOutput, TransformError> {
    let overlapping = |source| TransformError::OverlappingEdit {
        path: record.request.clone(),
        source,
    };
    let edits = rules::Planner::new(record, graph, config)
        .plan()
        .map_err(overlapping)?;
    let edit_count = edits.len();

    let EditedText { code, offsets } = apply_edits(&record.source, edits).map_err(overlapping)?;

    debug!(
        path = %record.request.display(),
        edits = edit_count,
        style = ?config.target_style,
        "transformed source"
    );

    Ok(TransformOutput {
        request: record.request.clone(),
        code,
        edit_count,
        diagnostics: graph.diagnostics_for(&record.request),
        offsets,
        original: Arc::clone(&record.source),
    })
}

#[cfg(test)]
mod tests;
