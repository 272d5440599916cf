//! # clove-graph
//!
//! Module graph for sources written against the Closure namespace system
//! (`goog.provide`, `goog.module`, `goog.declareModuleId`, `goog.require`).
//!
//! ## Overview
//!
//! - **Source Records**: [`parse_source`] classifies a file's module kind and
//!   extracts its provided and required namespaces with the OXC parser.
//! - **Namespace Index**: a trie from dotted namespaces to owning records,
//!   including implicit ancestor ownership for provide files.
//! - **Module Graph**: resolves every require, orders records dependencies
//!   first and reports duplicate, missing and cyclic namespaces.
//! - **Manifest**: renders the flat `goog.addDependency` manifest.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   parse_source   ┌──────────────┐
//! │ path + text  │ ───────────────▶ │ SourceRecord │
//! └──────────────┘                  └──────┬───────┘
//!                                          │ add_or_update
//!                                          ▼
//!                  ┌───────────────────────────────────────┐
//!                  │              ModuleGraph              │
//!                  │  records (discovery order)            │
//!                  │  NamespaceIndex (segment trie)        │
//!                  │  order cache (OnceCell)               │
//!                  └───────┬───────────────────┬───────────┘
//!                          │                   │
//!                          ▼                   ▼
//!                 compute_order()        diagnostics()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use clove_graph::{ModuleGraph, parse_source};
//!
//! let mut graph = ModuleGraph::new();
//! graph.add_or_update(parse_source("/src/a.js", "goog.module('a');\n"));
//! graph.add_or_update(parse_source("/src/index.js", "const a = goog.require('a');\n"));
//!
//! let order: Vec<_> = graph
//!     .compute_order()
//!     .unwrap()
//!     .iter()
//!     .map(|record| record.request.clone())
//!     .collect();
//! assert_eq!(order[0].to_str(), Some("/src/a.js"));
//! ```

pub mod cache;
pub mod diagnostics;
pub mod error;
mod graph;
pub mod index;
pub mod manifest;
pub mod parse;
pub mod paths;
pub mod record;
pub mod span;

pub use cache::ParseCache;
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use error::{CycleError, Error, GraphError, Result};
pub use graph::{ModuleGraph, Resolution};
pub use index::{NamespaceIndex, RecordId};
pub use manifest::{render_manifest, write_manifest};
pub use parse::{parse_source, source_type_for};
pub use record::{
    Declaration, DeclarationForm, DefineSite, ModuleKind, RecordState, Require, RequireForm,
    SourceRecord,
};
pub use span::{LineIndex, SourceSpan};

/// Re-exported OXC crates so downstream crates parse against the same versions.
pub mod oxc {
    pub use oxc_allocator::Allocator;
    pub use oxc_ast::ast;
    pub use oxc_parser::{Parser, ParserReturn};
    pub use oxc_span::{GetSpan, SourceType, Span};
}

#[cfg(test)]
mod tests;
