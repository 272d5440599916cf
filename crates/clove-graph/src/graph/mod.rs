//! In-memory Module Graph.
//!
//! The graph owns every [`SourceRecord`] in discovery order together with the
//! [`NamespaceIndex`]. Methods are grouped by concern across the submodules:
//!
//! - [`mutations`] - registration, replacement and removal of records
//! - [`queries`] - lookups and namespace resolution
//! - [`order`] - topological ordering and cycle extraction
//! - [`validation`] - missing/duplicate checks and diagnostics

mod mutations;
mod order;
mod queries;
mod validation;

use std::path::PathBuf;

use indexmap::IndexMap;
use once_cell::unsync::OnceCell;

pub use queries::Resolution;

use crate::error::{CycleError, GraphError};
use crate::index::{NamespaceIndex, RecordId};
use crate::record::SourceRecord;

/// Aggregate of all Source Records plus the namespace index.
///
/// Mutations take `&mut self`; the derived topological order is computed on
/// first request and dropped on every mutation.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    records: IndexMap<PathBuf, SourceRecord>,
    index: NamespaceIndex,
    duplicates: Vec<GraphError>,
    order: OnceCell<Result<Vec<RecordId>, CycleError>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from records in discovery order, dropping the
    /// per-record duplicate reports (they remain queryable).
    pub fn from_records(records: impl IntoIterator<Item = SourceRecord>) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_or_update(record);
        }
        graph
    }

    fn invalidate(&mut self) {
        self.order = OnceCell::new();
    }
}
