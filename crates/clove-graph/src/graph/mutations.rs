//! Mutation methods for ModuleGraph.

use std::path::Path;

use tracing::{debug, warn};

use super::ModuleGraph;
use crate::error::GraphError;
use crate::index::RecordId;
use crate::record::{DeclarationForm, SourceRecord};
use crate::span::SourceSpan;

impl ModuleGraph {
    /// Insert a new record or replace the record with the same request.
    ///
    /// Returns a [`GraphError::DuplicateProvide`] for every namespace of the
    /// record already owned by a different file. The existing owner is kept.
    pub fn add_or_update(&mut self, record: SourceRecord) -> Vec<GraphError> {
        self.invalidate();

        if let Some(id) = self.records.get_index_of(&record.request) {
            debug!(path = %record.request.display(), "replacing source record");
            let request = record.request.clone();
            self.records[id] = record;
            self.rebuild_index();
            return self
                .duplicates
                .iter()
                .filter(|err| matches!(err, GraphError::DuplicateProvide { duplicate, .. } if duplicate == &request))
                .cloned()
                .collect();
        }

        debug!(path = %record.request.display(), "adding source record");
        let (id, _) = self.records.insert_full(record.request.clone(), record);
        self.register(id)
    }

    /// Remove the record for `request`, returning it.
    pub fn remove(&mut self, request: &Path) -> Option<SourceRecord> {
        let removed = self.records.shift_remove(request)?;
        debug!(path = %request.display(), "removed source record");
        self.invalidate();
        self.rebuild_index();
        Some(removed)
    }

    /// Rebuild the namespace index from the owned records in discovery order.
    pub(super) fn rebuild_index(&mut self) {
        self.index.clear();
        self.duplicates.clear();
        for id in 0..self.records.len() {
            self.register(id);
        }
    }

    fn register(&mut self, id: RecordId) -> Vec<GraphError> {
        let Some((_, record)) = self.records.get_index(id) else {
            return Vec::new();
        };

        let mut errors = Vec::new();
        for namespace in &record.provides {
            if let Err(existing) = self.index.insert(namespace, id) {
                let existing = self.records[existing].request.clone();
                warn!(
                    namespace = namespace.as_str(),
                    existing = %existing.display(),
                    duplicate = %record.request.display(),
                    "duplicate provide"
                );
                errors.push(GraphError::DuplicateProvide {
                    namespace: namespace.clone(),
                    existing,
                    duplicate: record.request.clone(),
                    span: declaration_span(record, namespace),
                });
            }
        }
        for namespace in record.kind.implicit_provides() {
            self.index.insert_implicit(namespace, id);
        }

        self.duplicates.extend(errors.iter().cloned());
        errors
    }
}

fn declaration_span(record: &SourceRecord, namespace: &str) -> SourceSpan {
    record
        .declarations
        .iter()
        .find(|decl| {
            decl.form != DeclarationForm::DeclareLegacyNamespace
                && decl.namespace.as_deref() == Some(namespace)
        })
        .map_or_else(SourceSpan::zero, |decl| decl.statement)
}
