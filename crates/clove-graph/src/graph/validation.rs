//! Structural checks and diagnostics for ModuleGraph.

use std::path::Path;

use super::ModuleGraph;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{CycleError, GraphError};
use crate::record::{RequireForm, SourceRecord};
use crate::span::SourceSpan;

impl ModuleGraph {
    /// Duplicate provides found while registering records.
    pub fn duplicate_provides(&self) -> &[GraphError] {
        &self.duplicates
    }

    /// Every require (type-only included) that resolves to no owner.
    pub fn missing_dependencies(&self) -> Vec<GraphError> {
        self.records()
            .flat_map(|record| self.missing_in(record))
            .collect()
    }

    fn missing_in<'g>(&'g self, record: &'g SourceRecord) -> impl Iterator<Item = GraphError> + 'g {
        record
            .requires
            .iter()
            .filter(move |require| self.resolve_require(record, &require.namespace).is_missing())
            .map(move |require| GraphError::MissingDependency {
                requirer: record.request.clone(),
                namespace: require.namespace.clone(),
                span: require.call_span,
            })
    }

    /// All graph-level errors: duplicates, missing dependencies and the cycle.
    pub fn errors(&self) -> Vec<GraphError> {
        let mut errors = self.duplicates.clone();
        errors.extend(self.missing_dependencies());
        if let Some(cycle) = self.cycle() {
            errors.push(GraphError::Cycle(cycle));
        }
        errors
    }

    /// Parse diagnostics of every record followed by the graph errors.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .records()
            .flat_map(|record| record.diagnostics.iter().cloned())
            .collect();
        diagnostics.extend(self.errors().iter().map(|err| self.error_diagnostic(err)));
        diagnostics
    }

    /// Diagnostics located in `request`, in the same order as
    /// [`diagnostics`](Self::diagnostics). Only this record's requires are
    /// checked.
    pub fn diagnostics_for(&self, request: &Path) -> Vec<Diagnostic> {
        let Some(record) = self.get(request) else {
            return Vec::new();
        };

        let mut diagnostics = record.diagnostics.clone();
        let duplicates = self.duplicates.iter().filter(|err| {
            matches!(err, GraphError::DuplicateProvide { duplicate, .. } if duplicate == request)
        });
        diagnostics.extend(duplicates.map(|err| self.error_diagnostic(err)));
        diagnostics.extend(self.missing_in(record).map(|err| self.error_diagnostic(&err)));
        if let Some(cycle) = self.cycle_ref() {
            if cycle.files.first().map(|file| file.as_path()) == Some(request) {
                diagnostics.push(self.cycle_diagnostic(cycle));
            }
        }
        diagnostics
    }

    /// Convert a graph error into a positioned diagnostic.
    pub fn error_diagnostic(&self, err: &GraphError) -> Diagnostic {
        match err {
            GraphError::DuplicateProvide {
                duplicate, span, ..
            } => self.locate(
                Diagnostic::error(DiagnosticKind::DuplicateProvide, err.to_string()),
                duplicate,
                *span,
            ),
            GraphError::MissingDependency { requirer, span, .. } => self.locate(
                Diagnostic::error(DiagnosticKind::MissingDependency, err.to_string()),
                requirer,
                *span,
            ),
            GraphError::Cycle(cycle) => self.cycle_diagnostic(cycle),
        }
    }

    fn cycle_diagnostic(&self, cycle: &CycleError) -> Diagnostic {
        let diagnostic = Diagnostic::error(DiagnosticKind::Cycle, cycle.to_string());
        let (Some(file), Some(namespace)) = (cycle.files.first(), cycle.namespaces.first()) else {
            return diagnostic;
        };
        let span = self
            .get(file)
            .and_then(|record| {
                record.requires.iter().find(|require| {
                    require.form == RequireForm::Require && &require.namespace == namespace
                })
            })
            .map_or_else(SourceSpan::zero, |require| require.call_span);
        self.locate(diagnostic, file, span)
    }

    fn locate(&self, diagnostic: Diagnostic, file: &Path, span: SourceSpan) -> Diagnostic {
        match self.get(file) {
            Some(record) => diagnostic.at(file, span, &record.source),
            None => Diagnostic {
                file: Some(file.to_path_buf()),
                ..diagnostic
            },
        }
    }
}
