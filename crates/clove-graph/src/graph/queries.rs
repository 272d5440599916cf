//! Query methods for ModuleGraph.

use std::path::Path;

use super::ModuleGraph;
use crate::index::{NamespaceIndex, RecordId};
use crate::record::SourceRecord;

/// Outcome of resolving one require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Explicitly provided by another record.
    Provided(RecordId),
    /// Owned by another provide file through one of its descendants.
    ImplicitAncestor(RecordId),
    /// The requirer owns the namespace itself.
    SelfReference,
    Missing,
}

impl Resolution {
    /// Record the require points at, unless it is a self-reference or missing.
    pub fn target(&self) -> Option<RecordId> {
        match self {
            Self::Provided(id) | Self::ImplicitAncestor(id) => Some(*id),
            Self::SelfReference | Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl ModuleGraph {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in discovery order.
    pub fn records(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values()
    }

    pub fn get(&self, request: &Path) -> Option<&SourceRecord> {
        self.records.get(request)
    }

    pub fn contains(&self, request: &Path) -> bool {
        self.records.contains_key(request)
    }

    pub fn record(&self, id: RecordId) -> Option<&SourceRecord> {
        self.records.get_index(id).map(|(_, record)| record)
    }

    pub fn id_of(&self, request: &Path) -> Option<RecordId> {
        self.records.get_index_of(request)
    }

    pub fn index(&self) -> &NamespaceIndex {
        &self.index
    }

    /// Explicit owner of `namespace`. A missing owner is not an error here.
    pub fn resolve(&self, namespace: &str) -> Option<&SourceRecord> {
        self.index.get(namespace).and_then(|id| self.record(id))
    }

    /// Resolve `namespace` as required by `requirer`.
    ///
    /// Explicit owners come first. Only provide files fall back to the
    /// implicit ancestor owner.
    pub fn resolve_require(&self, requirer: &SourceRecord, namespace: &str) -> Resolution {
        let own_id = self.id_of(&requirer.request);

        if let Some(owner) = self.index.get(namespace) {
            return if Some(owner) == own_id {
                Resolution::SelfReference
            } else {
                Resolution::Provided(owner)
            };
        }

        if requirer.provides_namespace(namespace) {
            return Resolution::SelfReference;
        }

        if requirer.kind.is_implicit_global() {
            if let Some(owner) = self.index.implicit_owner(namespace) {
                return if Some(owner) == own_id {
                    Resolution::SelfReference
                } else {
                    Resolution::ImplicitAncestor(owner)
                };
            }
        }

        Resolution::Missing
    }

    /// Records the given record directly depends on (ordering edges only).
    pub fn dependencies(&self, requirer: &SourceRecord) -> Vec<&SourceRecord> {
        let mut seen = Vec::new();
        for require in requirer.ordering_requires() {
            if let Some(target) = self.resolve_require(requirer, &require.namespace).target() {
                if !seen.contains(&target) {
                    seen.push(target);
                }
            }
        }
        seen.into_iter().filter_map(|id| self.record(id)).collect()
    }
}
