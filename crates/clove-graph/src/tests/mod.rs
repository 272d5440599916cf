mod graph_tests;

use std::path::PathBuf;

use crate::{ModuleGraph, parse_source};

/// Build a graph from `(path, source)` pairs in the given discovery order.
pub(crate) fn graph_of(files: &[(&str, &str)]) -> ModuleGraph {
    ModuleGraph::from_records(
        files
            .iter()
            .map(|(path, source)| parse_source(PathBuf::from(path), *source)),
    )
}

pub(crate) fn paths(records: &[&crate::SourceRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.request.to_string_lossy().into_owned())
        .collect()
}
