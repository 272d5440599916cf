mod property_tests;
mod scenario_tests;

use std::path::{Path, PathBuf};

use clove_graph::oxc::{Allocator, Parser, SourceType};
use clove_graph::{ModuleGraph, parse_source};

use crate::{TransformConfig, TransformOutput, transform};

pub(crate) fn graph_of(files: &[(&str, &str)]) -> ModuleGraph {
    ModuleGraph::from_records(
        files
            .iter()
            .map(|(path, source)| parse_source(PathBuf::from(path), *source)),
    )
}

/// Transform the file at `path` in `graph`.
pub(crate) fn run(graph: &ModuleGraph, path: &str, config: &TransformConfig) -> TransformOutput {
    let record = graph.get(Path::new(path)).expect("record in graph");
    transform(record, graph, config).expect("transform succeeds")
}

/// Re-parse `output` under the same path and transform it again.
pub(crate) fn rerun(graph: &ModuleGraph, output: &TransformOutput, config: &TransformConfig) -> TransformOutput {
    let record = parse_source(output.request.clone(), output.code.as_str());
    transform(&record, graph, config).expect("transform succeeds")
}

/// Whether `code` parses as a module without syntax errors.
pub(crate) fn parses_cleanly(code: &str) -> bool {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, SourceType::mjs()).parse();
    ret.errors.is_empty() && !ret.panicked
}
