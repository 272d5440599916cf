//! End-to-end transform of a small module graph.

use super::{graph_of, rerun, run};
use crate::{TargetStyle, TransformConfig};
use clove_graph::DiagnosticKind;

const A_JS: &str = "\
goog.module('a');
goog.require('goog.string');

class Message {}
exports.Message = Message;
";

const INDEX_JS: &str = "\
const a = goog.require('a');
console.log(new a.Message());
";

fn scenario() -> clove_graph::ModuleGraph {
    graph_of(&[("/src/a.js", A_JS), ("/src/index.js", INDEX_JS)])
}

#[test]
fn test_script_gets_single_binding_import() {
    let graph = scenario();
    let output = run(&graph, "/src/index.js", &TransformConfig::default());

    assert_eq!(
        output.code,
        "import module$a from './a.js';\nconst a = module$a;\nconsole.log(new a.Message());\n"
    );
    assert_eq!(output.edit_count, 2);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_module_gets_export_object_and_default_export() {
    let graph = scenario();
    let output = run(&graph, "/src/a.js", &TransformConfig::default());

    assert_eq!(
        output.code,
        "let exports = {};\ngoog.require('goog.string');\n\nclass Message {}\nexports.Message = Message;\nexport default exports;\n"
    );
    // the missing require is reported, not rewritten
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::MissingDependency);
}

#[test]
fn test_commonjs_target() {
    let graph = scenario();
    let config = TransformConfig::new().with_target_style(TargetStyle::CommonJs);

    let index = run(&graph, "/src/index.js", &config);
    assert_eq!(
        index.code,
        "const module$a = require('./a.js');\nconst a = module$a;\nconsole.log(new a.Message());\n"
    );

    let a = run(&graph, "/src/a.js", &config);
    assert!(a.code.starts_with("exports = {};\n"));
    assert!(a.code.ends_with("exports.Message = Message;\nmodule.exports = exports;\n"));
}

#[test]
fn test_transform_is_idempotent() {
    let graph = scenario();
    for style in [TargetStyle::Esm, TargetStyle::CommonJs] {
        let config = TransformConfig::new().with_target_style(style);
        for path in ["/src/a.js", "/src/index.js"] {
            let first = run(&graph, path, &config);
            let second = rerun(&graph, &first, &config);
            assert_eq!(second.edit_count, 0, "{path} ({style:?})");
            assert_eq!(second.code, first.code);
        }
    }
}

#[test]
fn test_offsets_map_unchanged_text() {
    let graph = scenario();
    let output = run(&graph, "/src/index.js", &TransformConfig::default());

    let original = INDEX_JS.find("console").unwrap() as u32;
    let generated = output.code.find("console").unwrap() as u32;
    assert_eq!(output.offsets.to_generated(original), Some(generated));
    assert_eq!(output.offsets.to_original(generated), Some(original));
}

#[test]
fn test_source_map_names_original() {
    let graph = scenario();
    let output = run(&graph, "/src/index.js", &TransformConfig::default());
    let json = output.source_map("index.js").to_json_string();
    assert!(json.contains("\"sources\":[\"index.js\"]"), "{json}");
    assert!(json.contains("\"mappings\""));
}
