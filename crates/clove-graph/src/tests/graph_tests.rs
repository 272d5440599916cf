//! Registration, resolution and validation tests.

use std::path::Path;

use super::graph_of;
use crate::{DiagnosticKind, GraphError, ModuleGraph, Resolution, parse_source};

#[test]
fn test_explicit_provide_beats_implicit_ancestor() {
    let graph = graph_of(&[
        ("/src/abc.js", "goog.provide('a.b.c');"),
        ("/src/a.js", "goog.provide('a');"),
    ]);

    let owner = graph.resolve("a").map(|record| record.request.as_path());
    assert_eq!(owner, Some(Path::new("/src/a.js")));
    assert_eq!(graph.index().implicit_owner("a"), None);
    assert_eq!(graph.index().implicit_owner("a.b"), Some(0));
    assert!(graph.resolve("a.b").is_none());
}

#[test]
fn test_duplicate_provide_keeps_first_owner() {
    let mut graph = ModuleGraph::new();
    assert!(graph
        .add_or_update(parse_source("/src/one.js", "goog.provide('a.b');"))
        .is_empty());

    let errors = graph.add_or_update(parse_source("/src/two.js", "goog.provide('a.b');"));
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        GraphError::DuplicateProvide {
            namespace,
            existing,
            duplicate,
            ..
        } => {
            assert_eq!(namespace, "a.b");
            assert_eq!(existing, Path::new("/src/one.js"));
            assert_eq!(duplicate, Path::new("/src/two.js"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let owner = graph.resolve("a.b").map(|record| record.request.as_path());
    assert_eq!(owner, Some(Path::new("/src/one.js")));
    assert_eq!(graph.duplicate_provides().len(), 1);

    let diagnostics = graph.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::DuplicateProvide);
    assert_eq!(diagnostics[0].file.as_deref(), Some(Path::new("/src/two.js")));
    assert_eq!(diagnostics[0].line, 1);
}

#[test]
fn test_update_keeps_position_and_reindexes() {
    let mut graph = graph_of(&[
        ("/src/a.js", "goog.provide('a');"),
        ("/src/b.js", "goog.provide('b');"),
    ]);

    graph.add_or_update(parse_source("/src/a.js", "goog.provide('renamed');"));

    assert_eq!(graph.len(), 2);
    assert_eq!(graph.id_of(Path::new("/src/a.js")), Some(0));
    assert!(graph.resolve("a").is_none());
    assert!(graph.resolve("renamed").is_some());
}

#[test]
fn test_update_resolves_duplicate() {
    let mut graph = graph_of(&[
        ("/src/one.js", "goog.provide('x');"),
        ("/src/two.js", "goog.provide('x');"),
    ]);
    assert_eq!(graph.duplicate_provides().len(), 1);

    let errors = graph.add_or_update(parse_source("/src/two.js", "goog.provide('y');"));
    assert!(errors.is_empty());
    assert!(graph.duplicate_provides().is_empty());
}

#[test]
fn test_remove_drops_ownership() {
    let mut graph = graph_of(&[
        ("/src/a.js", "goog.provide('a');"),
        ("/src/b.js", "goog.provide('b');"),
    ]);

    let removed = graph.remove(Path::new("/src/a.js"));
    assert!(removed.is_some());
    assert!(graph.resolve("a").is_none());
    assert_eq!(graph.id_of(Path::new("/src/b.js")), Some(0));
    assert!(graph.remove(Path::new("/src/a.js")).is_none());
}

#[test]
fn test_implicit_ancestor_only_for_provide_requirers() {
    let graph = graph_of(&[
        ("/src/deep.js", "goog.provide('lib.deep.thing');"),
        ("/src/user.js", "goog.provide('user');\ngoog.require('lib.deep');"),
        ("/src/mod.js", "goog.module('mod');\ngoog.require('lib.deep');"),
    ]);

    let user = graph.get(Path::new("/src/user.js")).unwrap();
    assert_eq!(
        graph.resolve_require(user, "lib.deep"),
        Resolution::ImplicitAncestor(0)
    );

    let module = graph.get(Path::new("/src/mod.js")).unwrap();
    assert_eq!(graph.resolve_require(module, "lib.deep"), Resolution::Missing);

    let missing = graph.missing_dependencies();
    assert_eq!(missing.len(), 1);
    assert!(matches!(
        &missing[0],
        GraphError::MissingDependency { requirer, .. } if requirer == Path::new("/src/mod.js")
    ));
}

#[test]
fn test_self_reference() {
    let graph = graph_of(&[(
        "/src/a.js",
        "goog.provide('a.b');\ngoog.require('a.b');\ngoog.require('a');",
    )]);
    let record = graph.get(Path::new("/src/a.js")).unwrap();
    assert_eq!(graph.resolve_require(record, "a.b"), Resolution::SelfReference);
    // own implicit ancestor
    assert_eq!(graph.resolve_require(record, "a"), Resolution::SelfReference);
    assert!(graph.missing_dependencies().is_empty());
}

#[test]
fn test_type_only_requires_are_checked_for_missing() {
    let graph = graph_of(&[("/src/a.js", "goog.module('a');\ngoog.requireType('nowhere');")]);
    let missing = graph.missing_dependencies();
    assert_eq!(missing.len(), 1);

    let diagnostics = graph.diagnostics_for(Path::new("/src/a.js"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingDependency);
    assert_eq!(diagnostics[0].line, 2);
    assert_eq!(diagnostics[0].column, 0);
}

#[test]
fn test_diagnostics_for_filters_by_file() {
    let graph = graph_of(&[
        ("/src/a.js", "goog.require('missing.one');"),
        ("/src/b.js", "goog.require('missing.two');"),
    ]);
    assert_eq!(graph.diagnostics().len(), 2);
    let only_b = graph.diagnostics_for(Path::new("/src/b.js"));
    assert_eq!(only_b.len(), 1);
    assert!(only_b[0].message.contains("missing.two"));
}

#[test]
fn test_diagnostics_for_matches_whole_graph_view() {
    let graph = graph_of(&[
        ("/src/x.js", "goog.module('x');\nconst y = goog.require('y');"),
        (
            "/src/y.js",
            "goog.module('y');\nconst x = goog.require('x');\ngoog.require(name);\ngoog.require('gone');",
        ),
        ("/src/z.js", "goog.module('x');"),
    ]);
    let all = graph.diagnostics();
    assert!(all.iter().any(|diag| diag.kind == DiagnosticKind::Cycle));
    assert!(all.iter().any(|diag| diag.kind == DiagnosticKind::DuplicateProvide));

    for file in ["/src/x.js", "/src/y.js", "/src/z.js"] {
        let expected: Vec<_> = all
            .iter()
            .filter(|diag| diag.file.as_deref() == Some(Path::new(file)))
            .cloned()
            .collect();
        assert_eq!(graph.diagnostics_for(Path::new(file)), expected, "{file}");
    }
    assert!(graph.diagnostics_for(Path::new("/src/unknown.js")).is_empty());
}

#[test]
fn test_dependencies_skip_type_only_and_dedupe() {
    let graph = graph_of(&[
        ("/src/a.js", "goog.module('a');"),
        ("/src/b.js", "goog.module('b');"),
        (
            "/src/main.js",
            "goog.require('a');\nconst a = goog.require('a');\ngoog.requireType('b');",
        ),
    ]);
    let main = graph.get(Path::new("/src/main.js")).unwrap();
    let deps: Vec<_> = graph
        .dependencies(main)
        .iter()
        .map(|record| record.request.clone())
        .collect();
    assert_eq!(deps, vec![Path::new("/src/a.js").to_path_buf()]);
}
