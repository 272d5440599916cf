//! Legacy flat dependency manifest (`deps.js`) emission.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::ModuleGraph;
use crate::paths::{relative_path, to_slash};
use crate::record::{ModuleKind, SourceRecord};

/// Render one `goog.addDependency` line per record in topological order.
///
/// Paths are relative to `base`. Type-only requires are not listed.
pub fn render_manifest(graph: &ModuleGraph, base: &Path) -> Result<String> {
    let order = graph.compute_order()?;
    let mut out = String::new();
    for record in order {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", dependency_line(record, base));
    }
    Ok(out)
}

/// Render the manifest and write it to `path`.
pub fn write_manifest(graph: &ModuleGraph, base: &Path, path: &Path) -> Result<()> {
    let manifest = render_manifest(graph, base)?;
    std::fs::write(path, manifest).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn dependency_line(record: &SourceRecord, base: &Path) -> String {
    let path = to_slash(&relative_path(base, &record.request));

    let mut requires: Vec<&str> = Vec::new();
    for require in record.ordering_requires() {
        if !requires.contains(&require.namespace.as_str()) {
            requires.push(&require.namespace);
        }
    }

    let flags = match record.kind {
        ModuleKind::Encapsulated { .. } => "{'module': 'goog'}",
        ModuleKind::InteropNative => "{'lang': 'es6', 'module': 'es6'}",
        ModuleKind::ImplicitGlobal { .. } | ModuleKind::Script => "{}",
    };

    format!(
        "goog.addDependency({}, {}, {}, {flags});",
        quote(&path),
        list(record.provides.iter().map(String::as_str)),
        list(requires.into_iter()),
    )
}

fn list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<String> = items.map(quote).collect();
    format!("[{}]", items.join(", "))
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a'b\\c"), "'a\\'b\\\\c'");
    }
}
