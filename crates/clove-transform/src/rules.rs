//! Rewrite rules turning declarations, requires and defines into edits.

use indexmap::IndexMap;
use tracing::trace;

use clove_graph::paths::import_specifier;
use clove_graph::record::namespace_ancestors;
use clove_graph::{
    DeclarationForm, ModuleGraph, ModuleKind, RecordId, Require, Resolution, SourceRecord,
    SourceSpan,
};

use crate::config::{TargetStyle, TransformConfig};
use crate::edits::{Edit, EditError, apply_edits};
use crate::naming::NameAllocator;

/// How a required file is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportShape {
    /// Default export of an encapsulated module.
    Default,
    /// ES module namespace object.
    Namespace,
    /// Global registration only; never bound.
    SideEffect,
}

#[derive(Debug)]
struct PlannedImport {
    specifier: String,
    shape: ImportShape,
    binding: Option<String>,
}

/// Collects the edits for one record.
pub(crate) struct Planner<'a> {
    record: &'a SourceRecord,
    graph: &'a ModuleGraph,
    config: &'a TransformConfig,
    names: NameAllocator<'a>,
    imports: IndexMap<RecordId, PlannedImport>,
    edits: Vec<Edit>,
}

impl<'a> Planner<'a> {
    pub(crate) fn new(
        record: &'a SourceRecord,
        graph: &'a ModuleGraph,
        config: &'a TransformConfig,
    ) -> Self {
        Self {
            record,
            graph,
            config,
            names: NameAllocator::new(&record.identifiers),
            imports: IndexMap::new(),
            edits: Vec::new(),
        }
    }

    pub(crate) fn plan(mut self) -> Result<Vec<Edit>, EditError> {
        let record = self.record;
        for require in &record.requires {
            self.plan_require(require);
        }
        self.plan_declarations();
        self.plan_defines()?;
        self.plan_imports();
        Ok(self.edits)
    }

    fn plan_require(&mut self, require: &Require) {
        if require.is_type_only() {
            self.drop_require(require, "null");
            return;
        }

        let graph = self.graph;
        match graph.resolve_require(self.record, &require.namespace) {
            Resolution::Missing => {
                trace!(namespace = require.namespace.as_str(), "leaving missing require untouched");
            }
            Resolution::SelfReference => {
                let value = self.self_value(&require.namespace);
                self.drop_require(require, &value);
            }
            Resolution::ImplicitAncestor(id) => self.plan_global_require(id, require),
            Resolution::Provided(id) => {
                let Some(target) = graph.record(id) else {
                    return;
                };
                match target.kind {
                    ModuleKind::ImplicitGlobal { .. } => self.plan_global_require(id, require),
                    ModuleKind::InteropNative => {
                        self.plan_module_require(id, target, ImportShape::Namespace, require)
                    }
                    ModuleKind::Encapsulated { .. } | ModuleKind::Script => {
                        self.plan_module_require(id, target, ImportShape::Default, require)
                    }
                }
            }
        }
    }

    /// Remove a require statement, or replace a value use with `value`.
    ///
    /// A bare require that cannot be removed, such as the body of an `if`,
    /// becomes `void 0` so the surrounding statement keeps its shape.
    fn drop_require(&mut self, require: &Require, value: &str) {
        let edit = match (require.used_as_value, require.statement) {
            (true, _) => Edit::replace(require.call_span, value),
            (false, Some(statement)) => Edit::delete(statement),
            (false, None) => Edit::replace(require.call_span, "void 0"),
        };
        self.edits.push(edit);
    }

    /// Require of a provide file: imported for its side effects, values read
    /// through the global namespace path.
    fn plan_global_require(&mut self, id: RecordId, require: &Require) {
        let graph = self.graph;
        let Some(target) = graph.record(id) else {
            return;
        };
        self.import_entry(id, target, ImportShape::SideEffect);
        let value = require.namespace.clone();
        self.drop_require(require, &value);
    }

    fn plan_module_require(
        &mut self,
        id: RecordId,
        target: &SourceRecord,
        shape: ImportShape,
        require: &Require,
    ) {
        self.import_entry(id, target, shape);
        if !require.used_as_value {
            self.drop_require(require, "");
            return;
        }

        let binding = match self.imports.get(&id).and_then(|entry| entry.binding.clone()) {
            Some(binding) => binding,
            None => {
                let namespace = target.primary_namespace().unwrap_or(&require.namespace);
                let binding = self.names.allocate(namespace);
                if let Some(entry) = self.imports.get_mut(&id) {
                    entry.binding = Some(binding.clone());
                }
                binding
            }
        };
        self.edits.push(Edit::replace(require.call_span, binding));
    }

    fn import_entry(&mut self, id: RecordId, target: &SourceRecord, shape: ImportShape) {
        let record = self.record;
        let config = self.config;
        self.imports.entry(id).or_insert_with(|| PlannedImport {
            specifier: import_specifier(
                config.output_path(&record.request),
                config.output_path(&target.request),
            ),
            shape,
            binding: None,
        });
    }

    /// Value of a require that points back at this file.
    fn self_value(&self, namespace: &str) -> String {
        match (self.record.export_binding(), self.record.primary_namespace()) {
            (Some(binding), Some(primary)) if primary == namespace => binding.to_string(),
            _ => namespace.to_string(),
        }
    }

    fn plan_declarations(&mut self) {
        let esm = self.config.target_style == TargetStyle::Esm;

        for declaration in &self.record.declarations {
            let replacement = match (declaration.form, declaration.namespace.as_deref()) {
                (DeclarationForm::Module, _) => {
                    let binding = self.record.export_binding().unwrap_or("exports");
                    if esm {
                        format!("let {binding} = {{}};")
                    } else {
                        format!("{binding} = {{}};")
                    }
                }
                (DeclarationForm::Provide, Some(namespace)) => ensure_namespace(namespace),
                _ => String::new(),
            };
            self.edits.push(Edit::replace(declaration.statement, replacement));
        }

        let ModuleKind::Encapsulated { export_binding, .. } = &self.record.kind else {
            return;
        };

        let mut tail = String::new();
        if !self.record.source.is_empty() && !self.record.source.ends_with('\n') {
            tail.push('\n');
        }
        if let Some(namespace) = self
            .record
            .primary_namespace()
            .filter(|_| self.record.legacy_namespace())
        {
            tail.push_str(&register_legacy_namespace(namespace, export_binding));
            tail.push('\n');
        }
        if esm {
            tail.push_str(&format!("export default {export_binding};\n"));
        } else {
            tail.push_str(&format!("module.exports = {export_binding};\n"));
        }
        self.edits.push(Edit::insert(self.record.source.len() as u32, tail));
    }

    /// Replace each define call by its override or default expression.
    ///
    /// Edits already planned inside a define call (a require in the default
    /// expression, or a nested define) are folded into the default text, or
    /// dropped when an override replaces it. Defines are visited innermost
    /// first so nested defines fold into their parents.
    fn plan_defines(&mut self) -> Result<(), EditError> {
        let record = self.record;
        for define in record.defines.iter().rev() {
            let call = define.call_span;
            let (inner, outer): (Vec<Edit>, Vec<Edit>) = std::mem::take(&mut self.edits)
                .into_iter()
                .partition(|edit| encloses(call, edit));
            self.edits = outer;

            let literal = match self.config.defines.get(&define.name) {
                Some(value) => value.to_js_literal(),
                None => match define.default_span {
                    Some(default) => default_text(&record.source, default, inner)?,
                    None => {
                        self.edits.extend(inner);
                        continue;
                    }
                },
            };
            self.edits.push(Edit::replace(call, literal));
        }
        Ok(())
    }

    fn plan_imports(&mut self) {
        if self.imports.is_empty() {
            return;
        }

        let esm = self.config.target_style == TargetStyle::Esm;
        let lines: Vec<String> = self
            .imports
            .values()
            .map(|import| import_line(import, esm))
            .collect();

        let anchor = self.record.import_anchor;
        let text = if anchor == 0 {
            lines.iter().map(|line| format!("{line}\n")).collect::<String>()
        } else {
            lines.iter().map(|line| format!("\n{line}")).collect::<String>()
        };
        self.edits.push(Edit::insert(anchor, text));
    }
}

/// Whether `edit` lies inside `span`. Insertions on either boundary belong
/// to the surrounding text.
fn encloses(span: SourceSpan, edit: &Edit) -> bool {
    if edit.is_insertion() {
        span.start < edit.start && edit.start < span.end
    } else {
        span.start <= edit.start && edit.end <= span.end
    }
}

/// Text of a define's default expression with the edits inside it applied.
fn default_text(source: &str, default: SourceSpan, edits: Vec<Edit>) -> Result<String, EditError> {
    let Some(text) = default.source_text(source) else {
        return Ok(String::new());
    };
    let shifted = edits
        .into_iter()
        .filter(|edit| encloses(default, edit))
        .map(|edit| Edit {
            start: edit.start - default.start,
            end: edit.end - default.start,
            replacement: edit.replacement,
        })
        .collect();
    Ok(apply_edits(text, shifted)?.code)
}

fn import_line(import: &PlannedImport, esm: bool) -> String {
    let specifier = quote(&import.specifier);
    match (&import.binding, import.shape, esm) {
        (Some(binding), ImportShape::Namespace, true) => {
            format!("import * as {binding} from {specifier};")
        }
        (Some(binding), _, true) => format!("import {binding} from {specifier};"),
        (None, _, true) => format!("import {specifier};"),
        (Some(binding), _, false) => format!("const {binding} = require({specifier});"),
        (None, _, false) => format!("require({specifier});"),
    }
}

/// `globalThis.a = globalThis.a || {};` for `a` and each deeper segment.
fn ensure_namespace(namespace: &str) -> String {
    namespace_ancestors(namespace)
        .chain(std::iter::once(namespace))
        .map(|path| format!("globalThis.{path} = globalThis.{path} || {{}};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ancestors ensured, then the export object assigned at `namespace`.
fn register_legacy_namespace(namespace: &str, binding: &str) -> String {
    let mut parts: Vec<String> = namespace_ancestors(namespace)
        .map(|path| format!("globalThis.{path} = globalThis.{path} || {{}};"))
        .collect();
    parts.push(format!("globalThis.{namespace} = {binding};"));
    parts.join(" ")
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
