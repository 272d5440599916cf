//! Parsed representation of one source file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::span::SourceSpan;

/// Default export binding of an encapsulated module.
pub const DEFAULT_EXPORT_BINDING: &str = "exports";

/// Module kind, fixed by the first top-level declaration statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleKind {
    /// No declaration: a plain script.
    Script,
    /// `goog.provide` file registering namespaces on the global object.
    ImplicitGlobal {
        /// Strict prefixes of the explicit provides that the file does not
        /// provide itself, in first-seen order.
        implicit_provides: Vec<String>,
    },
    /// `goog.module` file with its own export object.
    Encapsulated {
        export_binding: String,
        legacy_namespace: bool,
    },
    /// ES module tagged with `goog.declareModuleId`.
    InteropNative,
}

impl ModuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::ImplicitGlobal { .. } => "provide",
            Self::Encapsulated { .. } => "goog.module",
            Self::InteropNative => "es6",
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script)
    }

    pub fn is_implicit_global(&self) -> bool {
        matches!(self, Self::ImplicitGlobal { .. })
    }

    pub fn implicit_provides(&self) -> &[String] {
        match self {
            Self::ImplicitGlobal { implicit_provides } => implicit_provides,
            _ => &[],
        }
    }
}

/// Require call flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequireForm {
    /// `goog.require`: ordering edge and import.
    Require,
    /// `goog.requireType`: dependency for checking only.
    RequireType,
}

/// One `goog.require` / `goog.requireType` call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    pub namespace: String,
    pub used_as_value: bool,
    /// Range of the call expression.
    pub call_span: SourceSpan,
    /// Enclosing expression statement when the call is a bare statement
    /// directly inside a statement list, so the statement can be removed.
    pub statement: Option<SourceSpan>,
    /// Bound identifier for `const x = goog.require(...)`.
    pub local: Option<String>,
    pub form: RequireForm,
}

impl Require {
    pub fn is_type_only(&self) -> bool {
        self.form == RequireForm::RequireType
    }
}

/// Declaration call flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationForm {
    Provide,
    Module,
    DeclareModuleId,
    DeclareLegacyNamespace,
}

/// A top-level declaration statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub form: DeclarationForm,
    /// Declared namespace (`None` for `declareLegacyNamespace`).
    pub namespace: Option<String>,
    pub statement: SourceSpan,
}

/// A `goog.define('NAME', default)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineSite {
    pub name: String,
    pub call_span: SourceSpan,
    pub default_span: Option<SourceSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    Unparsed,
    Parsed,
    Error,
}

/// Immutable parsed view of a single file.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// Canonical absolute path, unique within a graph.
    pub request: PathBuf,
    pub kind: ModuleKind,
    /// Explicitly provided namespaces, ordered and de-duplicated.
    pub provides: Vec<String>,
    pub requires: Vec<Require>,
    pub state: RecordState,
    pub source: Arc<str>,
    /// seahash of `source`
    pub fingerprint: u64,
    pub declarations: Vec<Declaration>,
    pub defines: Vec<DefineSite>,
    /// Every binding and reference name in the file.
    pub identifiers: FxHashSet<String>,
    /// Offset where generated imports go.
    pub import_anchor: u32,
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceRecord {
    /// An unparsed record for `request`.
    pub fn new(request: impl Into<PathBuf>, source: impl Into<Arc<str>>) -> Self {
        let source = source.into();
        Self {
            request: request.into(),
            kind: ModuleKind::Script,
            provides: Vec::new(),
            requires: Vec::new(),
            state: RecordState::Unparsed,
            fingerprint: fingerprint(&source),
            source,
            declarations: Vec::new(),
            defines: Vec::new(),
            identifiers: FxHashSet::default(),
            import_anchor: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.request
    }

    pub fn is_parsed(&self) -> bool {
        self.state == RecordState::Parsed
    }

    /// Export binding name for encapsulated modules.
    pub fn export_binding(&self) -> Option<&str> {
        match &self.kind {
            ModuleKind::Encapsulated { export_binding, .. } => Some(export_binding),
            _ => None,
        }
    }

    pub fn legacy_namespace(&self) -> bool {
        matches!(
            self.kind,
            ModuleKind::Encapsulated {
                legacy_namespace: true,
                ..
            }
        )
    }

    /// The first explicit provide, used as the module's own namespace.
    pub fn primary_namespace(&self) -> Option<&str> {
        self.provides.first().map(String::as_str)
    }

    pub fn provides_namespace(&self, namespace: &str) -> bool {
        self.provides.iter().any(|p| p == namespace)
    }

    /// Requires that create ordering edges.
    pub fn ordering_requires(&self) -> impl Iterator<Item = &Require> {
        self.requires.iter().filter(|r| !r.is_type_only())
    }
}

/// Content hash used to detect unchanged files.
pub fn fingerprint(source: &str) -> u64 {
    seahash::hash(source.as_bytes())
}

/// Strict dotted prefixes of `namespace`, shortest first.
///
/// `a.b.c` yields `a`, `a.b`.
pub fn namespace_ancestors(namespace: &str) -> impl Iterator<Item = &str> {
    namespace
        .match_indices('.')
        .map(move |(idx, _)| &namespace[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_ancestors() {
        let ancestors: Vec<_> = namespace_ancestors("a.b.c").collect();
        assert_eq!(ancestors, vec!["a", "a.b"]);
        assert_eq!(namespace_ancestors("a").count(), 0);
    }

    #[test]
    fn test_new_record_is_unparsed_script() {
        let record = SourceRecord::new("/src/a.js", "foo();");
        assert_eq!(record.state, RecordState::Unparsed);
        assert!(record.kind.is_script());
        assert_eq!(record.fingerprint, fingerprint("foo();"));
    }

    #[test]
    fn test_module_kind_serializes_tagged() {
        let kind = ModuleKind::Encapsulated {
            export_binding: DEFAULT_EXPORT_BINDING.to_string(),
            legacy_namespace: true,
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["kind"], "encapsulated");
        assert_eq!(json["legacy_namespace"], true);
    }
}
