//! Source Record construction.
//!
//! Parsing runs in two passes over the OXC tree:
//!
//! 1. an explicit loop over the top-level statements fixes the module kind and
//!    collects the declaration statements;
//! 2. a [`Visit`](oxc_ast_visit::Visit) walk over the whole tree collects
//!    requires, defines and identifiers.
//!
//! Problems never abort parsing: they are attached to the record as
//! diagnostics and the record is marked [`RecordState::Error`].

mod visitor;
mod vocabulary;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Program, Statement};
use oxc_ast_visit::Visit;
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;
use rustc_hash::FxHashSet;
use tracing::debug;

use self::visitor::CallCollector;
use self::vocabulary::{Vocabulary, string_argument};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::record::{
    DEFAULT_EXPORT_BINDING, Declaration, DeclarationForm, ModuleKind, RecordState, SourceRecord,
    namespace_ancestors,
};
use crate::span::{LineIndex, SourceSpan};

/// Parse `source` into a [`SourceRecord`] for `request`.
///
/// # Example
///
/// ```rust
/// use clove_graph::{ModuleKind, parse_source};
///
/// let record = parse_source("/src/a.js", "goog.module('a');\nexports.x = 1;\n");
/// assert!(matches!(record.kind, ModuleKind::Encapsulated { .. }));
/// assert_eq!(record.provides, vec!["a".to_string()]);
/// ```
pub fn parse_source(request: impl Into<PathBuf>, source: impl Into<Arc<str>>) -> SourceRecord {
    let mut record = SourceRecord::new(request, source);
    let source = Arc::clone(&record.source);
    let mut reporter = Reporter::new(&record.request, &source);

    let allocator = Allocator::default();
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(&allocator, &source, source_type_for(&record.request)).parse();

    for error in &errors {
        let offset = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map_or(0, |label| label.offset() as u32);
        reporter.error(
            DiagnosticKind::ParseError,
            SourceSpan::new(offset, offset),
            error.to_string(),
        );
    }

    if panicked {
        record.state = RecordState::Error;
        record.diagnostics = reporter.finish();
        debug!(path = %record.request.display(), "parser gave up on source");
        return record;
    }

    let top_level = classify(&program, &mut reporter);

    let export_binding = match &top_level.kind {
        ModuleKind::Encapsulated { export_binding, .. } => Some(export_binding.as_str()),
        _ => None,
    };
    let mut collector =
        CallCollector::new(&mut reporter, &top_level.claimed, export_binding);
    collector.visit_program(&program);

    let CallCollector {
        requires,
        defines,
        identifiers,
        export_assignments,
        ..
    } = collector;

    if let (Some(binding), Some(second)) = (export_binding, export_assignments.get(1)) {
        reporter.error(
            DiagnosticKind::ParseError,
            *second,
            format!("export binding '{binding}' is assigned more than once"),
        );
    }

    record.import_anchor = import_anchor(&program);
    record.kind = top_level.kind;
    record.provides = top_level.provides;
    record.declarations = top_level.declarations;
    record.requires = requires;
    record.defines = defines;
    record.identifiers = identifiers;
    record.diagnostics = reporter.finish();
    record.state = if record.diagnostics.iter().any(Diagnostic::is_error) {
        RecordState::Error
    } else {
        RecordState::Parsed
    };

    debug!(
        path = %record.request.display(),
        kind = record.kind.name(),
        provides = record.provides.len(),
        requires = record.requires.len(),
        "parsed source record"
    );

    record
}

/// `.mjs` parses as a module, TypeScript extensions as TypeScript and
/// everything else is left for the parser to decide.
pub fn source_type_for(path: &Path) -> SourceType {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("mjs") => SourceType::mjs(),
        Some("ts" | "mts" | "cts" | "tsx") => {
            SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts())
        }
        _ => SourceType::unambiguous(),
    }
}

/// Diagnostic sink bound to one file.
pub(crate) struct Reporter<'s> {
    path: &'s Path,
    source: &'s str,
    lines: LineIndex,
    diagnostics: Vec<Diagnostic>,
}

impl<'s> Reporter<'s> {
    fn new(path: &'s Path, source: &'s str) -> Self {
        Self {
            path,
            source,
            lines: LineIndex::new(source),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn error(
        &mut self,
        kind: DiagnosticKind,
        span: SourceSpan,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::error(kind, message);
        self.push(diagnostic, span);
    }

    pub(crate) fn warning(
        &mut self,
        kind: DiagnosticKind,
        span: SourceSpan,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic::warning(kind, message);
        self.push(diagnostic, span);
    }

    fn push(&mut self, diagnostic: Diagnostic, span: SourceSpan) {
        let diagnostic = diagnostic.at_indexed(self.path, span, self.source, &self.lines);
        self.diagnostics.push(diagnostic);
    }

    fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Result of the top-level statement scan.
struct TopLevel {
    kind: ModuleKind,
    provides: Vec<String>,
    declarations: Vec<Declaration>,
    /// Call spans of every top-level declaration statement.
    claimed: FxHashSet<SourceSpan>,
}

fn classify(program: &Program<'_>, reporter: &mut Reporter<'_>) -> TopLevel {
    let mut first: Option<DeclarationForm> = None;
    let mut provides: Vec<String> = Vec::new();
    let mut declarations = Vec::new();
    let mut claimed = FxHashSet::default();
    let mut legacy_namespace = false;
    let mut seen_import = false;
    let mut seen_other = false;

    for statement in &program.body {
        let call = match statement {
            Statement::ImportDeclaration(_) => {
                seen_import = true;
                continue;
            }
            Statement::ExpressionStatement(stmt) => match stmt.expression.without_parentheses() {
                Expression::CallExpression(call) => Vocabulary::of_call(call)
                    .and_then(|v| v.declaration_form().map(|form| (call, form, stmt.span))),
                _ => None,
            },
            _ => None,
        };

        let Some((call, form, statement_span)) = call else {
            seen_other = true;
            continue;
        };
        let call_span = SourceSpan::from(call.span);
        let statement_span = SourceSpan::from(statement_span);
        claimed.insert(call_span);

        if form == DeclarationForm::DeclareLegacyNamespace {
            match first {
                Some(DeclarationForm::Module) if !legacy_namespace => {
                    legacy_namespace = true;
                    declarations.push(Declaration {
                        form,
                        namespace: None,
                        statement: statement_span,
                    });
                }
                Some(DeclarationForm::Module) => reporter.error(
                    DiagnosticKind::ParseError,
                    call_span,
                    "goog.module.declareLegacyNamespace() is called more than once",
                ),
                _ => reporter.error(
                    DiagnosticKind::ParseError,
                    call_span,
                    "goog.module.declareLegacyNamespace() is only valid in a goog.module file",
                ),
            }
            seen_other = true;
            continue;
        }

        let callee = Vocabulary::of_call(call).map_or("declaration", Vocabulary::callee);
        let Some(namespace) = string_argument(call, 0) else {
            reporter.error(
                DiagnosticKind::ParseError,
                call_span,
                format!("{callee}() expects a string literal namespace"),
            );
            seen_other = true;
            continue;
        };

        match first {
            None => {
                if seen_other || (seen_import && form != DeclarationForm::DeclareModuleId) {
                    reporter.error(
                        DiagnosticKind::ParseError,
                        call_span,
                        format!("{callee}() must be the first statement in the file"),
                    );
                }
                first = Some(form);
                provides.push(namespace.clone());
                declarations.push(Declaration {
                    form,
                    namespace: Some(namespace),
                    statement: statement_span,
                });
            }
            Some(DeclarationForm::Provide) if form == DeclarationForm::Provide => {
                if !provides.contains(&namespace) {
                    provides.push(namespace.clone());
                }
                declarations.push(Declaration {
                    form,
                    namespace: Some(namespace),
                    statement: statement_span,
                });
            }
            Some(_) => reporter.error(
                DiagnosticKind::ParseError,
                call_span,
                format!("multiple declarations: {callee}('{namespace}') in a file already declaring a namespace"),
            ),
        }
        seen_other = true;
    }

    let kind = match first {
        None => ModuleKind::Script,
        Some(DeclarationForm::Provide) => ModuleKind::ImplicitGlobal {
            implicit_provides: implicit_provides(&provides),
        },
        Some(DeclarationForm::Module) => ModuleKind::Encapsulated {
            export_binding: DEFAULT_EXPORT_BINDING.to_string(),
            legacy_namespace,
        },
        Some(DeclarationForm::DeclareModuleId) => ModuleKind::InteropNative,
        Some(DeclarationForm::DeclareLegacyNamespace) => ModuleKind::Script,
    };

    TopLevel {
        kind,
        provides,
        declarations,
        claimed,
    }
}

/// Ancestor namespaces of `provides` that are not themselves provided.
fn implicit_provides(provides: &[String]) -> Vec<String> {
    let mut implicit: Vec<String> = Vec::new();
    for namespace in provides {
        for ancestor in namespace_ancestors(namespace) {
            if !provides.iter().any(|p| p == ancestor) && !implicit.iter().any(|i| i == ancestor) {
                implicit.push(ancestor.to_string());
            }
        }
    }
    implicit
}

/// Offset after the hashbang, the directive prologue and leading imports.
fn import_anchor(program: &Program<'_>) -> u32 {
    let mut anchor = program.hashbang.as_ref().map_or(0, |hashbang| hashbang.span.end);
    if let Some(directive) = program.directives.last() {
        anchor = anchor.max(directive.span.end);
    }
    for statement in &program.body {
        match statement {
            Statement::ImportDeclaration(import) => anchor = anchor.max(import.span.end),
            _ => break,
        }
    }
    anchor
}
