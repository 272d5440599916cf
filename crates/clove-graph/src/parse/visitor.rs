//! Whole-tree walk collecting require, define and identifier information.

use oxc_allocator::Vec as ArenaVec;
use oxc_ast::ast::{
    AssignmentExpression, AssignmentTarget, BindingIdentifier, CallExpression, Expression,
    ExpressionStatement, FunctionBody, IdentifierReference, Statement, VariableDeclarator,
};
use oxc_ast_visit::{Visit, walk};
use oxc_span::GetSpan;
use rustc_hash::{FxHashMap, FxHashSet};

use super::Reporter;
use super::vocabulary::{Vocabulary, string_argument};
use crate::diagnostics::DiagnosticKind;
use crate::record::{DefineSite, Require};
use crate::span::SourceSpan;

/// Collects vocabulary calls anywhere in the tree.
///
/// Statement and binding context is decided through claim sets keyed by the
/// call's span: parents register the calls they directly own before the walk
/// reaches them. A bare require statement is only removable when it sits
/// directly in a statement list; `if (x) goog.require('a');` keeps a statement.
pub(super) struct CallCollector<'r, 's> {
    pub(super) reporter: &'r mut Reporter<'s>,
    /// Declaration calls already handled as top-level statements.
    pub(super) top_level_declarations: &'r FxHashSet<SourceSpan>,
    /// Name assignments to which are counted (the export binding). Only
    /// assignments outside any function body count.
    pub(super) export_binding: Option<&'r str>,
    pub(super) requires: Vec<Require>,
    pub(super) defines: Vec<DefineSite>,
    pub(super) identifiers: FxHashSet<String>,
    pub(super) export_assignments: Vec<SourceSpan>,
    /// Bare statement calls, with the statement when it can be removed.
    statement_calls: FxHashMap<SourceSpan, Option<SourceSpan>>,
    bound_calls: FxHashMap<SourceSpan, Option<String>>,
    list_statements: FxHashSet<SourceSpan>,
    function_depth: u32,
}

impl<'r, 's> CallCollector<'r, 's> {
    pub(super) fn new(
        reporter: &'r mut Reporter<'s>,
        top_level_declarations: &'r FxHashSet<SourceSpan>,
        export_binding: Option<&'r str>,
    ) -> Self {
        Self {
            reporter,
            top_level_declarations,
            export_binding,
            requires: Vec::new(),
            defines: Vec::new(),
            identifiers: FxHashSet::default(),
            export_assignments: Vec::new(),
            statement_calls: FxHashMap::default(),
            bound_calls: FxHashMap::default(),
            list_statements: FxHashSet::default(),
            function_depth: 0,
        }
    }

    fn record_call(&mut self, vocabulary: Vocabulary, call: &CallExpression<'_>) {
        let span = SourceSpan::from(call.span);

        if vocabulary.declaration_form().is_some() {
            if !self.top_level_declarations.contains(&span) {
                self.reporter.error(
                    DiagnosticKind::ParseError,
                    span,
                    format!("{}() must be a top-level statement", vocabulary.callee()),
                );
            }
            return;
        }

        if let Some(form) = vocabulary.require_form() {
            let Some(namespace) = string_argument(call, 0) else {
                self.reporter.error(
                    DiagnosticKind::ParseError,
                    span,
                    format!("{}() expects a string literal namespace", vocabulary.callee()),
                );
                return;
            };

            let (used_as_value, statement, local) =
                if let Some(statement) = self.statement_calls.get(&span) {
                    (false, *statement, None)
                } else if let Some(local) = self.bound_calls.get(&span) {
                    (true, None, local.clone())
                } else {
                    self.reporter.warning(
                        DiagnosticKind::AmbiguousRequire,
                        span,
                        format!(
                            "{}('{namespace}') is used inside an expression; treating it as a value",
                            vocabulary.callee()
                        ),
                    );
                    (true, None, None)
                };

            self.requires.push(Require {
                namespace,
                used_as_value,
                call_span: span,
                statement,
                local,
                form,
            });
            return;
        }

        // goog.define
        let Some(name) = string_argument(call, 0) else {
            self.reporter.error(
                DiagnosticKind::ParseError,
                span,
                "goog.define() expects a string literal name",
            );
            return;
        };
        self.defines.push(DefineSite {
            name,
            call_span: span,
            default_span: call.arguments.get(1).map(|arg| arg.span().into()),
        });
    }
}

impl<'a> Visit<'a> for CallCollector<'_, '_> {
    fn visit_statements(&mut self, it: &ArenaVec<'a, Statement<'a>>) {
        for statement in it {
            if let Statement::ExpressionStatement(expression) = statement {
                self.list_statements.insert(expression.span.into());
            }
        }
        walk::walk_statements(self, it);
    }

    fn visit_function_body(&mut self, it: &FunctionBody<'a>) {
        self.function_depth += 1;
        walk::walk_function_body(self, it);
        self.function_depth -= 1;
    }

    fn visit_expression_statement(&mut self, it: &ExpressionStatement<'a>) {
        if let Expression::CallExpression(call) = it.expression.without_parentheses() {
            let span = SourceSpan::from(it.span);
            let removable = self.list_statements.contains(&span).then_some(span);
            self.statement_calls.insert(call.span.into(), removable);
        }
        walk::walk_expression_statement(self, it);
    }

    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        if let Some(Expression::CallExpression(call)) =
            it.init.as_ref().map(|init| init.without_parentheses())
        {
            let local = it.id.get_identifier_name().map(|name| name.to_string());
            self.bound_calls.insert(call.span.into(), local);
        }
        walk::walk_variable_declarator(self, it);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if let Some(vocabulary) = Vocabulary::of_call(it) {
            self.record_call(vocabulary, it);
        }
        walk::walk_call_expression(self, it);
    }

    fn visit_assignment_expression(&mut self, it: &AssignmentExpression<'a>) {
        if let (Some(binding), AssignmentTarget::AssignmentTargetIdentifier(target)) =
            (self.export_binding, &it.left)
        {
            if self.function_depth == 0 && target.name.as_str() == binding {
                self.export_assignments.push(it.span.into());
            }
        }
        walk::walk_assignment_expression(self, it);
    }

    fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
        self.identifiers.insert(it.name.to_string());
    }

    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        self.identifiers.insert(it.name.to_string());
    }
}
