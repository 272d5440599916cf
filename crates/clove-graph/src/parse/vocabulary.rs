//! Recognition of the `goog.*` call vocabulary.

use oxc_ast::ast::{Argument, CallExpression, Expression};

use crate::record::{DeclarationForm, RequireForm};

/// A recognised `goog.*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Vocabulary {
    Provide,
    Module,
    DeclareLegacyNamespace,
    DeclareModuleId,
    Require,
    RequireType,
    Define,
}

impl Vocabulary {
    /// Classify a call by its callee, ignoring parentheses.
    pub(crate) fn of_call(call: &CallExpression<'_>) -> Option<Self> {
        let Expression::StaticMemberExpression(member) = call.callee.without_parentheses() else {
            return None;
        };
        let property = member.property.name.as_str();

        match member.object.without_parentheses() {
            Expression::Identifier(object) if object.name.as_str() == "goog" => match property {
                "provide" => Some(Self::Provide),
                "module" => Some(Self::Module),
                "declareModuleId" => Some(Self::DeclareModuleId),
                "require" => Some(Self::Require),
                "requireType" => Some(Self::RequireType),
                "define" => Some(Self::Define),
                _ => None,
            },
            Expression::StaticMemberExpression(inner)
                if property == "declareLegacyNamespace"
                    && inner.property.name.as_str() == "module"
                    && is_goog(&inner.object) =>
            {
                Some(Self::DeclareLegacyNamespace)
            }
            _ => None,
        }
    }

    pub(crate) fn declaration_form(self) -> Option<DeclarationForm> {
        match self {
            Self::Provide => Some(DeclarationForm::Provide),
            Self::Module => Some(DeclarationForm::Module),
            Self::DeclareModuleId => Some(DeclarationForm::DeclareModuleId),
            Self::DeclareLegacyNamespace => Some(DeclarationForm::DeclareLegacyNamespace),
            _ => None,
        }
    }

    pub(crate) fn require_form(self) -> Option<RequireForm> {
        match self {
            Self::Require => Some(RequireForm::Require),
            Self::RequireType => Some(RequireForm::RequireType),
            _ => None,
        }
    }

    pub(crate) fn callee(self) -> &'static str {
        match self {
            Self::Provide => "goog.provide",
            Self::Module => "goog.module",
            Self::DeclareLegacyNamespace => "goog.module.declareLegacyNamespace",
            Self::DeclareModuleId => "goog.declareModuleId",
            Self::Require => "goog.require",
            Self::RequireType => "goog.requireType",
            Self::Define => "goog.define",
        }
    }
}

fn is_goog(expr: &Expression<'_>) -> bool {
    matches!(expr.without_parentheses(), Expression::Identifier(id) if id.name.as_str() == "goog")
}

/// The string literal at argument position `index`, if it is one.
pub(crate) fn string_argument(call: &CallExpression<'_>, index: usize) -> Option<String> {
    match call.arguments.get(index)? {
        Argument::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}
