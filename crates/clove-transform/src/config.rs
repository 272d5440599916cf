//! Transform configuration.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Module syntax emitted for imports and exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStyle {
    /// `import x from '...'` / `export default exports`
    #[default]
    Esm,
    /// `const x = require('...')` / `module.exports = exports`
    #[serde(alias = "cjs")]
    CommonJs,
}

/// Literal substituted for a `goog.define` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl DefineValue {
    /// JavaScript source text for the value.
    pub fn to_js_literal(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Number(value) if value.is_nan() => "NaN".to_string(),
            Self::Number(value) if value.is_infinite() => {
                let sign = if *value > 0.0 { "" } else { "-" };
                format!("{sign}Infinity")
            }
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            // JSON string syntax is valid JavaScript string syntax.
            Self::String(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
            }
        }
    }
}

impl From<bool> for DefineValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for DefineValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DefineValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Per-run transform settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub target_style: TargetStyle,
    /// Symbol-override table for `goog.define`, keyed by constant name.
    pub defines: IndexMap<String, DefineValue>,
    /// Where each source is written. Import specifiers are computed between
    /// these locations; sources not listed stay where they are.
    #[serde(skip)]
    pub output_paths: IndexMap<PathBuf, PathBuf>,
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_style(mut self, style: TargetStyle) -> Self {
        self.target_style = style;
        self
    }

    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<DefineValue>) -> Self {
        self.defines.insert(name.into(), value.into());
        self
    }

    pub fn with_output_paths(
        mut self,
        paths: impl IntoIterator<Item = (PathBuf, PathBuf)>,
    ) -> Self {
        self.output_paths.extend(paths);
        self
    }

    /// Output location of `source`.
    pub fn output_path<'p>(&'p self, source: &'p Path) -> &'p Path {
        self.output_paths
            .get(source)
            .map_or(source, PathBuf::as_path)
    }
}
