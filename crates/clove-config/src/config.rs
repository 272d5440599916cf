//! Configuration types.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use path_clean::PathClean;
use serde::{Deserialize, Serialize};

/// Module syntax written for converted files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStyle {
    #[default]
    Esm,
    #[serde(alias = "cjs")]
    CommonJs,
}

/// Override for a `goog.define` constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
    Bool(bool),
    Number(f64),
    String(String),
}

/// Resolved clove configuration.
///
/// Relative paths are resolved against the directory holding the config file
/// (or the working directory when there is none) by [`CloveConfig::resolve_paths`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloveConfig {
    /// Files or directories to scan.
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Glob patterns skipped while scanning.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Output directory for converted files.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default)]
    pub target_style: TargetStyle,

    /// `goog.define` overrides keyed by constant name.
    #[serde(default)]
    pub defines: IndexMap<String, DefineValue>,

    /// Where to write the dependency manifest, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    /// Directory manifest paths are relative to. Defaults to the directory
    /// the manifest is written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_base: Option<PathBuf>,

    /// Write `.map` files next to the outputs.
    #[serde(default)]
    pub sourcemap: bool,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for CloveConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            exclude: Vec::new(),
            out_dir: default_out_dir(),
            target_style: TargetStyle::default(),
            defines: IndexMap::new(),
            manifest: None,
            manifest_base: None,
            sourcemap: false,
        }
    }
}

impl CloveConfig {
    /// Make every configured path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for root in &mut self.roots {
            *root = absolutize(base, root);
        }
        self.out_dir = absolutize(base, &self.out_dir);
        if let Some(manifest) = &mut self.manifest {
            *manifest = absolutize(base, manifest);
        }
        if let Some(manifest_base) = &mut self.manifest_base {
            *manifest_base = absolutize(base, manifest_base);
        }
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        base.join(path).clean()
    }
}

/// Values given explicitly on the command line.
///
/// `None` fields are not serialized, so they never shadow lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<Vec<PathBuf>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_style: Option<TargetStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub defines: Option<IndexMap<String, DefineValue>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_base: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcemap: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CloveConfig::default();
        assert!(config.roots.is_empty());
        assert_eq!(config.out_dir, PathBuf::from("dist"));
        assert_eq!(config.target_style, TargetStyle::Esm);
        assert!(!config.sourcemap);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: CloveConfig = toml::from_str(
            r#"
roots = ["src"]
target_style = "cjs"

[defines]
"goog.DEBUG" = false
LEVEL = 3
NAME = "prod"
"#,
        )
        .unwrap();
        assert_eq!(config.roots, vec![PathBuf::from("src")]);
        assert_eq!(config.target_style, TargetStyle::CommonJs);
        assert_eq!(config.defines["goog.DEBUG"], DefineValue::Bool(false));
        assert_eq!(config.defines["LEVEL"], DefineValue::Number(3.0));
        assert_eq!(config.defines["NAME"], DefineValue::String("prod".into()));
        assert_eq!(config.out_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_empty_overrides_serialize_to_empty_map() {
        let value = serde_json::to_value(ConfigOverrides::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = CloveConfig {
            roots: vec![PathBuf::from("src"), PathBuf::from("/abs/lib")],
            manifest: Some(PathBuf::from("./out/../deps.js")),
            ..CloveConfig::default()
        };
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.roots,
            vec![PathBuf::from("/project/src"), PathBuf::from("/abs/lib")]
        );
        assert_eq!(config.out_dir, PathBuf::from("/project/dist"));
        assert_eq!(config.manifest, Some(PathBuf::from("/project/deps.js")));
        assert_eq!(config.manifest_base, None);
    }
}
