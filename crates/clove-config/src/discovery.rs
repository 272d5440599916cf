//! Locating a clove configuration on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Where a configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// A `clove.toml` file.
    Toml(PathBuf),
    /// The `"clove"` field of a `package.json`, already extracted.
    PackageJson { path: PathBuf, value: Value },
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Toml(path) | Self::PackageJson { path, .. } => path,
        }
    }

    /// Directory relative config paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path().parent().unwrap_or(Path::new("."))
    }
}

/// Searches a directory for configuration.
///
/// # Example
///
/// ```no_run
/// use clove_config::ConfigDiscovery;
///
/// let source = ConfigDiscovery::new(".").find().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Search order:
    /// 1. `clove.toml`
    /// 2. `package.json` with a non-null `"clove"` field
    ///
    /// A `package.json` that cannot be read or parsed is treated as absent.
    pub fn find(&self) -> Result<Option<ConfigSource>> {
        let toml_path = self.root.join("clove.toml");
        if toml_path.is_file() {
            return Ok(Some(ConfigSource::Toml(toml_path)));
        }

        let pkg_path = self.root.join("package.json");
        if !pkg_path.is_file() {
            return Ok(None);
        }
        let Ok(content) = fs::read_to_string(&pkg_path) else {
            return Ok(None);
        };
        let Ok(mut parsed) = serde_json::from_str::<Value>(&content) else {
            return Ok(None);
        };
        match parsed.get_mut("clove").map(Value::take) {
            Some(value) if value.is_object() => Ok(Some(ConfigSource::PackageJson {
                path: pkg_path,
                value,
            })),
            Some(Value::Null) | None => Ok(None),
            Some(_) => Err(ConfigError::InvalidValue {
                field: "clove".to_string(),
                hint: Some("The 'clove' field in package.json must be an object".to_string()),
            }),
        }
    }

    /// Like [`find`](Self::find) but fails with [`ConfigError::NotFound`].
    pub fn require(&self) -> Result<ConfigSource> {
        self.find()?.ok_or_else(|| ConfigError::NotFound {
            dir: self.root.clone(),
        })
    }

    /// Load an explicitly named file, picking the format by name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ConfigSource> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                dir: path.to_path_buf(),
            });
        }
        if path.file_name() != Some(std::ffi::OsStr::new("package.json")) {
            return Ok(ConfigSource::Toml(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: "package.json".to_string(),
            hint: Some(format!("Invalid JSON: {e}")),
        })?;
        match parsed.get("clove") {
            Some(value) if value.is_object() => Ok(ConfigSource::PackageJson {
                path: path.to_path_buf(),
                value: value.clone(),
            }),
            _ => Err(ConfigError::InvalidValue {
                field: "clove".to_string(),
                hint: Some("Add a 'clove' object to your package.json".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().unwrap().is_none());
    }

    #[test]
    fn find_prefers_toml_over_package_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("clove.toml"), "roots = [\"src\"]\n").unwrap();
        fs::write(dir.path().join("package.json"), r#"{"clove": {"roots": ["lib"]}}"#).unwrap();

        let source = ConfigDiscovery::new(dir.path()).find().unwrap().unwrap();
        assert_eq!(source, ConfigSource::Toml(dir.path().join("clove.toml")));
        assert_eq!(source.base_dir(), dir.path());
    }

    #[test]
    fn find_ignores_package_json_without_field() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "app", "clove": null}"#).unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().unwrap().is_none());
    }

    #[test]
    fn find_rejects_non_object_field() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"clove": "src"}"#).unwrap();
        let err = ConfigDiscovery::new(dir.path()).find().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "clove"));
    }

    #[test]
    fn require_reports_directory() {
        let dir = TempDir::new().unwrap();
        let err = ConfigDiscovery::new(dir.path()).require().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { dir: d } if d == dir.path()));
    }
}
