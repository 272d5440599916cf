//! Pluggable config validation.
//!
//! Schema checks run anywhere; filesystem checks are for the CLI.

use std::path::{Path, PathBuf};

use crate::config::CloveConfig;
use crate::error::{ConfigError, Result};

pub trait ConfigValidator {
    fn validate(&self, config: &CloveConfig) -> Result<()>;
}

/// Structural validation without touching the filesystem.
///
/// ```
/// use clove_config::{CloveConfig, ConfigValidator, SchemaValidator};
///
/// let mut config = CloveConfig::default();
/// config.roots = vec!["src".into()];
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &CloveConfig) -> Result<()> {
        if config.roots.is_empty() {
            return Err(ConfigError::NoRoots);
        }

        for pattern in &config.exclude {
            if pattern.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "exclude patterns cannot be empty".to_string(),
                    hint: Some("Remove empty strings from the 'exclude' array".to_string()),
                });
            }
        }

        for name in config.defines.keys() {
            if !is_define_name(name) {
                return Err(ConfigError::SchemaValidation {
                    message: format!("'{name}' is not a valid define name"),
                    hint: Some(
                        "Define names are dotted identifiers such as goog.DEBUG".to_string(),
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Schema validation plus existence checks for the source roots.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &CloveConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for root in &config.roots {
            let path = self.root.join(root);
            if !path.exists() {
                return Err(ConfigError::RootNotFound { path });
            }
        }

        Ok(())
    }
}

fn is_define_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefineValue;

    fn with_roots() -> CloveConfig {
        CloveConfig {
            roots: vec![PathBuf::from("src")],
            ..CloveConfig::default()
        }
    }

    #[test]
    fn schema_validator_rejects_empty_roots() {
        let result = SchemaValidator.validate(&CloveConfig::default());
        assert!(matches!(result, Err(ConfigError::NoRoots)));
    }

    #[test]
    fn schema_validator_accepts_valid_config() {
        let mut config = with_roots();
        config.exclude = vec!["**/*_test.js".to_string()];
        config
            .defines
            .insert("goog.DEBUG".to_string(), DefineValue::Bool(false));
        assert!(SchemaValidator.validate(&config).is_ok());
    }

    #[test]
    fn schema_validator_rejects_empty_exclude() {
        let mut config = with_roots();
        config.exclude = vec!["  ".to_string()];
        assert!(matches!(
            SchemaValidator.validate(&config),
            Err(ConfigError::SchemaValidation { .. })
        ));
    }

    #[test]
    fn schema_validator_rejects_bad_define_names() {
        for name in ["", "1abc", "a..b", "a-b", "a."] {
            let mut config = with_roots();
            config
                .defines
                .insert(name.to_string(), DefineValue::Number(1.0));
            assert!(
                SchemaValidator.validate(&config).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn fs_validator_checks_roots_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let validator = FsValidator::new(dir.path());
        assert!(validator.validate(&with_roots()).is_ok());

        let mut config = with_roots();
        config.roots.push(PathBuf::from("missing"));
        assert!(matches!(
            validator.validate(&config),
            Err(ConfigError::RootNotFound { path }) if path == dir.path().join("missing")
        ));
    }
}
