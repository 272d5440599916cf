//! Layered loading: defaults → config file → environment → overrides.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use tracing::debug;

use crate::config::{CloveConfig, ConfigOverrides};
use crate::discovery::{ConfigDiscovery, ConfigSource};
use crate::error::{ConfigError, Result};

const DEFAULT_ENV_PREFIX: &str = "CLOVE_";

/// Builds a [`CloveConfig`] from every layer.
///
/// # Example
///
/// ```no_run
/// use clove_config::{ConfigLoader, ConfigOverrides};
///
/// let config = ConfigLoader::new(".").load(&ConfigOverrides::default()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Discover configuration in `root`; relative paths without a config file
    /// resolve against `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config_file: None,
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    /// Use this file instead of discovering one.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Read variables with a different prefix, or none at all.
    pub fn with_env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }

    /// The config source that [`load`](Self::load) would use.
    pub fn source(&self) -> Result<Option<ConfigSource>> {
        match &self.config_file {
            Some(path) => ConfigDiscovery::from_file(self.root.join(path)).map(Some),
            None => ConfigDiscovery::new(&self.root).find(),
        }
    }

    /// Merge every layer and resolve relative paths.
    ///
    /// Paths from the file and environment resolve against the config file's
    /// directory; override paths are expected to be absolute or relative to `root`.
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<CloveConfig> {
        let source = self.source()?;
        let mut figment = Figment::new().merge(Serialized::defaults(CloveConfig::default()));

        match &source {
            Some(ConfigSource::Toml(path)) => {
                figment = figment.merge(Toml::file(path));
            }
            Some(ConfigSource::PackageJson { value, .. }) => {
                figment = figment.merge(Serialized::defaults(value.clone()));
            }
            None => {}
        }

        if let Some(prefix) = &self.env_prefix {
            figment = figment.merge(Env::prefixed(prefix));
        }

        let base = source
            .as_ref()
            .map(|source| source.base_dir().to_path_buf())
            .unwrap_or_else(|| self.root.clone());

        let mut config: CloveConfig =
            figment
                .extract()
                .map_err(|e| ConfigError::InvalidValue {
                    field: e
                        .path
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "configuration".to_string()),
                    hint: Some(e.to_string()),
                })?;
        config.resolve_paths(&base);

        let mut overridden: CloveConfig = Figment::new()
            .merge(Serialized::defaults(&config))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|e| ConfigError::InvalidValue {
                field: "overrides".to_string(),
                hint: Some(e.to_string()),
            })?;
        overridden.resolve_paths(&self.root);

        debug!(
            source = ?source.as_ref().map(ConfigSource::path),
            roots = overridden.roots.len(),
            "loaded configuration"
        );
        Ok(overridden)
    }
}
