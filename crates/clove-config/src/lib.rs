//! Configuration for clove.
//!
//! Settings are discovered from `clove.toml` or the `"clove"` field of
//! `package.json`, then layered with [`figment`]:
//! defaults → config file → `CLOVE_*` environment → explicit overrides.

pub mod config;
pub mod discovery;
pub mod error;
pub mod loading;
pub mod validation;

pub use config::{CloveConfig, ConfigOverrides, DefineValue, TargetStyle};
pub use discovery::{ConfigDiscovery, ConfigSource};
pub use error::{ConfigError, Result};
pub use loading::ConfigLoader;
pub use validation::{ConfigValidator, FsValidator, SchemaValidator};
