//! Conversions between CLI arguments, `clove-config` and the transform.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use clove_config::{
    CloveConfig, ConfigLoader, ConfigOverrides, ConfigValidator, DefineValue, FsValidator,
    TargetStyle,
};
use clove_transform::TransformConfig;

use crate::cli::{BuildArgs, SourceArgs, Style};
use crate::error::{CliError, Result, ResultExt};

impl From<Style> for TargetStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Esm => TargetStyle::Esm,
            Style::Cjs => TargetStyle::CommonJs,
        }
    }
}

/// Transform settings for a loaded configuration.
pub fn transform_config(config: &CloveConfig) -> TransformConfig {
    let style = match config.target_style {
        TargetStyle::Esm => clove_transform::TargetStyle::Esm,
        TargetStyle::CommonJs => clove_transform::TargetStyle::CommonJs,
    };
    config
        .defines
        .iter()
        .fold(
            TransformConfig::new().with_target_style(style),
            |transform, (name, value)| transform.with_define(name.clone(), define_value(value)),
        )
}

fn define_value(value: &DefineValue) -> clove_transform::DefineValue {
    match value {
        DefineValue::Bool(value) => clove_transform::DefineValue::Bool(*value),
        DefineValue::Number(value) => clove_transform::DefineValue::Number(*value),
        DefineValue::String(value) => clove_transform::DefineValue::String(value.clone()),
    }
}

/// Parse `NAME=VALUE`. `true`/`false` and numbers keep their type; anything
/// else is a string. A bare `NAME` means `true`.
pub fn parse_define(raw: &str) -> Result<(String, DefineValue)> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (raw.trim(), "true"),
    };
    if name.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "--define expects NAME=VALUE, got '{raw}'"
        )));
    }

    let value = match value {
        "true" => DefineValue::Bool(true),
        "false" => DefineValue::Bool(false),
        other => match other.parse::<f64>() {
            Ok(number) if !other.is_empty() => DefineValue::Number(number),
            _ => DefineValue::String(unquote(other).to_string()),
        },
    };
    Ok((name.to_string(), value))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Working directory for a command, absolute.
pub fn working_dir(args: &SourceArgs) -> Result<PathBuf> {
    let cwd = std::env::current_dir().with_path(".")?;
    Ok(match &args.cwd {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Overrides shared by every command.
pub fn source_overrides(args: &SourceArgs) -> ConfigOverrides {
    ConfigOverrides {
        roots: (!args.roots.is_empty()).then(|| args.roots.clone()),
        exclude: (!args.exclude.is_empty()).then(|| args.exclude.clone()),
        ..ConfigOverrides::default()
    }
}

/// Overrides for `clove build`.
pub fn build_overrides(args: &BuildArgs) -> Result<ConfigOverrides> {
    let defines = if args.defines.is_empty() {
        None
    } else {
        let mut defines = IndexMap::new();
        for raw in &args.defines {
            let (name, value) = parse_define(raw)?;
            defines.insert(name, value);
        }
        Some(defines)
    };

    Ok(ConfigOverrides {
        out_dir: args.out_dir.clone(),
        target_style: args.style.map(Into::into),
        defines,
        manifest: args.manifest.clone(),
        sourcemap: args.sourcemap.then_some(true),
        ..source_overrides(&args.sources)
    })
}

/// Load, layer and validate the configuration for `root`.
pub fn load_config(
    root: &Path,
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<CloveConfig> {
    let mut loader = ConfigLoader::new(root);
    if let Some(path) = config_file {
        loader = loader.with_config_file(path);
    }
    let config = loader.load(overrides)?;
    FsValidator::new(root).validate(&config)?;
    Ok(config)
}
