//! `clove deps`: print or write the `goog.addDependency` manifest.

use clove_config::ConfigOverrides;

use crate::cli::DepsArgs;
use crate::config::{load_config, source_overrides, working_dir};
use crate::error::{Result, ResultExt};
use crate::project::Project;
use crate::ui;

/// Paths in the manifest are relative to `--base`, else `manifest_base` from
/// the config, else the output file's directory, else the working directory.
pub async fn execute(args: DepsArgs) -> Result<()> {
    let cwd = working_dir(&args.sources)?;
    let overrides = ConfigOverrides {
        manifest_base: args.base.clone(),
        ..source_overrides(&args.sources)
    };
    let config = load_config(&cwd, args.sources.config.as_deref(), &overrides)?;
    let project = Project::load(config).await?;

    let output = args.output.as_ref().map(|path| cwd.join(path));
    let base = project
        .config()
        .manifest_base
        .clone()
        .or_else(|| output.as_ref().and_then(|path| path.parent().map(Into::into)))
        .unwrap_or_else(|| cwd.clone());
    let manifest = project.manifest(&base)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.with_path(parent)?;
            }
            tokio::fs::write(&path, manifest).await.with_path(&path)?;
            ui::success(&format!(
                "Wrote {} to {}",
                ui::plural(project.files().count(), "dependency line"),
                path.display()
            ));
        }
        None => print!("{manifest}"),
    }
    Ok(())
}
