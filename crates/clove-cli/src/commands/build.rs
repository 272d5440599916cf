//! `clove build`: convert every source and write it to the output directory.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cli::BuildArgs;
use crate::commands::report;
use crate::config::{build_overrides, load_config, working_dir};
use crate::error::{CliError, Result};
use crate::project::{Project, WriteSummary};
use crate::ui;
use crate::watch::{FileChange, FileWatcher};

const DEBOUNCE: Duration = Duration::from_millis(50);

/// # Steps
///
/// 1. Load and validate the configuration
/// 2. Scan, parse and register every source
/// 3. Stop if any error diagnostic was reported
/// 4. Transform in dependency order and write outputs, maps and manifest
/// 5. With `--watch`, repeat 3-4 on every change
pub async fn execute(args: BuildArgs) -> Result<()> {
    let cwd = working_dir(&args.sources)?;
    let overrides = build_overrides(&args)?;
    let config = load_config(&cwd, args.sources.config.as_deref(), &overrides)?;

    let mut project = Project::load(config).await?;
    let outcome = build_once(&project, args.allow_missing).await;
    if !args.watch {
        return outcome.map(|_| ());
    }
    if let Err(err) = outcome {
        ui::error(&err.to_string());
    }

    watch_loop(&mut project, args.allow_missing).await
}

/// One full conversion pass over the current graph.
pub async fn build_once(project: &Project, allow_missing: bool) -> Result<WriteSummary> {
    let start = Instant::now();

    let errors = report(&project.diagnostics(allow_missing));
    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }

    let emitted = project.transform_all()?;
    let summary = project.write(&emitted).await?;
    if let Some(path) = project.write_manifest().await? {
        ui::info(&format!("Wrote manifest {}", path.display()));
    }

    ui::success(&format!(
        "Converted {} ({} rewritten) into {} in {}ms",
        ui::plural(summary.files, "file"),
        summary.changed,
        project.config().out_dir.display(),
        start.elapsed().as_millis()
    ));
    Ok(summary)
}

async fn watch_loop(project: &mut Project, allow_missing: bool) -> Result<()> {
    let (_watcher, mut changes) = FileWatcher::new(&project.config().roots, DEBOUNCE)?;
    ui::info("Watching for changes (Ctrl+C to stop)");

    loop {
        tokio::select! {
            change = changes.recv() => {
                let Some(change) = change else {
                    break;
                };
                let mut dirty = apply_change(project, change).await;
                while let Ok(change) = changes.try_recv() {
                    dirty |= apply_change(project, change).await;
                }
                if dirty {
                    if let Err(err) = build_once(project, allow_missing).await {
                        ui::error(&err.to_string());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                ui::info("Stopping watch");
                break;
            }
        }
    }
    Ok(())
}

/// Feed one change into the project. Returns whether the graph changed.
async fn apply_change(project: &mut Project, change: FileChange) -> bool {
    debug!(?change, "file change");
    match change {
        FileChange::Removed(path) => {
            if let Some(file) = project.source(&path).cloned() {
                remove_output(&project.output_path(&file)).await;
            }
            project.forget(&path)
        }
        FileChange::Created(path) | FileChange::Modified(path) => {
            match project.refresh(&path).await {
                Ok(changed) => changed,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping change");
                    false
                }
            }
        }
    }
}

async fn remove_output(out_path: &Path) {
    let mut map = out_path.as_os_str().to_os_string();
    map.push(".map");
    for path in [out_path.to_path_buf(), map.into()] {
        if let Err(err) = tokio::fs::remove_file(&path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "could not remove output");
            }
        }
    }
}
