//! `clove check`: report diagnostics without writing anything.

use serde::Serialize;

use clove_graph::Diagnostic;

use crate::cli::{CheckArgs, OutputFormat};
use crate::commands::report;
use crate::config::{load_config, source_overrides, working_dir};
use crate::error::{CliError, Result};
use crate::project::Project;
use crate::ui;

/// Machine-readable result of `clove check --json`.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: &'a [Diagnostic],
}

pub async fn execute(args: CheckArgs) -> Result<()> {
    let cwd = working_dir(&args.sources)?;
    let config = load_config(
        &cwd,
        args.sources.config.as_deref(),
        &source_overrides(&args.sources),
    )?;
    let project = Project::load(config).await?;

    let diagnostics = project.diagnostics(false);
    let errors = diagnostics.iter().filter(|diag| diag.is_error()).count();
    let warnings = diagnostics.len() - errors;
    let files = project.files().count();

    match args.output_format() {
        OutputFormat::Json => {
            let report = CheckReport {
                files,
                errors,
                warnings,
                diagnostics: &diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            report(&diagnostics);
            if errors == 0 {
                ui::success(&format!(
                    "Checked {}, {}",
                    ui::plural(files, "file"),
                    ui::plural(warnings, "warning")
                ));
            }
        }
    }

    if errors > 0 {
        return Err(CliError::Diagnostics { count: errors });
    }
    Ok(())
}
