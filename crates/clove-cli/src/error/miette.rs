//! Rendering CLI errors as miette reports.

use miette::Report;

use crate::error::CliError;

/// Convert a command failure into a report with a hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => match e.hint() {
            Some(hint) => miette::miette!(help = hint.to_string(), "Configuration error: {e}"),
            None => miette::miette!("Configuration error: {e}"),
        },
        CliError::Transform(e) => Report::new(e),
        CliError::Cycle(cycle) => miette::miette!(
            help = "Break the cycle by moving shared code into a namespace both files require",
            "{cycle}"
        ),
        CliError::Diagnostics { count } => miette::miette!(
            help = "Run `clove check` to list every diagnostic",
            "{count} error(s) found"
        ),
        CliError::NoSources { .. } => miette::miette!(
            help = "Sources are .js, .mjs and .ts files under the configured roots",
            "{err}"
        ),
        other => miette::miette!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_report_has_help() {
        let report = cli_error_to_miette(CliError::Diagnostics { count: 2 });
        assert_eq!(report.to_string(), "2 error(s) found");
        assert!(report.help().is_some());
    }

    #[test]
    fn test_config_hint_becomes_help() {
        let report = cli_error_to_miette(CliError::Config(clove_config::ConfigError::NoRoots));
        assert_eq!(
            report.to_string(),
            "Configuration error: no source roots specified"
        );
        assert!(report.help().is_some());
    }
}
