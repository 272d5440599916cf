//! Logging setup on top of `tracing-subscriber`.
//!
//! ```rust,no_run
//! use clove_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("scanning sources");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "clove=debug,clove_graph=debug,clove_transform=debug,clove_config=debug,clove_cli=debug";
const QUIET_FILTER: &str = "clove=error,clove_cli=error";
const DEFAULT_FILTER: &str = "clove=info,clove_cli=info,clove_graph=warn,clove_transform=warn,clove_config=warn";

/// Install the global subscriber.
///
/// Level selection, first match wins:
/// 1. `--verbose`: debug for every clove crate
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for the CLI, warnings from the libraries
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_parse() {
        let verbose = filter_for(true, false).to_string();
        assert!(verbose.contains("clove_graph=debug"));
        let quiet = filter_for(false, true).to_string();
        assert!(quiet.contains("clove_cli=error"));
    }

    #[test]
    fn test_double_init_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
