//! Command implementations. Each module exposes an `execute` function taking
//! its parsed arguments.

pub mod build;
pub mod check;
pub mod deps;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use deps::execute as deps_execute;

use clove_graph::Diagnostic;

use crate::ui;

/// Print every diagnostic and return the number of errors among them.
pub(crate) fn report(diagnostics: &[Diagnostic]) -> usize {
    for diagnostic in diagnostics {
        ui::diagnostic(diagnostic);
    }
    diagnostics.iter().filter(|diag| diag.is_error()).count()
}
