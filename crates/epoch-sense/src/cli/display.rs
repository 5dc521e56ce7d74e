//! Common display utilities for CLI commands.

use std::path::Path;

use colored::Colorize;
use epoch_sense::{Diagnostic, FileError};

const MAX_DISPLAY_ITEMS: usize = 20;

/// Show `path` relative to the workspace when it lies inside it.
pub fn relative<'a>(workspace: &Path, path: &'a Path) -> std::borrow::Cow<'a, str> {
    path.strip_prefix(workspace)
        .unwrap_or(path)
        .to_string_lossy()
}

/// Print diagnostics as `path:line:column: message`, one per line.
///
/// Lines and columns are shown one-based, the way terminals and editors
/// expect them on the command line.
pub fn print_diagnostics(workspace: &Path, diagnostics: &[Diagnostic]) {
    for diag in diagnostics.iter().take(MAX_DISPLAY_ITEMS) {
        println!(
            "  {}:{}:{}: {}",
            relative(workspace, &diag.document).white().bold(),
            diag.line + 1,
            diag.column + 1,
            diag.message
        );
    }
    print_overflow(diagnostics.len());
}

/// Print files that could not be read.
pub fn print_file_errors(workspace: &Path, errors: &[FileError]) {
    for err in errors.iter().take(MAX_DISPLAY_ITEMS) {
        println!(
            "  {} {}: {} ({})",
            "•".red(),
            relative(workspace, &err.path),
            err.message,
            err.kind
        );
    }
    print_overflow(errors.len());
}

/// Print a bulleted list of names, or `empty_message` when there are none.
pub fn print_names<'a>(names: impl IntoIterator<Item = &'a str>, empty_message: &str) {
    let mut any = false;
    for name in names {
        any = true;
        println!("    {} {name}", "•".dimmed());
    }
    if !any {
        println!("    {}", empty_message.dimmed());
    }
}

fn print_overflow(total: usize) {
    if total > MAX_DISPLAY_ITEMS {
        println!("  ... and {} more", total - MAX_DISPLAY_ITEMS);
    }
}
