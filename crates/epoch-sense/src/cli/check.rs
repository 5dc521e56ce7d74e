//! `epoch-sense check` command implementation.

use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;
use epoch_sense::Project;

use super::display::{print_diagnostics, print_file_errors};

/// Run the check command.
///
/// Exits with failure when any file has a diagnostic or cannot be read.
pub fn run(workspace: &Path) -> Result<ExitCode, epoch_sense::Error> {
    println!("{} {}...", "Checking".cyan().bold(), workspace.display());

    let mut project = Project::open(workspace)?;
    let workspace = &workspace
        .canonicalize()
        .unwrap_or_else(|_| workspace.to_path_buf());
    let stats = project.reparse();

    println!(
        "{} {} files, {} declarations",
        "Parsed".green().bold(),
        stats.files_parsed,
        stats.declarations
    );
    println!("{}: {:.2?}", "Duration".dimmed(), stats.duration);

    let diagnostics = project.diagnostics();
    if !diagnostics.is_empty() {
        println!();
        println!("{} ({}):", "Diagnostics".red().bold(), diagnostics.len());
        print_diagnostics(workspace, diagnostics);
    }

    if !stats.errors.is_empty() {
        println!();
        println!("{} ({}):", "Unreadable files".red().bold(), stats.errors.len());
        print_file_errors(workspace, &stats.errors);
    }

    if diagnostics.is_empty() && stats.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
