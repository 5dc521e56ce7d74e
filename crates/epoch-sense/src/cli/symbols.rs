//! `epoch-sense symbols` command implementation.

use std::path::Path;
use std::process::ExitCode;

use colored::Colorize;
use epoch_sense::{FunctionSignature, Project, Structure, Variable};
use serde::Serialize;

use super::display::print_names;

/// Everything the workspace declares, in a stable order.
#[derive(Serialize)]
struct SymbolReport {
    types: Vec<String>,
    structures: Vec<Structure>,
    functions: Vec<FunctionSignature>,
    globals: Vec<Variable>,
}

/// Run the symbols command.
pub fn run(workspace: &Path, json: bool) -> Result<ExitCode, epoch_sense::Error> {
    let mut project = Project::open(workspace)?;
    project.reparse();

    let mut structures: Vec<Structure> = project
        .available_structure_definitions()
        .values()
        .cloned()
        .collect();
    structures.sort_by(|a, b| a.name.cmp(&b.name));

    let report = SymbolReport {
        types: project.available_type_names(),
        structures,
        functions: project.available_function_signatures(),
        globals: project.snapshot().global_scope().variables.clone(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Epoch Workspace Symbols".cyan().bold());
    println!();

    println!("  {}:", "Types".white().bold());
    print_names(report.types.iter().map(String::as_str), "(none)");

    println!("  {}:", "Structures".white().bold());
    print_names(report.structures.iter().map(|s| s.name.as_str()), "(none)");

    println!("  {}:", "Functions".white().bold());
    print_names(report.functions.iter().map(|f| f.name.as_str()), "(none)");

    println!("  {}:", "Globals".white().bold());
    print_names(report.globals.iter().map(|v| v.name.as_str()), "(none)");

    if !project.diagnostics().is_empty() {
        println!();
        println!(
            "{}: {} files stopped early; run `epoch-sense check` for details",
            "Note".yellow(),
            project.diagnostics().len()
        );
    }

    Ok(ExitCode::SUCCESS)
}
