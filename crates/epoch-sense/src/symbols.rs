//! Name-keyed symbol registries for one reparse cycle.
//!
//! A `SymbolTable` holds everything a reparse produces: the five declaration
//! registries, the global scope, one record per parsed file, the diagnostics
//! and the per-file read failures. A reparse always starts from an empty
//! table, so nothing survives from a previous cycle.
//!
//! ## Registration policy
//!
//! | Registry | Duplicate name |
//! |----------|----------------|
//! | functions | overloads appended to the existing entry, in call order |
//! | structures, sum types, strong aliases, weak aliases | first registration wins, later ones ignored silently |
//! | global scope | always appended, no deduplication |
//! | files | replaced |

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::diagnostics::Diagnostic;
use crate::error::FileError;
use crate::types::{
    Declaration, FunctionSignature, LexicalScope, SourceFile, StrongAlias, Structure, SumType,
    Variable, WeakAlias,
};

/// Symbol registries, diagnostics and file records from one reparse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    files: HashMap<PathBuf, SourceFile>,
    global_scope: LexicalScope,
    functions: HashMap<String, FunctionSignature>,
    structures: HashMap<String, Structure>,
    sum_types: HashMap<String, SumType>,
    strong_aliases: HashMap<String, StrongAlias>,
    weak_aliases: HashMap<String, WeakAlias>,
    diagnostics: Vec<Diagnostic>,
    file_errors: Vec<FileError>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Registration ===

    /// Register any declaration under the policy for its kind.
    ///
    /// Returns `true` if the table changed.
    pub fn register(&mut self, declaration: Declaration) -> bool {
        match declaration {
            Declaration::Function(f) => {
                self.register_function(f);
                true
            }
            Declaration::Structure(s) => self.register_structure_type(&s.name.clone(), s),
            Declaration::SumType(s) => self.register_sum_type(&s.name.clone(), s),
            Declaration::StrongAlias(a) => self.register_strong_alias(&a.name.clone(), a),
            Declaration::WeakAlias(a) => self.register_weak_alias(&a.name.clone(), a),
            Declaration::GlobalVariable(v) => {
                self.register_global_variable(v);
                true
            }
        }
    }

    /// Register a function, merging overloads into an existing entry of the same name.
    pub fn register_function(&mut self, function: FunctionSignature) {
        match self.functions.get_mut(&function.name) {
            Some(existing) => existing.overloads.extend(function.overloads),
            None => {
                self.functions.insert(function.name.clone(), function);
            }
        }
    }

    /// Register a structure unless one with this name already exists.
    ///
    /// Returns `true` if it was inserted.
    pub fn register_structure_type(&mut self, name: &str, structure: Structure) -> bool {
        insert_if_absent(&mut self.structures, name, structure)
    }

    /// Register a sum type unless one with this name already exists.
    ///
    /// Returns `true` if it was inserted.
    pub fn register_sum_type(&mut self, name: &str, sum_type: SumType) -> bool {
        insert_if_absent(&mut self.sum_types, name, sum_type)
    }

    /// Register a strong alias unless one with this name already exists.
    ///
    /// Returns `true` if it was inserted.
    pub fn register_strong_alias(&mut self, name: &str, alias: StrongAlias) -> bool {
        insert_if_absent(&mut self.strong_aliases, name, alias)
    }

    /// Register a weak alias unless one with this name already exists.
    ///
    /// Returns `true` if it was inserted.
    pub fn register_weak_alias(&mut self, name: &str, alias: WeakAlias) -> bool {
        insert_if_absent(&mut self.weak_aliases, name, alias)
    }

    /// Append a variable to the global scope.
    pub fn register_global_variable(&mut self, variable: Variable) {
        self.global_scope.variables.push(variable);
    }

    /// Record a parsed file, replacing any earlier record for the same path.
    pub fn register_source_file(&mut self, path: PathBuf, file: SourceFile) {
        self.files.insert(path, file);
    }

    /// Record a diagnostic.
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a file that could not be read.
    pub fn push_file_error(&mut self, error: FileError) {
        self.file_errors.push(error);
    }

    // === Queries ===

    /// All function signatures, sorted by name.
    #[must_use]
    pub fn available_function_signatures(&self) -> Vec<FunctionSignature> {
        let mut signatures: Vec<_> = self.functions.values().cloned().collect();
        signatures.sort_by(|a, b| a.name.cmp(&b.name));
        signatures
    }

    /// Live name to structure mapping.
    #[must_use]
    pub fn available_structure_definitions(&self) -> &HashMap<String, Structure> {
        &self.structures
    }

    /// Names of every sum type, strong alias and weak alias, sorted and deduplicated.
    ///
    /// Structure names are not included; query them through
    /// [`available_structure_definitions`](Self::available_structure_definitions).
    #[must_use]
    pub fn available_type_names(&self) -> Vec<String> {
        self.sum_types
            .keys()
            .chain(self.strong_aliases.keys())
            .chain(self.weak_aliases.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Variables visible at a position.
    ///
    /// Only the global scope is tracked, so the position is not consulted and
    /// every global variable is returned.
    #[must_use]
    pub fn available_variables(&self, _file: &Path, _line: u32, _column: u32) -> Vec<Variable> {
        self.global_scope.variables.clone()
    }

    /// Look up a structure by name.
    #[must_use]
    pub fn structure_definition(&self, name: &str) -> Option<&Structure> {
        self.structures.get(name)
    }

    /// Look up a sum type by name.
    #[must_use]
    pub fn sum_type(&self, name: &str) -> Option<&SumType> {
        self.sum_types.get(name)
    }

    /// Returns `true` if a function with this name is registered.
    #[must_use]
    pub fn is_recognized_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Returns `true` if a structure with this name is registered.
    #[must_use]
    pub fn is_recognized_structure_type(&self, name: &str) -> bool {
        self.structures.contains_key(name)
    }

    /// Returns `true` if a sum type, strong alias or weak alias has this name.
    #[must_use]
    pub fn is_recognized_type(&self, name: &str) -> bool {
        self.sum_types.contains_key(name)
            || self.strong_aliases.contains_key(name)
            || self.weak_aliases.contains_key(name)
    }

    /// The global scope.
    #[must_use]
    pub fn global_scope(&self) -> &LexicalScope {
        &self.global_scope
    }

    /// Record for a parsed file.
    #[must_use]
    pub fn source_file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Every parsed file record.
    pub fn source_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    /// Diagnostics recorded during this cycle, in walk order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Files that could not be read during this cycle, in walk order.
    #[must_use]
    pub fn file_errors(&self) -> &[FileError] {
        &self.file_errors
    }
}

fn insert_if_absent<T>(registry: &mut HashMap<String, T>, name: &str, value: T) -> bool {
    if registry.contains_key(name) {
        trace!(name, "Duplicate declaration ignored, first registration wins");
        return false;
    }
    registry.insert(name.to_string(), value);
    true
}
