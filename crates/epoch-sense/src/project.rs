//! The workspace-wide source model.
//!
//! A `Project` owns the current [`SymbolTable`] snapshot and knows how to
//! rebuild it: walk the host tree, parse every source file, collect what the
//! files declare. Rebuilds are pull-based and time-gated. Callers invoke
//! [`Project::parse_if_outdated`] as often as they like and a full rebuild
//! happens at most once per [`STALENESS_THRESHOLD`].
//!
//! ## Snapshots
//!
//! A rebuild fills a fresh table and swaps it in only once the walk is done.
//! [`Project::snapshot`] hands out the current table behind an `Arc`, so a
//! reader holding one never observes a half-built table; it simply keeps the
//! older view until it asks again.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::diagnostics::Diagnostic;
use crate::error::{FileError, Result};
use crate::hierarchy::{Hierarchy, collect_paths};
use crate::lexer::LexSession;
use crate::parser::ParseSession;
use crate::symbols::SymbolTable;
use crate::types::{
    FileOutcome, FunctionSignature, SourceFile, StrongAlias, Structure, SumType, Variable,
    WeakAlias,
};
use crate::workspace;

/// Minimum time between two full rebuilds.
pub const STALENESS_THRESHOLD: Duration = Duration::from_secs(15);

/// Statistics from one full rebuild.
#[derive(Debug, Clone, Default)]
pub struct ReparseStats {
    /// Source files read and parsed
    pub files_parsed: usize,
    /// Parsed files whose pass stopped on a diagnostic
    pub files_failed: usize,
    /// Declarations recognized across all files
    pub declarations: usize,
    /// Diagnostics recorded
    pub diagnostics: usize,
    /// Files that could not be read (non-fatal)
    pub errors: Vec<FileError>,
    /// How long the rebuild took
    pub duration: Duration,
}

/// Authoritative symbol tables for one workspace.
pub struct Project {
    hierarchy: Arc<dyn Hierarchy>,
    config: Config,
    clock: Box<dyn Clock>,
    last_parse: Option<Instant>,
    symbols: Arc<SymbolTable>,
}

impl Project {
    /// Create a project over a host tree with default configuration.
    ///
    /// Registries start empty; nothing is parsed until the first
    /// [`parse_if_outdated`](Self::parse_if_outdated).
    #[must_use]
    pub fn new(hierarchy: Arc<dyn Hierarchy>) -> Self {
        Self::with_config(hierarchy, Config::default())
    }

    /// Create a project over a host tree.
    #[must_use]
    pub fn with_config(hierarchy: Arc<dyn Hierarchy>, config: Config) -> Self {
        Self {
            hierarchy,
            config,
            clock: Box::new(SystemClock),
            last_parse: None,
            symbols: Arc::new(SymbolTable::new()),
        }
    }

    /// Create a project for a directory on disk.
    ///
    /// Loads `.epoch-sense.yaml` from the directory if present and scans it
    /// into a project tree.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is malformed or the directory cannot be
    /// scanned.
    pub fn open(workspace_root: &Path) -> Result<Self> {
        let config = Config::discover(workspace_root)?;
        let scanned = workspace::scan(workspace_root, &config)?;
        Ok(Self::with_config(Arc::new(scanned.tree), config))
    }

    /// Replace the time source used by the staleness gate.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// When the last full rebuild started, `None` before the first.
    #[must_use]
    pub fn last_parse_time(&self) -> Option<Instant> {
        self.last_parse
    }

    /// Returns `true` if the next [`parse_if_outdated`](Self::parse_if_outdated) would rebuild.
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        self.last_parse
            .is_none_or(|last| self.clock.now() >= last + STALENESS_THRESHOLD)
    }

    // === Rebuilding ===

    /// Rebuild everything if the last rebuild is at least [`STALENESS_THRESHOLD`] old.
    ///
    /// Returns the rebuild's statistics, or `None` if the call was gated.
    pub fn parse_if_outdated(&mut self) -> Option<ReparseStats> {
        let now = self.clock.now();
        if let Some(last) = self.last_parse
            && now < last + STALENESS_THRESHOLD
        {
            debug!(
                since_last_ms = now.duration_since(last).as_millis(),
                "Symbol tables still fresh, skipping reparse"
            );
            return None;
        }
        Some(self.rebuild(now))
    }

    /// Rebuild everything now, regardless of the staleness gate.
    pub fn reparse(&mut self) -> ReparseStats {
        let now = self.clock.now();
        self.rebuild(now)
    }

    fn rebuild(&mut self, now: Instant) -> ReparseStats {
        let start = Instant::now();
        self.last_parse = Some(now);

        let mut table = SymbolTable::new();
        let mut stats = ReparseStats::default();

        let config = &self.config;
        let files = collect_paths(Arc::clone(&self.hierarchy), |path| {
            config.is_source_file(path)
        });

        for path in files {
            match Self::parse_file(&path, &mut table) {
                Ok(file) => {
                    stats.files_parsed += 1;
                    stats.declarations += file.declarations;
                    if file.outcome == FileOutcome::Failed {
                        stats.files_failed += 1;
                    }
                }
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e.message,
                        "Cannot read source file, skipping"
                    );
                    stats.errors.push(e.clone());
                    table.push_file_error(e);
                }
            }
        }

        stats.diagnostics = table.diagnostics().len();
        stats.duration = start.elapsed();
        self.symbols = Arc::new(table);

        info!(
            files = stats.files_parsed,
            failed = stats.files_failed,
            declarations = stats.declarations,
            unreadable = stats.errors.len(),
            duration_ms = stats.duration.as_millis(),
            "Reparse completed"
        );

        stats
    }

    /// Read, lex and parse one file into `table`.
    fn parse_file(path: &Path, table: &mut SymbolTable) -> std::result::Result<SourceFile, FileError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FileError::from_io(path.to_path_buf(), &e))?;

        let session = ParseSession::new(LexSession::new(path, &text));
        let (outcome, declarations) = session.augment_project(table);
        debug!(file = %path.display(), ?outcome, declarations, "Parsed source file");

        let file = SourceFile {
            path: path.to_path_buf(),
            outcome,
            declarations,
        };
        table.register_source_file(path.to_path_buf(), file.clone());
        Ok(file)
    }

    // === Registration ===
    //
    // These edit the current snapshot copy-on-write. Readers already holding
    // a snapshot keep their view. The next rebuild discards these entries
    // like everything else.

    /// Register a function, merging overloads by name.
    pub fn register_function(&mut self, function: FunctionSignature) {
        Arc::make_mut(&mut self.symbols).register_function(function);
    }

    /// Register a structure; the first registration of a name wins.
    pub fn register_structure_type(&mut self, name: &str, structure: Structure) -> bool {
        Arc::make_mut(&mut self.symbols).register_structure_type(name, structure)
    }

    /// Register a sum type; the first registration of a name wins.
    pub fn register_sum_type(&mut self, name: &str, sum_type: SumType) -> bool {
        Arc::make_mut(&mut self.symbols).register_sum_type(name, sum_type)
    }

    /// Register a strong alias; the first registration of a name wins.
    pub fn register_strong_alias(&mut self, name: &str, alias: StrongAlias) -> bool {
        Arc::make_mut(&mut self.symbols).register_strong_alias(name, alias)
    }

    /// Register a weak alias; the first registration of a name wins.
    pub fn register_weak_alias(&mut self, name: &str, alias: WeakAlias) -> bool {
        Arc::make_mut(&mut self.symbols).register_weak_alias(name, alias)
    }

    /// Append a global variable.
    pub fn register_global_variable(&mut self, variable: Variable) {
        Arc::make_mut(&mut self.symbols).register_global_variable(variable);
    }

    // === Queries ===

    /// The current symbol table.
    #[must_use]
    pub fn snapshot(&self) -> Arc<SymbolTable> {
        Arc::clone(&self.symbols)
    }

    /// All function signatures, sorted by name.
    #[must_use]
    pub fn available_function_signatures(&self) -> Vec<FunctionSignature> {
        self.symbols.available_function_signatures()
    }

    /// Name to structure mapping.
    #[must_use]
    pub fn available_structure_definitions(&self) -> &HashMap<String, Structure> {
        self.symbols.available_structure_definitions()
    }

    /// Names of sum types, strong aliases and weak aliases.
    #[must_use]
    pub fn available_type_names(&self) -> Vec<String> {
        self.symbols.available_type_names()
    }

    /// Variables visible at a position; currently every global variable.
    #[must_use]
    pub fn available_variables(&self, file: &Path, line: u32, column: u32) -> Vec<Variable> {
        self.symbols.available_variables(file, line, column)
    }

    /// Look up a structure by name.
    #[must_use]
    pub fn structure_definition(&self, name: &str) -> Option<&Structure> {
        self.symbols.structure_definition(name)
    }

    /// Returns `true` if a function with this name is registered.
    #[must_use]
    pub fn is_recognized_function(&self, name: &str) -> bool {
        self.symbols.is_recognized_function(name)
    }

    /// Returns `true` if a structure with this name is registered.
    #[must_use]
    pub fn is_recognized_structure_type(&self, name: &str) -> bool {
        self.symbols.is_recognized_structure_type(name)
    }

    /// Returns `true` if a sum type or alias has this name.
    #[must_use]
    pub fn is_recognized_type(&self, name: &str) -> bool {
        self.symbols.is_recognized_type(name)
    }

    /// Diagnostics from the latest rebuild.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.symbols.diagnostics()
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("config", &self.config)
            .field("last_parse", &self.last_parse)
            .field("symbols", &self.symbols)
            .finish_non_exhaustive()
    }
}
