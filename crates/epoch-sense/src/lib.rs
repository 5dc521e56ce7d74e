//! # Epoch Sense: Source Model for Epoch Language Tooling
//!
//! Epoch Sense keeps a project-wide symbol table for Epoch source files so
//! editor features (completion, diagnostics, navigation) can ask what a
//! workspace declares. It parses top-level declarations from every source
//! file in a host's project tree and rebuilds the whole table on a time-gated
//! schedule.
//!
//! ## Design Philosophy
//!
//! - **Whole rebuilds** - Every cycle starts from empty tables; there is no incremental diff
//! - **Bounded staleness** - At most one rebuild per 15 seconds, however often tooling asks
//! - **One diagnostic per file** - The first unrecognized construct stops that file's pass
//! - **Host agnostic** - Trees, clocks and editor navigation are traits the host implements
//!
//! ## Quick Start
//!
//! ```no_run
//! use epoch_sense::Project;
//! use std::path::Path;
//!
//! let mut project = Project::open(Path::new("/path/to/workspace"))?;
//!
//! if let Some(stats) = project.parse_if_outdated() {
//!     println!("Parsed {} files", stats.files_parsed);
//! }
//!
//! for diagnostic in project.diagnostics() {
//!     println!("{diagnostic}");
//! }
//!
//! assert!(project.is_recognized_type("Shape"));
//! # Ok::<(), epoch_sense::Error>(())
//! ```

pub mod clock;
pub mod config;
pub mod decoration;
mod diagnostics;
mod error;
pub mod hierarchy;
pub mod lexer;
pub mod parser;
mod project;
mod symbols;
mod types;
pub mod workspace;

pub use config::Config;
pub use diagnostics::{Diagnostic, NavigationError, Navigator};
pub use error::{Error, FileError, FileErrorKind, Result};
pub use hierarchy::{Hierarchy, ItemId, NodeTree};
pub use project::{Project, ReparseStats, STALENESS_THRESHOLD};
pub use symbols::SymbolTable;
pub use types::{
    Declaration, FileOutcome, FunctionSignature, LexicalScope, Overload, Parameter, SourceFile,
    StrongAlias, Structure, StructureMember, SumType, SumTypeCase, TemplateParameter, Variable,
    WeakAlias,
};
