//! Declaration data model.
//!
//! These are the values the parser produces and the symbol table stores:
//! - **Declarations**: `FunctionSignature`, `Structure`, `SumType`, `StrongAlias`,
//!   `WeakAlias`, `Variable`
//! - **Containers**: `LexicalScope` (the global scope)
//! - **Bookkeeping**: `SourceFile` (one record per parsed file)
//!
//! Type references are kept as the names written in source. Nothing here
//! resolves them; name-existence checks go through the symbol table.

use serde::Serialize;
use std::path::PathBuf;

// ============================================================================
// Functions
// ============================================================================

/// A function name together with every overload registered for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    /// Function name, the registry key
    pub name: String,
    /// Overloads in registration order
    pub overloads: Vec<Overload>,
}

impl FunctionSignature {
    /// Create a signature with a single overload.
    #[must_use]
    pub fn new(name: impl Into<String>, overload: Overload) -> Self {
        Self {
            name: name.into(),
            overloads: vec![overload],
        }
    }
}

/// One parameter/return shape of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overload {
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Declared return type, `None` for functions returning nothing
    pub return_type: Option<String>,
}

/// A named, typed function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type name
    pub type_name: String,
}

// ============================================================================
// Types
// ============================================================================

/// A structure type and its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Structure {
    /// Structure name
    pub name: String,
    /// Members in declaration order
    pub members: Vec<StructureMember>,
}

/// A single structure member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureMember {
    /// Member name
    pub name: String,
    /// Declared type name
    pub type_name: String,
}

/// A nominal type whose values are one of a fixed set of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumType {
    /// Sum type name
    pub name: String,
    /// Template parameters, empty for non-generic sum types
    pub template_parameters: Vec<TemplateParameter>,
    /// Alternatives in source order
    pub cases: Vec<SumTypeCase>,
}

impl SumType {
    /// Names of the alternative cases, in source order.
    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|case| case.name.as_str())
    }
}

/// One alternative of a sum type, e.g. `Circle` or `list<integer>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumTypeCase {
    /// Base name of the alternative
    pub name: String,
    /// Template arguments applied to the alternative
    pub template_arguments: Vec<String>,
}

/// A `type name` pair in a template parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParameter {
    /// The parameter's kind, e.g. `type`
    pub type_name: String,
    /// The parameter's name
    pub name: String,
}

/// A new nominal type wrapping an underlying type.
///
/// Values are not implicitly interchangeable with the underlying type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrongAlias {
    /// Alias name
    pub name: String,
    /// Wrapped type name
    pub underlying: String,
}

/// A transparent second name for an existing type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeakAlias {
    /// Alias name
    pub name: String,
    /// Aliased type name
    pub underlying: String,
}

// ============================================================================
// Variables and scopes
// ============================================================================

/// A variable declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Declared type name
    pub type_name: String,
}

/// An ordered collection of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexicalScope {
    /// Variables in registration order; duplicates are kept
    pub variables: Vec<Variable>,
}

// ============================================================================
// Declarations
// ============================================================================

/// Any top-level declaration the symbol table can register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// Function overload set (merges by name)
    Function(FunctionSignature),
    /// Structure type (first wins)
    Structure(Structure),
    /// Sum type (first wins)
    SumType(SumType),
    /// Strong alias (first wins)
    StrongAlias(StrongAlias),
    /// Weak alias (first wins)
    WeakAlias(WeakAlias),
    /// Global variable (always appended)
    GlobalVariable(Variable),
}

impl Declaration {
    /// Name of the declared symbol.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Structure(s) => &s.name,
            Self::SumType(s) => &s.name,
            Self::StrongAlias(a) => &a.name,
            Self::WeakAlias(a) => &a.name,
            Self::GlobalVariable(v) => &v.name,
        }
    }
}

// ============================================================================
// Files
// ============================================================================

/// How a file's parse pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    /// Token stream exhausted without a diagnostic
    Success,
    /// Stopped at the first unrecognized construct; one diagnostic recorded
    Failed,
}

/// Record of one parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Canonical path of the file
    pub path: PathBuf,
    /// How the pass ended
    pub outcome: FileOutcome,
    /// Declarations recognized before the pass ended
    pub declarations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_name_matches_inner_symbol() {
        let decl = Declaration::WeakAlias(WeakAlias {
            name: "meters".to_string(),
            underlying: "real".to_string(),
        });

        assert_eq!(decl.name(), "meters");
    }

    #[test]
    fn declaration_serializes_with_kind_tag() {
        let decl = Declaration::GlobalVariable(Variable {
            name: "counter".to_string(),
            type_name: "integer".to_string(),
        });

        let json = serde_json::to_value(&decl).expect("declaration should serialize");
        assert_eq!(json["kind"], "global_variable");
        assert_eq!(json["name"], "counter");
    }
}
