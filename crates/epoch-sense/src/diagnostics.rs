//! Positioned parse diagnostics and the navigation capability they hand off to.
//!
//! A diagnostic is a plain value: message, document, line, column. Opening
//! the document and moving the caret is the host's job, reached through the
//! [`Navigator`] trait. Nothing in the parse pass ever calls a navigator.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// A syntax problem found while parsing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Human-readable description
    pub message: String,
    /// Canonical path of the document the problem is in
    pub document: PathBuf,
    /// Zero-based line
    pub line: u32,
    /// Zero-based column
    pub column: u32,
}

impl Diagnostic {
    /// Create a diagnostic.
    #[must_use]
    pub fn new(message: impl Into<String>, document: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            document: document.into(),
            line,
            column,
        }
    }

    /// Ask the host to open this diagnostic's document at its position.
    ///
    /// Does nothing when the diagnostic has no document.
    ///
    /// # Errors
    ///
    /// Returns whatever the navigator reports when the document or its text
    /// buffer cannot be reached.
    pub fn navigate(&self, navigator: &dyn Navigator) -> Result<(), NavigationError> {
        if self.document.as_os_str().is_empty() {
            return Ok(());
        }
        navigator.open_and_navigate(&self.document, self.line, self.column)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.document.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

/// Host capability that opens a document and places the caret.
///
/// Implementations are expected to marshal onto whatever thread owns the
/// editor before touching it.
pub trait Navigator {
    /// Open `document` and move the caret to `line`/`column`.
    ///
    /// # Errors
    ///
    /// Returns a [`NavigationError`] when the document cannot be opened or
    /// has no text buffer.
    fn open_and_navigate(&self, document: &Path, line: u32, column: u32) -> Result<(), NavigationError>;
}

/// Failure reported by a [`Navigator`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The host could not open the document
    #[error("cannot open document: {}", .0.display())]
    DocumentUnavailable(PathBuf),

    /// The document opened but exposes no text buffer
    #[error("document has no text buffer: {}", .0.display())]
    BufferUnavailable(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: RefCell<Vec<(PathBuf, u32, u32)>>,
    }

    impl Navigator for RecordingNavigator {
        fn open_and_navigate(&self, document: &Path, line: u32, column: u32) -> Result<(), NavigationError> {
            self.visits
                .borrow_mut()
                .push((document.to_path_buf(), line, column));
            Ok(())
        }
    }

    struct ClosedNavigator;

    impl Navigator for ClosedNavigator {
        fn open_and_navigate(&self, document: &Path, _: u32, _: u32) -> Result<(), NavigationError> {
            Err(NavigationError::DocumentUnavailable(document.to_path_buf()))
        }
    }

    #[test]
    fn navigate_passes_exact_position() {
        let navigator = RecordingNavigator::default();
        let diag = Diagnostic::new("unrecognized syntax", "/ws/b.epoch", 3, 7);

        diag.navigate(&navigator).expect("navigation should succeed");

        assert_eq!(
            navigator.visits.into_inner(),
            vec![(PathBuf::from("/ws/b.epoch"), 3, 7)]
        );
    }

    #[test]
    fn navigate_without_document_is_a_no_op() {
        let navigator = RecordingNavigator::default();
        let diag = Diagnostic::new("orphan", "", 0, 0);

        diag.navigate(&navigator).expect("should succeed");

        assert!(navigator.visits.into_inner().is_empty());
    }

    #[test]
    fn navigator_failure_is_returned() {
        let diag = Diagnostic::new("bad", "/ws/missing.epoch", 0, 0);

        let err = diag.navigate(&ClosedNavigator).unwrap_err();

        assert!(err.to_string().contains("missing.epoch"));
    }

    #[test]
    fn display_is_path_line_column_message() {
        let diag = Diagnostic::new("expected '='", "a.epoch", 1, 2);

        assert_eq!(diag.to_string(), "a.epoch:1:2: expected '='");
    }
}
