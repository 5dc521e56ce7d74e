//! Per-file declaration parsing.
//!
//! A `ParseSession` drives one file's tokens through the declaration
//! productions, registers whatever they recognize, and turns the first
//! construct nothing recognizes into a single positioned diagnostic.
//!
//! ## Productions
//!
//! A production is a pure function of the session's lookahead. It never moves
//! the cursor; it reports how many tokens its declaration spans and the
//! driving loop consumes them. Productions are tried in a fixed order and the
//! first one that does not answer `NoMatch` decides the outcome.
//!
//! ## Failure
//!
//! There is no recovery. Once a position matches nothing, or a production
//! reports a malformed construct, the pass stops and the rest of the file is
//! skipped for this cycle.

mod sum_type;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::lexer::{LexSession, Token};
use crate::symbols::SymbolTable;
use crate::types::{Declaration, FileOutcome};

/// Result of attempting one production at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Production {
    /// The production recognized a declaration spanning `consumed` tokens.
    Matched {
        /// The recognized declaration
        declaration: Declaration,
        /// Tokens to consume
        consumed: usize,
    },
    /// The tokens at the cursor do not start this production.
    NoMatch,
    /// The production started but the construct is malformed.
    MalformedAt {
        /// Zero-based line of the offending token
        line: u32,
        /// Zero-based column of the offending token
        column: u32,
        /// What was expected
        reason: String,
    },
}

/// Outcome of a speculative template list scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateScan {
    /// The list closed; `end` is the offset just past the closing `>`.
    Closed {
        /// Offset after `>`
        end: usize,
    },
    /// Neither `,` nor `>` was found where expected.
    Broken {
        /// Offset where the pattern broke
        at: usize,
    },
}

type ProductionFn = fn(&ParseSession) -> Production;

/// Declaration productions in priority order.
const PRODUCTIONS: &[ProductionFn] = &[sum_type::parse];

/// Parser state for one source file.
#[derive(Debug)]
pub struct ParseSession {
    lexer: LexSession,
}

impl ParseSession {
    /// Create a session over a lexed file.
    #[must_use]
    pub fn new(lexer: LexSession) -> Self {
        Self { lexer }
    }

    /// Parse the whole file into `table`.
    ///
    /// Recognized declarations are registered as they are found. On the first
    /// unrecognized or malformed construct one diagnostic is recorded and the
    /// pass stops.
    pub fn augment_project(mut self, table: &mut SymbolTable) -> (FileOutcome, usize) {
        let mut declarations = 0;

        while !self.lexer.is_empty() {
            match self.attempt_productions() {
                Production::Matched {
                    declaration,
                    consumed,
                } => {
                    debug!(
                        file = %self.lexer.file().display(),
                        name = declaration.name(),
                        "Registering declaration"
                    );
                    self.consume_tokens(consumed.max(1));
                    table.register(declaration);
                    declarations += 1;
                }
                Production::NoMatch => {
                    let message = match self.peek_token(0) {
                        Some(token) => format!("unrecognized syntax: '{token}'"),
                        None => "unrecognized syntax".to_string(),
                    };
                    let (line, column) = self.position_at(0);
                    self.fail(table, message, line, column);
                    return (FileOutcome::Failed, declarations);
                }
                Production::MalformedAt {
                    line,
                    column,
                    reason,
                } => {
                    self.fail(table, reason, line, column);
                    return (FileOutcome::Failed, declarations);
                }
            }
        }

        (FileOutcome::Success, declarations)
    }

    fn attempt_productions(&self) -> Production {
        PRODUCTIONS
            .iter()
            .map(|production| production(self))
            .find(|result| !matches!(result, Production::NoMatch))
            .unwrap_or(Production::NoMatch)
    }

    fn fail(&self, table: &mut SymbolTable, message: String, line: u32, column: u32) {
        debug!(
            file = %self.lexer.file().display(),
            line,
            column,
            %message,
            "Parse pass stopped"
        );
        table.push_diagnostic(Diagnostic::new(message, self.lexer.file(), line, column));
    }

    // === Lookahead ===

    /// Returns `true` if the token at `offset` has exactly the text `expected`.
    ///
    /// Always `false` past the end of the stream.
    #[must_use]
    pub fn check_token(&self, offset: usize, expected: &str) -> bool {
        self.peek_token(offset)
            .is_some_and(|token| token.text == expected)
    }

    /// Advance the cursor by `count` tokens.
    pub fn consume_tokens(&mut self, count: usize) {
        self.lexer.consume_tokens(count);
    }

    /// Token at `offset` past the cursor, or `None` past the end.
    #[must_use]
    pub fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.lexer.peek_token(offset)
    }

    /// Line and column of the token at `offset`, or `(0, 0)` past the end.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> (u32, u32) {
        self.peek_token(offset)
            .map_or((0, 0), |token| (token.line, token.column))
    }

    /// A `MalformedAt` result anchored at the token at `offset`.
    ///
    /// When the file ends before `offset`, the anchor falls back to the token
    /// under the cursor, where the malformed declaration starts.
    pub(crate) fn malformed_at(&self, offset: usize, reason: impl Into<String>) -> Production {
        let anchor = if self.peek_token(offset).is_some() { offset } else { 0 };
        let (line, column) = self.position_at(anchor);
        Production::MalformedAt {
            line,
            column,
            reason: reason.into(),
        }
    }

    // === Speculative scans ===

    /// Scan a template parameter list without consuming anything.
    ///
    /// `start` is the offset of the first parameter, just past `<`. Every
    /// parameter is assumed to span two tokens (`type T`) before the next `,`
    /// or the closing `>`.
    #[must_use]
    pub fn parse_template_parameters(&self, start: usize, base_name: &Token) -> TemplateScan {
        self.scan_template_list(start, 2, base_name)
    }

    /// Scan a template argument list without consuming anything.
    ///
    /// `start` is the offset of the first argument, just past `<`. Every
    /// argument is assumed to span one token before the next `,` or the
    /// closing `>`.
    #[must_use]
    pub fn parse_template_arguments(&self, start: usize, base_name: &Token) -> TemplateScan {
        self.scan_template_list(start, 1, base_name)
    }

    fn scan_template_list(&self, start: usize, width: usize, base_name: &Token) -> TemplateScan {
        let mut total = start;
        loop {
            total += width;
            if self.check_token(total, ">") {
                return TemplateScan::Closed { end: total + 1 };
            }
            if !self.check_token(total, ",") {
                debug!(base = %base_name, at = total, "Template list does not close");
                return TemplateScan::Broken { at: total };
            }
            total += 1;
        }
    }
}
