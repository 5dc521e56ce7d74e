//! Tokenization of Epoch source text.
//!
//! The parser only needs a finite, replayable sequence of positioned tokens
//! that it can peek into by offset and consume in bulk. `LexSession` is that
//! sequence: the whole file is tokenized up front with logos, then a cursor
//! walks the resulting vector.
//!
//! Positions are zero-based lines and zero-based character columns, the same
//! coordinates a host editor uses to place its caret.

use std::path::{Path, PathBuf};

use logos::{Filter, Logos};
use serde::Serialize;

/// Raw token from logos, before positions are attached.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"0x[0-9A-Fa-f]+")]
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLiteral,

    // `<` and `>` stay single so template lists close one token at a time.
    #[token("->")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("++")]
    #[token("--")]
    #[regex(r"[(){}\[\]<>,.:;=|&!+\-*/%^~?@]")]
    Punctuation,

    /// A `/*` with no closing `*/`; terminated block comments are skipped.
    #[token("/*", block_comment)]
    UnterminatedComment,
}

/// Skip a block comment, or swallow the rest of the input if it never closes.
fn block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> Filter<()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Filter::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            Filter::Emit(())
        }
    }
}

/// Broad classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Identifier or keyword
    Identifier,
    /// Integer, hex or real literal
    Number,
    /// Double-quoted string literal, quotes included
    StringLiteral,
    /// Operator or delimiter
    Punctuation,
    /// Text no lexical rule accepts
    Unknown,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Identifier => Self::Identifier,
            RawToken::Number => Self::Number,
            RawToken::StringLiteral => Self::StringLiteral,
            RawToken::Punctuation => Self::Punctuation,
            RawToken::UnterminatedComment => Self::Unknown,
        }
    }
}

/// A positioned token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Classification
    pub kind: TokenKind,
    /// Source text of the token
    pub text: String,
    /// Zero-based line
    pub line: u32,
    /// Zero-based column, in characters
    pub column: u32,
}

impl Token {
    /// Returns `true` for identifier tokens.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Maps byte offsets to line/column positions.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    #[allow(clippy::cast_possible_truncation)] // Source files never exceed u32 lines
    fn position(&self, offset: usize) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let column = self.source[start..offset].chars().count();
        (line as u32, column as u32)
    }
}

/// Tokenize a whole source text.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let index = LineIndex::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(raw) = lexer.next() {
        let kind = match raw {
            Ok(raw) => TokenKind::from(raw),
            Err(()) => TokenKind::Unknown,
        };
        let (line, column) = index.position(lexer.span().start);
        tokens.push(Token {
            kind,
            text: lexer.slice().to_string(),
            line,
            column,
        });
    }

    tokens
}

/// A cursor over one file's tokens.
#[derive(Debug, Clone)]
pub struct LexSession {
    file: PathBuf,
    tokens: Vec<Token>,
    cursor: usize,
}

impl LexSession {
    /// Tokenize `source`, which was read from `file`.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, source: &str) -> Self {
        Self::from_tokens(file, tokenize(source))
    }

    /// Wrap an already tokenized stream.
    #[must_use]
    pub fn from_tokens(file: impl Into<PathBuf>, tokens: Vec<Token>) -> Self {
        Self {
            file: file.into(),
            tokens,
            cursor: 0,
        }
    }

    /// Path of the file the tokens came from.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns `true` once every token has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Number of tokens not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.cursor)
    }

    /// Token `offset` positions past the cursor, if any.
    #[must_use]
    pub fn peek_token(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor.checked_add(offset)?)
    }

    /// Advance the cursor by `count` tokens, stopping at the end.
    pub fn consume_tokens(&mut self, count: usize) {
        self.cursor = self.cursor.saturating_add(count).min(self.tokens.len());
    }
}
