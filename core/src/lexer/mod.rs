//! Turns source text into a flat token stream.
//!
//! Token classes are matched by a `logos` DFA (maximal munch, so `==`/`!=`
//! win over `=`/`!`). The [`Lexer`] wrapper adds what the DFA does not know
//! about: row/column positions and the synthetic end-of-input token.

mod error;
mod token;


pub use error::LexError;
pub use token::{Keyword, Token, TokenKind};

use crate::parser::Span;
use logos::Logos;

/// Tokenize a whole source text.
///
/// On success the last token is always [`TokenKind::End`], positioned at
/// `source.len()`.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let tokens = Lexer::new(source).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Streaming lexer. Yields tokens up to and including the end-of-input token,
/// or stops after the first error.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, TokenKind>,
    position: Position,
    finished: bool,
}

/// Row/column tracking over byte offsets, advanced monotonically.
#[derive(Debug, Clone, Copy)]
struct Position {
    offset: usize,
    row: usize,
    col: usize,
}

impl Position {
    fn start() -> Self {
        Self {
            offset: 0,
            row: 1,
            col: 1,
        }
    }

    fn advance_to(&mut self, source: &str, offset: usize) {
        for c in source[self.offset..offset].chars() {
            if c == '\n' {
                self.row += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.offset = offset;
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
            position: Position::start(),
            finished: false,
        }
    }

    fn token_at(&mut self, kind: TokenKind, range: core::ops::Range<usize>) -> Token<'a> {
        self.position.advance_to(self.source, range.start);
        Token {
            kind,
            text: &self.source[range.clone()],
            span: Span(range),
            row: self.position.row,
            col: self.position.col,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let range = self.inner.span();
                Some(Ok(self.token_at(kind, range)))
            }
            Some(Err(())) => {
                self.finished = true;
                let start = self.inner.span().start;
                let found = self.source[start..].chars().next().unwrap_or('\0');
                let token = self.token_at(TokenKind::End, start..start + found.len_utf8());
                Some(Err(LexError {
                    found,
                    span: token.span,
                    row: token.row,
                    col: token.col,
                }))
            }
            None => {
                self.finished = true;
                let end = self.source.len();
                Some(Ok(self.token_at(TokenKind::End, end..end)))
            }
        }
    }
}
