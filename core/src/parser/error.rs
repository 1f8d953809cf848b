use thiserror::Error;

use crate::api::{Diagnostic, RelatedInfo, Severity};
use crate::lexer::LexError;
use crate::parser::Span;

/// Parser error with the position of the offending token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at row {row}, column {col}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub row: usize,
    pub col: usize,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// Unexpected token
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    /// Input ended inside `(...)` or `{...}`
    #[error("unclosed delimiter `{delimiter}`")]
    UnclosedDelimiter { delimiter: char, open: Span },

    /// Left side of `=` is not a plain name
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    /// Reserved word outside the position it is allowed in
    #[error("reserved word `{word}` cannot be used here")]
    ReservedWord { word: String },

    /// Maximum nesting depth exceeded
    #[error("nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },

    /// The source could not be tokenized
    #[error("{0}")]
    Lex(LexError),
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, row: usize, col: usize) -> Self {
        Self {
            kind,
            span,
            row,
            col,
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        if let ParseErrorKind::Lex(err) = &self.kind {
            return err.to_diagnostic();
        }

        let (message, code, help, related) = match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => (
                format!("Expected {}, found {}", expected, found),
                "P001",
                vec![],
                vec![],
            ),
            ParseErrorKind::UnclosedDelimiter { delimiter, open } => (
                format!("Unclosed delimiter '{}'", delimiter),
                "P002",
                vec!["Add the missing closing delimiter".to_string()],
                vec![RelatedInfo {
                    span: open.clone(),
                    message: "opened here".to_string(),
                }],
            ),
            ParseErrorKind::InvalidAssignmentTarget => (
                "Invalid assignment target".to_string(),
                "P003",
                vec!["Only a plain name can appear on the left of `=`".to_string()],
                vec![],
            ),
            ParseErrorKind::ReservedWord { word } => (
                format!("Reserved word `{}` cannot be used here", word),
                "P004",
                if word == "my" {
                    vec!["`my` can only begin a declaration: `my name = value`".to_string()]
                } else {
                    vec![]
                },
                vec![],
            ),
            ParseErrorKind::MaxDepthExceeded { max_depth } => (
                format!(
                    "Expression nesting depth exceeds maximum of {} levels",
                    max_depth
                ),
                "P005",
                vec!["Reduce nesting or simplify the expression".to_string()],
                vec![],
            ),
            ParseErrorKind::Lex(_) => unreachable!("handled above"),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.span.clone(),
            related,
            help,
            code: Some(code.to_string()),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let (span, row, col) = (err.span.clone(), err.row, err.col);
        ParseError::new(ParseErrorKind::Lex(err), span, row, col)
    }
}
