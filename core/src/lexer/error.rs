use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;

/// A character that matches no token rule. Lexing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character `{found}`")]
pub struct LexError {
    pub found: char,
    pub span: Span,
    pub row: usize,
    pub col: usize,
}

impl LexError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            message: format!("Unexpected character `{}`", self.found.escape_debug()),
            span: self.span.clone(),
            related: Vec::new(),
            help: vec![
                "Only names, `true`/`false`, operators `? : ! | ^ & == != =` and `( ) { } ,` are valid"
                    .to_string(),
            ],
            code: Some("L001".to_string()),
        }
    }
}
