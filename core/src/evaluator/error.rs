//! Runtime evaluation errors.
//!
//! # Error Categories
//!
//! - **Runtime errors**: violations of the language rules found while
//!   evaluating (undefined names, redeclarations, arity mismatches, control
//!   words used where a plain value is required).
//!
//! - **Resource exceeded errors**: evaluation depth or loop iteration limits.
//!   These are reported separately so embedders can tell a broken program
//!   from a program that ran too long.

use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::{ControlKind, Span};

/// Runtime evaluation error, located at the node that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub span: Span,
    /// Text of the program `span` points into, when it is known. A closure
    /// declared by an earlier run fails inside that run's source.
    pub program_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionErrorKind {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceededError),
}

/// Language rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{name} is undefined")]
    UndefinedIdentifier { name: String },

    #[error("{name} is already defined")]
    AlreadyDefined { name: String },

    #[error("{name} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("{name} is a {kind}, not a function")]
    NotCallable { name: String, kind: &'static str },

    /// `break`/`continue` outside a loop, or any control word escaping to the
    /// top level.
    #[error("control word `{kind}` not allowed here")]
    ControlOutsideContext { kind: ControlKind },

    #[error("reserved control flow not allowed inside a comparison")]
    ControlInComparison,

    #[error("reserved control flow not allowed inside a condition")]
    ControlInCondition,

    #[error("reserved control flow not allowed in the value bound to {name}")]
    ControlInBinding { name: String },

    #[error("reserved control flow not allowed in a function argument")]
    ControlInArgument,

    #[error("expected a boolean, found a {found}")]
    NotABoolean { found: &'static str },

    #[error("{name} failed: {message}")]
    NativeFailed { name: String, message: String },
}

/// Resource limits. Not recoverable by the program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceExceededError {
    #[error("Evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },

    #[error("Evaluation stack overflow: more than {budget} bytes of stack used at depth {depth}")]
    StackExhausted { depth: usize, budget: usize },

    #[error("Loop iteration limit of {max_iterations} exceeded")]
    IterationLimit { max_iterations: usize },
}

impl RuntimeError {
    /// Stable diagnostic code.
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedIdentifier { .. } => "R001",
            RuntimeError::AlreadyDefined { .. } => "R002",
            RuntimeError::ArityMismatch { .. } => "R003",
            RuntimeError::NotCallable { .. } => "R004",
            RuntimeError::ControlOutsideContext { .. } => "R005",
            RuntimeError::ControlInComparison => "R006",
            RuntimeError::ControlInCondition => "R007",
            RuntimeError::ControlInBinding { .. } => "R008",
            RuntimeError::ControlInArgument => "R009",
            RuntimeError::NotABoolean { .. } => "R010",
            RuntimeError::NativeFailed { .. } => "R011",
        }
    }

    fn help(&self) -> Vec<String> {
        match self {
            RuntimeError::UndefinedIdentifier { name } => {
                vec![format!("Declare it first with `my {} = ...`", name)]
            }
            RuntimeError::AlreadyDefined { name } => vec![format!(
                "Use `{} = ...` to change the existing binding",
                name
            )],
            RuntimeError::ControlOutsideContext { kind } => match kind {
                ControlKind::Return => vec!["`return` is only allowed inside a function".to_string()],
                _ => vec![format!("`{}` is only allowed inside a while loop", kind)],
            },
            _ => vec![],
        }
    }
}

impl ExecutionError {
    pub fn new(kind: impl Into<ExecutionErrorKind>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
            program_source: None,
        }
    }

    /// Attach the text of the program the span points into.
    pub fn in_source(mut self, source: &str) -> Self {
        self.program_source = Some(source.to_string());
        self
    }

    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self.kind, ExecutionErrorKind::ResourceExceeded(_))
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ExecutionErrorKind::Runtime(err) => (Some(err.code().to_string()), err.help()),
            ExecutionErrorKind::ResourceExceeded(_) => (None, vec![]),
        };
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: vec![],
            help,
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = RuntimeError::AlreadyDefined {
            name: "x".to_string(),
        };
        assert_eq!(err.to_string(), "x is already defined");

        let err = RuntimeError::UndefinedIdentifier {
            name: "x".to_string(),
        };
        assert_eq!(err.to_string(), "x is undefined");

        let err = RuntimeError::ControlOutsideContext {
            kind: ControlKind::Break,
        };
        assert_eq!(err.to_string(), "control word `break` not allowed here");
    }

    #[test]
    fn test_runtime_diagnostic() {
        let err = ExecutionError::new(RuntimeError::ControlInComparison, Span(3..8));
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code, Some("R006".to_string()));
        assert_eq!(diagnostic.span, Span(3..8));
        assert!(!err.is_resource_exceeded());
    }

    #[test]
    fn test_resource_diagnostic_has_no_code() {
        let err = ExecutionError::new(
            ResourceExceededError::IterationLimit { max_iterations: 5 },
            Span(0..1),
        );
        assert!(err.is_resource_exceeded());
        assert_eq!(err.to_diagnostic().code, None);
        assert_eq!(err.to_string(), "Loop iteration limit of 5 exceeded");
    }

    #[test]
    fn test_stack_exhausted_message() {
        let err = ExecutionError::new(
            ResourceExceededError::StackExhausted {
                depth: 120,
                budget: 4096,
            },
            Span(0..1),
        );
        assert!(err.is_resource_exceeded());
        assert_eq!(
            err.to_string(),
            "Evaluation stack overflow: more than 4096 bytes of stack used at depth 120"
        );
    }
}
