//! Public error types for the Domy API.
//!
//! This module defines the stable error types exposed to library users.
//! Internal errors are converted to these public types at API boundaries.

use core::fmt;

use thiserror::Error as ThisError;

use crate::evaluator::{ExecutionError, ExecutionErrorKind};
use crate::parser::{ParseError, Span};

/// Public error type for all Domy operations.
///
/// Each variant keeps the source text so the error can be rendered on its
/// own.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The program could not be tokenized or parsed.
    #[error("Compilation failed with {} error(s)", diagnostics.len())]
    Compilation {
        diagnostics: Vec<Diagnostic>,
        src: String,
    },

    /// The program broke a language rule while running.
    #[error("Runtime error: {}", diagnostic.message)]
    Runtime { diagnostic: Diagnostic, src: String },

    /// Resource limits exceeded (stack depth, loop iterations).
    #[error("Resource limit exceeded: {0}")]
    ResourceExceeded(String),
}

impl Error {
    pub fn from_parse(err: &ParseError, src: &str) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            src: src.to_string(),
        }
    }

    /// `src` is used when the error does not carry its own program text.
    pub fn from_execution(err: &ExecutionError, src: &str) -> Self {
        match &err.kind {
            ExecutionErrorKind::Runtime(_) => Error::Runtime {
                diagnostic: err.to_diagnostic(),
                src: err.program_source.as_deref().unwrap_or(src).to_string(),
            },
            ExecutionErrorKind::ResourceExceeded(e) => Error::ResourceExceeded(e.to_string()),
        }
    }

    /// Diagnostics carried by this error, if any.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Compilation { diagnostics, .. } => diagnostics,
            Error::Runtime { diagnostic, .. } => core::slice::from_ref(diagnostic),
            Error::ResourceExceeded(_) => &[],
        }
    }

    /// Source text the diagnostics point into.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Error::Compilation { src, .. } | Error::Runtime { src, .. } => Some(src),
            Error::ResourceExceeded(_) => None,
        }
    }
}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Suggestions for fixing the issue.
    pub help: Vec<String>,

    /// Optional error code (e.g., "P001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the program cannot run.
    Error,
    /// Warning - suspicious code that might be wrong.
    Warning,
    /// Info - informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "opened here").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    /// Source location of the related information.
    pub span: Span,

    /// Message explaining the relevance.
    pub message: String,
}
