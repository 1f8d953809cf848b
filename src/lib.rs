//! Domy - a tiny boolean scripting language
//!
//! # Overview
//!
//! Domy programs manipulate booleans only. They have block-scoped
//! declarations (`my x = true`), reassignment, the operators `! & ^ | == !=`,
//! a ternary `? :`, `while` loops with `break`/`continue`, and first-class
//! functions (`do(a, b) { return a & b }`) that close over the scope they are
//! declared in. A single built-in, `print`, writes a value on its own line.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use domy::{Engine, EngineOptions};
//!
//! let engine = Engine::with_stdlib(EngineOptions::default());
//! let arena = Bump::new();
//!
//! let value = engine
//!     .run(&arena, "my both = do(a, b) { return a & b }; both(true, false)")
//!     .unwrap();
//! assert_eq!(value.as_bool(), Some(false));
//! ```
//!
//! # Errors
//!
//! Every failure is reported as an [`Error`] carrying [`Diagnostic`]s that
//! point into the source. [`render_error_to_string`] and friends format them
//! with source snippets.

// Re-export public API from domy_core
pub use domy_core::api::{
    Diagnostic, Engine, EngineOptions, EnvironmentBuilder, Error, ExecutionOptions, ParserOptions,
    RelatedInfo, Session, Severity,
};

// Re-export commonly used types and values
pub use domy_core::Span;
pub use domy_core::parser::{self, Program};
pub use domy_core::stdlib;
pub use domy_core::values::{self, NativeError, NativeFn, NativeFunction, Value};

// Re-export errors
pub use domy_core::evaluator::EvalError;
pub use domy_core::lexer::LexError;
pub use domy_core::parser::ParseError;

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
