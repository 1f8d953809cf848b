//! Core of the Domy language: lexer, parser, scope arena and the
//! tree-walking evaluator, plus a small embedding API.
//!
//! The pipeline is strictly staged:
//!
//! ```text
//! source --lexer--> tokens --parser--> Program (AST) --evaluator--> Value
//! ```

pub mod api;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod scope_stack;
pub mod stdlib;
pub mod values;

pub use parser::Span;
