mod ast;
pub mod error;
pub mod parser;
mod syntax;

// Re-export the parser entry points for external use
pub use parser::Parser;
pub use parser::parse;
pub use parser::parse_with_max_depth;

pub use ast::{Block, Callee, Expr, FunctionDecl, Program};
pub use error::{ParseError, ParseErrorKind};
pub use syntax::AnnotatedSource;
pub use syntax::{ComparisonOp, ControlKind, LogicOp, Span};


#[cfg(test)]
mod precedence_test;
