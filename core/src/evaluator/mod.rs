//! Tree-walking evaluator for Domy programs.
//!
//! The evaluator interprets a parsed [`Program`] and produces a runtime
//! [`Value`]. Every evaluation step yields an [`Outcome`]: a value plus an
//! optional pending `return`/`break`/`continue`. Nodes that evaluate children
//! inspect the tag first and either forward it or reject it, so non-local
//! exits never unwind through the host stack.
//!
//! ## Design Principles
//!
//! - **Never panic**: every malformed program ends in an [`ExecutionError`]
//! - **Stack-safe**: depth tracking bounds recursion through nested calls
//! - **Bounded loops**: an optional iteration budget stops runaway `while`s
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use domy_core::{api::ExecutionOptions, evaluator::Evaluator, parser, stdlib};
//!
//! let arena = Bump::new();
//! let program = parser::parse(&arena, "my x = true; print(!x)").unwrap();
//!
//! let mut out = Vec::new();
//! let mut evaluator = Evaluator::new(ExecutionOptions::default()).with_output(&mut out);
//! evaluator.register_native(&stdlib::PRINT).unwrap();
//! evaluator.run(&program).unwrap();
//! drop(evaluator);
//!
//! assert_eq!(String::from_utf8(out).unwrap(), "false\n");
//! ```

mod error;
mod eval;
mod outcome;


pub use error::{ExecutionError, ExecutionErrorKind, ResourceExceededError, RuntimeError};
pub use eval::Evaluator;
pub use outcome::Outcome;

/// Errors raised while evaluating.
pub type EvalError = ExecutionError;

use crate::{api::ExecutionOptions, parser::Program, stdlib, values::Value};

/// Run a program with the built-ins and default limits, printing to stdout.
pub fn run<'a>(program: &Program<'a>) -> Result<Value<'a>, EvalError> {
    run_with_options(program, ExecutionOptions::default())
}

/// Run a program with the built-ins and custom limits, printing to stdout.
pub fn run_with_options<'a>(
    program: &Program<'a>,
    options: ExecutionOptions,
) -> Result<Value<'a>, EvalError> {
    let mut evaluator = Evaluator::new(options);
    for &native in stdlib::BUILTINS {
        // A fresh global scope cannot already hold a built-in.
        let _ = evaluator.register_native(native);
    }
    evaluator.run(program)
}
