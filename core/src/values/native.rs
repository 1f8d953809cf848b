//! Host functions callable from scripts.

use std::io::Write;

use thiserror::Error;

use super::Value;

/// Signature of a host function.
///
/// Arguments are already evaluated and their count matches `arity`. Output
/// goes through `out` so embedders and tests can capture it.
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use domy_core::values::{NativeError, NativeFunction, Value};
///
/// fn both<'a>(_out: &mut dyn Write, args: &[Value<'a>]) -> Result<Value<'a>, NativeError> {
///     let a = args[0].as_bool().ok_or_else(|| NativeError::message("expected a boolean"))?;
///     let b = args[1].as_bool().ok_or_else(|| NativeError::message("expected a boolean"))?;
///     Ok(Value::Bool(a && b))
/// }
///
/// static BOTH: NativeFunction = NativeFunction::new("both", 2, both);
/// assert_eq!(BOTH.arity, 2);
/// ```
pub type NativeFn = for<'a> fn(out: &mut dyn Write, args: &[Value<'a>]) -> Result<Value<'a>, NativeError>;

/// A named host function with a fixed arity.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self { name, arity, func }
    }

    pub fn call<'a>(&self, out: &mut dyn Write, args: &[Value<'a>]) -> Result<Value<'a>, NativeError> {
        debug_assert_eq!(args.len(), self.arity, "arity is checked by the evaluator");
        (self.func)(out, args)
    }
}

/// Failure reported by a host function.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl NativeError {
    pub fn message(message: impl Into<String>) -> Self {
        NativeError::Message(message.into())
    }
}
