//! Runtime values.
//!
//! The language has a single data type, booleans; everything else a name can
//! be bound to is something callable.

mod native;
mod value;

pub use native::{NativeError, NativeFn, NativeFunction};
pub use value::{Closure, Value};
