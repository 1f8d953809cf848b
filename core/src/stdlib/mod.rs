//! Built-in functions seeded into the global scope.

use std::io::Write;

use crate::values::{NativeError, NativeFunction, Value};

/// `print(x)`: writes the printed form of `x` and a newline, returns `true`.
pub static PRINT: NativeFunction = NativeFunction::new("print", 1, print);

/// Every built-in, in registration order.
pub static BUILTINS: &[&NativeFunction] = &[&PRINT];

fn print<'a>(out: &mut dyn Write, args: &[Value<'a>]) -> Result<Value<'a>, NativeError> {
    for arg in args {
        writeln!(out, "{}", arg)?;
    }
    out.flush()?;
    Ok(Value::TRUE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_writes_line_and_returns_true() {
        let mut out = Vec::new();
        let result = PRINT.call(&mut out, &[Value::FALSE]).unwrap();
        assert_eq!(result, Value::TRUE);
        assert_eq!(String::from_utf8(out).unwrap(), "false\n");
    }

    #[test]
    fn test_builtins_lists_print() {
        assert!(BUILTINS.iter().any(|b| b.name == "print" && b.arity == 1));
    }
}
