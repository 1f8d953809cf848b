use core::fmt;

use crate::parser::FunctionDecl;
use crate::scope_stack::{Capture, ScopeId};
use crate::values::NativeFunction;

/// A value that can be bound to a name. Cheap to copy: functions are
/// references into the AST arena plus a scope id.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Bool(bool),
    /// A user function together with the scope it was declared in.
    Function(Closure<'a>),
    /// A host function such as `print`.
    Native(&'static NativeFunction),
}

/// A `do(...) { ... }` declaration closed over its defining scope.
#[derive(Debug, Clone, Copy)]
pub struct Closure<'a> {
    pub decl: &'a FunctionDecl<'a>,
    pub scope: ScopeId,
}

impl<'a> Value<'a> {
    pub const TRUE: Value<'static> = Value::Bool(true);
    pub const FALSE: Value<'static> = Value::Bool(false);

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Name of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Function(_) => "function",
            Value::Native(_) => "native function",
        }
    }
}

impl Capture for Value<'_> {
    fn captured(&self) -> Option<ScopeId> {
        match self {
            Value::Function(closure) => Some(closure.scope),
            _ => None,
        }
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Booleans compare by value, functions by identity.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => {
                core::ptr::eq(a.decl, b.decl) && a.scope == b.scope
            }
            (Value::Native(a), Value::Native(b)) => core::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl Eq for Value<'_> {}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(closure) => write!(f, "{}", closure.decl),
            Value::Native(native) => write!(f, "<native {}>", native.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Block;
    use crate::stdlib;

    #[test]
    fn test_bool_display() {
        assert_eq!(Value::TRUE.to_string(), "true");
        assert_eq!(Value::from(false).to_string(), "false");
    }

    #[test]
    fn test_function_display_renders_source() {
        let decl = FunctionDecl {
            params: &["a", "b"],
            body: Block { statements: &[] },
        };
        let value = Value::Function(Closure {
            decl: &decl,
            scope: ScopeId::ROOT,
        });
        assert_eq!(value.to_string(), "do(a, b) {}");
        assert_eq!(value.kind_name(), "function");
    }

    #[test]
    fn test_only_functions_capture_scopes() {
        let decl = FunctionDecl {
            params: &[],
            body: Block { statements: &[] },
        };
        let value = Value::Function(Closure {
            decl: &decl,
            scope: ScopeId::ROOT,
        });
        assert_eq!(value.captured(), Some(ScopeId::ROOT));
        assert_eq!(Value::TRUE.captured(), None);
        assert_eq!(Value::Native(&stdlib::PRINT).captured(), None);
    }

    #[test]
    fn test_native_display() {
        assert_eq!(Value::Native(&stdlib::PRINT).to_string(), "<native print>");
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let decl = FunctionDecl {
            params: &[],
            body: Block { statements: &[] },
        };
        let twin = decl.clone();
        let a = Value::Function(Closure {
            decl: &decl,
            scope: ScopeId::ROOT,
        });
        let b = Value::Function(Closure {
            decl: &twin,
            scope: ScopeId::ROOT,
        });
        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_ne!(a, Value::TRUE);
        assert_eq!(Value::Native(&stdlib::PRINT), Value::Native(&stdlib::PRINT));
    }
}
