use crate::parser::ControlKind;
use crate::values::Value;

/// Result of evaluating one node: a value, possibly tagged with a pending
/// `return`, `break` or `continue`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome<'a> {
    pub value: Value<'a>,
    pub control: Option<ControlKind>,
}

impl<'a> Outcome<'a> {
    pub fn plain(value: Value<'a>) -> Self {
        Self {
            value,
            control: None,
        }
    }

    pub fn tagged(value: Value<'a>, kind: ControlKind) -> Self {
        Self {
            value,
            control: Some(kind),
        }
    }

    pub fn is_tagged(&self) -> bool {
        self.control.is_some()
    }
}

impl<'a> From<Value<'a>> for Outcome<'a> {
    fn from(value: Value<'a>) -> Self {
        Outcome::plain(value)
    }
}
