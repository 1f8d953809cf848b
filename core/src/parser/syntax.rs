// Syntax structures shared by the parser, the AST and the evaluator.

use core::{cell::RefCell, fmt, ops::Range};

use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap};

/// Side table mapping AST nodes (by address) to their source spans.
///
/// Keeping spans out of the nodes lets the AST stay plain data that compares
/// structurally, while errors can still point at the offending source.
#[derive(Debug)]
pub struct AnnotatedSource<'a, T> {
    pub source: &'a str,
    spans: RefCell<HashMap<*const T, Span, DefaultHashBuilder, &'a Bump>>,
}

impl<'a, T> AnnotatedSource<'a, T> {
    pub fn new(arena: &'a Bump, source: &'a str) -> Self {
        Self {
            source,
            spans: RefCell::new(HashMap::new_in(arena)),
        }
    }
    pub fn add_span(&self, node: &T, span: Span) {
        let p = node as *const _;
        self.spans.borrow_mut().insert(p, span);
    }
    pub fn span_of(&self, node: &T) -> Option<Span> {
        let p = node as *const _;
        self.spans.borrow().get(&p).cloned()
    }
    pub fn snippet(&self, span: Span) -> &str {
        &self.source[span.0]
    }
}

/// Byte range into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }
    pub fn combine(a: &Span, b: &Span) -> Span {
        Span::new(a.0.start, b.0.end)
    }
    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        &source[self.0.start..self.0.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.0.start, self.0.end)
    }
}

/// Right-associative logical operators, loosest first.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicOp {
    Or,
    Xor,
    And,
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::Or => "|",
            LogicOp::Xor => "^",
            LogicOp::And => "&",
        }
    }

    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicOp::Or => left | right,
            LogicOp::Xor => left ^ right,
            LogicOp::And => left & right,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Neq,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Neq => "!=",
        }
    }
}

/// Non-local exit attached to an evaluation result.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlKind {
    Return,
    Break,
    Continue,
}

impl ControlKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ControlKind::Return => "return",
            ControlKind::Break => "break",
            ControlKind::Continue => "continue",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
