use core::fmt;

use crate::parser::{ComparisonOp, ControlKind, LogicOp, syntax::AnnotatedSource};

/// A parsed program: the top-level statements plus their span table.
#[derive(Debug)]
pub struct Program<'a> {
    pub source: &'a str,
    pub statements: &'a [&'a Expr<'a>],
    pub ann: &'a AnnotatedSource<'a, Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// `true` / `false`
    Terminal(bool),
    Ident(&'a str),
    /// `!operand`
    Not(&'a Expr<'a>),
    Logic {
        op: LogicOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Comparison {
        op: ComparisonOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Ternary {
        cond: &'a Expr<'a>,
        then_branch: &'a Expr<'a>,
        else_branch: &'a Expr<'a>,
    },
    Grouped(&'a Expr<'a>),
    /// `my name = value`
    Declare {
        name: &'a str,
        value: &'a Expr<'a>,
    },
    /// `name = value`
    Assign {
        name: &'a str,
        value: &'a Expr<'a>,
    },
    Invocation {
        callee: Callee<'a>,
        args: &'a [&'a Expr<'a>],
    },
    Function(&'a FunctionDecl<'a>),
    Block(&'a Block<'a>),
    While {
        cond: &'a Expr<'a>,
        body: &'a Block<'a>,
    },
    /// `return [value]`, `break`, `continue`
    Control {
        kind: ControlKind,
        value: Option<&'a Expr<'a>>,
    },
}

/// `do(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl<'a> {
    pub params: &'a [&'a str],
    pub body: Block<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    pub statements: &'a [&'a Expr<'a>],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee<'a> {
    /// `name(args)`
    Name(&'a str),
    /// `do(params) { ... }(args)`
    Immediate(&'a FunctionDecl<'a>),
}

// Display renders canonical source text that parses back to the same tree.

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Terminal(value) => write!(f, "{}", value),
            Expr::Ident(name) => f.write_str(name),
            Expr::Not(operand) => write!(f, "!{}", operand),
            Expr::Logic { op, left, right } => write!(f, "{} {} {}", left, op.symbol(), right),
            Expr::Comparison { op, left, right } => {
                write!(f, "{} {} {}", left, op.symbol(), right)
            }
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "{} ? {} : {}", cond, then_branch, else_branch),
            Expr::Grouped(inner) => write!(f, "({})", inner),
            Expr::Declare { name, value } => write!(f, "my {} = {}", name, value),
            Expr::Assign { name, value } => write!(f, "{} = {}", name, value),
            Expr::Invocation { callee, args } => {
                match callee {
                    Callee::Name(name) => f.write_str(name)?,
                    Callee::Immediate(decl) => write!(f, "{}", decl)?,
                }
                f.write_str("(")?;
                write_list(f, args.iter())?;
                f.write_str(")")
            }
            Expr::Function(decl) => write!(f, "{}", decl),
            Expr::Block(block) => write!(f, "{}", block),
            Expr::While { cond, body } => write!(f, "while {} {}", cond, body),
            Expr::Control { kind, value } => match value {
                Some(value) => write!(f, "{} {}", kind, value),
                None => write!(f, "{}", kind),
            },
        }
    }
}

impl fmt::Display for FunctionDecl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("do(")?;
        write_list(f, self.params.iter())?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for statement in self.statements {
            write!(f, "{}; ", statement)?;
        }
        f.write_str("}")
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
