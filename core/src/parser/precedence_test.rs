use bumpalo::Bump;
use pretty_assertions::assert_eq;

use super::{Callee, Expr, parse};

// We test precedence by rendering each tree fully parenthesized, ignoring
// the grouping parentheses that were written in the source. Two sources that
// group the same way yield the same shape.
fn shape(expr: &Expr<'_>) -> String {
    match expr {
        Expr::Terminal(b) => b.to_string(),
        Expr::Ident(name) => name.to_string(),
        Expr::Not(operand) => format!("(!{})", shape(operand)),
        Expr::Logic { op, left, right } => {
            format!("({} {} {})", shape(left), op.symbol(), shape(right))
        }
        Expr::Comparison { op, left, right } => {
            format!("({} {} {})", shape(left), op.symbol(), shape(right))
        }
        Expr::Ternary {
            cond,
            then_branch,
            else_branch,
        } => format!(
            "({} ? {} : {})",
            shape(cond),
            shape(then_branch),
            shape(else_branch)
        ),
        Expr::Grouped(inner) => shape(inner),
        Expr::Invocation {
            callee: Callee::Name(name),
            args,
        } => format!(
            "{}({})",
            name,
            args.iter().map(|a| shape(a)).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

fn first<'a>(arena: &'a Bump, source: &'a str) -> String {
    let program = parse(arena, source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e));
    assert_eq!(program.statements.len(), 1, "source: {source}");
    shape(program.statements[0])
}

fn same(left: &str, right: &str) {
    let arena = Bump::new();
    assert_eq!(first(&arena, left), first(&arena, right));
}

#[test]
fn test_and_is_right_associative() {
    same("a & b & c", "a & (b & c)");
    same("a & b & c & d", "a & (b & (c & d))");
}

#[test]
fn test_xor_is_right_associative() {
    same("a ^ b ^ c", "a ^ (b ^ c)");
}

#[test]
fn test_or_is_right_associative() {
    same("a | b | c", "a | (b | c)");
}

#[test]
fn test_and_binds_tighter_than_xor() {
    same("a ^ b & c", "a ^ (b & c)");
    same("a & b ^ c", "(a & b) ^ c");
}

#[test]
fn test_xor_binds_tighter_than_or() {
    same("a | b ^ c", "a | (b ^ c)");
    same("a ^ b | c", "(a ^ b) | c");
}

#[test]
fn test_not_binds_tightest() {
    same("!a & b", "(!a) & b");
    same("a | !b", "a | (!b)");
}

#[test]
fn test_not_applies_to_a_single_term() {
    let arena = Bump::new();
    assert_eq!(first(&arena, "!(a | b)"), "(!(a | b))");
}

#[test]
fn test_comparison_is_looser_than_logic() {
    same("a | b == c & d", "(a | b) == (c & d)");
    same("a != b ^ c", "a != (b ^ c)");
}

#[test]
fn test_ternary_is_looser_than_comparison() {
    same("a == b ? c : d", "(a == b) ? c : d");
    same("a ? b | c : d & e", "a ? (b | c) : (d & e)");
}

#[test]
fn test_grouping_is_kept_in_the_tree() {
    let arena = Bump::new();
    let program = parse(&arena, "(a)").unwrap();
    assert!(matches!(program.statements[0], Expr::Grouped(Expr::Ident("a"))));
}

#[test]
fn test_invocation_arguments_are_full_expressions() {
    same("f(a & b, c ? d : e)", "f((a & b), (c ? d : e))");
}

#[test]
fn test_display_round_trips() {
    let sources = [
        "my f = do(a, b) { return a & b; }",
        "x = (true == false) ? y : !z",
        "while i { i = false; continue; }",
        "{ my t = true; print(t ^ t | t); }",
        "do() { return x; }()",
        "return",
    ];
    for source in sources {
        let arena = Bump::new();
        let program = parse(&arena, source).unwrap();
        let rendered = program
            .statements
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let reparsed = parse(&arena, arena.alloc_str(&rendered)).unwrap();
        assert_eq!(program.statements, reparsed.statements, "source: {source}");
    }
}
