//! Recursive-descent parser over the token stream.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! statement  = "my" NAME "=" statement | NAME "=" statement | expression
//! expression = block | test [ "?" test ":" test ]
//! test       = or [ ("==" | "!=") or ]
//! or         = xor [ "|" or ]
//! xor        = and [ "^" xor ]
//! and        = not [ "&" and ]
//! not        = "!" term | term
//! term       = "true" | "false" | "(" expression ")"
//!            | "return" [expression] | "continue" | "break"
//!            | "while" expression block
//!            | "do" arg_list block [inv_list]
//!            | NAME inv_list | NAME
//! ```
//!
//! Every decision is made on the current token plus at most one token of
//! lookahead. The first mismatch aborts parsing.

use bumpalo::Bump;

use crate::lexer::{self, Keyword, Token, TokenKind};
use crate::parser::{
    AnnotatedSource, ComparisonOp, ControlKind, LogicOp, ParseError, ParseErrorKind, Span,
    ast::{Block, Callee, Expr, FunctionDecl, Program},
};

/// Default limit on nested productions (statements, parentheses, blocks).
/// Each level costs several host frames, so the default stays small enough
/// for a 2 MiB thread in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tokenize and parse a source text with the default nesting limit.
pub fn parse<'a>(arena: &'a Bump, source: &'a str) -> Result<Program<'a>, ParseError> {
    parse_with_max_depth(arena, source, DEFAULT_MAX_DEPTH)
}

/// Tokenize and parse a source text with a custom nesting limit.
pub fn parse_with_max_depth<'a>(
    arena: &'a Bump,
    source: &'a str,
    max_depth: usize,
) -> Result<Program<'a>, ParseError> {
    let tokens = lexer::tokenize(source)?;
    Parser::new(arena, source, tokens, max_depth).parse_program()
}

pub struct Parser<'a> {
    arena: &'a Bump,
    ann: &'a AnnotatedSource<'a, Expr<'a>>,
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// End offset of the last consumed token.
    prev_end: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with the end-of-input token, as produced by
    /// [`lexer::tokenize`].
    pub fn new(arena: &'a Bump, source: &'a str, tokens: Vec<Token<'a>>, max_depth: usize) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.is(TokenKind::End)),
            "token stream must end with the end-of-input token"
        );
        Self {
            arena,
            ann: arena.alloc(AnnotatedSource::new(arena, source)),
            tokens,
            pos: 0,
            prev_end: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Parse statements until the end-of-input token.
    pub fn parse_program(mut self) -> Result<Program<'a>, ParseError> {
        let mut statements = Vec::new();
        while !self.peek().is(TokenKind::End) {
            statements.push(self.statement()?);
        }
        tracing::debug!(statements = statements.len(), "parsed program");
        Ok(Program {
            source: self.ann.source,
            statements: self.arena.alloc_slice_copy(&statements),
            ann: self.ann,
        })
    }

    // ------------------------------------------------------------------
    // Cursor

    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.pos]
    }

    /// Token `n` positions ahead, clamped to the end-of-input token.
    fn peek_at(&self, n: usize) -> &Token<'a> {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.tokens[self.pos].clone();
        if !token.is(TokenKind::End) {
            self.pos += 1;
        }
        self.prev_end = token.span.0.end;
        token
    }

    fn error_at(&self, token: &Token<'a>, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, token.span.clone(), token.row, token.col)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = self.peek();
        let kind = match found.kind {
            TokenKind::Reserved(Keyword::My) => ParseErrorKind::ReservedWord {
                word: found.text.to_string(),
            },
            _ => ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: found.describe(),
            },
        };
        self.error_at(found, kind)
    }

    /// Consume a closing delimiter, reporting the opening one if input ended.
    fn expect_close(&mut self, kind: TokenKind, open: &Token<'a>) -> Result<Token<'a>, ParseError> {
        if self.peek().is(kind) {
            return Ok(self.advance());
        }
        if self.peek().is(TokenKind::End) {
            let delimiter = open.text.chars().next().unwrap_or('(');
            return Err(self.error_at(
                self.peek(),
                ParseErrorKind::UnclosedDelimiter {
                    delimiter,
                    open: open.span.clone(),
                },
            ));
        }
        Err(self.unexpected(kind.describe()))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token<'a>, ParseError> {
        if self.peek().is(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_name(&mut self, expected: &str) -> Result<&'a str, ParseError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Name => Ok(self.advance().text),
            TokenKind::Reserved(keyword) => Err(self.error_at(
                token,
                ParseErrorKind::ReservedWord {
                    word: keyword.to_string(),
                },
            )),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn alloc(&self, expr: Expr<'a>, start: usize) -> &'a Expr<'a> {
        let expr = self.arena.alloc(expr);
        self.ann.add_span(expr, Span::new(start, self.prev_end));
        expr
    }

    /// Run a nested production, enforcing the depth limit.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error_at(
                self.peek(),
                ParseErrorKind::MaxDepthExceeded {
                    max_depth: self.max_depth,
                },
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ------------------------------------------------------------------
    // Productions

    fn statement(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        self.nested(|p| p.statement_inner())
    }

    fn statement_inner(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        let first = self.peek().clone();
        let start = first.span.0.start;

        if first.is_keyword(Keyword::My) {
            self.advance();
            let name = self.expect_name("a name after `my`")?;
            self.expect(TokenKind::Assign, "`=` after the declared name")?;
            let value = self.statement()?;
            return Ok(self.alloc(Expr::Declare { name, value }, start));
        }

        if first.is(TokenKind::Name) && self.peek_at(1).is(TokenKind::Assign) {
            let name = self.advance().text;
            self.advance();
            let value = self.statement()?;
            return Ok(self.alloc(Expr::Assign { name, value }, start));
        }

        let expr = self.expression()?;
        if self.peek().is(TokenKind::Assign) {
            return Err(ParseError::new(
                ParseErrorKind::InvalidAssignmentTarget,
                Span::new(start, self.prev_end),
                first.row,
                first.col,
            ));
        }
        Ok(expr)
    }

    fn expression(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        self.nested(|p| p.expression_inner())
    }

    fn expression_inner(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        let start = self.peek().span.0.start;
        if self.peek().is(TokenKind::LBrace) {
            let block = self.block()?;
            return Ok(self.alloc(Expr::Block(block), start));
        }

        let cond = self.test()?;
        if !self.peek().is_op("?") {
            return Ok(cond);
        }
        self.advance();
        let then_branch = self.test()?;
        if !self.peek().is_op(":") {
            return Err(self.unexpected("`:` in ternary expression"));
        }
        self.advance();
        let else_branch = self.test()?;
        Ok(self.alloc(
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            },
            start,
        ))
    }

    fn test(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        let start = self.peek().span.0.start;
        let left = self.or()?;
        if !self.peek().is(TokenKind::Comparison) {
            return Ok(left);
        }
        let op = match self.advance().text {
            "==" => ComparisonOp::Eq,
            _ => ComparisonOp::Neq,
        };
        let right = self.or()?;
        Ok(self.alloc(Expr::Comparison { op, left, right }, start))
    }

    fn or(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        self.logic(LogicOp::Or)
    }

    /// `or`, `xor` and `and` share one shape: operands of the next tighter
    /// level separated by the operator. Chains group to the right, so
    /// `a | b | c` is `a | (b | c)`. Long chains do not nest the parser.
    fn logic(&mut self, op: LogicOp) -> Result<&'a Expr<'a>, ParseError> {
        let start = self.peek().span.0.start;
        let first = self.logic_operand(op)?;
        let mut rest = Vec::new();
        while self.peek().is_op(op.symbol()) {
            self.advance();
            let operand_start = self.peek().span.0.start;
            rest.push((operand_start, self.logic_operand(op)?));
        }

        let Some((_, mut right)) = rest.pop() else {
            return Ok(first);
        };
        while let Some((operand_start, left)) = rest.pop() {
            right = self.alloc(Expr::Logic { op, left, right }, operand_start);
        }
        Ok(self.alloc(
            Expr::Logic {
                op,
                left: first,
                right,
            },
            start,
        ))
    }

    fn logic_operand(&mut self, op: LogicOp) -> Result<&'a Expr<'a>, ParseError> {
        match op {
            LogicOp::Or => self.logic(LogicOp::Xor),
            LogicOp::Xor => self.logic(LogicOp::And),
            LogicOp::And => self.not(),
        }
    }

    fn not(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        if !self.peek().is(TokenKind::Unary) {
            return self.term();
        }
        let start = self.advance().span.0.start;
        let operand = self.term()?;
        Ok(self.alloc(Expr::Not(operand), start))
    }

    fn term(&mut self) -> Result<&'a Expr<'a>, ParseError> {
        let token = self.peek().clone();
        let start = token.span.0.start;

        match token.kind {
            TokenKind::Reserved(Keyword::True) => {
                self.advance();
                Ok(self.alloc(Expr::Terminal(true), start))
            }
            TokenKind::Reserved(Keyword::False) => {
                self.advance();
                Ok(self.alloc(Expr::Terminal(false), start))
            }
            TokenKind::LParen => {
                let open = self.advance();
                let inner = self.expression()?;
                self.expect_close(TokenKind::RParen, &open)?;
                Ok(self.alloc(Expr::Grouped(inner), start))
            }
            TokenKind::Reserved(Keyword::Return) => {
                self.advance();
                let value = if starts_expression(self.peek()) {
                    Some(self.expression()?)
                } else {
                    None
                };
                Ok(self.alloc(
                    Expr::Control {
                        kind: ControlKind::Return,
                        value,
                    },
                    start,
                ))
            }
            TokenKind::Reserved(Keyword::Break) => {
                self.advance();
                Ok(self.alloc(
                    Expr::Control {
                        kind: ControlKind::Break,
                        value: None,
                    },
                    start,
                ))
            }
            TokenKind::Reserved(Keyword::Continue) => {
                self.advance();
                Ok(self.alloc(
                    Expr::Control {
                        kind: ControlKind::Continue,
                        value: None,
                    },
                    start,
                ))
            }
            TokenKind::Reserved(Keyword::While) => {
                self.advance();
                let cond = self.expression()?;
                let body = self.block()?;
                Ok(self.alloc(Expr::While { cond, body }, start))
            }
            TokenKind::Reserved(Keyword::Do) => {
                self.advance();
                let params = self.arg_list()?;
                let body = self.block()?;
                let decl: &'a FunctionDecl<'a> = self.arena.alloc(FunctionDecl {
                    params,
                    body: body.clone(),
                });

                // `do(...) {...}(...)` with the `(` glued to the `}` calls the
                // literal in place. With any gap the `(` starts a new statement.
                let next = self.peek();
                if next.is(TokenKind::LParen) && next.span.0.start == self.prev_end {
                    let args = self.inv_list()?;
                    return Ok(self.alloc(
                        Expr::Invocation {
                            callee: Callee::Immediate(decl),
                            args,
                        },
                        start,
                    ));
                }
                Ok(self.alloc(Expr::Function(decl), start))
            }
            TokenKind::Name => {
                let name = self.advance().text;
                if self.peek().is(TokenKind::LParen) {
                    let args = self.inv_list()?;
                    return Ok(self.alloc(
                        Expr::Invocation {
                            callee: Callee::Name(name),
                            args,
                        },
                        start,
                    ));
                }
                Ok(self.alloc(Expr::Ident(name), start))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `( NAME, ... )` for function parameters.
    fn arg_list(&mut self) -> Result<&'a [&'a str], ParseError> {
        let open = self.expect(TokenKind::LParen, "`(` to begin the parameter list")?;
        let mut params = Vec::new();
        if self.peek().is(TokenKind::RParen) {
            self.advance();
            return Ok(&[]);
        }
        loop {
            params.push(self.expect_name("a parameter name")?);
            if self.peek().is(TokenKind::Comma) {
                self.advance();
                continue;
            }
            self.expect_close(TokenKind::RParen, &open)?;
            break;
        }
        Ok(self.arena.alloc_slice_copy(&params))
    }

    /// `( expression, ... )` for call arguments.
    fn inv_list(&mut self) -> Result<&'a [&'a Expr<'a>], ParseError> {
        let open = self.expect(TokenKind::LParen, "`(` to begin the argument list")?;
        let mut args = Vec::new();
        if self.peek().is(TokenKind::RParen) {
            self.advance();
            return Ok(&[]);
        }
        loop {
            args.push(self.expression()?);
            if self.peek().is(TokenKind::Comma) {
                self.advance();
                continue;
            }
            self.expect_close(TokenKind::RParen, &open)?;
            break;
        }
        Ok(self.arena.alloc_slice_copy(&args))
    }

    /// `{ statement* }`
    fn block(&mut self) -> Result<&'a Block<'a>, ParseError> {
        let open = self.expect(TokenKind::LBrace, "`{` to begin a block")?;
        let mut statements = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RBrace => {
                    self.advance();
                    break;
                }
                TokenKind::End => {
                    self.expect_close(TokenKind::RBrace, &open)?;
                }
                _ => statements.push(self.statement()?),
            }
        }
        Ok(self.arena.alloc(Block {
            statements: self.arena.alloc_slice_copy(&statements),
        }))
    }
}

/// Whether `token` can begin an expression (decides if `return` has a value).
fn starts_expression(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Name | TokenKind::LParen | TokenKind::LBrace | TokenKind::Unary => true,
        TokenKind::Reserved(keyword) => keyword != Keyword::My,
        _ => false,
    }
}
