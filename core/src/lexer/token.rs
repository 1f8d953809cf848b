use core::fmt;

use logos::Logos;

use crate::parser::Span;

/// Words pinned to a fixed meaning; never usable as user-defined names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    True,
    False,
    My,
    Do,
    While,
    Return,
    Break,
    Continue,
}

impl Keyword {
    pub const ALL: [Keyword; 8] = [
        Keyword::True,
        Keyword::False,
        Keyword::My,
        Keyword::Do,
        Keyword::While,
        Keyword::Return,
        Keyword::Break,
        Keyword::Continue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::My => "my",
            Keyword::Do => "do",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token classes produced by the lexer.
///
/// Whitespace (every byte up to and including space), `;` and `#` line
/// comments are skipped. `End` is never matched from text; the lexer appends
/// it after the last real token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[\x00-\x20;]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    #[token("true", |_| Keyword::True)]
    #[token("false", |_| Keyword::False)]
    #[token("my", |_| Keyword::My)]
    #[token("do", |_| Keyword::Do)]
    #[token("while", |_| Keyword::While)]
    #[token("return", |_| Keyword::Return)]
    #[token("break", |_| Keyword::Break)]
    #[token("continue", |_| Keyword::Continue)]
    Reserved(Keyword),

    #[regex(r"[A-Za-z][-_A-Za-z0-9]*")]
    Name,

    /// `?` and `:`
    #[token("?")]
    #[token(":")]
    Ternary,

    /// `!`
    #[token("!")]
    Unary,

    /// `|`, `^` and `&`
    #[token("|")]
    #[token("^")]
    #[token("&")]
    Binary,

    /// `==` and `!=`, matched before the single-character operators.
    #[token("==")]
    #[token("!=")]
    Comparison,

    #[token("=")]
    Assign,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    End,
}

impl TokenKind {
    /// Human-readable name used in parse error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Reserved(_) => "reserved word",
            TokenKind::Name => "name",
            TokenKind::Ternary => "ternary operator",
            TokenKind::Unary => "unary operator",
            TokenKind::Binary => "binary operator",
            TokenKind::Comparison => "comparison operator",
            TokenKind::Assign => "`=`",
            TokenKind::Comma => "`,`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::End => "end of input",
        }
    }
}

/// A lexed token. `text` borrows from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
    /// 1-based line of the first character.
    pub row: usize,
    /// 1-based column (in characters) of the first character.
    pub col: usize,
}

impl<'a> Token<'a> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Reserved(keyword)
    }

    /// True for operator tokens whose text is exactly `op`.
    pub fn is_op(&self, op: &str) -> bool {
        matches!(
            self.kind,
            TokenKind::Ternary | TokenKind::Unary | TokenKind::Binary | TokenKind::Comparison
        ) && self.text == op
    }

    /// Describes the token for "found ..." messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            TokenKind::Name => format!("name `{}`", self.text),
            TokenKind::Reserved(keyword) => format!("reserved word `{}`", keyword),
            _ => format!("`{}`", self.text),
        }
    }
}
