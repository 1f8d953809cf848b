use domy_core::lexer::{Keyword, Lexer, Token, TokenKind};
use nu_ansi_term::{Color, Style};
use reedline::StyledText;

/// Syntax highlighting driven by the language's own lexer.
pub struct Highlighter;

fn style_of(token: &Token<'_>) -> Style {
    let fg = match token.kind {
        TokenKind::Reserved(Keyword::True | Keyword::False) => Color::Cyan,
        TokenKind::Reserved(_) => Color::Magenta,
        TokenKind::Name if token.text == "print" => Color::Blue,
        TokenKind::Name => Color::White,
        TokenKind::Ternary
        | TokenKind::Unary
        | TokenKind::Binary
        | TokenKind::Comparison
        | TokenKind::Assign => Color::Yellow,
        TokenKind::Comma
        | TokenKind::LParen
        | TokenKind::RParen
        | TokenKind::LBrace
        | TokenKind::RBrace
        | TokenKind::End => Color::White,
    };
    Style::new().fg(fg)
}

/// Text between tokens: whitespace, `;` and comments.
fn push_gap(output: &mut StyledText, gap: &str) {
    if gap.is_empty() {
        return;
    }
    let fg = if gap.contains('#') {
        Color::DarkGray
    } else {
        Color::White
    };
    output.push((Style::new().fg(fg), gap.to_string()));
}

impl reedline::Highlighter for Highlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut output = StyledText::new();
        let mut last = 0;

        for token in Lexer::new(line) {
            let Ok(token) = token else {
                break;
            };
            let (start, end) = (token.span.0.start, token.span.0.end);
            push_gap(&mut output, &line[last..start]);
            last = start;
            if token.is(TokenKind::End) {
                break;
            }
            output.push((style_of(&token), token.text.to_string()));
            last = end;
        }

        // Everything from the first bad character on.
        if last < line.len() {
            output.push((Style::new().fg(Color::Red), line[last..].to_string()));
        }

        output
    }
}
