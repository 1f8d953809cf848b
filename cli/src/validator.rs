use domy_core::lexer::{Lexer, TokenKind};
use reedline::{ValidationResult, Validator};

/// Count unclosed `(` and `{` in `buffer`.
///
/// Returns `None` when the buffer does not tokenize; the caller then submits
/// it so the error gets reported.
pub fn calculate_depth(buffer: &str) -> Option<usize> {
    let mut depth: isize = 0;

    for token in Lexer::new(buffer) {
        match token {
            Ok(token) => match token.kind {
                TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrace => depth -= 1,
                _ => {}
            },
            Err(_) => return None,
        }
    }

    Some(depth.max(0) as usize)
}

/// Keeps reading lines while brackets are unbalanced.
pub struct DomyValidator;

impl Validator for DomyValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        // REPL commands are always a single line.
        if line.trim_start().starts_with('.') {
            return ValidationResult::Complete;
        }
        match calculate_depth(line) {
            Some(depth) if depth > 0 => ValidationResult::Incomplete,
            _ => ValidationResult::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(calculate_depth("print(true)"), Some(0));
        assert_eq!(calculate_depth("my f = do(a) {"), Some(1));
        assert_eq!(calculate_depth("while x { print(("), Some(3));
        assert_eq!(calculate_depth("}}"), Some(0));
    }

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(calculate_depth("{ # ( ( (\n"), Some(1));
    }

    #[test]
    fn test_lex_error_gives_none() {
        assert_eq!(calculate_depth("{ 1"), None);
    }

    #[test]
    fn test_validator() {
        let validator = DomyValidator;
        assert!(matches!(
            validator.validate("while true {"),
            ValidationResult::Incomplete
        ));
        assert!(matches!(
            validator.validate("while true {\n break\n}"),
            ValidationResult::Complete
        ));
        assert!(matches!(
            validator.validate(".load (file"),
            ValidationResult::Complete
        ));
    }
}
