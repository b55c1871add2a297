//! Two-character operator lexing.
//!
//! The single-character operators and delimiters are dispatched directly
//! in `core.rs`; the handful of operators that need one character of
//! lookahead live here: `:=`, `..`, `<>`, `<=`, `>=`.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `:` or `:=`.
    pub fn lex_colon(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Assign
        } else {
            Token::Colon
        }
    }

    /// Lexes `.` or `..`.
    pub fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            Token::DotDot
        } else {
            Token::Dot
        }
    }

    /// Lexes `<`, `<=`, or `<>`.
    pub fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Le
        } else if self.cursor.match_char('>') {
            Token::Ne
        } else {
            Token::Lt
        }
    }

    /// Lexes `>` or `>=`.
    pub fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Ge
        } else {
            Token::Gt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pscc_util::Handler;

    fn lex_op(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.next_token()
    }

    #[test]
    fn test_colon() {
        assert_eq!(lex_op(":"), Token::Colon);
    }

    #[test]
    fn test_assign() {
        assert_eq!(lex_op(":="), Token::Assign);
    }

    #[test]
    fn test_dot() {
        assert_eq!(lex_op("."), Token::Dot);
    }

    #[test]
    fn test_dot_dot() {
        assert_eq!(lex_op(".."), Token::DotDot);
    }

    #[test]
    fn test_lt() {
        assert_eq!(lex_op("<"), Token::Lt);
    }

    #[test]
    fn test_le() {
        assert_eq!(lex_op("<="), Token::Le);
    }

    #[test]
    fn test_ne() {
        assert_eq!(lex_op("<>"), Token::Ne);
    }

    #[test]
    fn test_gt() {
        assert_eq!(lex_op(">"), Token::Gt);
    }

    #[test]
    fn test_ge() {
        assert_eq!(lex_op(">="), Token::Ge);
    }
}
