//! Number literal lexing.
//!
//! Handles integer and real literals: a digit run, an optional decimal
//! point followed by a digit run, and an optional exponent. There are no
//! hex/octal/binary prefixes and no digit-group separators in this
//! language.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an integer or real literal.
    ///
    /// A `.` is only consumed as a decimal point when immediately followed
    /// by a digit; `12..20` must lex as `12`, `..`, `20`, not `12.`, `.20`.
    pub fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_real = false;

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_real = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if self.cursor.current_char() == 'e' || self.cursor.current_char() == 'E' {
            let mut lookahead = 1;
            if self.cursor.peek_char(1) == '+' || self.cursor.peek_char(1) == '-' {
                lookahead += 1;
            }
            if self.cursor.peek_char(lookahead).is_ascii_digit() {
                is_real = true;
                self.cursor.advance();
                if self.cursor.current_char() == '+' || self.cursor.current_char() == '-' {
                    self.cursor.advance();
                }
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            }
        }

        let text = self.cursor.slice_from(start);

        if is_real {
            match text.parse::<f64>() {
                Ok(value) => Token::RealLiteral(value),
                Err(e) => {
                    self.report_error(format!("invalid real literal '{}': {}", text, e));
                    Token::RealLiteral(0.0)
                },
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Token::IntLiteral(value),
                Err(e) => {
                    self.report_error(format!("integer literal '{}' out of range: {}", text, e));
                    Token::IntLiteral(0)
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pscc_util::Handler;

    fn lex_num(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_number()
    }

    #[test]
    fn test_integer() {
        assert_eq!(lex_num("42"), Token::IntLiteral(42));
        assert_eq!(lex_num("0"), Token::IntLiteral(0));
    }

    #[test]
    fn test_real_literal() {
        let result = lex_num("3.14");
        assert!(matches!(result, Token::RealLiteral(f) if (f - 3.14).abs() < 1e-9));
    }

    #[test]
    fn test_real_with_exponent() {
        let result = lex_num("1e10");
        assert!(matches!(result, Token::RealLiteral(f) if (f - 1e10).abs() < 1.0));
    }

    #[test]
    fn test_real_with_signed_exponent() {
        let result = lex_num("2.5e-3");
        assert!(matches!(result, Token::RealLiteral(f) if (f - 2.5e-3).abs() < 1e-9));
    }

    #[test]
    fn test_range_dots_are_not_consumed() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("12..20", &mut handler);
        assert_eq!(lexer.next_token(), Token::IntLiteral(12));
        assert_eq!(lexer.next_token(), Token::DotDot);
        assert_eq!(lexer.next_token(), Token::IntLiteral(20));
    }

    #[test]
    fn test_trailing_dot_is_not_consumed() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("42.", &mut handler);
        assert_eq!(lexer.next_token(), Token::IntLiteral(42));
        assert_eq!(lexer.next_token(), Token::Dot);
    }
}
