//! String literal lexing.
//!
//! Strings are delimited by single quotes. There are no backslash escapes;
//! a literal quote character inside a string is written as two adjacent
//! quotes (`''`), which this lexer collapses to one.

use crate::token::Token;
use crate::Lexer;
use pscc_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes a `'...'` string literal.
    pub fn lex_string(&mut self) -> Token {
        self.cursor.advance();

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            let c = self.cursor.current_char();

            if c == '\'' {
                if self.cursor.peek_char(1) == '\'' {
                    content.push('\'');
                    self.cursor.advance();
                    self.cursor.advance();
                    continue;
                }
                self.cursor.advance();
                break;
            }

            if c == '\n' {
                self.report_error("unterminated string literal".to_string());
                break;
            }

            content.push(c);
            self.cursor.advance();
        }

        Token::StringLiteral(Symbol::intern(&content))
    }
}
