//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token};
use crate::unicode::is_ascii_ident_continue;
use crate::Lexer;
use pscc_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or reserved word.
    ///
    /// Identifiers start with a letter, followed by letters or digits.
    /// Matching against reserved words, and symbol interning, both use the
    /// lowercased spelling: the source language is case-insensitive
    /// throughout, not only in its keywords.
    pub fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let lowercase = text.to_ascii_lowercase();

        keyword_from_ident(&lowercase).unwrap_or_else(|| Token::Ident(Symbol::intern(&lowercase)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pscc_util::Handler;

    fn lex_ident(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_identifier()
    }

    #[test]
    fn test_simple_identifier() {
        assert_eq!(lex_ident("foo"), Token::Ident(Symbol::intern("foo")));
    }

    #[test]
    fn test_identifier_with_digits() {
        assert_eq!(lex_ident("foo123"), Token::Ident(Symbol::intern("foo123")));
    }

    #[test]
    fn test_identifiers_are_case_folded() {
        assert_eq!(lex_ident("FooBar"), Token::Ident(Symbol::intern("foobar")));
    }

    #[test]
    fn test_keyword_begin() {
        assert_eq!(lex_ident("begin"), Token::KwBegin);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(lex_ident("BEGIN"), Token::KwBegin);
        assert_eq!(lex_ident("Begin"), Token::KwBegin);
    }

    #[test]
    fn test_keyword_program() {
        assert_eq!(lex_ident("program"), Token::KwProgram);
    }

    #[test]
    fn test_keyword_downto() {
        assert_eq!(lex_ident("downto"), Token::KwDownto);
    }

    #[test]
    fn test_word_operator_div() {
        assert_eq!(lex_ident("div"), Token::KwDiv);
    }

    #[test]
    fn test_word_operator_not() {
        assert_eq!(lex_ident("not"), Token::KwNot);
    }

    #[test]
    fn test_non_keyword_identifier() {
        assert_eq!(lex_ident("myvar"), Token::Ident(Symbol::intern("myvar")));
    }
}
