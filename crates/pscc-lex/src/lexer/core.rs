//! Core lexer implementation.
//!
//! This module contains the main Lexer struct and its core methods.

use pscc_util::{DiagnosticBuilder, Handler, Span};

use crate::cursor::Cursor;
use crate::token::Token;

/// Lexer for the source language.
///
/// The lexer transforms source code text into a stream of tokens.
/// It handles whitespace, comments, identifiers, keywords, operators,
/// and literals.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    pub handler: &'a mut Handler,

    /// Starting position of the current token (byte offset).
    pub token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,

    /// Whether the BOM (Byte Order Mark) has been checked.
    pub bom_checked: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            bom_checked: false,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// This is the main entry point for tokenization. It skips whitespace
    /// and comments, then dispatches to the appropriate lexing method
    /// based on the current character.
    ///
    /// # Returns
    /// The next token in the source stream, or `Token::Eof` at end of file.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::Eof;
        }

        match self.cursor.current_char() {
            ',' => {
                self.cursor.advance();
                Token::Comma
            },
            ';' => {
                self.cursor.advance();
                Token::Semicolon
            },
            '(' => {
                self.cursor.advance();
                Token::LParen
            },
            ')' => {
                self.cursor.advance();
                Token::RParen
            },
            '[' => {
                self.cursor.advance();
                Token::LBracket
            },
            ']' => {
                self.cursor.advance();
                Token::RBracket
            },
            '+' => {
                self.cursor.advance();
                Token::Plus
            },
            '-' => {
                self.cursor.advance();
                Token::Minus
            },
            '*' => {
                self.cursor.advance();
                Token::Star
            },
            '/' => {
                self.cursor.advance();
                Token::Slash
            },
            '=' => {
                self.cursor.advance();
                Token::Eq
            },
            '^' => {
                self.cursor.advance();
                Token::Caret
            },
            ':' => self.lex_colon(),
            '.' => self.lex_dot(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '\'' => self.lex_string(),
            c if crate::unicode::is_ascii_ident_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                self.report_warning(format!("skipping unrecognized character '{}'", c));
                self.cursor.advance();
                self.next_token()
            },
        }
    }

    /// Reports a lexical error at the current token position.
    ///
    /// # Arguments
    /// * `message` - The error message to display
    pub fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message)
            .span(span)
            .emit(self.handler);
    }

    /// Reports a lexical warning at the current token position.
    ///
    /// Used for conditions the lexer can recover from on its own, such as an
    /// unrecognized byte, where it skips the offending character and keeps
    /// scanning rather than surfacing it as real token output.
    pub fn report_warning(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::warning(message)
            .span(span)
            .emit(self.handler);
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.cursor.line()
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.cursor.column()
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the starting position of the current token.
    pub fn token_start(&mut self) -> usize {
        self.token_start
    }

    /// Returns the span of the token last produced by [`Lexer::next_token`].
    pub fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token == Token::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pscc_util::Handler;

    fn lex_one(source: &str) -> Token {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        lexer.next_token()
    }

    #[test]
    fn test_eof_on_empty_source() {
        assert_eq!(lex_one(""), Token::Eof);
    }

    #[test]
    fn test_eof_on_whitespace_only() {
        assert_eq!(lex_one("   \n\t  "), Token::Eof);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(lex_one(","), Token::Comma);
        assert_eq!(lex_one(";"), Token::Semicolon);
        assert_eq!(lex_one("("), Token::LParen);
        assert_eq!(lex_one(")"), Token::RParen);
        assert_eq!(lex_one("["), Token::LBracket);
        assert_eq!(lex_one("]"), Token::RBracket);
    }

    #[test]
    fn test_unexpected_character_is_skipped_with_a_warning() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("#", &mut handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert!(!handler.has_errors());
        assert!(handler.diagnostics().iter().any(|d| d.level == pscc_util::Level::Warning));
    }

    #[test]
    fn test_unexpected_character_does_not_block_the_next_real_token() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("# begin", &mut handler);
        assert_eq!(lexer.next_token(), Token::KwBegin);
        assert!(!handler.has_errors());
    }

    /// A `}` left over from a `{` comment closed early by a nested `(* *)`
    /// terminator is an unrecognized byte at that point, so it is skipped
    /// with a warning rather than surfacing as a token: the whole input
    /// yields no tokens before end-of-input.
    #[test]
    fn mixed_comment_terminator_leaves_no_tokens_before_eof() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("{ hello (* world *) }", &mut handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_skips_comments_between_tokens() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("{ ignored } begin", &mut handler);
        assert_eq!(lexer.next_token(), Token::KwBegin);
    }

    #[test]
    fn test_token_span_covers_token_text() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("  begin", &mut handler);
        lexer.next_token();
        let span = lexer.token_span();
        assert_eq!(span.start, 2);
        assert_eq!(span.end, 7);
    }
}
