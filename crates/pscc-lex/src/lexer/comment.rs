//! Comment skipping.
//!
//! Comments come in two forms, `{ ... }` and `(* ... *)`, and neither
//! nests. The two forms share one closing convention: either terminator
//! closes either opener, so `{ foo *)` and `(* foo }` are both valid,
//! complete comments. This is a property of the source language, not a
//! lexer bug, and is preserved here rather than "fixed".

impl<'a> crate::Lexer<'a> {
    /// Skips a single `{ ... }` or `(* ... *)` comment body.
    ///
    /// Called with the cursor positioned just past the opening delimiter.
    fn skip_comment_body(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated comment".to_string());
                return;
            }

            match self.cursor.current_char() {
                '}' => {
                    self.cursor.advance();
                    return;
                },
                '*' if self.cursor.peek_char(1) == ')' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return;
                },
                _ => {
                    self.cursor.advance();
                },
            }
        }
    }

    /// Skips whitespace and comments.
    ///
    /// Called before lexing each token.
    pub fn skip_whitespace_and_comments(&mut self) {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.cursor.remaining().starts_with('\u{FEFF}') {
                self.cursor.advance();
            }
        }

        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                },
                '{' => {
                    self.cursor.advance();
                    self.skip_comment_body();
                },
                '(' if self.cursor.peek_char(1) == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.skip_comment_body();
                },
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use pscc_util::{Handler, Symbol};

    #[test]
    fn test_skip_whitespace() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("   x", &mut handler);
        assert_eq!(lexer.next_token(), Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn test_skip_brace_comment() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("{ a comment } x", &mut handler);
        assert_eq!(lexer.next_token(), Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn test_skip_paren_star_comment() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("(* a comment *) x", &mut handler);
        assert_eq!(lexer.next_token(), Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn test_mixed_terminator_brace_opened_paren_closed() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("{ a comment *) x", &mut handler);
        assert_eq!(lexer.next_token(), Token::Ident(Symbol::intern("x")));
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_mixed_terminator_paren_opened_brace_closed() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("(* a comment } x", &mut handler);
        assert_eq!(lexer.next_token(), Token::Ident(Symbol::intern("x")));
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_unterminated_comment_reports_error() {
        let mut handler = Handler::new();
        let mut lexer = crate::Lexer::new("{ never closed", &mut handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_comments_do_not_nest() {
        let mut handler = Handler::new();
        // the inner '{' is just text; the first '}' closes the comment
        let mut lexer = crate::Lexer::new("{ outer { inner } x", &mut handler);
        assert_eq!(lexer.next_token(), Token::Ident(Symbol::intern("x")));
    }
}
