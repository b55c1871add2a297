//! pscc-par - combined syntactic and semantic analysis.
//!
//! There is no separate parse tree; the parser calls straight into
//! [`pscc_sem::SemaContext`] while it recognizes each construct, so
//! declarations are entered and expressions type-checked in the same pass
//! that recognizes their syntax. The whole source is lexed up front into a
//! flat token buffer (see [`lex_all`]) rather than pulled lazily, which
//! keeps lookahead (`peek`, `check`) a matter of indexing rather than
//! buffering tokens back out of the lexer.

pub mod ast;
pub mod expr;
pub mod items;
pub mod pattern;
pub mod stmt;
pub mod types;

use pscc_lex::{Lexer, Token};
use pscc_sem::SemaContext;
use pscc_util::{Handler, Span, Symbol};

pub use ast::Program;

/// Lexes `source` in full, pairing each token with its span.
///
/// Takes a short-lived borrow of `handler` so the caller's own `&mut
/// Handler` is free again once lexing finishes; [`Parser::new`] then moves
/// that same handler into its [`SemaContext`] for the rest of parsing.
fn lex_all(source: &str, handler: &mut Handler) -> Vec<(Token, Span)> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let span = lexer.token_span();
        let done = token == Token::Eof;
        tokens.push((token, span));
        if done {
            break;
        }
    }
    tokens
}

/// Parses a complete program, returning the AST and leaving any diagnostics
/// in the handler owned by the returned [`SemaContext`].
pub struct Parser<'a> {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    pub sema: SemaContext<'a>,
    /// Forward-declaration stubs registered by a `^name` seen before `name`
    /// itself was declared, keyed by name so the later `type name = ...`
    /// declaration can find and patch the right [`pscc_sem::TypeId`].
    pending_stubs: std::collections::HashMap<Symbol, pscc_sem::TypeId>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &str, handler: &'a mut Handler) -> Self {
        let tokens = lex_all(source, handler);
        Self {
            tokens,
            pos: 0,
            sema: SemaContext::new(handler),
            pending_stubs: std::collections::HashMap::new(),
        }
    }

    /// Registers (or reuses) a forward-declaration stub for `name`, used
    /// when a `^name` pointer denoter is parsed before `name`'s own `type`
    /// declaration is reached.
    pub(crate) fn register_pending_stub(&mut self, name: Symbol) -> pscc_sem::TypeId {
        if let Some(&stub) = self.pending_stubs.get(&name) {
            return stub;
        }
        let stub = self.sema.types.register_stub(name);
        self.pending_stubs.insert(name, stub);
        stub
    }

    /// Returns the pending stub for `name`, if a `^name` forward reference
    /// registered one before `name`'s declaration was reached.
    pub(crate) fn take_pending_stub(&mut self, name: Symbol) -> Option<pscc_sem::TypeId> {
        self.pending_stubs.remove(&name)
    }

    /// Parses the whole token stream as a `program ... .` unit.
    pub fn parse_program(&mut self) -> Program {
        self.parse_program_item()
    }

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Looks `n` tokens ahead of the current one without consuming anything.
    pub(crate) fn peek(&self, n: usize) -> &Token {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].0
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].0.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        self.current() == token
    }

    /// Consumes the current token if it matches, returning whether it did.
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token, reporting an error if it doesn't match.
    pub(crate) fn expect(&mut self, token: Token) {
        if !self.eat(&token) {
            let span = self.current_span();
            let found = self.current().describe();
            self.error(format!("expected {}, found {}", token.describe(), found), span);
        }
    }

    /// Consumes an identifier token, reporting an error and returning `None`
    /// if the current token isn't one.
    pub(crate) fn expect_ident(&mut self) -> Option<Symbol> {
        match self.current().clone() {
            Token::Ident(name) => {
                self.advance();
                Some(name)
            },
            _ => {
                let span = self.current_span();
                let found = self.current().describe();
                self.error(format!("expected an identifier, found {}", found), span);
                None
            },
        }
    }

    pub(crate) fn error(&mut self, message: String, span: Span) {
        use pscc_util::DiagnosticBuilder;
        DiagnosticBuilder::error(message).span(span).emit(self.sema.handler);
    }
}
