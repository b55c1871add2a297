//! Type-denoter parsing.
//!
//! A type denoter is parsed straight into a [`TypeId`] rather than into a
//! separate AST node: there is nothing downstream that needs the concrete
//! syntax of a type once it is resolved.

use pscc_lex::Token;
use pscc_sem::{ConstValue, Field, Type, TypeId};

use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a type denoter: a named type, `^name` pointer, `array[lo..hi]
    /// of elem`, or `record ... end`.
    pub fn parse_type_denoter(&mut self) -> TypeId {
        match self.current().clone() {
            Token::Caret => {
                self.advance();
                let span = self.current_span();
                let Some(name) = self.expect_ident() else { return TypeId::ERROR };
                match self.sema.symbols.lookup(name) {
                    Some(entry) if matches!(entry.kind, pscc_sem::SymbolKind::TypeName) => {
                        self.sema.types.intern(Type::Pointer(entry.ty))
                    },
                    Some(_) => self.sema.type_error(format!("'{}' is not a type", name.as_str()), span),
                    None => {
                        // Forward reference: `^name` before `name` itself is
                        // declared. Register a stub now; the type
                        // declaration that introduces `name` later patches it.
                        let stub = self.register_pending_stub(name);
                        self.sema.types.intern(Type::Pointer(stub))
                    },
                }
            },
            Token::KwArray => {
                self.advance();
                self.expect(Token::LBracket);
                let (lo, hi) = self.parse_subrange_bounds();
                self.expect(Token::RBracket);
                self.expect(Token::KwOf);
                let elem = self.parse_type_denoter();
                let index = self.sema.types.intern(Type::Subrange { base: TypeId::INTEGER, lo, hi });
                self.sema.types.intern(Type::Array { index, elem })
            },
            Token::KwRecord => {
                self.advance();
                let mut fields = Vec::new();
                loop {
                    if self.check(&Token::KwEnd) {
                        break;
                    }
                    let mut names = vec![self.expect_ident().unwrap_or(pscc_util::Symbol::intern(""))];
                    while self.eat(&Token::Comma) {
                        names.push(self.expect_ident().unwrap_or(pscc_util::Symbol::intern("")));
                    }
                    self.expect(Token::Colon);
                    let ty = self.parse_type_denoter();
                    for name in names {
                        fields.push(Field { name, ty, offset: 0 });
                    }
                    if !self.eat(&Token::Semicolon) {
                        break;
                    }
                }
                self.expect(Token::KwEnd);
                let layout = self.sema.types.layout_record(fields);
                self.sema.types.intern(layout)
            },
            Token::LParen => {
                // Enumeration: `(red, green, blue)`.
                self.advance();
                let mut members = vec![];
                loop {
                    if let Some(name) = self.expect_ident() {
                        members.push(name);
                    }
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::RParen);
                let enum_id = self.sema.types.intern(Type::Enum { members: members.clone() });
                for (ordinal, name) in members.into_iter().enumerate() {
                    self.sema.symbols.insert(pscc_sem::Entry {
                        def_id: self.sema.def_ids.next(),
                        name,
                        ty: enum_id,
                        kind: pscc_sem::SymbolKind::Const(ConstValue::Integer(ordinal as i64)),
                    });
                }
                enum_id
            },
            Token::Ident(name) => {
                let span = self.current_span();
                self.advance();
                match self.sema.symbols.lookup(name) {
                    Some(entry) if matches!(entry.kind, pscc_sem::SymbolKind::TypeName) => entry.ty,
                    Some(_) => self.sema.type_error(format!("'{}' is not a type", name.as_str()), span),
                    None => self.sema.type_error(format!("unknown type '{}'", name.as_str()), span),
                }
            },
            _ => {
                let span = self.current_span();
                self.sema.type_error("expected a type", span)
            },
        }
    }

    /// Parses `lo..hi`, where each bound is a (possibly negative) integer
    /// constant, as used in array index ranges.
    fn parse_subrange_bounds(&mut self) -> (i64, i64) {
        let lo = self.parse_const_int();
        self.expect(Token::DotDot);
        let hi = self.parse_const_int();
        (lo, hi)
    }

    /// Parses an integer constant, allowing a leading unary minus.
    pub(crate) fn parse_const_int(&mut self) -> i64 {
        let negative = self.eat(&Token::Minus);
        let value = match self.current().clone() {
            Token::IntLiteral(v) => {
                self.advance();
                v
            },
            Token::Ident(name) => {
                self.advance();
                match self.sema.symbols.lookup(name).map(|e| e.kind.clone()) {
                    Some(pscc_sem::SymbolKind::Const(ConstValue::Integer(v))) => v,
                    _ => 0,
                }
            },
            _ => 0,
        };
        if negative {
            -value
        } else {
            value
        }
    }
}
