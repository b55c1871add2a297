//! Top-level declaration parsing: the `program` header, `const`/`type`/`var`
//! sections, and `procedure`/`function` declarations.

use pscc_lex::Token;
use pscc_sem::{ConstValue, Entry, ParamInfo, SymbolKind};
use pscc_util::Symbol;

use crate::ast::{LocalVar, Program};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_program_item(&mut self) -> Program {
        self.expect(Token::KwProgram);
        let name = self.expect_ident().unwrap_or_else(|| Symbol::intern(""));
        if self.eat(&Token::LParen) {
            if !self.check(&Token::RParen) {
                self.expect_ident();
                while self.eat(&Token::Comma) {
                    self.expect_ident();
                }
            }
            self.expect(Token::RParen);
        }
        self.expect(Token::Semicolon);

        let mut locals = Vec::new();
        self.parse_declarations(&mut locals);

        loop {
            match self.current() {
                Token::KwProcedure => self.reject_procedure(),
                Token::KwFunction => self.reject_function(),
                _ => break,
            }
        }

        let body = self.parse_compound();
        self.expect(Token::Dot);
        Program { name, locals, body }
    }

    /// Parses any run of `const`/`type`/`var` sections, in whatever order
    /// and repetition they appear (the language permits interleaving).
    /// `locals` accumulates every `var`-section binding in declaration
    /// order, since the enclosing scope level is popped (for a routine) or
    /// simply goes out of scope (for the program) before code generation
    /// runs, and offsets must be assigned from a stable list afterward.
    fn parse_declarations(&mut self, locals: &mut Vec<LocalVar>) {
        loop {
            match self.current() {
                Token::KwConst => self.parse_const_section(),
                Token::KwType => self.parse_type_section(),
                Token::KwVar => self.parse_var_section(locals),
                _ => break,
            }
        }
    }

    fn parse_const_section(&mut self) {
        self.expect(Token::KwConst);
        loop {
            let Some(name) = self.expect_ident() else { break };
            self.expect(Token::Eq);
            let value = self.parse_const_literal();
            self.expect(Token::Semicolon);
            let ty = pscc_sem::const_type(&value);
            self.sema.symbols.insert(Entry {
                def_id: self.sema.def_ids.next(),
                name,
                ty,
                kind: SymbolKind::Const(value),
            });
            if !matches!(self.current(), Token::Ident(_)) {
                break;
            }
        }
    }

    fn parse_const_literal(&mut self) -> ConstValue {
        let negative = self.eat(&Token::Minus);
        match self.current().clone() {
            Token::IntLiteral(v) => {
                self.advance();
                ConstValue::Integer(if negative { -v } else { v })
            },
            Token::RealLiteral(v) => {
                self.advance();
                ConstValue::Real(if negative { -v } else { v })
            },
            Token::BoolLiteral(v) => {
                self.advance();
                ConstValue::Boolean(v)
            },
            Token::StringLiteral(text) => {
                self.advance();
                ConstValue::Char(text.as_str().chars().next().unwrap_or(' '))
            },
            Token::Ident(name) => {
                self.advance();
                match self.sema.symbols.lookup(name).map(|e| e.kind.clone()) {
                    Some(SymbolKind::Const(value)) => value,
                    _ => {
                        let span = self.current_span();
                        self.error(format!("'{}' is not a constant", name.as_str()), span);
                        ConstValue::Integer(0)
                    },
                }
            },
            _ => {
                let span = self.current_span();
                self.error("expected a constant".to_string(), span);
                ConstValue::Integer(0)
            },
        }
    }

    fn parse_type_section(&mut self) {
        self.expect(Token::KwType);
        loop {
            let Some(name) = self.expect_ident() else { break };
            self.expect(Token::Eq);
            let ty = self.parse_type_denoter();
            self.expect(Token::Semicolon);
            let resolved_ty = if let Some(stub) = self.take_pending_stub(name) {
                let resolved = self.sema.types.get(ty).clone();
                self.sema.types.resolve_stub(stub, resolved);
                stub
            } else {
                ty
            };
            self.sema.symbols.insert(Entry {
                def_id: self.sema.def_ids.next(),
                name,
                ty: resolved_ty,
                kind: SymbolKind::TypeName,
            });
            if !matches!(self.current(), Token::Ident(_)) {
                break;
            }
        }
    }

    fn parse_var_section(&mut self, locals: &mut Vec<LocalVar>) {
        self.expect(Token::KwVar);
        loop {
            let Some(first) = self.expect_ident() else { break };
            let mut names = vec![first];
            while self.eat(&Token::Comma) {
                if let Some(name) = self.expect_ident() {
                    names.push(name);
                }
            }
            self.expect(Token::Colon);
            let ty = self.parse_type_denoter();
            self.expect(Token::Semicolon);
            for name in names {
                self.sema.symbols.insert(Entry {
                    def_id: self.sema.def_ids.next(),
                    name,
                    ty,
                    kind: SymbolKind::Var,
                });
                locals.push(LocalVar { name, ty });
            }
            if !matches!(self.current(), Token::Ident(_)) {
                break;
            }
        }
    }

    /// Parses `(a, b: ty; var c: ty)`, returning parallel parameter
    /// signatures and the names bound to them.
    fn parse_param_list(&mut self) -> (Vec<ParamInfo>, Vec<Symbol>) {
        let mut params = Vec::new();
        let mut names = Vec::new();
        if !self.eat(&Token::LParen) {
            return (params, names);
        }
        if !self.check(&Token::RParen) {
            loop {
                let by_ref = self.eat(&Token::KwVar);
                let Some(first) = self.expect_ident() else { break };
                let mut group = vec![first];
                while self.eat(&Token::Comma) {
                    if let Some(name) = self.expect_ident() {
                        group.push(name);
                    }
                }
                self.expect(Token::Colon);
                let ty = self.parse_type_denoter();
                for name in group {
                    names.push(name);
                    params.push(ParamInfo { ty, by_ref });
                }
                if !self.eat(&Token::Semicolon) {
                    break;
                }
            }
        }
        self.expect(Token::RParen);
        (params, names)
    }

    /// User-defined procedures are not supported. The declaration is still
    /// parsed in full, in its own scope level that is discarded afterward,
    /// so the parser stays synchronized with the token stream and the body
    /// still gets whatever diagnostics its own statements would raise; only
    /// the routine itself is rejected and never reaches code generation.
    fn reject_procedure(&mut self) {
        let span = self.current_span();
        self.expect(Token::KwProcedure);
        let name = self.expect_ident().unwrap_or_else(|| Symbol::intern(""));
        self.error(
            format!("user-defined procedure '{}' is not supported", name.as_str()),
            span,
        );
        let (params, param_names) = self.parse_param_list();
        self.expect(Token::Semicolon);

        self.sema.symbols.enter_level();
        for (param_name, param) in param_names.iter().zip(params.iter()) {
            self.sema.symbols.insert(Entry {
                def_id: self.sema.def_ids.next(),
                name: *param_name,
                ty: param.ty,
                kind: SymbolKind::Var,
            });
        }
        let mut locals = Vec::new();
        self.parse_declarations(&mut locals);
        self.parse_compound();
        self.sema.symbols.exit_level();
        self.expect(Token::Semicolon);
    }

    /// User-defined functions are not supported; see [`Parser::reject_procedure`].
    fn reject_function(&mut self) {
        let span = self.current_span();
        self.expect(Token::KwFunction);
        let name = self.expect_ident().unwrap_or_else(|| Symbol::intern(""));
        self.error(
            format!("user-defined function '{}' is not supported", name.as_str()),
            span,
        );
        let (params, param_names) = self.parse_param_list();
        self.expect(Token::Colon);
        let ret_ty = self.parse_type_denoter();
        self.expect(Token::Semicolon);

        self.sema.symbols.enter_level();
        for (param_name, param) in param_names.iter().zip(params.iter()) {
            self.sema.symbols.insert(Entry {
                def_id: self.sema.def_ids.next(),
                name: *param_name,
                ty: param.ty,
                kind: SymbolKind::Var,
            });
        }
        let mut locals = vec![LocalVar { name, ty: ret_ty }];
        self.parse_declarations(&mut locals);
        self.parse_compound();
        self.sema.symbols.exit_level();
        self.expect(Token::Semicolon);
    }
}
