//! Statement parsing: assignment, procedure calls, and the structured
//! control-flow forms (`if`, `while`, `repeat`, `for`, `case`, compound).

use pscc_lex::Token;
use pscc_sem::{SymbolKind, TypeId};

use crate::ast::{Expr, Stmt};
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Stmt {
        match self.current().clone() {
            Token::KwBegin => self.parse_compound(),
            Token::KwIf => self.parse_if(),
            Token::KwWhile => self.parse_while(),
            Token::KwRepeat => self.parse_repeat(),
            Token::KwFor => self.parse_for(),
            Token::KwCase => self.parse_case(),
            Token::Ident(_) => self.parse_assign_or_call(),
            _ => Stmt::Empty,
        }
    }

    pub(crate) fn parse_compound(&mut self) -> Stmt {
        self.expect(Token::KwBegin);
        let mut stmts = vec![self.parse_statement()];
        while self.eat(&Token::Semicolon) {
            if self.check(&Token::KwEnd) {
                break;
            }
            stmts.push(self.parse_statement());
        }
        self.expect(Token::KwEnd);
        Stmt::Compound(stmts)
    }

    /// Disambiguates `name := expr` from `name(args)`/`name` by looking the
    /// leading identifier up first: a bound procedure name is a call,
    /// anything else is the start of an assignment target.
    fn parse_assign_or_call(&mut self) -> Stmt {
        let span = self.current_span();
        let Some(name) = self.expect_ident() else { return Stmt::Empty };
        let kind = self.sema.symbols.lookup(name).map(|e| e.kind.clone());
        match kind {
            Some(SymbolKind::Procedure { params, variadic }) => {
                let args = self.parse_call_args();
                self.check_call_args(&params, &args, variadic, span);
                let end = args.last().map(|a| a.span()).unwrap_or(span);
                Stmt::ProcCall { name, args, span: span.merge(end) }
            },
            _ => {
                let base = self.resolve_place(name, span);
                let place = self.continue_postfix(base);
                self.expect(Token::Assign);
                let value = self.parse_expr();
                let value = self.coerce_assign(place.ty(), value);
                let stmt_span = span.merge(value.span());
                Stmt::Assign { place, value, span: stmt_span }
            },
        }
    }

    fn coerce_assign(&mut self, target: TypeId, value: Expr) -> Expr {
        self.sema.check_assignable(target, value.ty(), value.span());
        if target == TypeId::REAL && self.sema.types.is_integer_like(value.ty()) {
            self.widen_to_real(value)
        } else if self.sema.types.is_integer_like(target) && self.sema.types.is_real(value.ty()) {
            self.narrow_to_int(value)
        } else {
            value
        }
    }

    /// Wraps `value` in an [`Expr::CastInt`], warning that the assignment
    /// loses the fractional part. The warning is recorded but, like all
    /// warnings, does not fail the compilation on its own.
    fn narrow_to_int(&mut self, value: Expr) -> Expr {
        let span = value.span();
        pscc_util::DiagnosticBuilder::warning(
            "assigning a real value to an integer target truncates its fractional part",
        )
        .code(pscc_util::diagnostic::W_LOSSY_COERCION)
        .span(span)
        .emit(self.sema.handler);
        Expr::CastInt { operand: Box::new(value), span }
    }

    fn parse_if(&mut self) -> Stmt {
        let span = self.current_span();
        self.expect(Token::KwIf);
        let cond = self.parse_expr();
        self.require_condition(&cond);
        self.expect(Token::KwThen);
        let then_branch = Box::new(self.parse_statement());
        let else_branch = if self.eat(&Token::KwElse) {
            Some(Box::new(self.parse_statement()))
        } else {
            None
        };
        Stmt::If { cond, then_branch, else_branch, span }
    }

    fn parse_while(&mut self) -> Stmt {
        let span = self.current_span();
        self.expect(Token::KwWhile);
        let cond = self.parse_expr();
        self.require_condition(&cond);
        self.expect(Token::KwDo);
        let body = Box::new(self.parse_statement());
        Stmt::While { cond, body, span }
    }

    fn parse_repeat(&mut self) -> Stmt {
        let span = self.current_span();
        self.expect(Token::KwRepeat);
        let mut body = vec![self.parse_statement()];
        while self.eat(&Token::Semicolon) {
            if self.check(&Token::KwUntil) {
                break;
            }
            body.push(self.parse_statement());
        }
        self.expect(Token::KwUntil);
        let cond = self.parse_expr();
        self.require_condition(&cond);
        Stmt::Repeat { body, cond, span }
    }

    fn parse_for(&mut self) -> Stmt {
        let span = self.current_span();
        self.expect(Token::KwFor);
        let Some(var) = self.expect_ident() else { return Stmt::Empty };
        let var_ty = self.sema.symbols.lookup(var).map(|e| e.ty).unwrap_or(TypeId::ERROR);
        if var_ty != TypeId::ERROR && !self.sema.types.is_integer_like(var_ty) {
            let var_span = self.current_span();
            self.sema.type_error("a for-loop variable must be integer-like", var_span);
        }
        self.expect(Token::Assign);
        let from = self.parse_expr();
        let downto = if self.eat(&Token::KwDownto) {
            true
        } else {
            self.expect(Token::KwTo);
            false
        };
        let to = self.parse_expr();
        self.expect(Token::KwDo);
        let body = Box::new(self.parse_statement());
        Stmt::For { var, from, to, downto, body, span }
    }

    /// `case` statements are not supported. The arm list is still parsed in
    /// full so the parser stays synchronized with the token stream, but the
    /// statement is rejected and discarded rather than reaching codegen.
    fn parse_case(&mut self) -> Stmt {
        let span = self.current_span();
        self.expect(Token::KwCase);
        self.error("'case' statements are not supported".to_string(), span);
        self.parse_expr();
        self.expect(Token::KwOf);
        loop {
            if self.check(&Token::KwElse) {
                self.advance();
                self.parse_statement();
                break;
            }
            if self.check(&Token::KwEnd) {
                break;
            }
            self.parse_case_labels();
            self.expect(Token::Colon);
            self.parse_statement();
            if !self.eat(&Token::Semicolon) {
                break;
            }
        }
        self.expect(Token::KwEnd);
        Stmt::Empty
    }

    fn require_condition(&mut self, cond: &Expr) {
        if cond.ty() != TypeId::ERROR && cond.ty() != TypeId::BOOLEAN {
            self.sema.type_error("condition must be boolean", cond.span());
        }
    }
}
