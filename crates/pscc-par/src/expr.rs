//! Expression parsing via a two-stack shift-reduce precedence climb.
//!
//! An operand stack and an `(operator, precedence)` stack are maintained
//! side by side. Each time a new binary operator is seen, every operator
//! already on the stack whose precedence is at least as high as the new
//! one is reduced (popped, applied to the top two operands, result pushed
//! back) before the new operator is pushed. This naturally produces
//! left-to-right evaluation within a precedence level without recursion per
//! level, unlike a Pratt parser's binding-power recursion.
//!
//! Unary `-`/`+`/`not` are parsed wherever an operand is expected, so
//! unary-minus and binary-minus are disambiguated by parser position alone,
//! never by token lookahead.

use pscc_lex::Token;
use pscc_sem::{SymbolKind, Type, TypeId};
use pscc_util::Span;

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::Parser;

/// Precedence of a binary operator; higher binds tighter. Relational
/// operators are lowest, `*`/`/`/`div`/`mod`/`and` highest.
fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 1,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or => 2,
        BinaryOp::Mul | BinaryOp::RealDiv | BinaryOp::And => 3,
    }
}

fn token_to_binop(token: &Token) -> Option<BinaryOp> {
    Some(match token {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::KwOr => BinaryOp::Or,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::RealDiv,
        Token::KwAnd => BinaryOp::And,
        Token::Eq => BinaryOp::Eq,
        Token::Ne => BinaryOp::Ne,
        Token::Lt => BinaryOp::Lt,
        Token::Le => BinaryOp::Le,
        Token::Gt => BinaryOp::Gt,
        Token::Ge => BinaryOp::Ge,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    pub fn parse_expr(&mut self) -> Expr {
        let mut operands = vec![self.parse_unary()];
        let mut operators: Vec<BinaryOp> = Vec::new();

        loop {
            self.reject_div_mod();
            let Some(op) = token_to_binop(self.current()) else { break };
            let prec = precedence(op);
            while let Some(&top) = operators.last() {
                if precedence(top) >= prec {
                    operators.pop();
                    let right = operands.pop().unwrap();
                    let left = operands.pop().unwrap();
                    operands.push(self.apply_binary(top, left, right));
                } else {
                    break;
                }
            }
            self.advance();
            operators.push(op);
            operands.push(self.parse_unary());
        }

        while let Some(op) = operators.pop() {
            let right = operands.pop().unwrap();
            let left = operands.pop().unwrap();
            operands.push(self.apply_binary(op, left, right));
        }

        operands.pop().unwrap()
    }

    fn apply_binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        let span = left.span().merge(right.span());
        let (left, right, ty) = match op {
            BinaryOp::And | BinaryOp::Or => {
                self.require_boolean(&left);
                self.require_boolean(&right);
                (left, right, TypeId::BOOLEAN)
            },
            BinaryOp::RealDiv => {
                let left = self.widen_to_real(left);
                let right = self.widen_to_real(right);
                (left, right, TypeId::REAL)
            },
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
                if self.sema.types.is_real(left.ty()) || self.sema.types.is_real(right.ty()) {
                    (self.widen_to_real(left), self.widen_to_real(right), TypeId::REAL)
                } else {
                    self.require_integer(&left);
                    self.require_integer(&right);
                    (left, right, TypeId::INTEGER)
                }
            },
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let (left, right) = if self.sema.types.is_real(left.ty()) || self.sema.types.is_real(right.ty()) {
                    (self.widen_to_real(left), self.widen_to_real(right))
                } else {
                    (left, right)
                };
                (left, right, TypeId::BOOLEAN)
            },
        };
        Expr::Binary { op, left: Box::new(left), right: Box::new(right), ty, span }
    }

    /// `div` and `mod` are not supported. The operator and its right-hand
    /// operand are still consumed (so the precedence climb stays
    /// synchronized with the token stream), but no binary node is built for
    /// them; the left operand already on the stack is left as the result.
    fn reject_div_mod(&mut self) {
        let (op_name, span) = match self.current() {
            Token::KwDiv => ("div", self.current_span()),
            Token::KwMod => ("mod", self.current_span()),
            _ => return,
        };
        self.error(format!("'{}' is not supported", op_name), span);
        self.advance();
        self.parse_unary();
    }

    fn require_boolean(&mut self, expr: &Expr) {
        if expr.ty() != TypeId::ERROR && expr.ty() != TypeId::BOOLEAN {
            self.sema.type_error("expected a boolean operand", expr.span());
        }
    }

    fn require_integer(&mut self, expr: &Expr) {
        if expr.ty() != TypeId::ERROR && !self.sema.types.is_integer_like(expr.ty()) {
            self.sema.type_error("expected an integer operand", expr.span());
        }
    }

    /// Wraps `expr` in a [`Expr::CastReal`] if it isn't already real-typed.
    pub(crate) fn widen_to_real(&mut self, expr: Expr) -> Expr {
        if self.sema.types.is_real(expr.ty()) {
            return expr;
        }
        if expr.ty() != TypeId::ERROR && !self.sema.types.is_integer_like(expr.ty()) {
            self.sema.type_error("expected a numeric operand", expr.span());
        }
        let span = expr.span();
        Expr::CastReal { operand: Box::new(expr), span }
    }

    fn parse_unary(&mut self) -> Expr {
        let span = self.current_span();
        match self.current() {
            Token::Minus => {
                self.advance();
                let operand = self.parse_unary();
                self.require_numeric(&operand);
                let ty = operand.ty();
                Expr::Unary { op: UnaryOp::Neg, span: span.merge(operand.span()), operand: Box::new(operand), ty }
            },
            Token::Plus => {
                self.advance();
                let operand = self.parse_unary();
                self.require_numeric(&operand);
                let ty = operand.ty();
                Expr::Unary { op: UnaryOp::Plus, span: span.merge(operand.span()), operand: Box::new(operand), ty }
            },
            Token::KwNot => {
                self.advance();
                let operand = self.parse_unary();
                self.require_boolean(&operand);
                Expr::Unary { op: UnaryOp::Not, span: span.merge(operand.span()), operand: Box::new(operand), ty: TypeId::BOOLEAN }
            },
            _ => self.parse_postfix(),
        }
    }

    fn require_numeric(&mut self, expr: &Expr) {
        if expr.ty() != TypeId::ERROR && !self.sema.types.is_integer_like(expr.ty()) && !self.sema.types.is_real(expr.ty()) {
            self.sema.type_error("expected a numeric operand", expr.span());
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let expr = self.parse_primary();
        self.continue_postfix(expr)
    }

    /// Continues a `.field`/`[index]`/`^` chain starting from an already
    /// resolved base expression (used for assignment targets, whose base
    /// name is resolved separately from a general expression's).
    pub(crate) fn continue_postfix(&mut self, mut expr: Expr) -> Expr {
        loop {
            match self.current() {
                Token::Dot => {
                    self.advance();
                    let span = self.current_span();
                    let Some(field) = self.expect_ident() else { break };
                    let ty = self.sema.resolve_field(expr.ty(), field, span);
                    expr = Expr::Field { span: expr.span().merge(span), base: Box::new(expr), field, ty };
                },
                Token::LBracket => {
                    self.advance();
                    let index = self.parse_expr();
                    let end = self.current_span();
                    self.expect(Token::RBracket);
                    let ty = self.sema.resolve_element(expr.ty(), end);
                    expr = Expr::Index { span: expr.span().merge(end), base: Box::new(expr), index: Box::new(index), ty };
                },
                Token::Caret => {
                    let span = self.current_span();
                    self.advance();
                    let ty = self.sema.resolve_deref(expr.ty(), span);
                    expr = Expr::Deref { span: expr.span().merge(span), base: Box::new(expr), ty };
                },
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let span = self.current_span();
        match self.current().clone() {
            Token::IntLiteral(value) => {
                self.advance();
                Expr::IntLiteral { value, span }
            },
            Token::RealLiteral(value) => {
                self.advance();
                Expr::RealLiteral { value, span }
            },
            Token::BoolLiteral(value) => {
                self.advance();
                Expr::BoolLiteral { value, span }
            },
            Token::StringLiteral(text) => {
                self.advance();
                let chars: Vec<char> = text.as_str().chars().collect();
                if chars.len() == 1 {
                    Expr::CharLiteral { value: chars[0], span }
                } else {
                    let index = self.sema.types.intern(Type::Subrange {
                        base: TypeId::INTEGER,
                        lo: 0,
                        hi: chars.len() as i64 - 1,
                    });
                    let ty = self.sema.types.intern(Type::Array { index, elem: TypeId::CHAR });
                    Expr::StringLiteral { value: text, ty, span }
                }
            },
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(Token::RParen);
                inner
            },
            Token::Ident(name) => {
                self.advance();
                self.resolve_name(name, span)
            },
            _ => {
                self.advance();
                self.sema.type_error("expected an expression", span);
                Expr::IntLiteral { value: 0, span }
            },
        }
    }

    /// Resolves a bare identifier used as an assignment target: only a
    /// variable (or function name, for a function's own return-value
    /// assignment) is a valid place.
    pub(crate) fn resolve_place(&mut self, name: pscc_util::Symbol, span: Span) -> Expr {
        let Some(entry) = self.sema.symbols.lookup(name).cloned() else {
            self.sema.type_error(format!("undeclared identifier '{}'", name.as_str()), span);
            return Expr::Name { name, ty: TypeId::ERROR, span };
        };
        match entry.kind {
            SymbolKind::Var => Expr::Name { name, ty: entry.ty, span },
            SymbolKind::Function { ret_ty, .. } => Expr::Name { name, ty: ret_ty, span },
            _ => {
                self.sema.type_error(format!("'{}' is not assignable", name.as_str()), span);
                Expr::Name { name, ty: TypeId::ERROR, span }
            },
        }
    }

    fn resolve_name(&mut self, name: pscc_util::Symbol, span: Span) -> Expr {
        let Some(entry) = self.sema.symbols.lookup(name).cloned() else {
            self.sema.type_error(format!("undeclared identifier '{}'", name.as_str()), span);
            return Expr::Name { name, ty: TypeId::ERROR, span };
        };
        match entry.kind {
            SymbolKind::Const(value) => literal_from_const(value, span),
            SymbolKind::Var | SymbolKind::TypeName => Expr::Name { name, ty: entry.ty, span },
            SymbolKind::Function { params, ret_ty } => {
                let args = self.parse_call_args();
                let end = args.last().map(|a: &Expr| a.span()).unwrap_or(span);
                self.check_call_args(&params, &args, false, span);
                Expr::Funcall { name, args, ty: ret_ty, span: span.merge(end) }
            },
            SymbolKind::Procedure { .. } => {
                self.sema.type_error(format!("'{}' is a procedure, not a value", name.as_str()), span);
                Expr::Name { name, ty: TypeId::ERROR, span }
            },
        }
    }

    /// Parses an optional `(arg, arg, ...)` argument list; functions may be
    /// called with no parentheses at all when they take no arguments.
    pub(crate) fn parse_call_args(&mut self) -> Vec<Expr> {
        if !self.eat(&Token::LParen) {
            return Vec::new();
        }
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.parse_expr());
            while self.eat(&Token::Comma) {
                args.push(self.parse_expr());
            }
        }
        self.expect(Token::RParen);
        args
    }

    pub(crate) fn check_call_args(
        &mut self,
        params: &[pscc_sem::ParamInfo],
        args: &[Expr],
        variadic: bool,
        span: Span,
    ) {
        if variadic {
            return;
        }
        if args.len() != params.len() {
            self.sema.type_error(
                format!("expected {} argument(s), found {}", params.len(), args.len()),
                span,
            );
            return;
        }
        for (param, arg) in params.iter().zip(args.iter()) {
            self.sema.check_assignable(param.ty, arg.ty(), arg.span());
        }
    }
}

fn literal_from_const(value: pscc_sem::ConstValue, span: Span) -> Expr {
    match value {
        pscc_sem::ConstValue::Integer(value) => Expr::IntLiteral { value, span },
        pscc_sem::ConstValue::Real(value) => Expr::RealLiteral { value, span },
        pscc_sem::ConstValue::Char(value) => Expr::CharLiteral { value, span },
        pscc_sem::ConstValue::Boolean(value) => Expr::BoolLiteral { value, span },
    }
}
