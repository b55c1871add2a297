//! Case-label parsing.
//!
//! The language has no pattern matching; the closest analog is a `case`
//! statement's label list, a comma-separated set of constants sharing one
//! arm body.

use pscc_lex::Token;
use pscc_sem::ConstValue;

use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses `const { , const }` up to (not including) the `:` that
    /// introduces the arm's body.
    pub(crate) fn parse_case_labels(&mut self) -> Vec<ConstValue> {
        let mut labels = vec![self.parse_case_label()];
        while self.eat(&Token::Comma) {
            labels.push(self.parse_case_label());
        }
        labels
    }

    fn parse_case_label(&mut self) -> ConstValue {
        match self.current().clone() {
            Token::IntLiteral(_) | Token::Minus => ConstValue::Integer(self.parse_const_int()),
            Token::Ident(name) => {
                self.advance();
                match self.sema.symbols.lookup(name).map(|e| e.kind.clone()) {
                    Some(pscc_sem::SymbolKind::Const(value)) => value,
                    _ => {
                        let span = self.current_span();
                        self.error(format!("'{}' is not a constant", name.as_str()), span);
                        ConstValue::Integer(0)
                    },
                }
            },
            _ => {
                let span = self.current_span();
                self.error("expected a case label".to_string(), span);
                ConstValue::Integer(0)
            },
        }
    }
}
