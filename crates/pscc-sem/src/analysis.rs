//! Built-in declarations and the shared semantic context.
//!
//! There is no separate AST-to-HIR lowering pass: the parser builds and
//! type-checks expressions and statements directly against the types and
//! symbol table this crate provides, so `pscc-par` depends on `pscc-sem`
//! rather than the other way around. This module supplies the starting
//! point for that: a [`SemaContext`] with level 0 already populated with
//! the language's basic types and built-in routines, plus the handful of
//! checks (assignability, operator applicability) every caller needs.

use pscc_util::{DefIdGenerator, Handler, Span};

use crate::scope::{ConstValue, Entry, ParamInfo, SymbolKind, SymbolTable};
use crate::types::{Type, TypeId, TypeTable};
use pscc_util::symbol::{
    ID_COS, ID_EOF, ID_EXP, ID_IROUND, ID_NEW, ID_ORD, ID_READ, ID_READLN, ID_ROUND, ID_SIN,
    ID_SQRT, ID_WRITE, ID_WRITEF, ID_WRITELN, ID_WRITELNF, ID_WRITELNI, ID_WRITEI, TY_BOOLEAN,
    TY_CHAR, TY_INTEGER, TY_REAL,
};

/// Bundles the type arena, symbol table, and id/diagnostic machinery shared
/// across a single compilation.
pub struct SemaContext<'a> {
    pub types: TypeTable,
    pub symbols: SymbolTable,
    pub def_ids: DefIdGenerator,
    pub handler: &'a mut Handler,
}

impl<'a> SemaContext<'a> {
    /// Creates a context with level 0 (built-ins) populated and level 1
    /// (the program's own scope) pushed and ready for declarations.
    pub fn new(handler: &'a mut Handler) -> Self {
        let mut types = TypeTable::new();
        let mut symbols = SymbolTable::new();
        let def_ids = DefIdGenerator::new();
        install_builtins(&mut types, &mut symbols, &def_ids);
        symbols.enter_level();
        Self { types, symbols, def_ids, handler }
    }

    /// Reports a type error at `span` and returns `TypeId::ERROR`, so
    /// callers can use the result as a type like any other rather than
    /// threading an `Option` through the rest of analysis.
    pub fn type_error(&mut self, message: impl Into<String>, span: Span) -> TypeId {
        use pscc_util::DiagnosticBuilder;
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
        TypeId::ERROR
    }

    /// Checks that a value of type `found` may be assigned (or passed) where
    /// `expected` is required, reporting a diagnostic and returning `false`
    /// if not. `TypeId::ERROR` on either side is assumed already diagnosed
    /// and is silently accepted, so one bad expression doesn't cascade into
    /// a wall of follow-on errors.
    pub fn check_assignable(&mut self, expected: TypeId, found: TypeId, span: Span) -> bool {
        if expected == TypeId::ERROR || found == TypeId::ERROR {
            return true;
        }
        if self.types.coerces_to(found, expected) {
            return true;
        }
        self.type_error(
            format!(
                "type mismatch: cannot assign {:?} to {:?}",
                self.types.get(found),
                self.types.get(expected)
            ),
            span,
        );
        false
    }

    /// Resolves a record field by name, reporting an "unknown field"
    /// diagnostic if `record_ty` has no such field or isn't a record.
    pub fn resolve_field(&mut self, record_ty: TypeId, name: pscc_util::Symbol, span: Span) -> TypeId {
        if record_ty == TypeId::ERROR {
            return TypeId::ERROR;
        }
        match self.types.get(record_ty).clone() {
            Type::Record { fields, .. } => {
                match fields.iter().find(|f| f.name == name) {
                    Some(field) => field.ty,
                    None => self.type_error(format!("no field named '{}'", name.as_str()), span),
                }
            },
            _ => self.type_error("value is not a record", span),
        }
    }

    /// Dereferences `ty`, reporting if it isn't a pointer.
    pub fn resolve_deref(&mut self, ty: TypeId, span: Span) -> TypeId {
        if ty == TypeId::ERROR {
            return TypeId::ERROR;
        }
        match self.types.get(ty) {
            Type::Pointer(inner) => *inner,
            _ => self.type_error("cannot dereference a non-pointer value", span),
        }
    }

    /// Resolves an array index, reporting if `ty` isn't an array.
    pub fn resolve_element(&mut self, ty: TypeId, span: Span) -> TypeId {
        if ty == TypeId::ERROR {
            return TypeId::ERROR;
        }
        match self.types.get(ty) {
            Type::Array { elem, .. } => *elem,
            _ => self.type_error("value is not an array", span),
        }
    }
}

/// Installs the basic type names and built-in routines into level 0.
fn install_builtins(types: &mut TypeTable, symbols: &mut SymbolTable, def_ids: &DefIdGenerator) {
    let basic = [
        (TY_INTEGER, TypeId::INTEGER),
        (TY_REAL, TypeId::REAL),
        (TY_CHAR, TypeId::CHAR),
        (TY_BOOLEAN, TypeId::BOOLEAN),
    ];
    for (name, ty) in basic {
        symbols.insert(Entry {
            def_id: def_ids.next(),
            name,
            ty,
            kind: SymbolKind::TypeName,
        });
    }

    let real_to_real = [ID_EXP, ID_SIN, ID_COS, ID_SQRT];
    for name in real_to_real {
        insert_function(symbols, def_ids, name, &[TypeId::REAL], TypeId::REAL);
    }

    insert_function(symbols, def_ids, ID_ROUND, &[TypeId::REAL], TypeId::INTEGER);
    insert_function(symbols, def_ids, ID_IROUND, &[TypeId::REAL], TypeId::INTEGER);
    insert_function(symbols, def_ids, ID_ORD, &[TypeId::CHAR], TypeId::INTEGER);
    insert_function(symbols, def_ids, ID_EOF, &[], TypeId::BOOLEAN);

    // `new` takes a single pointer parameter whose element type varies per
    // call site, so it has no single fixed signature here; registering it
    // `variadic` just reserves the name and skips arity checking, and the
    // code generator special-cases the call by name.
    insert_procedure(symbols, def_ids, ID_NEW, &[], true);

    let variadic_output = [ID_WRITE, ID_WRITELN, ID_WRITEF, ID_WRITELNF, ID_WRITEI, ID_WRITELNI];
    for name in variadic_output {
        insert_procedure(symbols, def_ids, name, &[], true);
    }
    let variadic_input = [ID_READ, ID_READLN];
    for name in variadic_input {
        insert_procedure(symbols, def_ids, name, &[], true);
    }

    let _ = types;
}

fn insert_function(
    symbols: &mut SymbolTable,
    def_ids: &DefIdGenerator,
    name: pscc_util::Symbol,
    param_tys: &[TypeId],
    ret_ty: TypeId,
) {
    let params = param_tys.iter().map(|&ty| ParamInfo { ty, by_ref: false }).collect();
    symbols.insert(Entry {
        def_id: def_ids.next(),
        name,
        ty: ret_ty,
        kind: SymbolKind::Function { params, ret_ty },
    });
}

fn insert_procedure(
    symbols: &mut SymbolTable,
    def_ids: &DefIdGenerator,
    name: pscc_util::Symbol,
    param_tys: &[TypeId],
    variadic: bool,
) {
    let params = param_tys.iter().map(|&ty| ParamInfo { ty, by_ref: false }).collect();
    symbols.insert(Entry {
        def_id: def_ids.next(),
        name,
        ty: TypeId::ERROR,
        kind: SymbolKind::Procedure { params, variadic },
    });
}

/// Constructs a constant's type directly from its value, used when
/// declaring a `const` without an explicit type annotation.
pub fn const_type(value: &ConstValue) -> TypeId {
    match value {
        ConstValue::Integer(_) => TypeId::INTEGER,
        ConstValue::Real(_) => TypeId::REAL,
        ConstValue::Char(_) => TypeId::CHAR,
        ConstValue::Boolean(_) => TypeId::BOOLEAN,
    }
}
