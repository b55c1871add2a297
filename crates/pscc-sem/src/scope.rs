//! The symbol table.
//!
//! The language has no nested procedure declarations, so name resolution
//! only ever needs two levels: level 0 holds the built-in routines and
//! basic type names, level 1 holds the program's own constants, types,
//! variables, and routines. A routine's own parameters and local
//! declarations form one further level, pushed on entry and popped on
//! exit, so the table is implemented as a stack rather than hard-coded to
//! exactly two levels — the extra generality costs nothing and falls
//! straight out of the same push/pop shape.

use indexmap::IndexMap;
use pscc_util::{DefId, Symbol};

use crate::types::TypeId;

/// What a name in the symbol table denotes.
#[derive(Debug, Clone)]
pub enum SymbolKind {
    Const(ConstValue),
    /// A variable's storage location is assigned later, by the code
    /// generator's stack frame / static-data layout; the symbol table only
    /// tracks that the name exists and what type it holds.
    Var,
    TypeName,
    Procedure { params: Vec<ParamInfo>, variadic: bool },
    Function { params: Vec<ParamInfo>, ret_ty: TypeId },
}

#[derive(Debug, Clone, Copy)]
pub enum ConstValue {
    Integer(i64),
    Real(f64),
    Char(char),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy)]
pub struct ParamInfo {
    pub ty: TypeId,
    /// `var` parameters are passed by reference.
    pub by_ref: bool,
}

/// One entry in the symbol table.
#[derive(Debug, Clone)]
pub struct Entry {
    pub def_id: DefId,
    pub name: Symbol,
    pub ty: TypeId,
    pub kind: SymbolKind,
}

// Insertion order matters here: level 0 is the built-ins in declaration
// order and level 1 is the program's own names in declaration order, both
// observable (e.g. by a future "list declared names" diagnostic), so a plain
// hash map would silently scramble it.
struct Level {
    bindings: IndexMap<Symbol, Entry>,
}

/// Stack of symbol table levels, searched innermost-first.
pub struct SymbolTable {
    levels: Vec<Level>,
}

impl SymbolTable {
    /// Creates a table with an empty level 0. Callers populate level 0 with
    /// built-ins via [`SymbolTable::insert`] before pushing level 1.
    pub fn new() -> Self {
        Self {
            levels: vec![Level { bindings: IndexMap::new() }],
        }
    }

    pub fn enter_level(&mut self) {
        self.levels.push(Level { bindings: IndexMap::new() });
    }

    pub fn exit_level(&mut self) {
        self.levels.pop();
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Binds `name` in the innermost level. Returns `false` (without
    /// inserting) if `name` is already bound in that same level — the
    /// caller is expected to turn that into a redefinition diagnostic.
    pub fn insert(&mut self, entry: Entry) -> bool {
        let level = self.levels.last_mut().expect("symbol table has no levels");
        if level.bindings.contains_key(&entry.name) {
            return false;
        }
        level.bindings.insert(entry.name, entry);
        true
    }

    /// Looks up `name` starting at the innermost level.
    pub fn lookup(&self, name: Symbol) -> Option<&Entry> {
        for level in self.levels.iter().rev() {
            if let Some(entry) = level.bindings.get(&name) {
                return Some(entry);
            }
        }
        None
    }

    /// Looks up `name` only in the innermost level, used to detect
    /// redeclaration within the same block.
    pub fn lookup_local(&self, name: Symbol) -> Option<&Entry> {
        self.levels.last().and_then(|level| level.bindings.get(&name))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
