//! pscc-sem - types and the symbol table.
//!
//! There is no separate semantic-analysis pass over a finished AST: the
//! parser calls directly into the [`TypeTable`] and [`SymbolTable`] this
//! crate provides while it builds the AST, so declarations are entered and
//! expressions are type-checked as they're parsed. This crate therefore has
//! no dependency on `pscc-par` — the dependency runs the other way.

pub mod analysis;
pub mod scope;
pub mod types;

pub use analysis::{const_type, SemaContext};
pub use scope::{ConstValue, Entry, ParamInfo, SymbolKind, SymbolTable};
pub use types::{align_up, Field, Type, TypeId, TypeTable};
