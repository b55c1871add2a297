//! pscc-util - core utilities and foundation types shared by every other
//! `pscc-*` crate: string interning, source locations, diagnostics, typed
//! index vectors, and small integer handles for arena-style tables.
//!
//! Nothing in this crate knows about the source language being compiled;
//! it is substrate, reused unchanged by the lexer, parser, symbol table,
//! and code generator.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use error::{DiagnosticError, IndexVecError, SourceMapError, SymbolError};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
