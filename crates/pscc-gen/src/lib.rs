//! Code generation: lowers a type-checked [`pscc_par::ast::Program`] into
//! NASM x86-32 assembly text, calling into `pscc_lir`'s register, temp
//! storage, label, and literal-pool managers for every machine resource it
//! consumes.

pub mod debug;
pub mod error;
pub mod generator;
pub mod operand;

pub use error::{CodeGenError, Result};
pub use generator::generate;
pub use operand::Operand;
