//! pscc-lir - machine-resource bookkeeping shared by the code generator:
//! register allocation, temp storage, literal pools, label allocation,
//! the cdecl calling convention, and per-routine stack frame layout.
//!
//! None of this crate walks the AST; `pscc-gen` owns that, calling into
//! these managers as it emits each instruction.

pub mod calling_convention;
pub mod error;
pub mod labels;
pub mod literals;
pub mod registers;
pub mod stack_frame;
pub mod temp_storage;

pub use calling_convention::{mangle, total_arg_bytes, ArgKind};
pub use error::{LirError, RegisterClass};
pub use labels::LabelAllocator;
pub use literals::{float_pool, string_pool, FloatPool, LiteralPool, StringPool};
pub use registers::{PhysicalRegister, RegisterManager};
pub use stack_frame::StackFrame;
pub use temp_storage::{TempSlot, TempStorageManager};
