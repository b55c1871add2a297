//! Fatal errors raised by the low-level machine-resource managers.
//!
//! These indicate the code generator asked for more of a finite resource
//! than the target machine has, rather than anything about the source
//! program; the driver treats them as unrecoverable.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LirError {
    #[error("no free {0:?} register available")]
    AllocationExhausted(RegisterClass),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterClass {
    Int,
    Float,
}
