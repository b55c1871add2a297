//! Fatal errors raised while walking the AST to emit assembly.
//!
//! Unlike `pscc_sem`'s diagnostics, these never reach the user as ordinary
//! compiler output: a well-typed program that reaches code generation is
//! assumed to be generable, so anything here means either a finite machine
//! resource ran out or the AST asked for a construct this generator doesn't
//! implement.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error(transparent)]
    Resource(#[from] pscc_lir::LirError),

    #[error("cannot assign to an immediate value")]
    AssignToImmediate,

    #[error("unsupported construct: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_is_std_error<E: std::error::Error>(_: &E) {}

    #[test]
    fn variants_round_trip_through_anyhow_with_message_intact() {
        let variants = vec![
            CodeGenError::AssignToImmediate,
            CodeGenError::Unsupported("goto into a different scope".to_string()),
        ];
        for err in variants {
            assert_is_std_error(&err);
            let message = err.to_string();
            let wrapped = anyhow::Error::from(err);
            assert_eq!(wrapped.to_string(), message);
        }
    }

    #[test]
    fn resource_variant_wraps_lir_error_transparently() {
        let lir = pscc_lir::LirError::AllocationExhausted(pscc_lir::RegisterClass::Int);
        let message = lir.to_string();
        let err = CodeGenError::from(lir);
        assert_is_std_error(&err);
        assert_eq!(err.to_string(), message);
        let wrapped = anyhow::Error::from(err);
        assert_eq!(wrapped.to_string(), message);
    }
}
