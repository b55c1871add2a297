//! Operand representation: where a value or address currently lives.
//!
//! Plain identifier reads render straight to `[ebp±N]` without ever
//! touching a register — only a computed address (an array/pointer/field
//! chain) actually burns one. This keeps the common case (`x := y`) to a
//! single `mov`, matching the spare style the rest of this codegen aims
//! for, at the cost of diverging from a literal "acquire a register for
//! every name" reading of the textbook algorithm.

use pscc_lir::PhysicalRegister;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// An integer immediate.
    Imm(i64),
    /// A 32-bit integer register already holding the value.
    Reg(PhysicalRegister),
    /// `[ebp±disp]`: a stack slot holding the value directly.
    Mem(i32),
    /// `[reg]`: `reg` holds a computed address, the value lives there.
    Indirect(PhysicalRegister),
    /// A `.data`/`.bss` label, addressed as `[label]`.
    Data(String),
    /// A bare label or external symbol, used where NASM takes the
    /// address itself as an immediate (string literals, call targets).
    Sym(String),
    /// Top of the x87 stack; produced by real-valued expressions and
    /// casts, consumed by `fstp`/comparisons/further arithmetic.
    St0,
}

impl Operand {
    /// Renders the operand as it appears on the right of a `mov`/`cmp`/
    /// arithmetic mnemonic. Never call this for [`Operand::St0`]; x87
    /// instructions spell the stack position out themselves.
    pub fn text(&self) -> String {
        match self {
            Operand::Imm(v) => v.to_string(),
            Operand::Reg(r) => r.name().to_string(),
            Operand::Mem(disp) => mem_text(*disp),
            Operand::Indirect(r) => format!("[{}]", r.name()),
            Operand::Data(label) => format!("[{}]", label),
            Operand::Sym(label) => label.clone(),
            Operand::St0 => "st0".to_string(),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Mem(_) | Operand::Indirect(_) | Operand::Data(_))
    }

    /// The register this operand already occupies, if any (`Reg` holds
    /// the value; `Indirect` holds the address it's built from).
    pub fn register(&self) -> Option<PhysicalRegister> {
        match self {
            Operand::Reg(r) | Operand::Indirect(r) => Some(*r),
            _ => None,
        }
    }
}

/// Formats an `ebp`-relative displacement the way NASM expects: no `+`
/// before a negative offset, since `-N` already reads as one.
pub fn mem_text(disp: i32) -> String {
    if disp >= 0 {
        format!("[ebp+{}]", disp)
    } else {
        format!("[ebp{}]", disp)
    }
}
