//! cdecl calling convention for the 32-bit runtime this compiler targets.
//!
//! Arguments are pushed by the caller in source order; the callee never
//! pops them. Level-zero (built-in) names are mangled with a leading `_`,
//! and a handful of external math/IO shims additionally get a `32` suffix
//! because they bridge this compiler's 32-bit Pascal `real` to the C
//! runtime's `double`-based implementations.

/// Built-in names whose external symbol is the `32`-suffixed shim rather
/// than the bare name.
const NEEDS_32_SUFFIX: &[&str] =
    &["exp", "sin", "cos", "sqrt", "round", "iround", "writef", "writelnf"];

/// Mangles a level-zero routine name to its external symbol.
pub fn mangle(name: &str) -> String {
    if NEEDS_32_SUFFIX.contains(&name) {
        format!("_{}32", name)
    } else {
        format!("_{}", name)
    }
}

/// Size in bytes of a pushed argument of the given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Integer, address, or char value: `push op` (4 bytes).
    Integer,
    /// Real value: `sub esp,4` then `fstp [esp]` (4 bytes).
    Real,
}

impl ArgKind {
    pub fn pushed_size(self) -> u32 {
        4
    }
}

/// Total bytes of argument space to release after a call, given the
/// argument list in source (push) order.
pub fn total_arg_bytes(args: &[ArgKind]) -> u32 {
    args.iter().map(|a| a.pushed_size()).sum()
}
