//! The tree-walking code generator: turns a type-checked [`Program`] into
//! NASM x86-32 assembly text.
//!
//! The whole program body is emitted as a single `_asm_main`, calling into
//! the external runtime (`pascal.inc`) that `write`/`writeln`/`new`/the math
//! built-ins bottom out in. The register and temp-storage managers are reset to
//! "everything free" at every statement boundary; within a statement,
//! intermediate results are tracked as [`Operand`]s so the handful of
//! helpers below (`gen_address`, `to_register`, ...) don't have to care
//! whether a value currently lives in a register, on the stack, or behind
//! a computed pointer.
//!
//! Two constructs this generator supports have no corresponding reduction
//! in `pscc-par`'s AST, so they're handled here instead:
//! - `new(p)` is resolved to a size argument and a call to the runtime's
//!   allocator at the point of generation, rather than being desugared to
//!   an ordinary `Funcall` during parsing.
//! - `write`/`writeln`/`read`/`readln` keep their user-typed name through
//!   parsing; the per-argument overload (`writei` vs `writef`, and the
//!   non-final `write` form used between multiple trailing arguments) is
//!   resolved here, not in the parser.
//!
//! Scalar locals and parameters — including `char` and `boolean`, whose
//! true size is one byte — are always given a 4-byte-aligned 4-byte slot
//! and addressed with plain dword `mov`/`cmp`, so no instruction needs a
//! size override and no register needs an 8-bit sub-name. Record field
//! layout and array element spacing are unaffected: those still use the
//! exact byte sizes `pscc_sem::TypeTable` computes, since only a record's
//! or array's own *total* size would be rounded here, not its fields'.

use std::collections::HashMap;

use pscc_lir::{
    float_pool, mangle, string_pool, total_arg_bytes, ArgKind, FloatPool, LabelAllocator,
    PhysicalRegister, RegisterManager, StackFrame, StringPool, TempStorageManager,
};
use pscc_par::ast::{BinaryOp, Expr, Program, Stmt, UnaryOp};
use pscc_sem::{Type, TypeId, TypeTable};
use pscc_util::Symbol;

use crate::debug;
use crate::error::{CodeGenError, Result};
use crate::operand::{mem_text, Operand};

/// Where a call's result lands, if anywhere.
#[derive(Clone, Copy, PartialEq, Eq)]
enum RetPlacement {
    Void,
    Integer,
    Real,
}

pub struct Generator<'a> {
    types: &'a TypeTable,
    debug: bool,
    out: String,
    regs: RegisterManager,
    temps: TempStorageManager,
    labels: LabelAllocator,
    strings: StringPool,
    floats: FloatPool,
    frame: StackFrame,
    var_offsets: HashMap<Symbol, i32>,
}

/// Generates the complete assembly listing for `program`.
pub fn generate(program: &Program, types: &TypeTable, debug: bool) -> Result<String> {
    let mut gen = Generator {
        types,
        debug,
        out: String::new(),
        regs: RegisterManager::new(),
        temps: TempStorageManager::new(),
        labels: LabelAllocator::new(0),
        strings: string_pool(),
        floats: float_pool(),
        frame: StackFrame::new(),
        var_offsets: HashMap::new(),
    };
    gen.run(program)?;
    Ok(gen.out)
}

fn is_relational(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
}

fn jcc_for(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Eq => "je",
        BinaryOp::Ne => "jne",
        BinaryOp::Lt => "jl",
        BinaryOp::Le => "jle",
        BinaryOp::Gt => "jg",
        BinaryOp::Ge => "jge",
        _ => unreachable!("jcc_for called on a non-relational operator"),
    }
}

fn invert_jcc(jcc: &str) -> &'static str {
    match jcc {
        "je" => "jne",
        "jne" => "je",
        "jl" => "jge",
        "jle" => "jg",
        "jg" => "jle",
        "jge" => "jl",
        _ => "je",
    }
}

/// Escapes a decoded string literal for a NASM `db "...", 0` directive.
/// Source strings are single-quote delimited, so an embedded double quote
/// is unlikely; if one occurs it's folded to a single quote rather than
/// producing unterminated assembly.
fn escape_nasm_string(s: &str) -> String {
    s.replace('"', "'")
}

impl<'a> Generator<'a> {
    fn run(&mut self, program: &Program) -> Result<()> {
        self.emit("%include \"pascal.inc\"");
        self.emit("");
        self.emit("segment .text");
        self.emit("global _asm_main");
        self.emit("");
        if self.debug {
            self.emit_raw_block(&debug::ast_dump(program));
            self.emit_raw_block(&debug::symbol_dump(program, self.types));
            self.emit("");
        }
        self.generate_main(program)?;
        self.emit_data_bss();
        Ok(())
    }

    fn emit(&mut self, line: impl Into<String>) {
        self.out.push_str(&line.into());
        self.out.push('\n');
    }

    /// Emits a multi-line block (already containing its own `\n`s and `;`
    /// comment markers) verbatim.
    fn emit_raw_block(&mut self, block: &str) {
        self.out.push_str(block);
    }

    // ---- layout -----------------------------------------------------

    /// Size/align to actually reserve for a scalar local or parameter: at
    /// least a full word, so every name is addressable with plain dword
    /// instructions. Aggregates keep their true size from `pscc_sem`.
    fn slot_size_align(&self, ty: TypeId) -> (u32, u32) {
        match self.types.get(ty) {
            Type::Array { .. } | Type::Record { .. } => {
                (self.types.size_of(ty), self.types.align_of(ty).max(1))
            },
            _ => (self.types.size_of(ty).max(4), self.types.align_of(ty).max(4)),
        }
    }

    fn layout_program(&mut self, program: &Program) {
        self.frame = StackFrame::new();
        self.var_offsets.clear();
        for local in &program.locals {
            let (size, align) = self.slot_size_align(local.ty);
            self.frame.allocate(local.name, size, align);
        }
        for local in &program.locals {
            let disp = self.frame.displacement(local.name).expect("just allocated");
            self.var_offsets.insert(local.name, disp);
        }
    }

    // ---- program shell ------------------------------------------------

    fn generate_main(&mut self, program: &Program) -> Result<()> {
        self.layout_program(program);
        self.emit("_asm_main:");
        self.emit_prologue();
        self.gen_stmt(&program.body)?;
        self.emit_epilogue_main();
        Ok(())
    }

    fn emit_prologue(&mut self) {
        self.emit("    push ebp");
        self.emit("    mov ebp, esp");
        let size = self.frame.frame_size();
        if size > 0 {
            self.emit(format!("    sub esp, {}", size));
        }
    }

    fn emit_epilogue_main(&mut self) {
        self.emit("    mov eax, 0");
        self.emit("    mov esp, ebp");
        self.emit("    pop ebp");
        self.emit("    ret");
    }

    fn emit_data_bss(&mut self) {
        let strings: Vec<(String, String)> = self.strings.entries().map(|(l, v)| (l, v.clone())).collect();
        let floats: Vec<(String, f64)> = self.floats.entries().map(|(l, v)| (l, *v)).collect();
        let temps = self.temps.all_slots();

        self.emit("");
        self.emit("segment .data");
        for (label, value) in strings {
            self.emit(format!("{} db \"{}\", 0", label, escape_nasm_string(&value)));
        }
        for (label, value) in floats {
            self.emit(format!("{} dd {}", label, value));
        }

        self.emit("");
        self.emit("segment .bss");
        for slot in temps {
            self.emit(format!("{} resb {}", slot.label(), slot.size));
        }
    }

    // ---- statements ---------------------------------------------------

    fn gen_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        if self.debug {
            self.emit(format!("    ; node: {}", debug::trace_tag(stmt)));
        }
        match stmt {
            Stmt::Empty => {},
            Stmt::Compound(stmts) => {
                for s in stmts {
                    self.gen_stmt(s)?;
                }
            },
            Stmt::Assign { place, value, .. } => self.gen_assign(place, value)?,
            Stmt::ProcCall { name, args, .. } => self.gen_proc_call(*name, args)?,
            Stmt::If { cond, then_branch, else_branch, .. } => {
                self.gen_if(cond, then_branch, else_branch.as_deref())?
            },
            Stmt::While { cond, body, .. } => self.gen_while(cond, body)?,
            Stmt::Repeat { body, cond, .. } => self.gen_repeat(body, cond)?,
            Stmt::For { var, from, to, downto, body, .. } => {
                self.gen_for(*var, from, to, *downto, body)?
            },
        }
        self.regs.free_registers();
        Ok(())
    }

    fn gen_assign(&mut self, place: &Expr, value: &Expr) -> Result<()> {
        if self.types.is_real(place.ty()) {
            self.gen_real(value)?;
            let addr = self.gen_address(place)?;
            self.emit(format!("    fstp dword {}", addr.text()));
            return Ok(());
        }
        let dest = self.gen_address(place)?;
        let src = self.gen_value(value)?;
        self.store(&dest, src)
    }

    /// `mov dest, src`, forcing `src` into a register first if both sides
    /// would otherwise be memory operands (`mov mem, mem` doesn't exist).
    fn store(&mut self, dest: &Operand, src: Operand) -> Result<()> {
        if dest.is_memory() && src.is_memory() {
            let reg = self.to_register(src)?;
            self.emit(format!("    mov {}, {}", dest.text(), reg.name()));
            self.regs.free_register(Some(reg));
        } else {
            self.emit(format!("    mov {}, {}", dest.text(), src.text()));
            if let Some(reg) = src.register() {
                self.regs.free_register(Some(reg));
            }
        }
        Ok(())
    }

    fn gen_if(&mut self, cond: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) -> Result<()> {
        let jcc = self.gen_condition_jump(cond)?;
        let k = self.labels.alloc();
        let then_label = format!("THEN_CLAUSE{}", k);
        let end_label = format!("ENDIF{}", k);
        self.emit(format!("    {} {}", jcc, then_label));
        match else_branch {
            Some(stmt) => self.gen_stmt(stmt)?,
            None => self.emit("    ; no else branch"),
        }
        self.emit(format!("    jmp {}", end_label));
        self.emit(format!("{}:", then_label));
        self.gen_stmt(then_branch)?;
        self.emit(format!("{}:", end_label));
        Ok(())
    }

    fn gen_while(&mut self, cond: &Expr, body: &Stmt) -> Result<()> {
        let top = LabelAllocator::format(self.labels.alloc());
        self.emit(format!("{}:", top));
        let jcc = self.gen_condition_jump(cond)?;
        let end = LabelAllocator::format(self.labels.alloc());
        self.emit(format!("    {} {}", invert_jcc(jcc), end));
        self.gen_stmt(body)?;
        self.emit(format!("    jmp {}", top));
        self.emit(format!("{}:", end));
        Ok(())
    }

    fn gen_repeat(&mut self, body: &[Stmt], cond: &Expr) -> Result<()> {
        let top = LabelAllocator::format(self.labels.alloc());
        self.emit(format!("{}:", top));
        for s in body {
            self.gen_stmt(s)?;
        }
        let jcc = self.gen_condition_jump(cond)?;
        self.emit(format!("    {} {}", invert_jcc(jcc), top));
        Ok(())
    }

    fn gen_for(&mut self, var: Symbol, from: &Expr, to: &Expr, downto: bool, body: &Stmt) -> Result<()> {
        let var_addr = self.var_mem(var)?;
        let from_v = self.gen_value(from)?;
        self.store(&var_addr, from_v)?;
        self.regs.free_registers();

        let top = LabelAllocator::format(self.labels.alloc());
        self.emit(format!("{}:", top));

        let cur = self.regs.acquire_int()?;
        self.emit(format!("    mov {}, {}", cur.name(), var_addr.text()));
        let to_v = self.gen_value(to)?;
        self.emit(format!("    cmp {}, {}", cur.name(), to_v.text()));
        self.regs.free_register(Some(cur));
        if let Some(reg) = to_v.register() {
            self.regs.free_register(Some(reg));
        }
        let jcc = if downto { "jge" } else { "jle" };
        let end = LabelAllocator::format(self.labels.alloc());
        self.emit(format!("    {} {}", invert_jcc(jcc), end));

        self.gen_stmt(body)?;

        let step = self.regs.acquire_int()?;
        self.emit(format!("    mov {}, {}", step.name(), var_addr.text()));
        self.emit(format!("    {} {}, 1", if downto { "sub" } else { "add" }, step.name()));
        self.emit(format!("    mov {}, {}", var_addr.text(), step.name()));
        self.regs.free_register(Some(step));

        self.emit(format!("    jmp {}", top));
        self.emit(format!("{}:", end));
        Ok(())
    }

    /// Emits the comparison (or 0/1 materialization) needed to branch on
    /// `cond`, returning the `jcc` mnemonic that jumps when `cond` holds.
    fn gen_condition_jump(&mut self, cond: &Expr) -> Result<&'static str> {
        if let Expr::Binary { op, left, right, .. } = cond {
            if is_relational(*op) {
                return self.gen_comparison(*op, left, right);
            }
        }
        let v = self.gen_value(cond)?;
        match v {
            Operand::Reg(r) => {
                self.emit(format!("    cmp {}, 0", r.name()));
                self.regs.free_register(Some(r));
            },
            other => self.emit(format!("    cmp {}, 0", other.text())),
        }
        Ok("jne")
    }

    fn gen_comparison(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<&'static str> {
        if self.types.is_real(left.ty()) || self.types.is_real(right.ty()) {
            self.gen_real(left)?;
            self.gen_real(right)?;
            self.emit("    fcomip st0, st1");
            self.emit("    fstp st0");
            return Ok(jcc_for(op));
        }
        let l = self.gen_value(left)?;
        let r = self.gen_value(right)?;
        let reg = self.to_register(l)?;
        self.emit(format!("    cmp {}, {}", reg.name(), r.text()));
        self.regs.free_register(Some(reg));
        if let Some(rr) = r.register() {
            self.regs.free_register(Some(rr));
        }
        Ok(jcc_for(op))
    }

    // ---- addressing -----------------------------------------------------

    fn var_mem(&self, name: Symbol) -> Result<Operand> {
        self.var_offsets
            .get(&name)
            .map(|&disp| Operand::Mem(disp))
            .ok_or_else(|| CodeGenError::Unsupported(format!("unknown variable '{}'", name.as_str())))
    }

    /// Computes the address an lvalue expression denotes: `Mem` for a
    /// plain name, `Indirect` once a field offset, array index, or
    /// pointer dereference has forced a register to hold the address.
    fn gen_address(&mut self, e: &Expr) -> Result<Operand> {
        match e {
            Expr::Name { name, .. } => self.var_mem(*name),
            Expr::Field { base, field, .. } => {
                let offset = self.field_offset(base.ty(), *field)?;
                let base_addr = self.gen_address(base)?;
                self.offset_address(base_addr, offset as i32)
            },
            Expr::Index { base, index, .. } => {
                let (elem_ty, lo) = self.array_elem_and_lo(base.ty())?;
                let elem_size = self.types.size_of(elem_ty) as i64;
                let base_addr = self.gen_address(base)?;
                let base_reg = self.ensure_register_address(base_addr)?;
                let idx_v = self.gen_value(index)?;
                let idx_reg = self.to_register(idx_v)?;
                if lo != 0 {
                    self.emit(format!("    sub {}, {}", idx_reg.name(), lo));
                }
                if elem_size != 1 {
                    self.emit(format!("    imul {}, {}, {}", idx_reg.name(), idx_reg.name(), elem_size));
                }
                self.emit(format!("    add {}, {}", base_reg.name(), idx_reg.name()));
                self.regs.free_register(Some(idx_reg));
                Ok(Operand::Indirect(base_reg))
            },
            Expr::Deref { base, .. } => {
                let v = self.gen_value(base)?;
                let reg = self.to_register(v)?;
                Ok(Operand::Indirect(reg))
            },
            _ => Err(CodeGenError::AssignToImmediate),
        }
    }

    fn offset_address(&mut self, addr: Operand, off: i32) -> Result<Operand> {
        match addr {
            Operand::Mem(d) => Ok(Operand::Mem(d + off)),
            Operand::Indirect(r) => {
                if off != 0 {
                    self.emit(format!("    add {}, {}", r.name(), off));
                }
                Ok(Operand::Indirect(r))
            },
            _ => Err(CodeGenError::Unsupported("cannot offset a non-address operand".into())),
        }
    }

    /// Materializes an address as a register holding it: `lea` for a
    /// `Mem` operand, the register already in hand for `Indirect`.
    fn ensure_register_address(&mut self, addr: Operand) -> Result<PhysicalRegister> {
        match addr {
            Operand::Mem(d) => {
                let reg = self.regs.acquire_int()?;
                self.emit(format!("    lea {}, {}", reg.name(), mem_text(d)));
                Ok(reg)
            },
            Operand::Indirect(r) => Ok(r),
            _ => Err(CodeGenError::Unsupported("cannot take the address of this expression".into())),
        }
    }

    /// Loads any operand into a fresh (or already-owned) integer register.
    fn to_register(&mut self, op: Operand) -> Result<PhysicalRegister> {
        match op {
            Operand::Reg(r) => Ok(r),
            Operand::Indirect(r) => {
                self.emit(format!("    mov {}, [{}]", r.name(), r.name()));
                Ok(r)
            },
            Operand::Mem(d) => {
                let reg = self.regs.acquire_int()?;
                self.emit(format!("    mov {}, {}", reg.name(), mem_text(d)));
                Ok(reg)
            },
            Operand::Data(label) => {
                let reg = self.regs.acquire_int()?;
                self.emit(format!("    mov {}, [{}]", reg.name(), label));
                Ok(reg)
            },
            Operand::Imm(v) => {
                let reg = self.regs.acquire_int()?;
                self.emit(format!("    mov {}, {}", reg.name(), v));
                Ok(reg)
            },
            Operand::Sym(label) => {
                let reg = self.regs.acquire_int()?;
                self.emit(format!("    mov {}, {}", reg.name(), label));
                Ok(reg)
            },
            Operand::St0 => Err(CodeGenError::Unsupported("a real value cannot be loaded into an integer register".into())),
        }
    }

    fn field_offset(&self, record_ty: TypeId, field: Symbol) -> Result<u32> {
        match self.types.get(record_ty) {
            Type::Record { fields, .. } => fields
                .iter()
                .find(|f| f.name == field)
                .map(|f| f.offset)
                .ok_or_else(|| CodeGenError::Unsupported(format!("no field '{}'", field.as_str()))),
            _ => Err(CodeGenError::Unsupported("field access on a non-record".into())),
        }
    }

    fn array_elem_and_lo(&self, array_ty: TypeId) -> Result<(TypeId, i64)> {
        match self.types.get(array_ty) {
            Type::Array { index, elem } => {
                let lo = match self.types.get(*index) {
                    Type::Subrange { lo, .. } => *lo,
                    _ => 0,
                };
                Ok((*elem, lo))
            },
            _ => Err(CodeGenError::Unsupported("indexing a non-array value".into())),
        }
    }

    // ---- value expressions ----------------------------------------------

    fn gen_value(&mut self, e: &Expr) -> Result<Operand> {
        match e {
            Expr::IntLiteral { value, .. } => Ok(Operand::Imm(*value)),
            Expr::CharLiteral { value, .. } => Ok(Operand::Imm(*value as i64)),
            Expr::BoolLiteral { value, .. } => Ok(Operand::Imm(*value as i64)),
            Expr::StringLiteral { value, .. } => {
                let label = self.strings.get_label(value.as_str().to_string());
                Ok(Operand::Sym(label))
            },
            Expr::RealLiteral { .. } => {
                Err(CodeGenError::Unsupported("a real literal cannot be used as an integer value".into()))
            },
            Expr::Name { .. } | Expr::Field { .. } | Expr::Index { .. } | Expr::Deref { .. } => {
                self.gen_address(e)
            },
            Expr::Unary { op, operand, .. } => self.gen_unary(*op, operand),
            Expr::Binary { op, left, right, .. } => self.gen_binary(*op, left, right),
            Expr::Funcall { name, args, ty, .. } => self.gen_funcall(*name, args, *ty),
            Expr::CastReal { .. } => {
                Err(CodeGenError::Unsupported("a real-valued expression cannot be used as an integer value".into()))
            },
            Expr::CastInt { operand, .. } => self.gen_cast_int(operand),
        }
    }

    /// Evaluates a real-typed expression, leaving its value on `st0`.
    fn gen_real(&mut self, e: &Expr) -> Result<()> {
        match e {
            Expr::RealLiteral { value, .. } => {
                let label = self.floats.get_label(*value);
                self.emit(format!("    fld dword [{}]", label));
                Ok(())
            },
            Expr::CastReal { operand, .. } => self.gen_cast_real(operand),
            Expr::Name { .. } | Expr::Field { .. } | Expr::Index { .. } | Expr::Deref { .. } => {
                let addr = self.gen_address(e)?;
                self.emit(format!("    fld dword {}", addr.text()));
                Ok(())
            },
            Expr::Unary { op: UnaryOp::Neg, operand, .. } => {
                self.gen_real(operand)?;
                self.emit("    fchs");
                Ok(())
            },
            Expr::Unary { op: UnaryOp::Plus, operand, .. } => self.gen_real(operand),
            Expr::Binary { op, left, right, .. } => self.gen_real_binary(*op, left, right),
            Expr::Funcall { name, args, ty, .. } => {
                self.gen_funcall(*name, args, *ty)?;
                Ok(())
            },
            _ => Err(CodeGenError::Unsupported("expected a real-valued expression".into())),
        }
    }

    fn gen_real_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<()> {
        self.gen_real(left)?;
        self.gen_real(right)?;
        let mnemonic = match op {
            BinaryOp::Add => "faddp st1",
            BinaryOp::Sub => "fsubp st1",
            BinaryOp::Mul => "fmulp st1",
            BinaryOp::RealDiv => "fdivp st1",
            _ => {
                return Err(CodeGenError::Unsupported(format!(
                    "{:?} is not a real arithmetic operator",
                    op
                )))
            },
        };
        self.emit(format!("    {}", mnemonic));
        Ok(())
    }

    fn gen_cast_real(&mut self, operand: &Expr) -> Result<()> {
        let v = self.gen_value(operand)?;
        match v {
            Operand::Mem(d) => self.emit(format!("    fild dword {}", mem_text(d))),
            Operand::Indirect(r) => {
                self.emit(format!("    fild dword [{}]", r.name()));
                self.regs.free_register(Some(r));
            },
            other => {
                let reg = self.to_register(other)?;
                let slot = self.temps.acquire(4);
                self.emit(format!("    mov [{}], {}", slot.label(), reg.name()));
                self.emit(format!("    fild dword [{}]", slot.label()));
                self.regs.free_register(Some(reg));
                self.temps.free(slot);
            },
        }
        Ok(())
    }

    fn gen_cast_int(&mut self, operand: &Expr) -> Result<Operand> {
        self.gen_real(operand)?;
        let slot = self.temps.acquire(4);
        self.emit(format!("    fistp dword [{}]", slot.label()));
        Ok(Operand::Data(slot.label()))
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Operand> {
        match op {
            UnaryOp::Plus => self.gen_value(operand),
            UnaryOp::Neg => {
                let v = self.gen_value(operand)?;
                let reg = self.to_register(v)?;
                self.emit(format!("    neg {}", reg.name()));
                Ok(Operand::Reg(reg))
            },
            UnaryOp::Not => {
                let v = self.gen_value(operand)?;
                let reg = self.to_register(v)?;
                self.emit(format!("    xor {}, 1", reg.name()));
                Ok(Operand::Reg(reg))
            },
        }
    }

    fn gen_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Operand> {
        use BinaryOp::*;
        match op {
            Eq | Ne | Lt | Le | Gt | Ge => self.gen_bool_from_comparison(op, left, right),
            And => self.gen_logical(left, right, "and"),
            Or => self.gen_logical(left, right, "or"),
            Add | Sub | Mul => self.gen_arith(op, left, right),
            RealDiv => {
                Err(CodeGenError::Unsupported("real division produces a real value, not an integer operand".into()))
            },
        }
    }

    fn gen_bool_from_comparison(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Operand> {
        let jcc = self.gen_comparison(op, left, right)?;
        let reg = self.regs.acquire_int()?;
        let true_label = LabelAllocator::format(self.labels.alloc());
        let end_label = LabelAllocator::format(self.labels.alloc());
        self.emit(format!("    mov {}, 0", reg.name()));
        self.emit(format!("    {} {}", jcc, true_label));
        self.emit(format!("    jmp {}", end_label));
        self.emit(format!("{}:", true_label));
        self.emit(format!("    mov {}, 1", reg.name()));
        self.emit(format!("{}:", end_label));
        Ok(Operand::Reg(reg))
    }

    fn gen_logical(&mut self, left: &Expr, right: &Expr, mnemonic: &str) -> Result<Operand> {
        let l = self.gen_value(left)?;
        let scratch = self.to_register(l)?;
        let r = self.gen_value(right)?;
        self.emit(format!("    {} {}, {}", mnemonic, scratch.name(), r.text()));
        if let Some(rr) = r.register() {
            self.regs.free_register(Some(rr));
        }
        Ok(Operand::Reg(scratch))
    }

    fn gen_arith(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Operand> {
        let l = self.gen_value(left)?;
        let scratch = self.to_register(l)?;
        let r = self.gen_value(right)?;
        match op {
            BinaryOp::Add => self.emit(format!("    add {}, {}", scratch.name(), r.text())),
            BinaryOp::Sub => self.emit(format!("    sub {}, {}", scratch.name(), r.text())),
            BinaryOp::Mul => {
                if let Operand::Imm(v) = r {
                    self.emit(format!("    imul {}, {}, {}", scratch.name(), scratch.name(), v));
                } else {
                    self.emit(format!("    imul {}, {}", scratch.name(), r.text()));
                }
            },
            _ => unreachable!("gen_arith called with a non-arithmetic operator"),
        }
        if let Some(rr) = r.register() {
            self.regs.free_register(Some(rr));
        }
        Ok(Operand::Reg(scratch))
    }

    // ---- calls ------------------------------------------------------

    fn gen_funcall(&mut self, name: Symbol, args: &[Expr], ty: TypeId) -> Result<Operand> {
        let ret = if self.types.is_real(ty) { RetPlacement::Real } else { RetPlacement::Integer };
        let mangled = mangle(name.as_str());
        self.emit_call(&mangled, args, ret)
    }

    fn gen_proc_call(&mut self, name: Symbol, args: &[Expr]) -> Result<()> {
        match name.as_str() {
            "write" | "writeln" => self.gen_output_call(name.as_str(), args),
            "read" | "readln" => self.gen_input_call(name.as_str(), args),
            "new" => self.gen_new_call(args),
            other => {
                let mangled = mangle(other);
                self.emit_call(&mangled, args, RetPlacement::Void)?;
                Ok(())
            },
        }
    }

    fn output_suffix(&self, arg: &Expr) -> &'static str {
        let ty = arg.ty();
        if self.types.is_real(ty) {
            "f"
        } else if ty == TypeId::CHAR
            || matches!(self.types.get(ty), Type::Array { elem, .. } if *elem == TypeId::CHAR)
        {
            ""
        } else {
            "i"
        }
    }

    fn gen_output_call(&mut self, base: &str, args: &[Expr]) -> Result<()> {
        if args.is_empty() {
            let mangled = mangle(base);
            self.emit_call(&mangled, &[], RetPlacement::Void)?;
            return Ok(());
        }
        let last = args.len() - 1;
        for (i, arg) in args.iter().enumerate() {
            let suffix = self.output_suffix(arg);
            let callee = if i == last { format!("{}{}", base, suffix) } else { format!("write{}", suffix) };
            let mangled = mangle(&callee);
            self.emit_call(&mangled, std::slice::from_ref(arg), RetPlacement::Void)?;
        }
        Ok(())
    }

    fn gen_input_call(&mut self, base: &str, args: &[Expr]) -> Result<()> {
        if args.is_empty() {
            let mangled = mangle(base);
            self.emit_call(&mangled, &[], RetPlacement::Void)?;
            return Ok(());
        }
        for arg in args {
            let mangled = mangle(base);
            let result = self.emit_call(&mangled, &[], RetPlacement::Integer)?;
            let reg = self.to_register(result)?;
            let addr = self.gen_address(arg)?;
            self.emit(format!("    mov {}, {}", addr.text(), reg.name()));
            self.regs.free_register(Some(reg));
        }
        Ok(())
    }

    /// `new(p)` has no parser-time reduction to a sized allocation call
    /// (unlike the rest of this language's synthetic AST nodes), so it's
    /// resolved here: look up `p`'s pointee size, call the runtime
    /// allocator with it, and store the result back through `p`.
    fn gen_new_call(&mut self, args: &[Expr]) -> Result<()> {
        let p = args
            .first()
            .ok_or_else(|| CodeGenError::Unsupported("new() requires one pointer argument".into()))?;
        let pointee = match self.types.get(p.ty()) {
            Type::Pointer(inner) => *inner,
            _ => return Err(CodeGenError::Unsupported("new() argument must be a pointer".into())),
        };
        let size = self.types.size_of(pointee) as i64;
        let size_lit = Expr::IntLiteral { value: size, span: p.span() };
        let mangled = mangle("new");
        let result = self.emit_call(&mangled, std::slice::from_ref(&size_lit), RetPlacement::Integer)?;
        let reg = self.to_register(result)?;
        let addr = self.gen_address(p)?;
        self.emit(format!("    mov {}, {}", addr.text(), reg.name()));
        self.regs.free_register(Some(reg));
        Ok(())
    }

    /// Evaluates and pushes `args` in source order, calls `mangled`, and
    /// releases the argument space. Every call target here is a runtime
    /// built-in, so arguments always pass by value. Preserves `eax` across
    /// the call if the generator's own bookkeeping still needs it.
    fn emit_call(&mut self, mangled: &str, args: &[Expr], ret: RetPlacement) -> Result<Operand> {
        let preserved_eax = self.regs.is_acquired(PhysicalRegister::Eax);
        if preserved_eax {
            self.emit("    push eax");
        }

        let mut arg_kinds = Vec::with_capacity(args.len());
        for arg in args {
            if self.types.is_real(arg.ty()) {
                self.gen_real(arg)?;
                self.emit("    sub esp, 4");
                self.emit("    fstp dword [esp]");
                arg_kinds.push(ArgKind::Real);
            } else {
                let v = self.gen_value(arg)?;
                let reg = v.register();
                self.emit(format!("    push {}", v.text()));
                if let Some(r) = reg {
                    self.regs.free_register(Some(r));
                }
                arg_kinds.push(ArgKind::Integer);
            }
        }

        self.emit(format!("    call {}", mangled));
        let total = total_arg_bytes(&arg_kinds);
        if total > 0 {
            self.emit(format!("    add esp, {}", total));
        }

        let result = match ret {
            RetPlacement::Void => Operand::Imm(0),
            RetPlacement::Real => Operand::St0,
            RetPlacement::Integer => {
                if preserved_eax {
                    let fresh = self.regs.acquire_int()?;
                    self.emit(format!("    mov {}, eax", fresh.name()));
                    Operand::Reg(fresh)
                } else {
                    self.regs.acquire_specific(PhysicalRegister::Eax)?;
                    Operand::Reg(PhysicalRegister::Eax)
                }
            },
        };

        if preserved_eax {
            self.emit("    pop eax");
        }
        Ok(result)
    }
}
