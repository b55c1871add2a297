//! `-d` debug commentary: an AST dump and a symbol summary emitted as
//! leading block comments, plus a short trace tag before each statement's
//! generated instructions.
//!
//! These never influence codegen decisions — they are text appended
//! around instructions the generator would emit identically without
//! `-d` (testable property 17).

use pscc_par::ast::{Expr, Program, Stmt};
use pscc_sem::TypeTable;

/// One line per AST node, indexed in visitation order, wrapped in an
/// `; AST` banner.
pub fn ast_dump(program: &Program) -> String {
    let mut out = String::new();
    let mut index = 0usize;
    out.push_str("; AST\n");
    out.push_str(&format!("; [{}] program {}\n", next(&mut index), program.name.as_str()));
    dump_stmt(&program.body, &mut out, &mut index, 1);
    out
}

fn next(index: &mut usize) -> usize {
    let i = *index;
    *index += 1;
    i
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn dump_stmt(stmt: &Stmt, out: &mut String, index: &mut usize, depth: usize) {
    let i = next(index);
    match stmt {
        Stmt::Empty => out.push_str(&format!("; [{}]{}empty\n", i, indent(depth))),
        Stmt::Assign { place, value, .. } => {
            out.push_str(&format!(
                "; [{}]{}assign {} := {}\n",
                i,
                indent(depth),
                describe_expr(place),
                describe_expr(value)
            ));
        },
        Stmt::ProcCall { name, args, .. } => {
            out.push_str(&format!(
                "; [{}]{}call {}({} args)\n",
                i,
                indent(depth),
                name.as_str(),
                args.len()
            ));
        },
        Stmt::Compound(stmts) => {
            out.push_str(&format!("; [{}]{}compound ({} stmts)\n", i, indent(depth), stmts.len()));
            for s in stmts {
                dump_stmt(s, out, index, depth + 1);
            }
        },
        Stmt::If { cond, then_branch, else_branch, .. } => {
            out.push_str(&format!("; [{}]{}if {}\n", i, indent(depth), describe_expr(cond)));
            dump_stmt(then_branch, out, index, depth + 1);
            if let Some(e) = else_branch {
                dump_stmt(e, out, index, depth + 1);
            }
        },
        Stmt::While { cond, body, .. } => {
            out.push_str(&format!("; [{}]{}while {}\n", i, indent(depth), describe_expr(cond)));
            dump_stmt(body, out, index, depth + 1);
        },
        Stmt::Repeat { body, cond, .. } => {
            out.push_str(&format!("; [{}]{}repeat until {}\n", i, indent(depth), describe_expr(cond)));
            for s in body {
                dump_stmt(s, out, index, depth + 1);
            }
        },
        Stmt::For { var, from, to, downto, body, .. } => {
            out.push_str(&format!(
                "; [{}]{}for {} := {} {} {}\n",
                i,
                indent(depth),
                var.as_str(),
                describe_expr(from),
                if *downto { "downto" } else { "to" },
                describe_expr(to)
            ));
            dump_stmt(body, out, index, depth + 1);
        },
    }
}

fn describe_expr(e: &Expr) -> String {
    match e {
        Expr::IntLiteral { value, .. } => value.to_string(),
        Expr::RealLiteral { value, .. } => value.to_string(),
        Expr::CharLiteral { value, .. } => format!("'{}'", value),
        Expr::BoolLiteral { value, .. } => value.to_string(),
        Expr::StringLiteral { value, .. } => format!("\"{}\"", value.as_str()),
        Expr::Name { name, .. } => name.as_str().to_string(),
        Expr::Field { base, field, .. } => format!("{}.{}", describe_expr(base), field.as_str()),
        Expr::Index { base, index, .. } => format!("{}[{}]", describe_expr(base), describe_expr(index)),
        Expr::Deref { base, .. } => format!("{}^", describe_expr(base)),
        Expr::Unary { operand, .. } => format!("unary({})", describe_expr(operand)),
        Expr::Binary { left, right, .. } => format!("({} op {})", describe_expr(left), describe_expr(right)),
        Expr::Funcall { name, args, .. } => format!("{}({} args)", name.as_str(), args.len()),
        Expr::CastReal { operand, .. } => format!("castreal({})", describe_expr(operand)),
        Expr::CastInt { operand, .. } => format!("castint({})", describe_expr(operand)),
    }
}

/// A symbol summary banner: the program's locals with their resolved
/// types, drawn from the `locals` list recorded at parse time rather
/// than a live symbol-table walk (there is no such iterator over
/// `pscc_sem::SymbolTable`, only point lookups).
pub fn symbol_dump(program: &Program, types: &TypeTable) -> String {
    let mut out = String::new();
    out.push_str("; symbols\n");
    for local in &program.locals {
        out.push_str(&format!("; var {} : {:?}\n", local.name.as_str(), types.get(local.ty)));
    }
    out
}

/// Short tag for the `; node:` trace comment preceding a statement's
/// generated instructions.
pub fn trace_tag(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Empty => "empty",
        Stmt::Assign { .. } => "assign",
        Stmt::ProcCall { .. } => "call",
        Stmt::Compound(_) => "compound",
        Stmt::If { .. } => "if",
        Stmt::While { .. } => "while",
        Stmt::Repeat { .. } => "repeat",
        Stmt::For { .. } => "for",
    }
}
