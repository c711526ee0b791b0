//! Frame layout: stack offsets for parameters and locals, and frame sizes.
//!
//! A frame, relative to its frame pointer:
//!
//! ```text
//!   ...
//!   FP - 3   second parameter
//!   FP - 2   first parameter
//!   FP - 1   return value
//!   FP + 0   return address
//!   FP + 1   caller's FP
//!   FP + 2   caller's SP
//!   FP + 3   first local
//!   ...
//! ```
//!
//! Nested blocks continue from the enclosing block's watermark; sibling
//! blocks reuse the same slots.

use log::debug;
use tau_parser::ast::*;

use super::{Result, already_set, missing};

/// Slots between the frame pointer and the first local.
pub const HEADER_SLOTS: i64 = 3;

/// Offset of the first parameter.
pub const FIRST_PARAM_OFFSET: i64 = -2;

/// Offset of the return value slot.
pub const RETURN_SLOT_OFFSET: i64 = -1;

/// Assign offsets to every parameter and local, and a size to every frame.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn layout(program: &Program<'_>) -> Result<()> {
    debug!("laying out {} frame(s)", program.functions.len());
    for &func in program.functions {
        layout_function(func)?;
    }
    Ok(())
}

fn layout_function(func: &FuncDecl<'_>) -> Result<()> {
    for (index, &param) in func.params.iter().enumerate() {
        set_offset(&param.name, FIRST_PARAM_OFFSET - index as i64)?;
    }

    let watermark = layout_compound(func.body, 0)?;
    let size = watermark + HEADER_SLOTS;
    func.set_frame_size(size)
        .map_err(|_| already_set(func.span, "frame size"))?;

    debug!("'{}': frame size {}", func.name.name, size);
    Ok(())
}

/// Lay out a block whose first free local slot is `current`, returning the
/// highest slot count reached inside it.
fn layout_compound(block: &CompoundStmt<'_>, mut current: i64) -> Result<i64> {
    for &decl in block.decls {
        set_offset(&decl.name, current + HEADER_SLOTS)?;
        let ty = decl
            .ty
            .get()
            .ok_or_else(|| missing(decl.span, "variable type"))?;
        current += ty.slot_count() as i64;
    }

    let mut watermark = current;
    for stmt in block.stmts {
        watermark = watermark.max(layout_stmt(stmt, current)?);
    }
    Ok(watermark)
}

fn layout_stmt(stmt: &Stmt<'_>, current: i64) -> Result<i64> {
    match *stmt {
        Stmt::Compound(block) => layout_compound(block, current),
        Stmt::If(if_stmt) => {
            let then_mark = layout_compound(if_stmt.then_branch, current)?;
            let else_mark = match if_stmt.else_branch {
                Some(else_branch) => layout_compound(else_branch, current)?,
                None => current,
            };
            Ok(then_mark.max(else_mark))
        }
        Stmt::While(while_stmt) => layout_compound(while_stmt.body, current),
        Stmt::Assign(_) | Stmt::Call(_) | Stmt::Print(_) | Stmt::Return(_) => Ok(current),
    }
}

fn set_offset(ident: &Ident<'_>, offset: i64) -> Result<()> {
    ident
        .symbol()
        .ok_or_else(|| missing(ident.span, "symbol"))?
        .set_offset(offset)
        .map_err(|_| already_set(ident.span, "offset"))
}
