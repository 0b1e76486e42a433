//! S-expression-ish IR printer, the `quixc_ast::print` of this crate — used
//! by `qcc --dump-ir` (§6A) and handy for eyeballing a lowered module in
//! tests.

use std::fmt::{self, Write};

use crate::ids::IrId;
use crate::module::IrModule;
use crate::node::{children, IrNode};
use crate::types::IrType;

fn write_node(module: &IrModule, id: IrId, out: &mut impl Write, depth: usize) -> fmt::Result {
    let node = module.get(id);
    write!(out, "{}(", "  ".repeat(depth))?;
    write!(out, "{}#{}", node.kind_name(), id.index())?;
    write_scalar(module, node, out)?;
    writeln!(out)?;
    for child in children(node) {
        write_node(module, child, out, depth + 1)?;
    }
    if depth > 0 {
        writeln!(out, "{})", "  ".repeat(depth))?;
    } else {
        writeln!(out, ")")?;
    }
    Ok(())
}

fn write_scalar(module: &IrModule, node: &IrNode, out: &mut impl Write) -> fmt::Result {
    match node {
        IrNode::Type(IrType::Primitive(p)) => write!(out, " {p:?}"),
        IrNode::Type(IrType::Opaque(sym)) => write!(out, " {:?}", module.resolve(*sym)),
        IrNode::Type(IrType::Array { count, .. }) => write!(out, " [{count}]"),
        IrNode::Expr(crate::expr::IrExpr::IntLiteral(v)) => write!(out, " {v:?}"),
        IrNode::Expr(crate::expr::IrExpr::FloatLiteral(v)) => write!(out, " {v:?}"),
        IrNode::Expr(crate::expr::IrExpr::Ident { name, .. }) => write!(out, " {:?}", module.resolve(*name)),
        IrNode::Expr(crate::expr::IrExpr::Local { name, .. }) => write!(out, " {:?}", module.resolve(*name)),
        IrNode::Expr(crate::expr::IrExpr::Function { name, .. }) => write!(out, " {:?}", module.resolve(*name)),
        _ => Ok(()),
    }
}

/// Dumps every top-level declaration in `module` in source order.
#[must_use]
pub fn dump_to_string(module: &IrModule) -> String {
    let mut s = String::new();
    for &id in &module.top_level {
        let _ = write_node(module, id, &mut s, 0);
    }
    s
}
