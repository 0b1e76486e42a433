//! S-expression-ish node printer (§4.2's `print(out, debug)`).
//!
//! `debug` selects whether node ids are included alongside the kind name —
//! handy when cross-referencing against a separately dumped span table, but
//! noisy for the common "does this subtree look right" case.

use std::fmt::{self, Write};

use crate::arena::AstArena;
use crate::kinds::PrimitiveKind;
use crate::nodes::{AstNode, Expr, FStringPart, NodeId};

pub fn print(arena: &AstArena, id: NodeId, out: &mut impl Write, debug: bool) -> fmt::Result {
    let node = arena.get(id);
    write!(out, "(")?;
    if debug {
        write!(out, "{}#{}", node.kind_name(), id.index())?;
    } else {
        write!(out, "{}", node.kind_name())?;
    }
    print_scalar(arena, node, out)?;
    for child in arena.children(id) {
        write!(out, " ")?;
        print(arena, child, out, debug)?;
    }
    write!(out, ")")
}

#[must_use]
pub fn print_to_string(arena: &AstArena, id: NodeId, debug: bool) -> String {
    let mut s = String::new();
    print(arena, id, &mut s, debug).expect("writing to a String never fails");
    s
}

fn print_scalar(arena: &AstArena, node: &AstNode, out: &mut impl Write) -> fmt::Result {
    match node {
        AstNode::Expr(Expr::BoolLiteral(b)) => write!(out, " {b}"),
        AstNode::Expr(Expr::CharLiteral(c)) => write!(out, " {c:?}"),
        AstNode::Expr(Expr::StringLiteral(s)) => write!(out, " {:?}", arena.resolve(*s)),
        AstNode::Expr(Expr::IntLiteral { value }) => match value {
            crate::nodes::IntLiteralValue::Native(v) => write!(out, " {v}"),
            crate::nodes::IntLiteralValue::ArbitraryPrecision(s) => {
                write!(out, " {}", arena.resolve(*s))
            }
        },
        AstNode::Expr(Expr::FloatLiteral { value }) => match value {
            crate::nodes::FloatLiteralValue::Native(v) => write!(out, " {v}"),
            crate::nodes::FloatLiteralValue::Decimal(s) => write!(out, " {}", arena.resolve(*s)),
        },
        AstNode::Expr(Expr::Identifier { name, .. }) => write!(out, " {}", arena.resolve(*name)),
        AstNode::Expr(Expr::FieldAccess { field, .. }) => write!(out, " .{}", arena.resolve(*field)),
        AstNode::Expr(Expr::FString(parts)) => {
            for part in parts {
                if let FStringPart::Literal(s) = part {
                    write!(out, " {:?}", arena.resolve(*s))?;
                }
            }
            Ok(())
        }
        AstNode::Type(crate::nodes::Type::Primitive(p)) => write!(out, " {}", primitive_name(*p)),
        AstNode::Type(crate::nodes::Type::Opaque(s) | crate::nodes::Type::Unresolved(s)) => {
            write!(out, " {}", arena.resolve(*s))
        }
        AstNode::Decl(d) => write!(out, " {}", decl_name(arena, d)),
        _ => Ok(()),
    }
}

fn primitive_name(p: PrimitiveKind) -> &'static str {
    p.as_str()
}

fn decl_name(arena: &AstArena, d: &crate::nodes::Decl) -> String {
    use crate::nodes::Decl;
    match d {
        Decl::Typedef { name, .. }
        | Decl::FunctionDecl { name, .. }
        | Decl::FunctionDef { name, .. }
        | Decl::CompositeDef { name, .. }
        | Decl::EnumDef { name, .. }
        | Decl::Variable { name, .. }
        | Decl::Scope { name, .. } => arena.resolve(*name).to_string(),
        Decl::Export { abi_name, .. } => abi_name
            .map(|s| arena.resolve(s).to_string())
            .unwrap_or_else(|| "std".to_string()),
        Decl::Import { path, .. } => path
            .iter()
            .map(|s| arena.resolve(*s))
            .collect::<Vec<_>>()
            .join("::"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn prints_a_literal() {
        let mut arena = AstArena::new();
        let id = arena.alloc_expr(Expr::BoolLiteral(true), Span::dummy());
        assert_eq!(print_to_string(&arena, id, false), "(BoolLiteral true)");
    }

    #[test]
    fn prints_nested_binary() {
        let mut arena = AstArena::new();
        let a = arena.alloc_expr(Expr::BoolLiteral(true), Span::dummy());
        let b = arena.alloc_expr(Expr::BoolLiteral(false), Span::dummy());
        let bin = arena.alloc_expr(
            Expr::Binary {
                op: crate::kinds::BinaryOperatorKind::LogicalAnd,
                lhs: a,
                rhs: b,
            },
            Span::dummy(),
        );
        assert_eq!(
            print_to_string(&arena, bin, false),
            "(Binary (BoolLiteral true) (BoolLiteral false))"
        );
    }
}
