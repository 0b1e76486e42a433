//! Structural validity checks (§4.2's `verify(sink) -> bool`).
//!
//! Rather than the teacher's boolean-returning `Builder` error accumulator
//! (`build_ast`'s `Vec<anyhow::Error>`), `verify` collects typed
//! [`AstError`]s into the caller's sink and returns whether the subtree
//! rooted at `id` is structurally sound. It does not check type-checking
//! concerns (that's the lowering pass, §4.4) — only shape: required
//! children present, enum values in range, decl/type contracts matching.

use crate::arena::AstArena;
use crate::errors::AstError;
use crate::kinds::CompositeKind;
use crate::nodes::{AstNode, Decl, NodeId, Type};

/// Walks the subtree rooted at `id`, pushing one [`AstError`] per violation
/// found into `sink`. Returns `true` iff no violations were found anywhere
/// in the subtree.
pub fn verify(arena: &AstArena, id: NodeId, sink: &mut Vec<AstError>) -> bool {
    let before = sink.len();
    verify_node(arena, id, sink);
    for child in arena.children(id) {
        verify(arena, child, sink);
    }
    sink.len() == before
}

fn verify_node(arena: &AstArena, id: NodeId, sink: &mut Vec<AstError>) {
    let span = arena.span(id);
    match arena.get(id) {
        AstNode::Decl(Decl::FunctionDecl {
            noreturn, purity, ..
        })
        | AstNode::Decl(Decl::FunctionDef {
            noreturn, purity, ..
        }) => {
            if *noreturn && !purity.permits_noreturn() {
                sink.push(AstError::NoreturnOnPureFunction { span });
            }
        }
        AstNode::Decl(Decl::CompositeDef { kind, fields, .. }) => {
            if *kind == CompositeKind::Enum && !fields.is_empty() {
                sink.push(AstError::VerificationFailed {
                    span,
                    reason: "enum composite-def must not carry struct-style fields".to_string(),
                });
            }
        }
        AstNode::Type(Type::Array { size, .. }) => {
            if !matches!(
                arena.get(*size),
                AstNode::Expr(crate::nodes::Expr::IntLiteral { .. })
                    | AstNode::Expr(crate::nodes::Expr::Identifier { .. })
                    | AstNode::Expr(crate::nodes::Expr::Binary { .. })
            ) {
                sink.push(AstError::VerificationFailed {
                    span,
                    reason: "array size must be a constant expression".to_string(),
                });
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Purity, Visibility};
    use crate::nodes::Expr;
    use crate::span::Span;

    #[test]
    fn noreturn_on_pure_function_is_rejected() {
        let mut arena = AstArena::new();
        let void_ty = arena.alloc_type(Type::Primitive(crate::kinds::PrimitiveKind::Void), Span::dummy());
        let body = arena.alloc_stmt(
            crate::nodes::Stmt::Block {
                safety: crate::kinds::SafetyMode::Unknown,
                stmts: vec![],
            },
            Span::dummy(),
        );
        let name = arena.intern("f");
        let decl = arena.alloc_decl(
            Decl::FunctionDef {
                name,
                params: vec![],
                return_type: void_ty,
                variadic: false,
                purity: Purity::Pure,
                noreturn: true,
                visibility: Visibility::Private,
                body,
                preconditions: vec![],
                postconditions: vec![],
                captures: vec![],
            },
            Span::dummy(),
        );
        let mut sink = Vec::new();
        assert!(!verify(&arena, decl, &mut sink));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn well_formed_literal_verifies_clean() {
        let mut arena = AstArena::new();
        let lit = arena.alloc_expr(Expr::BoolLiteral(true), Span::dummy());
        let mut sink = Vec::new();
        assert!(verify(&arena, lit, &mut sink));
        assert!(sink.is_empty());
    }
}
