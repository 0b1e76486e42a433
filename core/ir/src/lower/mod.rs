//! Ties the lowering submodules together and exposes the crate-facing
//! entry point (§4.4.1, §4.4.9).

mod decl;
mod expr;
mod state;
mod stmt;
mod types;

pub use state::LoweringState;

use quixc_ast::{AstArena, NodeId, Stmt};

use crate::diagnostics::{guard, Diagnostic, DiagnosticClass, DiagnosticCode, DiagnosticEngine};
use crate::ids::IrId;
use crate::module::IrModule;

/// Lowers every top-level declaration under `root` (expected to be a
/// `Stmt::SourceFile`) into `module`. Each item is lowered behind a
/// `catch_unwind` guard so a panic in one item can't abort the whole
/// compilation unit (§4.4.9's crash-guarding redesign) — the offending item
/// is reported as a `Panic` diagnostic and skipped, mirroring how an
/// ordinary [`crate::errors::LowerError`] is reported and skipped.
/// `module.top_level` and the returned `Vec` both list only the items that
/// lowered cleanly, in source order.
pub fn lower_source_file(
    ast: &AstArena,
    root: NodeId,
    module: &mut IrModule,
    diags: &mut DiagnosticEngine,
) -> Vec<IrId> {
    let decls = match ast.get(root).as_stmt() {
        Some(Stmt::SourceFile { decls }) => decls.clone(),
        _ => {
            diags.push(Diagnostic::new(
                DiagnosticCode::BadTree,
                DiagnosticClass::Fatal,
                Some(ast.span(root)),
                "lowering root is not a source file",
            ));
            return Vec::new();
        }
    };

    let mut lowering_state = LoweringState::new();
    let mut out = Vec::with_capacity(decls.len());
    for decl_id in decls {
        let span = ast.span(decl_id);
        let result = guard(std::panic::AssertUnwindSafe(|| {
            decl::lower_decl(&mut lowering_state, ast, module, decl_id)
        }));
        match result {
            Ok(Ok(id)) => {
                module.top_level.push(id);
                out.push(id);
            }
            Ok(Err(lower_err)) => diags.push(Diagnostic::from_lower_error(&lower_err)),
            Err(panic_message) => diags.push(Diagnostic::new(
                DiagnosticCode::Panic,
                DiagnosticClass::Fatal,
                Some(span),
                panic_message,
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use quixc_ast::kinds::{CompositeKind, PrimitiveKind, Visibility};
    use quixc_ast::{Decl, Type};

    use crate::ids::ModuleIndex;
    use crate::module::IrModule;

    use super::*;

    #[test]
    fn lowers_a_typedef_and_a_struct() {
        let mut ast = AstArena::new();
        let u32_ty = ast.alloc_type(Type::Primitive(PrimitiveKind::U32), quixc_ast::Span::dummy());
        let name = ast.intern("myint");
        let typedef = ast.alloc_decl(
            Decl::Typedef { name, aliased: u32_ty, visibility: Visibility::Public },
            quixc_ast::Span::dummy(),
        );

        let field_name = ast.intern("x");
        let field_ty = ast.alloc_type(Type::Primitive(PrimitiveKind::U8), quixc_ast::Span::dummy());
        let struct_name = ast.intern("Point");
        let struct_def = ast.alloc_decl(
            Decl::CompositeDef {
                kind: CompositeKind::Struct,
                name: struct_name,
                fields: vec![quixc_ast::nodes::CompositeField {
                    name: field_name,
                    ty: field_ty,
                    default: None,
                    visibility: Visibility::Public,
                }],
                instance_methods: vec![],
                static_methods: vec![],
                attributes: vec![],
                visibility: Visibility::Public,
            },
            quixc_ast::Span::dummy(),
        );

        let root = ast.alloc(
            quixc_ast::AstNode::Stmt(Stmt::SourceFile { decls: vec![typedef, struct_def] }),
            quixc_ast::Span::dummy(),
        );

        let mut module = IrModule::new(ModuleIndex(0));
        let mut diags = DiagnosticEngine::new();
        let ids = lower_source_file(&ast, root, &mut module, &mut diags);

        assert!(diags.is_empty());
        assert_eq!(ids.len(), 2);
        assert_eq!(module.top_level.len(), 2);
    }

    #[test]
    fn failing_item_is_isolated_and_reported() {
        // An unimplemented construct (a templated type) fails only the item
        // that contains it; the rest of the file still lowers.
        let mut ast = AstArena::new();
        let base = ast.alloc_type(Type::Primitive(PrimitiveKind::U32), quixc_ast::Span::dummy());
        let type_args_base = base;
        let templated = ast.alloc_type(
            Type::Templated { base: type_args_base, type_args: vec![base] },
            quixc_ast::Span::dummy(),
        );
        let name = ast.intern("bad");
        let bad_typedef = ast.alloc_decl(
            Decl::Typedef { name, aliased: templated, visibility: Visibility::Public },
            quixc_ast::Span::dummy(),
        );
        let good_name = ast.intern("good");
        let good_typedef = ast.alloc_decl(
            Decl::Typedef { name: good_name, aliased: base, visibility: Visibility::Public },
            quixc_ast::Span::dummy(),
        );
        let root = ast.alloc(
            quixc_ast::AstNode::Stmt(Stmt::SourceFile { decls: vec![bad_typedef, good_typedef] }),
            quixc_ast::Span::dummy(),
        );

        let mut module = IrModule::new(ModuleIndex(0));
        let mut diags = DiagnosticEngine::new();
        let ids = lower_source_file(&ast, root, &mut module, &mut diags);

        assert_eq!(ids.len(), 1);
        assert_eq!(diags.len(), 1);
    }
}
