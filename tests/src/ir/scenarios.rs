//! Scenarios A-F: concrete end-to-end shapes a source snippet (or, for
//! Scenario F, a hand-built AST — the grammar has no surface syntax that
//! reaches `Decl::Export`) must lower into.

use quixc_ast::kinds::{Purity, Visibility};
use quixc_ast::{AstArena, AstNode, Decl, Param, Span, Stmt, Type};
use quixc_ir::expr::{AbiTag, FloatLiteral, IntLiteral, IrExpr};
use quixc_ir::ids::ModuleIndex;
use quixc_ir::mangle::{demangle_quix, mangle_c_abi, mangle_quix};
use quixc_ir::module::IrModule;
use quixc_ir::node::IrNode;
use quixc_ir::types::IrType;

use crate::utils::compile;

#[test]
fn scenario_a_empty_program_lowers_to_an_empty_module() {
    let outcome = compile("");
    assert!(outcome.success);
    assert!(outcome.module.top_level.is_empty());
}

#[test]
fn scenario_b_single_constant() {
    let outcome = compile("const PI: f64 = 3.14;");
    assert!(outcome.success, "diagnostics: {:?}", outcome.diagnostics.iter().collect::<Vec<_>>());
    assert_eq!(outcome.module.top_level.len(), 1);

    let global_id = outcome.module.top_level[0];
    let IrNode::Expr(IrExpr::Local { name, storage, abi, mutable, ty, initializer }) =
        outcome.module.get(global_id)
    else {
        panic!("expected a global Local for a top-level const");
    };
    assert_eq!(outcome.module.resolve(*name), "PI");
    assert_eq!(*storage, quixc_ir::StorageClass::Global);
    assert_eq!(*abi, AbiTag::Internal);
    assert!(!*mutable);
    assert!(matches!(
        outcome.module.get(*ty),
        IrNode::Type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::F64))
    ));
    let init_id = initializer.expect("a const with an initializer lowers one");
    let IrNode::Expr(IrExpr::Cast { value, target_type, bit_cast }) = outcome.module.get(init_id) else {
        panic!("expected the initializer to be cast to the declared type");
    };
    assert!(!*bit_cast);
    assert!(matches!(
        outcome.module.get(*target_type),
        IrNode::Type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::F64))
    ));
    let IrNode::Expr(IrExpr::FloatLiteral(FloatLiteral::Native(v))) = outcome.module.get(*value) else {
        panic!("expected a native float literal underneath the cast");
    };
    assert!((*v - 3.14).abs() < 1e-9);

    let mangled = mangle_quix(&outcome.module, "PI", *ty);
    assert_eq!(mangled, "_Q2PIDd_0");
    let demangled = demangle_quix(&mangled).unwrap();
    assert_eq!(demangled["name"], serde_json::json!("PI"));
    assert_eq!(demangled["type"], serde_json::json!("f64"));
}

#[test]
fn scenario_c_recursive_function_self_call_resolves_to_its_own_function() {
    let outcome = compile(
        "fn f(x: i32) -> i32 { if (x <= 0) { return 0; } return f(x - 1) + x; }",
    );
    assert!(outcome.success, "diagnostics: {:?}", outcome.diagnostics.iter().collect::<Vec<_>>());
    assert_eq!(outcome.module.top_level.len(), 1);
    let func_id = outcome.module.top_level[0];

    let IrNode::Expr(IrExpr::Function { name, body, .. }) = outcome.module.get(func_id) else {
        panic!("expected a Function node");
    };
    assert_eq!(outcome.module.resolve(*name), "f");
    let body_id = body.expect("a FunctionDef always lowers a body");

    let IrNode::Expr(IrExpr::Sequence(stmts)) = outcome.module.get(body_id) else {
        panic!("expected the block body to lower to a Sequence");
    };
    assert_eq!(stmts.len(), 2, "an if-guard statement followed by the final return");

    let IrNode::Expr(IrExpr::Ret(Some(ret_value))) = outcome.module.get(stmts[1]) else {
        panic!("expected the second statement to be the final return");
    };
    let IrNode::Expr(IrExpr::Binary { op, lhs: call_id, rhs: x_id, .. }) = outcome.module.get(*ret_value)
    else {
        panic!("expected `f(x - 1) + x` to lower to a binary add");
    };
    assert_eq!(*op, quixc_ast::kinds::BinaryOperatorKind::Add);
    assert!(matches!(outcome.module.get(*x_id), IrNode::Expr(IrExpr::Ident { .. })));

    let IrNode::Expr(IrExpr::Call { target, .. }) = outcome.module.get(*call_id) else {
        panic!("expected `f(x - 1)` to lower to a Call");
    };
    let IrNode::Expr(IrExpr::Ident { name: callee_name, referent }) = outcome.module.get(*target) else {
        panic!("expected the call target to be an Ident");
    };
    assert_eq!(outcome.module.resolve(*callee_name), "f");
    assert_eq!(
        *referent,
        Some(func_id),
        "a self-recursive call must resolve back to its own enclosing function"
    );
}

#[test]
fn scenario_d_group_layout_sorts_fields_by_descending_size() {
    let outcome = compile("group G { a: u8, b: u64, c: u16 }");
    assert!(outcome.success, "diagnostics: {:?}", outcome.diagnostics.iter().collect::<Vec<_>>());
    assert_eq!(outcome.module.top_level.len(), 1);
    let group_ty = outcome.module.top_level[0];

    let IrNode::Type(IrType::Struct(field_ids)) = outcome.module.get(group_ty) else {
        panic!("expected a group to lower to a struct layout");
    };
    let sizes: Vec<u32> = field_ids
        .iter()
        .map(|&id| outcome.module.bit_size_of(id).unwrap())
        .collect();
    assert_eq!(sizes, vec![64, 16, 8], "fields must be sorted descending by bit size");
    assert_eq!(outcome.module.bit_size_of(group_ty).unwrap(), 88);
}

#[test]
fn scenario_e_enum_defaulting_fills_gaps_by_incrementing_from_the_last_explicit_value() {
    let outcome = compile("enum Color { Red, Green = 5, Blue }");
    assert!(outcome.success, "diagnostics: {:?}", outcome.diagnostics.iter().collect::<Vec<_>>());
    assert_eq!(outcome.module.top_level.len(), 1);

    // Blue is a defaulted item, so it must unfold to `Green + 1` rather than
    // fold to a plain constant `6`.
    let blue_id = outcome.module.top_level[0];
    let IrNode::Expr(IrExpr::Binary { op, lhs: green_id, rhs: one_id }) = outcome.module.get(blue_id) else {
        panic!("expected Blue to lower to an unfolded `Green + 1`, not a folded constant");
    };
    assert_eq!(*op, quixc_ast::kinds::BinaryOperatorKind::Add);
    let IrNode::Expr(IrExpr::IntLiteral(IntLiteral::Native(one))) = outcome.module.get(*one_id) else {
        panic!("expected the increment operand to be a native int literal");
    };
    assert_eq!(*one, 1);

    // Green's own expression (not a recomputed value) is Blue's left operand.
    let IrNode::Expr(IrExpr::IntLiteral(IntLiteral::Native(green))) = outcome.module.get(*green_id) else {
        panic!("expected Blue's left operand to be Green's own explicit expression");
    };
    assert_eq!(*green, 5);
}

#[test]
fn scenario_f_export_with_c_abi() {
    let mut ast = AstArena::new();
    let u8_ty = ast.alloc_type(Type::Primitive(quixc_ast::kinds::PrimitiveKind::U8), Span::dummy());
    let ptr_ty = ast.alloc_type(Type::Pointer(u8_ty), Span::dummy());
    let u64_ty = ast.alloc_type(Type::Primitive(quixc_ast::kinds::PrimitiveKind::U64), Span::dummy());
    let param_name = ast.intern("s");
    let params = vec![Param { name: param_name, ty: ptr_ty, default: None }];
    let fn_name = ast.intern("strlen");
    let fn_decl = ast.alloc_decl(
        Decl::FunctionDecl {
            name: fn_name,
            params,
            return_type: u64_ty,
            variadic: false,
            purity: Purity::ImpureThreadUnsafe,
            noreturn: false,
            visibility: Visibility::Public,
        },
        Span::dummy(),
    );
    let abi_name = ast.intern("c");
    let export_decl = ast.alloc_decl(
        Decl::Export { abi_name: Some(abi_name), items: vec![fn_decl] },
        Span::dummy(),
    );
    let root = ast.alloc(
        AstNode::Stmt(Stmt::SourceFile { decls: vec![export_decl] }),
        Span::dummy(),
    );

    let mut module = IrModule::new(ModuleIndex(0));
    let mut diags = quixc_ir::DiagnosticEngine::new();
    let ids = quixc_ir::lower::lower_source_file(&ast, root, &mut module, &mut diags);
    assert!(diags.is_empty());
    assert_eq!(ids.len(), 1);

    let IrNode::Expr(IrExpr::Sequence(wrapped)) = module.get(ids[0]) else {
        panic!("expected the export block to lower to a Sequence of wrapped items");
    };
    assert_eq!(wrapped.len(), 1);
    let IrNode::Expr(IrExpr::ExternWrapper { abi, payload }) = module.get(wrapped[0]) else {
        panic!("expected an ExternWrapper");
    };
    assert_eq!(*abi, AbiTag::C);
    let IrNode::Expr(IrExpr::Function { name, abi: fn_abi, body, .. }) = module.get(*payload) else {
        panic!("expected the wrapped payload to be the strlen Function");
    };
    assert_eq!(module.resolve(*name), "strlen");
    assert_eq!(*fn_abi, AbiTag::C);
    assert!(body.is_none(), "a FunctionDecl has no body");

    assert_eq!(mangle_c_abi("strlen"), "strlen");
}
