//! Broad grammar coverage, driven through `crate::utils::parse` (the CLI's
//! own reference tokenizer), mirroring the teacher's `ast::builder` test
//! style but against this language's actual surface syntax.

use crate::utils::parse;
use quixc_ast::kinds::{BindingKind, CompositeKind, Mutability, Visibility};
use quixc_ast::{Decl, Stmt};

fn top_level_decls(source: &str) -> (quixc_ast::AstArena, Vec<quixc_ast::NodeId>) {
    let (arena, root, issues) = parse(source);
    assert!(issues.is_empty(), "unexpected parse issues: {issues:?}");
    let Stmt::SourceFile { decls } = arena.get(root).as_stmt().unwrap().clone() else {
        panic!("parse() always roots a source file");
    };
    (arena, decls)
}

#[test]
fn parses_a_simple_function() {
    let (arena, decls) = top_level_decls("fn add(a: u32, b: u32) -> u32 { return a + b; }");
    assert_eq!(decls.len(), 1);
    let Decl::FunctionDef { name, params, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    assert_eq!(arena.resolve(*name), "add");
    assert_eq!(params.len(), 2);
}

#[test]
fn parses_a_function_with_no_params() {
    let (_arena, decls) = top_level_decls("fn answer() -> u32 { return 42; }");
    assert_eq!(decls.len(), 1);
}

#[test]
fn parses_multiple_top_level_items() {
    let (_arena, decls) = top_level_decls(
        r#"
        fn one() -> u32 { return 1; }
        fn two() -> u32 { return 2; }
        fn three(x: u32) -> u32 { return x; }
        "#,
    );
    assert_eq!(decls.len(), 3);
}

#[test]
fn parses_a_const_binding_as_immutable() {
    let (arena, decls) = top_level_decls("const PI: f64 = 3.14;");
    assert_eq!(decls.len(), 1);
    let Decl::Variable { binding, mutability, name, .. } = arena.get(decls[0]).as_decl().unwrap()
    else {
        panic!("expected a variable declaration");
    };
    assert_eq!(*binding, BindingKind::Const);
    assert_eq!(*mutability, Mutability::Immutable);
    assert_eq!(arena.resolve(*name), "PI");
}

#[test]
fn parses_a_var_binding_as_mutable() {
    let (arena, decls) = top_level_decls("var counter: u32 = 0;");
    let Decl::Variable { binding, mutability, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a variable declaration");
    };
    assert_eq!(*binding, BindingKind::Var);
    assert_eq!(*mutability, Mutability::Mutable);
}

#[test]
fn parses_a_let_binding_as_mutable() {
    let (arena, decls) = top_level_decls("let total: u32 = 0;");
    let Decl::Variable { binding, mutability, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a variable declaration");
    };
    assert_eq!(*binding, BindingKind::Let);
    assert_eq!(*mutability, Mutability::Mutable);
}

#[test]
fn parses_a_pub_struct_with_semicolon_fields() {
    let (arena, decls) = top_level_decls(
        r#"
        struct Point {
            pub x: u32;
            pub y: u32;
        }
        "#,
    );
    let Decl::CompositeDef { kind, name, fields, visibility, .. } =
        arena.get(decls[0]).as_decl().unwrap()
    else {
        panic!("expected a composite definition");
    };
    assert_eq!(*kind, CompositeKind::Struct);
    assert_eq!(arena.resolve(*name), "Point");
    assert_eq!(fields.len(), 2);
    assert_eq!(*visibility, Visibility::Private);
}

#[test]
fn parses_a_group_with_comma_fields() {
    let (arena, decls) = top_level_decls("group Flags { a: u8, b: u8 }");
    let Decl::CompositeDef { kind, fields, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a composite definition");
    };
    assert_eq!(*kind, CompositeKind::Group);
    assert_eq!(fields.len(), 2);
}

#[test]
fn parses_a_union_definition() {
    let (arena, decls) = top_level_decls("union Number { i: i32; f: f32; }");
    let Decl::CompositeDef { kind, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a composite definition");
    };
    assert_eq!(*kind, CompositeKind::Union);
}

#[test]
fn parses_an_enum_definition() {
    let (arena, decls) = top_level_decls("enum Color { Red, Green, Blue }");
    let Decl::EnumDef { name, items, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected an enum definition");
    };
    assert_eq!(arena.resolve(*name), "Color");
    assert_eq!(items.len(), 3);
}

#[test]
fn parses_if_else() {
    let (arena, decls) = top_level_decls(
        r#"
        fn classify(x: u32) -> u32 {
            if (x == 0) {
                return 0;
            } else {
                return 1;
            }
        }
        "#,
    );
    let Decl::FunctionDef { body, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    let Stmt::Block { stmts, .. } = arena.get(*body).as_stmt().unwrap() else {
        panic!("expected a block body");
    };
    assert_eq!(stmts.len(), 1);
    assert!(matches!(arena.get(stmts[0]).as_stmt().unwrap(), Stmt::If { .. }));
}

#[test]
fn parses_while_loop() {
    let (arena, decls) =
        top_level_decls("fn loopy() { while (true) { break; } }");
    let Decl::FunctionDef { body, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    let Stmt::Block { stmts, .. } = arena.get(*body).as_stmt().unwrap() else {
        panic!("expected a block body");
    };
    assert!(matches!(arena.get(stmts[0]).as_stmt().unwrap(), Stmt::While { .. }));
}

#[test]
fn parses_for_loop() {
    let (arena, decls) = top_level_decls(
        "fn loopy() { for (i = 0; i < 10; i = i + 1) { continue; } }",
    );
    let Decl::FunctionDef { body, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    let Stmt::Block { stmts, .. } = arena.get(*body).as_stmt().unwrap() else {
        panic!("expected a block body");
    };
    assert!(matches!(arena.get(stmts[0]).as_stmt().unwrap(), Stmt::For { .. }));
}

#[test]
fn parses_binary_expression_precedence() {
    let (arena, decls) = top_level_decls("fn calc() -> u32 { return 1 + 2 * 3; }");
    let Decl::FunctionDef { body, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    let Stmt::Block { stmts, .. } = arena.get(*body).as_stmt().unwrap() else {
        panic!("expected a block body");
    };
    let Stmt::Return(Some(expr)) = arena.get(stmts[0]).as_stmt().unwrap() else {
        panic!("expected a return statement");
    };
    let quixc_ast::Expr::Binary { op, .. } = arena.get(*expr).as_expr().unwrap() else {
        panic!("expected a binary expression");
    };
    // `*` binds tighter than `+`, so the outer node is the addition.
    assert_eq!(*op, quixc_ast::kinds::BinaryOperatorKind::Add);
}

#[test]
fn parses_a_call_expression() {
    let (arena, decls) =
        top_level_decls("fn main() -> u32 { return add(1, 2); }");
    let Decl::FunctionDef { body, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    let Stmt::Block { stmts, .. } = arena.get(*body).as_stmt().unwrap() else {
        panic!("expected a block body");
    };
    let Stmt::Return(Some(expr)) = arena.get(stmts[0]).as_stmt().unwrap() else {
        panic!("expected a return statement");
    };
    let quixc_ast::Expr::Call { args, .. } = arena.get(*expr).as_expr().unwrap() else {
        panic!("expected a call expression");
    };
    assert_eq!(args.len(), 2);
}

#[test]
fn parses_field_access() {
    let (arena, decls) = top_level_decls("fn get(p: Point) -> u32 { return p.x; }");
    let Decl::FunctionDef { body, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    let Stmt::Block { stmts, .. } = arena.get(*body).as_stmt().unwrap() else {
        panic!("expected a block body");
    };
    let Stmt::Return(Some(expr)) = arena.get(stmts[0]).as_stmt().unwrap() else {
        panic!("expected a return statement");
    };
    assert!(matches!(
        arena.get(*expr).as_expr().unwrap(),
        quixc_ast::Expr::FieldAccess { .. }
    ));
}

#[test]
fn parses_an_import_declaration() {
    let (arena, decls) = top_level_decls("import std::io;");
    let Decl::Import { path, alias } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected an import declaration");
    };
    assert_eq!(path.len(), 2);
    assert!(alias.is_none());
}

#[test]
fn pub_visibility_marks_item_public() {
    let (arena, decls) = top_level_decls("pub fn exported() -> u32 { return 0; }");
    let Decl::FunctionDef { visibility, .. } = arena.get(decls[0]).as_decl().unwrap() else {
        panic!("expected a function definition");
    };
    assert_eq!(*visibility, Visibility::Public);
}
