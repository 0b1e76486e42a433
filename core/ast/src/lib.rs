//! The AST model (C2): a closed sum of node kinds across four axes —
//! `Expr`, `Type`, `Decl`, `Stmt` — allocated in a single [`arena::AstArena`]
//! and addressed by [`nodes::NodeId`].
//!
//! Every node exposes, through free functions in this crate rather than a
//! trait object or dynamic-checked downcast, the operations §4.2 calls for:
//! [`children_of`] (structural size / iteration), [`verify::verify`],
//! [`clone::clone_into`], and [`print::print`].

pub mod arena;
pub mod clone;
pub mod errors;
pub mod kinds;
pub mod nodes;
pub mod print;
pub mod span;
pub mod verify;

pub use arena::AstArena;
pub use nodes::{AstNode, Decl, Expr, FStringPart, NodeId, Param, Stmt, SwitchCase, Type};
pub use span::Span;

/// The direct children of a node, in source/declaration order.
///
/// This is the one place that must exhaustively enumerate every node kind;
/// `verify`, `clone_into` and `print` are all built on top of it instead of
/// each re-deriving their own traversal, matching §4.2's intent that a
/// node's structural shape is a single source of truth rather than scattered
/// per-operation `match`es that can drift out of sync with each other.
#[must_use]
pub fn children_of(node: &AstNode) -> Vec<NodeId> {
    match node {
        AstNode::Expr(e) => expr_children(e),
        AstNode::Type(t) => type_children(t),
        AstNode::Decl(d) => decl_children(d),
        AstNode::Stmt(s) => stmt_children(s),
    }
}

fn expr_children(e: &Expr) -> Vec<NodeId> {
    match e {
        Expr::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
        Expr::Unary { operand, .. } | Expr::PostUnary { operand, .. } => vec![*operand],
        Expr::Word {
            operand,
            type_operand,
            rhs_expr,
            ..
        } => {
            let mut out = vec![*operand];
            out.extend(*type_operand);
            out.extend(*rhs_expr);
            out
        }
        Expr::Ternary {
            cond,
            then_branch,
            else_branch,
        } => vec![*cond, *then_branch, *else_branch],
        Expr::IntLiteral { .. }
        | Expr::FloatLiteral { .. }
        | Expr::BoolLiteral(_)
        | Expr::CharLiteral(_)
        | Expr::StringLiteral(_)
        | Expr::NullLiteral
        | Expr::UndefLiteral => vec![],
        Expr::Call { callee, args } => {
            let mut out = vec![*callee];
            out.extend(args.iter().copied());
            out
        }
        Expr::TemplateCall {
            callee,
            type_args,
            args,
        } => {
            let mut out = vec![*callee];
            out.extend(type_args.iter().copied());
            out.extend(args.iter().copied());
            out
        }
        Expr::List(items) | Expr::SequencePoint(items) => items.clone(),
        Expr::AssocPair { key, value } => vec![*key, *value],
        Expr::FieldAccess { base, .. } => vec![*base],
        Expr::Index { base, index } => vec![*base, *index],
        Expr::Slice { base, start, end } => {
            let mut out = vec![*base];
            out.extend(*start);
            out.extend(*end);
            out
        }
        Expr::FString(parts) => parts
            .iter()
            .filter_map(|p| match p {
                FStringPart::Literal(_) => None,
                FStringPart::Interpolated(id) => Some(*id),
            })
            .collect(),
        Expr::Identifier { resolved, .. } => resolved.into_iter().collect(),
        Expr::StmtExpr(id) | Expr::TypeExpr(id) => vec![*id],
    }
}

fn type_children(t: &Type) -> Vec<NodeId> {
    match t {
        Type::Primitive(_) | Type::Opaque(_) | Type::Unresolved(_) | Type::Inferred => vec![],
        Type::Pointer(inner) | Type::Reference(inner) => vec![*inner],
        Type::Composite { fields, .. } => fields.clone(),
        Type::Array { element, size } => vec![*element, *size],
        Type::Function {
            params,
            return_type,
            ..
        } => {
            let mut out: Vec<NodeId> = params
                .iter()
                .flat_map(|(ty, default)| std::iter::once(*ty).chain(*default))
                .collect();
            out.push(*return_type);
            out
        }
        Type::Templated { base, type_args } => {
            let mut out = vec![*base];
            out.extend(type_args.iter().copied());
            out
        }
    }
}

fn decl_children(d: &Decl) -> Vec<NodeId> {
    match d {
        Decl::Typedef { aliased, .. } => vec![*aliased],
        Decl::FunctionDecl {
            params,
            return_type,
            ..
        } => {
            let mut out: Vec<NodeId> = params
                .iter()
                .flat_map(|p| std::iter::once(p.ty).chain(p.default))
                .collect();
            out.push(*return_type);
            out
        }
        Decl::FunctionDef {
            params,
            return_type,
            body,
            preconditions,
            postconditions,
            ..
        } => {
            let mut out: Vec<NodeId> = params
                .iter()
                .flat_map(|p| std::iter::once(p.ty).chain(p.default))
                .collect();
            out.push(*return_type);
            out.push(*body);
            out.extend(preconditions.iter().copied());
            out.extend(postconditions.iter().copied());
            out
        }
        Decl::CompositeDef {
            fields,
            instance_methods,
            static_methods,
            attributes,
            ..
        } => {
            let mut out: Vec<NodeId> = fields
                .iter()
                .flat_map(|f| std::iter::once(f.ty).chain(f.default))
                .collect();
            out.extend(instance_methods.iter().copied());
            out.extend(static_methods.iter().copied());
            out.extend(attributes.iter().copied());
            out
        }
        Decl::EnumDef { items, .. } => items.iter().filter_map(|(_, v)| *v).collect(),
        Decl::Variable {
            ty, initializer, ..
        } => {
            let mut out = vec![];
            out.extend(*ty);
            out.extend(*initializer);
            out
        }
        Decl::Scope { body, .. } => body.clone(),
        Decl::Export { items, .. } => items.clone(),
        Decl::Import { .. } => vec![],
    }
}

fn stmt_children(s: &Stmt) -> Vec<NodeId> {
    match s {
        Stmt::Block { stmts, .. } => stmts.clone(),
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let mut out = vec![*cond, *then_branch];
            out.extend(*else_branch);
            out
        }
        Stmt::While { cond, body } => vec![*cond, *body],
        Stmt::For {
            init,
            cond,
            step,
            body,
        } => {
            let mut out = vec![];
            out.extend(*init);
            out.extend(*cond);
            out.extend(*step);
            out.push(*body);
            out
        }
        Stmt::Foreach {
            iterable, body, ..
        } => vec![*iterable, *body],
        Stmt::ParallelFor {
            iterable,
            concurrency_bound,
            body,
            ..
        } => {
            let mut out = vec![*iterable];
            out.extend(*concurrency_bound);
            out.push(*body);
            out
        }
        Stmt::Break | Stmt::Continue => vec![],
        Stmt::Return(value) => value.into_iter().collect(),
        Stmt::ReturnIf { cond, value } | Stmt::ReturnIfZero { cond, value } => {
            let mut out = vec![*cond];
            out.extend(*value);
            out
        }
        Stmt::ReturnVoidIf { cond } => vec![*cond],
        Stmt::Switch {
            scrutinee,
            cases,
            default,
        } => {
            let mut out = vec![*scrutinee];
            out.extend(cases.iter().flat_map(|c| [c.value, c.body]));
            out.extend(*default);
            out
        }
        Stmt::Case(c) => vec![c.value, c.body],
        Stmt::InlineAsm { .. } => vec![],
        Stmt::ExprStmt(id) | Stmt::Volatile(id) => vec![*id],
        Stmt::SourceFile { decls } => decls.clone(),
    }
}
