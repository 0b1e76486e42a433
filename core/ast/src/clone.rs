//! Deep structural clone into a different arena (§4.2's `clone(arena)`).
//!
//! Unlike the IR's deep clone (§4.4.8), the AST carries no back-references
//! (those only appear once lowering resolves identifiers), so a single
//! recursive pass suffices: no second fixup pass is needed here.

use crate::arena::AstArena;
use crate::nodes::{AstNode, Decl, Expr, FStringPart, NodeId, Param, Stmt, SwitchCase, Type};

/// Deep-clones the subtree rooted at `id` in `src` into `dest`, returning the
/// new root's id. Interned symbols are re-interned against `dest`'s pool so
/// the clone is fully independent of `src`.
#[must_use]
pub fn clone_into(src: &AstArena, id: NodeId, dest: &mut AstArena) -> NodeId {
    let span = src.span(id);
    let node = match src.get(id) {
        AstNode::Expr(e) => AstNode::Expr(clone_expr(src, e, dest)),
        AstNode::Type(t) => AstNode::Type(clone_type(src, t, dest)),
        AstNode::Decl(d) => AstNode::Decl(clone_decl(src, d, dest)),
        AstNode::Stmt(s) => AstNode::Stmt(clone_stmt(src, s, dest)),
    };
    dest.alloc(node, span)
}

fn sym(src: &AstArena, dest: &mut AstArena, s: quixc_arena::intern::Symbol) -> quixc_arena::intern::Symbol {
    dest.intern(src.resolve(s))
}

fn opt(src: &AstArena, dest: &mut AstArena, id: Option<NodeId>) -> Option<NodeId> {
    id.map(|id| clone_into(src, id, dest))
}

fn many(src: &AstArena, dest: &mut AstArena, ids: &[NodeId]) -> Vec<NodeId> {
    ids.iter().map(|&id| clone_into(src, id, dest)).collect()
}

fn clone_expr(src: &AstArena, e: &Expr, dest: &mut AstArena) -> Expr {
    match e {
        Expr::Binary { op, lhs, rhs } => Expr::Binary {
            op: *op,
            lhs: clone_into(src, *lhs, dest),
            rhs: clone_into(src, *rhs, dest),
        },
        Expr::Unary { op, operand } => Expr::Unary {
            op: *op,
            operand: clone_into(src, *operand, dest),
        },
        Expr::PostUnary { op, operand } => Expr::PostUnary {
            op: *op,
            operand: clone_into(src, *operand, dest),
        },
        Expr::Word {
            op,
            operand,
            type_operand,
            rhs_expr,
            field_name,
        } => Expr::Word {
            op: *op,
            operand: clone_into(src, *operand, dest),
            type_operand: opt(src, dest, *type_operand),
            rhs_expr: opt(src, dest, *rhs_expr),
            field_name: field_name.map(|s| sym(src, dest, s)),
        },
        Expr::Ternary {
            cond,
            then_branch,
            else_branch,
        } => Expr::Ternary {
            cond: clone_into(src, *cond, dest),
            then_branch: clone_into(src, *then_branch, dest),
            else_branch: clone_into(src, *else_branch, dest),
        },
        Expr::IntLiteral { value } => Expr::IntLiteral { value: *value },
        Expr::FloatLiteral { value } => Expr::FloatLiteral { value: *value },
        Expr::BoolLiteral(b) => Expr::BoolLiteral(*b),
        Expr::CharLiteral(c) => Expr::CharLiteral(*c),
        Expr::StringLiteral(s) => Expr::StringLiteral(sym(src, dest, *s)),
        Expr::NullLiteral => Expr::NullLiteral,
        Expr::UndefLiteral => Expr::UndefLiteral,
        Expr::Call { callee, args } => Expr::Call {
            callee: clone_into(src, *callee, dest),
            args: many(src, dest, args),
        },
        Expr::TemplateCall {
            callee,
            type_args,
            args,
        } => Expr::TemplateCall {
            callee: clone_into(src, *callee, dest),
            type_args: many(src, dest, type_args),
            args: many(src, dest, args),
        },
        Expr::List(items) => Expr::List(many(src, dest, items)),
        Expr::AssocPair { key, value } => Expr::AssocPair {
            key: clone_into(src, *key, dest),
            value: clone_into(src, *value, dest),
        },
        Expr::FieldAccess { base, field } => Expr::FieldAccess {
            base: clone_into(src, *base, dest),
            field: sym(src, dest, *field),
        },
        Expr::Index { base, index } => Expr::Index {
            base: clone_into(src, *base, dest),
            index: clone_into(src, *index, dest),
        },
        Expr::Slice { base, start, end } => Expr::Slice {
            base: clone_into(src, *base, dest),
            start: opt(src, dest, *start),
            end: opt(src, dest, *end),
        },
        Expr::FString(parts) => Expr::FString(
            parts
                .iter()
                .map(|p| match p {
                    FStringPart::Literal(s) => FStringPart::Literal(sym(src, dest, *s)),
                    FStringPart::Interpolated(id) => {
                        FStringPart::Interpolated(clone_into(src, *id, dest))
                    }
                })
                .collect(),
        ),
        Expr::Identifier { name, resolved } => Expr::Identifier {
            name: sym(src, dest, *name),
            resolved: opt(src, dest, *resolved),
        },
        Expr::SequencePoint(items) => Expr::SequencePoint(many(src, dest, items)),
        Expr::StmtExpr(id) => Expr::StmtExpr(clone_into(src, *id, dest)),
        Expr::TypeExpr(id) => Expr::TypeExpr(clone_into(src, *id, dest)),
    }
}

fn clone_type(src: &AstArena, t: &Type, dest: &mut AstArena) -> Type {
    match t {
        Type::Primitive(p) => Type::Primitive(*p),
        Type::Pointer(inner) => Type::Pointer(clone_into(src, *inner, dest)),
        Type::Reference(inner) => Type::Reference(clone_into(src, *inner, dest)),
        Type::Opaque(s) => Type::Opaque(sym(src, dest, *s)),
        Type::Composite { kind, name, fields } => Type::Composite {
            kind: *kind,
            name: name.map(|s| sym(src, dest, s)),
            fields: many(src, dest, fields),
        },
        Type::Array { element, size } => Type::Array {
            element: clone_into(src, *element, dest),
            size: clone_into(src, *size, dest),
        },
        Type::Function {
            params,
            return_type,
            variadic,
            purity,
            noreturn,
            foreign,
        } => Type::Function {
            params: params
                .iter()
                .map(|(ty, default)| (clone_into(src, *ty, dest), opt(src, dest, *default)))
                .collect(),
            return_type: clone_into(src, *return_type, dest),
            variadic: *variadic,
            purity: *purity,
            noreturn: *noreturn,
            foreign: *foreign,
        },
        Type::Unresolved(s) => Type::Unresolved(sym(src, dest, *s)),
        Type::Inferred => Type::Inferred,
        Type::Templated { base, type_args } => Type::Templated {
            base: clone_into(src, *base, dest),
            type_args: many(src, dest, type_args),
        },
    }
}

fn clone_param(src: &AstArena, p: &Param, dest: &mut AstArena) -> Param {
    Param {
        name: sym(src, dest, p.name),
        ty: clone_into(src, p.ty, dest),
        default: opt(src, dest, p.default),
    }
}

fn clone_decl(src: &AstArena, d: &Decl, dest: &mut AstArena) -> Decl {
    match d {
        Decl::Typedef {
            name,
            aliased,
            visibility,
        } => Decl::Typedef {
            name: sym(src, dest, *name),
            aliased: clone_into(src, *aliased, dest),
            visibility: *visibility,
        },
        Decl::FunctionDecl {
            name,
            params,
            return_type,
            variadic,
            purity,
            noreturn,
            visibility,
        } => Decl::FunctionDecl {
            name: sym(src, dest, *name),
            params: params.iter().map(|p| clone_param(src, p, dest)).collect(),
            return_type: clone_into(src, *return_type, dest),
            variadic: *variadic,
            purity: *purity,
            noreturn: *noreturn,
            visibility: *visibility,
        },
        Decl::FunctionDef {
            name,
            params,
            return_type,
            variadic,
            purity,
            noreturn,
            visibility,
            body,
            preconditions,
            postconditions,
            captures,
        } => Decl::FunctionDef {
            name: sym(src, dest, *name),
            params: params.iter().map(|p| clone_param(src, p, dest)).collect(),
            return_type: clone_into(src, *return_type, dest),
            variadic: *variadic,
            purity: *purity,
            noreturn: *noreturn,
            visibility: *visibility,
            body: clone_into(src, *body, dest),
            preconditions: many(src, dest, preconditions),
            postconditions: many(src, dest, postconditions),
            captures: captures.iter().map(|s| sym(src, dest, *s)).collect(),
        },
        Decl::CompositeDef {
            kind,
            name,
            fields,
            instance_methods,
            static_methods,
            attributes,
            visibility,
        } => Decl::CompositeDef {
            kind: *kind,
            name: sym(src, dest, *name),
            fields: fields
                .iter()
                .map(|f| crate::nodes::CompositeField {
                    name: sym(src, dest, f.name),
                    ty: clone_into(src, f.ty, dest),
                    default: opt(src, dest, f.default),
                    visibility: f.visibility,
                })
                .collect(),
            instance_methods: many(src, dest, instance_methods),
            static_methods: many(src, dest, static_methods),
            attributes: many(src, dest, attributes),
            visibility: *visibility,
        },
        Decl::EnumDef {
            name,
            items,
            visibility,
        } => Decl::EnumDef {
            name: sym(src, dest, *name),
            items: items
                .iter()
                .map(|(n, v)| (sym(src, dest, *n), opt(src, dest, *v)))
                .collect(),
            visibility: *visibility,
        },
        Decl::Variable {
            binding,
            name,
            ty,
            initializer,
            mutability,
            visibility,
        } => Decl::Variable {
            binding: *binding,
            name: sym(src, dest, *name),
            ty: opt(src, dest, *ty),
            initializer: opt(src, dest, *initializer),
            mutability: *mutability,
            visibility: *visibility,
        },
        Decl::Scope {
            name,
            depends_on,
            body,
        } => Decl::Scope {
            name: sym(src, dest, *name),
            depends_on: depends_on.iter().map(|s| sym(src, dest, *s)).collect(),
            body: many(src, dest, body),
        },
        Decl::Export { abi_name, items } => Decl::Export {
            abi_name: abi_name.map(|s| sym(src, dest, s)),
            items: many(src, dest, items),
        },
        Decl::Import { path, alias } => Decl::Import {
            path: path.iter().map(|s| sym(src, dest, *s)).collect(),
            alias: alias.map(|s| sym(src, dest, s)),
        },
    }
}

fn clone_stmt(src: &AstArena, s: &Stmt, dest: &mut AstArena) -> Stmt {
    match s {
        Stmt::Block { safety, stmts } => Stmt::Block {
            safety: *safety,
            stmts: many(src, dest, stmts),
        },
        Stmt::If {
            cond,
            then_branch,
            else_branch,
        } => Stmt::If {
            cond: clone_into(src, *cond, dest),
            then_branch: clone_into(src, *then_branch, dest),
            else_branch: opt(src, dest, *else_branch),
        },
        Stmt::While { cond, body } => Stmt::While {
            cond: clone_into(src, *cond, dest),
            body: clone_into(src, *body, dest),
        },
        Stmt::For {
            init,
            cond,
            step,
            body,
        } => Stmt::For {
            init: opt(src, dest, *init),
            cond: opt(src, dest, *cond),
            step: opt(src, dest, *step),
            body: clone_into(src, *body, dest),
        },
        Stmt::Foreach {
            binding,
            index_binding,
            iterable,
            body,
        } => Stmt::Foreach {
            binding: sym(src, dest, *binding),
            index_binding: index_binding.map(|s| sym(src, dest, s)),
            iterable: clone_into(src, *iterable, dest),
            body: clone_into(src, *body, dest),
        },
        Stmt::ParallelFor {
            binding,
            iterable,
            concurrency_bound,
            body,
        } => Stmt::ParallelFor {
            binding: sym(src, dest, *binding),
            iterable: clone_into(src, *iterable, dest),
            concurrency_bound: opt(src, dest, *concurrency_bound),
            body: clone_into(src, *body, dest),
        },
        Stmt::Break => Stmt::Break,
        Stmt::Continue => Stmt::Continue,
        Stmt::Return(v) => Stmt::Return(opt(src, dest, *v)),
        Stmt::ReturnIf { cond, value } => Stmt::ReturnIf {
            cond: clone_into(src, *cond, dest),
            value: opt(src, dest, *value),
        },
        Stmt::ReturnIfZero { cond, value } => Stmt::ReturnIfZero {
            cond: clone_into(src, *cond, dest),
            value: opt(src, dest, *value),
        },
        Stmt::ReturnVoidIf { cond } => Stmt::ReturnVoidIf {
            cond: clone_into(src, *cond, dest),
        },
        Stmt::Switch {
            scrutinee,
            cases,
            default,
        } => Stmt::Switch {
            scrutinee: clone_into(src, *scrutinee, dest),
            cases: cases
                .iter()
                .map(|c| SwitchCase {
                    value: clone_into(src, c.value, dest),
                    body: clone_into(src, c.body, dest),
                })
                .collect(),
            default: opt(src, dest, *default),
        },
        Stmt::Case(c) => Stmt::Case(SwitchCase {
            value: clone_into(src, c.value, dest),
            body: clone_into(src, c.body, dest),
        }),
        Stmt::InlineAsm { template, clobbers } => Stmt::InlineAsm {
            template: sym(src, dest, *template),
            clobbers: clobbers.iter().map(|s| sym(src, dest, *s)).collect(),
        },
        Stmt::ExprStmt(id) => Stmt::ExprStmt(clone_into(src, *id, dest)),
        Stmt::Volatile(id) => Stmt::Volatile(clone_into(src, *id, dest)),
        Stmt::SourceFile { decls } => Stmt::SourceFile {
            decls: many(src, dest, decls),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn clone_preserves_structure_and_interned_text() {
        let mut src = AstArena::new();
        let name = src.intern("x");
        let lit = src.alloc_expr(Expr::IntLiteral { value: crate::nodes::IntLiteralValue::Native(1) }, Span::dummy());
        let ident = src.alloc_expr(
            Expr::Identifier {
                name,
                resolved: None,
            },
            Span::dummy(),
        );
        let bin = src.alloc_expr(
            Expr::Binary {
                op: crate::kinds::BinaryOperatorKind::Add,
                lhs: ident,
                rhs: lit,
            },
            Span::dummy(),
        );

        let mut dest = AstArena::new();
        let cloned = clone_into(&src, bin, &mut dest);
        match dest.get(cloned) {
            AstNode::Expr(Expr::Binary { lhs, .. }) => match dest.get(*lhs) {
                AstNode::Expr(Expr::Identifier { name, .. }) => {
                    assert_eq!(dest.resolve(*name), "x");
                }
                _ => panic!("expected identifier"),
            },
            _ => panic!("expected binary"),
        }
    }
}
