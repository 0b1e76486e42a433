//! The unifying IR node sum, analogous to `quixc_ast::AstNode`.

use crate::expr::IrExpr;
use crate::ids::ModuleIndex;
use crate::types::IrType;

#[derive(Debug, Clone)]
pub enum IrNode {
    Type(IrType),
    Expr(IrExpr),
}

impl IrNode {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            IrNode::Type(_) => "Type",
            IrNode::Expr(e) => e.kind_name(),
        }
    }

    #[must_use]
    pub fn as_expr(&self) -> Option<&IrExpr> {
        match self {
            IrNode::Expr(e) => Some(e),
            IrNode::Type(_) => None,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> Option<&IrType> {
        match self {
            IrNode::Type(t) => Some(t),
            IrNode::Expr(_) => None,
        }
    }
}

/// An [`IrNode`] tagged with the module that owns it (IR invariant, §3).
#[derive(Debug, Clone)]
pub struct StoredNode {
    pub node: IrNode,
    pub module: ModuleIndex,
}

/// The direct `IrId` children of a node, in a fixed order. This is the one
/// place that exhaustively enumerates every IR node kind; [`crate::traverse`]
/// and [`crate::clone`] both build on it instead of re-deriving their own
/// walk, mirroring `quixc_ast::children_of`.
#[must_use]
pub fn children(node: &IrNode) -> Vec<crate::ids::IrId> {
    match node {
        IrNode::Type(t) => type_children(t),
        IrNode::Expr(e) => expr_children(e),
    }
}

fn type_children(t: &IrType) -> Vec<crate::ids::IrId> {
    match t {
        IrType::Primitive(_) | IrType::Opaque(_) => vec![],
        IrType::Pointer { pointee, .. } => vec![*pointee],
        IrType::Const(inner) => vec![*inner],
        IrType::Struct(fields) | IrType::Union(fields) => fields.clone(),
        IrType::Array { element, .. } => vec![*element],
        IrType::Function {
            params,
            return_type,
            ..
        } => {
            let mut out = params.clone();
            out.push(*return_type);
            out
        }
    }
}

fn expr_children(e: &IrExpr) -> Vec<crate::ids::IrId> {
    use crate::expr::TmpKind;
    match e {
        IrExpr::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
        IrExpr::Unary { operand, .. } | IrExpr::PostUnary { operand, .. } => vec![*operand],
        IrExpr::IntLiteral(_) | IrExpr::FloatLiteral(_) => vec![],
        IrExpr::List(items) | IrExpr::Sequence(items) => items.clone(),
        // `target` is a back-reference to a node owned elsewhere (typically
        // a top-level `Function`), not a structural child of the call —
        // deliberately excluded here so traversal and cloning don't walk
        // back into a node that may itself be mid-construction (recursive
        // calls) or outside the current subgraph entirely. See
        // `crate::clone` for how back-references get fixed up after a copy.
        IrExpr::Call { args, .. } => args.clone(),
        IrExpr::Index { base, index } => vec![*base, *index],
        // Likewise `referent` is a back-reference, not a structural child.
        IrExpr::Ident { .. } => vec![],
        IrExpr::ExternWrapper { payload, .. } => vec![*payload],
        IrExpr::Local {
            ty, initializer, ..
        } => {
            let mut out = vec![*ty];
            out.extend(*initializer);
            out
        }
        IrExpr::Ret(value) => value.into_iter().collect(),
        IrExpr::Brk | IrExpr::Cont | IrExpr::Ignore => vec![],
        IrExpr::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let mut out = vec![*cond, *then_branch];
            out.extend(*else_branch);
            out
        }
        IrExpr::While { cond, body } => vec![*cond, *body],
        IrExpr::For {
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
        IrExpr::ParallelFor {
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
        IrExpr::Case(case) => vec![case.value, case.body],
        IrExpr::Switch {
            scrutinee,
            cases,
            default,
        } => {
            let mut out = vec![*scrutinee];
            out.extend(cases.iter().flat_map(|c| [c.value, c.body]));
            out.extend(*default);
            out
        }
        IrExpr::Function {
            params,
            return_type,
            body,
            ..
        } => {
            let mut out = params.clone();
            out.push(*return_type);
            out.extend(*body);
            out
        }
        IrExpr::InlineAsm { .. } => vec![],
        IrExpr::Tmp(TmpKind::PartialCall { args, .. }) => args.clone(),
        IrExpr::Tmp(_) => vec![],
        IrExpr::Cast { value, target_type, .. } => vec![*value, *target_type],
    }
}
