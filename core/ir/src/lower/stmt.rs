//! Lowers `quixc_ast::Stmt` nodes to IR expressions (§4.4.3). Statements are
//! themselves expressions in this IR, so a `Block`'s body becomes a
//! `Sequence` and `if`/`while`/`for` are ordinary `IrExpr` control nodes.

use quixc_ast::{AstArena, AstNode, NodeId, Stmt};

use crate::errors::LowerError;
use crate::expr::{AbiTag, IrExpr, StorageClass, SwitchCase};
use crate::ids::IrId;
use crate::module::IrModule;
use crate::types::IrType;

use super::expr::lower_expr;
use super::state::LoweringState;

/// Casts a lowered return value to the enclosing function's return type
/// (§4.4.3), injecting an opaque void placeholder for a bare `return` so
/// the cast is unconditional, matching `qconv_return`/`qconv_retif`.
fn wrap_return_value(
    state: &LoweringState,
    module: &mut IrModule,
    span: quixc_ast::Span,
    value_ir: Option<IrId>,
) -> Option<IrId> {
    let Some(return_type) = state.return_type else {
        return value_ir;
    };
    let value = value_ir.unwrap_or_else(|| module.create_type(IrType::Opaque(module.intern("void")), Some(span)));
    Some(module.create_expr(IrExpr::Cast { value, target_type: return_type, bit_cast: false }, Some(span)))
}

/// Dispatches a child of a statement list to whichever of `Decl`/`Stmt`/
/// `Expr`/`Type` it actually is — `Block.stmts` mixes local declarations
/// with ordinary statements (§4.2).
fn lower_any(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    id: NodeId,
) -> Result<IrId, LowerError> {
    match ast.get(id) {
        AstNode::Decl(_) => super::decl::lower_decl(state, ast, module, id),
        AstNode::Stmt(_) => lower_stmt(state, ast, module, id),
        AstNode::Expr(_) => lower_expr(state, ast, module, id),
        AstNode::Type(_) => super::types::lower_type(state, ast, module, id),
    }
}

pub fn lower_stmt(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    id: NodeId,
) -> Result<IrId, LowerError> {
    let span = ast.span(id);
    let s = ast.get(id).as_stmt().ok_or(LowerError::BadTree { span })?.clone();
    let out = match s {
        Stmt::Block { stmts, .. } => {
            state.push_scope();
            let ids = stmts
                .iter()
                .map(|&c| lower_any(state, ast, module, c))
                .collect::<Result<Vec<_>, _>>()?;
            state.pop_scope();
            IrExpr::Sequence(ids)
        }
        Stmt::If { cond, then_branch, else_branch } => {
            let cond_ir = lower_expr(state, ast, module, cond)?;
            let then_ir = lower_any(state, ast, module, then_branch)?;
            let else_ir = else_branch.map(|e| lower_any(state, ast, module, e)).transpose()?;
            IrExpr::If { cond: cond_ir, then_branch: then_ir, else_branch: else_ir }
        }
        Stmt::While { cond, body } => {
            let cond_ir = lower_expr(state, ast, module, cond)?;
            let body_ir = lower_any(state, ast, module, body)?;
            IrExpr::While { cond: cond_ir, body: body_ir }
        }
        Stmt::For { init, cond, step, body } => {
            state.push_scope();
            let init_ir = init.map(|i| lower_any(state, ast, module, i)).transpose()?;
            let cond_ir = cond.map(|c| lower_expr(state, ast, module, c)).transpose()?;
            let step_ir = step.map(|s| lower_expr(state, ast, module, s)).transpose()?;
            let body_ir = lower_any(state, ast, module, body)?;
            state.pop_scope();
            IrExpr::For { init: init_ir, cond: cond_ir, step: step_ir, body: body_ir }
        }
        Stmt::Foreach { .. } => {
            return Err(LowerError::Unimplemented { construct: "foreach", span })
        }
        Stmt::ParallelFor { binding, iterable, concurrency_bound, body } => {
            let iterable_ir = lower_expr(state, ast, module, iterable)?;
            let bound_ir = concurrency_bound
                .map(|c| lower_expr(state, ast, module, c))
                .transpose()?;
            state.push_scope();
            let binding_text = ast.resolve(binding).to_string();
            let binding_sym = module.intern(&binding_text);
            let elem_ty = module.create_type(IrType::Opaque(module.intern("auto")), Some(span));
            let local = module.create_expr(
                IrExpr::Local {
                    name: binding_sym,
                    storage: StorageClass::Local,
                    abi: AbiTag::Internal,
                    mutable: true,
                    ty: elem_ty,
                    initializer: None,
                },
                Some(span),
            );
            state.bind_local(binding_text, local);
            let body_ir = lower_any(state, ast, module, body)?;
            state.pop_scope();
            IrExpr::ParallelFor {
                binding: binding_sym,
                iterable: iterable_ir,
                concurrency_bound: bound_ir,
                body: body_ir,
            }
        }
        Stmt::Break => IrExpr::Brk,
        Stmt::Continue => IrExpr::Cont,
        Stmt::Return(value) => {
            let value_ir = value.map(|v| lower_expr(state, ast, module, v)).transpose()?;
            IrExpr::Ret(wrap_return_value(state, module, span, value_ir))
        }
        // `retif(c, v)` ≡ `if c { return v }` (§4.4.3).
        Stmt::ReturnIf { cond, value } => {
            let cond_ir = lower_expr(state, ast, module, cond)?;
            let value_ir = value.map(|v| lower_expr(state, ast, module, v)).transpose()?;
            let value_ir = wrap_return_value(state, module, span, value_ir);
            let ret = module.create_expr(IrExpr::Ret(value_ir), Some(span));
            IrExpr::If { cond: cond_ir, then_branch: ret, else_branch: None }
        }
        // `retz(c, v)` ≡ `if !c { return v }`.
        Stmt::ReturnIfZero { cond, value } => {
            let cond_ir = lower_expr(state, ast, module, cond)?;
            let not_cond = module.create_expr(
                IrExpr::Unary { op: quixc_ast::kinds::UnaryOperatorKind::Not, operand: cond_ir },
                Some(span),
            );
            let value_ir = value.map(|v| lower_expr(state, ast, module, v)).transpose()?;
            let value_ir = wrap_return_value(state, module, span, value_ir);
            let ret = module.create_expr(IrExpr::Ret(value_ir), Some(span));
            IrExpr::If { cond: not_cond, then_branch: ret, else_branch: None }
        }
        // `retv(c)` ≡ `if c { return }`.
        Stmt::ReturnVoidIf { cond } => {
            let cond_ir = lower_expr(state, ast, module, cond)?;
            let ret_value = wrap_return_value(state, module, span, None);
            let ret = module.create_expr(IrExpr::Ret(ret_value), Some(span));
            IrExpr::If { cond: cond_ir, then_branch: ret, else_branch: None }
        }
        Stmt::Switch { scrutinee, cases, default } => {
            let scrutinee_ir = lower_expr(state, ast, module, scrutinee)?;
            let case_irs = cases
                .iter()
                .map(|c| {
                    let value_ir = lower_expr(state, ast, module, c.value)?;
                    let body_ir = lower_any(state, ast, module, c.body)?;
                    Ok(SwitchCase { value: value_ir, body: body_ir })
                })
                .collect::<Result<Vec<_>, LowerError>>()?;
            let default_ir = default.map(|d| lower_any(state, ast, module, d)).transpose()?;
            IrExpr::Switch { scrutinee: scrutinee_ir, cases: case_irs, default: default_ir }
        }
        Stmt::Case(case) => {
            let value_ir = lower_expr(state, ast, module, case.value)?;
            let body_ir = lower_any(state, ast, module, case.body)?;
            IrExpr::Case(SwitchCase { value: value_ir, body: body_ir })
        }
        Stmt::InlineAsm { template, clobbers } => {
            let template_sym = module.intern(ast.resolve(template));
            let clobber_syms = clobbers.iter().map(|&c| module.intern(ast.resolve(c))).collect();
            IrExpr::InlineAsm { template: template_sym, clobbers: clobber_syms }
        }
        Stmt::ExprStmt(e) => return lower_expr(state, ast, module, e),
        // Volatility isn't separately modeled on any `IrExpr` variant; the
        // wrapped expression lowers transparently.
        Stmt::Volatile(e) => return lower_expr(state, ast, module, e),
        Stmt::SourceFile { decls } => {
            let ids = decls
                .iter()
                .map(|&d| super::decl::lower_decl(state, ast, module, d))
                .collect::<Result<Vec<_>, _>>()?;
            IrExpr::Sequence(ids)
        }
    };
    Ok(module.create_expr(out, Some(span)))
}
