//! Deep clone with back-reference fixup (§4.4.8), grounded in spirit on
//! `original_source/pipeline/libnitrate-ir/src/IR/Clone.cc`'s two-pass
//! shape: a structural copy first, then a second pass rewrites any
//! back-reference that pointed into the source subgraph to point at its
//! destination counterpart instead.

use rustc_hash::FxHashMap;

use crate::expr::IrExpr;
use crate::ids::IrId;
use crate::module::IrModule;
use crate::node::{children, IrNode};
use crate::types::IrType;

/// Clones the subgraph rooted at `root` from `src` into `dest`, returning
/// the destination root's id. Every `Symbol` is re-interned into `dest`'s
/// own pool (symbols aren't portable across modules, same as
/// `quixc_ast::clone::clone_into`). Spans are not carried over — a fresh
/// allocation through `create`/`alloc` has no caller-attached span to copy,
/// matching §4.4.4's "cloned nodes lose span information".
pub fn clone_into(src: &IrModule, root: IrId, dest: &mut IrModule) -> IrId {
    let mut in_to_out: FxHashMap<IrId, IrId> = FxHashMap::default();
    let dest_root = copy_structural(src, root, dest, &mut in_to_out);
    for &out_id in in_to_out.values() {
        fixup_backrefs(dest, out_id, &in_to_out);
    }
    dest_root
}

fn copy_structural(src: &IrModule, id: IrId, dest: &mut IrModule, in_to_out: &mut FxHashMap<IrId, IrId>) -> IrId {
    if let Some(&out_id) = in_to_out.get(&id) {
        return out_id;
    }
    let node = src.get(id).clone();
    let kid_ids = children(&node);
    let mut remap = FxHashMap::default();
    for kid in kid_ids {
        let out_kid = copy_structural(src, kid, dest, in_to_out);
        remap.insert(kid, out_kid);
    }
    let remapped = remap_children(node, src, dest, &remap);
    let out_id = dest.create(remapped, None);
    in_to_out.insert(id, out_id);
    out_id
}

/// Rewrites every `IrId` a node directly holds using `remap`, and re-interns
/// every `Symbol` into `dest`. This is the structural half of the copy: it
/// does not attempt to fix up `Ident`/`Call` back-references that point
/// *outside* this node's own already-copied children — that's
/// [`fixup_backrefs`]'s job, run as the second pass once the whole subgraph
/// has an `in_to_out` entry.
fn remap_children(node: IrNode, src: &IrModule, dest: &mut IrModule, remap: &FxHashMap<IrId, IrId>) -> IrNode {
    let get = |id: IrId| -> IrId { *remap.get(&id).expect("child was copied before its parent") };
    let sym = |s: quixc_arena::intern::Symbol, dest: &mut IrModule| dest.intern(src.resolve(s));

    match node {
        IrNode::Type(ty) => IrNode::Type(match ty {
            IrType::Primitive(p) => IrType::Primitive(p),
            IrType::Pointer { pointee, width } => IrType::Pointer { pointee: get(pointee), width },
            IrType::Const(inner) => IrType::Const(get(inner)),
            IrType::Opaque(s) => IrType::Opaque(sym(s, dest)),
            IrType::Struct(fields) => IrType::Struct(fields.into_iter().map(get).collect()),
            IrType::Union(fields) => IrType::Union(fields.into_iter().map(get).collect()),
            IrType::Array { element, count } => IrType::Array { element: get(element), count },
            IrType::Function { params, return_type, variadic, attrs } => IrType::Function {
                params: params.into_iter().map(get).collect(),
                return_type: get(return_type),
                variadic,
                attrs,
            },
        }),
        IrNode::Expr(e) => IrNode::Expr(match e {
            IrExpr::Binary { op, lhs, rhs } => IrExpr::Binary { op, lhs: get(lhs), rhs: get(rhs) },
            IrExpr::Unary { op, operand } => IrExpr::Unary { op, operand: get(operand) },
            IrExpr::PostUnary { op, operand } => IrExpr::PostUnary { op, operand: get(operand) },
            IrExpr::IntLiteral(lit) => IrExpr::IntLiteral(remap_int_literal(lit, src, dest)),
            IrExpr::FloatLiteral(lit) => IrExpr::FloatLiteral(remap_float_literal(lit, src, dest)),
            IrExpr::List(items) => IrExpr::List(items.into_iter().map(get).collect()),
            // `target` is a back-reference (see `node::expr_children`): it
            // is copied verbatim here, still pointing at the *source*
            // module's id, and gets rewritten to the destination id (if
            // the target lies within the cloned subgraph) by
            // `fixup_backrefs` in the second pass.
            IrExpr::Call { target, args } => IrExpr::Call {
                target,
                args: args.into_iter().map(get).collect(),
            },
            IrExpr::Sequence(items) => IrExpr::Sequence(items.into_iter().map(get).collect()),
            IrExpr::Index { base, index } => IrExpr::Index { base: get(base), index: get(index) },
            // `referent` is likewise a back-reference; left pointing at the
            // source id until `fixup_backrefs` runs.
            IrExpr::Ident { name, referent } => IrExpr::Ident {
                name: sym(name, dest),
                referent,
            },
            IrExpr::ExternWrapper { abi, payload } => IrExpr::ExternWrapper { abi, payload: get(payload) },
            IrExpr::Local { name, storage, abi, mutable, ty, initializer } => IrExpr::Local {
                name: sym(name, dest),
                storage,
                abi,
                mutable,
                ty: get(ty),
                initializer: initializer.map(get),
            },
            IrExpr::Ret(value) => IrExpr::Ret(value.map(get)),
            IrExpr::Brk => IrExpr::Brk,
            IrExpr::Cont => IrExpr::Cont,
            IrExpr::If { cond, then_branch, else_branch } => IrExpr::If {
                cond: get(cond),
                then_branch: get(then_branch),
                else_branch: else_branch.map(get),
            },
            IrExpr::While { cond, body } => IrExpr::While { cond: get(cond), body: get(body) },
            IrExpr::For { init, cond, step, body } => IrExpr::For {
                init: init.map(get),
                cond: cond.map(get),
                step: step.map(get),
                body: get(body),
            },
            IrExpr::ParallelFor { binding, iterable, concurrency_bound, body } => IrExpr::ParallelFor {
                binding: sym(binding, dest),
                iterable: get(iterable),
                concurrency_bound: concurrency_bound.map(get),
                body: get(body),
            },
            IrExpr::Case(case) => IrExpr::Case(crate::expr::SwitchCase { value: get(case.value), body: get(case.body) }),
            IrExpr::Switch { scrutinee, cases, default } => IrExpr::Switch {
                scrutinee: get(scrutinee),
                cases: cases
                    .into_iter()
                    .map(|c| crate::expr::SwitchCase { value: get(c.value), body: get(c.body) })
                    .collect(),
                default: default.map(get),
            },
            IrExpr::Function { name, params, return_type, body, variadic, abi } => IrExpr::Function {
                name: sym(name, dest),
                params: params.into_iter().map(get).collect(),
                return_type: get(return_type),
                body: body.map(get),
                variadic,
                abi,
            },
            IrExpr::InlineAsm { template, clobbers } => IrExpr::InlineAsm {
                template: sym(template, dest),
                clobbers: clobbers.into_iter().map(|s| sym(s, dest)).collect(),
            },
            IrExpr::Ignore => IrExpr::Ignore,
            IrExpr::Tmp(tmp) => IrExpr::Tmp(remap_tmp(tmp, src, dest, &get)),
            IrExpr::Cast { value, target_type, bit_cast } => IrExpr::Cast {
                value: get(value),
                target_type: get(target_type),
                bit_cast,
            },
        }),
    }
}

fn remap_int_literal(lit: crate::expr::IntLiteral, src: &IrModule, dest: &mut IrModule) -> crate::expr::IntLiteral {
    match lit {
        crate::expr::IntLiteral::Native(v) => crate::expr::IntLiteral::Native(v),
        crate::expr::IntLiteral::ArbitraryPrecision(s) => {
            crate::expr::IntLiteral::ArbitraryPrecision(dest.intern(src.resolve(s)))
        }
    }
}

fn remap_float_literal(lit: crate::expr::FloatLiteral, src: &IrModule, dest: &mut IrModule) -> crate::expr::FloatLiteral {
    match lit {
        crate::expr::FloatLiteral::Native(v) => crate::expr::FloatLiteral::Native(v),
        crate::expr::FloatLiteral::Decimal(s) => crate::expr::FloatLiteral::Decimal(dest.intern(src.resolve(s))),
    }
}

fn remap_tmp(
    tmp: crate::expr::TmpKind,
    src: &IrModule,
    dest: &mut IrModule,
    get: &dyn Fn(IrId) -> IrId,
) -> crate::expr::TmpKind {
    use crate::expr::TmpKind;
    match tmp {
        TmpKind::Null => TmpKind::Null,
        TmpKind::Undef => TmpKind::Undef,
        TmpKind::NamedTypeRef(s) => TmpKind::NamedTypeRef(dest.intern(src.resolve(s))),
        TmpKind::EnumRef { enum_name, item } => TmpKind::EnumRef {
            enum_name: dest.intern(src.resolve(enum_name)),
            item: dest.intern(src.resolve(item)),
        },
        TmpKind::PartialCall { callee, args } => TmpKind::PartialCall {
            callee: dest.intern(src.resolve(callee)),
            args: args.into_iter().map(get).collect(),
        },
    }
}

/// The second pass: any `Ident`/`Call` back-reference that still points at
/// a source-side id (because it wasn't reachable as a structural child —
/// e.g. a recursive function's own `IrId` referenced from inside its body)
/// gets rewritten to the destination counterpart via `in_to_out`.
/// References outside the cloned subgraph are left untouched (§4.4.8:
/// "nodes outside the map are preserved as-is").
fn fixup_backrefs(dest: &mut IrModule, id: IrId, in_to_out: &FxHashMap<IrId, IrId>) {
    let node = dest.get(id).clone();
    let fixed = match node {
        IrNode::Expr(IrExpr::Ident { name, referent: Some(r) }) if in_to_out.contains_key(&r) => {
            Some(IrNode::Expr(IrExpr::Ident { name, referent: Some(in_to_out[&r]) }))
        }
        IrNode::Expr(IrExpr::Call { target, args }) if in_to_out.contains_key(&target) => {
            Some(IrNode::Expr(IrExpr::Call { target: in_to_out[&target], args }))
        }
        _ => None,
    };
    if let Some(fixed) = fixed {
        dest.set(id, fixed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ModuleIndex;
    use quixc_ast::kinds::PrimitiveKind;

    #[test]
    fn clones_a_struct_type_into_a_fresh_module() {
        let mut src = IrModule::new(ModuleIndex(0));
        let u8_ty = src.create_type(IrType::Primitive(PrimitiveKind::U8), None);
        let u32_ty = src.create_type(IrType::Primitive(PrimitiveKind::U32), None);
        let st = src.create_type(IrType::Struct(vec![u8_ty, u32_ty]), None);

        let mut dest = IrModule::new(ModuleIndex(1));
        let cloned = clone_into(&src, st, &mut dest);

        match dest.get(cloned) {
            IrNode::Type(IrType::Struct(fields)) => assert_eq!(fields.len(), 2),
            other => panic!("expected a cloned struct, got {other:?}"),
        }
    }

    #[test]
    fn ident_backref_outside_structural_children_is_remapped() {
        let mut src = IrModule::new(ModuleIndex(0));
        let u32_ty = src.create_type(IrType::Primitive(PrimitiveKind::U32), None);
        let name = src.intern("x");
        let local = src.create_expr(
            IrExpr::Local {
                name,
                storage: crate::expr::StorageClass::Local,
                abi: crate::expr::AbiTag::Internal,
                mutable: false,
                ty: u32_ty,
                initializer: None,
            },
            None,
        );
        // `referent` is a back-reference: the Ident is not a structural
        // parent of `local`, but it still needs remapping on clone.
        let use_site = src.create_expr(IrExpr::Ident { name, referent: Some(local) }, None);
        let block = src.create_expr(IrExpr::Sequence(vec![local, use_site]), None);

        let mut dest = IrModule::new(ModuleIndex(1));
        let cloned_block = clone_into(&src, block, &mut dest);

        let IrExpr::Sequence(items) = dest.get(cloned_block).as_expr().cloned().unwrap() else {
            panic!("expected a cloned sequence");
        };
        let cloned_local = items[0];
        let cloned_use = items[1];
        match dest.get(cloned_use) {
            IrNode::Expr(IrExpr::Ident { referent: Some(r), .. }) => assert_eq!(*r, cloned_local),
            other => panic!("expected a cloned Ident, got {other:?}"),
        }
    }
}
