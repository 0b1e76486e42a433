//! Lowers `quixc_ast::Decl` nodes to IR declarations (§4.4.3).

use quixc_ast::kinds::{CompositeKind, Mutability, PrimitiveKind};
use quixc_ast::{AstArena, Decl, NodeId, Param};

use crate::errors::LowerError;
use crate::expr::{AbiTag, IntLiteral, IrExpr, StorageClass};
use crate::ids::IrId;
use crate::module::IrModule;
use crate::types::IrType;

use super::expr::lower_expr;
use super::state::LoweringState;
use super::types::lower_type;

/// Pads a sequential run of fields to byte alignment by inserting single-`u8`
/// filler fields wherever the running bit total isn't byte-aligned. A field
/// whose size can't be determined (opaque) resets the running total, since
/// nothing downstream of it can be reasoned about anyway.
fn pad_sequential(module: &mut IrModule, ids: Vec<IrId>) -> Vec<IrId> {
    let u8_ty = module.create_type(IrType::Primitive(PrimitiveKind::U8), None);
    let mut out = Vec::with_capacity(ids.len());
    let mut total_bits: u32 = 0;
    for id in ids {
        out.push(id);
        match module.bit_size_of(id) {
            Ok(bits) => {
                total_bits += bits;
                let misalignment = total_bits % 8;
                if misalignment != 0 {
                    out.push(module.create_type(IrType::Array { element: u8_ty, count: 1 }, None));
                    total_bits += 8 - misalignment;
                }
            }
            Err(_) => total_bits = 0,
        }
    }
    out
}

/// `Group` layouts sort fields by descending bit-size before padding them
/// (§4.3); everything else keeps declaration order.
pub fn sort_and_pad_fields(module: &mut IrModule, field_ids: Vec<IrId>) -> Vec<IrId> {
    let mut sized = Vec::new();
    let mut opaque = Vec::new();
    for id in field_ids {
        match module.bit_size_of(id) {
            Ok(bits) => sized.push((id, bits)),
            Err(_) => opaque.push(id),
        }
    }
    sized.sort_by(|a, b| b.1.cmp(&a.1));
    let ordered: Vec<IrId> = sized.into_iter().map(|(id, _)| id).chain(opaque).collect();
    pad_sequential(module, ordered)
}

fn lower_params(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    params: &[Param],
    bind_locals: bool,
) -> Result<Vec<IrId>, LowerError> {
    let mut out = Vec::with_capacity(params.len());
    for p in params {
        let ty = lower_type(state, ast, module, p.ty)?;
        if bind_locals {
            let name_text = ast.resolve(p.name).to_string();
            let name_sym = module.intern(&name_text);
            let local = module.create_expr(
                IrExpr::Local {
                    name: name_sym,
                    storage: StorageClass::Local,
                    abi: AbiTag::Internal,
                    mutable: true,
                    ty,
                    initializer: None,
                },
                Some(ast.span(p.ty)),
            );
            state.bind_local(name_text, local);
            out.push(local);
        } else {
            out.push(ty);
        }
    }
    Ok(out)
}

pub fn lower_decl(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    id: NodeId,
) -> Result<IrId, LowerError> {
    let span = ast.span(id);
    let d = ast.get(id).as_decl().ok_or(LowerError::BadTree { span })?.clone();
    match d {
        Decl::Typedef { name, aliased, .. } => {
            let ty_id = lower_type(state, ast, module, aliased)?;
            let qualified = state.qualify(ast.resolve(name));
            state.register_type_name(qualified, ty_id);
            Ok(ty_id)
        }
        Decl::FunctionDecl { name, params, return_type, variadic, .. } => {
            let qualified = state.qualify(ast.resolve(name));
            let ret = lower_type(state, ast, module, return_type)?;
            let param_ids = lower_params(state, ast, module, &params, false)?;
            let name_sym = module.intern(&qualified);
            let func_id = module.create_expr(
                IrExpr::Function {
                    name: name_sym,
                    params: param_ids,
                    return_type: ret,
                    body: None,
                    variadic,
                    abi: state.abi_mode,
                },
                Some(span),
            );
            state.register_global(qualified, func_id);
            Ok(func_id)
        }
        Decl::FunctionDef { name, params, return_type, variadic, body, .. } => {
            let qualified = state.qualify(ast.resolve(name));
            let ret = lower_type(state, ast, module, return_type)?;
            let name_sym = module.intern(&qualified);
            // Register a body-less stub under the function's own qualified
            // name before lowering the body, so a recursive call to itself
            // inside that body resolves to this function's id instead of
            // falling through as an unresolved `Ident`.
            let func_id = module.create_expr(
                IrExpr::Function {
                    name: name_sym,
                    params: vec![],
                    return_type: ret,
                    body: None,
                    variadic,
                    abi: state.abi_mode,
                },
                Some(span),
            );
            state.register_global(qualified, func_id);

            state.push_scope();
            let param_ids = lower_params(state, ast, module, &params, true)?;
            let saved_return = state.return_type.replace(ret);
            let saved_inside = state.inside_function;
            state.inside_function = true;
            let body_id = super::stmt::lower_stmt(state, ast, module, body)?;
            state.inside_function = saved_inside;
            state.return_type = saved_return;
            state.pop_scope();

            module.set(
                func_id,
                crate::node::IrNode::Expr(IrExpr::Function {
                    name: name_sym,
                    params: param_ids,
                    return_type: ret,
                    body: Some(body_id),
                    variadic,
                    abi: state.abi_mode,
                }),
            );
            Ok(func_id)
        }
        Decl::CompositeDef { kind, name, fields, instance_methods, static_methods, .. } => {
            let qualified = state.qualify(ast.resolve(name));
            state.push_composite(qualified.clone());
            let field_ids = fields
                .iter()
                .map(|f| lower_type(state, ast, module, f.ty))
                .collect::<Result<Vec<_>, _>>()?;
            let ir_ty = match kind {
                CompositeKind::Group => IrType::Struct(sort_and_pad_fields(module, field_ids)),
                CompositeKind::Struct | CompositeKind::Tuple => IrType::Struct(pad_sequential(module, field_ids)),
                CompositeKind::Union => IrType::Union(field_ids),
                CompositeKind::Region => IrType::Struct(field_ids),
                CompositeKind::Enum => unreachable!("enum bodies are carried by Decl::EnumDef, not CompositeDef"),
            };
            let type_id = module.create_type(ir_ty, Some(span));
            state.register_type_name(qualified.clone(), type_id);
            state.pop_composite();
            state.push_namespace(qualified);
            for m in instance_methods.iter().chain(static_methods.iter()) {
                lower_decl(state, ast, module, *m)?;
            }
            state.pop_namespace();
            Ok(type_id)
        }
        Decl::EnumDef { name, items, .. } => {
            let qualified = state.qualify(ast.resolve(name));
            let enum_ty = module.create_type(IrType::Opaque(module.intern(&qualified)), Some(span));
            state.register_type_name(qualified.clone(), enum_ty);
            // An explicit item lowers its initializer verbatim; a defaulted
            // item extrapolates from the *previous item's own expression* —
            // `0` if it's the first item, otherwise `last + 1` — rather than
            // folding to a plain constant, so a defaulted value still reads
            // as "one more than whatever came before it" in the IR.
            let mut last_expr: Option<IrId> = None;
            let mut last_id = enum_ty;
            for (item_sym, init) in items {
                let cur = match init {
                    Some(expr_id) => lower_expr(state, ast, module, expr_id)?,
                    None => match last_expr {
                        None => module.create_expr(IrExpr::IntLiteral(IntLiteral::Native(0)), Some(span)),
                        Some(prev) => {
                            let one = module.create_expr(IrExpr::IntLiteral(IntLiteral::Native(1)), Some(span));
                            module.create_expr(
                                IrExpr::Binary { op: quixc_ast::kinds::BinaryOperatorKind::Add, lhs: prev, rhs: one },
                                Some(span),
                            )
                        }
                    },
                };
                let full_name = format!("{qualified}::{}", ast.resolve(item_sym));
                state.register_global(full_name, cur);
                last_expr = Some(cur);
                last_id = cur;
            }
            Ok(last_id)
        }
        Decl::Variable { name, ty, initializer, mutability, .. } => {
            let name_text = ast.resolve(name).to_string();
            let explicit_ty = ty.is_some();
            let ty_id = match ty {
                Some(t) => lower_type(state, ast, module, t)?,
                None => module.create_type(IrType::Opaque(module.intern("auto")), Some(span)),
            };
            let init_id = initializer
                .map(|i| lower_expr(state, ast, module, i))
                .transpose()?;
            // A declared type casts its initializer to match (§4.4.3); an
            // inferred (`auto`) type leaves the initializer's own type alone.
            let init_id = match (init_id, explicit_ty) {
                (Some(v), true) => Some(module.create_expr(
                    IrExpr::Cast { value: v, target_type: ty_id, bit_cast: false },
                    Some(span),
                )),
                (other, _) => other,
            };
            let storage = if state.inside_function { StorageClass::Local } else { StorageClass::Global };
            let (name_sym, qualified) = match storage {
                StorageClass::Global => {
                    let q = state.qualify(&name_text);
                    (module.intern(&q), Some(q))
                }
                StorageClass::Local => (module.intern(&name_text), None),
            };
            let var_id = module.create_expr(
                IrExpr::Local {
                    name: name_sym,
                    storage,
                    abi: state.abi_mode,
                    mutable: mutability == Mutability::Mutable,
                    ty: ty_id,
                    initializer: init_id,
                },
                Some(span),
            );
            match qualified {
                Some(q) => state.register_global(q, var_id),
                None => state.bind_local(name_text, var_id),
            }
            Ok(var_id)
        }
        Decl::Scope { name, body, .. } => {
            state.push_namespace(ast.resolve(name).to_string());
            let ids = body
                .iter()
                .map(|&d| lower_decl(state, ast, module, d))
                .collect::<Result<Vec<_>, _>>()?;
            state.pop_namespace();
            Ok(module.create_expr(IrExpr::Sequence(ids), Some(span)))
        }
        Decl::Export { abi_name, items } => {
            let new_abi = match abi_name {
                // An export with no quoted ABI name still publishes under
                // the `Quix` ABI, same as an explicit `"q"` — it's the
                // absence of any enclosing export that means `Internal`.
                None => AbiTag::Quix,
                Some(sym) => match ast.resolve(sym) {
                    "q" => AbiTag::Quix,
                    "c" => AbiTag::C,
                    other => {
                        return Err(LowerError::InvalidAbiName { value: other.to_string(), span })
                    }
                },
            };
            let saved = state.abi_mode;
            state.abi_mode = new_abi;
            let mut wrapped = Vec::with_capacity(items.len());
            for &item in &items {
                let inner = lower_decl(state, ast, module, item)?;
                wrapped.push(module.create_expr(IrExpr::ExternWrapper { abi: new_abi, payload: inner }, Some(span)));
            }
            state.abi_mode = saved;
            Ok(module.create_expr(IrExpr::Sequence(wrapped), Some(span)))
        }
        Decl::Import { .. } => Ok(module.create_expr(IrExpr::Ignore, Some(span))),
    }
}
