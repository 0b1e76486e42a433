//! Lowers `quixc_ast::Type` nodes to `IrType` nodes.

use quixc_ast::{AstArena, NodeId, Type};

use crate::errors::LowerError;
use crate::ids::IrId;
use crate::module::IrModule;
use crate::types::{FunctionAttrs, IrType};

use super::expr::eval_const_u64;
use super::state::LoweringState;

pub fn lower_type(state: &mut LoweringState, ast: &AstArena, module: &mut IrModule, id: NodeId) -> Result<IrId, LowerError> {
    let span = ast.span(id);
    let ty = ast
        .get(id)
        .as_type()
        .ok_or(LowerError::BadTree { span })?
        .clone();
    let ir_ty = match ty {
        Type::Primitive(p) => IrType::Primitive(p),
        Type::Pointer(inner) | Type::Reference(inner) => {
            // The language makes no ABI distinction between `*T` and `&T`;
            // both lower to the same pointer representation (document
            // assumption: 64-bit target pointer width).
            let pointee = lower_type(state, ast, module, inner)?;
            IrType::Pointer { pointee, width: 64 }
        }
        Type::Opaque(sym) => {
            let name = ast.resolve(sym);
            if let Some(existing) = state.resolve_type_name(name) {
                return Ok(existing);
            }
            IrType::Opaque(module.intern(name))
        }
        Type::Unresolved(sym) => {
            let name = ast.resolve(sym);
            if let Some(existing) = state.resolve_type_name(name) {
                return Ok(existing);
            }
            // Unknown at lowering time (no forward-declared typedef found);
            // fall back to an opaque nominal type rather than failing the
            // whole item, since a later linking/resolution pass may still
            // supply a definition.
            IrType::Opaque(module.intern(name))
        }
        Type::Inferred => IrType::Opaque(module.intern("auto")),
        Type::Composite { kind, fields, .. } => {
            let field_ids = fields
                .iter()
                .map(|&f| lower_type(state, ast, module, f))
                .collect::<Result<Vec<_>, _>>()?;
            if kind.reorders_fields() {
                IrType::Struct(super::decl::sort_and_pad_fields(module, field_ids))
            } else if matches!(kind, quixc_ast::kinds::CompositeKind::Union) {
                IrType::Union(field_ids)
            } else {
                IrType::Struct(field_ids)
            }
        }
        Type::Array { element, size } => {
            let element_ty = lower_type(state, ast, module, element)?;
            let count = eval_const_u64(ast, size).ok_or(LowerError::BadTree { span: ast.span(size) })?;
            IrType::Array { element: element_ty, count }
        }
        Type::Function {
            params,
            return_type,
            variadic,
            noreturn,
            foreign,
            ..
        } => {
            let param_ids = params
                .iter()
                .map(|&(ty, _default)| lower_type(state, ast, module, ty))
                .collect::<Result<Vec<_>, _>>()?;
            let ret = lower_type(state, ast, module, return_type)?;
            IrType::Function {
                params: param_ids,
                return_type: ret,
                variadic,
                attrs: FunctionAttrs { noreturn, foreign },
            }
        }
        Type::Templated { .. } => {
            return Err(LowerError::Unimplemented {
                construct: "templated types",
                span,
            })
        }
    };
    Ok(module.create_type(ir_ty, Some(span)))
}
