//! Lowers `quixc_ast::Expr` nodes to `IrExpr` nodes (§4.4.3).

use quixc_arena::intern::Symbol;
use quixc_ast::kinds::WordOperatorKind;
use quixc_ast::{AstArena, Expr, FStringPart, NodeId};

use crate::errors::LowerError;
use crate::expr::{FloatLiteral, IntLiteral, IrExpr, TmpKind};
use crate::ids::IrId;
use crate::module::IrModule;
use crate::types::IrType;

use super::state::LoweringState;

/// Evaluates a constant integer expression, as far as is possible without a
/// type checker (§4.4.3's array-size operand needs a concrete `u64`).
/// Returns `None` for anything beyond literals and simple arithmetic over
/// literals — a later constant-folding pass would subsume this.
pub fn eval_const_u64(ast: &AstArena, id: NodeId) -> Option<u64> {
    match ast.get(id).as_expr()? {
        Expr::IntLiteral { value } => match value {
            quixc_ast::nodes::IntLiteralValue::Native(v) => u64::try_from(*v).ok(),
            quixc_ast::nodes::IntLiteralValue::ArbitraryPrecision(sym) => {
                ast.resolve(*sym).parse().ok()
            }
        },
        Expr::Unary { op, operand } => {
            let v = eval_const_u64(ast, *operand)?;
            match op {
                quixc_ast::kinds::UnaryOperatorKind::Pos => Some(v),
                _ => None,
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let l = eval_const_u64(ast, *lhs)?;
            let r = eval_const_u64(ast, *rhs)?;
            use quixc_ast::kinds::BinaryOperatorKind as B;
            match op {
                B::Add => l.checked_add(r),
                B::Sub => l.checked_sub(r),
                B::Mul => l.checked_mul(r),
                B::Div => l.checked_div(r),
                B::Mod => l.checked_rem(r),
                B::Shl => Some(l << r),
                B::Shr => Some(l >> r),
                B::BitAnd => Some(l & r),
                B::BitOr => Some(l | r),
                B::BitXor => Some(l ^ r),
                _ => None,
            }
        }
        _ => None,
    }
}

fn deferred(module: &mut IrModule, span: quixc_ast::Span, callee: &'static str, args: Vec<IrId>) -> IrId {
    let callee = module.intern(callee);
    module.create_expr(IrExpr::Tmp(TmpKind::PartialCall { callee, args }), Some(span))
}

fn ident_marker(module: &mut IrModule, span: quixc_ast::Span, name: Symbol) -> IrId {
    module.create_expr(IrExpr::Ident { name, referent: None }, Some(span))
}

pub fn lower_expr(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    id: NodeId,
) -> Result<IrId, LowerError> {
    let span = ast.span(id);
    let e = ast.get(id).as_expr().ok_or(LowerError::BadTree { span })?.clone();
    let out = match e {
        Expr::Binary { op, lhs, rhs } if op.is_compound_assign() => {
            // `lhs op= rhs` -> `lhs = (lhs op rhs)` (§4.4.3).
            let lhs_ir = lower_expr(state, ast, module, lhs)?;
            let rhs_ir = lower_expr(state, ast, module, rhs)?;
            let lhs_again = lower_expr(state, ast, module, lhs)?;
            let combined = module.create_expr(
                IrExpr::Binary { op: op.underlying(), lhs: lhs_again, rhs: rhs_ir },
                Some(span),
            );
            IrExpr::Binary { op: quixc_ast::kinds::BinaryOperatorKind::Assign, lhs: lhs_ir, rhs: combined }
        }
        Expr::Binary { op, lhs, rhs } if op == quixc_ast::kinds::BinaryOperatorKind::LogicalXor => {
            // `a xor b` -> `(a or b) and not (a and b)`.
            let a1 = lower_expr(state, ast, module, lhs)?;
            let b1 = lower_expr(state, ast, module, rhs)?;
            let a2 = lower_expr(state, ast, module, lhs)?;
            let b2 = lower_expr(state, ast, module, rhs)?;
            let or_ir = module.create_expr(
                IrExpr::Binary { op: quixc_ast::kinds::BinaryOperatorKind::LogicalOr, lhs: a1, rhs: b1 },
                Some(span),
            );
            let and_ir = module.create_expr(
                IrExpr::Binary { op: quixc_ast::kinds::BinaryOperatorKind::LogicalAnd, lhs: a2, rhs: b2 },
                Some(span),
            );
            let not_and = module.create_expr(
                IrExpr::Unary { op: quixc_ast::kinds::UnaryOperatorKind::Not, operand: and_ir },
                Some(span),
            );
            IrExpr::Binary { op: quixc_ast::kinds::BinaryOperatorKind::LogicalAnd, lhs: or_ir, rhs: not_and }
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs_ir = lower_expr(state, ast, module, lhs)?;
            let rhs_ir = lower_expr(state, ast, module, rhs)?;
            IrExpr::Binary { op, lhs: lhs_ir, rhs: rhs_ir }
        }
        Expr::Unary { op, operand } => {
            let operand_ir = lower_expr(state, ast, module, operand)?;
            IrExpr::Unary { op, operand: operand_ir }
        }
        Expr::PostUnary { op, operand } => {
            let operand_ir = lower_expr(state, ast, module, operand)?;
            IrExpr::PostUnary { op, operand: operand_ir }
        }
        Expr::Word { op, operand, type_operand, rhs_expr, field_name } => {
            return lower_word(state, ast, module, span, op, operand, type_operand, rhs_expr, field_name);
        }
        Expr::Ternary { cond, then_branch, else_branch } => {
            let cond_ir = lower_expr(state, ast, module, cond)?;
            let then_ir = lower_expr(state, ast, module, then_branch)?;
            let else_ir = lower_expr(state, ast, module, else_branch)?;
            IrExpr::If { cond: cond_ir, then_branch: then_ir, else_branch: Some(else_ir) }
        }
        Expr::IntLiteral { value } => IrExpr::IntLiteral(match value {
            quixc_ast::nodes::IntLiteralValue::Native(v) => IntLiteral::Native(v),
            quixc_ast::nodes::IntLiteralValue::ArbitraryPrecision(sym) => {
                let text = ast.resolve(sym);
                IntLiteral::ArbitraryPrecision(module.intern(text))
            }
        }),
        Expr::FloatLiteral { value } => IrExpr::FloatLiteral(match value {
            quixc_ast::nodes::FloatLiteralValue::Native(v) => FloatLiteral::Native(v),
            quixc_ast::nodes::FloatLiteralValue::Decimal(sym) => {
                let text = ast.resolve(sym);
                FloatLiteral::Decimal(module.intern(text))
            }
        }),
        Expr::BoolLiteral(b) => IrExpr::IntLiteral(IntLiteral::Native(i128::from(b))),
        Expr::CharLiteral(c) => IrExpr::IntLiteral(IntLiteral::Native(i128::from(c as u32))),
        Expr::StringLiteral(sym) => return Ok(lower_string_literal(module, span, ast.resolve(sym))),
        Expr::NullLiteral => IrExpr::Tmp(TmpKind::Null),
        Expr::UndefLiteral => IrExpr::Tmp(TmpKind::Undef),
        Expr::Call { callee, args } => {
            let target_ir = lower_expr(state, ast, module, callee)?;
            let arg_irs = args
                .iter()
                .map(|&a| lower_expr(state, ast, module, a))
                .collect::<Result<Vec<_>, _>>()?;
            IrExpr::Call { target: target_ir, args: arg_irs }
        }
        Expr::TemplateCall { .. } => {
            return Err(LowerError::Unimplemented { construct: "template calls", span })
        }
        Expr::List(items) => {
            let item_irs = items
                .iter()
                .map(|&i| lower_expr(state, ast, module, i))
                .collect::<Result<Vec<_>, _>>()?;
            IrExpr::List(item_irs)
        }
        Expr::AssocPair { key, value } => {
            // No dedicated pair node; a 2-element `List` is an adequate,
            // order-preserving stand-in until an aggregate type checker
            // exists to give it real structure.
            let key_ir = lower_expr(state, ast, module, key)?;
            let value_ir = lower_expr(state, ast, module, value)?;
            IrExpr::List(vec![key_ir, value_ir])
        }
        Expr::FieldAccess { base, field } => {
            let base_ir = lower_expr(state, ast, module, base)?;
            let field_sym = module.intern(ast.resolve(field));
            let field_ir = ident_marker(module, span, field_sym);
            return Ok(deferred(module, span, "field_access", vec![base_ir, field_ir]));
        }
        Expr::Index { base, index } => {
            let base_ir = lower_expr(state, ast, module, base)?;
            let index_ir = lower_expr(state, ast, module, index)?;
            IrExpr::Index { base: base_ir, index: index_ir }
        }
        Expr::Slice { base, start, end } => {
            let base_ir = lower_expr(state, ast, module, base)?;
            let ignore = || IrExpr::Ignore;
            let start_ir = match start {
                Some(s) => lower_expr(state, ast, module, s)?,
                None => module.create_expr(ignore(), None),
            };
            let end_ir = match end {
                Some(e) => lower_expr(state, ast, module, e)?,
                None => module.create_expr(ignore(), None),
            };
            return Ok(deferred(module, span, "slice", vec![base_ir, start_ir, end_ir]));
        }
        Expr::FString(parts) => return Ok(lower_fstring(state, ast, module, span, &parts)?),
        Expr::Identifier { name, .. } => {
            let text = ast.resolve(name).to_string();
            let referent = state.resolve_name(&text);
            let sym = module.intern(&text);
            IrExpr::Ident { name: sym, referent }
        }
        Expr::SequencePoint(items) => {
            let item_irs = items
                .iter()
                .map(|&i| lower_expr(state, ast, module, i))
                .collect::<Result<Vec<_>, _>>()?;
            IrExpr::Sequence(item_irs)
        }
        Expr::StmtExpr(stmt_id) => return super::stmt::lower_stmt(state, ast, module, stmt_id),
        Expr::TypeExpr(type_id) => return super::types::lower_type(state, ast, module, type_id),
    };
    Ok(module.create_expr(out, Some(span)))
}

#[allow(clippy::too_many_arguments)]
fn lower_word(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    span: quixc_ast::Span,
    op: WordOperatorKind,
    operand: NodeId,
    type_operand: Option<NodeId>,
    rhs_expr: Option<NodeId>,
    field_name: Option<Symbol>,
) -> Result<IrId, LowerError> {
    let operand_ir = lower_expr(state, ast, module, operand)?;
    match op {
        WordOperatorKind::As | WordOperatorKind::BitcastAs | WordOperatorKind::ReinterpretAs => {
            let ty = type_operand.ok_or(LowerError::BadTree { span })?;
            let target_type = super::types::lower_type(state, ast, module, ty)?;
            Ok(module.create_expr(
                IrExpr::Cast { value: operand_ir, target_type, bit_cast: op != WordOperatorKind::As },
                Some(span),
            ))
        }
        WordOperatorKind::In => {
            // `lhs in rhs` -> `rhs.has(lhs)` (§4.4.3), represented as a
            // deferred call since method resolution needs a type checker.
            let rhs = rhs_expr.ok_or(LowerError::BadTree { span })?;
            let rhs_ir = lower_expr(state, ast, module, rhs)?;
            Ok(deferred(module, span, "has", vec![rhs_ir, operand_ir]))
        }
        WordOperatorKind::Sizeof => Ok(deferred(module, span, "sizeof", vec![operand_ir])),
        WordOperatorKind::Alignof => Ok(deferred(module, span, "alignof", vec![operand_ir])),
        WordOperatorKind::Bitsizeof => Ok(deferred(module, span, "bitsizeof", vec![operand_ir])),
        WordOperatorKind::Typeof => Ok(deferred(module, span, "typeof", vec![operand_ir])),
        WordOperatorKind::Is => {
            let ty = type_operand.ok_or(LowerError::BadTree { span })?;
            let target_type = super::types::lower_type(state, ast, module, ty)?;
            Ok(deferred(module, span, "is", vec![operand_ir, target_type]))
        }
        WordOperatorKind::Offsetof => {
            let ty = type_operand.ok_or(LowerError::BadTree { span })?;
            let target_type = super::types::lower_type(state, ast, module, ty)?;
            let field = field_name.ok_or(LowerError::BadTree { span })?;
            let field_sym = module.intern(ast.resolve(field));
            let field_ir = ident_marker(module, span, field_sym);
            Ok(deferred(module, span, "offsetof", vec![target_type, field_ir]))
        }
    }
}

/// Lowers a string literal to a `List` of individually `u8`-cast byte
/// elements, terminated by a cast zero byte (§4.4.3) — there is no outer
/// array-cast wrapping the list itself.
fn lower_string_literal(module: &mut IrModule, span: quixc_ast::Span, text: &str) -> IrId {
    let u8_ty = module.create_type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::U8), Some(span));
    let mut cast_byte = |module: &mut IrModule, b: u8| {
        let lit = module.create_expr(IrExpr::IntLiteral(IntLiteral::Native(i128::from(b))), Some(span));
        module.create_expr(IrExpr::Cast { value: lit, target_type: u8_ty, bit_cast: false }, Some(span))
    };
    let mut bytes: Vec<IrId> = text.bytes().map(|b| cast_byte(module, b)).collect();
    bytes.push(cast_byte(module, 0));
    module.create_expr(IrExpr::List(bytes), Some(span))
}

fn lower_fstring(
    state: &mut LoweringState,
    ast: &AstArena,
    module: &mut IrModule,
    span: quixc_ast::Span,
    parts: &[FStringPart],
) -> Result<IrId, LowerError> {
    let mut acc: Option<IrId> = None;
    for part in parts {
        let chunk = match part {
            FStringPart::Literal(sym) => lower_string_literal(module, span, ast.resolve(*sym)),
            FStringPart::Interpolated(expr_id) => {
                let value_ir = lower_expr(state, ast, module, *expr_id)?;
                deferred(module, span, "stringify", vec![value_ir])
            }
        };
        acc = Some(match acc {
            None => chunk,
            Some(prev) => module.create_expr(
                IrExpr::Binary { op: quixc_ast::kinds::BinaryOperatorKind::Add, lhs: prev, rhs: chunk },
                Some(span),
            ),
        });
    }
    Ok(acc.unwrap_or_else(|| lower_string_literal(module, span, "")))
}
