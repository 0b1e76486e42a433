//! IR type nodes (§3 "IR entities" / `Type`).

use quixc_arena::intern::Symbol;
use quixc_ast::kinds::PrimitiveKind;

use crate::ids::IrId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Primitive(PrimitiveKind),
    /// Pointee type plus the target platform's pointer width in bits.
    Pointer { pointee: IrId, width: u8 },
    Const(IrId),
    Opaque(Symbol),
    /// Ordered field types; order is normative (struct layout, §4.4.3).
    Struct(Vec<IrId>),
    /// Unordered in source meaning, but the `Vec` still records some
    /// concrete order since Rust has no ordered-unordered-set primitive;
    /// layout code must not rely on it.
    Union(Vec<IrId>),
    Array { element: IrId, count: u64 },
    Function {
        params: Vec<IrId>,
        return_type: IrId,
        variadic: bool,
        attrs: FunctionAttrs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FunctionAttrs {
    pub noreturn: bool,
    pub foreign: bool,
}

/// An error raised by [`IrType::bit_size`]/[`IrType::bit_align`] for opaque
/// or otherwise incomplete types (§3: "these functions may fail for opaque
/// or incomplete types").
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("type is opaque and has no known layout")]
    Opaque,
    #[error("function types have no size")]
    NotSized,
}

impl IrType {
    /// Bit size of a *resolved* type tree. Callers pass resolved field/
    /// element type sizes in; this function itself does not walk `IrId`s
    /// (the arena lives on `IrModule`, not on `IrType`), so module code
    /// calls `IrModule::bit_size_of` instead of this in practice — this is
    /// the pure, arena-free core of that computation for a type whose
    /// immediate children's sizes are already known.
    pub fn bit_size_from_child_sizes(&self, child_bits: &[u32]) -> Result<u32, LayoutError> {
        match self {
            IrType::Primitive(p) => p.bit_width().ok_or(LayoutError::NotSized),
            IrType::Pointer { width, .. } => Ok(u32::from(*width)),
            IrType::Const(_) => child_bits.first().copied().ok_or(LayoutError::Opaque),
            IrType::Opaque(_) => Err(LayoutError::Opaque),
            IrType::Struct(_) => Ok(child_bits.iter().sum()),
            IrType::Union(_) => Ok(child_bits.iter().copied().max().unwrap_or(0)),
            IrType::Array { count, .. } => {
                let elem = child_bits.first().copied().ok_or(LayoutError::Opaque)?;
                Ok(elem * u32::try_from(*count).unwrap_or(u32::MAX))
            }
            IrType::Function { .. } => Err(LayoutError::NotSized),
        }
    }
}
