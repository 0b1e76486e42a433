//! IR node and module identifiers.

use quixc_arena::Id;

use crate::node::IrNode;

/// A handle into an [`crate::module::IrModule`]'s arena.
pub type IrId = Id<IrNode>;

/// Identifies which module an IR node belongs to (IR invariant: "every IR
/// node records its owning module via a module index", §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleIndex(pub u32);
