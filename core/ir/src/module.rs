//! The IR module: node storage, the hash-consing `create` factory, and the
//! module-local string intern pool (§4.1, §4.4.4).

use quixc_arena::intern::{InternPool, Symbol};
use quixc_arena::Arena;
use quixc_ast::Span;
use rustc_hash::FxHashMap;

use crate::expr::IrExpr;
use crate::ids::{IrId, ModuleIndex};
use crate::node::{IrNode, StoredNode};
use crate::types::IrType;

/// The key a stateless node kind hash-conses on. Only node kinds with no
/// payload that affects identity get a key; everything else allocates
/// fresh on every `create` call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StatelessKey {
    Primitive(quixc_ast::kinds::PrimitiveKind),
    Brk,
    Cont,
    Ignore,
}

fn stateless_key(node: &IrNode) -> Option<StatelessKey> {
    match node {
        IrNode::Type(IrType::Primitive(p)) => Some(StatelessKey::Primitive(*p)),
        IrNode::Expr(IrExpr::Brk) => Some(StatelessKey::Brk),
        IrNode::Expr(IrExpr::Cont) => Some(StatelessKey::Cont),
        IrNode::Expr(IrExpr::Ignore) => Some(StatelessKey::Ignore),
        _ => None,
    }
}

/// Owns every IR node produced while lowering one compilation unit.
///
/// `create` is the *only* way to allocate a node (§4.4.4): stateless kinds
/// are hash-consed per module through `stateless_cache`, everything else
/// gets a fresh arena slot every call.
pub struct IrModule {
    pub id: ModuleIndex,
    arena: Arena<StoredNode>,
    spans: Vec<Option<Span>>,
    stateless_cache: FxHashMap<StatelessKey, IrId>,
    interner: InternPool,
    /// Top-level declarations published by the lowerer, in source order.
    pub top_level: Vec<IrId>,
}

impl IrModule {
    #[must_use]
    pub fn new(id: ModuleIndex) -> Self {
        Self {
            id,
            arena: Arena::new(),
            spans: Vec::new(),
            stateless_cache: FxHashMap::default(),
            interner: InternPool::new(),
            top_level: Vec::new(),
        }
    }

    /// The hash-consing factory (§4.4.4). Stateless kinds return their
    /// module-canonical handle on every call after the first; everything
    /// else allocates fresh. `span` is attached only to fresh allocations —
    /// a cache hit silently drops it, since the canonical node may already
    /// carry a different (or no) span from an earlier call.
    pub fn create(&mut self, node: IrNode, span: Option<Span>) -> IrId {
        if let Some(key) = stateless_key(&node) {
            if let Some(&id) = self.stateless_cache.get(&key) {
                return id;
            }
            let id = self.alloc(node, span);
            self.stateless_cache.insert(key, id);
            return id;
        }
        self.alloc(node, span)
    }

    pub fn create_type(&mut self, ty: IrType, span: Option<Span>) -> IrId {
        self.create(IrNode::Type(ty), span)
    }

    pub fn create_expr(&mut self, expr: IrExpr, span: Option<Span>) -> IrId {
        self.create(IrNode::Expr(expr), span)
    }

    fn alloc(&mut self, node: IrNode, span: Option<Span>) -> IrId {
        let id = self.arena.alloc(StoredNode { node, module: self.id });
        self.spans.push(span);
        debug_assert_eq!(self.spans.len(), self.arena.len());
        id
    }

    #[must_use]
    pub fn get(&self, id: IrId) -> &IrNode {
        &self.arena.get(id).node
    }

    #[must_use]
    pub fn owner(&self, id: IrId) -> ModuleIndex {
        self.arena.get(id).module
    }

    #[must_use]
    pub fn span(&self, id: IrId) -> Option<Span> {
        self.spans[id.index() as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IrId, &IrNode)> {
        self.arena.iter().map(|(id, stored)| (id, &stored.node))
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    /// Mutates the node at `id` in place. Used only by the back-reference
    /// fixup pass (§4.4.8) after the structural clone, and by name
    /// resolution when it rewrites an `Ident`'s `referent`. Panics if `id`
    /// is out of range for this module's arena, same as `get`.
    pub fn set(&mut self, id: IrId, node: IrNode) {
        *self.arena.get_mut(id) = StoredNode { node, module: self.id };
    }

    #[must_use]
    pub fn bit_size_of(&self, id: IrId) -> Result<u32, crate::types::LayoutError> {
        let ty = match self.get(id) {
            IrNode::Type(t) => t,
            IrNode::Expr(_) => return Err(crate::types::LayoutError::NotSized),
        };
        let child_ids: Vec<IrId> = match ty {
            IrType::Primitive(_) | IrType::Opaque(_) | IrType::Function { .. } => vec![],
            IrType::Pointer { .. } => vec![],
            IrType::Const(inner) => vec![*inner],
            IrType::Struct(fields) | IrType::Union(fields) => fields.clone(),
            IrType::Array { element, .. } => vec![*element],
        };
        let mut child_bits = Vec::with_capacity(child_ids.len());
        for child in child_ids {
            child_bits.push(self.bit_size_of(child)?);
        }
        ty.bit_size_from_child_sizes(&child_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stateless_primitive_types_are_hash_consed() {
        let mut module = IrModule::new(ModuleIndex(0));
        let a = module.create_type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::U32), None);
        let b = module.create_type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::U32), None);
        assert_eq!(a, b);
    }

    #[test]
    fn non_stateless_nodes_get_distinct_ids() {
        let mut module = IrModule::new(ModuleIndex(0));
        let a = module.create_expr(IrExpr::Ret(None), None);
        let b = module.create_expr(IrExpr::Ret(None), None);
        assert_ne!(a, b);
    }

    #[test]
    fn struct_bit_size_sums_fields() {
        let mut module = IrModule::new(ModuleIndex(0));
        let u8_ty = module.create_type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::U8), None);
        let u32_ty = module.create_type(IrType::Primitive(quixc_ast::kinds::PrimitiveKind::U32), None);
        let st = module.create_type(IrType::Struct(vec![u8_ty, u32_ty]), None);
        assert_eq!(module.bit_size_of(st).unwrap(), 40);
    }
}
