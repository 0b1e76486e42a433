//! The AST arena: node storage, parallel span table, and the string
//! intern pool, bundled the way the teacher bundles `Arena` (id-keyed node
//! map) as the single object every builder/query function threads through.

use quixc_arena::intern::{InternPool, Symbol};
use quixc_arena::Arena;

use crate::nodes::{AstNode, Decl, Expr, NodeId, Stmt, Type};
use crate::span::Span;

/// Owns every AST node produced while parsing one compilation unit, plus
/// the spans and interned identifiers they reference.
#[derive(Debug, Default)]
pub struct AstArena {
    nodes: Arena<AstNode>,
    spans: Vec<Span>,
    interner: InternPool,
}

impl AstArena {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            spans: Vec::new(),
            interner: InternPool::new(),
        }
    }

    /// Allocates `node` with the given source span, returning its handle.
    pub fn alloc(&mut self, node: AstNode, span: Span) -> NodeId {
        let id = self.nodes.alloc(node);
        self.spans.push(span);
        debug_assert_eq!(self.spans.len(), self.nodes.len());
        id
    }

    pub fn alloc_expr(&mut self, expr: Expr, span: Span) -> NodeId {
        self.alloc(AstNode::Expr(expr), span)
    }

    pub fn alloc_type(&mut self, ty: Type, span: Span) -> NodeId {
        self.alloc(AstNode::Type(ty), span)
    }

    pub fn alloc_decl(&mut self, decl: Decl, span: Span) -> NodeId {
        self.alloc(AstNode::Decl(decl), span)
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt, span: Span) -> NodeId {
        self.alloc(AstNode::Stmt(stmt), span)
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &AstNode {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index() as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        self.nodes.iter()
    }

    /// The direct children of `id`, in source order. Used by the
    /// traversal-adjacent helpers (`verify`, `clone_into`, `print`) so they
    /// don't each hand-roll their own per-kind recursion.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        crate::children_of(self.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_keeps_spans_in_sync_with_nodes() {
        let mut arena = AstArena::new();
        let a = arena.alloc_expr(Expr::BoolLiteral(true), Span::new(0, 4));
        let b = arena.alloc_expr(Expr::BoolLiteral(false), Span::new(5, 10));
        assert_eq!(arena.span(a), Span::new(0, 4));
        assert_eq!(arena.span(b), Span::new(5, 10));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn intern_is_idempotent() {
        let mut arena = AstArena::new();
        let a = arena.intern("foo");
        let b = arena.intern("foo");
        assert_eq!(a, b);
        assert_eq!(arena.resolve(a), "foo");
    }
}
