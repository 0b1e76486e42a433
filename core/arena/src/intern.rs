//! Content-addressed string interning.
//!
//! The parser and lowering pass both need to compare identifiers, field
//! names and string literals for equality constantly; interning turns those
//! comparisons into a single `u32` compare instead of a byte-for-byte scan.
//! Unlike the node [`Arena`](crate::Arena), the intern pool is keyed by
//! content: interning the same bytes twice returns the same id.

use rustc_hash::FxHashMap;

/// A handle to an interned byte string. Two `Symbol`s compare equal iff the
/// bytes they were interned from compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    #[must_use]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Interns byte strings, assigning each distinct sequence a stable
/// [`Symbol`]. Lookups in both directions (`bytes -> Symbol` and
/// `Symbol -> bytes`) are O(1) amortized.
#[derive(Debug, Default)]
pub struct InternPool {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Symbol>,
}

impl InternPool {
    #[must_use]
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }

    /// Interns `text`, returning its `Symbol`. Idempotent: interning the
    /// same text twice returns the same `Symbol`.
    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(&sym) = self.lookup.get(text) {
            return sym;
        }
        let index = u32::try_from(self.strings.len()).expect("intern pool exceeded u32::MAX entries");
        let sym = Symbol::from_raw(index);
        self.strings.push(text.into());
        self.lookup.insert(text.into(), sym);
        sym
    }

    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.raw() as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_is_idempotent() {
        let mut pool = InternPool::new();
        let a = pool.intern("foo");
        let b = pool.intern("foo");
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn distinct_text_gets_distinct_symbols() {
        let mut pool = InternPool::new();
        let a = pool.intern("foo");
        let b = pool.intern("bar");
        assert_ne!(a, b);
        assert_eq!(pool.resolve(a), "foo");
        assert_eq!(pool.resolve(b), "bar");
    }
}
