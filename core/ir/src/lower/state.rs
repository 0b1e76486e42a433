//! Mutable state threaded through one compilation unit's lowering pass
//! (§4.4.1).

use rustc_hash::FxHashMap;

use crate::expr::AbiTag;
use crate::ids::IrId;

/// Everything the lowerer needs to carry between sibling and nested AST
/// nodes. One `LoweringState` is created per top-level `lower_source_file`
/// call and threaded by `&mut` through every `lower_*` function — there is
/// no global/thread-local state, matching §5's "no swap-in/swap-out
/// protocol, a `&mut Module` is simply passed".
pub struct LoweringState {
    /// Current fully-qualified scope path, e.g. `["outer", "inner"]`.
    ns_prefix: Vec<String>,
    /// ABI the nearest enclosing `export` set; `Internal` at the top level.
    pub abi_mode: AbiTag,
    /// The enclosing function's return type, `None` outside a function.
    pub return_type: Option<IrId>,
    /// One frame per lexical block; innermost scope is the last entry.
    local_scope: Vec<FxHashMap<String, IrId>>,
    /// Composite names currently being lowered, innermost last — used to
    /// attribute field-context diagnostics.
    composite_expanse: Vec<String>,
    /// Whether a newly lowered `Decl::Variable` should become a `Local`
    /// with `StorageClass::Local` rather than `StorageClass::Global`.
    pub inside_function: bool,
    /// Typedef'd and composite-defined type names, resolved by qualified
    /// name for `Type::Unresolved`/`Type::Opaque` lookups.
    type_names: FxHashMap<String, IrId>,
    /// Every top-level item published so far, keyed by qualified name, for
    /// `Identifier` resolution against globals.
    globals: FxHashMap<String, IrId>,
}

impl LoweringState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ns_prefix: Vec::new(),
            abi_mode: AbiTag::Internal,
            return_type: None,
            local_scope: vec![FxHashMap::default()],
            composite_expanse: Vec::new(),
            inside_function: false,
            type_names: FxHashMap::default(),
            globals: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn qualify(&self, name: &str) -> String {
        if self.ns_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}::{name}", self.ns_prefix.join("::"))
        }
    }

    pub fn push_namespace(&mut self, name: String) {
        self.ns_prefix.push(name);
    }

    pub fn pop_namespace(&mut self) {
        self.ns_prefix.pop();
    }

    pub fn push_scope(&mut self) {
        self.local_scope.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.local_scope.pop();
        debug_assert!(!self.local_scope.is_empty(), "popped the outermost lowering scope");
    }

    pub fn bind_local(&mut self, name: String, id: IrId) {
        self.local_scope
            .last_mut()
            .expect("at least one scope frame is always present")
            .insert(name, id);
    }

    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<IrId> {
        self.local_scope
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .copied()
            .or_else(|| self.globals.get(name).copied())
            .or_else(|| self.globals.get(&self.qualify(name)).copied())
    }

    pub fn register_global(&mut self, qualified_name: String, id: IrId) {
        self.globals.insert(qualified_name, id);
    }

    pub fn register_type_name(&mut self, qualified_name: String, id: IrId) {
        self.type_names.insert(qualified_name, id);
    }

    #[must_use]
    pub fn resolve_type_name(&self, name: &str) -> Option<IrId> {
        self.type_names
            .get(name)
            .or_else(|| self.type_names.get(&self.qualify(name)))
            .copied()
    }

    pub fn push_composite(&mut self, name: String) {
        self.composite_expanse.push(name);
    }

    pub fn pop_composite(&mut self) {
        self.composite_expanse.pop();
    }

    #[must_use]
    pub fn composite_context(&self) -> Option<&str> {
        self.composite_expanse.last().map(String::as_str)
    }
}

impl Default for LoweringState {
    fn default() -> Self {
        Self::new()
    }
}
