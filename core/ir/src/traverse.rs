//! The traversal engine (§4.4.5): a single `iterate` entry point offering
//! five walk orders plus an optional `rayon`-backed parallel fan-out for the
//! orders where that's actually sound.

use rayon::prelude::*;

use crate::ids::IrId;
use crate::module::IrModule;
use crate::node::children;

/// What a callback tells the walker to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Proceed,
    Abort,
    SkipChildren,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DfsPre,
    DfsPost,
    BfsPre,
    BfsPost,
    DirectChildren,
}

impl Mode {
    /// `true` only for [`Mode::DirectChildren`]: visiting a node's direct
    /// children has no ordering dependency between them at all, so fanning
    /// them out across threads changes nothing but wall-clock time. Every
    /// other mode has a global visitation order (a DFS child must finish
    /// before its next sibling starts; a BFS layer must finish before the
    /// next layer starts) that a per-subtree thread fan-out would violate,
    /// so `iterate` falls back to the sequential walk for those (§4.4.5).
    fn is_embarrassingly_parallel(self) -> bool {
        matches!(self, Mode::DirectChildren)
    }
}

/// Imposes an order on a node's children before they're visited. Default is
/// the order `children` already returns them in.
pub type ChildSelector<'a> = Option<&'a dyn Fn(&IrModule, &mut Vec<IrId>)>;

fn ordered_children(module: &IrModule, id: IrId, select: ChildSelector<'_>) -> Vec<IrId> {
    let mut kids = children(module.get(id));
    if let Some(select) = select {
        select(module, &mut kids);
    }
    kids
}

/// Walks the subgraph rooted at `root`, calling `callback` per visited node
/// in the order `mode` specifies. `callback` returning [`Control::Abort`]
/// stops the whole walk immediately (the function then returns `false`);
/// [`Control::SkipChildren`] skips only that node's children and keeps
/// going. `parallel` is honored only for embarrassingly-parallel modes; it
/// fans out `root`'s direct children across `rayon`'s thread pool, each
/// subtree still walked sequentially within its own task.
///
/// Returns `true` if the walk completed, `false` if a callback aborted it.
pub fn iterate<F>(module: &IrModule, root: IrId, mode: Mode, parallel: bool, select: ChildSelector<'_>, mut callback: F) -> bool
where
    F: FnMut(IrId) -> Control + Send,
{
    if parallel && mode.is_embarrassingly_parallel() {
        return iterate_parallel(module, root, select, &mut callback);
    }
    iterate_sequential(module, root, mode, select, &mut callback)
}

fn iterate_sequential(
    module: &IrModule,
    root: IrId,
    mode: Mode,
    select: ChildSelector<'_>,
    callback: &mut dyn FnMut(IrId) -> Control,
) -> bool {
    match mode {
        Mode::DfsPre => dfs_pre(module, root, select, callback),
        Mode::DfsPost => dfs_post(module, root, select, callback),
        Mode::BfsPre => bfs(module, root, select, callback, true),
        Mode::BfsPost => bfs(module, root, select, callback, false),
        Mode::DirectChildren => {
            for child in ordered_children(module, root, select) {
                match callback(child) {
                    Control::Abort => return false,
                    Control::Proceed | Control::SkipChildren => {}
                }
            }
            true
        }
    }
}

fn dfs_pre(module: &IrModule, id: IrId, select: ChildSelector<'_>, callback: &mut dyn FnMut(IrId) -> Control) -> bool {
    match callback(id) {
        Control::Abort => return false,
        Control::SkipChildren => return true,
        Control::Proceed => {}
    }
    for child in ordered_children(module, id, select) {
        if !dfs_pre(module, child, select, callback) {
            return false;
        }
    }
    true
}

fn dfs_post(module: &IrModule, id: IrId, select: ChildSelector<'_>, callback: &mut dyn FnMut(IrId) -> Control) -> bool {
    for child in ordered_children(module, id, select) {
        if !dfs_post(module, child, select, callback) {
            return false;
        }
    }
    !matches!(callback(id), Control::Abort)
}

fn bfs(module: &IrModule, root: IrId, select: ChildSelector<'_>, callback: &mut dyn FnMut(IrId) -> Control, pre: bool) -> bool {
    let mut order = Vec::new();
    let mut queue = std::collections::VecDeque::new();
    queue.push_back(root);
    let mut skip: std::collections::HashSet<u32> = std::collections::HashSet::new();
    while let Some(id) = queue.pop_front() {
        order.push(id);
        if skip.contains(&id.index()) {
            continue;
        }
        for child in ordered_children(module, id, select) {
            queue.push_back(child);
        }
    }
    let visit_order: Vec<IrId> = if pre { order } else { order.into_iter().rev().collect() };
    for id in visit_order {
        match callback(id) {
            Control::Abort => return false,
            Control::SkipChildren => {
                skip.insert(id.index());
            }
            Control::Proceed => {}
        }
    }
    true
}

/// Fans `root`'s direct children out across `rayon`'s thread pool. Each
/// child still only gets `callback(child)` once (matching `Mode::
/// DirectChildren`'s sequential semantics), so the callback's `FnMut` state
/// is shared behind a `Mutex` rather than split per thread — call order
/// across children is no longer deterministic, which is fine precisely
/// because `DirectChildren` callbacks have no ordering dependency between
/// siblings by construction.
fn iterate_parallel<F>(module: &IrModule, root: IrId, select: ChildSelector<'_>, callback: &mut F) -> bool
where
    F: FnMut(IrId) -> Control + Send,
{
    let kids = ordered_children(module, root, select);
    let shared = std::sync::Mutex::new(callback);
    let aborted = std::sync::atomic::AtomicBool::new(false);
    kids.par_iter().for_each(|&child| {
        if aborted.load(std::sync::atomic::Ordering::Relaxed) {
            return;
        }
        let mut guard = shared.lock().expect("callback mutex poisoned");
        let control = (*guard)(child);
        drop(guard);
        if control == Control::Abort {
            aborted.store(true, std::sync::atomic::Ordering::Relaxed);
        }
    });
    !aborted.load(std::sync::atomic::Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::IrExpr;
    use crate::ids::ModuleIndex;
    use crate::types::IrType;
    use quixc_ast::kinds::PrimitiveKind;

    #[test]
    fn dfs_pre_visits_parent_before_children() {
        let mut module = IrModule::new(ModuleIndex(0));
        let u8_ty = module.create_type(IrType::Primitive(PrimitiveKind::U8), None);
        let u32_ty = module.create_type(IrType::Primitive(PrimitiveKind::U32), None);
        let st = module.create_type(IrType::Struct(vec![u8_ty, u32_ty]), None);

        let mut visited = Vec::new();
        let ok = iterate(&module, st, Mode::DfsPre, false, None, |id| {
            visited.push(id);
            Control::Proceed
        });
        assert!(ok);
        assert_eq!(visited[0], st);
    }

    #[test]
    fn abort_stops_the_walk() {
        let mut module = IrModule::new(ModuleIndex(0));
        let u8_ty = module.create_type(IrType::Primitive(PrimitiveKind::U8), None);
        let body = module.create_expr(IrExpr::Local {
            name: module.intern("x"),
            storage: crate::expr::StorageClass::Local,
            abi: crate::expr::AbiTag::Internal,
            mutable: false,
            ty: u8_ty,
            initializer: None,
        }, None);

        let mut visited = 0;
        let ok = iterate(&module, body, Mode::DfsPre, false, None, |_| {
            visited += 1;
            Control::Abort
        });
        assert!(!ok);
        assert_eq!(visited, 1);
    }
}
