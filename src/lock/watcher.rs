//! Mutation Watcher - keep the live lock's focusable set fresh.
//!
//! The tree bumps a generation counter on every mutation. The watcher
//! remembers the last generation it saw; a different value means the cached
//! scan is stale. Mutations are batched for free: nothing is rescanned until
//! someone asks for the focusable set, and every redirect decision asks.

use tracing::trace;

use crate::engine::tree::VisualTree;
use crate::focus::scanner::{self, FocusableElement, Scope};

#[derive(Debug, Default)]
pub struct MutationWatcher {
    seen: Option<u64>,
    scope: Option<Scope>,
    cache: Option<Vec<FocusableElement>>,
}

impl MutationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `scope`. Drops any cached scan.
    pub fn watch(&mut self, scope: Scope) {
        self.scope = Some(scope);
        self.cache = None;
    }

    /// Stop watching. The generation mark is kept.
    pub fn unwatch(&mut self) {
        self.scope = None;
        self.cache = None;
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Whether the tree changed since the last flush.
    pub fn is_stale<T: VisualTree + ?Sized>(&self, tree: &T) -> bool {
        self.seen != Some(tree.generation())
    }

    /// Consume pending mutations. Returns true if there were any.
    pub fn flush<T: VisualTree + ?Sized>(&mut self, tree: &T) -> bool {
        if !self.is_stale(tree) {
            return false;
        }
        trace!(generation = tree.generation(), "mutations flushed");
        self.seen = Some(tree.generation());
        self.cache = None;
        true
    }

    /// Tabbable elements of the watched scope, rescanned only if stale.
    pub fn tabbables<T: VisualTree + ?Sized>(&mut self, tree: &T) -> &[FocusableElement] {
        self.flush(tree);
        let scope = self.scope.as_ref();
        self.cache
            .get_or_insert_with(|| scope.map(|s| scanner::scan(tree, s)).unwrap_or_default())
    }
}
