//! Focusable Scanner - enumerate focus targets inside a scope.
//!
//! A scope is a boundary plus any shards. The scanner walks each root in
//! order, skips hidden and excluded subtrees, and reports every element that
//! can take focus. Nothing is cached here; every call walks the tree again.
//!
//! Tab order follows platform convention:
//! - positive priorities first, ascending, ties in document order
//! - then priority 0 and unset, in document order
//! - negative priorities are focusable but never tabbable

use tracing::trace;

use crate::engine::tree::{self, VisualTree};
use crate::types::{NodeFlags, NodeId};

// =============================================================================
// Scope
// =============================================================================

/// A boundary and the shards treated as part of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    roots: Vec<NodeId>,
}

impl Scope {
    /// Scope covering a single subtree.
    pub fn new(boundary: NodeId) -> Self {
        Self { roots: vec![boundary] }
    }

    /// Scope covering `boundary` and every shard, in that order.
    pub fn with_shards(boundary: NodeId, shards: &[NodeId]) -> Self {
        let mut roots = Vec::with_capacity(shards.len() + 1);
        roots.push(boundary);
        for &shard in shards {
            if !roots.contains(&shard) {
                roots.push(shard);
            }
        }
        Self { roots }
    }

    /// The primary boundary.
    pub fn boundary(&self) -> NodeId {
        self.roots[0]
    }

    /// Boundary followed by shards.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Whether `node` sits inside one of the roots without crossing an
    /// excluded (`NO_FOCUS_LOCK`) subtree on the way up.
    pub fn contains<T: VisualTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.roots.contains(&n) {
                return true;
            }
            if tree.flags(n).contains(NodeFlags::NO_FOCUS_LOCK) {
                return false;
            }
            current = tree.parent(n);
        }
        false
    }
}

// =============================================================================
// Focusable element descriptor
// =============================================================================

/// One scan result. Valid only until the next tree mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusableElement {
    pub node: NodeId,
    /// Explicit priority, if any.
    pub tab_index: Option<i32>,
    /// Position in document order across the whole scope.
    pub position: usize,
    /// Marked auto-focus-preferred, directly or through an ancestor.
    pub auto_focus: bool,
}

impl FocusableElement {
    /// Reachable by sequential navigation.
    pub fn is_tabbable(&self) -> bool {
        self.tab_index.is_none_or(|t| t >= 0)
    }

    fn order_key(&self) -> (u8, i32, usize) {
        match self.tab_index {
            Some(t) if t > 0 => (0, t, self.position),
            _ => (1, 0, self.position),
        }
    }
}

// =============================================================================
// Scanning
// =============================================================================

/// Every focusable element in the scope, in document order.
pub fn focusables<T: VisualTree + ?Sized>(tree: &T, scope: &Scope) -> Vec<FocusableElement> {
    let mut result = Vec::new();

    for (i, &root) in scope.roots().iter().enumerate() {
        if !tree::is_visible(tree, root) {
            continue;
        }
        // A shard nested in an earlier root was already walked inline.
        if scope.roots()[..i].iter().any(|&r| reached_from(tree, r, root)) {
            continue;
        }

        let inherited = tree.flags(root).contains(NodeFlags::AUTO_FOCUS);
        let mut stack: Vec<(NodeId, bool)> = tree
            .children(root)
            .into_iter()
            .rev()
            .map(|child| (child, inherited))
            .collect();

        while let Some((node, parent_auto)) = stack.pop() {
            let flags = tree.flags(node);
            if flags.intersects(NodeFlags::HIDDEN | NodeFlags::NO_FOCUS_LOCK) {
                continue;
            }
            let auto_focus = parent_auto || flags.contains(NodeFlags::AUTO_FOCUS);
            if tree::is_focusable_by_convention(tree, node) && tree.is_rendered(node) {
                result.push(FocusableElement {
                    node,
                    tab_index: tree.tab_index(node),
                    position: result.len(),
                    auto_focus,
                });
            }

            for child in tree.children(node).into_iter().rev() {
                stack.push((child, auto_focus));
            }
        }
    }

    result
}

/// Whether the walk from `ancestor` reaches `node`: `node` is a descendant
/// and no excluded subtree lies between them.
fn reached_from<T: VisualTree + ?Sized>(tree: &T, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        if tree.flags(n).contains(NodeFlags::NO_FOCUS_LOCK) {
            return false;
        }
        current = tree.parent(n);
    }
    false
}

/// Tabbable elements of the scope, in tab order.
pub fn scan<T: VisualTree + ?Sized>(tree: &T, scope: &Scope) -> Vec<FocusableElement> {
    let mut result = focusables(tree, scope);
    result.retain(FocusableElement::is_tabbable);
    tab_order(&mut result);
    trace!(boundary = scope.boundary(), count = result.len(), "scanned focusables");
    result
}

/// Sort descriptors into tab order in place.
pub fn tab_order(elements: &mut [FocusableElement]) {
    elements.sort_by_key(FocusableElement::order_key);
}

// =============================================================================
// TESTS
// =============================================================================
