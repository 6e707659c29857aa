//! Visual Tree - the capability the focus engine needs from its host
//!
//! The engine never owns the tree. Every operation borrows it, reads
//! structure and markers through this trait, and moves focus through
//! [`VisualTree::focus`]. `ComponentTree` is the in-memory implementation;
//! a terminal or GUI host implements the same trait over its own registry.

use crate::types::{NodeFlags, NodeId};

/// Read access to structure and focus state, plus the ability to move focus.
pub trait VisualTree {
    /// Root of the document. Also the neutral focus target of last resort.
    fn root(&self) -> NodeId;

    /// Parent of `node`, `None` for the root or a released index.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node` in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Markers on `node`. Released indices report `NodeFlags::NONE`.
    fn flags(&self, node: NodeId) -> NodeFlags;

    /// Explicit focus priority, if any.
    fn tab_index(&self, node: NodeId) -> Option<i32>;

    /// Stable identity of the component currently living at `node`.
    fn id_of(&self, node: NodeId) -> Option<String>;

    /// Whether `node` is connected to the root.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether `node` occupies layout space (non-zero size).
    fn is_rendered(&self, node: NodeId) -> bool {
        let _ = node;
        true
    }

    /// Group marker name on `node`, if any.
    fn group(&self, node: NodeId) -> Option<String> {
        let _ = node;
        None
    }

    /// Currently focused node.
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus to `node`. Returns false if the host refused.
    fn focus(&mut self, node: NodeId) -> bool;

    /// Drop focus entirely.
    fn blur(&mut self);

    /// Counter bumped on every mutation that can change focusability.
    fn generation(&self) -> u64;
}

// =============================================================================
// Structural helpers
// =============================================================================

/// Whether `node` is `ancestor` or one of its descendants.
pub fn contains<T: VisualTree + ?Sized>(tree: &T, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = tree.parent(n);
    }
    false
}

/// Nearest node (inclusive) in `node`'s ancestor chain carrying `flag`.
pub fn closest_with<T: VisualTree + ?Sized>(
    tree: &T,
    node: NodeId,
    flag: NodeFlags,
) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(n) = current {
        if tree.flags(n).contains(flag) {
            return Some(n);
        }
        current = tree.parent(n);
    }
    None
}

/// Whether `node` is attached, rendered, and no ancestor hides it.
pub fn is_visible<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    tree.is_attached(node)
        && tree.is_rendered(node)
        && closest_with(tree, node, NodeFlags::HIDDEN).is_none()
}

/// Whether `node` can take focus by platform convention: natively focusable
/// or carrying an explicit priority, and not disabled.
pub fn is_focusable_by_convention<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    let flags = tree.flags(node);
    if flags.contains(NodeFlags::DISABLED) {
        return false;
    }
    flags.contains(NodeFlags::FOCUSABLE) || tree.tab_index(node).is_some()
}

/// Focusable by convention and currently visible.
pub fn can_receive_focus<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    is_focusable_by_convention(tree, node) && is_visible(tree, node)
}
