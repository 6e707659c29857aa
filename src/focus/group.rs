//! Group Focus Router - one-shot focus relocation into a sub-region.
//!
//! Tabs, accordions and similar grouped content call this when a group
//! becomes active. No lock is registered and nothing is intercepted
//! afterwards; Tab stays bounded by whatever lock encloses the group.

use tracing::trace;

use crate::engine::tree::VisualTree;
use crate::types::NodeId;

use super::scanner::{self, Scope};

/// Find the first node named `name` under `within` (inclusive), document order.
pub fn find_group<T: VisualTree + ?Sized>(tree: &T, within: NodeId, name: &str) -> Option<NodeId> {
    let mut stack = vec![within];
    while let Some(node) = stack.pop() {
        if tree.group(node).as_deref() == Some(name) {
            return Some(node);
        }
        stack.extend(tree.children(node).into_iter().rev());
    }
    None
}

/// Move focus to the first tabbable element of `group_root`.
///
/// Only acts when focus is currently outside the group and inside
/// `enclosing` (the nearest lock's scope, or the whole document). Returns
/// the newly focused node.
pub fn move_into<T: VisualTree + ?Sized>(
    tree: &mut T,
    group_root: NodeId,
    enclosing: &Scope,
) -> Option<NodeId> {
    let group = Scope::new(group_root);

    let eligible = match tree.active_element() {
        Some(active) => !group.contains(tree, active) && enclosing.contains(tree, active),
        None => enclosing.boundary() == tree.root(),
    };
    if !eligible {
        trace!(group_root, "group move skipped");
        return None;
    }

    let first = scanner::scan(tree, &group).first()?.node;
    if tree.focus(first) {
        trace!(group_root, node = first, "moved focus into group");
        Some(first)
    } else {
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================
