//! Focus Navigation - cyclic Tab / Shift+Tab inside a scope.
//!
//! Same cycling rules as the global focus ring, restricted to one scope:
//! from the last element Tab wraps to the first, from the first Shift+Tab
//! wraps to the last. From anywhere else (outside the scope, or on an
//! element that is focusable but not tabbable) Tab enters at the first
//! element and Shift+Tab at the last.

use crate::types::{NavDirection, NodeId};

use super::scanner::FocusableElement;

/// Find the element `direction` leads to from `current`.
pub fn find_next_focusable(
    tabbables: &[FocusableElement],
    current: Option<NodeId>,
    direction: NavDirection,
) -> Option<NodeId> {
    if tabbables.is_empty() {
        return None;
    }

    let current_pos = current.and_then(|c| tabbables.iter().position(|e| e.node == c));

    match current_pos {
        None => {
            // Not currently focused on a tabbable in scope
            let entry = match direction {
                NavDirection::Forward => tabbables.first(),
                NavDirection::Backward => tabbables.last(),
            };
            entry.map(|e| e.node)
        }
        Some(pos) => {
            // Move in direction with wrap
            let len = tabbables.len() as isize;
            let next_pos = ((pos as isize + direction.step()) % len + len) % len;
            Some(tabbables[next_pos as usize].node)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
