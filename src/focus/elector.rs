//! Auto-Focus Elector - pick the initial target when a lock goes live.
//!
//! Policy, first match wins:
//! 1. first auto-focus-preferred element in scan order
//! 2. the current focus, if auto-focus is on and focus is already inside
//! 3. first tabbable element, then first focusable one
//! 4. the boundary itself if it is focusable, else nothing
//!
//! The preferred marker beats explicit priorities: a preferred element with
//! a late tab position still wins over an earlier non-preferred one.

use crate::engine::tree::{self, VisualTree};
use crate::types::NodeId;

use super::scanner::{self, FocusableElement, Scope};

/// Which rule produced the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Election {
    Preferred(NodeId),
    Kept(NodeId),
    First(NodeId),
    Boundary(NodeId),
    NoFocusableTarget,
}

impl Election {
    /// Elected node, if any.
    pub fn target(self) -> Option<NodeId> {
        match self {
            Self::Preferred(n) | Self::Kept(n) | Self::First(n) | Self::Boundary(n) => Some(n),
            Self::NoFocusableTarget => None,
        }
    }
}

/// Full election over a scope (rules 1 to 4).
pub fn elect<T: VisualTree + ?Sized>(tree: &T, scope: &Scope, auto_focus: bool) -> Election {
    let focusables = scanner::focusables(tree, scope);

    // Preferred marker, in tab order
    let mut ordered = focusables.clone();
    scanner::tab_order(&mut ordered);
    if let Some(preferred) = ordered.iter().find(|e| e.auto_focus) {
        return Election::Preferred(preferred.node);
    }

    if auto_focus {
        if let Some(active) = tree.active_element() {
            if focusables.iter().any(|e| e.node == active) {
                return Election::Kept(active);
            }
        }
    }

    fallback(tree, scope, &ordered)
}

/// Rules 3 and 4 only. Used when the previous target disappeared.
pub fn elect_fallback<T: VisualTree + ?Sized>(tree: &T, scope: &Scope) -> Election {
    let mut ordered = scanner::focusables(tree, scope);
    scanner::tab_order(&mut ordered);
    fallback(tree, scope, &ordered)
}

fn fallback<T: VisualTree + ?Sized>(
    tree: &T,
    scope: &Scope,
    ordered: &[FocusableElement],
) -> Election {
    let first = ordered
        .iter()
        .find(|e| e.is_tabbable())
        .or_else(|| ordered.first());
    if let Some(first) = first {
        return Election::First(first.node);
    }

    let boundary = scope.boundary();
    if tree::can_receive_focus(tree, boundary) {
        Election::Boundary(boundary)
    } else {
        Election::NoFocusableTarget
    }
}

// =============================================================================
// TESTS
// =============================================================================
