//! Focus Snapshot - remember what had focus, give it back later.
//!
//! Indices get recycled, so the snapshot keeps the component ID next to the
//! index and checks both at restore time. A snapshot is never assumed valid
//! just because it was valid at capture.

use std::fmt;
use std::time::Instant;

use tracing::{debug, warn};

use crate::engine::tree::{self, VisualTree};
use crate::types::NodeId;

// =============================================================================
// Return policy
// =============================================================================

/// Caller-supplied restorer. Receives the snapshot target if it is still
/// valid and returns the node to focus, or `None` to leave focus alone.
pub type Restorer = Box<dyn Fn(Option<NodeId>) -> Option<NodeId>>;

/// What to do with focus when a lock deactivates.
#[derive(Default)]
pub enum ReturnFocus {
    /// Leave focus where it is.
    #[default]
    Off,
    /// Put focus back on the element focused before activation.
    Snapshot,
    /// Let the caller decide.
    Custom(Restorer),
}

impl ReturnFocus {
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }
}

impl From<bool> for ReturnFocus {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Snapshot } else { Self::Off }
    }
}

impl fmt::Debug for ReturnFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("Off"),
            Self::Snapshot => f.write_str("Snapshot"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Result of a restore attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The captured element has focus again.
    Restored(NodeId),
    /// The captured element is gone; focus went to the fallback target.
    /// `target` is `None` only if even the fallback refused focus.
    FellBack { detached: Option<NodeId>, target: Option<NodeId> },
    /// A custom restorer ran and picked this node (or none).
    Custom(Option<NodeId>),
    /// Return policy was off.
    Skipped,
}

// =============================================================================
// Snapshot
// =============================================================================

/// Weak reference to the element focused at capture time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusSnapshot {
    node: Option<NodeId>,
    id: Option<String>,
    captured_at: Instant,
}

impl FocusSnapshot {
    /// Capture the tree's current focus.
    pub fn capture<T: VisualTree + ?Sized>(tree: &T) -> Self {
        let node = tree.active_element();
        Self {
            node,
            id: node.and_then(|n| tree.id_of(n)),
            captured_at: Instant::now(),
        }
    }

    /// Index captured, valid or not.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// The captured element, if the same component still lives at that
    /// index and can take focus.
    pub fn target<T: VisualTree + ?Sized>(&self, tree: &T) -> Option<NodeId> {
        let node = self.node?;
        // Verify the index hasn't been recycled for a different component
        if tree.id_of(node) != self.id {
            return None;
        }
        if node == tree.root() || tree::can_receive_focus(tree, node) {
            Some(node)
        } else {
            None
        }
    }

    /// Apply `policy`. A detached target falls back to `fallback`, or the
    /// tree root if none is configured or the fallback refuses focus.
    pub fn restore<T: VisualTree + ?Sized>(
        &self,
        tree: &mut T,
        policy: &ReturnFocus,
        fallback: Option<NodeId>,
    ) -> RestoreOutcome {
        match policy {
            ReturnFocus::Off => RestoreOutcome::Skipped,
            ReturnFocus::Custom(restorer) => {
                let chosen = restorer(self.target(tree));
                let focused = chosen.filter(|&n| tree.focus(n));
                debug!(?chosen, ?focused, "custom focus restorer");
                RestoreOutcome::Custom(focused)
            }
            ReturnFocus::Snapshot => {
                if let Some(node) = self.target(tree) {
                    if tree.focus(node) {
                        debug!(node, "focus restored");
                        return RestoreOutcome::Restored(node);
                    }
                }

                warn!(
                    detached = ?self.node,
                    ?fallback,
                    "focus snapshot target detached, falling back"
                );
                let root = tree.root();
                let target = [fallback, Some(root)]
                    .into_iter()
                    .flatten()
                    .find(|&n| tree.focus(n));
                RestoreOutcome::FellBack { detached: self.node, target }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
