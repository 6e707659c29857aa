//! Core types shared by the tree, the scanner and the lock manager.

// =============================================================================
// Node identity
// =============================================================================

/// Index of a component in the visual tree.
///
/// Indices are recycled when components are released, so an index alone is
/// not a stable identity. Pair it with [`crate::VisualTree::id_of`] when a
/// reference must survive mutations (see [`crate::FocusSnapshot`]).
pub type NodeId = usize;

// =============================================================================
// Node markers (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-node markers read by the focusable scanner and the lock.
    ///
    /// Combine with bitwise OR: `NodeFlags::FOCUSABLE | NodeFlags::AUTO_FOCUS`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        const NONE = 0;
        /// Natively focusable (inputs, buttons, links).
        const FOCUSABLE = 1 << 0;
        /// Cannot receive focus, even if otherwise focusable.
        const DISABLED = 1 << 1;
        /// Not rendered; hides the whole subtree.
        const HIDDEN = 1 << 2;
        /// Preferred initial target. On a container, applies to its first
        /// focusable descendant.
        const AUTO_FOCUS = 1 << 3;
        /// Subtree is not part of any enclosing boundary (portaled content).
        const NO_FOCUS_LOCK = 1 << 4;
        /// Owner of an embedded document.
        const FRAME = 1 << 5;
    }
}

// =============================================================================
// Focus change classification
// =============================================================================

/// What initiated a focus change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusOrigin {
    /// Sequential navigation or any other key-driven move.
    Keyboard,
    /// Mouse click or touch.
    Pointer,
    /// A direct `focus()` call from application code.
    #[default]
    Programmatic,
}

/// Direction of sequential (Tab / Shift+Tab) navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Forward,
    Backward,
}

impl NavDirection {
    /// Signed step used when walking an ordered focusable list.
    pub fn step(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}
