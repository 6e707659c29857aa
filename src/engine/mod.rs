//! Focus Engine - visual tree capability and its in-memory registry.
//!
//! - Tree: the `VisualTree` trait the focus engine reads and drives
//! - Registry: `ComponentTree`, index allocation with ID mapping and free pool
//!
//! # Architecture
//!
//! Components are indices, not objects:
//!
//! ```text
//! Index 0: root   (parent=None, flags=NONE)
//! Index 1: dialog (parent=0,    flags=NONE)
//! Index 2: input  (parent=1,    flags=FOCUSABLE|AUTO_FOCUS)
//! Index 3: button (parent=1,    flags=FOCUSABLE, tab_index=None)
//! ```
//!
//! Indices are recycled, so anything that must outlive a mutation stores the
//! component ID alongside the index.

pub mod tree;
mod registry;

pub use registry::*;
pub use tree::VisualTree;
