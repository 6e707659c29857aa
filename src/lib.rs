//! # spark-focus-lock
//!
//! Focus containment for terminal UIs.
//!
//! A focus lock keeps keyboard and programmatic focus inside a boundary
//! (a modal, a dialog, a popover) until the lock is released, then hands
//! focus back to where it was.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): the
//! in-memory [`ComponentTree`] keeps its focused index and mutation counter
//! in signals, so hosts can derive from them.
//!
//! ## Architecture
//!
//! ```text
//! host input ─► state::input ─► FocusLock ─► Interceptor ─► VisualTree::focus
//!                                   │
//!                     focus::{scanner, elector, snapshot, group}
//! ```
//!
//! The lock never owns the tree. Every call borrows a [`VisualTree`], which
//! the host implements over its own components (or uses [`ComponentTree`]).
//!
//! ## Modules
//!
//! - [`types`] - Node IDs, markers, focus origin, navigation direction
//! - [`engine`] - The `VisualTree` capability and the in-memory registry
//! - [`focus`] - Scanner, snapshot, elector, navigation, group router
//! - [`lock`] - Lock stack, interceptor, mutation watcher, config
//! - [`state`] - Keyboard events and crossterm conversion
//! - [`error`] - Registration errors

pub mod engine;
pub mod error;
pub mod focus;
pub mod lock;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{FocusLockError, Result};

pub use engine::{ComponentTree, NodeProps, VisualTree};

pub use focus::{
    // Scanner
    focusables, scan, FocusableElement, Scope,
    // Snapshot
    FocusSnapshot, RestoreOutcome, Restorer, ReturnFocus,
    // Elector
    elect, Election,
    // Navigation
    find_next_focusable,
    // Group
    find_group, move_into,
};

pub use lock::{
    reset_default_lock, with_default_lock,
    Activation, AllowOutside, FocusEvent, FocusLock, FocusOutcome, Interception,
    LockConfig, LockHandle, MutationWatcher,
};

pub use state::{convert_key_event, origin_of, KeyState, KeyboardEvent, Modifiers};
