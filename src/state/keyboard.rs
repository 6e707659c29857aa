//! Keyboard Module - key event types and navigation intent
//!
//! Terminal-agnostic key events. The lock only cares about one thing in
//! them: whether the key asks for sequential navigation.
//!
//! # Example
//!
//! ```ignore
//! use spark_focus_lock::state::keyboard::{KeyboardEvent, Modifiers};
//!
//! let event = KeyboardEvent::with_modifiers("Tab", Modifiers::shift());
//! assert_eq!(event.navigation(), Some(NavDirection::Backward));
//! ```

use crate::types::NavDirection;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "Tab")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Tab moves forward, Shift+Tab backward. Ctrl/Alt/Meta+Tab belong to
    /// the terminal or window manager and are not navigation.
    pub fn navigation(&self) -> Option<NavDirection> {
        if self.key != "Tab" || self.modifiers.ctrl || self.modifiers.alt || self.modifiers.meta {
            return None;
        }
        if self.modifiers.shift {
            Some(NavDirection::Backward)
        } else {
            Some(NavDirection::Forward)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
