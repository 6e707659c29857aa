//! Input Module - crossterm event conversion
//!
//! Bridges crossterm's event system with the focus lock:
//! - `convert_key_event` - crossterm KeyEvent to our KeyboardEvent
//! - `origin_of` - classify what caused a focus change
//!
//! # Example
//!
//! ```ignore
//! use crossterm::event::{read, Event};
//!
//! if let Event::Key(key) = read()? {
//!     let event = convert_key_event(key);
//!     if !lock.handle_key(&mut tree, &event) {
//!         // default handling
//!     }
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent,
    KeyCode, KeyEventKind, KeyModifiers,
    KeyEvent as CrosstermKeyEvent,
};

use super::keyboard::{KeyboardEvent, KeyState, Modifiers};
use crate::types::FocusOrigin;

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let mut modifiers = convert_modifiers(event.modifiers);

    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        // Terminals report Shift+Tab as its own key
        KeyCode::BackTab => {
            modifiers.shift = true;
            "Tab".to_string()
        }
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent { key, modifiers, state }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// ORIGIN
// =============================================================================

/// What kind of focus change a terminal event would cause, if any.
pub fn origin_of(event: &CrosstermEvent) -> Option<FocusOrigin> {
    match event {
        CrosstermEvent::Key(_) => Some(FocusOrigin::Keyboard),
        CrosstermEvent::Mouse(_) => Some(FocusOrigin::Pointer),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
