//! State Module - input types feeding the focus lock
//!
//! - **Keyboard** - Event types, Tab / Shift+Tab navigation intent
//! - **Input** - crossterm event conversion, focus origin classification

pub mod input;
pub mod keyboard;

pub use input::{convert_key_event, origin_of};
pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
