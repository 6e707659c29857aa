//! Focus Module - stateless focus primitives
//!
//! - **Scanner** - focusable enumeration and tab order
//! - **Snapshot** - capture and restore of the focused element
//! - **Elector** - initial target selection
//! - **Navigation** - cyclic Tab / Shift+Tab within a scope
//! - **Group** - one-shot relocation into a sub-region
//!
//! None of these hold state between calls. The lock manager composes them.

pub mod elector;
pub mod group;
pub mod navigation;
pub mod scanner;
pub mod snapshot;

pub use elector::{elect, elect_fallback, Election};
pub use group::{find_group, move_into};
pub use navigation::find_next_focusable;
pub use scanner::{focusables, scan, FocusableElement, Scope};
pub use snapshot::{FocusSnapshot, RestoreOutcome, Restorer, ReturnFocus};
