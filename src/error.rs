//! Errors surfaced synchronously to callers of the lock manager.
//!
//! Focus placement edge cases (no focusable target, detached restore target)
//! are not errors. They come back as [`crate::FocusOutcome`] and
//! [`crate::RestoreOutcome`] values and are handled with fallbacks.

use crate::lock::LockHandle;
use crate::types::NodeId;

/// Registration error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FocusLockError {
    #[error("boundary {boundary} is already registered as lock {existing}")]
    DuplicateBoundary { boundary: NodeId, existing: LockHandle },

    #[error("no lock registered for handle {0}")]
    UnknownHandle(LockHandle),
}

pub type Result<T> = std::result::Result<T, FocusLockError>;
