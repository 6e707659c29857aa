//! Lock Configuration - per-registration options.
//!
//! Plain struct with defaults, built either with struct update syntax or the
//! `with_*` methods:
//!
//! ```ignore
//! let config = LockConfig {
//!     return_focus: ReturnFocus::Snapshot,
//!     ..Default::default()
//! };
//! let config = LockConfig::new()
//!     .with_return_focus(true)
//!     .with_shards(vec![toolbar]);
//! ```
//!
//! Options are fixed for the registration's lifetime, except `disabled`
//! which is toggled through `FocusLock::set_disabled`.

use std::fmt;

use crate::focus::ReturnFocus;
use crate::types::NodeId;

use super::FocusOutcome;

/// Node predicate used by escape policies.
pub type Predicate = Box<dyn Fn(NodeId) -> bool>;

/// Called when a registration first becomes live.
pub type ActivationCallback = Box<dyn Fn(NodeId, FocusOutcome)>;

/// Called when a registration that went live is removed.
pub type DeactivationCallback = Box<dyn Fn(NodeId)>;

// =============================================================================
// Escape policy
// =============================================================================

/// Which pointer-initiated focus moves may leave the boundary.
#[derive(Default)]
pub enum AllowOutside {
    #[default]
    Never,
    Always,
    When(Predicate),
}

impl AllowOutside {
    pub fn permits(&self, node: NodeId) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::When(predicate) => predicate(node),
        }
    }
}

impl From<bool> for AllowOutside {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Always } else { Self::Never }
    }
}

impl fmt::Debug for AllowOutside {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("Never"),
            Self::Always => f.write_str("Always"),
            Self::When(_) => f.write_str("When(..)"),
        }
    }
}

// =============================================================================
// LockConfig
// =============================================================================

/// Options for one lock registration.
pub struct LockConfig {
    /// Registered but inert. The snapshot is still held.
    pub disabled: bool,
    /// Focus return on deactivation.
    pub return_focus: ReturnFocus,
    /// Run the auto-focus elector when the lock goes live.
    pub auto_focus: bool,
    /// Escape policy for pointer-initiated focus.
    pub allow_outside_click: AllowOutside,
    /// Put focus back when it is lost to nothing.
    pub persistent_focus: bool,
    /// Extra subtrees treated as part of the boundary.
    pub shards: Vec<NodeId>,
    /// Trap focus moving into embedded documents outside the boundary.
    pub cross_frame: bool,
    /// Focus events whose target fails this are ignored.
    pub whitelist: Option<Predicate>,
    /// Restore target when the snapshot is detached. Defaults to the root.
    pub fallback: Option<NodeId>,
    pub on_activation: Option<ActivationCallback>,
    pub on_deactivation: Option<DeactivationCallback>,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            return_focus: ReturnFocus::Off,
            auto_focus: true,
            allow_outside_click: AllowOutside::Never,
            persistent_focus: false,
            shards: Vec::new(),
            cross_frame: false,
            whitelist: None,
            fallback: None,
            on_activation: None,
            on_deactivation: None,
        }
    }
}

impl LockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_return_focus(mut self, policy: impl Into<ReturnFocus>) -> Self {
        self.return_focus = policy.into();
        self
    }

    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    pub fn with_allow_outside_click(mut self, policy: impl Into<AllowOutside>) -> Self {
        self.allow_outside_click = policy.into();
        self
    }

    pub fn with_persistent_focus(mut self, persistent: bool) -> Self {
        self.persistent_focus = persistent;
        self
    }

    pub fn with_shards(mut self, shards: Vec<NodeId>) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_cross_frame(mut self, cross_frame: bool) -> Self {
        self.cross_frame = cross_frame;
        self
    }

    pub fn with_whitelist<F>(mut self, predicate: F) -> Self
    where
        F: Fn(NodeId) -> bool + 'static,
    {
        self.whitelist = Some(Box::new(predicate));
        self
    }

    pub fn with_fallback(mut self, fallback: NodeId) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn on_activation<F>(mut self, callback: F) -> Self
    where
        F: Fn(NodeId, FocusOutcome) + 'static,
    {
        self.on_activation = Some(Box::new(callback));
        self
    }

    pub fn on_deactivation<F>(mut self, callback: F) -> Self
    where
        F: Fn(NodeId) + 'static,
    {
        self.on_deactivation = Some(Box::new(callback));
        self
    }

    /// Whether the lock reacts to focus landing on `node` at all.
    pub(crate) fn watches(&self, node: NodeId) -> bool {
        self.whitelist.as_ref().is_none_or(|predicate| predicate(node))
    }
}

impl fmt::Debug for LockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockConfig")
            .field("disabled", &self.disabled)
            .field("return_focus", &self.return_focus)
            .field("auto_focus", &self.auto_focus)
            .field("allow_outside_click", &self.allow_outside_click)
            .field("persistent_focus", &self.persistent_focus)
            .field("shards", &self.shards)
            .field("cross_frame", &self.cross_frame)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
