//! Event Interceptor - keep focus inside the live lock.
//!
//! Two kinds of escape are caught:
//! - sequential navigation off either end of the boundary, which wraps
//! - focus landing outside the boundary, which is sent straight back
//!
//! Redirects happen inside the same notification that reported the escape,
//! so the host never settles on the outside target.

use tracing::{trace, warn};

use crate::engine::tree::{self, VisualTree};
use crate::focus::navigation;
use crate::focus::{elector, FocusSnapshot, Scope};
use crate::types::{FocusOrigin, NavDirection, NodeFlags, NodeId};

use super::config::LockConfig;
use super::watcher::MutationWatcher;
use super::LockHandle;

/// A focus change the host reports to the lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusEvent {
    /// Tab (forward) or Shift+Tab (backward).
    Navigate(NavDirection),
    /// Focus has just landed on `target`.
    FocusIn { target: NodeId, origin: FocusOrigin },
    /// Focus went nowhere (blur without a new target).
    FocusLost,
}

/// What the interceptor did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interception {
    /// Not the lock's business; the host proceeds normally.
    Passed,
    /// Navigation handled inside the boundary; focus moved here.
    Moved(NodeId),
    /// Escape caught; focus sent back here.
    Redirected(NodeId),
    /// Consumed without moving focus (nothing to move to).
    Held,
}

impl Interception {
    /// Whether the host must skip its default handling.
    pub fn is_consumed(self) -> bool {
        !matches!(self, Self::Passed)
    }
}

/// Everything the interceptor needs from the live registration.
pub(crate) struct Guarded<'a> {
    pub config: &'a LockConfig,
    pub scope: Scope,
    pub last_active: &'a mut Option<FocusSnapshot>,
    pub watcher: &'a mut MutationWatcher,
}

#[derive(Debug, Default)]
pub struct Interceptor {
    armed: Option<LockHandle>,
    redirecting: bool,
}

impl Interceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, handle: LockHandle) {
        trace!(%handle, "interceptor armed");
        self.armed = Some(handle);
    }

    pub fn disarm(&mut self) {
        if let Some(handle) = self.armed.take() {
            trace!(%handle, "interceptor disarmed");
        }
        self.redirecting = false;
    }

    pub fn armed(&self) -> Option<LockHandle> {
        self.armed
    }

    pub(crate) fn intercept<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        guarded: Guarded<'_>,
        event: FocusEvent,
    ) -> Interception {
        // A redirect in flight must not be re-entered by its own focus change
        if self.armed.is_none() || self.redirecting {
            return Interception::Passed;
        }

        match event {
            FocusEvent::Navigate(direction) => self.navigate(tree, guarded, direction),
            FocusEvent::FocusIn { target, origin } => self.focus_in(tree, guarded, target, origin),
            FocusEvent::FocusLost => {
                if guarded.config.persistent_focus {
                    self.redirect(tree, guarded)
                } else {
                    Interception::Passed
                }
            }
        }
    }

    fn navigate<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        guarded: Guarded<'_>,
        direction: NavDirection,
    ) -> Interception {
        let tabbables = guarded.watcher.tabbables(tree).to_vec();
        let current = tree.active_element();

        let Some(next) = navigation::find_next_focusable(&tabbables, current, direction) else {
            return Interception::Held;
        };
        if Some(next) == current || !tree.focus(next) {
            return Interception::Held;
        }

        *guarded.last_active = Some(FocusSnapshot::capture(tree));
        trace!(node = next, ?direction, "contained navigation");
        Interception::Moved(next)
    }

    fn focus_in<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        guarded: Guarded<'_>,
        target: NodeId,
        origin: FocusOrigin,
    ) -> Interception {
        let config = guarded.config;

        if !config.watches(target) {
            return Interception::Passed;
        }
        if guarded.scope.contains(tree, target) {
            *guarded.last_active = Some(FocusSnapshot::capture(tree));
            return Interception::Passed;
        }
        // Explicitly allowed outside zone
        if tree::closest_with(tree, target, NodeFlags::NO_FOCUS_LOCK).is_some() {
            return Interception::Passed;
        }
        if origin == FocusOrigin::Pointer && config.allow_outside_click.permits(target) {
            return Interception::Passed;
        }
        if !config.cross_frame && tree::closest_with(tree, target, NodeFlags::FRAME).is_some() {
            return Interception::Passed;
        }

        trace!(node = target, ?origin, "focus escaped boundary");
        self.redirect(tree, guarded)
    }

    fn redirect<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        guarded: Guarded<'_>,
    ) -> Interception {
        self.redirecting = true;

        let remembered = guarded
            .last_active
            .as_ref()
            .and_then(|snapshot| snapshot.target(tree))
            .filter(|&n| guarded.scope.contains(tree, n));

        let target = remembered.or_else(|| elector::elect(tree, &guarded.scope, false).target());

        let moved = target.filter(|&node| tree.focus(node));
        let result = if let Some(node) = moved {
            *guarded.last_active = Some(FocusSnapshot::capture(tree));
            trace!(node, "focus redirected");
            Interception::Redirected(node)
        } else {
            warn!(boundary = guarded.scope.boundary(), "no focusable target to redirect to");
            Interception::Passed
        };

        self.redirecting = false;
        result
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ComponentTree, NodeProps};

    fn setup() -> (ComponentTree, NodeId, NodeId, NodeId) {
        let mut tree = ComponentTree::new();
        let outside = tree.append(0, NodeProps::focusable()).unwrap();
        let dialog = tree.append(0, NodeProps::default()).unwrap();
        let inside = tree.append(dialog, NodeProps::focusable()).unwrap();
        (tree, outside, dialog, inside)
    }

    #[test]
    fn test_unarmed_passes_everything() {
        let (mut tree, outside, dialog, _) = setup();
        let config = LockConfig::default();
        let mut last_active = None;
        let mut watcher = MutationWatcher::new();
        let mut interceptor = Interceptor::new();

        let guarded = Guarded {
            config: &config,
            scope: Scope::new(dialog),
            last_active: &mut last_active,
            watcher: &mut watcher,
        };
        let event = FocusEvent::FocusIn { target: outside, origin: FocusOrigin::Keyboard };
        assert_eq!(interceptor.intercept(&mut tree, guarded, event), Interception::Passed);
    }

    #[test]
    fn test_escape_without_history_elects() {
        let (mut tree, outside, dialog, inside) = setup();
        let config = LockConfig::default();
        let mut last_active = None;
        let mut watcher = MutationWatcher::new();
        watcher.watch(Scope::new(dialog));
        let mut interceptor = Interceptor::new();
        interceptor.arm(LockHandle(0));

        tree.focus(outside);
        let guarded = Guarded {
            config: &config,
            scope: Scope::new(dialog),
            last_active: &mut last_active,
            watcher: &mut watcher,
        };
        let event = FocusEvent::FocusIn { target: outside, origin: FocusOrigin::Programmatic };
        assert_eq!(interceptor.intercept(&mut tree, guarded, event), Interception::Redirected(inside));
        assert_eq!(tree.active_element(), Some(inside));
        assert_eq!(last_active.and_then(|s| s.node()), Some(inside));
    }

    #[test]
    fn test_consumed() {
        assert!(!Interception::Passed.is_consumed());
        assert!(Interception::Held.is_consumed());
        assert!(Interception::Redirected(1).is_consumed());
    }
}
