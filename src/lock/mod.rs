//! Focus Lock - trap stack for modals, dialogs and other boundaries
//!
//! Manages every registered lock and decides which one is live:
//! - `activate` / `deactivate` / `set_disabled` lifecycle
//! - liveness = most recently activated, non-disabled, attached
//! - auto-focus election when a lock first goes live
//! - focus return from the activation snapshot
//! - Tab interception and escape redirects for the live lock
//!
//! Liveness is never stored. It is recomputed from the whole stack after
//! every mutation, so locks may be torn down in any order.
//!
//! # Example
//!
//! ```ignore
//! use spark_focus_lock::{FocusLock, LockConfig};
//!
//! let mut lock = FocusLock::new();
//! let activation = lock.activate(&mut tree, dialog, LockConfig::new().with_return_focus(true))?;
//!
//! // Route terminal input through the lock
//! if !lock.handle_key(&mut tree, &event) {
//!     // not a contained Tab, default handling
//! }
//!
//! lock.deactivate(&mut tree, activation.handle);
//! ```

pub mod config;
pub mod interceptor;
pub mod watcher;

use std::cell::RefCell;
use std::fmt;

use tracing::{debug, warn};

use crate::engine::tree::{self, VisualTree};
use crate::error::{FocusLockError, Result};
use crate::focus::{self, elector, Election, FocusSnapshot, RestoreOutcome, Scope};
use crate::state::keyboard::{KeyState, KeyboardEvent};
use crate::types::{FocusOrigin, NavDirection, NodeId};

pub use config::{AllowOutside, LockConfig, Predicate};
pub use interceptor::{FocusEvent, Interception, Interceptor};
pub use watcher::MutationWatcher;

use interceptor::Guarded;

// =============================================================================
// Handles and outcomes
// =============================================================================

/// Opaque identity of one registration. Handles are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LockHandle(u64);

impl fmt::Display for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Focus placement performed when a lock went live (or re-elected).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Focus moved to this element.
    Moved(NodeId),
    /// Focus was already inside and stays.
    Kept(NodeId),
    /// No focusable content; the boundary itself took focus.
    BoundaryFocused(NodeId),
    /// Nothing could take focus; host focus unchanged.
    NoFocusableTarget,
    /// Election did not run (auto-focus off, or the lock is not live).
    Untouched,
}

impl FocusOutcome {
    pub fn target(self) -> Option<NodeId> {
        match self {
            Self::Moved(n) | Self::Kept(n) | Self::BoundaryFocused(n) => Some(n),
            Self::NoFocusableTarget | Self::Untouched => None,
        }
    }
}

/// Result of a successful `activate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Activation {
    pub handle: LockHandle,
    pub outcome: FocusOutcome,
}

// =============================================================================
// Registration
// =============================================================================

struct LockRegistration {
    handle: LockHandle,
    boundary: NodeId,
    /// Component living at `boundary` on activation. Indices are recycled.
    boundary_id: Option<String>,
    config: LockConfig,
    disabled: bool,
    snapshot: FocusSnapshot,
    /// Last focus accepted inside the boundary while live.
    last_active: Option<FocusSnapshot>,
    /// Has been live at least once.
    went_live: bool,
}

impl LockRegistration {
    fn scope(&self) -> Scope {
        Scope::with_shards(self.boundary, &self.config.shards)
    }

    /// Whether `boundary` still holds the component this lock was made for.
    fn is_same_boundary<T: VisualTree + ?Sized>(&self, tree: &T, boundary: NodeId) -> bool {
        self.boundary == boundary && tree.id_of(boundary) == self.boundary_id
    }

    /// Attached, and not replaced by another component at the same index.
    fn is_mounted<T: VisualTree + ?Sized>(&self, tree: &T) -> bool {
        tree.is_attached(self.boundary) && self.is_same_boundary(tree, self.boundary)
    }
}

// =============================================================================
// FocusLock
// =============================================================================

/// The lock stack manager.
#[derive(Default)]
pub struct FocusLock {
    /// Activation order, oldest first.
    registrations: Vec<LockRegistration>,
    next_handle: u64,
    interceptor: Interceptor,
    watcher: MutationWatcher,
}

impl FocusLock {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Register a lock on `boundary`.
    ///
    /// Captures the current focus for later return. If the new lock becomes
    /// live, runs the elector (unless `auto_focus` is off) and arms the
    /// interceptor for it.
    pub fn activate<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        boundary: NodeId,
        config: LockConfig,
    ) -> Result<Activation> {
        if let Some(existing) = self
            .registrations
            .iter()
            .find(|r| r.is_same_boundary(&*tree, boundary))
        {
            return Err(FocusLockError::DuplicateBoundary { boundary, existing: existing.handle });
        }

        let handle = LockHandle(self.next_handle);
        self.next_handle += 1;

        debug!(%handle, boundary, disabled = config.disabled, "lock activated");
        self.registrations.push(LockRegistration {
            handle,
            boundary,
            boundary_id: tree.id_of(boundary),
            disabled: config.disabled,
            config,
            snapshot: FocusSnapshot::capture(tree),
            last_active: None,
            went_live: false,
        });

        let outcome = match self.reconcile(tree) {
            Some((live, outcome)) if live == handle => outcome,
            _ => FocusOutcome::Untouched,
        };
        Ok(Activation { handle, outcome })
    }

    /// Remove a registration, in any stack position.
    ///
    /// If it was live, its interceptor is disarmed and focus is returned per
    /// its config. Unknown handles are a no-op returning `None`.
    pub fn deactivate<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        handle: LockHandle,
    ) -> Option<RestoreOutcome> {
        let position = self.registrations.iter().position(|r| r.handle == handle)?;
        let registration = self.registrations.remove(position);
        let was_live = self.interceptor.armed() == Some(handle);

        let restored = if was_live {
            self.interceptor.disarm();
            self.watcher.unwatch();
            registration.snapshot.restore(
                tree,
                &registration.config.return_focus,
                registration.config.fallback,
            )
        } else {
            RestoreOutcome::Skipped
        };
        debug!(%handle, was_live, ?restored, "lock deactivated");

        if registration.went_live {
            if let Some(on_deactivation) = &registration.config.on_deactivation {
                on_deactivation(registration.boundary);
            }
        }

        self.reconcile(tree);
        Some(restored)
    }

    /// Toggle the disabled flag without touching the snapshot.
    pub fn set_disabled<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        handle: LockHandle,
        disabled: bool,
    ) -> Result<()> {
        let registration = self
            .registrations
            .iter_mut()
            .find(|r| r.handle == handle)
            .ok_or(FocusLockError::UnknownHandle(handle))?;

        if registration.disabled != disabled {
            registration.disabled = disabled;
            debug!(%handle, disabled, "lock disabled flag changed");
            self.reconcile(tree);
        }
        Ok(())
    }

    /// Drop every registration without returning focus.
    pub fn clear(&mut self) {
        self.registrations.clear();
        self.interceptor.disarm();
        self.watcher.unwatch();
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The live registration: most recent, non-disabled, attached.
    ///
    /// A boundary whose index now holds a different component counts as
    /// detached.
    pub fn live<T: VisualTree + ?Sized>(&self, tree: &T) -> Option<LockHandle> {
        self.registrations
            .iter()
            .rev()
            .find(|r| !r.disabled && r.is_mounted(tree))
            .map(|r| r.handle)
    }

    /// The registration the interceptor currently guards.
    pub fn armed(&self) -> Option<LockHandle> {
        self.interceptor.armed()
    }

    /// Whether `handle` is still registered.
    pub fn is_active(&self, handle: LockHandle) -> bool {
        self.registrations.iter().any(|r| r.handle == handle)
    }

    pub fn is_disabled(&self, handle: LockHandle) -> Option<bool> {
        self.find(handle).map(|r| r.disabled)
    }

    pub fn boundary_of(&self, handle: LockHandle) -> Option<NodeId> {
        self.find(handle).map(|r| r.boundary)
    }

    /// Element captured at activation, if still valid.
    pub fn snapshot_target<T: VisualTree + ?Sized>(&self, tree: &T, handle: LockHandle) -> Option<NodeId> {
        self.find(handle).and_then(|r| r.snapshot.target(tree))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn find(&self, handle: LockHandle) -> Option<&LockRegistration> {
        self.registrations.iter().find(|r| r.handle == handle)
    }

    // -------------------------------------------------------------------------
    // Focus events
    // -------------------------------------------------------------------------

    /// Route a key event. Tab and Shift+Tab are contained while a lock is
    /// live. Returns true if the event was consumed.
    pub fn handle_key<T: VisualTree + ?Sized>(&mut self, tree: &mut T, event: &KeyboardEvent) -> bool {
        if event.state == KeyState::Release {
            return false;
        }
        match event.navigation() {
            Some(direction) => self.navigate(tree, direction).is_consumed(),
            None => false,
        }
    }

    /// Sequential navigation request.
    pub fn navigate<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        direction: NavDirection,
    ) -> Interception {
        self.dispatch(tree, FocusEvent::Navigate(direction))
    }

    /// Focus has landed on `target`. Redirects it if it escaped.
    pub fn focus_changed<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        target: NodeId,
        origin: FocusOrigin,
    ) -> Interception {
        self.dispatch(tree, FocusEvent::FocusIn { target, origin })
    }

    /// Focus was lost to nothing.
    pub fn focus_lost<T: VisualTree + ?Sized>(&mut self, tree: &mut T) -> Interception {
        self.dispatch(tree, FocusEvent::FocusLost)
    }

    /// Focus `target` through the host, then let the lock react.
    /// `None` if the host refused the focus call.
    pub fn request_focus<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        target: NodeId,
        origin: FocusOrigin,
    ) -> Option<Interception> {
        if !tree.focus(target) {
            return None;
        }
        Some(self.focus_changed(tree, target, origin))
    }

    /// Dispatch any focus event to the live lock's interceptor.
    pub fn dispatch<T: VisualTree + ?Sized>(&mut self, tree: &mut T, event: FocusEvent) -> Interception {
        // Never decide on a stale focusable set
        self.flush_mutations(tree);

        let Some(handle) = self.interceptor.armed() else {
            return Interception::Passed;
        };
        let Some(registration) = self.registrations.iter_mut().find(|r| r.handle == handle) else {
            return Interception::Passed;
        };

        let guarded = Guarded {
            scope: registration.scope(),
            config: &registration.config,
            last_active: &mut registration.last_active,
            watcher: &mut self.watcher,
        };
        self.interceptor.intercept(tree, guarded, event)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Apply pending tree mutations: recompute liveness and, if focus was
    /// inside the live boundary and its element is gone, elect a new target.
    pub fn flush_mutations<T: VisualTree + ?Sized>(&mut self, tree: &mut T) -> Option<FocusOutcome> {
        let changed = self.watcher.flush(tree);

        if let Some((_, outcome)) = self.reconcile(tree) {
            return Some(outcome);
        }
        if !changed {
            return None;
        }

        let handle = self.interceptor.armed()?;
        let registration = self.registrations.iter_mut().find(|r| r.handle == handle)?;
        let scope = registration.scope();

        // Focus was never inside: nothing to recover
        let previous = registration.last_active.as_ref()?;
        let still_there = previous
            .target(tree)
            .is_some_and(|n| scope.contains(tree, n));
        if still_there {
            return None;
        }
        // Only a focused element that went away is recovered. Focus sitting
        // in a permitted outside zone stays there.
        let focus_gone = match tree.active_element() {
            None => true,
            Some(active) => previous.node() == Some(active),
        };
        if !focus_gone {
            return None;
        }

        let election = elector::elect_fallback(tree, &scope);
        let outcome = apply_election(tree, election);
        registration.last_active = outcome.target().map(|_| FocusSnapshot::capture(tree));
        debug!(%handle, ?outcome, "focused element removed, re-elected");
        Some(outcome)
    }

    // -------------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------------

    /// Move focus into `group_root` without registering a lock. The nearest
    /// registered boundary containing the group bounds the move.
    ///
    /// While a lock is live, a group outside its boundary is refused: focus
    /// never settles outside the live lock through this call.
    pub fn move_focus_into_group<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        group_root: NodeId,
    ) -> Option<NodeId> {
        self.flush_mutations(tree);

        if let Some(handle) = self.interceptor.armed() {
            let outside = self
                .find(handle)
                .is_some_and(|r| !r.scope().contains(tree, group_root));
            if outside {
                debug!(%handle, group_root, "group outside the live lock, move refused");
                return None;
            }
        }

        // Deepest registered boundary enclosing the group
        let enclosing = self
            .registrations
            .iter()
            .filter(|r| r.is_mounted(tree) && tree::contains(tree, r.boundary, group_root))
            .max_by_key(|r| depth(tree, r.boundary))
            .map(LockRegistration::scope)
            .unwrap_or_else(|| Scope::new(tree.root()));

        let moved = focus::move_into(tree, group_root, &enclosing)?;
        if let Some(handle) = self.interceptor.armed() {
            if let Some(registration) = self.registrations.iter_mut().find(|r| r.handle == handle) {
                if registration.scope().contains(tree, moved) {
                    registration.last_active = Some(FocusSnapshot::capture(tree));
                }
            }
        }
        Some(moved)
    }

    // -------------------------------------------------------------------------
    // Liveness
    // -------------------------------------------------------------------------

    /// Bring the interceptor in line with the computed live registration.
    /// Returns the newly armed handle and its focus outcome, if it changed.
    fn reconcile<T: VisualTree + ?Sized>(&mut self, tree: &mut T) -> Option<(LockHandle, FocusOutcome)> {
        let next = self.live(tree);
        let current = self.interceptor.armed();
        if next == current {
            return None;
        }

        if current.is_some() {
            self.interceptor.disarm();
            self.watcher.unwatch();
        }
        debug!(from = ?current, to = ?next, "live lock changed");

        let handle = next?;
        let registration = self.registrations.iter_mut().find(|r| r.handle == handle)?;
        let scope = registration.scope();
        self.interceptor.arm(handle);
        self.watcher.watch(scope.clone());

        if registration.went_live {
            // Re-enabled or uncovered: leave focus alone until the next escape
            return Some((handle, FocusOutcome::Untouched));
        }
        registration.went_live = true;

        let outcome = if registration.config.auto_focus {
            let election = elector::elect(tree, &scope, true);
            apply_election(tree, election)
        } else {
            FocusOutcome::Untouched
        };
        if let Some(node) = outcome.target() {
            if scope.contains(tree, node) {
                registration.last_active = Some(FocusSnapshot::capture(tree));
            }
        }

        if let Some(on_activation) = &registration.config.on_activation {
            on_activation(registration.boundary, outcome);
        }
        Some((handle, outcome))
    }
}

fn apply_election<T: VisualTree + ?Sized>(tree: &mut T, election: Election) -> FocusOutcome {
    let outcome = match election {
        Election::Kept(node) => FocusOutcome::Kept(node),
        Election::Preferred(node) | Election::First(node) => {
            if tree.active_element() == Some(node) {
                FocusOutcome::Kept(node)
            } else if tree.focus(node) {
                FocusOutcome::Moved(node)
            } else {
                FocusOutcome::NoFocusableTarget
            }
        }
        Election::Boundary(node) => {
            if tree.focus(node) {
                FocusOutcome::BoundaryFocused(node)
            } else {
                FocusOutcome::NoFocusableTarget
            }
        }
        Election::NoFocusableTarget => FocusOutcome::NoFocusableTarget,
    };
    if outcome == FocusOutcome::NoFocusableTarget {
        warn!(?election, "no focusable target, host focus unchanged");
    }
    outcome
}

fn depth<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> usize {
    let mut depth = 0;
    let mut current = tree.parent(node);
    while let Some(n) = current {
        depth += 1;
        current = tree.parent(n);
    }
    depth
}

// =============================================================================
// DEFAULT INSTANCE
// =============================================================================

thread_local! {
    static DEFAULT_LOCK: RefCell<FocusLock> = RefCell::new(FocusLock::new());
}

/// Run `f` against the thread's default lock stack.
///
/// Callbacks in a `LockConfig` run while the default stack is borrowed and
/// must not call back into it.
pub fn with_default_lock<R>(f: impl FnOnce(&mut FocusLock) -> R) -> R {
    DEFAULT_LOCK.with(|lock| f(&mut *lock.borrow_mut()))
}

/// Reset the default lock stack (for testing)
pub fn reset_default_lock() {
    with_default_lock(FocusLock::clear);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ComponentTree, NodeProps};
    use crate::state::keyboard::Modifiers;
    use crate::types::NodeFlags;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixture {
        tree: ComponentTree,
        opener: NodeId,
        dialog: NodeId,
        input: NodeId,
        ok: NodeId,
        cancel: NodeId,
    }

    fn setup() -> Fixture {
        let mut tree = ComponentTree::new();
        let opener = tree.append(0, NodeProps::focusable().with_id("opener")).unwrap();
        let dialog = tree.append(0, NodeProps::default().with_id("dialog")).unwrap();
        let input = tree.append(dialog, NodeProps::focusable().with_id("input")).unwrap();
        let ok = tree.append(dialog, NodeProps::focusable().with_id("ok")).unwrap();
        let cancel = tree.append(dialog, NodeProps::focusable().with_id("cancel")).unwrap();
        tree.focus(opener);
        Fixture { tree, opener, dialog, input, ok, cancel }
    }

    #[test]
    fn test_activate_focuses_first() {
        let Fixture { mut tree, dialog, input, .. } = setup();
        let mut lock = FocusLock::new();

        let activation = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        assert_eq!(activation.outcome, FocusOutcome::Moved(input));
        assert_eq!(tree.active_element(), Some(input));
        assert_eq!(lock.live(&tree), Some(activation.handle));
        assert_eq!(lock.armed(), Some(activation.handle));
    }

    #[test]
    fn test_duplicate_boundary_rejected() {
        let Fixture { mut tree, dialog, .. } = setup();
        let mut lock = FocusLock::new();

        let first = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        let err = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap_err();
        assert_eq!(err, FocusLockError::DuplicateBoundary { boundary: dialog, existing: first.handle });
        assert_eq!(lock.len(), 1);
        assert_eq!(lock.live(&tree), Some(first.handle));
    }

    #[test]
    fn test_auto_focus_off_leaves_focus() {
        let Fixture { mut tree, opener, dialog, .. } = setup();
        let mut lock = FocusLock::new();

        let activation = lock
            .activate(&mut tree, dialog, LockConfig::new().with_auto_focus(false))
            .unwrap();
        assert_eq!(activation.outcome, FocusOutcome::Untouched);
        assert_eq!(tree.active_element(), Some(opener));
    }

    #[test]
    fn test_tab_cycles_inside() {
        let Fixture { mut tree, dialog, input, ok, cancel, .. } = setup();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();

        let tab = KeyboardEvent::new("Tab");
        let shift_tab = KeyboardEvent::with_modifiers("Tab", Modifiers::shift());

        assert!(lock.handle_key(&mut tree, &tab));
        assert_eq!(tree.active_element(), Some(ok));
        assert!(lock.handle_key(&mut tree, &tab));
        assert_eq!(tree.active_element(), Some(cancel));
        assert!(lock.handle_key(&mut tree, &tab));
        assert_eq!(tree.active_element(), Some(input));
        assert!(lock.handle_key(&mut tree, &shift_tab));
        assert_eq!(tree.active_element(), Some(cancel));

        // Other keys are not the lock's business
        assert!(!lock.handle_key(&mut tree, &KeyboardEvent::new("Enter")));
    }

    #[test]
    fn test_escape_redirected_to_last_active() {
        let Fixture { mut tree, opener, dialog, ok, .. } = setup();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        lock.request_focus(&mut tree, ok, FocusOrigin::Programmatic);

        let result = lock.request_focus(&mut tree, opener, FocusOrigin::Programmatic);
        assert_eq!(result, Some(Interception::Redirected(ok)));
        assert_eq!(tree.active_element(), Some(ok));
    }

    #[test]
    fn test_pointer_escape_policy() {
        let Fixture { mut tree, opener, dialog, input, .. } = setup();
        let mut lock = FocusLock::new();
        lock.activate(
            &mut tree,
            dialog,
            LockConfig::new().with_allow_outside_click(AllowOutside::When(Box::new(move |n| n == opener))),
        )
        .unwrap();

        // Keyboard escape still redirected
        let result = lock.request_focus(&mut tree, opener, FocusOrigin::Keyboard);
        assert_eq!(result, Some(Interception::Redirected(input)));

        // Pointer escape to a permitted target passes
        let result = lock.request_focus(&mut tree, opener, FocusOrigin::Pointer);
        assert_eq!(result, Some(Interception::Passed));
        assert_eq!(tree.active_element(), Some(opener));
    }

    #[test]
    fn test_no_focus_lock_zone_allowed() {
        let Fixture { mut tree, dialog, .. } = setup();
        let toast = tree
            .append(0, NodeProps::default().with_flags(NodeFlags::NO_FOCUS_LOCK))
            .unwrap();
        let dismiss = tree.append(toast, NodeProps::focusable()).unwrap();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();

        let result = lock.request_focus(&mut tree, dismiss, FocusOrigin::Programmatic);
        assert_eq!(result, Some(Interception::Passed));
        assert_eq!(tree.active_element(), Some(dismiss));
    }

    #[test]
    fn test_frames_pass_unless_cross_frame() {
        let Fixture { mut tree, dialog, input, .. } = setup();
        let frame = tree.append(0, NodeProps::default().with_flags(NodeFlags::FRAME)).unwrap();
        let embedded = tree.append(frame, NodeProps::focusable()).unwrap();

        let mut lock = FocusLock::new();
        let activation = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        assert_eq!(
            lock.request_focus(&mut tree, embedded, FocusOrigin::Programmatic),
            Some(Interception::Passed)
        );
        lock.deactivate(&mut tree, activation.handle);

        lock.activate(&mut tree, dialog, LockConfig::new().with_cross_frame(true)).unwrap();
        assert_eq!(
            lock.request_focus(&mut tree, embedded, FocusOrigin::Programmatic),
            Some(Interception::Redirected(input))
        );
    }

    #[test]
    fn test_whitelist_ignores_events() {
        let Fixture { mut tree, opener, dialog, .. } = setup();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::new().with_whitelist(move |n| n != opener))
            .unwrap();

        assert_eq!(
            lock.request_focus(&mut tree, opener, FocusOrigin::Programmatic),
            Some(Interception::Passed)
        );
    }

    #[test]
    fn test_persistent_focus() {
        let Fixture { mut tree, dialog, input, .. } = setup();
        let mut lock = FocusLock::new();
        let activation = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();

        tree.blur();
        assert_eq!(lock.focus_lost(&mut tree), Interception::Passed);
        lock.deactivate(&mut tree, activation.handle);

        lock.activate(&mut tree, dialog, LockConfig::new().with_persistent_focus(true)).unwrap();
        tree.blur();
        assert_eq!(lock.focus_lost(&mut tree), Interception::Redirected(input));
        assert_eq!(tree.active_element(), Some(input));
    }

    #[test]
    fn test_deactivate_returns_focus() {
        let Fixture { mut tree, opener, dialog, .. } = setup();
        let mut lock = FocusLock::new();
        let activation = lock
            .activate(&mut tree, dialog, LockConfig::new().with_return_focus(true))
            .unwrap();

        let restored = lock.deactivate(&mut tree, activation.handle);
        assert_eq!(restored, Some(RestoreOutcome::Restored(opener)));
        assert_eq!(tree.active_element(), Some(opener));
        assert!(lock.is_empty());
        assert_eq!(lock.armed(), None);

        // Idempotent
        assert_eq!(lock.deactivate(&mut tree, activation.handle), None);
    }

    #[test]
    fn test_callbacks_fire_once() {
        let Fixture { mut tree, dialog, input, .. } = setup();
        let activated = Rc::new(Cell::new(0));
        let deactivated = Rc::new(Cell::new(0));
        let outcome_seen = Rc::new(Cell::new(None));

        let activated_clone = activated.clone();
        let deactivated_clone = deactivated.clone();
        let outcome_clone = outcome_seen.clone();
        let config = LockConfig::new()
            .on_activation(move |_, outcome| {
                activated_clone.set(activated_clone.get() + 1);
                outcome_clone.set(Some(outcome));
            })
            .on_deactivation(move |_| deactivated_clone.set(deactivated_clone.get() + 1));

        let mut lock = FocusLock::new();
        let activation = lock.activate(&mut tree, dialog, config).unwrap();
        assert_eq!(activated.get(), 1);
        assert_eq!(outcome_seen.get(), Some(FocusOutcome::Moved(input)));

        lock.set_disabled(&mut tree, activation.handle, true).unwrap();
        lock.set_disabled(&mut tree, activation.handle, false).unwrap();
        assert_eq!(activated.get(), 1);

        lock.deactivate(&mut tree, activation.handle);
        assert_eq!(deactivated.get(), 1);
    }

    #[test]
    fn test_removed_focus_reelected() {
        let Fixture { mut tree, dialog, input, ok, .. } = setup();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        lock.request_focus(&mut tree, ok, FocusOrigin::Programmatic);

        tree.remove(ok);
        assert_eq!(tree.active_element(), None);
        assert_eq!(lock.flush_mutations(&mut tree), Some(FocusOutcome::Moved(input)));
        assert_eq!(tree.active_element(), Some(input));

        // Nothing pending any more
        assert_eq!(lock.flush_mutations(&mut tree), None);
    }

    #[test]
    fn test_removed_focus_outside_zone_left_alone() {
        let Fixture { mut tree, dialog, ok, .. } = setup();
        let toast = tree
            .append(0, NodeProps::default().with_flags(NodeFlags::NO_FOCUS_LOCK))
            .unwrap();
        let dismiss = tree.append(toast, NodeProps::focusable()).unwrap();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        lock.request_focus(&mut tree, ok, FocusOrigin::Programmatic);

        assert_eq!(
            lock.request_focus(&mut tree, dismiss, FocusOrigin::Programmatic),
            Some(Interception::Passed)
        );

        // The remembered element goes away, but focus was not on it
        tree.remove(ok);
        assert_eq!(lock.flush_mutations(&mut tree), None);
        assert_eq!(tree.active_element(), Some(dismiss));
    }

    #[test]
    fn test_focused_element_disabled_in_place_reelected() {
        let Fixture { mut tree, dialog, input, ok, .. } = setup();
        let mut lock = FocusLock::new();
        lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        lock.request_focus(&mut tree, ok, FocusOrigin::Programmatic);

        tree.insert_flags(ok, NodeFlags::DISABLED);
        assert_eq!(lock.flush_mutations(&mut tree), Some(FocusOutcome::Moved(input)));
    }

    #[test]
    fn test_recycled_boundary_index_is_not_live() {
        let Fixture { mut tree, dialog, .. } = setup();
        let mut lock = FocusLock::new();
        let activation = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();

        tree.remove(dialog);
        lock.flush_mutations(&mut tree);
        assert_eq!(lock.live(&tree), None);

        // An unrelated component lands on the freed index
        let other = tree.append(0, NodeProps::default().with_id("other")).unwrap();
        tree.append(other, NodeProps::focusable()).unwrap();
        assert_eq!(other, dialog);
        assert_eq!(lock.live(&tree), None);
        assert_eq!(lock.flush_mutations(&mut tree), None);
        assert_eq!(lock.armed(), None);

        // Locking the new component is not a duplicate of the stale entry
        let fresh = lock.activate(&mut tree, other, LockConfig::default()).unwrap();
        assert_ne!(fresh.handle, activation.handle);
        assert_eq!(lock.live(&tree), Some(fresh.handle));
        assert_eq!(lock.len(), 2);
    }

    #[test]
    fn test_removed_boundary_hands_over() {
        let Fixture { mut tree, dialog, input, .. } = setup();
        let popup = tree.append(0, NodeProps::default()).unwrap();
        tree.append(popup, NodeProps::focusable()).unwrap();

        let mut lock = FocusLock::new();
        let outer = lock.activate(&mut tree, dialog, LockConfig::default()).unwrap();
        let inner = lock.activate(&mut tree, popup, LockConfig::default()).unwrap();
        assert_eq!(lock.live(&tree), Some(inner.handle));

        tree.remove(popup);
        lock.flush_mutations(&mut tree);
        assert_eq!(lock.armed(), Some(outer.handle));

        // Outer lock had focus state: redirect on next escape, not before
        let result = lock.navigate(&mut tree, NavDirection::Forward);
        assert_eq!(result, Interception::Moved(input));
    }

    #[test]
    fn test_unknown_handle() {
        let Fixture { mut tree, .. } = setup();
        let mut lock = FocusLock::new();
        let err = lock.set_disabled(&mut tree, LockHandle(42), true).unwrap_err();
        assert_eq!(err, FocusLockError::UnknownHandle(LockHandle(42)));
        assert_eq!(err.to_string(), "no lock registered for handle #42");
    }

    #[test]
    fn test_default_lock() {
        reset_default_lock();
        let Fixture { mut tree, dialog, .. } = setup();

        let handle = with_default_lock(|lock| lock.activate(&mut tree, dialog, LockConfig::default()))
            .unwrap()
            .handle;
        assert!(with_default_lock(|lock| lock.is_active(handle)));

        reset_default_lock();
        assert!(with_default_lock(|lock| lock.is_empty()));
    }
}
