//! Component Registry - in-memory visual tree.
//!
//! Manages the lifecycle of component indices the same way the parallel
//! arrays do, but as an owned instance so each host (and each test) gets its
//! own tree:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Recursive release of children
//! - Reactive focused index and mutation generation (spark-signals)

use std::collections::HashMap;

use spark_signals::{signal, Signal};

use super::tree::{self, VisualTree};
use crate::types::{NodeFlags, NodeId};

// =============================================================================
// Node props
// =============================================================================

/// Properties for a new node.
///
/// ```ignore
/// let button = tree.append(root, NodeProps {
///     flags: NodeFlags::FOCUSABLE,
///     ..Default::default()
/// });
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NodeProps {
    /// Component ID. Generated (`c0`, `c1`, ...) if not provided.
    pub id: Option<String>,
    pub flags: NodeFlags,
    pub tab_index: Option<i32>,
    pub group: Option<String>,
    pub width: u16,
    pub height: u16,
}

impl Default for NodeProps {
    fn default() -> Self {
        Self {
            id: None,
            flags: NodeFlags::NONE,
            tab_index: None,
            group: None,
            width: 1,
            height: 1,
        }
    }
}

impl NodeProps {
    /// A natively focusable node.
    pub fn focusable() -> Self {
        Self { flags: NodeFlags::FOCUSABLE, ..Self::default() }
    }

    /// Set the component ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add markers.
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set an explicit focus priority.
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Mark as a named group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

#[derive(Clone, Debug)]
struct NodeData {
    id: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flags: NodeFlags,
    tab_index: Option<i32>,
    group: Option<String>,
    width: u16,
    height: u16,
}

// =============================================================================
// ComponentTree
// =============================================================================

/// Owned visual tree with index recycling.
pub struct ComponentTree {
    nodes: Vec<Option<NodeData>>,
    id_to_index: HashMap<String, NodeId>,
    free_indices: Vec<NodeId>,
    id_counter: usize,
    root: NodeId,
    /// Focused index, -1 if none.
    focused: Signal<i32>,
    generation: Signal<u64>,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// Create a tree holding only the root (`"root"`).
    pub fn new() -> Self {
        let root = NodeData {
            id: "root".to_string(),
            parent: None,
            children: Vec::new(),
            flags: NodeFlags::NONE,
            tab_index: None,
            group: None,
            width: 1,
            height: 1,
        };
        let mut id_to_index = HashMap::new();
        id_to_index.insert(root.id.clone(), 0);

        Self {
            nodes: vec![Some(root)],
            id_to_index,
            free_indices: Vec::new(),
            id_counter: 0,
            root: 0,
            focused: signal(-1),
            generation: signal(0),
        }
    }

    fn node(&self, index: NodeId) -> Option<&NodeData> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, index: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(index).and_then(Option::as_mut)
    }

    fn bump(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    /// Whether `index` currently holds a component.
    pub fn is_allocated(&self, index: NodeId) -> bool {
        self.node(index).is_some()
    }

    /// Look up the index of a component by ID.
    pub fn index_of(&self, id: &str) -> Option<NodeId> {
        self.id_to_index.get(id).copied()
    }

    /// Number of live components, root included.
    pub fn len(&self) -> usize {
        self.id_to_index.len()
    }

    /// Always false: the root is never released.
    pub fn is_empty(&self) -> bool {
        self.id_to_index.is_empty()
    }

    /// Append a child under `parent`.
    ///
    /// If a component with the same ID already exists its index is returned
    /// unchanged. Returns `None` if `parent` is not allocated.
    pub fn append(&mut self, parent: NodeId, props: NodeProps) -> Option<NodeId> {
        self.node(parent)?;

        let component_id = match props.id {
            Some(id) => id,
            None => {
                let id = format!("c{}", self.id_counter);
                self.id_counter += 1;
                id
            }
        };

        if let Some(&existing) = self.id_to_index.get(&component_id) {
            return Some(existing);
        }

        let data = NodeData {
            id: component_id.clone(),
            parent: Some(parent),
            children: Vec::new(),
            flags: props.flags,
            tab_index: props.tab_index,
            group: props.group,
            width: props.width,
            height: props.height,
        };

        // Reuse free index or allocate new
        let index = match self.free_indices.pop() {
            Some(index) => {
                self.nodes[index] = Some(data);
                index
            }
            None => {
                self.nodes.push(Some(data));
                self.nodes.len() - 1
            }
        };

        self.id_to_index.insert(component_id, index);
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(index);
        }
        self.bump();
        Some(index)
    }

    /// Release a component and, recursively, all of its children.
    ///
    /// Focus on any released node drops to none. The root cannot be removed.
    pub fn remove(&mut self, index: NodeId) {
        if index == self.root || !self.is_allocated(index) {
            return;
        }

        if let Some(parent) = self.node(index).and_then(|n| n.parent) {
            if let Some(parent) = self.node_mut(parent) {
                parent.children.retain(|&c| c != index);
            }
        }

        self.release(index);
        self.bump();
    }

    fn release(&mut self, index: NodeId) {
        let Some(data) = self.nodes.get_mut(index).and_then(Option::take) else {
            return;
        };

        for child in data.children {
            self.release(child);
        }

        self.id_to_index.remove(&data.id);
        self.free_indices.push(index);

        if usize::try_from(self.focused.get()).ok() == Some(index) {
            self.focused.set(-1);
        }
    }

    /// Replace all markers on a node.
    pub fn set_flags(&mut self, index: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_mut(index) {
            node.flags = flags;
            self.bump();
        }
    }

    /// Add markers to a node.
    pub fn insert_flags(&mut self, index: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_mut(index) {
            node.flags.insert(flags);
            self.bump();
        }
    }

    /// Remove markers from a node.
    pub fn remove_flags(&mut self, index: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_mut(index) {
            node.flags.remove(flags);
            self.bump();
        }
    }

    /// Set or clear the explicit focus priority.
    pub fn set_tab_index(&mut self, index: NodeId, tab_index: Option<i32>) {
        if let Some(node) = self.node_mut(index) {
            node.tab_index = tab_index;
            self.bump();
        }
    }

    /// Resize a node. Zero width or height makes it unrendered.
    pub fn set_size(&mut self, index: NodeId, width: u16, height: u16) {
        if let Some(node) = self.node_mut(index) {
            node.width = width;
            node.height = height;
            self.bump();
        }
    }

    /// Set or clear the group marker.
    pub fn set_group(&mut self, index: NodeId, group: Option<String>) {
        if let Some(node) = self.node_mut(index) {
            node.group = group;
            self.bump();
        }
    }

    /// Get the focused index (-1 if none).
    pub fn focused_index(&self) -> i32 {
        self.focused.get()
    }
}

impl VisualTree for ComponentTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn flags(&self, node: NodeId) -> NodeFlags {
        self.node(node).map(|n| n.flags).unwrap_or_default()
    }

    fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.node(node).and_then(|n| n.tab_index)
    }

    fn id_of(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|n| n.id.clone())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        // Released parents release their children, so allocation implies
        // a connected chain up to the root.
        self.is_allocated(node)
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.width > 0 && n.height > 0)
    }

    fn group(&self, node: NodeId) -> Option<String> {
        self.node(node).and_then(|n| n.group.clone())
    }

    fn active_element(&self) -> Option<NodeId> {
        usize::try_from(self.focused.get()).ok()
    }

    fn focus(&mut self, node: NodeId) -> bool {
        let allowed = node == self.root || tree::can_receive_focus(&*self, node);
        // The focused signal is an i32; indices past it cannot be represented
        let Ok(index) = i32::try_from(node) else {
            return false;
        };
        if allowed {
            self.focused.set(index);
        }
        allowed
    }

    fn blur(&mut self) {
        self.focused.set(-1);
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ComponentTree {
        ComponentTree::new()
    }

    #[test]
    fn test_append_generates_ids() {
        let mut tree = setup();
        let a = tree.append(tree.root(), NodeProps::default()).unwrap();
        let b = tree.append(tree.root(), NodeProps::default()).unwrap();

        assert_eq!(tree.id_of(a).as_deref(), Some("c0"));
        assert_eq!(tree.id_of(b).as_deref(), Some("c1"));
        assert_eq!(tree.children(tree.root()), vec![a, b]);
        assert_eq!(tree.parent(a), Some(tree.root()));
    }

    #[test]
    fn test_append_existing_id_returns_same_index() {
        let mut tree = setup();
        let a = tree.append(0, NodeProps::default().with_id("dialog")).unwrap();
        let again = tree.append(0, NodeProps::default().with_id("dialog")).unwrap();
        assert_eq!(a, again);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_releases_children_and_recycles() {
        let mut tree = setup();
        let panel = tree.append(0, NodeProps::default()).unwrap();
        let child = tree.append(panel, NodeProps::focusable()).unwrap();

        tree.remove(panel);
        assert!(!tree.is_attached(panel));
        assert!(!tree.is_attached(child));
        assert!(tree.children(0).is_empty());

        // Freed index gets reused with a different identity
        let fresh = tree.append(0, NodeProps::default().with_id("fresh")).unwrap();
        assert!(fresh == panel || fresh == child);
        assert_eq!(tree.id_of(fresh).as_deref(), Some("fresh"));
    }

    #[test]
    fn test_remove_focused_drops_focus() {
        let mut tree = setup();
        let button = tree.append(0, NodeProps::focusable()).unwrap();
        assert!(tree.focus(button));
        assert_eq!(tree.active_element(), Some(button));

        tree.remove(button);
        assert_eq!(tree.active_element(), None);
        assert_eq!(tree.focused_index(), -1);
    }

    #[test]
    fn test_focus_refuses_ineligible() {
        let mut tree = setup();
        let text = tree.append(0, NodeProps::default()).unwrap();
        let disabled = tree
            .append(0, NodeProps::focusable().with_flags(NodeFlags::DISABLED))
            .unwrap();
        let hidden_parent = tree
            .append(0, NodeProps::default().with_flags(NodeFlags::HIDDEN))
            .unwrap();
        let inside_hidden = tree.append(hidden_parent, NodeProps::focusable()).unwrap();

        assert!(!tree.focus(text));
        assert!(!tree.focus(disabled));
        assert!(!tree.focus(inside_hidden));
        assert!(tree.focus(tree.root()));
    }

    #[test]
    fn test_focus_refuses_unrepresentable_index() {
        let mut tree = setup();
        let a = tree.append(0, NodeProps::focusable()).unwrap();
        assert!(tree.focus(a));

        let huge = i32::MAX as usize + 1 + a;
        assert!(!tree.focus(huge));
        assert!(!tree.focus(usize::MAX));
        assert_eq!(tree.active_element(), Some(a));
        assert_eq!(tree.focused_index(), a as i32);
    }

    #[test]
    fn test_generation_bumps_on_mutation() {
        let mut tree = setup();
        let g0 = tree.generation();
        let a = tree.append(0, NodeProps::default()).unwrap();
        let g1 = tree.generation();
        assert!(g1 > g0);

        tree.set_size(a, 0, 0);
        assert!(tree.generation() > g1);
        assert!(!tree.is_rendered(a));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut tree = setup();
        tree.remove(0);
        assert!(tree.is_attached(0));
        assert!(!tree.is_empty());
    }
}
