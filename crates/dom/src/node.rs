//! Immutable tree nodes
//!
//! Nodes are shared between revisions through `Arc`: an unchanged subtree is
//! referenced by every revision that still contains it. There is no parent
//! pointer; ancestry is recovered by `locator` against a specific revision.
//!
//! The only mutable part of a published node is its instance-handle slot,
//! which links it to the runtime-side object without changing the tree.

use crate::types::{InstanceHandle, LayoutMetrics, NodeId, NodeTraits, ScrollState, SurfaceId};
use arc_swap::ArcSwapOption;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Child list (most nodes have <4 children)
pub type Children = SmallVec<[Arc<Node>; 4]>;

pub struct Node {
    pub id: NodeId,
    pub surface_id: SurfaceId,
    pub traits: NodeTraits,
    pub tag_name: String,
    pub text: Option<String>,
    pub layout: Option<LayoutMetrics>,
    pub scroll: Option<ScrollState>,
    pub children: Children,
    instance_handle: ArcSwapOption<InstanceHandle>,
}

impl Node {
    /// Create a layoutable node with no children
    pub fn new(id: NodeId, surface_id: SurfaceId, tag_name: impl Into<String>) -> Self {
        Self {
            id,
            surface_id,
            traits: NodeTraits::LAYOUTABLE,
            tag_name: tag_name.into(),
            text: None,
            layout: None,
            scroll: None,
            children: SmallVec::new(),
            instance_handle: ArcSwapOption::empty(),
        }
    }

    /// Create the root node of a surface
    pub fn root(id: NodeId, surface_id: SurfaceId) -> Self {
        Self::new(id, surface_id, "RootView").with_traits(NodeTraits::ROOT | NodeTraits::LAYOUTABLE)
    }

    /// Create a raw text node (not layoutable on its own)
    pub fn raw_text(id: NodeId, surface_id: SurfaceId, text: impl Into<String>) -> Self {
        let mut node = Self::new(id, surface_id, "RawText").with_traits(NodeTraits::RAW_TEXT);
        node.text = Some(text.into());
        node
    }

    pub fn with_traits(mut self, traits: NodeTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_layout(mut self, layout: LayoutMetrics) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollState) -> Self {
        self.scroll = Some(scroll);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Arc<Node>>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn with_instance_handle(self, handle: InstanceHandle) -> Self {
        self.instance_handle.store(Some(Arc::new(handle)));
        self
    }

    /// Clone this node with a different child list (copy-on-write commit step)
    ///
    /// The clone keeps the identity and the current instance handle.
    pub fn clone_with_children(&self, children: impl IntoIterator<Item = Arc<Node>>) -> Self {
        Self {
            id: self.id,
            surface_id: self.surface_id,
            traits: self.traits,
            tag_name: self.tag_name.clone(),
            text: self.text.clone(),
            layout: self.layout.clone(),
            scroll: self.scroll,
            children: children.into_iter().collect(),
            instance_handle: ArcSwapOption::new(self.instance_handle.load_full()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.traits.contains(NodeTraits::ROOT)
    }

    pub fn is_raw_text(&self) -> bool {
        self.traits.contains(NodeTraits::RAW_TEXT)
    }

    pub fn is_layoutable(&self) -> bool {
        self.traits.contains(NodeTraits::LAYOUTABLE)
    }

    pub fn instance_handle(&self) -> Option<InstanceHandle> {
        self.instance_handle.load().as_deref().copied()
    }

    /// Overwrite the instance-handle link; tree structure is untouched
    pub(crate) fn set_instance_handle(&self, handle: InstanceHandle) {
        self.instance_handle.store(Some(Arc::new(handle)));
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        self.clone_with_children(self.children.iter().cloned())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("surface_id", &self.surface_id)
            .field("traits", &self.traits)
            .field("tag_name", &self.tag_name)
            .field("text", &self.text)
            .field("layout", &self.layout)
            .field("scroll", &self.scroll)
            .field("children", &self.children)
            .field("instance_handle", &self.instance_handle())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_children() {
        let child = Arc::new(Node::new(2, 1, "View"));
        let parent = Node::new(1, 1, "View").with_children([child.clone()]);

        let copy = parent.clone_with_children(parent.children.iter().cloned());
        assert!(Arc::ptr_eq(&copy.children[0], &child));
        assert_eq!(copy.id, parent.id);
    }

    #[test]
    fn test_instance_handle_slot() {
        let node = Node::root(1, 7);
        assert!(node.instance_handle().is_none());

        node.set_instance_handle(InstanceHandle::new(7, 100));
        node.set_instance_handle(InstanceHandle::new(7, 101));
        assert_eq!(node.instance_handle(), Some(InstanceHandle::new(7, 101)));
        assert!(node.is_root());
        assert!(!node.is_raw_text());
    }
}
