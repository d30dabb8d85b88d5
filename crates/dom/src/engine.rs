//! DOM Engine - Main entry point for queries
//!
//! Resolves node-or-document arguments against the current revision of their
//! surface and dispatches to the snapshot functions in `query` and
//! `geometry`. Each operation fetches the current revision exactly once and
//! answers every sub-lookup from that same snapshot.
//!
//! A missing revision or a detached node never surfaces as an error: each
//! operation has a documented zero value for it.

use crate::error::{DomError, Result};
use crate::geometry::{self, DomOffset, OffsetParentRule, PositionedAncestor};
use crate::node::Node;
use crate::query;
use crate::revision::{Revision, RevisionProvider};
use crate::types::{
    BorderWidth, DocumentPosition, DomPoint, DomRect, DomSize, InstanceHandle, MeasureRect,
    SurfaceId,
};
use std::sync::Arc;

/// A node argument: either a whole document or a concrete node
#[derive(Debug, Clone)]
pub enum NodeRef {
    /// Stands for the document of a surface; its only child is the root
    Document(SurfaceId),
    Node(Arc<Node>),
}

impl NodeRef {
    pub fn surface_id(&self) -> SurfaceId {
        match self {
            NodeRef::Document(surface_id) => *surface_id,
            NodeRef::Node(node) => node.surface_id,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, NodeRef::Document(_))
    }

    pub fn as_node(&self) -> Option<&Arc<Node>> {
        match self {
            NodeRef::Node(node) => Some(node),
            NodeRef::Document(_) => None,
        }
    }
}

impl From<Arc<Node>> for NodeRef {
    fn from(node: Arc<Node>) -> Self {
        NodeRef::Node(node)
    }
}

/// Query engine over a revision provider
pub struct DomEngine<P> {
    provider: P,
    offset_rule: Box<dyn OffsetParentRule>,
}

impl<P: RevisionProvider> DomEngine<P> {
    /// Create engine with the default offset-parent rule
    pub fn new(provider: P) -> Self {
        Self::with_offset_rule(provider, Box::new(PositionedAncestor))
    }

    /// Create engine with a style-model supplied offset-parent rule
    pub fn with_offset_rule(provider: P, offset_rule: Box<dyn OffsetParentRule>) -> Self {
        Self {
            provider,
            offset_rule,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch the current revision of a surface once
    ///
    /// A revision for the wrong surface is a provider bug; it is logged and
    /// treated as no revision.
    pub fn current_revision(&self, surface_id: SurfaceId) -> Option<Arc<Revision>> {
        let revision = self.provider.current_revision(surface_id)?;
        if revision.surface_id() != surface_id || revision.root().surface_id != surface_id {
            tracing::warn!(
                "Provider returned revision of surface {} for surface {}",
                revision.surface_id(),
                surface_id
            );
            return None;
        }
        Some(revision)
    }

    // === Node interface ===

    /// Position of `node` relative to `other`
    pub fn compare_document_position(&self, node: &NodeRef, other: &NodeRef) -> DocumentPosition {
        let Some(revision) = self.current_revision(node.surface_id()) else {
            return DocumentPosition::DISCONNECTED;
        };

        match (node, other) {
            // Equal documents are handled by the caller before reaching here
            (NodeRef::Document(_), NodeRef::Document(_)) => DocumentPosition::DISCONNECTED,
            (NodeRef::Document(surface_id), NodeRef::Node(other)) => {
                if other.is_root() {
                    return if *surface_id == other.surface_id {
                        DocumentPosition::CONTAINS | DocumentPosition::PRECEDING
                    } else {
                        DocumentPosition::DISCONNECTED
                    };
                }
                // The root stands in for the document
                query::compare_document_position(&revision, revision.root(), other)
            }
            (NodeRef::Node(node), NodeRef::Document(surface_id)) => {
                if node.surface_id != *surface_id {
                    return DocumentPosition::DISCONNECTED;
                }
                if node.is_root() {
                    return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
                }
                query::compare_document_position(&revision, node, revision.root())
            }
            (NodeRef::Node(node), NodeRef::Node(other)) => {
                query::compare_document_position(&revision, node, other)
            }
        }
    }

    pub fn child_nodes(&self, node: &NodeRef) -> Vec<Arc<Node>> {
        let Some(revision) = self.current_revision(node.surface_id()) else {
            return Vec::new();
        };

        match node {
            NodeRef::Document(_) => vec![revision.root().clone()],
            NodeRef::Node(node) => query::child_nodes(&revision, node),
        }
    }

    pub fn parent_node(&self, node: &NodeRef) -> Option<NodeRef> {
        let node = match node {
            NodeRef::Document(_) => return None,
            NodeRef::Node(node) => node,
        };
        if node.is_root() {
            return Some(NodeRef::Document(node.surface_id));
        }

        let revision = self.current_revision(node.surface_id)?;
        query::parent_node(&revision, node).map(NodeRef::Node)
    }

    pub fn is_connected(&self, node: &NodeRef) -> bool {
        let Some(revision) = self.current_revision(node.surface_id()) else {
            return false;
        };

        match node {
            NodeRef::Document(_) => true,
            NodeRef::Node(node) => query::is_connected(&revision, node),
        }
    }

    // === Element interface ===

    pub fn bounding_client_rect(&self, node: &Node, include_transform: bool) -> DomRect {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::bounding_client_rect(&revision, node, include_transform))
            .unwrap_or_default()
    }

    pub fn border_width(&self, node: &Node) -> BorderWidth {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::border_width(&revision, node))
            .unwrap_or_default()
    }

    pub fn inner_size(&self, node: &Node) -> DomSize {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::inner_size(&revision, node))
            .unwrap_or_default()
    }

    pub fn scroll_position(&self, node: &Node) -> DomPoint {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::scroll_position(&revision, node))
            .unwrap_or_default()
    }

    pub fn scroll_size(&self, node: &Node) -> DomSize {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::scroll_size(&revision, node))
            .unwrap_or_default()
    }

    pub fn tag_name<'a>(&self, node: &'a Node) -> &'a str {
        query::tag_name(node)
    }

    pub fn text_content(&self, node: &Node) -> String {
        self.current_revision(node.surface_id)
            .map(|revision| query::text_content(&revision, node))
            .unwrap_or_default()
    }

    // === HTMLElement interface ===

    pub fn offset(&self, node: &Node) -> DomOffset {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::offset(&revision, node, self.offset_rule.as_ref()))
            .unwrap_or_default()
    }

    // === Root linking ===

    /// Attach a runtime handle to the current root of a surface
    ///
    /// Later calls overwrite the association. Returns `None` when the surface
    /// has no current revision.
    pub fn link_root_node(&self, surface_id: SurfaceId, handle: InstanceHandle) -> Option<Arc<Node>> {
        let revision = self.current_revision(surface_id)?;
        let root = revision.root();
        root.set_instance_handle(handle);
        tracing::debug!("Linked root {} of surface {}", root.id, surface_id);
        Some(root.clone())
    }

    // === Legacy layout ===

    pub fn measure(&self, node: &Node) -> MeasureRect {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::measure(&revision, node))
            .unwrap_or_default()
    }

    pub fn measure_in_window(&self, node: &Node) -> DomRect {
        self.current_revision(node.surface_id)
            .map(|revision| geometry::measure_in_window(&revision, node))
            .unwrap_or_default()
    }

    pub fn measure_layout(&self, node: &Node, relative_to: &Node) -> Result<DomRect> {
        let revision = self
            .current_revision(node.surface_id)
            .ok_or(DomError::NoCurrentRevision(node.surface_id))?;
        geometry::measure_layout(&revision, node, relative_to)
    }
}
