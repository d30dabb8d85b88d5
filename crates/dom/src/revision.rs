//! Immutable tree revisions and the provider contract
//!
//! A revision is one committed snapshot of a surface's tree. It never changes
//! after construction; a newer commit produces a new `Revision`. Callers that
//! answer one logical query fetch the current revision once and reuse it.

use crate::error::{DomError, Result};
use crate::node::Node;
use crate::types::{NodeId, SurfaceId};
use ahash::AHashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Revision {
    root: Arc<Node>,
    surface_id: SurfaceId,
    sequence: u64,
}

impl Revision {
    /// Build a revision, checking the tree invariants
    ///
    /// The root must carry `ROOT`, no other node may, every node must belong
    /// to `surface_id`, and identities must be unique within the tree.
    pub fn new(surface_id: SurfaceId, sequence: u64, root: Arc<Node>) -> Result<Self> {
        validate_tree(surface_id, &root)?;
        Ok(Self::new_unchecked(surface_id, sequence, root))
    }

    /// Build a revision without walking the tree
    ///
    /// Only the root's trait and surface are checked.
    pub fn new_unchecked(surface_id: SurfaceId, sequence: u64, root: Arc<Node>) -> Self {
        debug_assert!(root.is_root(), "revision root must carry the ROOT trait");
        debug_assert_eq!(root.surface_id, surface_id, "revision root belongs to another surface");
        Self {
            root,
            surface_id,
            sequence,
        }
    }

    /// Same tree, different sequence number
    pub fn with_sequence(&self, sequence: u64) -> Self {
        Self {
            root: self.root.clone(),
            surface_id: self.surface_id,
            sequence,
        }
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Source of the current revision for each surface
///
/// Implementations must return `None` once a surface is torn down and must
/// never return a revision belonging to a different surface.
pub trait RevisionProvider {
    fn current_revision(&self, surface_id: SurfaceId) -> Option<Arc<Revision>>;
}

impl<P: RevisionProvider + ?Sized> RevisionProvider for Arc<P> {
    fn current_revision(&self, surface_id: SurfaceId) -> Option<Arc<Revision>> {
        (**self).current_revision(surface_id)
    }
}

impl<P: RevisionProvider + ?Sized> RevisionProvider for &P {
    fn current_revision(&self, surface_id: SurfaceId) -> Option<Arc<Revision>> {
        (**self).current_revision(surface_id)
    }
}

fn validate_tree(surface_id: SurfaceId, root: &Arc<Node>) -> Result<()> {
    if !root.is_root() {
        return Err(DomError::NotARoot(root.id));
    }

    let mut seen: AHashSet<NodeId> = AHashSet::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.surface_id != surface_id {
            return Err(DomError::SurfaceMismatch {
                expected: surface_id,
                actual: node.surface_id,
            });
        }
        if !seen.insert(node.id) {
            return Err(DomError::DuplicateNode(node.id));
        }
        if node.is_root() && !Arc::ptr_eq(node, root) {
            return Err(DomError::UnexpectedRoot(node.id));
        }

        stack.extend(node.children.iter().rev());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: NodeId, surface_id: SurfaceId) -> Arc<Node> {
        Arc::new(Node::new(id, surface_id, "View"))
    }

    #[test]
    fn test_valid_revision() {
        let root = Arc::new(Node::root(1, 3).with_children([leaf(2, 3), leaf(3, 3)]));
        let revision = Revision::new(3, 1, root).unwrap();

        assert_eq!(revision.surface_id(), 3);
        assert_eq!(revision.sequence(), 1);
        assert_eq!(revision.with_sequence(9).sequence(), 9);
    }

    #[test]
    fn test_root_must_be_root() {
        let result = Revision::new(3, 1, leaf(1, 3));
        assert!(matches!(result, Err(DomError::NotARoot(1))));
    }

    #[test]
    fn test_nested_root_rejected() {
        let nested = Arc::new(Node::root(2, 3));
        let root = Arc::new(Node::root(1, 3).with_children([nested]));
        assert!(matches!(Revision::new(3, 1, root), Err(DomError::UnexpectedRoot(2))));
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let root = Arc::new(Node::root(1, 3).with_children([leaf(2, 3), leaf(2, 3)]));
        assert!(matches!(Revision::new(3, 1, root), Err(DomError::DuplicateNode(2))));
    }

    #[test]
    fn test_foreign_node_rejected() {
        let root = Arc::new(Node::root(1, 3).with_children([leaf(2, 4)]));
        assert!(matches!(
            Revision::new(3, 1, root),
            Err(DomError::SurfaceMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }
}
