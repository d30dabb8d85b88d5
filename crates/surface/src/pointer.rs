//! In-memory pointer capture authority
//!
//! Tracks which node owns each active pointer, keyed by surface and stable
//! node identity so captures survive commits that clone the node.

use dashmap::DashMap;
use dom::{Node, NodeId, PointerCaptureAuthority, PointerId, SurfaceId};

#[derive(Default)]
pub struct PointerCaptureRegistry {
    captures: DashMap<PointerId, (SurfaceId, NodeId)>,
}

impl PointerCaptureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pointers currently captured
    pub fn active_captures(&self) -> usize {
        self.captures.len()
    }
}

impl PointerCaptureAuthority for PointerCaptureRegistry {
    fn has_pointer_capture(&self, pointer_id: PointerId, node: &Node) -> bool {
        self.captures
            .get(&pointer_id)
            .is_some_and(|owner| *owner == (node.surface_id, node.id))
    }

    fn set_pointer_capture(&self, pointer_id: PointerId, node: &Node) {
        tracing::debug!("Pointer {} captured by node {}", pointer_id, node.id);
        self.captures
            .insert(pointer_id, (node.surface_id, node.id));
    }

    fn release_pointer_capture(&self, pointer_id: PointerId, node: &Node) {
        // Only the owner may release
        self.captures
            .remove_if(&pointer_id, |_, owner| *owner == (node.surface_id, node.id));
    }
}
