//! Pointer capture contract
//!
//! Capture state is owned by the pointer-events authority; the DOM layer only
//! forwards calls, keyed by the node's stable identity.

use crate::node::Node;
use crate::types::PointerId;

pub trait PointerCaptureAuthority {
    fn has_pointer_capture(&self, pointer_id: PointerId, node: &Node) -> bool;

    fn set_pointer_capture(&self, pointer_id: PointerId, node: &Node);

    fn release_pointer_capture(&self, pointer_id: PointerId, node: &Node);
}
