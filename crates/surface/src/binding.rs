//! Runtime binding for the DOM engine
//!
//! The scripting runtime hands over untyped values: a number stands for the
//! document of that surface, anything else must resolve to a concrete node.
//! Each entry point discriminates its arguments once and then works with
//! typed `NodeRef`s only. Results go back the same way, with document
//! references as numbers and nodes as their linked instance handles.
//!
//! Every handle given to the runtime is recorded with the node it stood for.
//! A handle keeps resolving to that node's identity after the node leaves
//! the tree or the surface stops, so queries on it return their zero values.

use crate::error::{HostError, Result};
use dashmap::DashMap;
use dom::{
    DomEngine, DocumentPosition, InstanceHandle, Node, NodeRef, PointerCaptureAuthority,
    PointerId, RevisionProvider, SurfaceId,
};
use std::sync::Arc;

/// A value as it crosses the runtime boundary
#[derive(Debug, Clone)]
pub enum HostValue {
    Undefined,
    Number(f64),
    Handle(InstanceHandle),
    Node(Arc<Node>),
}

/// Sink for direct property updates that bypass the commit pipeline
pub trait DirectManipulation {
    fn set_native_props(&self, node: &Arc<Node>, payload: &serde_json::Value);
}

pub struct NativeDom<P, C> {
    engine: DomEngine<P>,
    pointer_capture: C,
    direct_manipulation: Option<Arc<dyn DirectManipulation + Send + Sync>>,
    /// Handles issued to the runtime and the node each was issued for
    handles: DashMap<InstanceHandle, Arc<Node>>,
}

impl<P: RevisionProvider, C: PointerCaptureAuthority> NativeDom<P, C> {
    pub fn new(engine: DomEngine<P>, pointer_capture: C) -> Self {
        Self {
            engine,
            pointer_capture,
            direct_manipulation: None,
            handles: DashMap::new(),
        }
    }

    pub fn with_direct_manipulation(
        mut self,
        sink: Arc<dyn DirectManipulation + Send + Sync>,
    ) -> Self {
        self.direct_manipulation = Some(sink);
        self
    }

    pub fn engine(&self) -> &DomEngine<P> {
        &self.engine
    }

    pub fn pointer_capture(&self) -> &C {
        &self.pointer_capture
    }

    /// Forget a handle the runtime has dropped
    pub fn release_handle(&self, handle: InstanceHandle) {
        self.handles.remove(&handle);
    }

    /// Number of handles currently issued
    pub fn issued_handles(&self) -> usize {
        self.handles.len()
    }

    /// Resolve a runtime value into a document or node reference
    ///
    /// Numbers must be integral surface ids. Handles must have been issued
    /// by this binding; they resolve whether or not the node is still in
    /// the current revision.
    pub fn node_reference(&self, value: &HostValue) -> Result<NodeRef> {
        match value {
            HostValue::Number(number) => surface_id_from_number(*number).map(NodeRef::Document),
            HostValue::Node(node) => Ok(NodeRef::Node(node.clone())),
            HostValue::Handle(handle) => self
                .handles
                .get(handle)
                .map(|entry| NodeRef::Node(entry.value().clone()))
                .ok_or_else(|| {
                    HostError::InvalidReference(format!(
                        "instance handle {} of surface {} was never issued",
                        handle.token, handle.surface_id
                    ))
                }),
            HostValue::Undefined => Err(HostError::InvalidReference("undefined".to_string())),
        }
    }

    fn element(&self, value: &HostValue) -> Result<Arc<Node>> {
        match self.node_reference(value)? {
            NodeRef::Node(node) => Ok(node),
            NodeRef::Document(surface_id) => Err(HostError::InvalidReference(format!(
                "document {} is not an element",
                surface_id
            ))),
        }
    }

    /// Record the node's linked handle as issued
    fn issue(&self, node: &Arc<Node>) -> Option<InstanceHandle> {
        let handle = node.instance_handle()?;
        self.handles.insert(handle, node.clone());
        Some(handle)
    }

    fn node_value(&self, node: &Arc<Node>) -> HostValue {
        self.issue(node)
            .map(HostValue::Handle)
            .unwrap_or(HostValue::Undefined)
    }

    fn reference_value(&self, reference: &NodeRef) -> HostValue {
        match reference {
            NodeRef::Document(surface_id) => HostValue::Number(f64::from(*surface_id)),
            NodeRef::Node(node) => self.node_value(node),
        }
    }

    // === Node interface ===

    pub fn compare_document_position(&self, node: &HostValue, other: &HostValue) -> Result<f64> {
        let node = self.node_reference(node)?;
        let other = self.node_reference(other)?;

        let position = match (&node, &other) {
            (NodeRef::Document(a), NodeRef::Document(b)) if a == b => DocumentPosition::empty(),
            (NodeRef::Document(_), NodeRef::Document(_)) => DocumentPosition::DISCONNECTED,
            _ => self.engine.compare_document_position(&node, &other),
        };
        Ok(f64::from(position.bits()))
    }

    /// Children that have a linked instance handle
    pub fn child_nodes(&self, node: &HostValue) -> Result<Vec<InstanceHandle>> {
        let node = self.node_reference(node)?;
        Ok(self
            .engine
            .child_nodes(&node)
            .iter()
            .filter_map(|child| self.issue(child))
            .collect())
    }

    pub fn parent_node(&self, node: &HostValue) -> Result<HostValue> {
        let node = self.node_reference(node)?;
        Ok(self
            .engine
            .parent_node(&node)
            .map(|parent| self.reference_value(&parent))
            .unwrap_or(HostValue::Undefined))
    }

    pub fn is_connected(&self, node: &HostValue) -> Result<bool> {
        let node = self.node_reference(node)?;
        Ok(self.engine.is_connected(&node))
    }

    // === Element interface ===

    /// `(x, y, width, height)`
    pub fn bounding_client_rect(
        &self,
        node: &HostValue,
        include_transform: bool,
    ) -> Result<(f64, f64, f64, f64)> {
        let node = self.element(node)?;
        let rect = self.engine.bounding_client_rect(&node, include_transform);
        Ok((rect.x, rect.y, rect.width, rect.height))
    }

    /// `(top, right, bottom, left)`
    pub fn border_width(&self, node: &HostValue) -> Result<(i32, i32, i32, i32)> {
        let node = self.element(node)?;
        let border = self.engine.border_width(&node);
        Ok((border.top, border.right, border.bottom, border.left))
    }

    pub fn inner_size(&self, node: &HostValue) -> Result<(i32, i32)> {
        let node = self.element(node)?;
        let size = self.engine.inner_size(&node);
        Ok((size.width, size.height))
    }

    pub fn scroll_position(&self, node: &HostValue) -> Result<(f64, f64)> {
        let node = self.element(node)?;
        let position = self.engine.scroll_position(&node);
        Ok((position.x, position.y))
    }

    pub fn scroll_size(&self, node: &HostValue) -> Result<(i32, i32)> {
        let node = self.element(node)?;
        let size = self.engine.scroll_size(&node);
        Ok((size.width, size.height))
    }

    pub fn tag_name(&self, node: &HostValue) -> Result<String> {
        let node = self.element(node)?;
        Ok(self.engine.tag_name(&node).to_string())
    }

    pub fn text_content(&self, node: &HostValue) -> Result<String> {
        let node = self.element(node)?;
        Ok(self.engine.text_content(&node))
    }

    pub fn has_pointer_capture(&self, node: &HostValue, pointer_id: PointerId) -> Result<bool> {
        let node = self.element(node)?;
        Ok(self.pointer_capture.has_pointer_capture(pointer_id, &node))
    }

    pub fn set_pointer_capture(&self, node: &HostValue, pointer_id: PointerId) -> Result<()> {
        let node = self.element(node)?;
        self.pointer_capture.set_pointer_capture(pointer_id, &node);
        Ok(())
    }

    pub fn release_pointer_capture(&self, node: &HostValue, pointer_id: PointerId) -> Result<()> {
        let node = self.element(node)?;
        self.pointer_capture
            .release_pointer_capture(pointer_id, &node);
        Ok(())
    }

    // === HTMLElement interface ===

    /// `(offsetParent, top, left)`
    pub fn offset(&self, node: &HostValue) -> Result<(HostValue, f64, f64)> {
        let node = self.element(node)?;
        let offset = self.engine.offset(&node);
        let parent = offset
            .offset_parent
            .map(|parent| self.node_value(&parent))
            .unwrap_or(HostValue::Undefined);
        Ok((parent, offset.top, offset.left))
    }

    // === Root linking ===

    pub fn link_root_node(&self, surface_id: SurfaceId, handle: InstanceHandle) -> HostValue {
        match self.engine.link_root_node(surface_id, handle) {
            Some(root) => {
                self.handles.insert(handle, root.clone());
                HostValue::Node(root)
            }
            None => HostValue::Undefined,
        }
    }

    // === Legacy layout ===

    /// Calls back with `(x, y, width, height, pageX, pageY)`
    pub fn measure<F>(&self, node: &HostValue, callback: F) -> Result<()>
    where
        F: FnOnce(f64, f64, f64, f64, f64, f64),
    {
        let node = self.element(node)?;
        let m = self.engine.measure(&node);
        callback(m.x, m.y, m.width, m.height, m.page_x, m.page_y);
        Ok(())
    }

    /// Calls back with `(x, y, width, height)` in window coordinates
    pub fn measure_in_window<F>(&self, node: &HostValue, callback: F) -> Result<()>
    where
        F: FnOnce(f64, f64, f64, f64),
    {
        let node = self.element(node)?;
        let rect = self.engine.measure_in_window(&node);
        callback(rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }

    /// Calls `on_success(x, y, width, height)` relative to `relative_to`, or
    /// `on_fail()` when the two nodes cannot be measured against each other
    pub fn measure_layout<F, S>(
        &self,
        node: &HostValue,
        relative_to: &HostValue,
        on_fail: F,
        on_success: S,
    ) -> Result<()>
    where
        F: FnOnce(),
        S: FnOnce(f64, f64, f64, f64),
    {
        let node = self.element(node)?;
        let relative_to = self.element(relative_to)?;

        match self.engine.measure_layout(&node, &relative_to) {
            Ok(rect) => on_success(rect.x, rect.y, rect.width, rect.height),
            Err(e) => {
                tracing::debug!("measureLayout of node {} failed: {}", node.id, e);
                on_fail();
            }
        }
        Ok(())
    }

    // === Direct manipulation ===

    pub fn set_native_props(&self, node: &HostValue, payload: &serde_json::Value) -> Result<()> {
        let node = self.element(node)?;
        match &self.direct_manipulation {
            Some(sink) => sink.set_native_props(&node, payload),
            None => tracing::debug!("No direct manipulation sink for node {}", node.id),
        }
        Ok(())
    }
}

fn surface_id_from_number(number: f64) -> Result<SurfaceId> {
    let in_range = number >= f64::from(SurfaceId::MIN) && number <= f64::from(SurfaceId::MAX);
    if number.is_finite() && number.fract() == 0.0 && in_range {
        Ok(number as SurfaceId)
    } else {
        Err(HostError::InvalidReference(format!(
            "{} is not a surface id",
            number
        )))
    }
}
