//! Tree descriptions - build immutable nodes from JSON
//!
//! This is how hosts and tests hand a committed tree to the engine without
//! going through a layout pipeline. Input format:
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "RootView",
//!   "traits": ["root"],
//!   "layout": { "frame": [0, 0, 400, 800], "border": [0, 0, 0, 0] },
//!   "children": [
//!     { "id": 2, "name": "Text", "children": [{ "id": 3, "text": "hi" }] }
//!   ]
//! }
//! ```
//!
//! A node with `text` and no `name` is a raw text node. Nodes are layoutable
//! unless they are raw text or list `traits` explicitly.

use crate::error::{DomError, Result};
use crate::node::Node;
use crate::types::{
    Display, DomPoint, DomRect, EdgeInsets, InstanceHandle, LayoutMetrics, NodeId, NodeTraits,
    PositionType, ScrollState, SurfaceId,
};
use ahash::AHashSet;
use kurbo::Affine;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDescription {
    id: NodeId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    traits: Option<Vec<String>>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    layout: Option<LayoutDescription>,
    #[serde(default)]
    scroll: Option<ScrollDescription>,
    #[serde(default)]
    instance_handle: Option<u64>,
    #[serde(default)]
    children: Vec<NodeDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutDescription {
    frame: [f64; 4],
    #[serde(default)]
    border: Option<[f64; 4]>,
    /// Affine coefficients `[a, b, c, d, e, f]`
    #[serde(default)]
    transform: Option<[f64; 6]>,
    #[serde(default)]
    display: Display,
    #[serde(default)]
    position: PositionType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrollDescription {
    offset: [f64; 2],
    content_size: [f64; 2],
}

/// Parse a tree description from a JSON value
pub fn parse_tree(surface_id: SurfaceId, value: &Value) -> Result<Arc<Node>> {
    let description = NodeDescription::deserialize(value)?;
    let mut seen = AHashSet::new();
    build_node(surface_id, description, &mut seen)
}

/// Parse a tree description from a JSON string
pub fn parse_tree_str(surface_id: SurfaceId, json: &str) -> Result<Arc<Node>> {
    let value: Value = serde_json::from_str(json)?;
    parse_tree(surface_id, &value)
}

fn parse_traits(names: &[String]) -> Result<NodeTraits> {
    let mut traits = NodeTraits::empty();
    for name in names {
        traits |= match name.as_str() {
            "root" => NodeTraits::ROOT,
            "rawText" => NodeTraits::RAW_TEXT,
            "layoutable" => NodeTraits::LAYOUTABLE,
            other => return Err(DomError::InvalidTree(format!("unknown trait '{}'", other))),
        };
    }
    Ok(traits)
}

fn build_layout(layout: LayoutDescription) -> LayoutMetrics {
    let [x, y, width, height] = layout.frame;
    let mut metrics = LayoutMetrics::new(DomRect::new(x, y, width, height))
        .with_display(layout.display)
        .with_position(layout.position);
    if let Some([top, right, bottom, left]) = layout.border {
        metrics = metrics.with_border(EdgeInsets::new(top, right, bottom, left));
    }
    if let Some(coefficients) = layout.transform {
        metrics = metrics.with_transform(Affine::new(coefficients));
    }
    metrics
}

/// Recursively build a node and its children
fn build_node(
    surface_id: SurfaceId,
    description: NodeDescription,
    seen: &mut AHashSet<NodeId>,
) -> Result<Arc<Node>> {
    if !seen.insert(description.id) {
        return Err(DomError::DuplicateNode(description.id));
    }

    let is_text = description.name.is_none() && description.text.is_some();
    let mut node = match (&description.name, &description.text) {
        (None, Some(text)) => Node::raw_text(description.id, surface_id, text.clone()),
        (Some(name), _) => Node::new(description.id, surface_id, name.clone()),
        (None, None) => {
            return Err(DomError::InvalidTree(format!(
                "node {} has neither name nor text",
                description.id
            )))
        }
    };
    if !is_text {
        node.text = description.text;
    }

    if let Some(names) = &description.traits {
        node = node.with_traits(parse_traits(names)?);
    }
    if let Some(layout) = description.layout {
        node = node.with_layout(build_layout(layout));
    }
    if let Some(scroll) = description.scroll {
        node = node.with_scroll(ScrollState {
            content_offset: DomPoint::new(scroll.offset[0], scroll.offset[1]),
            content_width: scroll.content_size[0],
            content_height: scroll.content_size[1],
        });
    }
    if let Some(token) = description.instance_handle {
        node = node.with_instance_handle(InstanceHandle::new(surface_id, token));
    }

    let children = description
        .children
        .into_iter()
        .map(|child| build_node(surface_id, child, seen))
        .collect::<Result<Vec<_>>>()?;

    Ok(Arc::new(node.with_children(children)))
}
