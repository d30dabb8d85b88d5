//! Core value types shared by the tree model and the queries
//!
//! Key design principles:
//! 1. Identities are plain integers, stable across revisions
//! 2. Geometry is read-only data produced by the layout engine
//! 3. Every query result type has an obvious zero value

use kurbo::{Affine, Rect};
use serde::{Deserialize, Serialize};

/// Stable node identity, shared by every revision of the same logical element
pub type NodeId = u64;

/// Surface (document) identifier
pub type SurfaceId = i32;

/// Pointer identifier from the pointer-events authority
pub type PointerId = i32;

bitflags::bitflags! {
    /// Static traits of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeTraits: u8 {
        /// The single root node of a surface's tree.
        const ROOT = 0b0000_0001;
        /// Node carries raw text content.
        const RAW_TEXT = 0b0000_0010;
        /// Node participates in layout and reports geometry.
        const LAYOUTABLE = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Flags returned by `compare_document_position`.
    ///
    /// Values are bit-exact with the DOM `Node.DOCUMENT_POSITION_*` constants.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DocumentPosition: u16 {
        const DISCONNECTED = 0x01;
        const PRECEDING = 0x02;
        const FOLLOWING = 0x04;
        const CONTAINS = 0x08;
        const CONTAINED_BY = 0x10;
        const IMPLEMENTATION_SPECIFIC = 0x20;
    }
}

/// Rectangle with coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DomRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Apply offset (e.g. the surface's position inside its window)
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn origin(&self) -> DomPoint {
        DomPoint::new(self.x, self.y)
    }

    pub(crate) fn to_kurbo(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub(crate) fn from_kurbo(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomPoint {
    pub x: f64,
    pub y: f64,
}

impl DomPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Integer size, as reported by `clientWidth`/`scrollWidth` style getters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomSize {
    pub width: i32,
    pub height: i32,
}

impl DomSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }
}

/// Border widths rounded to whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BorderWidth {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

/// Unrounded edge widths as produced by layout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeInsets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(width: f64) -> Self {
        Self::new(width, width, width, width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Flex,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    Static,
    #[default]
    Relative,
    Absolute,
}

/// Per-node layout output, relative to the parent's border box
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    pub frame: DomRect,
    pub border: EdgeInsets,
    /// Applied around the centre of `frame`
    pub transform: Affine,
    pub display: Display,
    pub position: PositionType,
}

impl LayoutMetrics {
    pub fn new(frame: DomRect) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn with_border(mut self, border: EdgeInsets) -> Self {
        self.border = border;
        self
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn with_position(mut self, position: PositionType) -> Self {
        self.position = position;
        self
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            frame: DomRect::zero(),
            border: EdgeInsets::default(),
            transform: Affine::IDENTITY,
            display: Display::Flex,
            position: PositionType::Relative,
        }
    }
}

/// Scroll container state, owned by the scrollable component
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    pub content_offset: DomPoint,
    pub content_width: f64,
    pub content_height: f64,
}

/// Opaque reference to the runtime-side object representing a node
///
/// The tree only carries this value; it never owns the runtime object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceHandle {
    pub surface_id: SurfaceId,
    pub token: u64,
}

impl InstanceHandle {
    pub fn new(surface_id: SurfaceId, token: u64) -> Self {
        Self { surface_id, token }
    }
}

/// Result of the legacy `measure` call
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasureRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page_x: f64,
    pub page_y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_position_values() {
        assert_eq!(DocumentPosition::DISCONNECTED.bits(), 1);
        assert_eq!(DocumentPosition::PRECEDING.bits(), 2);
        assert_eq!(DocumentPosition::FOLLOWING.bits(), 4);
        assert_eq!(DocumentPosition::CONTAINS.bits(), 8);
        assert_eq!(DocumentPosition::CONTAINED_BY.bits(), 16);
    }

    #[test]
    fn test_rect_kurbo_conversion() {
        let rect = DomRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(DomRect::from_kurbo(rect.to_kurbo()), rect);
        assert_eq!(rect.offset(1.0, 2.0), DomRect::new(11.0, 22.0, 30.0, 40.0));
    }
}
