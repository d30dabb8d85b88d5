//! Geometry composition along located paths
//!
//! Layout output is local: each frame is relative to its parent's border box.
//! Absolute geometry is recovered by folding frames (and optionally
//! transforms and scroll offsets) from the root down to the target.
//!
//! ```text
//! world = local(n1) * scroll(n1) * local(n2) * scroll(n2) * ... * local(target)
//! local(n) = translate(origin) * [centre * transform * centre^-1]
//! ```
//!
//! The root's own frame is the viewport and is left out, except by
//! `measure_in_window`, which adds it back as the surface's window offset.

use crate::error::{DomError, Result};
use crate::locator::{self, NodePath};
use crate::node::Node;
use crate::revision::Revision;
use crate::types::{
    BorderWidth, Display, DomPoint, DomRect, DomSize, LayoutMetrics, MeasureRect, PositionType,
};
use crate::utils::round_px;
use kurbo::{Affine, Point, Vec2};
use std::sync::Arc;

/// Decides which ancestor `offset` measures against
pub trait OffsetParentRule: Send + Sync {
    fn is_offset_parent(&self, node: &Node) -> bool;
}

/// Default rule: the root, or any ancestor that is not statically positioned
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionedAncestor;

impl OffsetParentRule for PositionedAncestor {
    fn is_offset_parent(&self, node: &Node) -> bool {
        node.is_root()
            || node
                .layout
                .as_ref()
                .is_some_and(|layout| layout.position != PositionType::Static)
    }
}

impl<F> OffsetParentRule for F
where
    F: Fn(&Node) -> bool + Send + Sync,
{
    fn is_offset_parent(&self, node: &Node) -> bool {
        self(node)
    }
}

/// `offsetParent` / `offsetTop` / `offsetLeft`
#[derive(Debug, Clone, Default)]
pub struct DomOffset {
    pub offset_parent: Option<Arc<Node>>,
    pub top: f64,
    pub left: f64,
}

/// Layout metrics of a node that is laid out and displayed
fn displayed_layout(node: &Node) -> Option<&LayoutMetrics> {
    if !node.is_layoutable() {
        return None;
    }
    node.layout
        .as_ref()
        .filter(|layout| layout.display != Display::None)
}

fn is_displayed(path: &NodePath<'_>) -> bool {
    path.steps().iter().all(|step| {
        step.node
            .layout
            .as_ref()
            .map_or(true, |layout| layout.display != Display::None)
    })
}

fn local_transform(layout: &LayoutMetrics, include_transform: bool) -> Affine {
    let frame = layout.frame;
    let origin = Affine::translate(Vec2::new(frame.x, frame.y));
    if !include_transform || layout.transform == Affine::IDENTITY {
        return origin;
    }
    let centre = Vec2::new(frame.width / 2.0, frame.height / 2.0);
    origin * Affine::translate(centre) * layout.transform * Affine::translate(-centre)
}

/// Map from the target's local space into the root's content space
fn compose(path: &NodePath<'_>, include_transform: bool) -> Affine {
    let steps = path.steps();
    let last = steps.len() - 1;
    let mut world = Affine::IDENTITY;

    for (depth, step) in steps.iter().enumerate() {
        if depth > 0 {
            if let Some(layout) = &step.node.layout {
                world = world * local_transform(layout, include_transform);
            }
        }
        if depth < last {
            if let Some(scroll) = &step.node.scroll {
                let offset = scroll.content_offset;
                world = world * Affine::translate(Vec2::new(-offset.x, -offset.y));
            }
        }
    }

    world
}

fn client_rect(path: &NodePath<'_>, include_transform: bool) -> DomRect {
    let Some(layout) = displayed_layout(path.target()) else {
        return DomRect::zero();
    };
    if !is_displayed(path) {
        return DomRect::zero();
    }

    let local = DomRect::new(0.0, 0.0, layout.frame.width, layout.frame.height).to_kurbo();
    DomRect::from_kurbo(compose(path, include_transform).transform_rect_bbox(local))
}

fn located_layout<'a>(revision: &'a Revision, node: &Node) -> Option<&'a Arc<Node>> {
    let path = locator::locate(revision, node.id)?;
    let target = path.target();
    displayed_layout(target).map(|_| target)
}

pub fn bounding_client_rect(revision: &Revision, node: &Node, include_transform: bool) -> DomRect {
    match locator::locate(revision, node.id) {
        Some(path) => client_rect(&path, include_transform),
        None => DomRect::zero(),
    }
}

pub fn border_width(revision: &Revision, node: &Node) -> BorderWidth {
    let Some(layout) = located_layout(revision, node).and_then(|n| n.layout.as_ref()) else {
        return BorderWidth::default();
    };
    let border = layout.border;
    BorderWidth {
        top: round_px(border.top),
        right: round_px(border.right),
        bottom: round_px(border.bottom),
        left: round_px(border.left),
    }
}

/// Padding-box size (frame minus borders)
pub fn inner_size(revision: &Revision, node: &Node) -> DomSize {
    let Some(layout) = located_layout(revision, node).and_then(|n| n.layout.as_ref()) else {
        return DomSize::zero();
    };
    let width = layout.frame.width - layout.border.left - layout.border.right;
    let height = layout.frame.height - layout.border.top - layout.border.bottom;
    DomSize::new(round_px(width.max(0.0)), round_px(height.max(0.0)))
}

pub fn scroll_position(revision: &Revision, node: &Node) -> DomPoint {
    located_layout(revision, node)
        .and_then(|n| n.scroll)
        .map(|scroll| scroll.content_offset)
        .unwrap_or_default()
}

pub fn scroll_size(revision: &Revision, node: &Node) -> DomSize {
    located_layout(revision, node)
        .and_then(|n| n.scroll)
        .map(|scroll| {
            DomSize::new(
                round_px(scroll.content_width),
                round_px(scroll.content_height),
            )
        })
        .unwrap_or_default()
}

pub fn offset(revision: &Revision, node: &Node, rule: &dyn OffsetParentRule) -> DomOffset {
    let Some(path) = locator::locate(revision, node.id) else {
        return DomOffset::default();
    };
    let target = path.target();
    if target.is_root() || !is_displayed(&path) {
        return DomOffset::default();
    }
    let Some(layout) = displayed_layout(target) else {
        return DomOffset::default();
    };

    let mut top = layout.frame.y;
    let mut left = layout.frame.x;

    for ancestor in path.ancestors() {
        if rule.is_offset_parent(ancestor) {
            let border = ancestor.layout.as_ref().map(|l| l.border).unwrap_or_default();
            return DomOffset {
                offset_parent: Some(ancestor.clone()),
                top: top - border.top,
                left: left - border.left,
            };
        }
        if ancestor.is_root() {
            break;
        }
        if let Some(ancestor_layout) = &ancestor.layout {
            top += ancestor_layout.frame.y;
            left += ancestor_layout.frame.x;
        }
    }

    DomOffset {
        offset_parent: None,
        top,
        left,
    }
}

fn window_rect(revision: &Revision, path: &NodePath<'_>) -> DomRect {
    let rect = client_rect(path, true);
    let root_origin = revision
        .root()
        .layout
        .as_ref()
        .map(|layout| layout.frame.origin())
        .unwrap_or_default();
    rect.offset(root_origin.x, root_origin.y)
}

pub fn measure_in_window(revision: &Revision, node: &Node) -> DomRect {
    match locator::locate(revision, node.id) {
        Some(path) => window_rect(revision, &path),
        None => DomRect::zero(),
    }
}

pub fn measure(revision: &Revision, node: &Node) -> MeasureRect {
    let Some(path) = locator::locate(revision, node.id) else {
        return MeasureRect::default();
    };
    let Some(layout) = displayed_layout(path.target()) else {
        return MeasureRect::default();
    };

    let in_window = window_rect(revision, &path);
    MeasureRect {
        x: layout.frame.x,
        y: layout.frame.y,
        width: in_window.width,
        height: in_window.height,
        page_x: in_window.x,
        page_y: in_window.y,
    }
}

/// Untransformed position of `node` relative to `relative_to`
pub fn measure_layout(revision: &Revision, node: &Node, relative_to: &Node) -> Result<DomRect> {
    if node.surface_id != relative_to.surface_id {
        return Err(DomError::CrossSurface {
            surface_id: node.surface_id,
            other_surface_id: relative_to.surface_id,
        });
    }
    if node.surface_id != revision.surface_id() {
        return Err(DomError::SurfaceMismatch {
            expected: revision.surface_id(),
            actual: node.surface_id,
        });
    }

    let path = locator::locate(revision, node.id).ok_or(DomError::NodeNotFound(node.id))?;
    let relative_path =
        locator::locate(revision, relative_to.id).ok_or(DomError::NodeNotFound(relative_to.id))?;

    let origin = compose(&path, false) * Point::ZERO;
    let relative_origin = compose(&relative_path, false) * Point::ZERO;
    let frame = path
        .target()
        .layout
        .as_ref()
        .map(|layout| layout.frame)
        .unwrap_or_default();

    Ok(DomRect::new(
        origin.x - relative_origin.x,
        origin.y - relative_origin.y,
        frame.width,
        frame.height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeInsets, NodeId, ScrollState};

    fn boxed(id: NodeId, frame: DomRect, children: Vec<Arc<Node>>) -> Arc<Node> {
        Arc::new(
            Node::new(id, 1, "View")
                .with_layout(LayoutMetrics::new(frame))
                .with_children(children),
        )
    }

    fn revision_with(root_frame: DomRect, children: Vec<Arc<Node>>) -> Revision {
        let root = Node::root(1, 1)
            .with_layout(LayoutMetrics::new(root_frame))
            .with_children(children);
        Revision::new(1, 1, Arc::new(root)).unwrap()
    }

    fn node(revision: &Revision, id: NodeId) -> Arc<Node> {
        locator::locate(revision, id).unwrap().target().clone()
    }

    // root -> A(10,20) -> B(5,5) -> X(0,0,100,50)
    fn nested() -> Revision {
        let x = boxed(4, DomRect::new(0.0, 0.0, 100.0, 50.0), vec![]);
        let b = boxed(3, DomRect::new(5.0, 5.0, 200.0, 200.0), vec![x]);
        let a = boxed(2, DomRect::new(10.0, 20.0, 300.0, 300.0), vec![b]);
        revision_with(DomRect::new(0.0, 0.0, 400.0, 800.0), vec![a])
    }

    #[test]
    fn test_bounding_rect_accumulates_ancestors() {
        let revision = nested();
        let x = node(&revision, 4);
        assert_eq!(
            bounding_client_rect(&revision, &x, false),
            DomRect::new(15.0, 25.0, 100.0, 50.0)
        );
    }

    #[test]
    fn test_bounding_rect_with_transform() {
        let scaled = Arc::new(
            Node::new(2, 1, "View").with_layout(
                LayoutMetrics::new(DomRect::new(10.0, 10.0, 100.0, 100.0))
                    .with_transform(Affine::scale(2.0)),
            ),
        );
        let revision = revision_with(DomRect::new(0.0, 0.0, 400.0, 400.0), vec![scaled]);
        let target = node(&revision, 2);

        // Scaled around its centre (60, 60)
        assert_eq!(
            bounding_client_rect(&revision, &target, true),
            DomRect::new(-40.0, -40.0, 200.0, 200.0)
        );
        assert_eq!(
            bounding_client_rect(&revision, &target, false),
            DomRect::new(10.0, 10.0, 100.0, 100.0)
        );
    }

    #[test]
    fn test_scroll_offsets_shift_descendants() {
        let item = boxed(3, DomRect::new(0.0, 500.0, 100.0, 40.0), vec![]);
        let scroller = Arc::new(
            Node::new(2, 1, "ScrollView")
                .with_layout(LayoutMetrics::new(DomRect::new(0.0, 100.0, 400.0, 300.0)))
                .with_scroll(ScrollState {
                    content_offset: DomPoint::new(0.0, 450.0),
                    content_width: 400.0,
                    content_height: 2000.0,
                })
                .with_children([item]),
        );
        let revision = revision_with(DomRect::new(0.0, 0.0, 400.0, 800.0), vec![scroller]);

        assert_eq!(
            bounding_client_rect(&revision, &node(&revision, 3), false),
            DomRect::new(0.0, 150.0, 100.0, 40.0)
        );
        let scroller = node(&revision, 2);
        assert_eq!(scroll_position(&revision, &scroller), DomPoint::new(0.0, 450.0));
        assert_eq!(scroll_size(&revision, &scroller), DomSize::new(400, 2000));
        assert_eq!(scroll_size(&revision, &node(&revision, 3)), DomSize::zero());
    }

    #[test]
    fn test_hidden_and_detached_are_zero() {
        let hidden = Arc::new(Node::new(2, 1, "View").with_layout(
            LayoutMetrics::new(DomRect::new(5.0, 5.0, 10.0, 10.0)).with_display(Display::None),
        ));
        let revision = revision_with(DomRect::new(0.0, 0.0, 100.0, 100.0), vec![hidden]);

        assert_eq!(bounding_client_rect(&revision, &node(&revision, 2), false), DomRect::zero());
        assert_eq!(
            bounding_client_rect(&revision, &Node::new(99, 1, "View"), false),
            DomRect::zero()
        );
        assert_eq!(inner_size(&revision, &node(&revision, 2)), DomSize::zero());
    }

    #[test]
    fn test_border_and_inner_size() {
        let bordered = Arc::new(Node::new(2, 1, "View").with_layout(
            LayoutMetrics::new(DomRect::new(0.0, 0.0, 100.0, 60.0))
                .with_border(EdgeInsets::new(1.4, 2.0, 3.0, 4.6)),
        ));
        let revision = revision_with(DomRect::new(0.0, 0.0, 100.0, 100.0), vec![bordered]);
        let target = node(&revision, 2);

        assert_eq!(
            border_width(&revision, &target),
            BorderWidth {
                top: 1,
                right: 2,
                bottom: 3,
                left: 5
            }
        );
        assert_eq!(inner_size(&revision, &target), DomSize::new(93, 56));
    }

    #[test]
    fn test_offset_uses_positioned_ancestor() {
        let leaf = boxed(4, DomRect::new(3.0, 4.0, 10.0, 10.0), vec![]);
        let plain = Arc::new(
            Node::new(3, 1, "View")
                .with_layout(
                    LayoutMetrics::new(DomRect::new(10.0, 20.0, 50.0, 50.0))
                        .with_position(PositionType::Static),
                )
                .with_children([leaf]),
        );
        let positioned = Arc::new(
            Node::new(2, 1, "View")
                .with_layout(
                    LayoutMetrics::new(DomRect::new(100.0, 100.0, 200.0, 200.0))
                        .with_border(EdgeInsets::uniform(2.0)),
                )
                .with_children([plain]),
        );
        let revision = revision_with(DomRect::new(0.0, 0.0, 400.0, 400.0), vec![positioned]);

        let offset = offset(&revision, &node(&revision, 4), &PositionedAncestor);
        assert_eq!(offset.offset_parent.as_ref().map(|n| n.id), Some(2));
        assert_eq!(offset.top, 22.0);
        assert_eq!(offset.left, 11.0);

        let root = offset_of_root(&revision);
        assert!(root.offset_parent.is_none());
    }

    #[test]
    fn test_offset_inside_hidden_ancestor() {
        let leaf = boxed(3, DomRect::new(3.0, 4.0, 10.0, 10.0), vec![]);
        let hidden = Arc::new(
            Node::new(2, 1, "View")
                .with_layout(
                    LayoutMetrics::new(DomRect::new(10.0, 20.0, 50.0, 50.0))
                        .with_display(Display::None),
                )
                .with_children([leaf]),
        );
        let revision = revision_with(DomRect::new(0.0, 0.0, 400.0, 400.0), vec![hidden]);

        let offset = offset(&revision, &node(&revision, 3), &PositionedAncestor);
        assert!(offset.offset_parent.is_none());
        assert_eq!((offset.top, offset.left), (0.0, 0.0));
        assert_eq!(
            bounding_client_rect(&revision, &node(&revision, 3), false),
            DomRect::zero()
        );
    }

    fn offset_of_root(revision: &Revision) -> DomOffset {
        offset(revision, revision.root(), &PositionedAncestor)
    }

    #[test]
    fn test_offset_with_closure_rule() {
        let revision = nested();
        let only_root = |node: &Node| node.is_root();
        let offset = offset(&revision, &node(&revision, 4), &only_root);
        assert_eq!(offset.offset_parent.as_ref().map(|n| n.id), Some(1));
        assert_eq!((offset.top, offset.left), (25.0, 15.0));
    }

    #[test]
    fn test_measure_in_window_adds_root_origin() {
        let x = boxed(2, DomRect::new(10.0, 10.0, 20.0, 20.0), vec![]);
        let revision = revision_with(DomRect::new(0.0, 64.0, 400.0, 800.0), vec![x]);
        let target = node(&revision, 2);

        assert_eq!(measure_in_window(&revision, &target), DomRect::new(10.0, 74.0, 20.0, 20.0));
        let measured = measure(&revision, &target);
        assert_eq!((measured.x, measured.y), (10.0, 10.0));
        assert_eq!((measured.page_x, measured.page_y), (10.0, 74.0));
        assert_eq!((measured.width, measured.height), (20.0, 20.0));
    }

    #[test]
    fn test_measure_layout() {
        let revision = nested();
        let x = node(&revision, 4);
        let a = node(&revision, 2);

        let rect = measure_layout(&revision, &x, &a).unwrap();
        assert_eq!(rect, DomRect::new(5.0, 5.0, 100.0, 50.0));

        let missing = Node::new(99, 1, "View");
        assert!(matches!(
            measure_layout(&revision, &missing, &a),
            Err(DomError::NodeNotFound(99))
        ));

        let foreign = Node::new(4, 2, "View");
        assert!(matches!(
            measure_layout(&revision, &x, &foreign),
            Err(DomError::CrossSurface { .. })
        ));
    }
}
