//! Structural queries against a single revision
//!
//! Every function here is a pure function of one revision. Node arguments may
//! come from older revisions; they are looked up by identity, so the answers
//! always reflect the revision passed in.

use crate::locator::{self, NodePath};
use crate::node::Node;
use crate::revision::Revision;
use crate::types::DocumentPosition;
use std::cmp::Ordering;
use std::sync::Arc;

/// Position of `node` relative to `other`
///
/// `PRECEDING` means `node` comes first in document order; `CONTAINS` means
/// `node` is an ancestor of `other`. Nodes on other surfaces, or absent from
/// `revision`, are `DISCONNECTED`.
pub fn compare_document_position(
    revision: &Revision,
    node: &Node,
    other: &Node,
) -> DocumentPosition {
    if node.surface_id != other.surface_id || node.surface_id != revision.surface_id() {
        return DocumentPosition::DISCONNECTED;
    }

    let (Some(path), Some(other_path)) = (
        locator::locate(revision, node.id),
        locator::locate(revision, other.id),
    ) else {
        return DocumentPosition::DISCONNECTED;
    };

    position_of_paths(&path, &other_path)
}

pub(crate) fn position_of_paths(path: &NodePath<'_>, other_path: &NodePath<'_>) -> DocumentPosition {
    let shared = locator::common_prefix_len(path, other_path);

    match (shared == path.len(), shared == other_path.len()) {
        (true, true) => DocumentPosition::empty(),
        (true, false) => DocumentPosition::CONTAINS | DocumentPosition::PRECEDING,
        (false, true) => DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING,
        (false, false) => {
            // First divergence below the LCA decides sibling order
            let index = path.steps()[shared].index;
            let other_index = other_path.steps()[shared].index;
            match index.cmp(&other_index) {
                Ordering::Less => DocumentPosition::PRECEDING,
                Ordering::Greater => DocumentPosition::FOLLOWING,
                // Distinct identities under one parent share no index
                Ordering::Equal => DocumentPosition::DISCONNECTED,
            }
        }
    }
}

/// Children of `node` as found in `revision`; empty if detached
pub fn child_nodes(revision: &Revision, node: &Node) -> Vec<Arc<Node>> {
    match locator::locate(revision, node.id) {
        Some(path) => path.target().children.to_vec(),
        None => {
            tracing::debug!("child_nodes: node {} not in revision", node.id);
            Vec::new()
        }
    }
}

/// Parent of `node` in `revision`; `None` for the root or a detached node
pub fn parent_node(revision: &Revision, node: &Node) -> Option<Arc<Node>> {
    let path = locator::locate(revision, node.id)?;
    path.parent().cloned()
}

pub fn is_connected(revision: &Revision, node: &Node) -> bool {
    node.surface_id == revision.surface_id() && locator::locate(revision, node.id).is_some()
}

/// Concatenated raw text of the subtree rooted at `node`, in document order
pub fn text_content(revision: &Revision, node: &Node) -> String {
    let Some(path) = locator::locate(revision, node.id) else {
        return String::new();
    };

    let mut text = String::new();
    let mut stack = vec![path.target()];
    while let Some(current) = stack.pop() {
        if current.is_raw_text() {
            if let Some(content) = &current.text {
                text.push_str(content);
            }
        }
        // Push children in reverse order (so they're visited left-to-right)
        stack.extend(current.children.iter().rev());
    }
    text
}

/// Static tag name; needs no revision
pub fn tag_name(node: &Node) -> &str {
    &node.tag_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;

    fn view(id: NodeId, children: Vec<Arc<Node>>) -> Arc<Node> {
        Arc::new(Node::new(id, 1, "View").with_children(children))
    }

    fn text(id: NodeId, content: &str) -> Arc<Node> {
        Arc::new(Node::raw_text(id, 1, content))
    }

    // root(1) -> A(2) -> [B(3), C(4) -> [T(5) "hello ", T(6) "world"]]
    fn sample() -> Revision {
        let c = view(4, vec![text(5, "hello "), text(6, "world")]);
        let a = view(2, vec![view(3, vec![]), c]);
        Revision::new(1, 1, Arc::new(Node::root(1, 1).with_children([a]))).unwrap()
    }

    fn node(revision: &Revision, id: NodeId) -> Arc<Node> {
        locator::locate(revision, id).unwrap().target().clone()
    }

    #[test]
    fn test_sibling_order() {
        let revision = sample();
        let b = node(&revision, 3);
        let c = node(&revision, 4);

        assert_eq!(compare_document_position(&revision, &b, &c), DocumentPosition::PRECEDING);
        assert_eq!(compare_document_position(&revision, &c, &b), DocumentPosition::FOLLOWING);
    }

    #[test]
    fn test_containment() {
        let revision = sample();
        let a = node(&revision, 2);
        let t = node(&revision, 6);

        assert_eq!(
            compare_document_position(&revision, &a, &t),
            DocumentPosition::CONTAINS | DocumentPosition::PRECEDING
        );
        assert_eq!(
            compare_document_position(&revision, &t, &a),
            DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING
        );
    }

    #[test]
    fn test_cousins_ordered_by_divergence() {
        let revision = sample();
        let b = node(&revision, 3);
        let t = node(&revision, 5);
        assert_eq!(compare_document_position(&revision, &b, &t), DocumentPosition::PRECEDING);
    }

    #[test]
    fn test_disconnected() {
        let revision = sample();
        let b = node(&revision, 3);
        let stranger = Node::new(99, 1, "View");
        let foreign = Node::new(3, 2, "View");

        assert_eq!(
            compare_document_position(&revision, &b, &stranger),
            DocumentPosition::DISCONNECTED
        );
        assert_eq!(
            compare_document_position(&revision, &b, &foreign),
            DocumentPosition::DISCONNECTED
        );
    }

    #[test]
    fn test_navigation() {
        let revision = sample();
        let a = node(&revision, 2);
        let c = node(&revision, 4);

        let children: Vec<NodeId> = child_nodes(&revision, &a).iter().map(|n| n.id).collect();
        assert_eq!(children, vec![3, 4]);
        assert_eq!(parent_node(&revision, &c).unwrap().id, 2);
        assert!(parent_node(&revision, revision.root()).is_none());
        assert!(child_nodes(&revision, &Node::new(99, 1, "View")).is_empty());
    }

    #[test]
    fn test_text_content() {
        let revision = sample();
        assert_eq!(text_content(&revision, &node(&revision, 2)), "hello world");
        assert_eq!(text_content(&revision, &node(&revision, 6)), "world");
        assert_eq!(text_content(&revision, &node(&revision, 3)), "");
        assert_eq!(tag_name(&node(&revision, 3)), "View");
    }

    #[test]
    fn test_is_connected() {
        let revision = sample();
        assert!(is_connected(&revision, &node(&revision, 5)));
        assert!(!is_connected(&revision, &Node::new(99, 1, "View")));
        assert!(!is_connected(&revision, &Node::new(5, 2, "View")));
    }
}
