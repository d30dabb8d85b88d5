//! Root-to-node path search
//!
//! Nodes carry no parent pointers, so ancestry is recovered per revision by a
//! pre-order walk from the root, matching on stable identity rather than on
//! object identity (a node may be a structurally shared clone).
//!
//! Paths are never cached: they are only meaningful for the revision they
//! were computed against.

use crate::node::Node;
use crate::revision::Revision;
use crate::types::NodeId;
use smallvec::SmallVec;
use std::sync::Arc;

/// One element of a located path
#[derive(Debug, Clone, Copy)]
pub struct PathStep<'a> {
    pub node: &'a Arc<Node>,
    /// Position among the parent's children (0 for the root)
    pub index: usize,
}

/// Path from the revision root (first) to a target node (last)
#[derive(Debug, Clone)]
pub struct NodePath<'a> {
    steps: SmallVec<[PathStep<'a>; 16]>,
}

impl<'a> NodePath<'a> {
    pub fn steps(&self) -> &[PathStep<'a>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Never true for a located path; the root is always present
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn target(&self) -> &'a Arc<Node> {
        self.steps[self.steps.len() - 1].node
    }

    pub fn root(&self) -> &'a Arc<Node> {
        self.steps[0].node
    }

    /// Parent of the target, `None` when the target is the root
    pub fn parent(&self) -> Option<&'a Arc<Node>> {
        let len = self.steps.len();
        (len >= 2).then(|| self.steps[len - 2].node)
    }

    /// Strict ancestors of the target, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &'a Arc<Node>> + '_ {
        self.steps[..self.steps.len() - 1]
            .iter()
            .rev()
            .map(|step| step.node)
    }
}

/// Locate `id` in `revision`, returning the path from the root
///
/// Iterative depth-first search; children are visited in document order.
pub fn locate(revision: &Revision, id: NodeId) -> Option<NodePath<'_>> {
    locate_from(revision.root(), id)
}

pub fn locate_from(root: &Arc<Node>, id: NodeId) -> Option<NodePath<'_>> {
    let mut steps: SmallVec<[PathStep<'_>; 16]> = SmallVec::new();
    steps.push(PathStep {
        node: root,
        index: 0,
    });
    if root.id == id {
        return Some(NodePath { steps });
    }

    // Next child to visit for each node on the current path
    let mut cursors: SmallVec<[usize; 16]> = SmallVec::new();
    cursors.push(0);

    while let Some(cursor) = cursors.last_mut() {
        let parent = steps[steps.len() - 1].node;
        if *cursor >= parent.children.len() {
            cursors.pop();
            steps.pop();
            continue;
        }

        let index = *cursor;
        *cursor += 1;

        let child = &parent.children[index];
        steps.push(PathStep { node: child, index });
        if child.id == id {
            return Some(NodePath { steps });
        }
        cursors.push(0);
    }

    None
}

/// Length of the shared prefix of two paths of the same revision
///
/// The last shared step is the lowest common ancestor.
pub fn common_prefix_len(a: &NodePath<'_>, b: &NodePath<'_>) -> usize {
    a.steps
        .iter()
        .zip(b.steps.iter())
        .take_while(|(x, y)| x.node.id == y.node.id)
        .count()
}

/// Lowest common ancestor of two located paths
pub fn lowest_common_ancestor<'a>(a: &NodePath<'a>, b: &NodePath<'a>) -> Option<&'a Arc<Node>> {
    let shared = common_prefix_len(a, b);
    (shared > 0).then(|| a.steps[shared - 1].node)
}

#[cfg(test)]
mod tests {
    use super::*;

    // root(1) -> [A(2) -> [B(4), C(5)], D(3) -> [E(6)]]
    fn sample() -> Revision {
        let a = Node::new(2, 1, "View").with_children([
            Arc::new(Node::new(4, 1, "View")),
            Arc::new(Node::new(5, 1, "View")),
        ]);
        let d = Node::new(3, 1, "View").with_children([Arc::new(Node::new(6, 1, "View"))]);
        let root = Node::root(1, 1).with_children([Arc::new(a), Arc::new(d)]);
        Revision::new(1, 1, Arc::new(root)).unwrap()
    }

    fn ids(path: &NodePath<'_>) -> Vec<NodeId> {
        path.steps().iter().map(|s| s.node.id).collect()
    }

    #[test]
    fn test_locate_root() {
        let revision = sample();
        let path = locate(&revision, 1).unwrap();
        assert_eq!(ids(&path), vec![1]);
        assert!(path.parent().is_none());
    }

    #[test]
    fn test_locate_deep() {
        let revision = sample();
        let path = locate(&revision, 6).unwrap();
        assert_eq!(ids(&path), vec![1, 3, 6]);
        let indices: Vec<usize> = path.steps().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 0]);
        assert_eq!(path.parent().unwrap().id, 3);
        assert_eq!(path.ancestors().map(|n| n.id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_locate_after_backtrack() {
        let revision = sample();
        let path = locate(&revision, 5).unwrap();
        assert_eq!(ids(&path), vec![1, 2, 5]);
        assert_eq!(path.steps()[2].index, 1);
    }

    #[test]
    fn test_locate_missing() {
        let revision = sample();
        assert!(locate(&revision, 42).is_none());
    }

    #[test]
    fn test_lowest_common_ancestor() {
        let revision = sample();
        let b = locate(&revision, 4).unwrap();
        let c = locate(&revision, 5).unwrap();
        let e = locate(&revision, 6).unwrap();

        assert_eq!(common_prefix_len(&b, &c), 2);
        assert_eq!(lowest_common_ancestor(&b, &c).unwrap().id, 2);
        assert_eq!(lowest_common_ancestor(&b, &e).unwrap().id, 1);
    }
}
