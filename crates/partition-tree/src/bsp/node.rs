//! BSP tree node storage and cached structural metadata.
//!
//! Nodes live in a flat arena owned by their tree and are addressed by
//! [`NodeId`] indices; parent and child links are indices too, so the
//! parent/child cycle needs no ownership tricks. Borrowed [`Node`] handles
//! provide the read-side API.
//!
//! # Lazy cache protocol
//!
//! `count` and `height` are memoized per node and validated against the
//! tree's structural version: every read first compares the node's stored
//! version stamp with the tree's current version and, on mismatch, resets
//! the cached values before recomputing. Mutations therefore cost a single
//! counter bump instead of an eager invalidation walk.
//!
//! `depth` is different: it is defined top-down from the root, is not
//! invalidated by the version counter, and is reset explicitly when a node
//! becomes a root.

use std::cell::Cell;

use crate::bsp::tree::BspTree;
use crate::hyperplane::SubHyperplane;

/// Opaque identifier of a node within its owning tree.
///
/// Ids are only meaningful for the tree that produced them, and ids of
/// nodes discarded by a structural mutation may be reused by later
/// insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Sentinel for cached values that have not been computed yet.
pub(crate) const UNKNOWN: u32 = u32::MAX;

/// Arena record backing a single node.
#[derive(Debug, Clone)]
pub(crate) struct NodeData<C, A> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) cut: Option<C>,
    pub(crate) minus: Option<NodeId>,
    pub(crate) plus: Option<NodeId>,
    pub(crate) attr: A,
    pub(crate) count: Cell<u32>,
    pub(crate) height: Cell<u32>,
    pub(crate) depth: Cell<u32>,
    pub(crate) version: Cell<u64>,
}

impl<C, A> NodeData<C, A> {
    /// Creates a detached leaf record.
    pub(crate) fn leaf(attr: A) -> Self {
        Self {
            parent: None,
            cut: None,
            minus: None,
            plus: None,
            attr,
            count: Cell::new(UNKNOWN),
            height: Cell::new(UNKNOWN),
            depth: Cell::new(UNKNOWN),
            version: Cell::new(0),
        }
    }
}

/// A borrowed view of a node in a [`BspTree`].
///
/// Handles are cheap to copy and only allow reading; all structural
/// mutation goes through `&mut` methods on the tree itself.
pub struct Node<'a, C: SubHyperplane, A> {
    tree: &'a BspTree<C, A>,
    id: NodeId,
}

impl<C: SubHyperplane, A> Clone for Node<'_, C, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: SubHyperplane, A> Copy for Node<'_, C, A> {}

impl<'a, C: SubHyperplane, A> Node<'a, C, A> {
    pub(crate) fn new(tree: &'a BspTree<C, A>, id: NodeId) -> Self {
        Self { tree, id }
    }

    /// Returns this node's id.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the tree this node belongs to.
    #[inline]
    pub fn tree(&self) -> &'a BspTree<C, A> {
        self.tree
    }

    #[inline]
    fn data(&self) -> &'a NodeData<C, A> {
        self.tree.data(self.id)
    }

    /// Returns `true` if this node has no cut (and therefore no children).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.data().cut.is_none()
    }

    /// Returns `true` if this node has a cut (and therefore two children).
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.data().cut.is_some()
    }

    /// Returns `true` if this node is the minus child of its parent.
    /// The root is neither a minus nor a plus child.
    pub fn is_minus(&self) -> bool {
        self.parent()
            .is_some_and(|p| p.data().minus == Some(self.id))
    }

    /// Returns `true` if this node is the plus child of its parent.
    /// The root is neither a minus nor a plus child.
    pub fn is_plus(&self) -> bool {
        self.parent()
            .is_some_and(|p| p.data().plus == Some(self.id))
    }

    /// Returns the cut of this node, or `None` for a leaf.
    #[inline]
    pub fn cut(&self) -> Option<&'a C> {
        self.data().cut.as_ref()
    }

    /// Returns the hyperplane of this node's cut, or `None` for a leaf.
    #[inline]
    pub fn cut_hyperplane(&self) -> Option<&'a C::Hyperplane> {
        self.cut().map(SubHyperplane::hyperplane)
    }

    /// Returns this node's attribute.
    #[inline]
    pub fn attr(&self) -> &'a A {
        &self.data().attr
    }

    /// Returns the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<Node<'a, C, A>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Returns the minus child, or `None` for a leaf.
    pub fn minus(&self) -> Option<Node<'a, C, A>> {
        self.data().minus.map(|id| self.tree.node(id))
    }

    /// Returns the plus child, or `None` for a leaf.
    pub fn plus(&self) -> Option<Node<'a, C, A>> {
        self.data().plus.map(|id| self.tree.node(id))
    }

    /// Returns the number of nodes in the subtree rooted here, including
    /// this node. Memoized; recomputed when the tree has changed.
    pub fn count(&self) -> usize {
        self.check_valid();
        let data = self.data();
        if data.count.get() == UNKNOWN {
            let mut total = 1;
            if let (Some(minus), Some(plus)) = (self.minus(), self.plus()) {
                total += minus.count() + plus.count();
            }
            data.count.set(total as u32);
        }
        data.count.get() as usize
    }

    /// Returns the length of the longest downward path from this node to a
    /// leaf (0 for a leaf). Memoized; recomputed when the tree has changed.
    pub fn height(&self) -> usize {
        self.check_valid();
        let data = self.data();
        if data.height.get() == UNKNOWN {
            let height = match (self.minus(), self.plus()) {
                (Some(minus), Some(plus)) => minus.height().max(plus.height()) as u32 + 1,
                _ => 0,
            };
            data.height.set(height);
        }
        data.height.get() as usize
    }

    /// Returns the distance from the root to this node (0 for the root).
    ///
    /// Resolved lazily by walking up through parents the first time it is
    /// queried; not invalidated by structural edits elsewhere in the tree.
    pub fn depth(&self) -> usize {
        let data = self.data();
        if data.depth.get() == UNKNOWN {
            let depth = match self.parent() {
                Some(parent) => parent.depth() as u32 + 1,
                None => 0,
            };
            data.depth.set(depth);
        }
        data.depth.get() as usize
    }

    /// Compares this node's version stamp against the tree's and resets the
    /// memoized count/height on mismatch. Every cached read goes through
    /// this check.
    fn check_valid(&self) {
        let data = self.data();
        let tree_version = self.tree.version();
        if data.version.get() != tree_version {
            data.count.set(UNKNOWN);
            data.height.set(UNKNOWN);
            data.version.set(tree_version);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::bsp::tree::BspTree;
    use crate::hyperplane::Hyperplane;
    use crate::line2d::{Line2D, LineInterval};

    fn x_axis() -> Line2D {
        Line2D::from_points(Point2::origin(), Point2::new(1.0, 0.0))
    }

    fn y_axis() -> Line2D {
        Line2D::from_points(Point2::origin(), Point2::new(0.0, 1.0))
    }

    #[test]
    fn leaf_internal_duality() {
        let mut tree: BspTree<LineInterval> = BspTree::new();
        assert!(tree.root().is_leaf());
        assert!(!tree.root().is_internal());
        assert!(tree.root().cut().is_none());
        assert!(tree.root().minus().is_none());
        assert!(tree.root().plus().is_none());

        let root = tree.root_id();
        assert!(tree.insert_cut(root, &x_axis()));

        let root = tree.root();
        assert!(root.is_internal());
        assert!(root.cut().is_some());
        assert!(root.minus().is_some());
        assert!(root.plus().is_some());
        assert!(root.minus().unwrap().is_leaf());
    }

    #[test]
    fn child_side_queries() {
        let mut tree: BspTree<LineInterval> = BspTree::new();
        let root = tree.root_id();
        tree.insert_cut(root, &x_axis());

        let root = tree.root();
        assert!(!root.is_minus());
        assert!(!root.is_plus());

        let minus = root.minus().unwrap();
        let plus = root.plus().unwrap();
        assert!(minus.is_minus());
        assert!(!minus.is_plus());
        assert!(plus.is_plus());
        assert!(!plus.is_minus());
        assert_eq!(minus.parent().unwrap().id(), root.id());
    }

    #[test]
    fn depth_is_distance_from_root() {
        let mut tree: BspTree<LineInterval> = BspTree::new();
        let root = tree.root_id();
        tree.insert_cut(root, &x_axis());
        let minus = tree.root().minus().unwrap().id();
        tree.insert_cut(minus, &y_axis());

        assert_eq!(tree.root().depth(), 0);
        assert_eq!(tree.node(minus).depth(), 1);
        assert_eq!(tree.node(minus).minus().unwrap().depth(), 2);
        assert_eq!(tree.root().plus().unwrap().depth(), 1);
    }

    #[test]
    fn count_and_height_track_mutations() {
        let mut tree: BspTree<LineInterval> = BspTree::new();
        assert_eq!(tree.root().count(), 1);
        assert_eq!(tree.root().height(), 0);

        let root = tree.root_id();
        tree.insert_cut(root, &x_axis());
        assert_eq!(tree.root().count(), 3);
        assert_eq!(tree.root().height(), 1);

        // reading twice hits the memoized values; a mutation makes the
        // version stamps stale and forces a recomputation
        let minus = tree.root().minus().unwrap().id();
        tree.insert_cut(minus, &y_axis());
        assert_eq!(tree.root().count(), 5);
        assert_eq!(tree.root().height(), 2);
        assert_eq!(tree.node(minus).count(), 3);
        assert_eq!(tree.node(minus).height(), 1);
        assert_eq!(tree.root().plus().unwrap().height(), 0);
    }

    #[test]
    fn cut_hyperplane_matches_cut() {
        let mut tree: BspTree<LineInterval> = BspTree::new();
        let root = tree.root_id();
        tree.insert_cut(root, &x_axis());

        let hyperplane = tree.root().cut_hyperplane().unwrap();
        assert!(hyperplane.similar_orientation(&x_axis()));
        assert!(!hyperplane.similar_orientation(&x_axis().reversed()));
    }
}
