//! BSP tree container and structural algorithms.
//!
//! A [`BspTree`] owns its nodes in a flat arena and carries a structural
//! version counter; every mutation bumps the counter and the per-node
//! caches revalidate lazily against it (see [`crate::bsp::node`]).
//!
//! The algorithms here are the generic core: fitting a candidate cut to a
//! node's region (`trim_to_node`), inserting cuts one node or one convex
//! piece at a time, copying structure between trees, extracting a subtree
//! with its ancestor context, splitting a whole tree by a hyperplane, and
//! rewriting every cut under a point transform.

use std::fmt;
use std::fmt::Write as _;

use crate::bsp::iter::Nodes;
use crate::bsp::node::{Node, NodeData, NodeId, UNKNOWN};
use crate::bsp::visitor::{BspVisitor, VisitResult, VisitStep};
use crate::hyperplane::{Hyperplane, PointOf, SubHyperplane, Transform};
use crate::split::{Side, Split, SplitLocation};

/// Tie-break rule for [`BspTree::find_with`] when the query point lies
/// exactly on an internal node's cut hyperplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutRule {
    /// Continue the search in the minus child.
    Minus,
    /// Continue the search in the plus child.
    Plus,
    /// Stop the search and return the internal node itself.
    Node,
}

/// A Binary Space Partitioning tree over an abstract space.
///
/// The tree recursively partitions the whole space into convex cells. Each
/// internal node carries a *cut*: a convex subset of a hyperplane, already
/// trimmed to the region its node occupies. Leaves are the cells.
///
/// `C` is the cut type (see [`SubHyperplane`]); `A` is an attribute stored
/// on every node, which higher layers use to attach domain data (an
/// inside/outside flag, for instance) without the tree knowing its meaning.
///
/// # Construction
///
/// Trees start as a single leaf covering the whole space and are carved by
/// inserting cuts:
///
/// ```ignore
/// use nalgebra::Point2;
/// use partition_tree::{BspTree, Line2D, LineInterval};
///
/// let mut tree: BspTree<LineInterval> = BspTree::new();
/// tree.insert(Line2D::from_points(Point2::origin(), Point2::new(1.0, 0.0)).span());
/// let cell = tree.find(&Point2::new(2.0, 3.0));
/// ```
#[derive(Debug, Clone)]
pub struct BspTree<C: SubHyperplane, A = ()> {
    nodes: Vec<NodeData<C, A>>,
    free: Vec<NodeId>,
    root: NodeId,
    version: u64,
}

impl<C: SubHyperplane, A> BspTree<C, A> {
    /// Returns a handle to the root node.
    #[inline]
    pub fn root(&self) -> Node<'_, C, A> {
        self.node(self.root)
    }

    /// Returns the id of the root node.
    #[inline]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Returns a handle to the node with the given id.
    ///
    /// The id must come from this tree and still be part of its structure.
    pub fn node(&self, id: NodeId) -> Node<'_, C, A> {
        Node::new(self, id)
    }

    /// Returns the total number of nodes in the tree.
    pub fn count(&self) -> usize {
        self.root().count()
    }

    /// Returns the height of the tree (0 for a single leaf).
    pub fn height(&self) -> usize {
        self.root().height()
    }

    /// Returns the structural version of the tree. Every mutation strictly
    /// increases it (saturating at the counter's maximum); read-only
    /// queries never change it.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the attribute of the given node.
    pub fn attr(&self, id: NodeId) -> &A {
        &self.nodes[id.0].attr
    }

    /// Returns the attribute of the given node for modification. Attribute
    /// edits are not structural and do not bump the tree version.
    pub fn attr_mut(&mut self, id: NodeId) -> &mut A {
        &mut self.nodes[id.0].attr
    }

    /// Returns an iterator over all nodes, pre-order, minus before plus.
    pub fn nodes(&self) -> Nodes<'_, C, A> {
        Nodes::new(self, self.root)
    }

    /// Returns an iterator over the subtree rooted at the given node.
    pub fn nodes_from(&self, id: NodeId) -> Nodes<'_, C, A> {
        Nodes::new(self, id)
    }

    /// Finds the smallest node containing the point, descending into the
    /// minus child when the point lies exactly on a cut.
    pub fn find(&self, point: &PointOf<C>) -> Node<'_, C, A> {
        self.find_with(point, CutRule::Minus)
    }

    /// Finds the node containing the point, resolving on-cut ties with the
    /// given rule. With [`CutRule::Node`] the result can be an internal
    /// node; otherwise it is always a leaf.
    pub fn find_with(&self, point: &PointOf<C>, rule: CutRule) -> Node<'_, C, A> {
        let mut current = self.root;
        while let Some((minus, plus)) = self.children(current) {
            current = match self.node_cut(current).hyperplane().classify(point) {
                Side::Minus => minus,
                Side::Plus => plus,
                Side::On => match rule {
                    CutRule::Minus => minus,
                    CutRule::Plus => plus,
                    CutRule::Node => return self.node(current),
                },
            };
        }
        self.node(current)
    }

    /// Restricts a candidate convex piece to the region of the given node
    /// by splitting it against every ancestor cut up to the root.
    ///
    /// A candidate coincident with an ancestor's cut hyperplane is a
    /// special case: with the same orientation it adds no information and
    /// trimming fails (`None`); with the opposite orientation it is treated
    /// as lying inside the node's region and survives untrimmed. This is
    /// what keeps zero-thickness regions representable.
    pub fn trim_to_node(&self, node: NodeId, sub: C) -> Option<C> {
        let mut result = Some(sub);
        let mut current = node;

        loop {
            let Some(parent) = self.nodes[current.0].parent else {
                break;
            };
            let Some(candidate) = result.take() else {
                break;
            };

            let parent_hyperplane = self.node_cut(parent).hyperplane();
            let split = candidate.split(parent_hyperplane);

            result = if split.location() == SplitLocation::Neither {
                if candidate
                    .hyperplane()
                    .similar_orientation(parent_hyperplane)
                {
                    None
                } else {
                    Some(candidate)
                }
            } else {
                let (minus_part, plus_part) = split.into_parts();
                if self.nodes[parent.0].minus == Some(current) {
                    minus_part
                } else {
                    plus_part
                }
            };

            current = parent;
        }

        result
    }

    /// Runs a visitor over the whole tree.
    pub fn accept<V>(&self, visitor: &mut V) -> VisitResult
    where
        V: BspVisitor<C, A>,
    {
        self.accept_at(self.root, visitor)
    }

    /// Runs a visitor over the subtree rooted at the given node.
    pub fn accept_at<V>(&self, node: NodeId, visitor: &mut V) -> VisitResult
    where
        V: BspVisitor<C, A>,
    {
        let Some((minus, plus)) = self.children(node) else {
            return visitor.visit(self.node(node));
        };

        let Some(order) = visitor.visit_order(self.node(node)) else {
            return VisitResult::Continue;
        };

        for step in order.steps() {
            let result = match step {
                VisitStep::Minus => self.accept_at(minus, visitor),
                VisitStep::Node => visitor.visit(self.node(node)),
                VisitStep::Plus => self.accept_at(plus, visitor),
            };
            if result == VisitResult::Terminate {
                return VisitResult::Terminate;
            }
        }
        VisitResult::Continue
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData<C, A> {
        &self.nodes[id.0]
    }

    /// Returns `(minus, plus)` for an internal node, `None` for a leaf.
    fn children(&self, node: NodeId) -> Option<(NodeId, NodeId)> {
        let data = &self.nodes[node.0];
        match (data.minus, data.plus) {
            (Some(minus), Some(plus)) => Some((minus, plus)),
            _ => None,
        }
    }

    /// Returns the cut of a node known to be internal.
    fn node_cut(&self, node: NodeId) -> &C {
        self.nodes[node.0]
            .cut
            .as_ref()
            .expect("internal node always has a cut")
    }
}

impl<C: SubHyperplane, A: Clone + Default> BspTree<C, A> {
    /// Creates a tree consisting of a single leaf covering the whole space.
    pub fn new() -> Self {
        Self::with_root_attr(A::default())
    }

    /// Creates a single-leaf tree with the given attribute on the root.
    pub fn with_root_attr(attr: A) -> Self {
        Self {
            nodes: vec![NodeData::leaf(attr)],
            free: Vec::new(),
            root: NodeId(0),
            version: 0,
        }
    }

    /// Cuts a node with the given hyperplane.
    ///
    /// The hyperplane's span is first trimmed against every ancestor cut.
    /// If anything remains, it becomes the node's cut and two fresh leaf
    /// children are created; the node's previous subtree, if any, is
    /// discarded. If nothing remains (the hyperplane misses the node's
    /// region, or coincides with an ancestor cut in the same orientation),
    /// the node is demoted to a leaf and `false` is returned.
    ///
    /// Both outcomes count as structural mutations and bump the version.
    pub fn insert_cut(&mut self, node: NodeId, cutter: &C::Hyperplane) -> bool {
        self.insert_cut_with(node, cutter, |_, _| {})
    }

    /// Like [`insert_cut`](Self::insert_cut), additionally invoking the
    /// initializer with the attributes of the new minus and plus leaves
    /// when the cut succeeds.
    pub fn insert_cut_with(
        &mut self,
        node: NodeId,
        cutter: &C::Hyperplane,
        mut init: impl FnMut(&mut A, &mut A),
    ) -> bool {
        match self.trim_to_node(node, cutter.span()) {
            Some(cut) if !cut.is_empty() => {
                self.set_node_cut(node, Some(cut), &mut init);
                true
            }
            _ => {
                self.set_node_cut(node, None, &mut init);
                false
            }
        }
    }

    /// Removes the cut of a node, demoting it to a leaf and discarding its
    /// subtree. Returns `true` (and bumps the version) iff the node had a
    /// cut.
    pub fn remove_cut(&mut self, node: NodeId) -> bool {
        if self.nodes[node.0].cut.is_some() {
            self.set_node_cut(node, None, &mut |_, _| {});
            true
        } else {
            false
        }
    }

    /// Inserts a convex piece into the tree, starting at the root.
    ///
    /// The piece is recursively split by each internal node's cut
    /// hyperplane, descending into whichever sides receive a part; each
    /// leaf reached gains a cut covering the piece's hyperplane within that
    /// leaf's region. A piece coincident with a node's cut hyperplane
    /// contributes nothing there (the boundary is already represented).
    pub fn insert(&mut self, sub: C) {
        self.insert_with(sub, |_, _| {});
    }

    /// Like [`insert`](Self::insert), invoking the initializer with the
    /// attributes of the new minus and plus leaves of every node that
    /// receives a cut.
    pub fn insert_with(&mut self, sub: C, mut init: impl FnMut(&mut A, &mut A)) {
        let span = sub.hyperplane().span();
        self.insert_recursive(self.root, sub, Some(span), &mut init);
    }

    fn insert_recursive(
        &mut self,
        node: NodeId,
        insert: C,
        trimmed: Option<C>,
        init: &mut dyn FnMut(&mut A, &mut A),
    ) {
        let Some((minus_child, plus_child)) = self.children(node) else {
            // leaf: the accumulated trim is the piece of the insert
            // hyperplane lying in this node's region
            self.set_node_cut(node, trimmed, init);
            return;
        };

        let hyperplane = self.node_cut(node).hyperplane();
        let (insert_minus, insert_plus) = insert.split(hyperplane).into_parts();

        if insert_minus.is_none() && insert_plus.is_none() {
            // the piece lies on this node's cut hyperplane
            return;
        }

        let (trimmed_minus, trimmed_plus) = match trimmed {
            Some(trimmed) => trimmed.split(hyperplane).into_parts(),
            None => (None, None),
        };

        if let Some(piece) = insert_minus {
            self.insert_recursive(minus_child, piece, trimmed_minus, init);
        }
        if let Some(piece) = insert_plus {
            self.insert_recursive(plus_child, piece, trimmed_plus, init);
        }
    }

    /// Replaces this tree's contents with a structural copy of `src`,
    /// including node attributes. The copies are independent: mutating one
    /// tree never affects the other.
    pub fn copy_from(&mut self, src: &Self) {
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(NodeData::leaf(A::default()));
        self.root = NodeId(0);
        self.copy_subtree_from(src, src.root, self.root);
        self.make_root(self.root);
        self.invalidate();
    }

    /// Builds a new tree containing the subtree of the given node together
    /// with copies of its ancestor cuts, so the extracted cell keeps its
    /// exact shape. The off-path child at each ancestor level becomes a
    /// fresh leaf with a default attribute: information outside the
    /// extracted node's region is discarded.
    pub fn extract(&self, node: NodeId) -> Self {
        let mut dst = Self::new();
        let extracted = dst.import_subtree(self, node);
        let new_root = self.extract_parent_path(&mut dst, node, extracted);
        dst.set_root(new_root);
        dst
    }

    /// Splits the whole tree by a hyperplane into the trees for its minus
    /// and plus sides. Pass `None` for a side that is not needed.
    ///
    /// # Panics
    /// Panics if the geometry produces inconsistent splits (a cut that
    /// crosses the splitter's hyperplane while the splitter does not cross
    /// the cut's region); this cannot happen with well-formed backends.
    pub fn split_into_trees(
        &self,
        splitter: &C::Hyperplane,
        minus: Option<&mut Self>,
        plus: Option<&mut Self>,
    ) {
        let mut temp = Self::new();
        let split_node = self.split_subtree_into(&mut temp, self.root, splitter.span());
        temp.set_root(split_node);

        let (minus_half, plus_half) = temp
            .children(split_node)
            .expect("split always produces an internal node");

        if let Some(dst) = plus {
            *dst = temp.extract(plus_half);
        }
        if let Some(dst) = minus {
            *dst = temp.extract(minus_half);
        }
    }

    /// Splits the whole tree by a hyperplane, returning both halves.
    pub fn split(&self, splitter: &C::Hyperplane) -> Split<Self> {
        let mut minus = Self::new();
        let mut plus = Self::new();
        self.split_into_trees(splitter, Some(&mut minus), Some(&mut plus));
        Split::new(Some(minus), Some(plus))
    }

    /// Applies a point transform to every cut in the tree, in post-order.
    /// If the transform reverses spatial orientation, the minus and plus
    /// children of every internal node swap roles so the tree keeps
    /// describing the image of the original partition.
    pub fn transform<T>(&mut self, t: &T)
    where
        T: Transform<PointOf<C>>,
    {
        let swap = !t.preserves_orientation();
        self.transform_recursive(self.root, t, swap);
        self.invalidate();
    }

    fn transform_recursive<T>(&mut self, node: NodeId, t: &T, swap: bool)
    where
        T: Transform<PointOf<C>>,
    {
        if let Some((minus, plus)) = self.children(node) {
            self.transform_recursive(minus, t, swap);
            self.transform_recursive(plus, t, swap);

            let transformed = self.node_cut(node).transform(t);
            if swap {
                self.set_subtree(node, Some(transformed), Some(plus), Some(minus));
            } else {
                self.set_subtree(node, Some(transformed), Some(minus), Some(plus));
            }
        }
    }

    /// Deep-copies a subtree of `src` into this tree, returning the id of
    /// the copy. The copy is detached; callers install it with
    /// [`set_subtree`](Self::set_subtree) or [`set_root`](Self::set_root).
    pub(crate) fn import_subtree(&mut self, src: &Self, src_node: NodeId) -> NodeId {
        let dst = self.create_node(A::default());
        self.copy_subtree_from(src, src_node, dst);
        dst
    }

    /// Recursively copies structure and attributes from a node of `src`
    /// onto `dst`, which must be a leaf of this tree.
    fn copy_subtree_from(&mut self, src: &Self, src_node: NodeId, dst: NodeId) {
        if let Some((src_minus, src_plus)) = src.children(src_node) {
            let cut = src.node_cut(src_node).clone();
            let minus = self.create_node(A::default());
            let plus = self.create_node(A::default());
            self.set_subtree(dst, Some(cut), Some(minus), Some(plus));
            self.copy_subtree_from(src, src_minus, minus);
            self.copy_subtree_from(src, src_plus, plus);
        }
        self.nodes[dst.0].attr = src.nodes[src_node.0].attr.clone();
    }

    /// Copies the ancestor chain of `src_node` (a node of `self`) into
    /// `dst`, hanging the already-copied `extracted` subtree on the side
    /// `src_node` occupies at each level. Off-path children become fresh
    /// default leaves. Returns the top of the chain.
    fn extract_parent_path(&self, dst: &mut Self, src_node: NodeId, extracted: NodeId) -> NodeId {
        let mut dst_parent = extracted;
        let mut src_child = src_node;

        while let Some(src_parent) = self.nodes[src_child.0].parent {
            let dst_child = dst_parent;
            dst_parent = dst.create_node(self.nodes[src_parent.0].attr.clone());

            let cut = self.node_cut(src_parent).clone();
            let sibling = dst.create_node(A::default());

            if self.nodes[src_parent.0].minus == Some(src_child) {
                dst.set_subtree(dst_parent, Some(cut), Some(dst_child), Some(sibling));
            } else {
                dst.set_subtree(dst_parent, Some(cut), Some(sibling), Some(dst_child));
            }

            src_child = src_parent;
        }

        dst_parent
    }

    /// Splits the subtree rooted at `src_node` (a node of `self`) by the
    /// partitioner, building the result in `dst`. The returned node has the
    /// partitioner as its cut and the two halves of the subtree as its
    /// children.
    fn split_subtree_into(&self, dst: &mut Self, src_node: NodeId, partitioner: C) -> NodeId {
        let Some((src_minus, src_plus)) = self.children(src_node) else {
            // leaf: both halves inherit the leaf's attribute unchanged
            let parent = dst.create_node(A::default());
            let minus = dst.create_node(self.nodes[src_node.0].attr.clone());
            let plus = dst.create_node(self.nodes[src_node.0].attr.clone());
            dst.set_subtree(parent, Some(partitioner), Some(minus), Some(plus));
            return parent;
        };

        let cut = self.node_cut(src_node);
        let partitioner_split = partitioner.split(cut.hyperplane());
        let cut_split = cut.split(partitioner.hyperplane());
        let attr = &self.nodes[src_node.0].attr;

        let (result_minus, result_plus) = match partitioner_split.location() {
            SplitLocation::Plus => {
                // the partitioner lies inside the plus child's region
                let split = self.split_subtree_into(dst, src_plus, partitioner.clone());
                let (half_minus, half_plus) = dst.take_children(split);

                if cut_split.location() == SplitLocation::Plus {
                    // node cut entirely on the partitioner's plus side
                    let plus_node = dst.create_node(attr.clone());
                    let imported = dst.import_subtree(self, src_minus);
                    dst.set_subtree(plus_node, Some(cut.clone()), Some(imported), Some(half_plus));
                    (half_minus, plus_node)
                } else {
                    let minus_node = dst.create_node(attr.clone());
                    let imported = dst.import_subtree(self, src_minus);
                    dst.set_subtree(
                        minus_node,
                        Some(cut.clone()),
                        Some(imported),
                        Some(half_minus),
                    );
                    (minus_node, half_plus)
                }
            }
            SplitLocation::Minus => {
                // the partitioner lies inside the minus child's region
                let split = self.split_subtree_into(dst, src_minus, partitioner.clone());
                let (half_minus, half_plus) = dst.take_children(split);

                if cut_split.location() == SplitLocation::Minus {
                    let minus_node = dst.create_node(attr.clone());
                    let imported = dst.import_subtree(self, src_plus);
                    dst.set_subtree(
                        minus_node,
                        Some(cut.clone()),
                        Some(half_minus),
                        Some(imported),
                    );
                    (minus_node, half_plus)
                } else {
                    let plus_node = dst.create_node(attr.clone());
                    let imported = dst.import_subtree(self, src_plus);
                    dst.set_subtree(plus_node, Some(cut.clone()), Some(half_plus), Some(imported));
                    (half_minus, plus_node)
                }
            }
            SplitLocation::Both => {
                // partitioner and node cut split each other: recurse into
                // both children with the matching partitioner halves, then
                // recombine under the two halves of the node cut
                let (part_minus, part_plus) = partitioner_split.into_parts();
                let minus_split = self.split_subtree_into(
                    dst,
                    src_minus,
                    part_minus.expect("both-side split has a minus part"),
                );
                let plus_split = self.split_subtree_into(
                    dst,
                    src_plus,
                    part_plus.expect("both-side split has a plus part"),
                );
                let (mm, mp) = dst.take_children(minus_split);
                let (pm, pp) = dst.take_children(plus_split);

                let (cut_minus, cut_plus) = cut_split.into_parts();
                let minus_node = dst.create_node(attr.clone());
                dst.set_subtree(
                    minus_node,
                    Some(cut_minus.expect("node cut crosses the partitioner")),
                    Some(mm),
                    Some(pm),
                );
                let plus_node = dst.create_node(attr.clone());
                dst.set_subtree(
                    plus_node,
                    Some(cut_plus.expect("node cut crosses the partitioner")),
                    Some(mp),
                    Some(pp),
                );
                (minus_node, plus_node)
            }
            SplitLocation::Neither => {
                // coincident hyperplanes: orientation decides which child
                // maps to which side
                let same = partitioner
                    .hyperplane()
                    .similar_orientation(cut.hyperplane());
                let (minus_src, plus_src) = if same {
                    (src_minus, src_plus)
                } else {
                    (src_plus, src_minus)
                };
                let minus = dst.import_subtree(self, minus_src);
                let plus = dst.import_subtree(self, plus_src);
                (minus, plus)
            }
        };

        let result = dst.create_node(A::default());
        dst.set_subtree(result, Some(partitioner), Some(result_minus), Some(result_plus));
        result
    }

    /// Detaches and returns the children of a node built by
    /// [`split_subtree_into`](Self::split_subtree_into), releasing the
    /// husk. The children are re-parented by the caller immediately.
    fn take_children(&mut self, node: NodeId) -> (NodeId, NodeId) {
        let data = &mut self.nodes[node.0];
        let minus = data.minus.take().expect("split node is internal");
        let plus = data.plus.take().expect("split node is internal");
        data.cut = None;
        self.release_node(node);
        (minus, plus)
    }

    /// Installs a cut (or clears it) on a node, discarding its previous
    /// subtree. A `Some` cut creates two fresh leaf children and hands
    /// their attributes to the initializer. Bumps the tree version.
    fn set_node_cut(&mut self, node: NodeId, cut: Option<C>, init: &mut dyn FnMut(&mut A, &mut A)) {
        if let Some((old_minus, old_plus)) = self.children(node) {
            self.release_subtree(old_minus);
            self.release_subtree(old_plus);
        }

        match cut {
            Some(cut) => {
                let minus = self.create_node(A::default());
                let plus = self.create_node(A::default());
                self.set_subtree(node, Some(cut), Some(minus), Some(plus));
                let (minus_attr, plus_attr) = self.attr_pair_mut(minus, plus);
                init(minus_attr, plus_attr);
            }
            None => self.set_subtree(node, None, None, None),
        }

        self.invalidate();
    }

    /// The sole low-level structural mutator: sets a node's cut and
    /// children together (all present or all absent), fixing up the
    /// children's parent links and depths. Performs no geometric
    /// validation and does not bump the version; callers do both.
    fn set_subtree(
        &mut self,
        node: NodeId,
        cut: Option<C>,
        minus: Option<NodeId>,
        plus: Option<NodeId>,
    ) {
        debug_assert_eq!(cut.is_some(), minus.is_some());
        debug_assert_eq!(cut.is_some(), plus.is_some());

        let depth = self.nodes[node.0].depth.get();
        let child_depth = if depth == UNKNOWN { UNKNOWN } else { depth + 1 };

        let data = &mut self.nodes[node.0];
        data.cut = cut;
        data.minus = minus;
        data.plus = plus;

        for child in [minus, plus].into_iter().flatten() {
            let child_data = &mut self.nodes[child.0];
            child_data.parent = Some(node);
            child_data.depth.set(child_depth);
        }
    }

    /// Makes a node the root of this tree, releasing the previous root's
    /// subtree. The previous structure must not be reachable from the new
    /// root. Bumps the tree version.
    fn set_root(&mut self, new_root: NodeId) {
        if self.root != new_root {
            self.release_subtree(self.root);
            self.root = new_root;
        }
        self.make_root(new_root);
        self.invalidate();
    }

    /// Detaches a node from its parent and resets its depth to 0.
    fn make_root(&mut self, node: NodeId) {
        let data = &mut self.nodes[node.0];
        data.parent = None;
        data.depth.set(0);
    }

    fn create_node(&mut self, attr: A) -> NodeId {
        let data = NodeData::leaf(attr);
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = data;
                id
            }
            None => {
                self.nodes.push(data);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Returns a single detached node's slot to the free list.
    fn release_node(&mut self, node: NodeId) {
        self.free.push(node);
    }

    /// Returns a whole detached subtree's slots to the free list.
    fn release_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some((minus, plus)) = self.children(id) {
                stack.push(minus);
                stack.push(plus);
            }
            self.free.push(id);
        }
    }

    /// Mutably borrows the attributes of two distinct nodes at once.
    fn attr_pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut A, &mut A) {
        debug_assert_ne!(a, b);
        if a.0 < b.0 {
            let (head, tail) = self.nodes.split_at_mut(b.0);
            (&mut head[a.0].attr, &mut tail[0].attr)
        } else {
            let (head, tail) = self.nodes.split_at_mut(a.0);
            (&mut tail[0].attr, &mut head[b.0].attr)
        }
    }

    fn invalidate(&mut self) {
        self.version = self.version.saturating_add(1);
    }
}

impl<C: SubHyperplane, A: Clone + Default> Default for BspTree<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SubHyperplane + fmt::Debug, A> BspTree<C, A> {
    /// Renders the tree structure as an indented multi-line string for
    /// debugging. With `Some(limit)`, subtrees below that depth are elided
    /// as `...`.
    pub fn tree_string(&self, max_depth: Option<usize>) -> String {
        let mut out = String::new();
        self.write_node(&mut out, self.root, "", 0, max_depth);
        out
    }

    fn write_node(
        &self,
        out: &mut String,
        node: NodeId,
        label: &str,
        depth: usize,
        max_depth: Option<usize>,
    ) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        match self.children(node) {
            None => {
                let _ = writeln!(out, "{label}Leaf");
            }
            Some((minus, plus)) => {
                let _ = writeln!(out, "{label}Node[cut= {:?}]", self.node_cut(node));
                if max_depth.is_some_and(|limit| depth >= limit) {
                    for _ in 0..=depth {
                        out.push_str("  ");
                    }
                    out.push_str("...\n");
                } else {
                    self.write_node(out, minus, "[-] ", depth + 1, max_depth);
                    self.write_node(out, plus, "[+] ", depth + 1, max_depth);
                }
            }
        }
    }
}
