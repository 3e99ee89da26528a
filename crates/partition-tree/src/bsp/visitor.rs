//! Visitor pattern for BSP tree traversal.
//!
//! Visitors allow custom processing of nodes during tree traversal without
//! coupling traversal logic to specific use cases. Unlike the plain node
//! iterator, a visitor chooses, per internal node, in which order the node
//! and its two subtrees are visited, and can stop the whole traversal
//! early.

use crate::bsp::node::{Node, NodeId};
use crate::hyperplane::SubHyperplane;

/// The order in which an internal node and its two subtrees are visited.
///
/// All six permutations of {minus subtree, node, plus subtree} are
/// available; the traversal interprets the chosen variant, so no
/// per-order visitor subtypes are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOrder {
    /// Minus subtree, then the node, then the plus subtree.
    MinusNodePlus,
    /// Plus subtree, then the node, then the minus subtree.
    PlusNodeMinus,
    /// Minus subtree, then the plus subtree, then the node.
    MinusPlusNode,
    /// Plus subtree, then the minus subtree, then the node.
    PlusMinusNode,
    /// The node, then the minus subtree, then the plus subtree.
    NodeMinusPlus,
    /// The node, then the plus subtree, then the minus subtree.
    NodePlusMinus,
}

/// One element of a visit order.
#[derive(Debug, Clone, Copy)]
pub(crate) enum VisitStep {
    Minus,
    Node,
    Plus,
}

impl VisitOrder {
    /// Expands the order into its three steps for the traversal loop.
    pub(crate) fn steps(self) -> [VisitStep; 3] {
        use VisitStep::{Minus, Node, Plus};
        match self {
            Self::MinusNodePlus => [Minus, Node, Plus],
            Self::PlusNodeMinus => [Plus, Node, Minus],
            Self::MinusPlusNode => [Minus, Plus, Node],
            Self::PlusMinusNode => [Plus, Minus, Node],
            Self::NodeMinusPlus => [Node, Minus, Plus],
            Self::NodePlusMinus => [Node, Plus, Minus],
        }
    }
}

/// Signal returned from each node visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Keep traversing.
    Continue,
    /// Stop the entire traversal immediately; remaining siblings and
    /// ancestors are not visited.
    Terminate,
}

/// Visitor for processing nodes during BSP tree traversal.
///
/// Leaves are visited unconditionally. For internal nodes,
/// [`visit_order`](Self::visit_order) is consulted first; returning `None`
/// skips the node and its whole subtree.
pub trait BspVisitor<C: SubHyperplane, A = ()> {
    /// Called for each visited node. Returning
    /// [`VisitResult::Terminate`] unwinds the traversal.
    fn visit(&mut self, node: Node<'_, C, A>) -> VisitResult;

    /// Chooses the visit order for an internal node, or `None` to skip the
    /// node and its subtree entirely. Defaults to in-order
    /// ([`VisitOrder::MinusNodePlus`]).
    fn visit_order(&mut self, node: Node<'_, C, A>) -> Option<VisitOrder> {
        let _ = node;
        Some(VisitOrder::MinusNodePlus)
    }
}

/// A visitor that records the ids of visited nodes, in visit order.
#[derive(Debug)]
pub struct CollectingVisitor {
    order: VisitOrder,
    ids: Vec<NodeId>,
}

impl CollectingVisitor {
    /// Creates a collector visiting in the default in-order.
    pub fn new() -> Self {
        Self::with_order(VisitOrder::MinusNodePlus)
    }

    /// Creates a collector visiting in the given order at every node.
    pub fn with_order(order: VisitOrder) -> Self {
        Self {
            order,
            ids: Vec::new(),
        }
    }

    /// Returns the recorded node ids.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Consumes the collector, returning the recorded node ids.
    pub fn into_ids(self) -> Vec<NodeId> {
        self.ids
    }
}

impl Default for CollectingVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SubHyperplane, A> BspVisitor<C, A> for CollectingVisitor {
    fn visit(&mut self, node: Node<'_, C, A>) -> VisitResult {
        self.ids.push(node.id());
        VisitResult::Continue
    }

    fn visit_order(&mut self, _node: Node<'_, C, A>) -> Option<VisitOrder> {
        Some(self.order)
    }
}

/// A visitor that calls a closure for each visited node, using the default
/// visit order.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<C, A, F> BspVisitor<C, A> for FnVisitor<F>
where
    C: SubHyperplane,
    F: FnMut(Node<'_, C, A>) -> VisitResult,
{
    fn visit(&mut self, node: Node<'_, C, A>) -> VisitResult {
        (self.func)(node)
    }
}
