//! Stack-based depth-first node enumeration.
//!
//! A lighter-weight alternative to the visitor for walking every node of a
//! subtree when no ordering flexibility or early exit is needed. Nodes are
//! yielded in pre-order, minus subtree before plus subtree.

use crate::bsp::node::{Node, NodeId};
use crate::bsp::tree::BspTree;
use crate::hyperplane::SubHyperplane;

/// Iterator over the nodes of a subtree, pre-order, minus before plus.
///
/// Created by [`BspTree::nodes`] and [`BspTree::nodes_from`].
#[derive(Debug)]
pub struct Nodes<'a, C: SubHyperplane, A> {
    tree: &'a BspTree<C, A>,
    stack: Vec<NodeId>,
}

impl<'a, C: SubHyperplane, A> Nodes<'a, C, A> {
    pub(crate) fn new(tree: &'a BspTree<C, A>, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a, C: SubHyperplane, A> Iterator for Nodes<'a, C, A> {
    type Item = Node<'a, C, A>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        if let (Some(minus), Some(plus)) = (node.minus(), node.plus()) {
            // plus is pushed first so minus is popped (and yielded) first
            self.stack.push(plus.id());
            self.stack.push(minus.id());
        }
        Some(node)
    }
}

impl<'a, C: SubHyperplane, A> IntoIterator for &'a BspTree<C, A> {
    type Item = Node<'a, C, A>;
    type IntoIter = Nodes<'a, C, A>;

    fn into_iter(self) -> Nodes<'a, C, A> {
        self.nodes()
    }
}
