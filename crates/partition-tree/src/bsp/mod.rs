//! Binary Space Partitioning tree core.
//!
//! This module provides the generic BSP tree engine: a recursive convex
//! partition of an abstract space, where the hyperplane geometry is
//! supplied by the [`crate::hyperplane`] trait seam. The tree supports:
//!
//! - Carving cuts into the partition one node or one convex piece at a time
//! - Point lookup with configurable on-cut tie-breaking
//! - Copying, subtree extraction, and whole-tree splitting by a hyperplane
//! - Affine transformation of the whole partition
//! - Order-configurable visitor traversal and plain node iteration
//!
//! # Architecture
//!
//! - [`BspTree`]: the container; owns all nodes in a flat arena and a
//!   structural version counter
//! - [`Node`]: a borrowed node handle with lazily cached count/height/depth
//! - [`BspVisitor`]: visitor trait with six visit orders and early exit
//! - [`Nodes`]: stack-based pre-order node iterator

mod iter;
mod node;
mod tree;
mod visitor;

// Re-export main types
pub use iter::Nodes;
pub use node::{Node, NodeId};
pub use tree::{BspTree, CutRule};
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor, VisitOrder, VisitResult};
