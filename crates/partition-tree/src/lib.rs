//! Generic Binary Space Partitioning (BSP) tree engine.
//!
//! A [`BspTree`] recursively partitions an abstract n-dimensional space
//! into convex cells by hyperplane cuts. The engine is dimension-agnostic:
//! all geometry flows through the [`Hyperplane`]/[`SubHyperplane`] traits,
//! and a Euclidean 2D backend ([`Line2D`], [`LineInterval`]) is included
//! both as the reference implementation and for everyday 2D use.
//!
//! ```ignore
//! use nalgebra::Point2;
//! use partition_tree::{BspTree, Hyperplane, Line2D, LineInterval};
//!
//! // carve the plane into four quadrants
//! let mut tree: BspTree<LineInterval> = BspTree::new();
//! tree.insert(Line2D::from_points(Point2::origin(), Point2::new(1.0, 0.0)).span());
//! tree.insert(Line2D::from_points(Point2::origin(), Point2::new(0.0, 1.0)).span());
//!
//! assert_eq!(tree.count(), 7);
//! let cell = tree.find(&Point2::new(2.0, 3.0));
//! assert!(cell.is_leaf());
//! ```

mod bsp;
mod hyperplane;
mod line2d;
mod split;

pub use bsp::{
    BspTree, BspVisitor, CollectingVisitor, CutRule, FnVisitor, Node, NodeId, Nodes, VisitOrder,
    VisitResult,
};
pub use hyperplane::{Hyperplane, HyperplaneOf, PointOf, SubHyperplane, Transform};
pub use line2d::{AffineTransform2D, Line2D, LineInterval, LINE_EPSILON};
pub use split::{Side, Split, SplitLocation};
