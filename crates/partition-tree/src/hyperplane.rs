//! Geometry seam: the capability traits the tree engine is generic over.
//!
//! The engine never touches concrete coordinates. Everything it needs from a
//! geometry backend is expressed here: classifying a point against an
//! oriented hyperplane, splitting a convex hyperplane subset by another
//! hyperplane, comparing orientations, and applying point transforms. A
//! backend for a new space (or dimension) plugs in by implementing these
//! three traits; see [`crate::line2d`] for the Euclidean 2D reference
//! implementation.

use crate::split::{Side, Split};

/// The hyperplane type of a sub-hyperplane.
pub type HyperplaneOf<C> = <C as SubHyperplane>::Hyperplane;

/// The point type of a sub-hyperplane's space.
pub type PointOf<C> = <<C as SubHyperplane>::Hyperplane as Hyperplane>::Point;

/// An oriented (n-1)-dimensional hyperplane dividing its space into a plus
/// side and a minus side.
pub trait Hyperplane: Clone {
    /// A location in the space this hyperplane divides.
    type Point;

    /// The convex-subset type cut pieces of this hyperplane are made of.
    type SubHyperplane: SubHyperplane<Hyperplane = Self>;

    /// Classifies which side of the hyperplane a point lies on.
    fn classify(&self, point: &Self::Point) -> Side;

    /// Returns `true` if the point lies on the hyperplane.
    fn contains(&self, point: &Self::Point) -> bool {
        self.classify(point) == Side::On
    }

    /// Returns `true` if `other` divides space the same way round as `self`:
    /// parallel (or coincident) with the plus sides facing the same
    /// direction.
    fn similar_orientation(&self, other: &Self) -> bool;

    /// Returns the subset covering this entire hyperplane.
    fn span(&self) -> Self::SubHyperplane;
}

/// A convex subset of a hyperplane, bounded or unbounded.
///
/// These are the pieces a BSP tree stores as node cuts. Implementations must
/// be immutable values; the tree clones them freely when copying structure.
pub trait SubHyperplane: Clone + Sized {
    /// The hyperplane type this subset lies on.
    type Hyperplane: Hyperplane<SubHyperplane = Self>;

    /// Returns the hyperplane this subset lies on.
    fn hyperplane(&self) -> &Self::Hyperplane;

    /// Returns `true` if the subset contains no points.
    fn is_empty(&self) -> bool;

    /// Splits this subset by a hyperplane.
    ///
    /// Parts that would be empty are omitted from the result; a subset lying
    /// on the splitter itself produces a [`crate::SplitLocation::Neither`]
    /// result with no parts at all.
    fn split(&self, splitter: &Self::Hyperplane) -> Split<Self>;

    /// Returns this subset with its hyperplane orientation reversed (plus
    /// and minus sides exchanged); the point set is unchanged.
    fn reverse(&self) -> Self;

    /// Returns the image of this subset under a point transform.
    ///
    /// The orientation of the result follows the geometry's own direction
    /// convention, not the image of the original plus side; callers that
    /// apply orientation-reversing transforms are expected to compensate
    /// (the tree does so by swapping children).
    fn transform<T>(&self, t: &T) -> Self
    where
        T: Transform<<Self::Hyperplane as Hyperplane>::Point>;
}

/// An invertible point transform (affine map, reflection, ...).
pub trait Transform<P> {
    /// Maps a point to its image.
    fn apply(&self, point: &P) -> P;

    /// Returns `true` if the transform preserves spatial orientation
    /// (handedness). Reflections and negative-determinant maps return
    /// `false`.
    fn preserves_orientation(&self) -> bool;
}
