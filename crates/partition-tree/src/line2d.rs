//! Euclidean 2D geometry backend: oriented lines and line intervals.
//!
//! This is the reference implementation of the [`crate::hyperplane`] seam.
//! A [`Line2D`] plays the hyperplane role, a [`LineInterval`] (a possibly
//! unbounded abscissa interval on a line) plays the convex-subset role, and
//! [`AffineTransform2D`] supplies point transforms.

use nalgebra::{Matrix3, Point2, Rotation2, Translation2, Vector2};

use crate::hyperplane::{Hyperplane, SubHyperplane, Transform};
use crate::split::{Side, Split};

/// Default epsilon for line classification.
/// Points within this distance of a line are considered "on" the line.
pub const LINE_EPSILON: f32 = 1e-5;

/// An oriented line in 2D space, represented as `normal · point = offset`.
///
/// The plus side is the side the normal points into, which is to the left
/// of the line's travel [`direction`](Self::direction).
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    normal: Vector2<f32>,
    offset: f32,
}

impl Line2D {
    /// Creates a new line from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector2<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Line normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates a line from a point on the line and a normal vector.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point2<f32>, normal: Vector2<f32>) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Line normal cannot be zero");
        let unit_normal = normal / norm;
        let offset = unit_normal.dot(&point.coords);
        Self {
            normal: unit_normal,
            offset,
        }
    }

    /// Creates a line through two points, traveling from `a` toward `b`.
    /// The plus side is to the left of the direction of travel.
    ///
    /// # Panics
    /// Panics if the points coincide (or nearly so).
    pub fn from_points(a: Point2<f32>, b: Point2<f32>) -> Self {
        let direction = b - a;
        let normal = Vector2::new(-direction.y, direction.x);
        Self::from_point_and_normal(a, normal)
    }

    /// Returns the unit normal vector of the line.
    #[inline]
    pub fn normal(&self) -> Vector2<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the line along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns the unit direction of travel along the line (the normal
    /// rotated a quarter turn clockwise).
    #[inline]
    pub fn direction(&self) -> Vector2<f32> {
        Vector2::new(self.normal.y, -self.normal.x)
    }

    /// Computes the signed distance from a point to the line.
    /// - Positive: point is on the plus side (same side as normal)
    /// - Negative: point is on the minus side
    /// - Zero: point is on the line
    #[inline]
    pub fn signed_distance(&self, point: Point2<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the line a point lies on.
    /// Uses the default `LINE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: Point2<f32>) -> Side {
        self.classify_point_with_epsilon(point, LINE_EPSILON)
    }

    /// Classifies which side of the line a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point2<f32>, epsilon: f32) -> Side {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            Side::Plus
        } else if dist < -epsilon {
            Side::Minus
        } else {
            Side::On
        }
    }

    /// Returns the position of a point along the line's direction of travel.
    #[inline]
    pub fn abscissa(&self, point: Point2<f32>) -> f32 {
        self.direction().dot(&point.coords)
    }

    /// Returns the point on the line at the given abscissa.
    #[inline]
    pub fn point_at(&self, abscissa: f32) -> Point2<f32> {
        Point2::from(self.normal * self.offset + self.direction() * abscissa)
    }

    /// Projects a point onto the line (finds the closest point on the line).
    #[inline]
    pub fn project_point(&self, point: Point2<f32>) -> Point2<f32> {
        point - self.normal * self.signed_distance(point)
    }

    /// Returns a new line with the normal flipped (plus and minus sides
    /// exchanged). The direction of travel reverses as well.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }
}

impl Hyperplane for Line2D {
    type Point = Point2<f32>;
    type SubHyperplane = LineInterval;

    fn classify(&self, point: &Point2<f32>) -> Side {
        self.classify_point(*point)
    }

    fn similar_orientation(&self, other: &Self) -> bool {
        self.normal.dot(&other.normal) > 0.0
    }

    fn span(&self) -> LineInterval {
        LineInterval::span(self.clone())
    }
}

/// A convex subset of a [`Line2D`]: the points with abscissa in `[lo, hi]`.
///
/// Either bound may be infinite, so an interval can represent a segment, a
/// ray, or the whole line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInterval {
    line: Line2D,
    lo: f32,
    hi: f32,
}

impl LineInterval {
    /// Creates the interval covering the entire line.
    pub fn span(line: Line2D) -> Self {
        Self {
            line,
            lo: f32::NEG_INFINITY,
            hi: f32::INFINITY,
        }
    }

    /// Creates an interval on a line between two abscissas.
    ///
    /// # Panics (debug builds only)
    /// Panics if `lo >= hi`.
    pub fn interval(line: Line2D, lo: f32, hi: f32) -> Self {
        debug_assert!(lo < hi, "Interval bounds must be increasing");
        Self { line, lo, hi }
    }

    /// Creates the segment between two points, oriented from `a` toward `b`.
    ///
    /// # Panics
    /// Panics if the points coincide (or nearly so).
    pub fn segment(a: Point2<f32>, b: Point2<f32>) -> Self {
        let line = Line2D::from_points(a, b);
        let lo = line.abscissa(a);
        let hi = line.abscissa(b);
        Self { line, lo, hi }
    }

    /// Returns the line this interval lies on.
    #[inline]
    pub fn line(&self) -> &Line2D {
        &self.line
    }

    /// Returns the lower abscissa bound (possibly `-inf`).
    #[inline]
    pub fn lo(&self) -> f32 {
        self.lo
    }

    /// Returns the upper abscissa bound (possibly `+inf`).
    #[inline]
    pub fn hi(&self) -> f32 {
        self.hi
    }

    /// Returns `true` if both bounds are finite.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }
}

impl SubHyperplane for LineInterval {
    type Hyperplane = Line2D;

    fn hyperplane(&self) -> &Line2D {
        &self.line
    }

    fn is_empty(&self) -> bool {
        self.lo >= self.hi
    }

    fn split(&self, splitter: &Line2D) -> Split<Self> {
        let direction = self.line.direction();
        let denom = splitter.normal().dot(&direction);
        let origin = self.line.point_at(0.0);

        if denom.abs() < LINE_EPSILON {
            // parallel lines: every point of the interval is on the same side
            return match splitter.classify_point(origin) {
                Side::Plus => Split::new(None, Some(self.clone())),
                Side::Minus => Split::new(Some(self.clone()), None),
                Side::On => Split::new(None, None),
            };
        }

        // signed distance along the interval is denom * (s - crossing)
        let crossing = -splitter.signed_distance(origin) / denom;

        if crossing <= self.lo {
            // entire interval on the far side of the crossing
            if denom > 0.0 {
                Split::new(None, Some(self.clone()))
            } else {
                Split::new(Some(self.clone()), None)
            }
        } else if crossing >= self.hi {
            if denom > 0.0 {
                Split::new(Some(self.clone()), None)
            } else {
                Split::new(None, Some(self.clone()))
            }
        } else {
            let lower = Self {
                line: self.line.clone(),
                lo: self.lo,
                hi: crossing,
            };
            let upper = Self {
                line: self.line.clone(),
                lo: crossing,
                hi: self.hi,
            };
            if denom > 0.0 {
                Split::new(Some(lower), Some(upper))
            } else {
                Split::new(Some(upper), Some(lower))
            }
        }
    }

    fn reverse(&self) -> Self {
        // flipping the line negates abscissas, so the bounds swap and negate
        Self {
            line: self.line.reversed(),
            lo: -self.hi,
            hi: -self.lo,
        }
    }

    fn transform<T>(&self, t: &T) -> Self
    where
        T: Transform<Point2<f32>>,
    {
        let q0 = t.apply(&self.line.point_at(0.0));
        let q1 = t.apply(&self.line.point_at(1.0));
        let line = Line2D::from_points(q0, q1);

        // abscissas map affinely; the scale is positive because the new
        // direction follows q0 -> q1
        let a0 = line.abscissa(q0);
        let scale = line.abscissa(q1) - a0;
        let map = |s: f32| if s.is_infinite() { s } else { a0 + scale * s };

        Self {
            line,
            lo: map(self.lo),
            hi: map(self.hi),
        }
    }
}

/// An affine transform of the 2D plane in homogeneous coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform2D {
    matrix: Matrix3<f32>,
}

impl AffineTransform2D {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// A translation by the given vector.
    pub fn translation(v: Vector2<f32>) -> Self {
        Self {
            matrix: Translation2::new(v.x, v.y).to_homogeneous(),
        }
    }

    /// A counterclockwise rotation about the origin by `angle` radians.
    pub fn rotation(angle: f32) -> Self {
        Self {
            matrix: Rotation2::new(angle).to_homogeneous(),
        }
    }

    /// A scaling about the origin. Negative factors produce reflections.
    pub fn scaling(x: f32, y: f32) -> Self {
        Self {
            matrix: Matrix3::new(x, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, 1.0),
        }
    }

    /// Returns the transform applying `self` first, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    /// Returns the underlying homogeneous matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.matrix
    }
}

impl Transform<Point2<f32>> for AffineTransform2D {
    fn apply(&self, point: &Point2<f32>) -> Point2<f32> {
        self.matrix.transform_point(point)
    }

    fn preserves_orientation(&self) -> bool {
        let m = &self.matrix;
        m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)] > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::SplitLocation;

    fn x_axis() -> Line2D {
        Line2D::from_points(Point2::origin(), Point2::new(1.0, 0.0))
    }

    fn y_axis() -> Line2D {
        Line2D::from_points(Point2::origin(), Point2::new(0.0, 1.0))
    }

    #[test]
    fn from_points_orientation() {
        // traveling along +x, the plus side is the left side: y > 0
        let line = x_axis();
        assert_eq!(line.classify_point(Point2::new(0.0, 1.0)), Side::Plus);
        assert_eq!(line.classify_point(Point2::new(0.0, -1.0)), Side::Minus);
        assert_eq!(line.classify_point(Point2::new(5.0, 0.0)), Side::On);
    }

    #[test]
    fn new_normalizes() {
        let line = Line2D::new(Vector2::new(0.0, 2.0), 4.0);
        assert!((line.normal().norm() - 1.0).abs() < 1e-6);
        assert!((line.offset() - 2.0).abs() < 1e-6);
        assert_eq!(line.classify_point(Point2::new(3.0, 2.0)), Side::On);
    }

    #[test]
    fn abscissa_point_round_trip() {
        let line = Line2D::from_points(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0));
        let point = line.point_at(2.5);
        assert!((point.x - 2.5).abs() < 1e-6);
        assert!((point.y - 1.0).abs() < 1e-6);
        assert!((line.abscissa(point) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn similar_orientation_checks_normals() {
        let line = x_axis();
        assert!(line.similar_orientation(&line.clone()));
        assert!(!line.similar_orientation(&line.reversed()));

        // a parallel line offset upward still faces the same way
        let parallel = Line2D::from_points(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0));
        assert!(line.similar_orientation(&parallel));
    }

    #[test]
    fn span_split_crossing() {
        // the y-axis travels +y with plus side x < 0
        let span = x_axis().span();
        let split = span.split(&y_axis());
        assert_eq!(split.location(), SplitLocation::Both);

        // x > 0 is the minus side of the y-axis
        let minus = split.minus().unwrap();
        assert!((minus.lo() - 0.0).abs() < 1e-6);
        assert_eq!(minus.hi(), f32::INFINITY);

        let plus = split.plus().unwrap();
        assert_eq!(plus.lo(), f32::NEG_INFINITY);
        assert!((plus.hi() - 0.0).abs() < 1e-6);
    }

    #[test]
    fn span_split_parallel() {
        let span = x_axis().span();
        let above = Line2D::from_points(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0));
        let split = span.split(&above);
        // the x-axis lies below the splitter: entirely on the minus side
        assert_eq!(split.location(), SplitLocation::Minus);
    }

    #[test]
    fn span_split_coincident() {
        let span = x_axis().span();
        assert_eq!(span.split(&x_axis()).location(), SplitLocation::Neither);
        assert_eq!(
            span.split(&x_axis().reversed()).location(),
            SplitLocation::Neither
        );
    }

    #[test]
    fn segment_split() {
        let segment = LineInterval::segment(Point2::new(0.0, -1.0), Point2::new(0.0, 1.0));
        let split = segment.split(&x_axis());
        assert_eq!(split.location(), SplitLocation::Both);

        let minus = split.minus().unwrap();
        assert!((minus.lo() - -1.0).abs() < 1e-6);
        assert!(minus.hi().abs() < 1e-6);
    }

    #[test]
    fn segment_split_one_sided() {
        let segment = LineInterval::segment(Point2::new(0.0, 1.0), Point2::new(0.0, 2.0));
        let split = segment.split(&x_axis());
        assert_eq!(split.location(), SplitLocation::Plus);
    }

    #[test]
    fn reverse_keeps_points() {
        let interval = LineInterval::interval(x_axis(), 2.0, 5.0);
        let reversed = interval.reverse();

        assert!((reversed.lo() - -5.0).abs() < 1e-6);
        assert!((reversed.hi() - -2.0).abs() < 1e-6);

        let point = reversed.line().point_at(-5.0);
        assert!((point.x - 5.0).abs() < 1e-5);
        assert!(point.y.abs() < 1e-5);
        assert!(!interval.line().similar_orientation(reversed.line()));
    }

    #[test]
    fn transform_translation_maps_abscissas() {
        let segment = LineInterval::segment(Point2::new(1.0, 0.0), Point2::new(2.0, 0.0));
        let moved = segment.transform(&AffineTransform2D::translation(Vector2::new(3.0, 0.0)));

        assert!((moved.lo() - 4.0).abs() < 1e-5);
        assert!((moved.hi() - 5.0).abs() < 1e-5);
        assert_eq!(moved.line().classify_point(Point2::new(0.0, 1.0)), Side::Plus);
    }

    #[test]
    fn transform_rotation() {
        let span = x_axis().span();
        let rotated = span.transform(&AffineTransform2D::rotation(std::f32::consts::FRAC_PI_2));

        // the x-axis rotates onto the y-axis; the old plus side (y > 0)
        // rotates onto x < 0, which is the new plus side
        assert_eq!(rotated.line().classify_point(Point2::new(-1.0, 0.0)), Side::Plus);
        assert_eq!(rotated.line().classify_point(Point2::new(1.0, 0.0)), Side::Minus);
    }

    #[test]
    fn reflection_reverses_orientation() {
        let reflection = AffineTransform2D::scaling(1.0, -1.0);
        assert!(!reflection.preserves_orientation());
        assert!(AffineTransform2D::rotation(1.0).preserves_orientation());
        assert!(
            AffineTransform2D::translation(Vector2::new(1.0, 2.0)).preserves_orientation()
        );

        // composing two reflections restores orientation
        let twice = reflection.then(&reflection);
        assert!(twice.preserves_orientation());
    }

    #[test]
    fn transform_composition_applies_in_order() {
        let transform = AffineTransform2D::rotation(std::f32::consts::FRAC_PI_2)
            .then(&AffineTransform2D::translation(Vector2::new(1.0, 0.0)));
        let image = transform.apply(&Point2::new(1.0, 0.0));
        assert!((image.x - 1.0).abs() < 1e-5);
        assert!((image.y - 1.0).abs() < 1e-5);
    }
}
