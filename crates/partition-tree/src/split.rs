//! Classification and split-result types shared by the whole engine.

/// Which side of an oriented hyperplane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Point is on the minus side (negative side of the orientation).
    Minus,
    /// Point lies on the hyperplane (within the geometry's tolerance).
    On,
    /// Point is on the plus side (positive side of the orientation).
    Plus,
}

/// Where a convex piece ended up relative to a splitting hyperplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitLocation {
    /// The piece lies entirely on the minus side.
    Minus,
    /// The piece lies entirely on the plus side.
    Plus,
    /// The piece straddles the splitter and was divided in two.
    Both,
    /// The piece lies on the splitting hyperplane itself; neither side
    /// received anything.
    Neither,
}

/// Result of splitting a convex piece by a hyperplane.
///
/// Holds the (possibly absent) minus-side and plus-side parts. The
/// [`SplitLocation`] is derived from which parts are present, so a `Split`
/// can never disagree with its own location.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    minus: Option<T>,
    plus: Option<T>,
}

impl<T> Split<T> {
    /// Creates a split result from its two optional parts.
    pub fn new(minus: Option<T>, plus: Option<T>) -> Self {
        Self { minus, plus }
    }

    /// Returns the part on the minus side, if any.
    #[inline]
    pub fn minus(&self) -> Option<&T> {
        self.minus.as_ref()
    }

    /// Returns the part on the plus side, if any.
    #[inline]
    pub fn plus(&self) -> Option<&T> {
        self.plus.as_ref()
    }

    /// Consumes the split, returning `(minus, plus)`.
    #[inline]
    pub fn into_parts(self) -> (Option<T>, Option<T>) {
        (self.minus, self.plus)
    }

    /// Returns where the original piece ended up relative to the splitter.
    pub fn location(&self) -> SplitLocation {
        match (&self.minus, &self.plus) {
            (Some(_), Some(_)) => SplitLocation::Both,
            (Some(_), None) => SplitLocation::Minus,
            (None, Some(_)) => SplitLocation::Plus,
            (None, None) => SplitLocation::Neither,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_from_parts() {
        assert_eq!(Split::new(Some(1), Some(2)).location(), SplitLocation::Both);
        assert_eq!(Split::new(Some(1), None).location(), SplitLocation::Minus);
        assert_eq!(Split::<i32>::new(None, Some(2)).location(), SplitLocation::Plus);
        assert_eq!(Split::<i32>::new(None, None).location(), SplitLocation::Neither);
    }

    #[test]
    fn into_parts_round_trip() {
        let split = Split::new(Some("m"), Some("p"));
        assert_eq!(split.minus(), Some(&"m"));
        assert_eq!(split.plus(), Some(&"p"));
        assert_eq!(split.into_parts(), (Some("m"), Some("p")));
    }
}
