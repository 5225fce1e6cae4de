use num_traits::{Num, Signed};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A coordinate type that can be used as input for a triangulation.
///
/// All calculations are performed after converting the type into a `f64`.
/// This type should usually be either `f32` or `f64`.
pub trait DelaunayNum:
    Num + PartialOrd + Into<f64> + From<f32> + Copy + Signed + std::fmt::Debug
{
}

impl<T> DelaunayNum for T where
    T: Num + PartialOrd + Into<f64> + From<f32> + Copy + Signed + std::fmt::Debug
{
}

/// A two dimensional point.
///
/// This is the basic type used for defining positions.
#[derive(Debug, PartialEq, Eq, PartialOrd, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2<S> {
    /// The point's x coordinate
    pub x: S,
    /// The point's y coordinate
    pub y: S,
}

impl<S> Point2<S> {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: S, y: S) -> Self {
        Point2 { x, y }
    }
}

impl<S: DelaunayNum> Point2<S> {
    /// Returns the squared distance of this point and another point.
    #[inline]
    pub fn distance_2(&self, other: Self) -> S {
        self.sub(other).length2()
    }

    /// Converts this point into a `f64` point.
    pub fn to_f64(self) -> Point2<f64> {
        Point2::new(self.x.into(), self.y.into())
    }

    pub(crate) fn mul(&self, factor: S) -> Self {
        Point2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub(crate) fn add(&self, other: Self) -> Self {
        Point2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub(crate) fn length2(&self) -> S {
        self.x * self.x + self.y * self.y
    }

    pub(crate) fn sub(&self, other: Self) -> Self {
        Point2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub(crate) fn dot(&self, other: Self) -> S {
        self.x * other.x + self.y * other.y
    }

    pub(crate) fn all_component_wise(&self, other: Self, f: impl Fn(S, S) -> bool) -> bool {
        f(self.x, other.x) && f(self.y, other.y)
    }
}

impl<S: DelaunayNum> From<Point2<S>> for [S; 2] {
    #[inline]
    fn from(point: Point2<S>) -> Self {
        [point.x, point.y]
    }
}

impl<S: DelaunayNum> From<Point2<S>> for (S, S) {
    #[inline]
    fn from(point: Point2<S>) -> (S, S) {
        (point.x, point.y)
    }
}

impl<S: DelaunayNum> From<[S; 2]> for Point2<S> {
    #[inline]
    fn from(source: [S; 2]) -> Self {
        Self::new(source[0], source[1])
    }
}

impl<S: DelaunayNum> From<(S, S)> for Point2<S> {
    #[inline]
    fn from(source: (S, S)) -> Self {
        Self::new(source.0, source.1)
    }
}

/// An object with position.
///
/// Anything implementing this trait can be turned into a [Vertex](crate::Vertex).
pub trait HasPosition {
    /// The number type used by this coordinate type.
    type Scalar: DelaunayNum;

    /// Returns the position of this object.
    fn position(&self) -> Point2<Self::Scalar>;
}

impl<S: DelaunayNum> HasPosition for Point2<S> {
    type Scalar = S;

    fn position(&self) -> Point2<S> {
        *self
    }
}

#[cfg(test)]
mod test {
    use super::Point2;

    #[test]
    fn test_point_arithmetic() {
        let p1 = Point2::new(1.0f64, 2.0);
        let p2 = Point2::new(4.0, 6.0);
        assert_eq!(p1.distance_2(p2), 25.0);
        assert_eq!(p2.sub(p1), Point2::new(3.0, 4.0));
        assert_eq!(p1.add(p2), Point2::new(5.0, 8.0));
        assert_eq!(p1.mul(2.0), Point2::new(2.0, 4.0));
        assert_eq!(p1.dot(p2), 16.0);
    }

    #[test]
    fn test_conversions() {
        let p: Point2<f32> = [1.5f32, -2.0].into();
        assert_eq!(p.to_f64(), Point2::new(1.5f64, -2.0));
        let (x, y): (f32, f32) = p.into();
        assert_eq!((x, y), (1.5, -2.0));
    }
}
