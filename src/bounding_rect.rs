use crate::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis aligned minimal bounding rectangle.
///
/// A axis aligned minimal bounding rectangle is the smallest rectangle that completely surrounds
/// an object and is aligned along the two axis in the plane.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingRect {
    lower: Point2<f64>,
    upper: Point2<f64>,
}

impl Default for BoundingRect {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingRect {
    /// Creates an empty bounding rectangle.
    ///
    /// `lower` and `upper` are set to positive / negative infinity, this rectangle
    /// contains no point until [BoundingRect::add_point] is called.
    pub fn new() -> Self {
        BoundingRect {
            lower: Point2::new(f64::INFINITY, f64::INFINITY),
            upper: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Creates a bounding rectangle that contains exactly one point.
    pub fn from_point(point: Point2<f64>) -> Self {
        BoundingRect {
            lower: point,
            upper: point,
        }
    }

    /// Creates a bounding rectangle that contains two points.
    pub fn from_corners(corner1: Point2<f64>, corner2: Point2<f64>) -> Self {
        BoundingRect {
            lower: Point2::new(corner1.x.min(corner2.x), corner1.y.min(corner2.y)),
            upper: Point2::new(corner1.x.max(corner2.x), corner1.y.max(corner2.y)),
        }
    }

    /// Creates the smallest bounding rectangle containing all given points.
    pub fn from_points(points: impl IntoIterator<Item = Point2<f64>>) -> Self {
        let mut result = Self::new();
        for point in points {
            result.add_point(point);
        }
        result
    }

    /// Creates the bounding rectangle of a circle.
    pub fn from_circle(center: Point2<f64>, radius: f64) -> Self {
        BoundingRect {
            lower: Point2::new(center.x - radius, center.y - radius),
            upper: Point2::new(center.x + radius, center.y + radius),
        }
    }

    /// Returns the lower corner of the bounding rectangle.
    ///
    /// The lower corner has the smaller coordinates.
    pub fn lower(&self) -> Point2<f64> {
        self.lower
    }

    /// Returns the upper corner of the bounding rectangle.
    ///
    /// The upper corner has the larger coordinates.
    pub fn upper(&self) -> Point2<f64> {
        self.upper
    }

    /// Returns `true` if no point has been added to this rectangle.
    pub fn is_empty(&self) -> bool {
        self.lower.x > self.upper.x || self.lower.y > self.upper.y
    }

    /// Returns the rectangle's width.
    pub fn width(&self) -> f64 {
        self.upper.x - self.lower.x
    }

    /// Returns the rectangle's height.
    pub fn height(&self) -> f64 {
        self.upper.y - self.lower.y
    }

    /// Checks if a point is contained within the bounding rectangle.
    ///
    /// A point lying exactly on the bounding rectangle's border is also contained.
    #[inline]
    pub fn contains_point(&self, point: Point2<f64>) -> bool {
        self.lower.all_component_wise(point, |l, r| l <= r)
            && self.upper.all_component_wise(point, |l, r| l >= r)
    }

    /// Checks if another bounding rectangle is completely contained within this rectangle.
    #[inline]
    pub fn contains_rect(&self, rect: &BoundingRect) -> bool {
        self.lower.all_component_wise(rect.lower, |l, r| l <= r)
            && self.upper.all_component_wise(rect.upper, |l, r| l >= r)
    }

    /// Returns `true` if both rectangles share at least one point.
    #[inline]
    pub fn intersects(&self, other: &BoundingRect) -> bool {
        self.lower.x <= other.upper.x
            && other.lower.x <= self.upper.x
            && self.lower.y <= other.upper.y
            && other.lower.y <= self.upper.y
    }

    /// Enlarges this bounding rectangle to contain a point.
    #[inline]
    pub fn add_point(&mut self, point: Point2<f64>) {
        self.lower = Point2::new(self.lower.x.min(point.x), self.lower.y.min(point.y));
        self.upper = Point2::new(self.upper.x.max(point.x), self.upper.y.max(point.y));
    }

    /// Enlarges this bounding rectangle to contain a rectangle.
    #[inline]
    pub fn add_rect(&mut self, rect: &BoundingRect) {
        self.add_point(rect.lower);
        self.add_point(rect.upper);
    }

    /// Returns the rectangle's center.
    pub fn center(&self) -> Point2<f64> {
        self.lower.add(self.upper.sub(self.lower).mul(0.5))
    }
}
