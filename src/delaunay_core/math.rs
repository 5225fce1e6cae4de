use crate::{BoundingRect, DelaunayNum, HasPosition, InsertionError, LineSideInfo, Point2};

/// The smallest allowed coordinate value greater than zero that can be triangulated.
/// This value is equal to 2<sup>-142</sup>.
///
/// The *absolute value* of any vertex coordinate must be either zero or greater
/// than or equal to this value.
/// This is a requirement for preventing floating point underflow when calculating exact
/// geometric predicates.
///
/// *See also [validate_coordinate], [validate_vertex], [MAX_ALLOWED_VALUE], [mitigate_underflow]*

// These numbers come from the paper of Jonathan Richard Shewchuk:
// "The four predicates implemented for this report will not overflow nor underflow if
// their inputs have exponents in the range -[142, 201] and IEEE-745 double precision
// arithmetic is used."
pub const MIN_ALLOWED_VALUE: f64 = 1.793662034335766e-43; // 1.0 * 2^-142

/// The largest allowed coordinate value that can be triangulated.
/// This value is equal to 2<sup>201</sup>.
///
/// Note that the super-triangle enclosing the input is larger than the input itself by
/// [TriangulationConfig::super_triangle_scale](crate::TriangulationConfig::super_triangle_scale).
///
/// *See also [validate_coordinate], [validate_vertex], [MIN_ALLOWED_VALUE]*
pub const MAX_ALLOWED_VALUE: f64 = 3.2138760885179806e60; // 1.0 * 2^201

/// Checks if a coordinate value is suitable for triangulation.
///
/// Will return an error if and only if
///  - The absolute value of the coordinate is too small (See [MIN_ALLOWED_VALUE])
///  - The absolute value of the coordinate is too large (See [MAX_ALLOWED_VALUE])
///  - The coordinate is NaN (not a number)
///
/// Passing in any non-finite floating point number (e.g. `f32::NEG_INFINITY`) will
/// result in `Err(InsertionError::TooLarge)`.
pub fn validate_coordinate<S: DelaunayNum>(value: S) -> Result<(), InsertionError> {
    let as_f64: f64 = value.into();
    if as_f64.is_nan() {
        Err(InsertionError::NAN)
    } else if as_f64.abs() < MIN_ALLOWED_VALUE && as_f64 != 0.0 {
        Err(InsertionError::TooSmall)
    } else if as_f64.abs() > MAX_ALLOWED_VALUE {
        Err(InsertionError::TooLarge)
    } else {
        Ok(())
    }
}

/// Checks if a vertex is suitable for triangulation.
///
/// A vertex is considered suitable if all of its coordinates are valid. See [validate_coordinate]
/// for more information.
pub fn validate_vertex<V: HasPosition>(vertex: &V) -> Result<(), InsertionError> {
    let position = vertex.position();
    validate_coordinate(position.x)?;
    validate_coordinate(position.y)?;
    Ok(())
}

/// Prevents underflow issues of a position by setting any coordinate that is too small to zero.
///
/// A vertex created with a position returned by this function will never be rejected with
/// [InsertionError::TooSmall].
/// Note that this method will _always_ round towards zero.
///
/// # Example
/// ```
/// use incremental_delaunay::{validate_vertex, InsertionError, Point2};
///
/// let invalid_position = Point2::new(1.0e-44, 42.0);
/// assert_eq!(validate_vertex(&invalid_position), Err(InsertionError::TooSmall));
///
/// let valid_position = incremental_delaunay::mitigate_underflow(invalid_position);
/// assert_eq!(valid_position, Point2::new(0.0, 42.0));
/// assert!(validate_vertex(&valid_position).is_ok());
/// ```
pub fn mitigate_underflow(position: Point2<f64>) -> Point2<f64> {
    Point2::new(
        mitigate_underflow_for_coordinate(position.x),
        mitigate_underflow_for_coordinate(position.y),
    )
}

fn mitigate_underflow_for_coordinate<S: DelaunayNum>(coordinate: S) -> S {
    if coordinate != S::zero() && coordinate.abs().into() < MIN_ALLOWED_VALUE {
        S::zero()
    } else {
        coordinate
    }
}

fn to_robust_coord(point: Point2<f64>) -> robust::Coord<f64> {
    robust::Coord {
        x: point.x,
        y: point.y,
    }
}

/// Returns `true` if `p` lies strictly inside the circumcircle of `v1`, `v2` and `v3`.
///
/// Uses an exact predicate. The vertices are expected to be ordered counterclockwise.
pub fn contained_in_circumference(
    v1: Point2<f64>,
    v2: Point2<f64>,
    v3: Point2<f64>,
    p: Point2<f64>,
) -> bool {
    let v1 = to_robust_coord(v1);
    let v2 = to_robust_coord(v2);
    let v3 = to_robust_coord(v3);
    let p = to_robust_coord(p);

    // incircle expects all vertices to be ordered CW for right handed systems.
    robust::incircle(v3, v2, v1, p) < 0.0
}

/// Directions from the center of the input towards the three corners of the super-triangle.
///
/// All directions have the same length. Circumcircle tests treat the corners as lying
/// infinitely far away along these directions, see [circumcircle_contains_with_corner] and
/// [circumcircle_contains_with_two_corners].
pub const SUPER_CORNER_DIRECTIONS: [Point2<f64>; 3] = [
    Point2::new(-4.0, -3.0),
    Point2::new(4.0, -3.0),
    Point2::new(0.0, 5.0),
];

/// Exact sign of the dot product `(to - from) * direction`.
fn dot_sign(from: Point2<f64>, to: Point2<f64>, direction: Point2<f64>) -> f64 {
    // Expanding the determinant along its last column yields the dot product
    let to = robust::Coord3D {
        x: to.x,
        y: to.y,
        z: 1.0,
    };
    let from = robust::Coord3D {
        x: from.x,
        y: from.y,
        z: 1.0,
    };
    let normal = robust::Coord3D {
        x: direction.y,
        y: -direction.x,
        z: 0.0,
    };
    let origin = robust::Coord3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    robust::orient3d(to, from, normal, origin)
}

/// Circumcircle test for the ccw triangle `from`, `to` and a super-triangle corner.
///
/// With the corner infinitely far away, the circumcircle degenerates into the open half plane
/// left of `from -> to` plus the open segment between `from` and `to`.
pub fn circumcircle_contains_with_corner(
    from: Point2<f64>,
    to: Point2<f64>,
    query_point: Point2<f64>,
) -> bool {
    let side = side_query(from, to, query_point);
    if side.is_on_line() {
        query_point != from
            && query_point != to
            && BoundingRect::from_corners(from, to).contains_point(query_point)
    } else {
        side.is_on_left_side()
    }
}

/// Circumcircle test for a triangle made of `vertex` and two super-triangle corners.
///
/// The circumcircle degenerates into the open half plane that lies beyond `vertex` as seen
/// from the super-triangle's center, facing the super edge between both corners.
pub fn circumcircle_contains_with_two_corners(
    vertex: Point2<f64>,
    corners: [usize; 2],
    query_point: Point2<f64>,
) -> bool {
    let [first, second] = corners.map(|corner| SUPER_CORNER_DIRECTIONS[corner]);
    dot_sign(vertex, query_point, first.add(second)) > 0.0
}

/// Returns `true` if the super corner `query_corner` lies inside the circumcircle of the ccw
/// triangle `from`, `to` and the super corner `corner`.
///
/// This is the case if `query_corner` lies further away from the edge `from -> to` than
/// `corner`. An edge parallel to the super edge between both corners leaves them cocircular.
pub fn corner_in_circumcircle(
    from: Point2<f64>,
    to: Point2<f64>,
    corner: usize,
    query_corner: usize,
) -> bool {
    let offset = SUPER_CORNER_DIRECTIONS[query_corner].sub(SUPER_CORNER_DIRECTIONS[corner]);
    // The left normal of (to - from) dotted with offset
    dot_sign(from, to, Point2::new(offset.y, -offset.x)) > 0.0
}

/// Exact orientation of `query_point` relative to the directed line `p1 -> p2`.
pub fn side_query(p1: Point2<f64>, p2: Point2<f64>, query_point: Point2<f64>) -> LineSideInfo {
    let p1 = to_robust_coord(p1);
    let p2 = to_robust_coord(p2);
    let query_point = to_robust_coord(query_point);

    let result = robust::orient2d(p1, p2, query_point);
    LineSideInfo::from_determinant(result)
}

/// Returns `true` if `query_point` lies inside the triangle or on its border.
///
/// The triangle's vertices must be ordered counterclockwise.
pub fn is_in_closed_triangle(vertices: [Point2<f64>; 3], query_point: Point2<f64>) -> bool {
    (0..3).all(|i| {
        side_query(vertices[i], vertices[(i + 1) % 3], query_point).is_on_left_side_or_on_line()
    })
}

/// Returns the circumcenter and the squared circumradius of a triangle.
///
/// Returns `None` if the triangle's vertices are collinear.
pub fn circumcenter(positions: [Point2<f64>; 3]) -> Option<(Point2<f64>, f64)> {
    let [v0, v1, v2] = positions;
    if side_query(v0, v1, v2).is_on_line() {
        return None;
    }
    let b = v1.sub(v0);
    let c = v2.sub(v0);

    let d = 2.0 * (b.x * c.y - c.x * b.y);
    let len_b = b.dot(b);
    let len_c = c.dot(c);
    let d_inv = 1.0 / d;

    let x = (len_b * c.y - len_c * b.y) * d_inv;
    let y = (-len_b * c.x + len_c * b.x) * d_inv;
    let result = Point2::new(x, y);
    Some((result.add(v0), x * x + y * y))
}

/// Unsigned area of a triangle.
pub fn triangle_area(positions: [Point2<f64>; 3]) -> f64 {
    let [v0, v1, v2] = positions;
    let b = v1.sub(v0);
    let c = v2.sub(v0);
    (b.x * c.y - b.y * c.x).abs() * 0.5
}
