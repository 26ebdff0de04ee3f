//! Points, transforms and the geometry of arcs and splines.

use std::ops::{Add, Mul, Sub};

/// A point or vector in device units.
///
/// The y axis points down the page.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Angle of the vector in radians, measured from the positive x axis.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// The point a fraction `t` of the way from this point to another.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x as f64, y as f64)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// An affine transform, in the convention of 2D canvas APIs.
///
/// A point (x, y) is mapped to (a x + c y + e, b x + d y + f).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Transform::IDENTITY
    }

    /// Applies the transform to a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Returns the transform that applies `self` and then `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            a: other.a * self.a + other.c * self.b,
            b: other.b * self.a + other.d * self.b,
            c: other.a * self.c + other.c * self.d,
            d: other.b * self.c + other.d * self.d,
            e: other.a * self.e + other.c * self.f + other.e,
            f: other.b * self.e + other.d * self.f + other.f,
        }
    }

    /// A rotation clockwise on the page, which is anticlockwise in the usual orientation.
    pub fn rotation(degrees: f64) -> Transform {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Transform {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            ..Transform::IDENTITY
        }
    }

    pub fn translation(p: Point) -> Transform {
        Transform {
            e: p.x,
            f: p.y,
            ..Transform::IDENTITY
        }
    }
}

/// The geometry of a `Da` arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arc {
    /// The arc degenerates to a straight line to this point.
    Line(Point),
    /// An anticlockwise arc about a centre, between two angles in radians.
    Arc {
        centre: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
}

/// Computes the geometry of an arc that starts at `start`.
///
/// The arc command gives the centre `c1` relative to the start point and the
/// end point `c2` relative to the centre. The given centre need not be
/// equidistant from the two end points, so it is moved along the chord
/// direction onto the perpendicular bisector of the chord.
///
/// ```
/// use ditroff_vector::geometry::{arc, Arc, Point};
/// // A semicircle from (0, 0) to (200, 0).
/// let Arc::Arc { centre, radius, .. } = arc(Point::ORIGIN, (100, 0), (100, 0)) else {
///     panic!("not an arc");
/// };
/// assert_eq!(centre, Point::new(100.0, 0.0));
/// assert_eq!(radius, 100.0);
/// ```
pub fn arc(start: Point, c1: (i32, i32), c2: (i32, i32)) -> Arc {
    let c1 = Point::from(c1);
    let chord = c1 + Point::from(c2);
    let n = chord.dot(chord);
    if n == 0.0 {
        return Arc::Line(start + chord);
    }
    let k = 0.5 - c1.dot(chord) / n;
    let centre = c1 + chord * k;
    Arc::Arc {
        centre: start + centre,
        radius: centre.length(),
        start: (Point::ORIGIN - centre).angle(),
        end: (chord - centre).angle(),
    }
}

/// A segment of a path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line(Point),
    Cubic(Point, Point, Point),
}

/// Approximates a `D~` spline with lines and cubic Bézier curves.
///
/// The control points are `start` followed by the cumulative sums of the offsets.
/// The curve is the uniform quadratic B-spline of the control points,
/// extended with straight lines to the first and last control points.
/// Each quadratic piece runs between the midpoints of two control point pairs
/// and is converted exactly to a cubic.
pub fn spline(start: Point, offsets: &[(i32, i32)]) -> Vec<Segment> {
    let mut points = vec![start];
    for offset in offsets {
        let last = points[points.len() - 1];
        points.push(last + Point::from(*offset));
    }
    let n = points.len();
    if n < 3 {
        return points[1..].iter().map(|p| Segment::Line(*p)).collect();
    }
    let mid = |i: usize| points[i].lerp(points[i + 1], 0.5);
    let mut segments = vec![Segment::Line(mid(0))];
    for i in 1..n - 1 {
        let (from, control, to) = (mid(i - 1), points[i], mid(i));
        segments.push(Segment::Cubic(
            from.lerp(control, 2.0 / 3.0),
            to.lerp(control, 2.0 / 3.0),
            to,
        ));
    }
    segments.push(Segment::Line(points[n - 1]));
    segments
}
