//! Geometry value types shared by the encoders and the preview parser.

use serde::{Deserialize, Serialize};

/// A point in design or device space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinates rounded the way every dialect emits them.
    pub fn rounded(&self) -> (i64, i64) {
        (round_half_up(self.x), round_half_up(self.y))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Closed outline. The closing edge back to the first point is implicit.
pub type Polygon = Vec<Point>;

/// Polyline reconstructed from a command stream.
pub type Path = Vec<Point>;

/// Rounds to the nearest integer, ties toward positive infinity.
///
/// `f64::round` sends ties away from zero, which disagrees for negative
/// halves (`-2.5` must become `-2`).
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

/// Axis-aligned bounding box of all points, `None` when there are none.
pub fn bounds<'a, I>(points: I) -> Option<(Point, Point)>
where
    I: IntoIterator<Item = &'a Point>,
{
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((*p, *p)),
        Some((min, max)) => Some((
            Point::new(min.x.min(p.x), min.y.min(p.y)),
            Point::new(max.x.max(p.x), max.y.max(p.y)),
        )),
    })
}
