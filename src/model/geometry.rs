//! Core geometry types in image coordinates.

use serde::{Deserialize, Serialize, Serializer};

/// Largest magnitude at which every whole f64 is an exact integer (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Write whole-number coordinates as JSON integers, as browsers do, so
/// integer data from other clients is saved back in the same form.
fn serialize_coord<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    #[serde(serialize_with = "serialize_coord")]
    pub x: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Multiply both coordinates by `factor`.
    pub fn scaled(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

/// An axis-aligned rectangle anchored at `(x, y)`.
///
/// Width and height keep the sign of the drag that produced them, so a box
/// drawn up-left has negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    #[serde(serialize_with = "serialize_coord")]
    pub x: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub y: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub width: f64,
    #[serde(serialize_with = "serialize_coord")]
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning from `anchor` to `corner`, without normalizing.
    pub fn from_anchor(anchor: Point, corner: Point) -> Self {
        Self::new(anchor.x, anchor.y, corner.x - anchor.x, corner.y - anchor.y)
    }

    /// The anchor corner.
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Move the corner opposite the anchor.
    pub fn with_corner(&self, corner: Point) -> Self {
        Self::from_anchor(self.anchor(), corner)
    }

    /// Check if a point lies inside, whichever direction the box was drawn in.
    pub fn contains(&self, point: &Point) -> bool {
        let (min_x, max_x) = ordered(self.x, self.x + self.width);
        let (min_y, max_y) = ordered(self.y, self.y + self.height);
        point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Point-in-polygon test using ray casting.
///
/// Fewer than three vertices never contain anything.
pub fn polygon_contains(vertices: &[Point], point: &Point) -> bool {
    if vertices.len() < crate::constants::MIN_POLYGON_VERTICES {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = &vertices[i];
        let vj = &vertices[j];
        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
