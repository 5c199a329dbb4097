//! Region shapes and their JSON representation.
//!
//! The region endpoint stores a JSON array whose elements may be any of:
//! - a bare polygon: `[{"x": .., "y": ..}, ...]`
//! - a rectangle: `{"x": .., "y": .., "width": .., "height": ..}`
//! - a named region: `{"points": [...], "name": .., "color": .., "duration": ..}`
//!
//! Each element is read into a [`Shape`] and written back in the same form,
//! so saving right after loading reproduces the stored content.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rectangle, polygon_contains};
use crate::constants::MIN_POLYGON_VERTICES;

/// Shape geometry in image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Ordered vertices; edges connect consecutive points.
    Polygon(Vec<Point>),
    /// Axis-aligned box.
    Rectangle(Rectangle),
}

impl Geometry {
    /// Short name for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Polygon(_) => "polygon",
            Geometry::Rectangle(_) => "rectangle",
        }
    }
}

/// Metadata the storage service attaches to a named region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionMeta {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CSS color used for the outline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Minutes an event must persist in this region before alerting.
    /// Kept as raw JSON so whatever the service stored is written back as is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<serde_json::Value>,
}

impl RegionMeta {
    /// Duration in minutes, when it is a number.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.duration.as_ref().and_then(serde_json::Value::as_f64)
    }
}

/// A completed region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShapeWire", into = "ShapeWire")]
pub struct Shape {
    pub geometry: Geometry,
    /// Present only for polygons stored as named regions.
    pub meta: Option<RegionMeta>,
}

impl Shape {
    /// Bare polygon with no metadata.
    pub fn polygon(points: Vec<Point>) -> Self {
        Self {
            geometry: Geometry::Polygon(points),
            meta: None,
        }
    }

    /// Rectangle shape.
    pub fn rectangle(rect: Rectangle) -> Self {
        Self {
            geometry: Geometry::Rectangle(rect),
            meta: None,
        }
    }

    /// Polygon stored as a named region.
    pub fn region(points: Vec<Point>, meta: RegionMeta) -> Self {
        Self {
            geometry: Geometry::Polygon(points),
            meta: Some(meta),
        }
    }

    /// Polygon vertices, or `None` for rectangles.
    pub fn vertices(&self) -> Option<&[Point]> {
        match &self.geometry {
            Geometry::Polygon(points) => Some(points),
            Geometry::Rectangle(_) => None,
        }
    }

    /// Mutable polygon vertices, or `None` for rectangles.
    pub fn vertices_mut(&mut self) -> Option<&mut Vec<Point>> {
        match &mut self.geometry {
            Geometry::Polygon(points) => Some(points),
            Geometry::Rectangle(_) => None,
        }
    }

    /// Whether the polygon encloses an area (more than two vertices).
    /// Rectangles always do.
    pub fn is_closed(&self) -> bool {
        match &self.geometry {
            Geometry::Polygon(points) => points.len() >= MIN_POLYGON_VERTICES,
            Geometry::Rectangle(_) => true,
        }
    }

    /// Check if a point is inside this shape.
    pub fn contains(&self, point: &Point) -> bool {
        match &self.geometry {
            Geometry::Polygon(points) => polygon_contains(points, point),
            Geometry::Rectangle(rect) => rect.contains(point),
        }
    }

    /// Outline color override from region metadata.
    pub fn color(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.color.as_deref())
    }

    /// Region name, if any.
    pub fn name(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.name.as_deref())
    }
}

/// On-the-wire form of a single array element.
///
/// Variant order matters for untagged matching: an object with `points`
/// is a region, any other object must be a rectangle.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ShapeWire {
    Region {
        points: Vec<Point>,
        #[serde(flatten)]
        meta: RegionMeta,
    },
    Rectangle(Rectangle),
    Polygon(Vec<Point>),
}

impl From<ShapeWire> for Shape {
    fn from(wire: ShapeWire) -> Self {
        match wire {
            ShapeWire::Region { points, meta } => Shape::region(points, meta),
            ShapeWire::Rectangle(rect) => Shape::rectangle(rect),
            ShapeWire::Polygon(points) => Shape::polygon(points),
        }
    }
}

impl From<Shape> for ShapeWire {
    fn from(shape: Shape) -> Self {
        match (shape.geometry, shape.meta) {
            (Geometry::Polygon(points), Some(meta)) => ShapeWire::Region { points, meta },
            (Geometry::Polygon(points), None) => ShapeWire::Polygon(points),
            // Rectangles have no metadata slot on the wire
            (Geometry::Rectangle(rect), _) => ShapeWire::Rectangle(rect),
        }
    }
}

/// Parse a region array from JSON text.
pub fn shapes_from_json(json: &str) -> serde_json::Result<Vec<Shape>> {
    serde_json::from_str(json)
}

/// Serialize a region array to JSON text.
pub fn shapes_to_json(shapes: &[Shape]) -> serde_json::Result<String> {
    serde_json::to_string(shapes)
}
