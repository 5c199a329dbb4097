//! Data models for the region editor.

mod geometry;
mod shape;

pub use geometry::{Point, Rectangle, polygon_contains};
pub use shape::{Geometry, RegionMeta, Shape, shapes_from_json, shapes_to_json};
