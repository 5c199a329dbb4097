//! In-memory region collection.
//!
//! Holds the completed shapes (insertion order is draw order), the polygon
//! currently being built, and the preview rectangle of an active drag.

use crate::constants::MIN_POLYGON_VERTICES;
use crate::error::{EditorError, Result};
use crate::model::{Point, Rectangle, Shape};

/// Which polygon a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexOwner {
    /// A completed shape, by collection index.
    Completed(usize),
    /// The in-progress polygon.
    InProgress,
}

/// Ordered shape collection plus in-progress state.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    in_progress: Vec<Point>,
    preview: Option<Rectangle>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed shapes in draw order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Vertices of the polygon being drawn.
    pub fn in_progress(&self) -> &[Point] {
        &self.in_progress
    }

    /// Rectangle being dragged out, if any.
    pub fn preview(&self) -> Option<&Rectangle> {
        self.preview.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.in_progress.is_empty() && self.preview.is_none()
    }

    /// Append a vertex to the in-progress polygon.
    pub fn add_vertex(&mut self, point: Point) {
        self.in_progress.push(point);
    }

    /// Commit the in-progress polygon.
    ///
    /// Fails without touching anything when the polygon has fewer than three
    /// vertices. On success the committed shape is an independent copy and
    /// the in-progress polygon is empty.
    pub fn complete_shape(&mut self) -> Result<()> {
        if self.in_progress.len() < MIN_POLYGON_VERTICES {
            return Err(EditorError::InsufficientVertices {
                count: self.in_progress.len(),
            });
        }
        let points = std::mem::take(&mut self.in_progress);
        self.shapes.push(Shape::polygon(points));
        Ok(())
    }

    /// Append a finished rectangle.
    pub fn commit_rectangle(&mut self, rect: Rectangle) {
        self.shapes.push(Shape::rectangle(rect));
    }

    /// Remove the most recently placed vertex.
    ///
    /// Prefers the in-progress polygon. Otherwise pops the last vertex of the
    /// last completed shape and drops that shape once the pop empties it. A
    /// polygon that was already empty is left alone. A rectangle has no
    /// vertex list and is removed whole.
    pub fn undo_last_vertex(&mut self) {
        if self.in_progress.pop().is_some() {
            return;
        }
        let Some(last) = self.shapes.last_mut() else {
            return;
        };
        let emptied = match last.vertices_mut() {
            Some(points) => points.pop().is_some() && points.is_empty(),
            None => true,
        };
        if emptied {
            self.shapes.pop();
        }
    }

    /// Discard the in-progress polygon, or the last completed shape if
    /// nothing is in progress.
    pub fn undo_last_shape(&mut self) {
        if !self.in_progress.is_empty() {
            self.in_progress.clear();
        } else {
            self.shapes.pop();
        }
    }

    /// Replace the completed collection, dropping any in-progress work.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.in_progress.clear();
        self.preview = None;
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.in_progress.clear();
        self.preview = None;
    }

    /// Vertex at a known position, if it still exists.
    pub fn vertex(&self, owner: VertexOwner, index: usize) -> Option<Point> {
        self.polygon(owner).and_then(|points| points.get(index)).copied()
    }

    /// Replace a vertex value. Returns false if the position no longer exists.
    pub fn set_vertex(&mut self, owner: VertexOwner, index: usize, point: Point) -> bool {
        let points = match owner {
            VertexOwner::InProgress => Some(&mut self.in_progress),
            VertexOwner::Completed(i) => self.shapes.get_mut(i).and_then(Shape::vertices_mut),
        };
        match points.and_then(|p| p.get_mut(index)) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    fn polygon(&self, owner: VertexOwner) -> Option<&[Point]> {
        match owner {
            VertexOwner::InProgress => Some(self.in_progress.as_slice()),
            VertexOwner::Completed(i) => self.shapes.get(i).and_then(Shape::vertices),
        }
    }

    /// Set or replace the drag-preview rectangle.
    pub fn set_preview(&mut self, rect: Rectangle) {
        self.preview = Some(rect);
    }

    /// Remove and return the drag-preview rectangle.
    pub fn take_preview(&mut self) -> Option<Rectangle> {
        self.preview.take()
    }

    /// Indices of completed shapes containing `point`, in collection order.
    pub fn regions_containing(&self, point: &Point) -> Vec<usize> {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| shape.contains(point))
            .map(|(i, _)| i)
            .collect()
    }
}
