//! Full-repaint rendering of the snapshot and regions.
//!
//! Drawing goes through the [`Surface`] trait, which mirrors the subset of
//! the Canvas 2D API the editor needs. The browser front end implements it
//! over `CanvasRenderingContext2d`; [`RecordingSurface`] records commands so
//! rendering can be checked without a DOM.
//!
//! Paint order is fixed: background, completed shapes in collection order,
//! the in-progress polygon, then the drag-preview rectangle.

use crate::config::EditorConfig;
use crate::model::{Geometry, Point, Rectangle, Shape};
use crate::store::ShapeStore;
use crate::viewport::Viewport;

/// Canvas-2D-like drawing target. Coordinates are canvas pixels.
pub trait Surface {
    /// Set the backing canvas size.
    fn resize(&mut self, width: f64, height: f64);
    /// Clear the whole canvas.
    fn clear(&mut self, width: f64, height: f64);
    /// Draw the snapshot image stretched to `width` x `height` at the origin.
    fn draw_background(&mut self, width: f64, height: f64);
    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    /// Add a full circle to the current path.
    fn circle(&mut self, x: f64, y: f64, radius: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// Colors and sizes used when painting.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub line_width: f64,
    pub vertex_marker_radius: f64,
    pub stroke_color: String,
    pub fill_color: String,
    pub vertex_color: String,
}

impl From<&EditorConfig> for DrawStyle {
    fn from(config: &EditorConfig) -> Self {
        Self {
            line_width: config.line_width,
            vertex_marker_radius: config.vertex_marker_radius,
            stroke_color: config.stroke_color.clone(),
            fill_color: config.fill_color.clone(),
            vertex_color: config.vertex_color.clone(),
        }
    }
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

/// Stateless painter over a [`Surface`].
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: DrawStyle,
}

impl Renderer {
    pub fn new(style: DrawStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    /// Repaint everything.
    ///
    /// The background is skipped when `with_background` is false (snapshot
    /// not loaded or failed to load).
    pub fn redraw(
        &self,
        store: &ShapeStore,
        viewport: &Viewport,
        with_background: bool,
        surface: &mut impl Surface,
    ) {
        let (width, height) = viewport.canvas_size();
        surface.clear(width, height);
        if with_background {
            surface.draw_background(width, height);
        }

        let scale = viewport.scale();
        for shape in store.shapes() {
            self.draw_shape(shape, scale, surface);
        }

        if !store.in_progress().is_empty() {
            self.draw_polygon(store.in_progress(), true, &self.style.stroke_color, scale, surface);
        }

        if let Some(rect) = store.preview() {
            self.draw_rectangle(rect, &self.style.stroke_color, scale, surface);
        }
    }

    fn draw_shape(&self, shape: &Shape, scale: f64, surface: &mut impl Surface) {
        let stroke = shape.color().unwrap_or(&self.style.stroke_color);
        match &shape.geometry {
            Geometry::Polygon(points) => self.draw_polygon(points, false, stroke, scale, surface),
            Geometry::Rectangle(rect) => self.draw_rectangle(rect, stroke, scale, surface),
        }
    }

    fn draw_polygon(
        &self,
        points: &[Point],
        in_progress: bool,
        stroke: &str,
        scale: f64,
        surface: &mut impl Surface,
    ) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };

        surface.set_line_width(self.style.line_width);
        surface.set_stroke_style(stroke);
        surface.set_fill_style(&self.style.fill_color);

        surface.begin_path();
        surface.move_to(first.x * scale, first.y * scale);
        for p in rest {
            surface.line_to(p.x * scale, p.y * scale);
        }
        if !in_progress && points.len() > 2 {
            surface.close_path();
            surface.fill();
        }
        surface.stroke();

        for p in points {
            self.draw_vertex(p, scale, surface);
        }
    }

    fn draw_vertex(&self, point: &Point, scale: f64, surface: &mut impl Surface) {
        surface.set_fill_style(&self.style.vertex_color);
        surface.begin_path();
        surface.circle(point.x * scale, point.y * scale, self.style.vertex_marker_radius);
        surface.fill();
    }

    fn draw_rectangle(&self, rect: &Rectangle, stroke: &str, scale: f64, surface: &mut impl Surface) {
        surface.set_line_width(self.style.line_width);
        surface.set_stroke_style(stroke);
        surface.stroke_rect(
            rect.x * scale,
            rect.y * scale,
            rect.width * scale,
            rect.height * scale,
        );
    }
}

/// A recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(f64, f64),
    Clear(f64, f64),
    Background(f64, f64),
    LineWidth(f64),
    StrokeStyle(String),
    FillStyle(String),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Circle(f64, f64, f64),
    Fill,
    Stroke,
    StrokeRect(f64, f64, f64, f64),
}

/// Headless surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    pub size: (f64, f64),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded since the last `Clear`.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(..)))
            .unwrap_or(0);
        &self.commands[start..]
    }

    /// Number of full repaints recorded.
    pub fn frame_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear(..)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.size = (width, height);
        self.commands.push(DrawCommand::Resize(width, height));
    }
    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear(width, height));
    }
    fn draw_background(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Background(width, height));
    }
    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }
    fn set_stroke_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeStyle(color.to_string()));
    }
    fn set_fill_style(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillStyle(color.to_string()));
    }
    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }
    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }
    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        self.commands.push(DrawCommand::Circle(x, y, radius));
    }
    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }
    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::StrokeRect(x, y, width, height));
    }
}
