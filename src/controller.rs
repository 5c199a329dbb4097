//! Editor session and pointer interaction state machine.
//!
//! One [`EditorSession`] exists per page. It owns the shape store, viewport,
//! renderer and drawing surface, turns pointer and window events into store
//! mutations, and repaints after every change.
//!
//! States:
//! - `Idle`: nothing in progress
//! - `Drawing`: polygon tool with vertices placed but not completed
//! - `Dragging`: a vertex or a preview rectangle follows the pointer

use std::fmt;
use std::str::FromStr;

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::hit_test::find_near_vertex;
use crate::model::{Point, Rectangle, Shape};
use crate::render::{DrawStyle, Renderer, Surface};
use crate::store::{ShapeStore, VertexOwner};
use crate::viewport::Viewport;

/// Drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Click to place vertices, drag existing vertices
    #[default]
    Polygon,
    /// Press, drag and release to draw a box
    Rectangle,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Polygon => "polygon",
            Tool::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polygon" => Ok(Tool::Polygon),
            "rectangle" | "rect" => Ok(Tool::Rectangle),
            _ => Err(EditorError::UnknownTool(s.to_string())),
        }
    }
}

/// Observable interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Drawing,
    Dragging,
}

/// What the pointer is currently moving.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Vertex {
        owner: VertexOwner,
        point_index: usize,
    },
    Rectangle {
        anchor: Point,
    },
}

/// Load state of the background snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackgroundState {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

/// A single editing session bound to one canvas.
pub struct EditorSession<S: Surface> {
    config: EditorConfig,
    store: ShapeStore,
    viewport: Viewport,
    renderer: Renderer,
    surface: S,
    tool: Tool,
    drag: Option<Drag>,
    background: BackgroundState,
    window_size: Option<(f64, f64)>,
    image_size: Option<(f64, f64)>,
}

impl<S: Surface> EditorSession<S> {
    pub fn new(config: EditorConfig, surface: S) -> Self {
        let renderer = Renderer::new(DrawStyle::from(&config));
        Self {
            config,
            store: ShapeStore::new(),
            viewport: Viewport::new(),
            renderer,
            surface,
            tool: Tool::default(),
            drag: None,
            background: BackgroundState::default(),
            window_size: None,
            image_size: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn background(&self) -> &BackgroundState {
        &self.background
    }

    pub fn state(&self) -> InteractionState {
        if self.drag.is_some() {
            InteractionState::Dragging
        } else if !self.store.in_progress().is_empty() {
            InteractionState::Drawing
        } else {
            InteractionState::Idle
        }
    }

    /// Copy of the completed shapes, for saving.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.store.shapes().to_vec()
    }

    /// Switch tools. Any active drag or preview is dropped.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        log::debug!("🛠️ Tool: {} -> {}", self.tool, tool);
        self.tool = tool;
        self.cancel_drag();
        self.redraw();
    }

    // ------------------------------------------------------------------
    // Pointer events (canvas pixel coordinates)
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, canvas_pos: Point) {
        let pos = self.viewport.to_image_space(canvas_pos);

        match self.tool {
            Tool::Polygon => {
                let hit = find_near_vertex(
                    &self.store,
                    pos,
                    self.config.hit_tolerance_px,
                    self.viewport.scale(),
                );
                match hit {
                    Some(hit) => {
                        log::debug!(
                            "Grabbed vertex {} of {:?} at ({:.1}, {:.1})",
                            hit.point_index,
                            hit.owner,
                            hit.point.x,
                            hit.point.y
                        );
                        self.drag = Some(Drag::Vertex {
                            owner: hit.owner,
                            point_index: hit.point_index,
                        });
                    }
                    None => {
                        self.store.add_vertex(pos);
                        log::debug!(
                            "📍 Vertex {} at ({:.1}, {:.1})",
                            self.store.in_progress().len(),
                            pos.x,
                            pos.y
                        );
                    }
                }
            }
            Tool::Rectangle => {
                self.drag = Some(Drag::Rectangle { anchor: pos });
                self.store.set_preview(Rectangle::from_anchor(pos, pos));
                log::debug!("Rectangle anchored at ({:.1}, {:.1})", pos.x, pos.y);
            }
        }

        self.redraw();
    }

    pub fn pointer_move(&mut self, canvas_pos: Point) {
        let Some(drag) = self.drag else {
            return;
        };
        let pos = self.viewport.to_image_space(canvas_pos);

        match drag {
            Drag::Vertex { owner, point_index } => {
                if !self.store.set_vertex(owner, point_index, pos) {
                    log::warn!(
                        "Dragged vertex {} of {:?} no longer exists, releasing",
                        point_index,
                        owner
                    );
                    self.drag = None;
                }
            }
            Drag::Rectangle { anchor } => {
                self.store.set_preview(Rectangle::from_anchor(anchor, pos));
            }
        }

        self.redraw();
    }

    pub fn pointer_up(&mut self) {
        match self.drag.take() {
            Some(Drag::Rectangle { anchor }) => {
                let rect = self
                    .store
                    .take_preview()
                    .unwrap_or_else(|| Rectangle::from_anchor(anchor, anchor));
                self.store.commit_rectangle(rect);
                log::debug!(
                    "⬜ Rectangle committed: ({:.1}, {:.1}) {:.1}x{:.1}",
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height
                );
                self.redraw();
            }
            Some(Drag::Vertex { .. }) => {
                log::debug!("Vertex released");
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Explicit actions
    // ------------------------------------------------------------------

    /// Commit the in-progress polygon.
    ///
    /// On [`EditorError::InsufficientVertices`] nothing changes and the error
    /// is returned for the host to show.
    pub fn complete_shape(&mut self) -> Result<()> {
        self.cancel_drag();
        let result = self.store.complete_shape();
        match &result {
            Ok(()) => log::info!("✅ Polygon completed ({} regions)", self.store.shapes().len()),
            Err(e) => log::warn!("Cannot complete polygon: {}", e),
        }
        self.redraw();
        result
    }

    pub fn undo_last_vertex(&mut self) {
        self.cancel_drag();
        self.store.undo_last_vertex();
        log::debug!("⏪ Undo vertex");
        self.redraw();
    }

    pub fn undo_last_shape(&mut self) {
        self.cancel_drag();
        self.store.undo_last_shape();
        log::debug!("⏪ Undo shape");
        self.redraw();
    }

    /// Empty the local collection without touching the endpoint.
    pub fn clear(&mut self) {
        self.cancel_drag();
        self.store.clear();
        log::debug!("🗑️ Regions cleared locally");
        self.redraw();
    }

    /// Replace the collection with shapes fetched from the endpoint.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.cancel_drag();
        self.store.replace_all(shapes);
        self.redraw();
    }

    // ------------------------------------------------------------------
    // Persistence results
    // ------------------------------------------------------------------

    /// Adopt a load result. On error the local collection is untouched.
    pub fn apply_loaded(&mut self, result: Result<Vec<Shape>>) -> Result<usize> {
        match result {
            Ok(shapes) => {
                let count = shapes.len();
                self.replace_all(shapes);
                log::info!("📥 Loaded {} regions", count);
                Ok(count)
            }
            Err(e) => {
                log::error!("Failed to load regions: {}", e);
                Err(e)
            }
        }
    }

    /// Report a save result. Local state is never changed by a save.
    pub fn apply_saved(&self, result: Result<String>) -> Result<String> {
        match &result {
            Ok(message) => log::info!("💾 Regions saved: {}", message),
            Err(e) => log::error!("Failed to save regions: {}", e),
        }
        result
    }

    /// Adopt a remote clear result. Local state is cleared only on success.
    pub fn apply_cleared(&mut self, result: Result<String>) -> Result<String> {
        match result {
            Ok(message) => {
                self.clear();
                log::info!("🗑️ Regions cleared: {}", message);
                Ok(message)
            }
            Err(e) => {
                log::error!("Failed to clear regions: {}", e);
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// Record the snapshot's native size and fit it to the last known window.
    ///
    /// The size is kept even when this first fit fails, so a later
    /// [`resize`](Self::resize) with usable dimensions still fits it.
    pub fn image_loaded(&mut self, image_width: f64, image_height: f64) -> Result<()> {
        self.image_size = Some((image_width, image_height));
        self.background = BackgroundState::Ready;
        log::info!("🖼️ Snapshot loaded: {}x{}", image_width, image_height);

        let (window_width, window_height) = self.window_size.unwrap_or((image_width, image_height));
        let fitted = self.refit(window_width, window_height, image_width, image_height);
        self.redraw();
        fitted
    }

    /// Mark the snapshot as failed. The canvas stays unfit and blank.
    pub fn image_failed(&mut self, reason: impl Into<String>) -> EditorError {
        let reason = reason.into();
        log::error!("Snapshot failed to load: {}", reason);
        self.image_size = None;
        self.background = BackgroundState::Failed(reason.clone());
        EditorError::ImageLoad(reason)
    }

    /// Re-fit after a window resize. Shapes are unaffected.
    pub fn resize(&mut self, window_width: f64, window_height: f64) -> Result<()> {
        self.window_size = Some((window_width, window_height));
        let Some((image_width, image_height)) = self.image_size else {
            return Ok(());
        };
        self.refit(window_width, window_height, image_width, image_height)?;
        self.redraw();
        Ok(())
    }

    fn refit(
        &mut self,
        window_width: f64,
        window_height: f64,
        image_width: f64,
        image_height: f64,
    ) -> Result<()> {
        let fit = self.viewport.refit(
            window_width,
            window_height,
            image_width,
            image_height,
            self.config.fit_fraction,
        )?;
        self.surface.resize(fit.canvas_width, fit.canvas_height);
        Ok(())
    }

    /// Repaint the whole canvas.
    pub fn redraw(&mut self) {
        let with_background =
            self.background == BackgroundState::Ready && self.viewport.is_fitted();
        self.renderer
            .redraw(&self.store, &self.viewport, with_background, &mut self.surface);
    }

    fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            self.store.take_preview();
            log::debug!("Drag cancelled");
        }
    }
}
