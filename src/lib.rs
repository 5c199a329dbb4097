//! ROI Editor - region-of-interest drawing over camera snapshots
//!
//! Users outline regions on a still image from a camera, either as
//! click-placed polygons or drag-drawn rectangles. Vertices can be dragged
//! after placement, edits can be undone, and the whole collection is loaded
//! from and saved to a per-camera storage endpoint.
//!
//! Region coordinates are always kept in native image pixels; the canvas is
//! a scaled view ([`viewport`]) and pointer input is converted back before
//! it reaches the [`store`].

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod hit_test;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod viewport;

pub use config::{EditorConfig, LogLevel};
pub use controller::{BackgroundState, EditorSession, InteractionState, Tool};
pub use error::{EditorError, Result};
pub use model::{Geometry, Point, Rectangle, RegionMeta, Shape};
pub use persistence::{PersistenceClient, RegionBackend};
pub use render::{Renderer, Surface};
pub use store::ShapeStore;
pub use viewport::Viewport;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
