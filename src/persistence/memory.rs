//! In-memory region backend.
//!
//! Stores each camera's regions as JSON text so the serialization path is
//! the same as over the wire. Used by tests and headless demos.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{CLEARED_MESSAGE, EMPTY_SAVE_MESSAGE, RegionBackend, SAVED_MESSAGE};
use crate::error::{EditorError, Result};
use crate::model::{Shape, shapes_from_json, shapes_to_json};

/// Shared, single-threaded in-memory store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    regions: Rc<RefCell<HashMap<String, String>>>,
    offline: Rc<Cell<bool>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a network error until turned back on.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Seed raw JSON for a camera.
    pub fn insert_raw(&self, camera_id: &str, json: &str) {
        self.regions
            .borrow_mut()
            .insert(camera_id.to_string(), json.to_string());
    }

    /// Raw JSON stored for a camera.
    pub fn raw(&self, camera_id: &str) -> Option<String> {
        self.regions.borrow().get(camera_id).cloned()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.get() {
            Err(EditorError::network("backend offline"))
        } else {
            Ok(())
        }
    }
}

impl RegionBackend for MemoryBackend {
    async fn fetch(&self, camera_id: &str) -> Result<Vec<Shape>> {
        self.check_online()?;
        match self.regions.borrow().get(camera_id) {
            Some(json) => Ok(shapes_from_json(json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, camera_id: &str, shapes: &[Shape]) -> Result<String> {
        self.check_online()?;
        if shapes.is_empty() {
            return Err(EditorError::Http {
                status: 400,
                message: EMPTY_SAVE_MESSAGE.to_string(),
            });
        }
        let json = shapes_to_json(shapes)?;
        self.regions.borrow_mut().insert(camera_id.to_string(), json);
        Ok(SAVED_MESSAGE.to_string())
    }

    async fn delete(&self, camera_id: &str) -> Result<String> {
        self.check_online()?;
        self.regions.borrow_mut().remove(camera_id);
        Ok(CLEARED_MESSAGE.to_string())
    }
}
