//! File-backed region store for native tools.
//!
//! One `<camera_id>.json` file per camera under a root directory, holding
//! the same JSON array the HTTP endpoint serves.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{CLEARED_MESSAGE, EMPTY_SAVE_MESSAGE, RegionBackend, SAVED_MESSAGE, validate_camera_id};
use crate::error::{EditorError, Result};
use crate::model::{Shape, shapes_from_json};

#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform data directory, if there is one.
    pub fn in_data_dir() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join("roi_editor").join("regions")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, camera_id: &str) -> Result<PathBuf> {
        validate_camera_id(camera_id)?;
        Ok(self.root.join(format!("{camera_id}.json")))
    }
}

impl RegionBackend for FileBackend {
    async fn fetch(&self, camera_id: &str) -> Result<Vec<Shape>> {
        let path = self.path_for(camera_id)?;
        match fs::read_to_string(&path) {
            Ok(json) => Ok(shapes_from_json(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, camera_id: &str, shapes: &[Shape]) -> Result<String> {
        let path = self.path_for(camera_id)?;
        if shapes.is_empty() {
            return Err(EditorError::Http {
                status: 400,
                message: EMPTY_SAVE_MESSAGE.to_string(),
            });
        }
        fs::create_dir_all(&self.root)?;
        // Write-then-rename so a crash never leaves a truncated file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(shapes)?)?;
        fs::rename(&tmp, &path)?;
        log::debug!("Wrote {} regions to {:?}", shapes.len(), path);
        Ok(SAVED_MESSAGE.to_string())
    }

    async fn delete(&self, camera_id: &str) -> Result<String> {
        let path = self.path_for(camera_id)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(CLEARED_MESSAGE.to_string())
    }
}
