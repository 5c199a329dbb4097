//! Region persistence against the external storage endpoint.
//!
//! The endpoint is keyed by camera id:
//!
//! - `GET    {base}/rectangles/{camera_id}` returns the JSON region array
//! - `POST   {base}/rectangles/{camera_id}` replaces it, answering `{"message": ..}`
//! - `DELETE {base}/rectangles/{camera_id}` removes it, answering `{"message": ..}`
//!
//! Backends implement [`RegionBackend`]. Calls are only made on explicit
//! user action; there is no retry, no queue, and no de-duplication, so when
//! two calls overlap the last response to arrive wins.
//!
//! Futures returned here never borrow the editor session. Callers snapshot
//! shapes before saving and hand results to the session afterwards
//! ([`EditorSession::apply_loaded`](crate::EditorSession::apply_loaded) and
//! friends).

mod memory;
pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

#[cfg(target_arch = "wasm32")]
mod http;
#[cfg(target_arch = "wasm32")]
pub use http::HttpBackend;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};
use crate::model::Shape;

/// Confirmation returned for saved regions.
pub const SAVED_MESSAGE: &str = "Regions saved";

/// Confirmation returned for cleared regions.
pub const CLEARED_MESSAGE: &str = "Regions cleared";

/// Rejection for an empty save, matching the storage service.
pub const EMPTY_SAVE_MESSAGE: &str = "No region data received";

/// Storage for region collections, keyed by camera id.
pub trait RegionBackend {
    /// Fetch the stored regions.
    fn fetch(&self, camera_id: &str) -> impl Future<Output = Result<Vec<Shape>>>;

    /// Replace the stored regions, returning the confirmation message.
    fn store(&self, camera_id: &str, shapes: &[Shape]) -> impl Future<Output = Result<String>>;

    /// Remove the stored regions, returning the confirmation message.
    fn delete(&self, camera_id: &str) -> impl Future<Output = Result<String>>;
}

/// `{"message": ..}` body of POST/DELETE responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Interpret a POST/DELETE response.
///
/// Success yields the body's message. Failure statuses become
/// [`EditorError::Http`], carrying the body's message when it has one and
/// `fallback` (usually the status text) otherwise.
pub fn message_from_response(status: u16, body: &str, fallback: &str) -> Result<String> {
    let message = serde_json::from_str::<MessageBody>(body).map(|b| b.message);
    if (200..300).contains(&status) {
        Ok(message?)
    } else {
        Err(EditorError::Http {
            status,
            message: message.unwrap_or_else(|_| fallback.to_string()),
        })
    }
}

/// Interpret a GET response.
pub fn shapes_from_response(status: u16, body: &str, fallback: &str) -> Result<Vec<Shape>> {
    if (200..300).contains(&status) {
        Ok(crate::model::shapes_from_json(body)?)
    } else {
        Err(EditorError::Http {
            status,
            message: serde_json::from_str::<MessageBody>(body)
                .map(|b| b.message)
                .unwrap_or_else(|_| fallback.to_string()),
        })
    }
}

/// Endpoint URL for a camera; an empty `base_url` gives a same-origin path.
pub fn region_url(base_url: &str, camera_id: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        crate::constants::REGION_ENDPOINT_PATH,
        camera_id
    )
}

/// Camera ids end up in URLs and file names: letters, digits, `-`, `_`
/// and `.` are allowed, but not an id made only of dots.
pub fn validate_camera_id(camera_id: &str) -> Result<()> {
    let valid = !camera_id.is_empty()
        && camera_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !camera_id.chars().all(|c| c == '.');
    if valid {
        Ok(())
    } else {
        Err(EditorError::InvalidCameraId(camera_id.to_string()))
    }
}

/// Load/save/clear for one camera over a backend.
#[derive(Debug, Clone)]
pub struct PersistenceClient<B> {
    backend: B,
    camera_id: String,
}

impl<B: RegionBackend> PersistenceClient<B> {
    pub fn new(backend: B, camera_id: impl Into<String>) -> Result<Self> {
        let camera_id = camera_id.into();
        validate_camera_id(&camera_id)?;
        Ok(Self { backend, camera_id })
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch the stored regions.
    pub async fn load(&self) -> Result<Vec<Shape>> {
        log::debug!("📥 Loading regions for camera {}", self.camera_id);
        let result = self.backend.fetch(&self.camera_id).await;
        if let Err(e) = &result {
            log::warn!("Load for camera {} failed: {}", self.camera_id, e);
        }
        result
    }

    /// Replace the stored regions with `shapes`.
    pub async fn save(&self, shapes: &[Shape]) -> Result<String> {
        log::debug!(
            "💾 Saving {} regions for camera {}",
            shapes.len(),
            self.camera_id
        );
        let result = self.backend.store(&self.camera_id, shapes).await;
        if let Err(e) = &result {
            log::warn!("Save for camera {} failed: {}", self.camera_id, e);
        }
        result
    }

    /// Remove the stored regions.
    pub async fn clear(&self) -> Result<String> {
        log::debug!("🗑️ Clearing regions for camera {}", self.camera_id);
        let result = self.backend.delete(&self.camera_id).await;
        if let Err(e) = &result {
            log::warn!("Clear for camera {} failed: {}", self.camera_id, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::EditorSession;
    use crate::config::EditorConfig;
    use crate::model::{Point, Rectangle, shapes_from_json};
    use crate::render::RecordingSurface;
    use pollster::block_on;
    use serde_json::Value;

    fn client() -> PersistenceClient<MemoryBackend> {
        PersistenceClient::new(MemoryBackend::new(), "cam1").unwrap()
    }

    fn session() -> EditorSession<RecordingSurface> {
        EditorSession::new(EditorConfig::default(), RecordingSurface::new())
    }

    #[test]
    fn test_message_from_success_response() {
        let message = message_from_response(200, r#"{"message":"ok"}"#, "OK").unwrap();
        assert_eq!(message, "ok");
    }

    #[test]
    fn test_message_from_error_response() {
        let err = message_from_response(400, r#"{"message":"bad"}"#, "Bad Request").unwrap_err();
        assert!(matches!(err, EditorError::Http { status: 400, ref message } if message == "bad"));

        let err = message_from_response(502, "<html>", "Bad Gateway").unwrap_err();
        assert!(
            matches!(err, EditorError::Http { status: 502, ref message } if message == "Bad Gateway")
        );
    }

    #[test]
    fn test_success_without_message_is_json_error() {
        let err = message_from_response(200, "not json", "OK").unwrap_err();
        assert!(matches!(err, EditorError::Json(_)));
    }

    #[test]
    fn test_shapes_from_response() {
        let shapes = shapes_from_response(200, r#"[[{"x":1,"y":2}]]"#, "OK").unwrap();
        assert_eq!(shapes, vec![Shape::polygon(vec![Point::new(1.0, 2.0)])]);

        let err = shapes_from_response(404, "", "Not Found").unwrap_err();
        assert!(err.is_remote());
    }

    #[test]
    fn test_camera_id_validation() {
        assert!(validate_camera_id("cam_01-a").is_ok());
        assert!(validate_camera_id("cam.1").is_ok());
        assert!(validate_camera_id("192.168.1.20").is_ok());
        assert!(validate_camera_id(".").is_err());
        assert!(validate_camera_id("..").is_err());
        assert!(validate_camera_id("").is_err());
        assert!(validate_camera_id("../etc").is_err());
        assert!(validate_camera_id("a/b").is_err());
        assert!(PersistenceClient::new(MemoryBackend::new(), "x y").is_err());
    }

    #[test]
    fn test_load_empty_camera() {
        assert!(block_on(client().load()).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let client = client();
        let shapes = vec![
            Shape::polygon(vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)]),
            Shape::rectangle(Rectangle::new(1.0, 1.0, -2.0, 3.0)),
        ];

        let message = block_on(client.save(&shapes)).unwrap();
        assert_eq!(message, SAVED_MESSAGE);
        assert_eq!(block_on(client.load()).unwrap(), shapes);
    }

    #[test]
    fn test_load_then_save_reproduces_content() {
        let stored = r##"[[{"x":1.5,"y":2},{"x":3,"y":4},{"x":5,"y":6.25}],{"x":1,"y":2,"width":3,"height":4},{"points":[{"x":0,"y":0}],"name":"Gate","color":"#00ff00","duration":0},{"points":[{"x":10,"y":10}],"name":"Lot","duration":1.5}]"##;
        let backend = MemoryBackend::new();
        backend.insert_raw("cam1", stored);
        let client = PersistenceClient::new(backend, "cam1").unwrap();
        let mut s = session();

        s.apply_loaded(block_on(client.load())).unwrap();
        block_on(client.save(&s.snapshot())).unwrap();

        let saved: Value = serde_json::from_str(&client.backend().raw("cam1").unwrap()).unwrap();
        let original: Value = serde_json::from_str(stored).unwrap();
        assert_eq!(saved, original);
        assert_eq!(client.backend().raw("cam1").unwrap(), stored);
    }

    #[test]
    fn test_failed_save_leaves_session_unchanged() {
        let client = client();
        client.backend().set_offline(true);
        let mut s = session();
        s.replace_all(vec![Shape::rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0))]);
        let before = s.snapshot();

        let result = s.apply_saved(block_on(client.save(&s.snapshot())));

        assert!(matches!(result, Err(EditorError::Network(_))));
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_failed_load_leaves_session_unchanged() {
        let client = client();
        block_on(client.save(&[Shape::rectangle(Rectangle::default())])).unwrap();
        client.backend().set_offline(true);
        let mut s = session();
        s.replace_all(vec![Shape::polygon(vec![Point::new(9.0, 9.0)])]);

        assert!(s.apply_loaded(block_on(client.load())).is_err());
        assert_eq!(s.snapshot(), vec![Shape::polygon(vec![Point::new(9.0, 9.0)])]);
    }

    #[test]
    fn test_clear_remote_and_local() {
        let client = client();
        let mut s = session();
        let shapes = vec![Shape::rectangle(Rectangle::new(0.0, 0.0, 2.0, 2.0))];
        block_on(client.save(&shapes)).unwrap();
        s.replace_all(shapes);

        let message = s.apply_cleared(block_on(client.clear())).unwrap();

        assert_eq!(message, CLEARED_MESSAGE);
        assert!(s.store().is_empty());
        assert!(block_on(client.load()).unwrap().is_empty());
    }

    #[test]
    fn test_empty_save_rejected() {
        let err = block_on(client().save(&[])).unwrap_err();
        assert!(matches!(err, EditorError::Http { status: 400, .. }));
    }

    #[test]
    fn test_last_write_wins() {
        let client = client();
        let first = vec![Shape::rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0))];
        let second = vec![Shape::rectangle(Rectangle::new(5.0, 5.0, 1.0, 1.0))];

        block_on(client.save(&first)).unwrap();
        block_on(client.save(&second)).unwrap();

        assert_eq!(block_on(client.load()).unwrap(), second);
        assert_eq!(
            shapes_from_json(&client.backend().raw("cam1").unwrap()).unwrap(),
            second
        );
    }
}
