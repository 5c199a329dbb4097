//! Browser `fetch` backend for the region endpoint.

use gloo_net::http::{Request, Response};

use super::{RegionBackend, message_from_response, region_url, shapes_from_response};
use crate::error::{EditorError, Result};
use crate::model::Shape;

/// Talks to `{base_url}/rectangles/{camera_id}`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
}

impl HttpBackend {
    /// `base_url` may be empty for same-origin requests.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, camera_id: &str) -> String {
        region_url(&self.base_url, camera_id)
    }
}

async fn read_body(response: Response) -> Result<(u16, String, String)> {
    let status = response.status();
    let status_text = response.status_text();
    let body = response.text().await.map_err(EditorError::network)?;
    Ok((status, body, status_text))
}

impl RegionBackend for HttpBackend {
    async fn fetch(&self, camera_id: &str) -> Result<Vec<Shape>> {
        let response = Request::get(&self.url(camera_id))
            .send()
            .await
            .map_err(EditorError::network)?;
        let (status, body, status_text) = read_body(response).await?;
        shapes_from_response(status, &body, &status_text)
    }

    async fn store(&self, camera_id: &str, shapes: &[Shape]) -> Result<String> {
        let response = Request::post(&self.url(camera_id))
            .json(shapes)
            .map_err(EditorError::network)?
            .send()
            .await
            .map_err(EditorError::network)?;
        let (status, body, status_text) = read_body(response).await?;
        message_from_response(status, &body, &status_text)
    }

    async fn delete(&self, camera_id: &str) -> Result<String> {
        let response = Request::delete(&self.url(camera_id))
            .send()
            .await
            .map_err(EditorError::network)?;
        let (status, body, status_text) = read_body(response).await?;
        message_from_response(status, &body, &status_text)
    }
}
