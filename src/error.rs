//! Error types for region editing and persistence.

use thiserror::Error;

/// Errors surfaced by the region editor.
///
/// None of these are fatal: every operation that fails leaves the editor
/// state as it was and hands the error back so the host can show it.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Polygon completion attempted with too few vertices
    #[error("A polygon needs at least 3 vertices (has {count})")]
    InsufficientVertices {
        /// Number of vertices in the in-progress polygon
        count: usize,
    },

    /// Request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Region endpoint answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Message from the response body, or the status text
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error in a file-backed store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background snapshot failed to load
    #[error("Image load failed: {0}")]
    ImageLoad(String),

    /// Window or image dimensions that cannot produce a positive scale
    #[error("Invalid dimensions: window {window_width}x{window_height}, image {image_width}x{image_height}")]
    InvalidDimensions {
        /// Window width in CSS pixels
        window_width: f64,
        /// Window height in CSS pixels
        window_height: f64,
        /// Native image width
        image_width: f64,
        /// Native image height
        image_height: f64,
    },

    /// Camera id not usable as a storage key
    #[error("Invalid camera id: {0:?}")]
    InvalidCameraId(String),

    /// Tool name not recognized
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Configuration value out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl EditorError {
    /// Create a network error from anything displayable.
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    /// Check whether this error came from talking to the region endpoint.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, EditorError>;
