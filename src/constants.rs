//! Global constants for the region editor.

/// Fraction of the window the canvas may occupy in each dimension
pub const DEFAULT_FIT_FRACTION: f64 = 0.9;

/// Vertex grab radius in canvas pixels
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 5.0;

/// Minimum number of vertices for a closeable polygon
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Scale used before the first successful fit
pub const INITIAL_SCALE: f64 = 1.0;

/// Path segment of the region endpoint, followed by the camera id
pub const REGION_ENDPOINT_PATH: &str = "rectangles";

/// Default base URL for the region endpoint (same origin)
pub const DEFAULT_API_BASE_URL: &str = "";

/// Drawing style defaults.
pub mod style {
    /// Stroke width for shape outlines
    pub const LINE_WIDTH: f64 = 2.0;
    /// Vertex marker radius in canvas pixels
    pub const VERTEX_MARKER_RADIUS: f64 = 5.0;
    /// Outline color
    pub const STROKE_COLOR: &str = "rgba(0, 255, 0, 0.7)";
    /// Polygon fill color
    pub const FILL_COLOR: &str = "rgba(0, 255, 0, 0.3)";
    /// Vertex marker color
    pub const VERTEX_COLOR: &str = "rgba(255, 0, 0, 0.7)";
}
