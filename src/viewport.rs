//! Fit-to-window scaling and coordinate mapping.
//!
//! Shapes live in image space (native snapshot pixels). The canvas shows the
//! snapshot scaled to fit the window, so every pointer position has to be
//! divided by the scale before it touches a shape, and every stored point
//! multiplied by it before it is drawn.

use crate::constants::{DEFAULT_FIT_FRACTION, INITIAL_SCALE};
use crate::error::{EditorError, Result};
use crate::model::Point;

/// Canvas size and scale produced by fitting an image into a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub scale: f64,
}

/// Fit an image into `fraction` of the window, preserving its aspect ratio.
///
/// The image is constrained by whichever window dimension is tighter
/// relative to the image's aspect ratio. Returns an error when any input
/// would make the scale non-positive or non-finite.
pub fn fit_with_fraction(
    window_width: f64,
    window_height: f64,
    image_width: f64,
    image_height: f64,
    fraction: f64,
) -> Result<Fit> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !(usable(window_width)
        && usable(window_height)
        && usable(image_width)
        && usable(image_height)
        && usable(fraction))
    {
        return Err(EditorError::InvalidDimensions {
            window_width,
            window_height,
            image_width,
            image_height,
        });
    }

    let max_width = window_width * fraction;
    let max_height = window_height * fraction;
    let image_ratio = image_width / image_height;
    let window_ratio = max_width / max_height;

    let (canvas_width, canvas_height) = if image_ratio > window_ratio {
        (max_width, max_width / image_ratio)
    } else {
        (max_height * image_ratio, max_height)
    };

    Ok(Fit {
        canvas_width,
        canvas_height,
        scale: canvas_width / image_width,
    })
}

/// [`fit_with_fraction`] with the default 90% window fraction.
pub fn fit(window_width: f64, window_height: f64, image_width: f64, image_height: f64) -> Result<Fit> {
    fit_with_fraction(
        window_width,
        window_height,
        image_width,
        image_height,
        DEFAULT_FIT_FRACTION,
    )
}

/// Current image-to-canvas mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    canvas_width: f64,
    canvas_height: f64,
    image_width: f64,
    image_height: f64,
    fitted: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: INITIAL_SCALE,
            canvas_width: 0.0,
            canvas_height: 0.0,
            image_width: 0.0,
            image_height: 0.0,
            fitted: false,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fit for the given window and image size and adopt the result.
    ///
    /// On error the previous mapping is kept.
    pub fn refit(
        &mut self,
        window_width: f64,
        window_height: f64,
        image_width: f64,
        image_height: f64,
        fraction: f64,
    ) -> Result<Fit> {
        let fit = fit_with_fraction(window_width, window_height, image_width, image_height, fraction)?;
        self.scale = fit.scale;
        self.canvas_width = fit.canvas_width;
        self.canvas_height = fit.canvas_height;
        self.image_width = image_width;
        self.image_height = image_height;
        self.fitted = true;
        log::debug!(
            "📐 Fit {}x{} image into {:.0}x{:.0} window: canvas {:.2}x{:.2}, scale {:.5}",
            image_width,
            image_height,
            window_width,
            window_height,
            fit.canvas_width,
            fit.canvas_height,
            fit.scale
        );
        Ok(fit)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Native size of the image last fitted.
    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    /// Whether a fit has succeeded since creation.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Canvas pixel position to image coordinates.
    pub fn to_image_space(&self, canvas_point: Point) -> Point {
        Point::new(canvas_point.x / self.scale, canvas_point.y / self.scale)
    }

    /// Image coordinates to canvas pixel position.
    pub fn to_canvas_space(&self, image_point: Point) -> Point {
        image_point.scaled(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_wide_image_in_square_window() {
        let fit = fit(1000.0, 1000.0, 1920.0, 1080.0).unwrap();
        assert_eq!(fit.canvas_width, 900.0);
        assert!(approx_eq(fit.canvas_height, 506.25));
        assert!(approx_eq(fit.scale, 0.46875));
    }

    #[test]
    fn test_tall_image_constrained_by_height() {
        let fit = fit(1600.0, 900.0, 1000.0, 2000.0).unwrap();
        assert!(approx_eq(fit.canvas_height, 810.0));
        assert!(approx_eq(fit.canvas_width, 405.0));
        assert!(approx_eq(fit.scale, 0.405));
    }

    #[test]
    fn test_fit_preserves_aspect_and_bounds() {
        let cases = [
            (1280.0, 720.0, 640.0, 480.0),
            (800.0, 1200.0, 1920.0, 1080.0),
            (300.0, 300.0, 50.0, 50.0),
        ];
        for (ww, wh, iw, ih) in cases {
            let f = fit(ww, wh, iw, ih).unwrap();
            assert!(f.canvas_width <= ww * 0.9 + EPSILON);
            assert!(f.canvas_height <= wh * 0.9 + EPSILON);
            assert!((f.canvas_width / f.canvas_height - iw / ih).abs() < 1e-6);
            assert!(f.scale > 0.0);
        }
    }

    #[test]
    fn test_fit_is_idempotent() {
        let mut viewport = Viewport::new();
        let first = viewport.refit(1000.0, 700.0, 1920.0, 1080.0, 0.9).unwrap();
        let second = viewport.refit(1000.0, 700.0, 1920.0, 1080.0, 0.9).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_dimensions_keep_previous_fit() {
        let mut viewport = Viewport::new();
        viewport.refit(1000.0, 1000.0, 1920.0, 1080.0, 0.9).unwrap();

        let err = viewport.refit(1000.0, 1000.0, 0.0, 1080.0, 0.9).unwrap_err();
        assert!(matches!(err, EditorError::InvalidDimensions { .. }));
        assert!(approx_eq(viewport.scale(), 0.46875));
    }

    #[test]
    fn test_unfitted_viewport_uses_identity_scale() {
        let viewport = Viewport::new();
        assert!(!viewport.is_fitted());
        assert_eq!(viewport.to_image_space(Point::new(12.0, 34.0)), Point::new(12.0, 34.0));
    }

    #[test]
    fn test_coordinate_mapping() {
        let mut viewport = Viewport::new();
        viewport.refit(1000.0, 1000.0, 1920.0, 1080.0, 0.9).unwrap();

        let image = viewport.to_image_space(Point::new(450.0, 253.125));
        assert!(approx_eq(image.x, 960.0));
        assert!(approx_eq(image.y, 540.0));

        let canvas = viewport.to_canvas_space(image);
        assert!(approx_eq(canvas.x, 450.0));
        assert!(approx_eq(canvas.y, 253.125));
    }
}
