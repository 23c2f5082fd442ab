//! View state for pan/zoom transforms.

use crate::error::{SketchError, SketchResult};
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default zoom bounds.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;
/// Relative zoom change per zoom-in/zoom-out step.
pub const ZOOM_INCREMENT: f64 = 0.1;

/// Pan offset and zoom level of the drawing area.
///
/// Converts between screen coordinates and world (logical drawing) coordinates.
/// The zoom level is always kept inside `[min_zoom, max_zoom]`, and both bounds
/// are strictly positive, so the world transform never divides by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewStateFields")]
pub struct ViewState {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_increment: f64,
}

/// Unchecked serialized form of [`ViewState`].
#[derive(Deserialize)]
struct ViewStateFields {
    offset: Vec2,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom_increment: f64,
}

impl TryFrom<ViewStateFields> for ViewState {
    type Error = SketchError;

    fn try_from(fields: ViewStateFields) -> SketchResult<Self> {
        let mut view = Self::with_limits(fields.min_zoom, fields.max_zoom, fields.zoom_increment)?;
        if !fields.zoom.is_finite() {
            return Err(SketchError::DegenerateView(fields.zoom));
        }
        view.set_zoom(fields.zoom);
        view.offset = fields.offset;
        Ok(view)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_increment: ZOOM_INCREMENT,
        }
    }
}

impl ViewState {
    /// Create a view with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with custom zoom bounds.
    pub fn with_limits(min_zoom: f64, max_zoom: f64, zoom_increment: f64) -> SketchResult<Self> {
        if min_zoom <= 0.0 || !min_zoom.is_finite() {
            return Err(SketchError::DegenerateView(min_zoom));
        }
        if max_zoom < min_zoom || !max_zoom.is_finite() {
            return Err(SketchError::DegenerateView(max_zoom));
        }
        if !(zoom_increment > 0.0 && zoom_increment.is_finite()) {
            return Err(SketchError::DegenerateView(zoom_increment));
        }
        Ok(Self {
            offset: Vec2::ZERO,
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            zoom_increment,
        })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Set the zoom level, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to drawing-area coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to world coordinates.
    ///
    /// `view_offset_x` is the width of the strip on the left of the screen that
    /// is not part of the drawing area (e.g. an open sidebar).
    pub fn to_world(&self, screen: Point, view_offset_x: f64) -> Point {
        Point::new(
            (screen.x - view_offset_x - self.offset.x) / self.zoom,
            (screen.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world: Point, view_offset_x: f64) -> Point {
        Point::new(
            world.x * self.zoom + self.offset.x + view_offset_x,
            world.y * self.zoom + self.offset.y,
        )
    }

    /// Pan the view by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom in one step around the center of the drawing area.
    pub fn zoom_in(&mut self, viewport: Size) -> bool {
        self.zoom_around_center(viewport, self.zoom * (1.0 + self.zoom_increment))
    }

    /// Zoom out one step around the center of the drawing area.
    pub fn zoom_out(&mut self, viewport: Size) -> bool {
        self.zoom_around_center(viewport, self.zoom / (1.0 + self.zoom_increment))
    }

    fn zoom_around_center(&mut self, viewport: Size, new_zoom: f64) -> bool {
        let new_zoom = new_zoom.clamp(self.min_zoom, self.max_zoom);
        if new_zoom == self.zoom {
            return false;
        }
        let center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);

        // Keep the world point under the center fixed on screen
        self.offset = center - (center - self.offset) / self.zoom * new_zoom;
        self.zoom = new_zoom;
        true
    }

    /// Reset to identity zoom and no pan.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }
}
