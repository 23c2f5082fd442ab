//! Renderer trait abstraction.

use kurbo::{Affine, Point, Size};
use peniko::Color;
use sketchpad_core::Sketchpad;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Viewport is empty: {0}x{1}")]
    EmptyViewport(u32, u32),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The sketch pad to render.
    pub sketchpad: &'a Sketchpad,
    /// Size of the drawing area in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Whether to draw the stroke in progress.
    pub include_preview: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a context for the sketch pad's drawing area and background.
    pub fn new(sketchpad: &'a Sketchpad) -> Self {
        Self {
            sketchpad,
            viewport_size: sketchpad.drawing_area(),
            scale_factor: 1.0,
            background_color: sketchpad.tools().background().opaque().into(),
            include_preview: true,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Override the drawing area size.
    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set whether the in-progress stroke is drawn.
    pub fn with_preview(mut self, include: bool) -> Self {
        self.include_preview = include;
        self
    }

    /// Size of the target in physical pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let to_px = |v: f64| (v * self.scale_factor).round().max(0.0) as u32;
        (
            to_px(self.viewport_size.width),
            to_px(self.viewport_size.height),
        )
    }

    /// Logical drawing space to physical pixels of the drawing area.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.sketchpad.view.transform()
    }
}

/// Trait for rendering backends.
///
/// Points passed to `draw_path` are in logical drawing space; backends map
/// them through [`RenderContext::transform`] captured in `begin_frame`.
pub trait Renderer: Send {
    /// Prepare a frame: size the target and clear it to the background.
    fn begin_frame(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Draw a round-capped, round-joined polyline.
    fn draw_path(&mut self, points: &[Point], color: Color, size: f64);

    /// Finish the frame.
    fn end_frame(&mut self) {}
}

/// Feed one frame to a renderer: permanent paths, then visible temporary
/// paths, then the stroke in progress.
pub fn render_frame(renderer: &mut dyn Renderer, ctx: &RenderContext) -> RenderResult<()> {
    renderer.begin_frame(ctx)?;
    for path in ctx.sketchpad.visible_paths() {
        renderer.draw_path(path.points(), path.render_color(), path.size());
    }
    if ctx.include_preview {
        if let Some(preview) = ctx.sketchpad.preview() {
            renderer.draw_path(preview.points, preview.color.into(), preview.size);
        }
    }
    renderer.end_frame();
    Ok(())
}
