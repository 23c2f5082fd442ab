//! Flattened PNG export.

use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, RendererError, render_frame};
use kurbo::Size;
use sketchpad_core::Sketchpad;
use std::path::Path;
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Drawing area is empty: {0}x{1}")]
    EmptyViewport(u32, u32),
    #[error("Render failed: {0}")]
    Render(#[from] RendererError),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Rendered RGBA pixels ready for encoding.
#[derive(Debug, Clone)]
pub struct PngRenderResult {
    pub rgba_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rasterize the finished paths of the drawing area.
///
/// The stroke in progress is not part of an export.
pub fn render_to_rgba(sketchpad: &Sketchpad, size: Size) -> ExportResult<PngRenderResult> {
    let ctx = RenderContext::new(sketchpad)
        .with_viewport_size(size)
        .with_preview(false);
    let (width, height) = ctx.pixel_size();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyViewport(width, height));
    }

    let mut renderer = RasterRenderer::new();
    render_frame(&mut renderer, &ctx)?;
    Ok(PngRenderResult {
        width: renderer.width(),
        height: renderer.height(),
        rgba_data: renderer.into_pixels(),
    })
}

/// Encode RGBA pixels as PNG bytes.
pub fn encode_png(image: &PngRenderResult) -> ExportResult<Vec<u8>> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.rgba_data)?;
    }
    Ok(data)
}

/// Render the current drawing area and encode it as PNG.
pub fn export_png(sketchpad: &Sketchpad) -> ExportResult<Vec<u8>> {
    let image = render_to_rgba(sketchpad, sketchpad.drawing_area())?;
    let data = encode_png(&image)?;
    log::info!(
        "Exported {}x{} PNG ({} bytes)",
        image.width,
        image.height,
        data.len()
    );
    Ok(data)
}

/// Export the drawing area to a PNG file.
pub fn export_png_to_file(sketchpad: &Sketchpad, path: impl AsRef<Path>) -> ExportResult<()> {
    let data = export_png(sketchpad)?;
    std::fs::write(path.as_ref(), data)?;
    log::info!("Saved drawing to {:?}", path.as_ref());
    Ok(())
}
