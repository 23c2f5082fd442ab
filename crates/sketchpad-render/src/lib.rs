//! SketchPad Render Library
//!
//! Renderer abstraction, a CPU raster implementation and PNG export.

pub mod export;
pub mod raster;
mod renderer;

pub use export::{
    ExportError, ExportResult, PngRenderResult, encode_png, export_png, export_png_to_file,
    render_to_rgba,
};
pub use raster::RasterRenderer;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, render_frame};
