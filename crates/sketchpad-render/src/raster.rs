//! CPU raster backend.
//!
//! Paints into a straight-alpha RGBA8 buffer. Each path is turned into a
//! coverage mask first (distance to the nearest segment against the stroke
//! radius, with a one pixel soft edge) so overlapping segments of the same
//! path never blend twice.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Affine, Point, Rect};
use peniko::Color;

/// Software renderer producing an RGBA8 pixel buffer.
#[derive(Debug, Clone, Default)]
pub struct RasterRenderer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    transform: Affine,
    /// Logical stroke width to pixels.
    width_scale: f64,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at `(x, y)`, if inside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    fn fill(&mut self, color: Color) {
        let rgba = to_rgba8(color);
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    fn blend(&mut self, x: usize, y: usize, color: [f32; 4], coverage: f32) {
        let sa = color[3] * coverage;
        if sa <= 0.0 {
            return;
        }
        let i = (y * self.width as usize + x) * 4;
        let dst = &mut self.pixels[i..i + 4];
        let da = f32::from(dst[3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let dc = f32::from(dst[c]) / 255.0;
            let out = (color[c] * sa + dc * da * (1.0 - sa)) / out_a;
            dst[c] = unit_to_u8(out);
        }
        dst[3] = unit_to_u8(out_a);
    }
}

impl Renderer for RasterRenderer {
    fn begin_frame(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let (width, height) = ctx.pixel_size();
        if width == 0 || height == 0 {
            return Err(RendererError::EmptyViewport(width, height));
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
        self.transform = ctx.transform();
        self.width_scale = ctx.scale_factor * ctx.sketchpad.view.zoom();
        self.fill(ctx.background_color);
        Ok(())
    }

    fn draw_path(&mut self, points: &[Point], color: Color, size: f64) {
        if points.is_empty() || self.pixels.is_empty() {
            return;
        }
        let radius = (size * self.width_scale / 2.0).max(0.5);
        let screen: Vec<Point> = points.iter().map(|p| self.transform * *p).collect();

        let Some(area) = pixel_bounds(&screen, radius + 1.0, self.width, self.height) else {
            return;
        };
        let (x0, y0) = (area.x0 as usize, area.y0 as usize);
        let (w, h) = (area.width() as usize, area.height() as usize);
        let mut mask = vec![0.0f32; w * h];

        let segments: Vec<(Point, Point)> = if screen.len() == 1 {
            vec![(screen[0], screen[0])]
        } else {
            screen.windows(2).map(|s| (s[0], s[1])).collect()
        };

        for (a, b) in segments {
            let Some(seg) = pixel_bounds(&[a, b], radius + 1.0, self.width, self.height) else {
                continue;
            };
            for py in seg.y0 as usize..seg.y1 as usize {
                for px in seg.x0 as usize..seg.x1 as usize {
                    let center = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                    let coverage = (radius + 0.5 - distance_to_segment(center, a, b)).clamp(0.0, 1.0);
                    let m = &mut mask[(py - y0) * w + (px - x0)];
                    *m = m.max(coverage as f32);
                }
            }
        }

        let components = color.components;
        for row in 0..h {
            for col in 0..w {
                let coverage = mask[row * w + col];
                if coverage > 0.0 {
                    self.blend(x0 + col, y0 + row, components, coverage);
                }
            }
        }
    }
}

/// Integer pixel rectangle around `points` grown by `pad`, clipped to the buffer.
fn pixel_bounds(points: &[Point], pad: f64, width: u32, height: u32) -> Option<Rect> {
    let first = points.first()?;
    let bounds = points
        .iter()
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
        .inflate(pad, pad);
    let clipped = Rect::new(
        bounds.x0.floor().max(0.0),
        bounds.y0.floor().max(0.0),
        bounds.x1.ceil().min(f64::from(width)),
        bounds.y1.ceil().min(f64::from(height)),
    );
    (clipped.x1 > clipped.x0 && clipped.y1 > clipped.y0).then_some(clipped)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_rgba8(color: Color) -> [u8; 4] {
    color.components.map(unit_to_u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render_frame;
    use kurbo::Vec2;
    use sketchpad_core::{ManualClock, Rgba, Sketchpad, ToolKind};

    fn pad() -> Sketchpad {
        let mut pad = Sketchpad::with_clock(ManualClock::new(0));
        pad.set_sidebar_visible(false);
        pad.set_viewport_size(100.0, 100.0);
        pad
    }

    fn render(pad: &Sketchpad) -> RasterRenderer {
        let mut renderer = RasterRenderer::new();
        render_frame(&mut renderer, &RenderContext::new(pad)).unwrap();
        renderer
    }

    #[test]
    fn test_empty_canvas_is_background() {
        let renderer = render(&pad());
        assert_eq!(renderer.pixels().len(), 100 * 100 * 4);
        assert_eq!(renderer.pixel(50, 50), Some([248, 248, 250, 255]));
        assert_eq!(renderer.pixel(100, 0), None);
    }

    #[test]
    fn test_pen_stroke_is_painted() {
        let mut pad = pad();
        pad.tools_mut().set_pen_size(6.0);
        pad.pointer_down(Point::new(10.0, 50.0));
        pad.pointer_move(Point::new(90.0, 50.0));
        pad.pointer_up();

        let renderer = render(&pad);
        assert_eq!(renderer.pixel(50, 50), Some([0, 0, 0, 255]));
        // Outside the stroke radius
        assert_eq!(renderer.pixel(50, 60), Some([248, 248, 250, 255]));
        // Round cap reaches past the last point
        assert_eq!(renderer.pixel(91, 50), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_eraser_paints_background_over_pen() {
        let mut pad = pad();
        pad.tools_mut().set_pen_size(10.0);
        pad.pointer_down(Point::new(10.0, 50.0));
        pad.pointer_move(Point::new(90.0, 50.0));
        pad.pointer_up();
        pad.set_tool(ToolKind::Eraser);
        pad.pointer_down(Point::new(50.0, 10.0));
        pad.pointer_move(Point::new(50.0, 90.0));
        pad.pointer_up();

        let renderer = render(&pad);
        assert_eq!(renderer.pixel(50, 50), Some([248, 248, 250, 255]));
        assert_eq!(renderer.pixel(20, 50), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_translucent_pen_blends() {
        let mut pad = pad();
        pad.tools_mut().set_background(Rgba::white());
        pad.tools_mut().set_pen_color(Rgba::new(0, 0, 0, 128));
        pad.pointer_down(Point::new(10.0, 50.0));
        pad.pointer_move(Point::new(90.0, 50.0));
        pad.pointer_up();

        let [r, g, b, a] = render(&pad).pixel(50, 50).unwrap();
        assert!((126..=128).contains(&r));
        assert_eq!((r, g), (g, b));
        assert_eq!(a, 255);
    }

    #[test]
    fn test_view_transform_applies() {
        let mut pad = pad();
        pad.view.offset = Vec2::new(20.0, 0.0);
        pad.finalize(
            vec![Point::new(0.0, 10.0), Point::new(0.0, 30.0)],
            sketchpad_core::PathTool::Pen,
        )
        .unwrap();

        let renderer = render(&pad);
        assert_eq!(renderer.pixel(20, 20), Some([0, 0, 0, 255]));
        assert_eq!(renderer.pixel(2, 20), Some([248, 248, 250, 255]));
    }

    #[test]
    fn test_empty_viewport_is_an_error() {
        let mut pad = pad();
        pad.set_viewport_size(0.0, 100.0);
        let mut renderer = RasterRenderer::new();
        let err = render_frame(&mut renderer, &RenderContext::new(&pad)).unwrap_err();
        assert!(matches!(err, RendererError::EmptyViewport(0, 100)));
    }
}
