//! Finished stroke records.

use crate::error::{SketchError, SketchResult};
use crate::store::PathId;
use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Same color, fully opaque.
    pub const fn opaque(self) -> Self {
        self.with_alpha(255)
    }

    /// Convert to a renderer color with a fractional alpha in `0..=255`.
    pub fn to_color_with_alpha(self, alpha: f64) -> Color {
        let alpha = (alpha / 255.0).clamp(0.0, 1.0) as f32;
        Color::from_rgba8(self.r, self.g, self.b, 255).with_alpha(alpha)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// The tool a finished path was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathTool {
    Pen,
    TempPen,
    Eraser,
}

/// A finished stroke.
///
/// Points, color, size and tool never change after creation. Only the live
/// opacity of temporary-pen paths moves, driven by the fade controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub(crate) id: PathId,
    points: Vec<Point>,
    color: Rgba,
    size: f64,
    tool: PathTool,
    /// Live opacity in `0..=255`; only present for temporary-pen paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_alpha: Option<f64>,
}

impl Path {
    /// Build a path from a finished stroke.
    ///
    /// Eraser strokes paint with the background color at full opacity and the
    /// eraser size; pen and temporary-pen strokes use the pen color (alpha
    /// included) and pen size.
    pub fn from_stroke(
        points: Vec<Point>,
        tool: PathTool,
        pen_color: Rgba,
        pen_size: f64,
        eraser_size: f64,
        background: Rgba,
    ) -> SketchResult<Self> {
        if points.len() < 2 {
            return Err(SketchError::InvalidGeometry {
                points: points.len(),
            });
        }
        let (color, size) = match tool {
            PathTool::Eraser => (background.opaque(), eraser_size),
            PathTool::Pen | PathTool::TempPen => (pen_color, pen_size),
        };
        Ok(Self::new(points, color, size, tool))
    }

    /// Create a path without geometry checks.
    pub fn new(points: Vec<Point>, color: Rgba, size: f64, tool: PathTool) -> Self {
        let current_alpha = (tool == PathTool::TempPen).then_some(f64::from(color.a));
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            size,
            tool,
            current_alpha,
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn tool(&self) -> PathTool {
        self.tool
    }

    pub fn current_alpha(&self) -> Option<f64> {
        self.current_alpha
    }

    /// The alpha the path was created with.
    pub fn original_alpha(&self) -> f64 {
        f64::from(self.color.a)
    }

    /// The alpha to render with right now.
    pub fn effective_alpha(&self) -> f64 {
        match (self.tool, self.current_alpha) {
            (PathTool::TempPen, Some(alpha)) => alpha,
            _ => self.original_alpha(),
        }
    }

    /// Whether a renderer should draw this path at all.
    pub fn is_visible(&self) -> bool {
        self.effective_alpha() > 0.0
    }

    /// Renderer color with the effective alpha applied.
    pub fn render_color(&self) -> Color {
        self.color.to_color_with_alpha(self.effective_alpha())
    }

    /// Restore a temporary path to its original opacity.
    pub(crate) fn restore_alpha(&mut self) {
        if self.tool == PathTool::TempPen {
            self.current_alpha = Some(self.original_alpha());
        }
    }

    /// Interpolate the live opacity toward zero.
    pub(crate) fn apply_fade(&mut self, progress: f64) {
        if self.tool == PathTool::TempPen {
            let original = self.original_alpha();
            self.current_alpha = Some(original + (0.0 - original) * progress);
        }
    }

    /// Whether any recorded point lies strictly within `size / 2 + proximity`
    /// of `point`.
    pub fn is_near(&self, point: Point, proximity: f64) -> bool {
        let reach = self.size / 2.0 + proximity;
        self.points.iter().any(|p| p.distance(point) < reach)
    }

    /// Bounding box of the stroke centerline, grown by half the stroke size.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let centerline = self
            .points
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        centerline.inflate(self.size / 2.0, self.size / 2.0)
    }

    /// The stroke centerline as a polyline.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for point in points {
                path.line_to(*point);
            }
        }
        path
    }

    /// Compare everything but identity and live opacity.
    pub fn same_stroke(&self, other: &Path) -> bool {
        self.points == other.points
            && self.color == other.color
            && self.size == other.size
            && self.tool == other.tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect()
    }

    #[test]
    fn test_single_point_rejected() {
        let err = Path::from_stroke(line(1), PathTool::Pen, Rgba::black(), 5.0, 20.0, Rgba::white());
        assert_eq!(err, Err(SketchError::InvalidGeometry { points: 1 }));
    }

    #[test]
    fn test_pen_path_keeps_pen_alpha() {
        let color = Rgba::new(10, 20, 30, 128);
        let path = Path::from_stroke(line(3), PathTool::Pen, color, 5.0, 20.0, Rgba::white()).unwrap();
        assert_eq!(path.color(), color);
        assert_eq!(path.size(), 5.0);
        assert_eq!(path.current_alpha(), None);
        assert_eq!(path.effective_alpha(), 128.0);
    }

    #[test]
    fn test_eraser_uses_opaque_background() {
        let bg = Rgba::new(248, 248, 250, 10);
        let path = Path::from_stroke(line(2), PathTool::Eraser, Rgba::black(), 5.0, 20.0, bg).unwrap();
        assert_eq!(path.color(), Rgba::new(248, 248, 250, 255));
        assert_eq!(path.size(), 20.0);
    }

    #[test]
    fn test_temp_pen_tracks_live_alpha() {
        let mut path = Path::from_stroke(
            line(2),
            PathTool::TempPen,
            Rgba::new(0, 122, 255, 200),
            8.0,
            20.0,
            Rgba::white(),
        )
        .unwrap();
        assert_eq!(path.current_alpha(), Some(200.0));

        path.apply_fade(0.5);
        assert_eq!(path.effective_alpha(), 100.0);

        path.apply_fade(1.0);
        assert!(!path.is_visible());

        path.restore_alpha();
        assert_eq!(path.effective_alpha(), 200.0);
    }

    #[test]
    fn test_is_near_uses_half_size_plus_proximity() {
        let path = Path::new(line(2), Rgba::black(), 10.0, PathTool::Pen);
        // reach = 5 + 15 = 20, strictly less than
        assert!(path.is_near(Point::new(0.0, 19.9), 15.0));
        assert!(!path.is_near(Point::new(0.0, 20.0), 15.0));
        // only recorded points count, not the segment between them
        assert!(!path.is_near(Point::new(5.0, 25.0), 15.0));
    }

    #[test]
    fn test_bounds() {
        let path = Path::new(
            vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0), Point::new(50.0, 100.0)],
            Rgba::black(),
            4.0,
            PathTool::Pen,
        );
        let bounds = path.bounds();
        assert!((bounds.x0 + 2.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_stroke_ignores_identity() {
        let a = Path::new(line(3), Rgba::black(), 5.0, PathTool::Pen);
        let b = Path::new(line(3), Rgba::black(), 5.0, PathTool::Pen);
        assert_ne!(a.id(), b.id());
        assert!(a.same_stroke(&b));
    }
}
