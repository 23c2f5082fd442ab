//! Tool selection and stroke settings.

mod presets;

pub use presets::{PenPreset, PresetId, default_presets};

use crate::path::{PathTool, Rgba};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Pen size bounds and default, in logical units.
pub const MIN_PEN_SIZE: f64 = 1.0;
pub const MAX_PEN_SIZE: f64 = 50.0;
pub const DEFAULT_PEN_SIZE: f64 = 5.0;
/// Eraser size bounds and default, in logical units.
pub const MIN_ERASER_SIZE: f64 = 5.0;
pub const MAX_ERASER_SIZE: f64 = 100.0;
pub const DEFAULT_ERASER_SIZE: f64 = 20.0;
/// Default canvas background.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::rgb(248, 248, 250);

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pen,
    TempPen,
    Eraser,
    LineEraser,
    Pan,
}

impl ToolKind {
    /// The kind of path this tool leaves behind, if it draws at all.
    pub fn path_tool(self) -> Option<PathTool> {
        match self {
            ToolKind::Pen => Some(PathTool::Pen),
            ToolKind::TempPen => Some(PathTool::TempPen),
            ToolKind::Eraser => Some(PathTool::Eraser),
            ToolKind::LineEraser | ToolKind::Pan => None,
        }
    }

    /// Get display name for this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pen => "Pen",
            ToolKind::TempPen => "Temporary pen",
            ToolKind::Eraser => "Eraser",
            ToolKind::LineEraser => "Line eraser",
            ToolKind::Pan => "Pan",
        }
    }
}

/// Current tool and the stroke parameters new paths are built from.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    tool: ToolKind,
    pen_color: Rgba,
    pen_size: f64,
    eraser_size: f64,
    background: Rgba,
    pen_size_range: RangeInclusive<f64>,
    eraser_size_range: RangeInclusive<f64>,
    presets: Vec<PenPreset>,
    active_preset: Option<PresetId>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            pen_color: Rgba::black(),
            pen_size: DEFAULT_PEN_SIZE,
            eraser_size: DEFAULT_ERASER_SIZE,
            background: DEFAULT_BACKGROUND,
            pen_size_range: MIN_PEN_SIZE..=MAX_PEN_SIZE,
            eraser_size_range: MIN_ERASER_SIZE..=MAX_ERASER_SIZE,
            presets: default_presets(),
            active_preset: None,
        }
    }
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings with custom size ranges, defaults and presets.
    pub fn with_ranges(
        pen_size_range: RangeInclusive<f64>,
        pen_size: f64,
        eraser_size_range: RangeInclusive<f64>,
        eraser_size: f64,
        background: Rgba,
        presets: Vec<PenPreset>,
    ) -> Self {
        let mut settings = Self {
            pen_size_range,
            eraser_size_range,
            background,
            presets,
            ..Self::default()
        };
        settings.pen_size = settings.clamp_pen_size(pen_size);
        settings.eraser_size = settings.clamp_eraser_size(eraser_size);
        settings
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn pen_color(&self) -> Rgba {
        self.pen_color
    }

    pub fn pen_size(&self) -> f64 {
        self.pen_size
    }

    pub fn eraser_size(&self) -> f64 {
        self.eraser_size
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn presets(&self) -> &[PenPreset] {
        &self.presets
    }

    pub fn active_preset(&self) -> Option<PresetId> {
        self.active_preset
    }

    pub(crate) fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    fn clamp_pen_size(&self, size: f64) -> f64 {
        size.clamp(*self.pen_size_range.start(), *self.pen_size_range.end())
    }

    fn clamp_eraser_size(&self, size: f64) -> f64 {
        size.clamp(*self.eraser_size_range.start(), *self.eraser_size_range.end())
    }

    /// Set the pen color. Deselects the active preset.
    pub fn set_pen_color(&mut self, color: Rgba) {
        self.pen_color = color;
        self.active_preset = None;
    }

    /// Set the pen size, clamped to the allowed range. Deselects the active preset.
    pub fn set_pen_size(&mut self, size: f64) {
        self.pen_size = self.clamp_pen_size(size);
        self.active_preset = None;
    }

    /// Set the eraser size, clamped to the allowed range.
    pub fn set_eraser_size(&mut self, size: f64) {
        self.eraser_size = self.clamp_eraser_size(size);
    }

    pub fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    /// Apply a preset: its color (keeping the current pen alpha), size and tool.
    ///
    /// Returns the tool the preset switches to, or `None` for an unknown id.
    pub fn select_preset(&mut self, id: PresetId) -> Option<ToolKind> {
        let preset = self.presets.iter().find(|p| p.id == id)?.clone();
        let [r, g, b] = preset.color;
        self.pen_color = Rgba::new(r, g, b, self.pen_color.a);
        self.pen_size = self.clamp_pen_size(preset.size);
        self.tool = preset.tool;
        self.active_preset = Some(id);
        Some(preset.tool)
    }

    /// Store the current pen color, size and drawing tool into a preset.
    ///
    /// Only pen and temporary-pen are stored as the preset tool; other tools
    /// leave the preset's tool unchanged.
    pub fn save_preset(&mut self, id: PresetId) -> bool {
        let (color, size, tool) = (self.pen_color, self.pen_size, self.tool);
        let Some(preset) = self.presets.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        preset.color = [color.r, color.g, color.b];
        preset.size = size;
        if matches!(tool, ToolKind::Pen | ToolKind::TempPen) {
            preset.tool = tool;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ToolSettings::new();
        assert_eq!(settings.tool(), ToolKind::Pen);
        assert_eq!(settings.pen_color(), Rgba::black());
        assert_eq!(settings.pen_size(), DEFAULT_PEN_SIZE);
        assert_eq!(settings.eraser_size(), DEFAULT_ERASER_SIZE);
        assert_eq!(settings.presets().len(), 3);
    }

    #[test]
    fn test_sizes_are_clamped() {
        let mut settings = ToolSettings::new();
        settings.set_pen_size(500.0);
        assert_eq!(settings.pen_size(), MAX_PEN_SIZE);
        settings.set_pen_size(0.0);
        assert_eq!(settings.pen_size(), MIN_PEN_SIZE);
        settings.set_eraser_size(1.0);
        assert_eq!(settings.eraser_size(), MIN_ERASER_SIZE);
    }

    #[test]
    fn test_path_tool_mapping() {
        assert_eq!(ToolKind::Pen.path_tool(), Some(PathTool::Pen));
        assert_eq!(ToolKind::TempPen.path_tool(), Some(PathTool::TempPen));
        assert_eq!(ToolKind::Eraser.path_tool(), Some(PathTool::Eraser));
        assert_eq!(ToolKind::LineEraser.path_tool(), None);
        assert_eq!(ToolKind::Pan.path_tool(), None);
    }

    #[test]
    fn test_select_preset_keeps_alpha() {
        let mut settings = ToolSettings::new();
        settings.set_pen_color(Rgba::new(1, 2, 3, 100));

        let tool = settings.select_preset(PresetId(2));
        assert_eq!(tool, Some(ToolKind::TempPen));
        assert_eq!(settings.pen_color(), Rgba::new(0, 122, 255, 100));
        assert_eq!(settings.pen_size(), 8.0);
        assert_eq!(settings.tool(), ToolKind::TempPen);
        assert_eq!(settings.active_preset(), Some(PresetId(2)));
    }

    #[test]
    fn test_unknown_preset_is_noop() {
        let mut settings = ToolSettings::new();
        assert_eq!(settings.select_preset(PresetId(9)), None);
        assert_eq!(settings.active_preset(), None);
        assert!(!settings.save_preset(PresetId(9)));
    }

    #[test]
    fn test_editing_pen_deselects_preset() {
        let mut settings = ToolSettings::new();
        settings.select_preset(PresetId(1));
        settings.set_pen_size(12.0);
        assert_eq!(settings.active_preset(), None);

        settings.select_preset(PresetId(1));
        settings.set_pen_color(Rgba::white());
        assert_eq!(settings.active_preset(), None);
    }

    #[test]
    fn test_save_preset() {
        let mut settings = ToolSettings::new();
        settings.set_pen_color(Rgba::new(9, 8, 7, 255));
        settings.set_pen_size(30.0);
        settings.set_tool(ToolKind::Eraser);

        assert!(settings.save_preset(PresetId(2)));
        let preset = settings.presets().iter().find(|p| p.id == PresetId(2)).unwrap();
        assert_eq!(preset.color, [9, 8, 7]);
        assert_eq!(preset.size, 30.0);
        // Eraser is not a preset tool
        assert_eq!(preset.tool, ToolKind::TempPen);
    }
}
