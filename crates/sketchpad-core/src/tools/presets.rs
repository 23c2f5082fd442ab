//! Pen presets.

use super::ToolKind;
use serde::{Deserialize, Serialize};

/// Identifier of a preset slot (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetId(pub u8);

/// A saved pen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenPreset {
    pub id: PresetId,
    /// RGB only; the pen keeps its own alpha when a preset is applied.
    pub color: [u8; 3],
    pub size: f64,
    pub tool: ToolKind,
}

impl PenPreset {
    pub fn new(id: u8, color: [u8; 3], size: f64, tool: ToolKind) -> Self {
        Self {
            id: PresetId(id),
            color,
            size,
            tool,
        }
    }
}

/// The three built-in presets: fine black pen, blue temporary marker, thick yellow pen.
pub fn default_presets() -> Vec<PenPreset> {
    vec![
        PenPreset::new(1, [0, 0, 0], 2.0, ToolKind::Pen),
        PenPreset::new(2, [0, 122, 255], 8.0, ToolKind::TempPen),
        PenPreset::new(3, [255, 204, 0], 15.0, ToolKind::Pen),
    ]
}
