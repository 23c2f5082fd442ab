//! Tunable constants, loadable from a JSON file.

use crate::camera::{MAX_ZOOM, MIN_ZOOM, ViewState, ZOOM_INCREMENT};
use crate::fade::{FADE_DURATION_MS, FadeController, INACTIVITY_THRESHOLD_MS};
use crate::interpolate::{INTERPOLATION_STEP, Interpolator};
use crate::path::Rgba;
use crate::tools::{
    DEFAULT_BACKGROUND, DEFAULT_ERASER_SIZE, DEFAULT_PEN_SIZE, MAX_ERASER_SIZE, MAX_PEN_SIZE,
    MIN_ERASER_SIZE, MIN_PEN_SIZE, PenPreset, ToolSettings, default_presets,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default line-eraser reach beyond half the stroke size, in logical units.
pub const LINE_ERASER_PROXIMITY: f64 = 15.0;
/// Width of the tool sidebar, in screen pixels.
pub const SIDEBAR_WIDTH: f64 = 260.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Spacing of interpolated stroke points.
    pub interpolation_step: f64,
    /// Line-eraser reach beyond half the stroke size.
    pub line_eraser_proximity: f64,
    /// Idle time before temporary strokes fade.
    pub fade_inactivity_ms: u64,
    /// Duration of the temporary-stroke fade.
    pub fade_duration_ms: u64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_increment: f64,
    pub min_pen_size: f64,
    pub max_pen_size: f64,
    pub pen_size: f64,
    pub min_eraser_size: f64,
    pub max_eraser_size: f64,
    pub eraser_size: f64,
    pub background: Rgba,
    /// Screen width reserved for the sidebar while it is visible.
    pub sidebar_width: f64,
    pub sidebar_visible: bool,
    pub presets: Vec<PenPreset>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            interpolation_step: INTERPOLATION_STEP,
            line_eraser_proximity: LINE_ERASER_PROXIMITY,
            fade_inactivity_ms: INACTIVITY_THRESHOLD_MS,
            fade_duration_ms: FADE_DURATION_MS,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_increment: ZOOM_INCREMENT,
            min_pen_size: MIN_PEN_SIZE,
            max_pen_size: MAX_PEN_SIZE,
            pen_size: DEFAULT_PEN_SIZE,
            min_eraser_size: MIN_ERASER_SIZE,
            max_eraser_size: MAX_ERASER_SIZE,
            eraser_size: DEFAULT_ERASER_SIZE,
            background: DEFAULT_BACKGROUND,
            sidebar_width: SIDEBAR_WIDTH,
            sidebar_visible: true,
            presets: default_presets(),
        }
    }
}

impl SketchConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Read a config file, falling back to defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {:?}, using defaults", path.as_ref());
            Ok(Self::default())
        }
    }

    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    /// Default config location.
    ///
    /// On Unix: `~/.config/sketchpad/config.json`
    /// On Windows: `%APPDATA%\sketchpad\config.json`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sketchpad").join("config.json"))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.interpolation_step > 0.0 && self.interpolation_step.is_finite()) {
            return Err(invalid("interpolation_step must be positive"));
        }
        if !(self.line_eraser_proximity >= 0.0) {
            return Err(invalid("line_eraser_proximity must not be negative"));
        }
        if !(self.min_zoom > 0.0 && self.max_zoom.is_finite()) {
            return Err(invalid("zoom bounds must be positive"));
        }
        if self.min_zoom > self.max_zoom {
            return Err(invalid("min_zoom must not exceed max_zoom"));
        }
        if !(self.zoom_increment > 0.0 && self.zoom_increment.is_finite()) {
            return Err(invalid("zoom_increment must be positive"));
        }
        if !(self.min_pen_size > 0.0 && self.min_pen_size <= self.max_pen_size) {
            return Err(invalid("pen size range is empty or not positive"));
        }
        if !(self.min_eraser_size > 0.0 && self.min_eraser_size <= self.max_eraser_size) {
            return Err(invalid("eraser size range is empty or not positive"));
        }
        if !(self.sidebar_width >= 0.0) {
            return Err(invalid("sidebar_width must not be negative"));
        }
        Ok(())
    }

    pub fn interpolator(&self) -> ConfigResult<Interpolator> {
        Interpolator::new(self.interpolation_step).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn fade_controller(&self) -> FadeController {
        FadeController::new(self.fade_inactivity_ms, self.fade_duration_ms)
    }

    pub fn view_state(&self) -> ConfigResult<ViewState> {
        ViewState::with_limits(self.min_zoom, self.max_zoom, self.zoom_increment)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings::with_ranges(
            self.min_pen_size..=self.max_pen_size,
            self.pen_size,
            self.min_eraser_size..=self.max_eraser_size,
            self.eraser_size,
            self.background,
            self.presets.clone(),
        )
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}
