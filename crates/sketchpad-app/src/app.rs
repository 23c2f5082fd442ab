//! Headless application shell: command line, config and export.

use crate::session::{Replay, Session, SessionError};
use clap::Parser;
use sketchpad_core::{ConfigError, SketchConfig};
use sketchpad_render::{ExportError, export_png_to_file};
use std::path::PathBuf;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Replay a recorded SketchPad session and export the drawing as PNG.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "sketchpad", version, about = "SketchPad headless session replay")]
pub struct Cli {
    /// Recorded input session (JSON).
    #[arg(value_name = "SESSION.json", required_unless_present = "shortcuts")]
    pub session: Option<PathBuf>,

    /// Where to write the PNG.
    #[arg(value_name = "OUT.png", required_unless_present = "shortcuts")]
    pub output: Option<PathBuf>,

    /// Engine config file. Defaults to the per-user config location.
    #[arg(short, long, value_name = "CONFIG.json")]
    pub config: Option<PathBuf>,

    /// List keyboard shortcuts and exit.
    #[arg(long, conflicts_with_all = ["session", "output", "config"])]
    pub shortcuts: bool,
}

impl Cli {
    /// Paths for a replay run, unless only shortcuts were asked for.
    pub fn replay_config(&self) -> Option<AppConfig> {
        Some(AppConfig {
            session_path: self.session.clone()?,
            output_path: self.output.clone()?,
            config_path: self.config.clone(),
        })
    }
}

/// Paths for one replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub session_path: PathBuf,
    pub output_path: PathBuf,
    /// Explicit config file; otherwise the per-user default location is tried.
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load the engine config: the explicit file, else the default location
    /// if it exists, else built-in defaults.
    pub fn load_sketch_config(&self) -> Result<SketchConfig, ConfigError> {
        match &self.config_path {
            Some(path) => SketchConfig::load(path),
            None => match SketchConfig::default_path() {
                Some(path) => SketchConfig::load_or_default(path),
                None => Ok(SketchConfig::default()),
            },
        }
    }
}

/// Replay a session and export the result.
pub struct App;

impl App {
    pub fn run(config: &AppConfig) -> Result<(), AppError> {
        let sketch_config = config.load_sketch_config()?;
        let session = Session::load(&config.session_path)?;
        log::info!(
            "Session {:?}: {}x{} viewport, {} ms frames",
            config.session_path,
            session.viewport.width,
            session.viewport.height,
            session.frame_interval_ms
        );

        let mut replay = Replay::new(&sketch_config, &session)?;
        replay.run(&session);
        export_png_to_file(replay.sketchpad(), &config.output_path)?;
        Ok(())
    }
}
