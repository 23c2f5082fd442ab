//! SketchPad Core Library
//!
//! Platform-agnostic drawing engine: view transform, stroke interpolation,
//! path storage, undo/redo history and the fading temporary pen.

pub mod camera;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod fade;
pub mod history;
pub mod input;
pub mod interpolate;
pub mod path;
pub mod store;
pub mod tools;

pub use camera::ViewState;
pub use canvas::{Interaction, Sketchpad, StrokePreview};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ConfigResult, SketchConfig};
pub use error::{SketchError, SketchResult};
pub use fade::{FadeController, FadeTick};
pub use history::{History, HistoryEntry};
pub use input::{ChromeRegions, Command, KeyBinding, Modifiers, PointerEvent, UiChrome};
pub use interpolate::Interpolator;
pub use path::{Path, PathTool, Rgba};
pub use store::{Collection, PathId, PathStore};
pub use tools::{PenPreset, PresetId, ToolKind, ToolSettings};
