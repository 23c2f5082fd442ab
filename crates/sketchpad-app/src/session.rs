//! Recorded input sessions and their replay.

use serde::{Deserialize, Serialize};
use sketchpad_core::{
    ConfigError, ManualClock, Modifiers, PointerEvent, PresetId, Rgba, SketchConfig, Sketchpad,
    ToolKind,
};
use std::path::Path;
use thiserror::Error;

/// Default time between render ticks (about 60 frames per second).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid session: {0}")]
    Invalid(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

fn default_frame_interval() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

/// Window size in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Pointer { event: PointerEvent },
    Tool { tool: ToolKind },
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Color { color: Rgba },
    Size { size: f64 },
    EraserSize { size: f64 },
    Background { color: Rgba },
    SelectPreset { id: PresetId },
    SavePreset { id: PresetId },
    ZoomIn,
    ZoomOut,
    ResetView,
    Sidebar { visible: bool },
    Undo,
    Redo,
    Clear,
    /// Let time pass, ticking every frame.
    Wait { ms: u64 },
}

/// A recorded session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
    /// Overrides the configured sidebar visibility.
    #[serde(default)]
    pub sidebar_visible: Option<bool>,
    pub steps: Vec<Step>,
}

impl Session {
    pub fn from_json(json: &str) -> SessionResult<Self> {
        let session: Self = serde_json::from_str(json)?;
        if session.frame_interval_ms == 0 {
            return Err(SessionError::Invalid(
                "frame_interval_ms must be positive".to_string(),
            ));
        }
        Ok(session)
    }

    pub fn load(path: impl AsRef<Path>) -> SessionResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

/// Drives a sketch pad from session steps on a manual clock.
#[derive(Debug)]
pub struct Replay {
    sketchpad: Sketchpad,
    clock: ManualClock,
    frame_interval_ms: u64,
    frames: u64,
}

impl Replay {
    pub fn new(config: &SketchConfig, session: &Session) -> SessionResult<Self> {
        let clock = ManualClock::new(0);
        let mut sketchpad = Sketchpad::from_config(config, clock.clone())?;
        sketchpad.set_viewport_size(session.viewport.width, session.viewport.height);
        if let Some(visible) = session.sidebar_visible {
            sketchpad.set_sidebar_visible(visible);
        }
        Ok(Self {
            sketchpad,
            clock,
            frame_interval_ms: session.frame_interval_ms.max(1),
            frames: 0,
        })
    }

    pub fn sketchpad(&self) -> &Sketchpad {
        &self.sketchpad
    }

    pub fn into_sketchpad(self) -> Sketchpad {
        self.sketchpad
    }

    /// Number of render ticks so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn now_ms(&self) -> u64 {
        self.sketchpad.now_ms()
    }

    /// Apply one step.
    pub fn apply(&mut self, step: &Step) {
        let pad = &mut self.sketchpad;
        match step {
            Step::Pointer { event } => pad.handle_pointer_event(*event),
            Step::Tool { tool } => pad.set_tool(*tool),
            Step::Key { key, modifiers } => {
                if pad.handle_key(key, *modifiers).is_none() {
                    log::debug!("Key {:?} has no binding", key);
                }
            }
            Step::Color { color } => pad.tools_mut().set_pen_color(*color),
            Step::Size { size } => pad.tools_mut().set_pen_size(*size),
            Step::EraserSize { size } => pad.tools_mut().set_eraser_size(*size),
            Step::Background { color } => pad.tools_mut().set_background(*color),
            Step::SelectPreset { id } => {
                pad.select_preset(*id);
            }
            Step::SavePreset { id } => {
                if !pad.save_preset(*id) {
                    log::warn!("No preset {:?} to save into", id);
                }
            }
            Step::ZoomIn => {
                pad.zoom_in();
            }
            Step::ZoomOut => {
                pad.zoom_out();
            }
            Step::ResetView => pad.reset_view(),
            Step::Sidebar { visible } => pad.set_sidebar_visible(*visible),
            Step::Undo => {
                pad.undo();
            }
            Step::Redo => {
                pad.redo();
            }
            Step::Clear => pad.clear(),
            Step::Wait { ms } => self.wait(*ms),
        }
    }

    /// Advance time by `ms`, ticking once per frame interval.
    pub fn wait(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(self.frame_interval_ms);
            self.clock.advance(step);
            self.sketchpad.tick();
            self.frames += 1;
            remaining -= step;
        }
    }

    /// Replay every step, then render one final frame.
    pub fn run(&mut self, session: &Session) {
        log::info!("Replaying {} step(s)", session.steps.len());
        for step in &session.steps {
            self.apply(step);
        }
        self.wait(self.frame_interval_ms);
        log::info!(
            "Replay finished at {} ms after {} frame(s)",
            self.now_ms(),
            self.frames
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use sketchpad_core::Collection;

    const SESSION: &str = r#"{
        "viewport": { "width": 800, "height": 600 },
        "sidebar_visible": false,
        "steps": [
            { "action": "size", "size": 8 },
            { "action": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 10 } } },
            { "action": "pointer", "event": { "kind": "move", "position": { "x": 60, "y": 10 } } },
            { "action": "pointer", "event": { "kind": "up", "position": { "x": 60, "y": 10 } } },
            { "action": "tool", "tool": "temp_pen" },
            { "action": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 50 } } },
            { "action": "pointer", "event": { "kind": "move", "position": { "x": 60, "y": 50 } } },
            { "action": "pointer", "event": { "kind": "cancel" } },
            { "action": "wait", "ms": 100 }
        ]
    }"#;

    #[test]
    fn test_parse_session() {
        let session = Session::from_json(SESSION).unwrap();
        assert_eq!(session.frame_interval_ms, DEFAULT_FRAME_INTERVAL_MS);
        assert_eq!(session.steps.len(), 9);
        assert_eq!(session.steps[0], Step::Size { size: 8.0 });
        assert_eq!(
            session.steps[7],
            Step::Pointer {
                event: PointerEvent::Cancel
            }
        );
    }

    #[test]
    fn test_zero_frame_interval_rejected() {
        let err = Session::from_json(r#"{ "frame_interval_ms": 0, "steps": [] }"#).unwrap_err();
        assert!(matches!(err, SessionError::Invalid(_)));
    }

    #[test]
    fn test_replay_draws_paths() {
        let session = Session::from_json(SESSION).unwrap();
        let mut replay = Replay::new(&SketchConfig::default(), &session).unwrap();
        replay.run(&session);

        let pad = replay.sketchpad();
        assert_eq!(pad.store().len(Collection::Permanent), 1);
        assert_eq!(pad.store().len(Collection::Temporary), 1);
        assert_eq!(pad.store().iter(Collection::Permanent).next().unwrap().size(), 8.0);
        assert_eq!(replay.now_ms(), 116);
        assert_eq!(replay.frames(), 8);
    }

    #[test]
    fn test_wait_lets_temporary_ink_fade() {
        let session = Session::from_json(SESSION).unwrap();
        let mut replay = Replay::new(&SketchConfig::default(), &session).unwrap();
        replay.run(&session);
        replay.apply(&Step::Tool {
            tool: ToolKind::Pen,
        });
        replay.apply(&Step::Wait { ms: 4000 });

        let pad = replay.sketchpad();
        assert!(pad.store().is_empty(Collection::Temporary));
        assert_eq!(pad.store().len(Collection::Permanent), 1);
    }

    #[test]
    fn test_key_steps_undo() {
        let session = Session::from_json(SESSION).unwrap();
        let mut replay = Replay::new(&SketchConfig::default(), &session).unwrap();
        replay.run(&session);
        replay.apply(&Step::Key {
            key: "z".to_string(),
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        });
        assert!(replay.sketchpad().store().is_empty(Collection::Temporary));
        assert!(replay.sketchpad().can_redo());
    }

    #[test]
    fn test_pan_step_moves_view() {
        let session = Session {
            viewport: Viewport::default(),
            frame_interval_ms: 16,
            sidebar_visible: Some(false),
            steps: vec![
                Step::Tool { tool: ToolKind::Pan },
                Step::Pointer {
                    event: PointerEvent::Down {
                        position: Point::new(100.0, 100.0),
                    },
                },
                Step::Pointer {
                    event: PointerEvent::Move {
                        position: Point::new(150.0, 130.0),
                    },
                },
                Step::Pointer {
                    event: PointerEvent::Up {
                        position: Point::new(150.0, 130.0),
                    },
                },
            ],
        };
        let mut replay = Replay::new(&SketchConfig::default(), &session).unwrap();
        replay.run(&session);
        assert_eq!(
            replay.sketchpad().to_world(Point::new(60.0, 40.0)),
            Point::new(10.0, 10.0)
        );
    }
}
