//! Normalized input events and UI chrome hit regions.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/pen/touch handling.
///
/// Positions are screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The platform aborted the gesture. Handled exactly like `Up`.
    Cancel,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editing commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Undo,
    Redo,
}

/// A command-key chord bound to a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    /// Lowercase key.
    pub key: char,
    /// Required Shift state; `None` accepts either.
    pub shift: Option<bool>,
    pub command: Command,
}

impl KeyBinding {
    fn matches(&self, key: char, shift: bool) -> bool {
        self.key == key && self.shift.is_none_or(|required| required == shift)
    }

    /// Display form, e.g. "Ctrl/Cmd+Shift+Z".
    pub fn label(&self) -> String {
        let key = self.key.to_ascii_uppercase();
        if self.shift == Some(true) {
            format!("Ctrl/Cmd+Shift+{key}")
        } else {
            format!("Ctrl/Cmd+{key}")
        }
    }
}

const BINDINGS: [KeyBinding; 3] = [
    KeyBinding {
        key: 'z',
        shift: Some(false),
        command: Command::Undo,
    },
    KeyBinding {
        key: 'z',
        shift: Some(true),
        command: Command::Redo,
    },
    KeyBinding {
        key: 'y',
        shift: None,
        command: Command::Redo,
    },
];

impl Command {
    /// Every keyboard binding, in display order.
    pub fn bindings() -> &'static [KeyBinding] {
        &BINDINGS
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Undo => "Undo",
            Command::Redo => "Redo",
        }
    }

    /// Map a key press to a command.
    ///
    /// Command+Z undoes, Command+Shift+Z and Command+Y redo.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        if !modifiers.command() {
            return None;
        }
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        let c = c.to_ascii_lowercase();
        BINDINGS
            .iter()
            .find(|binding| binding.matches(c, modifiers.shift))
            .map(|binding| binding.command)
    }
}

/// Answers whether a screen point belongs to UI chrome rather than the canvas.
pub trait UiChrome: std::fmt::Debug {
    fn contains(&self, screen: Point) -> bool;
}

/// UI chrome described as a set of screen rectangles (buttons, toolbars).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChromeRegions {
    regions: Vec<Rect>,
}

impl ChromeRegions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rects(regions: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            regions: regions.into_iter().collect(),
        }
    }

    /// Register a reserved rectangle.
    pub fn add(&mut self, rect: Rect) {
        self.regions.push(rect);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }
}

impl UiChrome for ChromeRegions {
    fn contains(&self, screen: Point) -> bool {
        // Edges count as inside
        self.regions.iter().any(|r| {
            screen.x >= r.x0 && screen.x <= r.x1 && screen.y >= r.y0 && screen.y <= r.y1
        })
    }
}
