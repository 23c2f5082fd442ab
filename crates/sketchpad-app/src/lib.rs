//! SketchPad Application
//!
//! Headless shell that replays recorded input sessions through the drawing
//! engine and exports the result as PNG.

mod app;
pub mod session;
mod shortcuts;

pub use app::{App, AppConfig, AppError, Cli};
pub use session::{Replay, Session, SessionError, Step};
pub use shortcuts::{print_shortcuts, shortcut_lines};
