//! Interaction controller: the drawing session state.

use crate::camera::ViewState;
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigResult, LINE_ERASER_PROXIMITY, SIDEBAR_WIDTH, SketchConfig};
use crate::error::{SketchError, SketchResult};
use crate::fade::{FadeController, FadeTick};
use crate::history::{History, HistoryEntry};
use crate::input::{ChromeRegions, Command, Modifiers, PointerEvent, UiChrome};
use crate::interpolate::Interpolator;
use crate::path::{Path, PathTool, Rgba};
use crate::store::{Collection, PathId, PathStore};
use crate::tools::{PresetId, ToolKind, ToolSettings};
use kurbo::{Point, Size, Vec2};

/// What the pointer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// A stroke is in progress. The tool is captured when the stroke starts.
    Drawing { points: Vec<Point>, tool: PathTool },
    /// The view is being dragged.
    Panning { anchor_screen: Point, anchor_pan: Vec2 },
}

/// The in-progress stroke, as it should be drawn before it is finalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePreview<'a> {
    pub points: &'a [Point],
    pub color: Rgba,
    pub size: f64,
    pub tool: PathTool,
}

/// A sketch pad: paths, history, fade and view driven by pointer input.
#[derive(Debug)]
pub struct Sketchpad {
    /// Pan and zoom.
    pub view: ViewState,
    /// Full window size in screen pixels, sidebar included.
    pub viewport_size: Size,
    tools: ToolSettings,
    store: PathStore,
    history: History,
    fade: FadeController,
    interaction: Interaction,
    interpolator: Interpolator,
    line_eraser_proximity: f64,
    sidebar_width: f64,
    sidebar_visible: bool,
    chrome: Box<dyn UiChrome>,
    clock: Box<dyn Clock>,
}

impl Default for Sketchpad {
    fn default() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Sketchpad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with a custom time source.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            view: ViewState::new(),
            viewport_size: Size::new(800.0, 600.0),
            tools: ToolSettings::new(),
            store: PathStore::new(),
            history: History::new(),
            fade: FadeController::default(),
            interaction: Interaction::Idle,
            interpolator: Interpolator::default(),
            line_eraser_proximity: LINE_ERASER_PROXIMITY,
            sidebar_width: SIDEBAR_WIDTH,
            sidebar_visible: true,
            chrome: Box::new(ChromeRegions::new()),
            clock: Box::new(clock),
        }
    }

    /// Build a sketch pad from a validated configuration.
    pub fn from_config(config: &SketchConfig, clock: impl Clock + 'static) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            view: config.view_state()?,
            tools: config.tool_settings(),
            fade: config.fade_controller(),
            interpolator: config.interpolator()?,
            line_eraser_proximity: config.line_eraser_proximity,
            sidebar_width: config.sidebar_width,
            sidebar_visible: config.sidebar_visible,
            ..Self::with_clock(clock)
        })
    }

    /// Replace the UI chrome hit regions.
    pub fn set_chrome(&mut self, chrome: impl UiChrome + 'static) {
        self.chrome = Box::new(chrome);
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = Size::new(width, height);
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // --- Accessors ---

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    /// Pen and eraser settings. Tool switches go through [`Sketchpad::set_tool`].
    pub fn tools_mut(&mut self) -> &mut ToolSettings {
        &mut self.tools
    }

    pub fn store(&self) -> &PathStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn fade(&self) -> &FadeController {
        &self.fade
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.interaction, Interaction::Drawing { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.interaction, Interaction::Panning { .. })
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Paths in paint order: permanent first, then temporary ones that are
    /// still visible.
    pub fn visible_paths(&self) -> impl Iterator<Item = &Path> {
        self.store.iter(Collection::Permanent).chain(
            self.store
                .iter(Collection::Temporary)
                .filter(|path| path.is_visible()),
        )
    }

    // --- View ---

    /// Screen width covered by the sidebar, subtracted before the view transform.
    pub fn view_offset_x(&self) -> f64 {
        if self.sidebar_visible {
            self.sidebar_width
        } else {
            0.0
        }
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub fn set_sidebar_visible(&mut self, visible: bool) {
        self.sidebar_visible = visible;
    }

    /// Convert a screen point to logical drawing space.
    pub fn to_world(&self, screen: Point) -> Point {
        self.view.to_world(screen, self.view_offset_x())
    }

    /// Convert a logical point to screen space.
    pub fn to_screen(&self, world: Point) -> Point {
        self.view.to_screen(world, self.view_offset_x())
    }

    /// The part of the viewport not covered by the sidebar.
    pub fn drawing_area(&self) -> Size {
        Size::new(
            (self.viewport_size.width - self.view_offset_x()).max(0.0),
            self.viewport_size.height,
        )
    }

    /// Zoom in around the center of the drawing area.
    pub fn zoom_in(&mut self) -> bool {
        self.view.zoom_in(self.drawing_area())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.view.zoom_out(self.drawing_area())
    }

    /// Back to zoom 1 with no pan.
    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    // --- Tools ---

    /// Switch tools. Selecting the temporary pen counts as activity.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
        if tool == ToolKind::TempPen {
            self.fade.touch(self.clock.now_ms());
        }
    }

    /// Apply a preset, switching to its tool.
    pub fn select_preset(&mut self, id: PresetId) -> Option<ToolKind> {
        let Some(tool) = self.tools.select_preset(id) else {
            log::debug!("Unknown preset {:?}", id);
            return None;
        };
        self.set_tool(tool);
        Some(tool)
    }

    pub fn save_preset(&mut self, id: PresetId) -> bool {
        self.tools.save_preset(id)
    }

    // --- Input ---

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Cancel => self.pointer_cancel(),
        }
    }

    /// Execute the command bound to a key press, if any.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<Command> {
        let command = Command::from_key(key, modifiers)?;
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
        };
        Some(command)
    }

    pub fn pointer_down(&mut self, screen: Point) {
        if self.chrome.contains(screen) {
            log::debug!("Pointer down on UI chrome at {:?}", screen);
            return;
        }
        if screen.x <= self.view_offset_x() {
            return;
        }
        if let Interaction::Drawing { points, .. } = &self.interaction {
            // A down without an up starts over; the unfinished stroke is dropped
            log::debug!("Discarding unfinished stroke of {} point(s)", points.len());
        }
        self.interaction = Interaction::Idle;

        let world = self.to_world(screen);
        let tool = self.tools.tool();
        match tool {
            ToolKind::Pan => {
                self.interaction = Interaction::Panning {
                    anchor_screen: screen,
                    anchor_pan: self.view.offset,
                };
            }
            ToolKind::LineEraser => {
                self.apply_line_eraser(world);
            }
            ToolKind::Pen | ToolKind::TempPen | ToolKind::Eraser => {
                let Some(path_tool) = tool.path_tool() else {
                    return;
                };
                if path_tool == PathTool::TempPen {
                    self.fade.touch(self.clock.now_ms());
                    self.fade.cancel(&mut self.store);
                }
                self.interaction = Interaction::Drawing {
                    points: vec![world],
                    tool: path_tool,
                };
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if screen.x <= self.view_offset_x() {
            return;
        }
        let world = self.to_world(screen);
        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::Drawing { points, tool } => {
                self.interpolator.extend(points, world);
                if *tool == PathTool::TempPen {
                    self.fade.record_activity(self.clock.now_ms(), &mut self.store);
                }
            }
            Interaction::Panning {
                anchor_screen,
                anchor_pan,
            } => {
                self.view.offset = *anchor_pan + (screen - *anchor_screen);
            }
        }
    }

    /// End the current gesture, finalizing a stroke with at least two points.
    pub fn pointer_up(&mut self) {
        if let Interaction::Drawing { points, tool } = std::mem::take(&mut self.interaction) {
            if let Err(err) = self.finalize(points, tool) {
                log::debug!("Stroke discarded: {}", err);
            }
        }
    }

    /// Handled exactly like [`Sketchpad::pointer_up`].
    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    // --- Editing ---

    /// Turn a finished stroke into a path and record it in history.
    pub fn finalize(&mut self, points: Vec<Point>, tool: PathTool) -> SketchResult<PathId> {
        let path = Path::from_stroke(
            points,
            tool,
            self.tools.pen_color(),
            self.tools.pen_size(),
            self.tools.eraser_size(),
            self.tools.background(),
        )?;
        let target = match tool {
            PathTool::TempPen => Collection::Temporary,
            PathTool::Pen | PathTool::Eraser => Collection::Permanent,
        };
        let id = self.store.insert(path, target);
        self.history.record(HistoryEntry { path: id, target });
        if target == Collection::Temporary {
            self.fade.touch(self.clock.now_ms());
        }
        self.purge_detached();
        Ok(id)
    }

    /// Remove every path passing near `world`. Not undoable: a successful
    /// erase clears both history stacks.
    pub fn apply_line_eraser(&mut self, world: Point) -> usize {
        let proximity = self.line_eraser_proximity;
        let removed = [Collection::Permanent, Collection::Temporary]
            .into_iter()
            .map(|c| {
                self.store
                    .detach_where(c, |path| path.is_near(world, proximity))
                    .len()
            })
            .sum::<usize>();

        if removed > 0 {
            self.history.clear();
            self.purge_detached();
            log::info!("Line eraser removed {} path(s), history cleared", removed);
        }
        if self.store.is_empty(Collection::Temporary) {
            self.fade.reset();
        }
        removed
    }

    /// Undo the newest insertion. Returns false when nothing happened.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&mut self.store) {
            Ok(entry) => {
                if entry.target == Collection::Temporary
                    && self.store.is_empty(Collection::Temporary)
                {
                    self.fade.reset();
                }
                true
            }
            Err(err) => {
                log::debug!("Undo ignored: {}", err);
                false
            }
        }
    }

    /// Redo the newest undone insertion. Returns false when nothing happened.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&mut self.store) {
            Ok(entry) => {
                if entry.target == Collection::Temporary {
                    if let Some(path) = self.store.get_mut(entry.path) {
                        path.restore_alpha();
                    }
                    if self.tools.tool() == ToolKind::TempPen {
                        self.fade
                            .record_activity(self.clock.now_ms(), &mut self.store);
                    }
                }
                true
            }
            Err(err @ SketchError::StalePathReference { .. }) => {
                log::debug!("Redo dropped: {}", err);
                self.purge_detached();
                false
            }
            Err(err) => {
                log::debug!("Redo ignored: {}", err);
                false
            }
        }
    }

    /// Remove all paths and forget history.
    pub fn clear(&mut self) {
        self.store.clear();
        self.history.clear();
        self.fade.reset();
        log::info!("Canvas cleared");
    }

    // --- Frame ---

    /// Advance time-driven state by one render tick.
    pub fn tick(&mut self) -> FadeTick {
        let now = self.clock.now_ms();
        let drawing = match &self.interaction {
            Interaction::Drawing { tool, .. } => {
                if *tool == PathTool::TempPen {
                    self.fade.record_activity(now, &mut self.store);
                }
                true
            }
            _ => false,
        };
        let result = self.fade.tick(now, &mut self.store, drawing);
        if let FadeTick::Cleared { removed } = result {
            log::info!("Faded out {} temporary path(s)", removed);
            self.purge_detached();
        }
        result
    }

    /// The stroke being drawn, if any.
    pub fn preview(&self) -> Option<StrokePreview<'_>> {
        let Interaction::Drawing { points, tool } = &self.interaction else {
            return None;
        };
        let (color, size) = match tool {
            PathTool::Eraser => (self.tools.background().opaque(), self.tools.eraser_size()),
            PathTool::Pen | PathTool::TempPen => (self.tools.pen_color(), self.tools.pen_size()),
        };
        Some(StrokePreview {
            points,
            color,
            size,
            tool: *tool,
        })
    }

    fn purge_detached(&mut self) {
        let purged = self.store.purge_detached(&self.history.referenced());
        if purged > 0 {
            log::debug!("Purged {} unreferenced path record(s)", purged);
        }
    }
}
