use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{DEFAULT_COLOR, FONT_SIZE_PX, HIT_TOLERANCE_PX, LINE_HEIGHT_PX, LINE_WIDTH_PX};
use crate::doc::{DocStore, Element, ElementId, ElementKind, Point};
use crate::hit::{self, FixedAdvanceMetrics, HitPart, TextMetrics};
use crate::input::{Button, InputState, Tool, UiState};
use crate::persist::{self, PersistError};
use crate::render;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Fewest points a freehand stroke needs to be kept on release.
const MIN_STROKE_POINTS: usize = 2;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId },
    ElementDeleted { id: ElementId },
    SelectionChanged(Option<ElementId>),
    RenderNeeded,
}

/// Asks the user for a line of text. `None` or an empty string cancels.
pub trait TextPrompt {
    fn request_text(&mut self) -> Option<String>;
}

impl<F> TextPrompt for F
where
    F: FnMut() -> Option<String>,
{
    fn request_text(&mut self) -> Option<String> {
        self()
    }
}

/// Prompt that always cancels. Installed until the host provides a real one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl TextPrompt for NoPrompt {
    fn request_text(&mut self) -> Option<String> {
        None
    }
}

/// Tunable editing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Pick radius in pixels for vertices.
    pub tolerance: f64,
    /// Color given to new elements.
    pub color: String,
    /// Label font size in pixels.
    pub font_size: f64,
    /// Height of a label's hit box above its baseline.
    pub line_height: f64,
    /// Stroke width for strokes and lines.
    pub line_width: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: HIT_TOLERANCE_PX,
            color: DEFAULT_COLOR.to_owned(),
            font_size: FONT_SIZE_PX,
            line_height: LINE_HEIGHT_PX,
            line_width: LINE_WIDTH_PX,
        }
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub input: InputState,
    pub config: EngineConfig,
    metrics: Box<dyn TextMetrics>,
    prompt: Box<dyn TextPrompt>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            doc: DocStore::new(),
            ui: UiState::default(),
            input: InputState::default(),
            metrics: Box::new(FixedAdvanceMetrics::new(config.font_size, config.line_height)),
            config,
            prompt: Box::new(NoPrompt),
        }
    }

    // --- Collaborators ---

    /// Replace the text measurer used for label hit-testing.
    pub fn set_metrics(&mut self, metrics: Box<dyn TextMetrics>) {
        self.metrics = metrics;
    }

    /// Replace the text-entry collaborator used by the text tool.
    pub fn set_prompt(&mut self, prompt: Box<dyn TextPrompt>) {
        self.prompt = prompt;
    }

    // --- Documents ---

    /// Replace the whole document from its JSON interchange form.
    ///
    /// The editing session is reset on success.
    ///
    /// # Errors
    ///
    /// Returns the decode error and leaves the current document untouched
    /// when `json` is malformed.
    pub fn load_document(&mut self, json: &str) -> Result<Vec<Action>, PersistError> {
        let elements = match persist::decode_document(json) {
            Ok(elements) => elements,
            Err(err) => {
                log::warn!("document load rejected: {err}");
                return Err(err);
            }
        };
        log::debug!("loaded document with {} elements", elements.len());
        self.doc.replace_all(elements);
        self.reset_session();
        Ok(vec![Action::SelectionChanged(None), Action::RenderNeeded])
    }

    /// Serialize the committed document. The in-progress element is not included.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] if serialization fails.
    pub fn save_document(&self) -> Result<String, PersistError> {
        persist::encode_document(&self.doc)
    }

    // --- Tool ---

    /// Set the active tool, discarding any gesture and selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let had_selection = self.ui.selected_id.is_some();
        if matches!(self.input, InputState::Drawing { .. }) {
            log::debug!("discarding in-progress {} on switch to {tool}", self.ui.tool);
        }
        self.ui.tool = tool;
        self.reset_session();

        let mut actions = Vec::new();
        if had_selection {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn reset_session(&mut self) {
        self.input = InputState::Idle;
        self.ui.selected_id = None;
        self.doc.clear_selected();
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match self.ui.tool {
            Tool::Select => self.select_at(pt),
            Tool::Brush => self.begin_drawing(Element::stroke(vec![pt], self.config.color.clone())),
            Tool::Line => self.begin_drawing(Element::line(pt, pt, self.config.color.clone())),
            Tool::Eraser => self.erase_at(pt),
            Tool::Text => self.place_label(pt),
        }
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Drawing { element } => {
                match &mut element.kind {
                    ElementKind::Stroke { points } => points.push(pt),
                    ElementKind::Line { b, .. } => *b = pt,
                    ElementKind::Label { .. } => return Vec::new(),
                }
                vec![Action::RenderNeeded]
            }
            InputState::DraggingPoint { id, index } => {
                let (id, index) = (*id, *index);
                let moved = self
                    .doc
                    .get_mut(&id)
                    .is_some_and(|element| element.set_vertex(index, pt));
                if moved {
                    vec![Action::ElementUpdated { id }, Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn on_pointer_up(&mut self, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Drawing { element } => self.commit(element),
            InputState::DraggingPoint { .. } => vec![Action::RenderNeeded],
        }
    }

    fn select_at(&mut self, pt: Point) -> Vec<Action> {
        let hit = hit::hit_test(pt, &self.doc, self.config.tolerance, self.metrics.as_ref());
        let picked = hit.map(|h| h.element_id);

        let mut actions = Vec::new();
        if picked != self.ui.selected_id {
            actions.push(Action::SelectionChanged(picked));
        }
        self.doc.clear_selected();
        self.ui.selected_id = picked;
        self.input = InputState::Idle;

        if let Some(hit) = hit {
            if let Some(element) = self.doc.get_mut(&hit.element_id) {
                element.selected = true;
            }
            // Labels move by their anchor, which is their only vertex.
            let index = match hit.part {
                HitPart::Vertex(index) => index,
                HitPart::TextBox => 0,
            };
            self.input = InputState::DraggingPoint { id: hit.element_id, index };
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_drawing(&mut self, element: Element) -> Vec<Action> {
        self.input = InputState::Drawing { element };
        vec![Action::RenderNeeded]
    }

    fn commit(&mut self, element: Element) -> Vec<Action> {
        if let ElementKind::Stroke { points } = &element.kind {
            if points.len() < MIN_STROKE_POINTS {
                log::debug!("discarding stroke with {} point(s)", points.len());
                return vec![Action::RenderNeeded];
            }
        }
        log::debug!("committing {} {}", element.kind_name(), element.id);
        self.doc.append(element.clone());
        vec![Action::ElementCreated(element), Action::RenderNeeded]
    }

    fn erase_at(&mut self, pt: Point) -> Vec<Action> {
        let Some(id) = self
            .doc
            .find_near(pt, self.config.tolerance, self.metrics.as_ref())
            .map(|e| e.id)
        else {
            return Vec::new();
        };
        self.doc.remove(&id);
        log::debug!("erased {id}");

        let mut actions = vec![Action::ElementDeleted { id }];
        if self.ui.selected_id == Some(id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn place_label(&mut self, pt: Point) -> Vec<Action> {
        let Some(text) = self.prompt.request_text().filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        let element = Element::label(pt, text, self.config.color.clone());
        self.doc.append(element.clone());
        vec![Action::ElementCreated(element), Action::RenderNeeded]
    }

    // --- Queries ---

    /// The currently active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.ui.selected_id
    }

    /// Index of the vertex being dragged, if a drag is in progress.
    #[must_use]
    pub fn drag_index(&self) -> Option<usize> {
        match self.input {
            InputState::DraggingPoint { index, .. } => Some(index),
            _ => None,
        }
    }

    /// The stroke or line being drawn, not yet part of the document.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Element> {
        match &self.input {
            InputState::Drawing { element } => Some(element),
            _ => None,
        }
    }

    /// Look up an element by ID.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }
}

/// Measures label text with the canvas context at the label font.
struct CanvasMetrics {
    ctx: CanvasRenderingContext2d,
    fallback: FixedAdvanceMetrics,
}

impl TextMetrics for CanvasMetrics {
    fn text_width(&self, text: &str) -> f64 {
        self.ctx.set_font(&render::label_font(self.fallback.font_size));
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => self.fallback.text_width(text),
        }
    }

    fn line_height(&self) -> f64 {
        self.fallback.line_height
    }
}

/// Text entry through the browser's blocking `window.prompt`.
struct WindowPrompt;

impl TextPrompt for WindowPrompt {
    fn request_text(&mut self) -> Option<String> {
        let window = web_sys::window()?;
        match window.prompt_with_message("Enter text:") {
            Ok(text) => text,
            Err(err) => {
                log::warn!("text prompt failed: {err:?}");
                None
            }
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D rendering context.
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("context is not a CanvasRenderingContext2d"))?;

        let fallback = FixedAdvanceMetrics::new(config.font_size, config.line_height);
        let mut core = EngineCore::with_config(config);
        core.set_metrics(Box::new(CanvasMetrics { ctx: ctx.clone(), fallback }));
        core.set_prompt(Box::new(WindowPrompt));
        log::debug!("engine attached to {}x{} canvas", canvas.width(), canvas.height());
        Ok(Self { canvas, ctx, core })
    }

    // --- Delegated inputs ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(pt, button)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(pt)
    }

    pub fn on_pointer_up(&mut self, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(button)
    }

    /// # Errors
    ///
    /// See [`EngineCore::load_document`].
    pub fn load_document(&mut self, json: &str) -> Result<Vec<Action>, PersistError> {
        self.core.load_document(json)
    }

    /// # Errors
    ///
    /// See [`EngineCore::save_document`].
    pub fn save_document(&self) -> Result<String, PersistError> {
        self.core.save_document()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        render::draw(
            &self.ctx,
            &self.core.doc,
            self.core.in_progress(),
            &self.core.config,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        )
    }

    /// Rendered pixels as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the browser refuses to encode the canvas.
    pub fn export_png(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.core.selection()
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.core.element(id)
    }
}
