use tracing::{debug, info};

use crate::consts::{HANDLE_RADIUS, ROTATE_STEP_DEG};
use crate::doc::{Origin, Shape, ShapeId, ShapeModel, ShapePatch};
use crate::error::EditorError;
use crate::geometry::{BoundingBox, Point, ScreenRect, ViewBox, ViewportTransform};
use crate::hit::{self, PointerTarget, ResizeHandle};
use crate::import;
use crate::input::{self, InputState, Tool, UiState};
use crate::render::{self, DrawInstruction};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// What changed, returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated(ShapeId),
    ShapeUpdated(ShapeId),
    ShapeDeleted(ShapeId),
    SelectionChanged(Option<ShapeId>),
    ViewBoxChanged(ViewBox),
    RenderNeeded,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Ids of the appended shapes, in document order.
    pub added: Vec<ShapeId>,
    /// The view box adopted from the document, if it declared one.
    pub view_box: Option<ViewBox>,
}

impl ImportReport {
    /// The import expressed as host actions.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.added.iter().copied().map(Action::ShapeCreated).collect();
        if let Some(view_box) = self.view_box {
            actions.push(Action::ViewBoxChanged(view_box));
        }
        actions.push(Action::RenderNeeded);
        actions
    }
}

/// One editing session: the shape model, the gesture in progress, and the
/// toolbar state that drives them.
///
/// Single-writer. Every mutation goes through a method here; hosts that
/// render from another thread should snapshot via [`EditorSession::project`].
#[derive(Debug, Default)]
pub struct EditorSession {
    pub model: ShapeModel,
    pub ui: UiState,
    pub input: InputState,
    view_box: ViewBox,
    screen: ScreenRect,
    busy: bool,
}

impl EditorSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a specific document frame instead of the default.
    #[must_use]
    pub fn with_view_box(view_box: ViewBox) -> Self {
        Self { view_box, ..Self::default() }
    }

    // --- Viewport ---

    /// Record where the canvas sits on screen, in CSS pixels.
    pub fn set_screen(&mut self, screen: ScreenRect) {
        self.screen = screen;
    }

    #[must_use]
    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// Current screen → document mapping, derived from the view box and the
    /// screen rect.
    #[must_use]
    pub fn viewport(&self) -> ViewportTransform {
        ViewportTransform::fit(self.view_box, self.screen)
    }

    // --- Toolbar ---

    /// Set the active drawing tool. Takes effect on the next draw.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    /// Set the color picker value; recolors the selected shape when idle.
    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        color.clone_into(&mut self.ui.color);
        self.recolor_selected(color)
    }

    /// Select a shape (e.g. from the layer panel) or clear with `None`.
    /// Unknown ids are ignored, as is any call while a gesture is active.
    pub fn select(&mut self, id: Option<ShapeId>) -> Vec<Action> {
        if !self.input.is_idle() {
            debug!("ignoring selection change during an active gesture");
            return Vec::new();
        }
        if self.model.selection() == id || !self.model.select(id) {
            return Vec::new();
        }
        self.sync_color_to_selection();
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    // --- Pointer input ---

    /// Pointer pressed at a screen position; the target is found by hit-testing.
    pub fn on_pointer_down(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.viewport().screen_to_document(screen_pt);
        let target = hit::hit_test(pt, &self.model, HANDLE_RADIUS);
        self.begin_gesture(pt, target)
    }

    /// Pointer pressed on a target the host already resolved (e.g. from DOM
    /// event targets).
    pub fn on_pointer_down_on(&mut self, screen_pt: Point, target: PointerTarget) -> Vec<Action> {
        let pt = self.viewport().screen_to_document(screen_pt);
        self.begin_gesture(pt, target)
    }

    /// Pointer moved; updates whatever the active gesture is shaping.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let pt = self.viewport().screen_to_document(screen_pt);
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Drawing { draft, start } => {
                let start = *start;
                let patch = ShapePatch { width: Some(pt.x - start.x), height: Some(pt.y - start.y), ..Default::default() };
                draft.apply(&patch);
                vec![Action::RenderNeeded]
            }
            InputState::Dragging { id } => {
                let id = *id;
                let Some(b) = self.model.get(&id).and_then(Shape::bounds) else {
                    return Vec::new();
                };
                let origin = input::drag_origin(b, pt);
                let patch = ShapePatch { x: Some(origin.x), y: Some(origin.y), ..Default::default() };
                self.write_through(id, &patch)
            }
            InputState::Resizing { id, handle, anchor } => {
                let (id, handle, anchor) = (*id, *handle, *anchor);
                let Some(b) = self.model.get(&id).and_then(Shape::bounds) else {
                    return Vec::new();
                };
                let resized = input::resize_box(b, handle, anchor, pt);
                self.write_through(id, &resize_patch(handle, &resized))
            }
        }
    }

    /// Pointer released: commits a draw, ends a drag or resize.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::Drawing { draft, .. } => {
                let id = draft.id;
                debug!(%id, kind = ?draft.kind(), "committing drawn shape");
                if self.model.add(draft) {
                    vec![Action::ShapeCreated(id), Action::RenderNeeded]
                } else {
                    vec![Action::RenderNeeded]
                }
            }
            InputState::Dragging { .. } | InputState::Resizing { .. } => vec![Action::RenderNeeded],
        }
    }

    /// Pointer left the canvas. Same as releasing it, so no gesture can get stuck.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.on_pointer_up()
    }

    fn begin_gesture(&mut self, pt: Point, target: PointerTarget) -> Vec<Action> {
        if !self.input.is_idle() {
            debug!("ignoring pointer-down during an active gesture");
            return Vec::new();
        }
        match target {
            PointerTarget::Canvas => {
                let tool = self.ui.tool;
                let name = format!("{} {}", tool.label(), self.model.len() + 1);
                let draft = Shape::new(tool.seed_geometry(pt), self.ui.color.clone(), name, Origin::Drawn);
                self.input = InputState::Drawing { draft, start: pt };
                let mut actions = Vec::new();
                if self.model.selection().is_some() {
                    self.model.select(None);
                    actions.push(Action::SelectionChanged(None));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            PointerTarget::Handle(handle) => {
                let Some(shape) = self.model.selected_shape().filter(|s| s.visible) else {
                    return Vec::new();
                };
                let Some(b) = shape.bounds() else {
                    return Vec::new();
                };
                self.input = InputState::Resizing { id: shape.id, handle, anchor: b.corner(handle.opposite()) };
                Vec::new()
            }
            PointerTarget::Shape(id) => {
                if self.model.get(&id).is_none() {
                    return Vec::new();
                }
                let mut actions = self.select(Some(id));
                self.input = InputState::Dragging { id };
                if actions.is_empty() {
                    actions.push(Action::RenderNeeded);
                }
                actions
            }
        }
    }

    // --- Selection commands (idle only) ---

    /// Delete the selected shape and clear the selection.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.idle_selection() else {
            return Vec::new();
        };
        if self.model.remove(&id).is_none() {
            return Vec::new();
        }
        debug!(%id, "deleted shape");
        vec![Action::ShapeDeleted(id), Action::SelectionChanged(None), Action::RenderNeeded]
    }

    /// Add one rotation step to the selected shape. Rotation accumulates
    /// without wrapping.
    pub fn rotate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.idle_selection() else {
            return Vec::new();
        };
        let Some(rotation) = self.model.get(&id).map(|s| s.rotation) else {
            return Vec::new();
        };
        self.write_through(id, &ShapePatch { rotation: Some(rotation + ROTATE_STEP_DEG), ..Default::default() })
    }

    /// Change the selected shape's fill.
    pub fn recolor_selected(&mut self, fill: &str) -> Vec<Action> {
        let Some(id) = self.idle_selection() else {
            return Vec::new();
        };
        self.write_through(id, &ShapePatch { fill: Some(fill.to_owned()), ..Default::default() })
    }

    fn idle_selection(&self) -> Option<ShapeId> {
        if self.input.is_idle() { self.model.selection() } else { None }
    }

    // --- Layers ---

    /// Move a layer; `target` outside the sequence is a no-op.
    pub fn move_layer(&mut self, index: usize, target: isize) -> Vec<Action> {
        if self.model.move_layer(index, target) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Flip a shape's visibility. Order and selection are untouched.
    pub fn toggle_visibility(&mut self, id: &ShapeId) -> Vec<Action> {
        if self.model.toggle_visibility(id) { vec![Action::ShapeUpdated(*id), Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Import and generation ---

    /// Import SVG text: adopt its view box and append its shapes.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Import`] if the text is not a well-formed
    /// document; the session is left untouched in that case.
    pub fn import_svg(&mut self, text: &str) -> Result<ImportReport, EditorError> {
        let doc = import::parse_svg(text)?;
        if let Some(view_box) = doc.view_box {
            self.view_box = view_box;
        }
        let mut added = Vec::with_capacity(doc.shapes.len());
        for shape in doc.shapes {
            let id = shape.id;
            if self.model.add(shape) {
                added.push(id);
            }
        }
        info!(added = added.len(), total = self.model.len(), "imported svg");
        Ok(ImportReport { added, view_box: doc.view_box })
    }

    /// Validate a prompt and mark a generation request as outstanding.
    /// Returns the trimmed prompt to send.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Validation`] for a blank prompt or while another
    /// request is outstanding.
    pub fn begin_generation(&mut self, prompt: &str) -> Result<String, EditorError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(EditorError::Validation("please enter a prompt".to_owned()));
        }
        if self.busy {
            return Err(EditorError::Validation("a generation request is already in progress".to_owned()));
        }
        self.busy = true;
        info!(prompt_len = prompt.len(), "generation requested");
        Ok(prompt.to_owned())
    }

    /// Resolve the outstanding generation request with the collaborator's
    /// outcome: SVG text is imported, an error message becomes a
    /// [`EditorError::RemoteFailure`].
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::RemoteFailure`] or [`EditorError::Import`].
    pub fn finish_generation(&mut self, outcome: Result<String, String>) -> Result<ImportReport, EditorError> {
        self.busy = false;
        match outcome {
            Ok(svg) => self.import_svg(&svg),
            Err(message) => Err(EditorError::RemoteFailure(message)),
        }
    }

    /// Whether a generation request is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // --- Queries ---

    /// Draw instructions for the current state, in paint order.
    #[must_use]
    pub fn project(&self) -> Vec<DrawInstruction> {
        render::project(&self.model, self.input.draft())
    }

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.model.selection()
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.model.get(id)
    }

    // --- Helpers ---

    fn write_through(&mut self, id: ShapeId, patch: &ShapePatch) -> Vec<Action> {
        if self.model.update(&id, patch) { vec![Action::ShapeUpdated(id), Action::RenderNeeded] } else { Vec::new() }
    }

    fn sync_color_to_selection(&mut self) {
        if let Some(shape) = self.model.selected_shape() {
            self.ui.color.clone_from(&shape.fill);
        }
    }
}

/// Patch carrying only the fields `handle` owns.
fn resize_patch(handle: ResizeHandle, b: &BoundingBox) -> ShapePatch {
    let (x, y) = match handle {
        ResizeHandle::Se => (None, None),
        ResizeHandle::Nw => (Some(b.x), Some(b.y)),
        ResizeHandle::Ne => (None, Some(b.y)),
        ResizeHandle::Sw => (Some(b.x), None),
    };
    ShapePatch { x, y, width: Some(b.width), height: Some(b.height), ..Default::default() }
}
