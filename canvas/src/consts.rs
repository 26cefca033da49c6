//! Shared constants for the canvas crate.

// ── Document ────────────────────────────────────────────────────

/// Side length of the default square view box, in document units.
pub const DEFAULT_VIEW_BOX_SIZE: f64 = 2048.0;

// ── Paint ───────────────────────────────────────────────────────

/// Fill applied to newly drawn shapes until the user picks another color.
pub const DEFAULT_DRAW_COLOR: &str = "#FF0000";

/// Fill given to imported elements that carry no `fill` attribute.
pub const DEFAULT_IMPORT_FILL: &str = "#000000";

/// Stroke used for shapes without an explicit stroke.
pub const DEFAULT_STROKE: &str = "#000";

/// Stroke used for the selected shape when it has no explicit stroke.
pub const SELECTION_STROKE: &str = "#2196f3";

/// Stroke width for shapes without an explicit width.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Stroke width for the selected shape without an explicit width.
pub const SELECTION_STROKE_WIDTH: f64 = 2.0;

// ── Handles ─────────────────────────────────────────────────────

/// Radius of a resize handle, in document units. Also the pick radius.
pub const HANDLE_RADIUS: f64 = 4.0;

/// Fill color of resize handles.
pub const HANDLE_FILL: &str = "#2196f3";

// ── Editing ─────────────────────────────────────────────────────

/// Degrees added by one rotate command.
pub const ROTATE_STEP_DEG: f64 = 45.0;
