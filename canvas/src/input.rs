//! Input model: tools and the gesture state machine.
//!
//! `Tool` captures which kind of shape a pointer-down on empty canvas starts
//! drawing. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up, carrying only the transient context needed to
//! compute geometry on each move. Nothing in it outlives the gesture.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Geometry, Shape, ShapeId};
use crate::geometry::{BoundingBox, Point};
use crate::hit::ResizeHandle;

/// Which drawing tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Draw a rectangle (default).
    #[default]
    Rectangle,
    /// Draw a circle.
    Circle,
}

impl Tool {
    /// Zero-extent geometry of this tool's kind anchored at `at`.
    #[must_use]
    pub fn seed_geometry(self, at: Point) -> Geometry {
        let b = BoundingBox::new(at.x, at.y, 0.0, 0.0);
        match self {
            Self::Rectangle => Geometry::Rectangle(b),
            Self::Circle => Geometry::Circle(b),
        }
    }

    /// Display label prefix for shapes drawn with this tool.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
        }
    }
}

/// Persistent UI state visible to the renderer and the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Currently active drawing tool.
    pub tool: Tool,
    /// Color picker value: fill for new shapes, synced to the selection.
    pub color: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::default(), color: crate::consts::DEFAULT_DRAW_COLOR.to_owned() }
    }
}

/// Gesture state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A new shape is being sized. It is not in the model until pointer-up.
    Drawing {
        /// The provisional shape.
        draft: Shape,
        /// Document-space point where the drag started.
        start: Point,
    },
    /// The selected shape re-centers under the pointer on every move.
    Dragging {
        /// Id of the shape being dragged.
        id: ShapeId,
    },
    /// A corner handle is being dragged while its opposite corner stays put.
    Resizing {
        /// Id of the shape being resized.
        id: ShapeId,
        /// Which corner handle was grabbed.
        handle: ResizeHandle,
        /// The opposite corner at gesture start; fixed for the whole gesture.
        anchor: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The provisional shape of an in-progress draw.
    #[must_use]
    pub fn draft(&self) -> Option<&Shape> {
        match self {
            Self::Drawing { draft, .. } => Some(draft),
            _ => None,
        }
    }
}

/// Box produced by dragging `handle` to `pointer` while `anchor` (the
/// opposite corner) stays fixed.
///
/// Only the fields the handle owns change: `se` touches width and height,
/// `nw` moves x and y and adjusts both extents, `ne` and `sw` mix the two.
/// Everything is derived from the anchor, never from the previous pointer
/// sample, so repeated moves cannot drift.
#[must_use]
pub fn resize_box(current: &BoundingBox, handle: ResizeHandle, anchor: Point, pointer: Point) -> BoundingBox {
    let mut b = *current;
    match handle {
        ResizeHandle::Se => {
            b.width = pointer.x - anchor.x;
            b.height = pointer.y - anchor.y;
        }
        ResizeHandle::Nw => {
            b.x = pointer.x;
            b.y = pointer.y;
            b.width = anchor.x - pointer.x;
            b.height = anchor.y - pointer.y;
        }
        ResizeHandle::Ne => {
            b.y = pointer.y;
            b.width = pointer.x - anchor.x;
            b.height = anchor.y - pointer.y;
        }
        ResizeHandle::Sw => {
            b.x = pointer.x;
            b.width = anchor.x - pointer.x;
            b.height = pointer.y - anchor.y;
        }
    }
    b
}

/// Position that centers a box of the given extents under `pointer`.
#[must_use]
pub fn drag_origin(b: &BoundingBox, pointer: Point) -> Point {
    Point { x: pointer.x - b.width / 2.0, y: pointer.y - b.height / 2.0 }
}
