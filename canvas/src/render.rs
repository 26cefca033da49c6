//! Render projection: shapes → draw instructions.
//!
//! This is a pure function of the model and the in-progress draft. It owns
//! nothing and mutates nothing; the presentation layer turns the resulting
//! instructions into pixels or markup.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{
    DEFAULT_STROKE, DEFAULT_STROKE_WIDTH, HANDLE_FILL, HANDLE_RADIUS, SELECTION_STROKE, SELECTION_STROKE_WIDTH,
};
use crate::doc::{Geometry, Shape, ShapeId, ShapeModel};
use crate::geometry::Point;
use crate::hit::ResizeHandle;

/// What to draw for one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    /// Normalized (non-negative) rectangle.
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Path { d: String },
}

/// Resolved paint attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paint {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

/// Rotation about a pivot. Paths have no known pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub rotation_deg: f64,
    pub pivot: Option<Point>,
}

/// Extra UI drawn over a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decoration {
    ResizeHandle { handle: ResizeHandle, center: Point, radius: f64, fill: &'static str },
}

/// One entry of the projection, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawInstruction {
    pub id: ShapeId,
    pub primitive: Primitive,
    pub paint: Paint,
    pub transform: Transform,
    pub decorations: Vec<Decoration>,
}

/// Project the model (and an optional in-progress draft, drawn last) into
/// draw instructions. Hidden shapes are omitted; handles are emitted only for
/// the selected shape.
#[must_use]
pub fn project(model: &ShapeModel, draft: Option<&Shape>) -> Vec<DrawInstruction> {
    let selected = model.selection();
    model
        .shapes()
        .iter()
        .filter(|s| s.visible)
        .chain(draft)
        .map(|s| instruction(s, selected == Some(s.id)))
        .collect()
}

fn instruction(shape: &Shape, selected: bool) -> DrawInstruction {
    let primitive = match &shape.geometry {
        Geometry::Rectangle(b) => {
            let n = b.normalized();
            Primitive::Rect { x: n.x, y: n.y, width: n.width, height: n.height }
        }
        Geometry::Circle(b) => {
            let c = b.center();
            Primitive::Circle { cx: c.x, cy: c.y, r: b.width.abs().max(b.height.abs()) / 2.0 }
        }
        Geometry::Path { d } => Primitive::Path { d: d.clone() },
    };

    let paint = Paint {
        fill: shape.fill.clone(),
        stroke: shape
            .stroke
            .clone()
            .unwrap_or_else(|| if selected { SELECTION_STROKE } else { DEFAULT_STROKE }.to_owned()),
        stroke_width: shape
            .stroke_width
            .unwrap_or(if selected { SELECTION_STROKE_WIDTH } else { DEFAULT_STROKE_WIDTH }),
    };

    let decorations = match shape.bounds() {
        Some(b) if selected => ResizeHandle::ALL
            .iter()
            .map(|&handle| Decoration::ResizeHandle {
                handle,
                center: b.corner(handle),
                radius: HANDLE_RADIUS,
                fill: HANDLE_FILL,
            })
            .collect(),
        _ => Vec::new(),
    };

    DrawInstruction {
        id: shape.id,
        primitive,
        paint,
        transform: Transform { rotation_deg: shape.rotation, pivot: shape.center() },
        decorations,
    }
}
