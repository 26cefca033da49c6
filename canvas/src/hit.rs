#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Geometry, Shape, ShapeId, ShapeModel};
use crate::geometry::Point;

/// Corner handle of the selected shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    Ne,
    Se,
    Sw,
}

impl ResizeHandle {
    /// All handles in display order.
    pub const ALL: [ResizeHandle; 4] = [Self::Nw, Self::Ne, Self::Se, Self::Sw];

    /// The diagonally opposite handle, which stays fixed while this one is dragged.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Nw => Self::Se,
            Self::Ne => Self::Sw,
            Self::Se => Self::Nw,
            Self::Sw => Self::Ne,
        }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    /// The body of a shape.
    Shape(ShapeId),
    /// A resize handle of the currently selected shape.
    Handle(ResizeHandle),
}

/// Resolve a document-space point to a pointer target.
///
/// Handles of the selected shape win over bodies; bodies are tested topmost
/// first and hidden shapes are skipped. Path geometry is opaque, so paths are
/// never hit here.
#[must_use]
pub fn hit_test(pt: Point, model: &ShapeModel, handle_radius: f64) -> PointerTarget {
    // Hidden shapes draw no handles, so they have none to grab.
    if let Some(b) = model.selected_shape().filter(|s| s.visible).and_then(Shape::bounds) {
        for handle in ResizeHandle::ALL {
            if b.corner(handle).distance(pt) <= handle_radius {
                return PointerTarget::Handle(handle);
            }
        }
    }

    model
        .shapes()
        .iter()
        .rev()
        .find(|s| s.visible && hits_body(s, pt))
        .map_or(PointerTarget::Canvas, |s| PointerTarget::Shape(s.id))
}

fn hits_body(shape: &Shape, pt: Point) -> bool {
    match &shape.geometry {
        Geometry::Rectangle(b) => {
            b.rotated_bounds(shape.rotation).contains(pt) && b.contains(pt.rotate_about(b.center(), -shape.rotation))
        }
        // Rotation about its own center leaves a circle unchanged.
        Geometry::Circle(b) => pt.distance(b.center()) <= b.width.abs().max(b.height.abs()) / 2.0,
        Geometry::Path { .. } => false,
    }
}
