//! Document model: shapes, their properties, and the ordered shape store.
//!
//! This module defines the editable unit (`Shape`), its kind-dependent
//! geometry (`Geometry`), a sparse-update type for incremental edits
//! (`ShapePatch`), and the runtime store that owns all live shapes together
//! with the current selection (`ShapeModel`).
//!
//! Sequence order is paint order: later shapes paint on top. The selection
//! is held by id and resolved on read, so deleting a shape can never leave a
//! dangling reference behind.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{BoundingBox, Point};

/// Unique identifier for a shape. Freshly generated, never reused.
pub type ShapeId = Uuid;

/// The kind of a shape, without its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Path,
}

/// Kind-dependent geometry. The variant is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    /// Axis-aligned rectangle.
    Rectangle(BoundingBox),
    /// Circle with enclosing-square semantics: radius is half the larger
    /// extent magnitude, centered in the box.
    Circle(BoundingBox),
    /// Opaque path data, passed through to the renderer uninterpreted.
    Path { d: String },
}

impl Geometry {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Path { .. } => ShapeKind::Path,
        }
    }

    /// The bounding box of a rectangle or circle; `None` for paths.
    #[must_use]
    pub fn bounds(&self) -> Option<&BoundingBox> {
        match self {
            Self::Rectangle(b) | Self::Circle(b) => Some(b),
            Self::Path { .. } => None,
        }
    }

    fn bounds_mut(&mut self) -> Option<&mut BoundingBox> {
        match self {
            Self::Rectangle(b) | Self::Circle(b) => Some(b),
            Self::Path { .. } => None,
        }
    }
}

/// Whether a shape was drawn on the canvas or came from imported markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Drawn,
    Imported,
}

/// A shape as stored in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier for this shape.
    pub id: ShapeId,
    /// Kind and geometry.
    pub geometry: Geometry,
    /// Clockwise rotation in degrees around the bounding-box center.
    pub rotation: f64,
    /// Fill as a CSS color string.
    pub fill: String,
    /// Explicit stroke color; `None` means the renderer's default.
    pub stroke: Option<String>,
    /// Explicit stroke width; `None` means the renderer's default.
    pub stroke_width: Option<f64>,
    /// Hidden shapes stay in the model but are not painted.
    pub visible: bool,
    /// Display label for the layer panel. Not required to be unique.
    pub name: String,
    /// Drawn or imported.
    pub origin: Origin,
}

impl Shape {
    /// Create a visible, unrotated shape with a fresh id and no explicit stroke.
    #[must_use]
    pub fn new(geometry: Geometry, fill: impl Into<String>, name: impl Into<String>, origin: Origin) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            rotation: 0.0,
            fill: fill.into(),
            stroke: None,
            stroke_width: None,
            visible: true,
            name: name.into(),
            origin,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.geometry.bounds()
    }

    /// Rotation pivot: the bounding-box center. `None` for paths.
    #[must_use]
    pub fn center(&self) -> Option<Point> {
        self.bounds().map(BoundingBox::center)
    }

    /// Apply a sparse update. Box fields are ignored for paths.
    pub fn apply(&mut self, patch: &ShapePatch) {
        if let Some(b) = self.geometry.bounds_mut() {
            if let Some(x) = patch.x {
                b.x = x;
            }
            if let Some(y) = patch.y {
                b.y = y;
            }
            if let Some(w) = patch.width {
                b.width = w;
            }
            if let Some(h) = patch.height {
                b.height = h;
            }
        }
        if let Some(r) = patch.rotation {
            self.rotation = r;
        }
        if let Some(ref fill) = patch.fill {
            self.fill.clone_from(fill);
        }
        if let Some(v) = patch.visible {
            self.visible = v;
        }
        if let Some(ref name) = patch.name {
            self.name.clone_from(name);
        }
    }
}

/// Sparse update for a shape. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Ordered store of shapes plus the current selection.
///
/// Every operation tolerates unknown ids and out-of-range indices as no-ops
/// so that stale UI callbacks racing a deletion cannot corrupt the model.
#[derive(Debug, Clone, Default)]
pub struct ShapeModel {
    shapes: Vec<Shape>,
    selected: Option<ShapeId>,
}

impl ShapeModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of the paint order. Returns `false` (and leaves
    /// the model unchanged) if a shape with the same id is already present.
    pub fn add(&mut self, shape: Shape) -> bool {
        if self.index_of(&shape.id).is_some() {
            return false;
        }
        self.shapes.push(shape);
        true
    }

    /// Remove a shape by id, returning it if it was present. Clears the
    /// selection when it pointed at the removed shape.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.shapes.remove(index))
    }

    /// Apply a partial update. Returns `false` if the shape doesn't exist.
    pub fn update(&mut self, id: &ShapeId, patch: &ShapePatch) -> bool {
        let Some(shape) = self.get_mut(id) else {
            return false;
        };
        shape.apply(patch);
        true
    }

    /// Replace the selection. Selecting an unknown id is a no-op and returns
    /// `false`; `None` always clears.
    pub fn select(&mut self, id: Option<ShapeId>) -> bool {
        match id {
            Some(id) if self.index_of(&id).is_none() => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    /// Move the shape at `from` so it ends up at `to`, shifting the others.
    /// Out-of-range indices leave the sequence untouched and return `false`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.shapes.len();
        if from >= len || to >= len {
            return false;
        }
        let shape = self.shapes.remove(from);
        self.shapes.insert(to, shape);
        true
    }

    /// Show or hide a shape. Never touches order or selection.
    pub fn set_visibility(&mut self, id: &ShapeId, visible: bool) -> bool {
        self.update(id, &ShapePatch { visible: Some(visible), ..Default::default() })
    }

    // --- Queries ---

    /// The selected shape's id. Always resolves to a present shape.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.selected
    }

    #[must_use]
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == *id)
    }

    /// Position of a shape in paint order.
    #[must_use]
    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == *id)
    }

    /// All shapes in paint order (bottom first).
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
