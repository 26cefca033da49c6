//! Layer ordering: the layer panel's view of the shape sequence.
//!
//! The panel lists shapes in sequence order, index 0 first. One primitive,
//! [`ShapeModel::move_layer`], implements both chevrons by moving a shape
//! one slot up or down the sequence.

#[cfg(test)]
#[path = "layers_test.rs"]
mod layers_test;

use serde::Serialize;

use crate::doc::{Origin, ShapeId, ShapeKind, ShapeModel};

/// One row of the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub index: usize,
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub name: String,
    pub visible: bool,
    pub selected: bool,
    /// Drives the "imported" marker on the row.
    pub imported: bool,
}

impl ShapeModel {
    /// Remove the shape at `index` and reinsert it at `target`.
    ///
    /// A `target` outside `[0, len)` is a no-op, which is what lets callers
    /// compute `index ± 1` without bounds checks. Negative targets are
    /// accepted for the same reason.
    pub fn move_layer(&mut self, index: usize, target: isize) -> bool {
        let Ok(target) = usize::try_from(target) else {
            return false;
        };
        self.reorder(index, target)
    }

    /// Move a layer one slot later in paint order (drawn above its neighbor).
    pub fn move_layer_up(&mut self, index: usize) -> bool {
        match isize::try_from(index) {
            Ok(i) => self.move_layer(index, i.saturating_add(1)),
            Err(_) => false,
        }
    }

    /// Move a layer one slot earlier in paint order.
    pub fn move_layer_down(&mut self, index: usize) -> bool {
        match isize::try_from(index) {
            Ok(i) => self.move_layer(index, i - 1),
            Err(_) => false,
        }
    }

    /// Flip a shape's visibility. Returns `false` for unknown ids.
    pub fn toggle_visibility(&mut self, id: &ShapeId) -> bool {
        let Some(visible) = self.get(id).map(|s| s.visible) else {
            return false;
        };
        self.set_visibility(id, !visible)
    }

    /// Rows for the layer panel, in sequence order.
    #[must_use]
    pub fn layer_entries(&self) -> Vec<LayerEntry> {
        let selected = self.selection();
        self.shapes()
            .iter()
            .enumerate()
            .map(|(index, shape)| LayerEntry {
                index,
                id: shape.id,
                kind: shape.kind(),
                name: shape.name.clone(),
                visible: shape.visible,
                selected: selected == Some(shape.id),
                imported: shape.origin == Origin::Imported,
            })
            .collect()
    }
}
