#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn make_rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::new(Geometry::Rectangle(BoundingBox::new(x, y, w, h)), "#FF0000", "Rectangle", Origin::Drawn)
}

fn make_path(d: &str) -> Shape {
    Shape::new(Geometry::Path { d: d.to_owned() }, "#000000", "Imported path 1", Origin::Imported)
}

fn model_with(n: usize) -> (ShapeModel, Vec<ShapeId>) {
    let mut model = ShapeModel::new();
    let mut ids = Vec::new();
    for i in 0..n {
        #[allow(clippy::cast_precision_loss)]
        let shape = make_rect(i as f64, 0.0, 10.0, 10.0);
        ids.push(shape.id);
        assert!(model.add(shape));
    }
    (model, ids)
}

fn order(model: &ShapeModel) -> Vec<ShapeId> {
    model.shapes().iter().map(|s| s.id).collect()
}

// =============================================================
// Shape
// =============================================================

#[test]
fn shape_new_defaults() {
    let s = make_rect(0.0, 0.0, 1.0, 1.0);
    assert_eq!(s.rotation, 0.0);
    assert!(s.visible);
    assert!(s.stroke.is_none());
    assert!(s.stroke_width.is_none());
    assert_eq!(s.kind(), ShapeKind::Rectangle);
}

#[test]
fn shape_new_ids_are_unique() {
    let a = make_rect(0.0, 0.0, 1.0, 1.0);
    let b = make_rect(0.0, 0.0, 1.0, 1.0);
    assert_ne!(a.id, b.id);
}

#[test]
fn shape_center_of_box() {
    let s = make_rect(10.0, 10.0, 20.0, 40.0);
    assert_eq!(s.center(), Some(Point::new(20.0, 30.0)));
}

#[test]
fn shape_path_has_no_bounds_or_center() {
    let s = make_path("M0 0L10 10");
    assert!(s.bounds().is_none());
    assert!(s.center().is_none());
    assert_eq!(s.kind(), ShapeKind::Path);
}

#[test]
fn shape_apply_patch_updates_only_present_fields() {
    let mut s = make_rect(1.0, 2.0, 3.0, 4.0);
    s.apply(&ShapePatch { x: Some(9.0), fill: Some("#00FF00".into()), ..Default::default() });
    assert_eq!(s.bounds(), Some(&BoundingBox::new(9.0, 2.0, 3.0, 4.0)));
    assert_eq!(s.fill, "#00FF00");
    assert_eq!(s.name, "Rectangle");
}

#[test]
fn shape_apply_patch_ignores_box_fields_for_paths() {
    let mut s = make_path("M0 0");
    s.apply(&ShapePatch { x: Some(5.0), width: Some(5.0), rotation: Some(45.0), ..Default::default() });
    assert_eq!(s.geometry, Geometry::Path { d: "M0 0".into() });
    assert_eq!(s.rotation, 45.0);
}

#[test]
fn shape_kind_is_not_patchable() {
    let mut s = Shape::new(Geometry::Circle(BoundingBox::new(0.0, 0.0, 4.0, 4.0)), "#fff", "c", Origin::Drawn);
    s.apply(&ShapePatch { width: Some(10.0), ..Default::default() });
    assert_eq!(s.kind(), ShapeKind::Circle);
}

// =============================================================
// Serde
// =============================================================

#[test]
fn kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ShapeKind::Rectangle).unwrap(), "\"rectangle\"");
    assert_eq!(serde_json::to_string(&ShapeKind::Path).unwrap(), "\"path\"");
}

#[test]
fn geometry_serializes_tagged() {
    let json = serde_json::to_value(Geometry::Circle(BoundingBox::new(1.0, 2.0, 3.0, 4.0))).unwrap();
    assert_eq!(json["kind"], "circle");
    assert_eq!(json["width"], 3.0);

    let json = serde_json::to_value(Geometry::Path { d: "M1 1".into() }).unwrap();
    assert_eq!(json["kind"], "path");
    assert_eq!(json["d"], "M1 1");
}

#[test]
fn shape_serde_roundtrip() {
    let s = make_rect(1.0, 2.0, -3.0, 4.0);
    let json = serde_json::to_string(&s).unwrap();
    let back: Shape = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn patch_skips_absent_fields() {
    let json = serde_json::to_value(ShapePatch { rotation: Some(90.0), ..Default::default() }).unwrap();
    assert_eq!(json, serde_json::json!({ "rotation": 90.0 }));
}

// =============================================================
// ShapeModel: add / remove
// =============================================================

#[test]
fn model_new_is_empty() {
    let model = ShapeModel::new();
    assert!(model.is_empty());
    assert_eq!(model.len(), 0);
    assert!(model.selection().is_none());
}

#[test]
fn model_add_appends_on_top() {
    let (model, ids) = model_with(3);
    assert_eq!(order(&model), ids);
}

#[test]
fn model_add_rejects_duplicate_id() {
    let mut model = ShapeModel::new();
    let s = make_rect(0.0, 0.0, 1.0, 1.0);
    let dup = s.clone();
    assert!(model.add(s));
    assert!(!model.add(dup));
    assert_eq!(model.len(), 1);
}

#[test]
fn model_remove_returns_shape() {
    let (mut model, ids) = model_with(2);
    let removed = model.remove(&ids[0]).unwrap();
    assert_eq!(removed.id, ids[0]);
    assert_eq!(order(&model), vec![ids[1]]);
}

#[test]
fn model_remove_unknown_is_noop() {
    let (mut model, ids) = model_with(2);
    assert!(model.remove(&Uuid::new_v4()).is_none());
    assert_eq!(order(&model), ids);
}

#[test]
fn model_remove_selected_clears_selection() {
    let (mut model, ids) = model_with(2);
    assert!(model.select(Some(ids[1])));
    model.remove(&ids[1]);
    assert!(model.selection().is_none());
}

#[test]
fn model_remove_other_keeps_selection() {
    let (mut model, ids) = model_with(2);
    assert!(model.select(Some(ids[1])));
    model.remove(&ids[0]);
    assert_eq!(model.selection(), Some(ids[1]));
}

#[test]
fn model_ids_stay_unique_and_selection_resolves_across_add_remove() {
    let mut model = ShapeModel::new();
    let mut live = Vec::new();
    for step in 0..40 {
        if step % 3 == 2 && !live.is_empty() {
            let id = live.remove(step % live.len());
            model.remove(&id);
        } else {
            let s = make_rect(0.0, 0.0, 1.0, 1.0);
            live.push(s.id);
            model.add(s);
            model.select(live.first().copied());
        }
        let mut seen = order(&model);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), model.len());
        if let Some(sel) = model.selection() {
            assert!(model.get(&sel).is_some());
        }
    }
}

// =============================================================
// ShapeModel: update / select
// =============================================================

#[test]
fn model_update_applies_patch() {
    let (mut model, ids) = model_with(1);
    assert!(model.update(&ids[0], &ShapePatch { width: Some(99.0), ..Default::default() }));
    assert_eq!(model.get(&ids[0]).unwrap().bounds().unwrap().width, 99.0);
}

#[test]
fn model_update_unknown_is_noop() {
    let (mut model, _) = model_with(1);
    assert!(!model.update(&Uuid::new_v4(), &ShapePatch { width: Some(99.0), ..Default::default() }));
}

#[test]
fn model_select_unknown_is_noop() {
    let (mut model, ids) = model_with(1);
    assert!(model.select(Some(ids[0])));
    assert!(!model.select(Some(Uuid::new_v4())));
    assert_eq!(model.selection(), Some(ids[0]));
}

#[test]
fn model_select_none_clears() {
    let (mut model, ids) = model_with(1);
    model.select(Some(ids[0]));
    assert!(model.select(None));
    assert!(model.selection().is_none());
    assert!(model.selected_shape().is_none());
}

#[test]
fn model_selected_shape_resolves() {
    let (mut model, ids) = model_with(2);
    model.select(Some(ids[1]));
    assert_eq!(model.selected_shape().map(|s| s.id), Some(ids[1]));
}

// =============================================================
// ShapeModel: reorder / visibility
// =============================================================

#[test]
fn model_reorder_moves_and_shifts() {
    let (mut model, ids) = model_with(4);
    assert!(model.reorder(0, 2));
    assert_eq!(order(&model), vec![ids[1], ids[2], ids[0], ids[3]]);
    assert!(model.reorder(3, 0));
    assert_eq!(order(&model), vec![ids[3], ids[1], ids[2], ids[0]]);
}

#[test]
fn model_reorder_out_of_range_is_noop() {
    let (mut model, ids) = model_with(3);
    assert!(!model.reorder(0, 3));
    assert!(!model.reorder(3, 0));
    assert_eq!(order(&model), ids);
}

#[test]
fn model_reorder_keeps_selection() {
    let (mut model, ids) = model_with(3);
    model.select(Some(ids[0]));
    model.reorder(0, 2);
    assert_eq!(model.selection(), Some(ids[0]));
}

#[test]
fn model_set_visibility() {
    let (mut model, ids) = model_with(2);
    assert!(model.set_visibility(&ids[0], false));
    assert!(!model.get(&ids[0]).unwrap().visible);
    assert_eq!(order(&model), ids);
}

#[test]
fn model_set_visibility_unknown_is_noop() {
    let (mut model, _) = model_with(1);
    assert!(!model.set_visibility(&Uuid::new_v4(), false));
}

#[test]
fn model_index_of() {
    let (model, ids) = model_with(3);
    assert_eq!(model.index_of(&ids[2]), Some(2));
    assert_eq!(model.index_of(&Uuid::new_v4()), None);
}
