//! Coordinate math: screen ↔ document mapping and bounding boxes.
//!
//! Everything here is pure arithmetic. The viewport transform mirrors the
//! screen CTM of an `<svg>` element: a translation plus an independent scale
//! per axis, so a view box whose aspect ratio differs from the on-screen
//! rectangle still maps exactly.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_VIEW_BOX_SIZE;
use crate::hit::ResizeHandle;

/// A point in either screen or document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate this point by `deg` degrees (clockwise in y-down space) about `pivot`.
    #[must_use]
    pub fn rotate_about(self, pivot: Point, deg: f64) -> Point {
        let (sin, cos) = deg.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Point { x: pivot.x + dx * cos - dy * sin, y: pivot.y + dx * sin + dy * cos }
    }
}

// =============================================================
// View box
// =============================================================

/// The document coordinate frame, as declared by an SVG `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self { min_x: 0.0, min_y: 0.0, width: DEFAULT_VIEW_BOX_SIZE, height: DEFAULT_VIEW_BOX_SIZE }
    }
}

impl ViewBox {
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        Self { min_x, min_y, width, height }
    }

    /// Parse a `viewBox` attribute value: four numbers separated by whitespace
    /// and/or commas. Returns `None` unless all four are finite and the
    /// width and height are positive.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut values = [0.0_f64; 4];
        let mut count = 0;
        for token in raw.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
            if count == 4 {
                return None;
            }
            let Ok(value) = token.parse::<f64>() else {
                return None;
            };
            if !value.is_finite() {
                return None;
            }
            values[count] = value;
            count += 1;
        }
        let [min_x, min_y, width, height] = values;
        if count != 4 || width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self { min_x, min_y, width, height })
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

// =============================================================
// Viewport transform
// =============================================================

/// On-screen placement of the canvas element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the rect has a usable (positive) area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Document → screen affine map without skew.
///
/// `screen = document * scale + translate`, per axis. Both scales must be
/// non-zero; [`ViewportTransform::fit`] and the default guarantee that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self { scale_x: 1.0, scale_y: 1.0, translate_x: 0.0, translate_y: 0.0 }
    }
}

impl ViewportTransform {
    /// Map `view_box` onto `screen`, scaling x and y independently.
    ///
    /// Falls back to the identity when the screen rect has no area.
    #[must_use]
    pub fn fit(view_box: ViewBox, screen: ScreenRect) -> Self {
        if !screen.has_area() {
            return Self::default();
        }
        let scale_x = screen.width / view_box.width;
        let scale_y = screen.height / view_box.height;
        Self {
            scale_x,
            scale_y,
            translate_x: screen.x - view_box.min_x * scale_x,
            translate_y: screen.y - view_box.min_y * scale_y,
        }
    }

    /// Convert a screen-space point (CSS pixels) to document coordinates.
    #[must_use]
    pub fn screen_to_document(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.translate_x) / self.scale_x,
            y: (screen.y - self.translate_y) / self.scale_y,
        }
    }

    /// Convert a document-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn document_to_screen(&self, doc: Point) -> Point {
        Point {
            x: doc.x * self.scale_x + self.translate_x,
            y: doc.y * self.scale_y + self.translate_y,
        }
    }

    /// Convert a screen-space distance to document units along the
    /// coarser axis, so pick radii never shrink below their on-screen size.
    #[must_use]
    pub fn screen_dist_to_document(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale_x.abs().min(self.scale_y.abs())
    }
}

/// Map a screen pointer position into document space.
#[must_use]
pub fn to_document_space(pointer: Point, viewport: &ViewportTransform) -> Point {
    viewport.screen_to_document(pointer)
}

// =============================================================
// Bounding box
// =============================================================

/// Axis-aligned box in document space.
///
/// `width` and `height` are signed: a box drawn up or to the left of its
/// start point has negative extents until it is normalized for display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rotation pivot and circle center: `(x + width/2, y + height/2)`.
    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    /// The same box with non-negative extents and `(x, y)` at its min corner.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            x: self.x.min(self.x + self.width),
            y: self.y.min(self.y + self.height),
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }

    /// Position of a corner handle on the stored (signed) box.
    #[must_use]
    pub fn corner(&self, handle: ResizeHandle) -> Point {
        match handle {
            ResizeHandle::Nw => Point::new(self.x, self.y),
            ResizeHandle::Ne => Point::new(self.x + self.width, self.y),
            ResizeHandle::Se => Point::new(self.x + self.width, self.y + self.height),
            ResizeHandle::Sw => Point::new(self.x, self.y + self.height),
        }
    }

    /// Whether `pt` lies inside the normalized box (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        let n = self.normalized();
        pt.x >= n.x && pt.x <= n.x + n.width && pt.y >= n.y && pt.y <= n.y + n.height
    }

    /// Axis-aligned bounds of this box after rotating it `deg` degrees about
    /// its center.
    #[must_use]
    pub fn rotated_bounds(&self, deg: f64) -> Self {
        let n = self.normalized();
        let (sin, cos) = deg.to_radians().sin_cos();
        let w = n.width * cos.abs() + n.height * sin.abs();
        let h = n.width * sin.abs() + n.height * cos.abs();
        let c = n.center();
        Self { x: c.x - w / 2.0, y: c.y - h / 2.0, width: w, height: h }
    }
}
