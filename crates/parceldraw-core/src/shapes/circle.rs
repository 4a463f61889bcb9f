//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle described by its bounding square.
///
/// Only a diameter is stored, so width and height can never diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Top-left corner of the bounding square.
    pub position: Point,
    /// Side of the bounding square.
    pub diameter: f64,
    /// Rotation in degrees (around center), in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new circle.
    pub fn new(position: Point, diameter: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            diameter,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn size(&self) -> Size {
        Size::new(self.diameter, self.diameter)
    }

    /// The bounding square.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    pub fn center(&self) -> Point {
        self.frame().center()
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        // Rotation about the center leaves a circle's footprint unchanged.
        self.frame()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = (point - self.center()).hypot();
        if self.style.fill_color.is_some() {
            dist <= self.radius() + tolerance
        } else {
            (dist - self.radius()).abs() <= tolerance
        }
    }

    fn to_path(&self) -> BezPath {
        Ellipse::from_rect(self.frame()).to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
