//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, rotated_bounds};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle, optionally rotated about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Rotation in degrees (around center), in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Corner rounding used when building the outline path.
    pub const CORNER_RADIUS: f64 = 8.0;

    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The unrotated box.
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        rotated_bounds(self.frame(), self.rotation)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let frame = self.frame();
        // Bring the point into the unrotated frame.
        let local = if self.rotation == 0.0 {
            point
        } else {
            Affine::rotate_about(-self.rotation.to_radians(), frame.center()) * point
        };
        let hit_area = frame.inflate(tolerance, tolerance);
        if self.style.fill_color.is_some() {
            hit_area.contains(local)
        } else {
            let inner = frame.inflate(-tolerance, -tolerance);
            hit_area.contains(local) && !inner.contains(local)
        }
    }

    fn to_path(&self) -> BezPath {
        let radius = Self::CORNER_RADIUS.min(self.width / 2.0).min(self.height / 2.0);
        RoundedRect::from_rect(self.frame(), radius).to_path(0.1)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert!(rect.rotation.abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(rect.hit_test(Point::new(105.0, 50.0), 10.0)); // Within tolerance
    }

    #[test]
    fn test_hit_test_rotated() {
        // 200x20 bar centered at (100, 10); a quarter turn makes it vertical.
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 200.0, 20.0);
        assert!(rect.hit_test(Point::new(190.0, 10.0), 0.0));
        rect.rotation = 90.0;
        assert!(!rect.hit_test(Point::new(190.0, 10.0), 0.0));
        assert!(rect.hit_test(Point::new(100.0, 95.0), 0.0));
    }

    #[test]
    fn test_outline_only_hit_test() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        rect.style.fill_color = None;
        assert!(rect.hit_test(Point::new(1.0, 50.0), 4.0));
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 4.0));
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_translate() {
        let mut rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        rect.translate(Vec2::new(5.0, -5.0));
        assert_eq!(rect.position, Point::new(15.0, 15.0));
    }
}
