//! Shape definitions for the canvas editor.

mod circle;
mod polygon;
mod rectangle;

pub use circle::Circle;
pub use polygon::{MAX_POLYGON_POINTS, MIN_POLYGON_POINTS, Polygon, simplify_polygon};
pub use rectangle::Rectangle;

use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn gray() -> Self {
        Self::new(128, 128, 128, 255)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Outline color.
    pub stroke_color: SerializableColor,
    /// Outline width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        // White card with a gray outline.
        Self {
            stroke_color: SerializableColor::gray(),
            stroke_width: 2.0,
            fill_color: Some(SerializableColor::white()),
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Polygon,
}

/// Shapes defined by an anchor and a size (drawn with a box drag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxKind {
    Rectangle,
    Circle,
}

impl From<BoxKind> for ShapeKind {
    fn from(kind: BoxKind) -> Self {
        match kind {
            BoxKind::Rectangle => ShapeKind::Rectangle,
            BoxKind::Circle => ShapeKind::Circle,
        }
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Compute the box spanned by a drag from `anchor` along `drag`.
///
/// Returns the top-left position and a non-negative size. For circles the
/// side is the larger absolute delta component, growing away from the anchor
/// in the direction of the drag on each axis.
pub fn normalize_drag(kind: BoxKind, anchor: Point, drag: Vec2) -> (Point, Size) {
    match kind {
        BoxKind::Rectangle => {
            let end = anchor + drag;
            (
                Point::new(anchor.x.min(end.x), anchor.y.min(end.y)),
                Size::new(drag.x.abs(), drag.y.abs()),
            )
        }
        BoxKind::Circle => {
            let side = drag.x.abs().max(drag.y.abs());
            let x = if drag.x < 0.0 { anchor.x - side } else { anchor.x };
            let y = if drag.y < 0.0 { anchor.y - side } else { anchor.y };
            (Point::new(x, y), Size::new(side, side))
        }
    }
}

/// Create a rectangle or circle from a drag gesture.
///
/// The drag vector may point in any direction; the resulting shape always
/// has non-negative extents.
pub fn create_rectangle_or_circle(kind: BoxKind, anchor: Point, drag: Vec2) -> Shape {
    let (position, size) = normalize_drag(kind, anchor, drag);
    match kind {
        BoxKind::Rectangle => Shape::Rectangle(Rectangle::new(position, size.width, size.height)),
        BoxKind::Circle => Shape::Circle(Circle::new(position, size.width)),
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Axis-aligned bounds of a set of points.
pub(crate) fn points_bounds(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Common behavior for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Axis-aligned bounding box in canvas coordinates (rotation included).
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering, before rotation.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move the shape by a delta.
    fn translate(&mut self, delta: Vec2);
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Polygon(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Polygon(s) => s.bounds(),
        }
    }

    /// The unrotated box of the shape (its bounding box for polygons).
    pub fn frame(&self) -> Rect {
        match self {
            Shape::Rectangle(r) => r.frame(),
            Shape::Circle(c) => c.frame(),
            Shape::Polygon(p) => p.bounds(),
        }
    }

    pub fn center(&self) -> Point {
        self.frame().center()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Polygon(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Polygon(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Polygon(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
            Shape::Polygon(s) => s.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Circle(s) => s.translate(delta),
            Shape::Polygon(s) => s.translate(delta),
        }
    }

    /// Reference point used when dragging: the top-left anchor for
    /// rectangles and circles, the bounding box corner for polygons.
    pub fn origin(&self) -> Point {
        match self {
            Shape::Rectangle(r) => r.position,
            Shape::Circle(c) => c.position,
            Shape::Polygon(p) => {
                let b = p.bounds();
                Point::new(b.x0, b.y0)
            }
        }
    }

    /// Move the shape so its origin lands on `point`.
    pub fn move_origin_to(&mut self, point: Point) {
        let delta = point - self.origin();
        self.translate(delta);
    }

    /// Rotation about the center in degrees (0 for polygons).
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(r) => r.rotation,
            Shape::Circle(c) => c.rotation,
            Shape::Polygon(_) => 0.0,
        }
    }

    /// Set the rotation in degrees, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        match self {
            Shape::Rectangle(r) => r.rotation = normalize_rotation(degrees),
            Shape::Circle(c) => c.rotation = normalize_rotation(degrees),
            Shape::Polygon(_) => {}
        }
    }

    /// Check if this shape supports rotation.
    pub fn supports_rotation(&self) -> bool {
        matches!(self, Shape::Rectangle(_) | Shape::Circle(_))
    }

    /// Transform from the shape's local frame to canvas coordinates.
    pub fn transform(&self) -> Affine {
        let rotation = self.rotation();
        if rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(rotation.to_radians(), self.center())
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polygon_mut(&mut self) -> Option<&mut Polygon> {
        match self {
            Shape::Polygon(p) => Some(p),
            _ => None,
        }
    }
}

/// Axis-aligned bounds of `frame` after rotating it by `degrees` about its center.
pub(crate) fn rotated_bounds(frame: Rect, degrees: f64) -> Rect {
    if degrees == 0.0 {
        return frame;
    }
    let rot = Affine::rotate_about(degrees.to_radians(), frame.center());
    let corners = [
        Point::new(frame.x0, frame.y0),
        Point::new(frame.x1, frame.y0),
        Point::new(frame.x1, frame.y1),
        Point::new(frame.x0, frame.y1),
    ];
    let rotated: Vec<Point> = corners.iter().map(|&p| rot * p).collect();
    points_bounds(&rotated)
}
