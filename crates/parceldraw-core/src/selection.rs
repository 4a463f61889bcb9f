//! Selection handles, action buttons and resize math.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Radius of a drawn handle in canvas pixels.
pub const HANDLE_RADIUS: f64 = 6.0;
/// Side of one action button.
pub const ACTION_BUTTON_SIZE: f64 = 28.0;
/// Gap between action buttons in the cluster.
pub const ACTION_BUTTON_GAP: f64 = 4.0;
/// Distance of the action cluster above a polygon's first vertex.
pub const POLYGON_ACTION_OFFSET: f64 = 40.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for rectangles/circles.
    Corner(Corner),
    /// Edge midpoint handle for rectangles/circles.
    Edge(Edge),
    /// Vertex marker of a polygon.
    Vertex(usize),
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Which side of each axis a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Min,
    Max,
    Fixed,
}

impl HandleKind {
    /// Horizontal and vertical sides moved by this handle.
    fn sides(self) -> (Side, Side) {
        match self {
            HandleKind::Corner(Corner::TopLeft) => (Side::Min, Side::Min),
            HandleKind::Corner(Corner::TopRight) => (Side::Max, Side::Min),
            HandleKind::Corner(Corner::BottomLeft) => (Side::Min, Side::Max),
            HandleKind::Corner(Corner::BottomRight) => (Side::Max, Side::Max),
            HandleKind::Edge(Edge::Top) => (Side::Fixed, Side::Min),
            HandleKind::Edge(Edge::Right) => (Side::Max, Side::Fixed),
            HandleKind::Edge(Edge::Bottom) => (Side::Fixed, Side::Max),
            HandleKind::Edge(Edge::Left) => (Side::Min, Side::Fixed),
            HandleKind::Vertex(_) => (Side::Fixed, Side::Fixed),
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// Get the selection handles for a shape.
///
/// Rectangles and circles get the eight compass handles placed on their
/// rotated box; polygons get one marker per vertex.
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Rectangle(_) | Shape::Circle(_) => compass_handles(shape.frame(), shape.transform()),
        Shape::Polygon(poly) => poly
            .points()
            .iter()
            .enumerate()
            .map(|(i, &p)| Handle::new(p, HandleKind::Vertex(i)))
            .collect(),
    }
}

fn compass_handles(frame: Rect, transform: Affine) -> Vec<Handle> {
    let c = frame.center();
    [
        (Point::new(frame.x0, frame.y0), HandleKind::Corner(Corner::TopLeft)),
        (Point::new(c.x, frame.y0), HandleKind::Edge(Edge::Top)),
        (Point::new(frame.x1, frame.y0), HandleKind::Corner(Corner::TopRight)),
        (Point::new(frame.x1, c.y), HandleKind::Edge(Edge::Right)),
        (Point::new(frame.x1, frame.y1), HandleKind::Corner(Corner::BottomRight)),
        (Point::new(c.x, frame.y1), HandleKind::Edge(Edge::Bottom)),
        (Point::new(frame.x0, frame.y1), HandleKind::Corner(Corner::BottomLeft)),
        (Point::new(frame.x0, c.y), HandleKind::Edge(Edge::Left)),
    ]
    .into_iter()
    .map(|(p, kind)| Handle::new(transform * p, kind))
    .collect()
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(shape: &Shape, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(shape)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Action offered next to the selected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Rotate,
    Delete,
}

/// A clickable action button in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionButton {
    pub kind: ActionKind,
    pub bounds: Rect,
}

/// Buttons of the action cluster for a selected shape.
///
/// Rectangles and circles get rotate and delete, placed `offset` above their
/// top-left corner. Polygons only get delete, above their first vertex.
pub fn action_buttons(shape: &Shape, offset: f64) -> Vec<ActionButton> {
    let (anchor, kinds): (Point, &[ActionKind]) = match shape {
        Shape::Rectangle(_) | Shape::Circle(_) => (
            shape.origin() - Vec2::new(0.0, offset),
            &[ActionKind::Rotate, ActionKind::Delete],
        ),
        Shape::Polygon(poly) => {
            let first = poly.points().first().copied().unwrap_or_else(|| shape.origin());
            (first - Vec2::new(0.0, POLYGON_ACTION_OFFSET), &[ActionKind::Delete])
        }
    };
    kinds
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            let x = anchor.x + i as f64 * (ACTION_BUTTON_SIZE + ACTION_BUTTON_GAP);
            ActionButton {
                kind,
                bounds: Rect::new(x, anchor.y, x + ACTION_BUTTON_SIZE, anchor.y + ACTION_BUTTON_SIZE),
            }
        })
        .collect()
}

/// Find which action button (if any) is hit at the given point.
pub fn hit_test_actions(shape: &Shape, offset: f64, point: Point) -> Option<ActionKind> {
    action_buttons(shape, offset)
        .into_iter()
        .find(|b| b.bounds.contains(point))
        .map(|b| b.kind)
}

/// State of an active resize.
#[derive(Debug, Clone)]
pub struct ResizeState {
    /// The shape being resized.
    pub shape_id: ShapeId,
    /// The handle being dragged.
    pub handle: HandleKind,
    /// Pointer position when the resize started.
    pub start_point: Point,
    /// Shape geometry when the resize started.
    pub original_shape: Shape,
}

impl ResizeState {
    pub fn new(shape_id: ShapeId, handle: HandleKind, start_point: Point, original_shape: Shape) -> Self {
        Self {
            shape_id,
            handle,
            start_point,
            original_shape,
        }
    }

    /// Resized geometry for the current pointer position.
    pub fn apply(&self, current: Point, min_size: f64) -> Shape {
        apply_resize(&self.original_shape, self.handle, current - self.start_point, min_size)
    }
}

/// Resize one axis. Returns the new `(start, extent)`.
///
/// The moving side may not come closer than `min_size` to the fixed side.
fn resize_axis(start: f64, extent: f64, delta: f64, side: Side, min_size: f64) -> (f64, f64) {
    match side {
        Side::Fixed => (start, extent),
        Side::Max => (start, (extent + delta).max(min_size)),
        Side::Min => {
            let moved = delta.min(extent - min_size);
            (start + moved, extent - moved)
        }
    }
}

/// Apply a handle drag to a rectangle or circle.
///
/// `delta` is the pointer movement in canvas coordinates; it is projected into
/// the shape's unrotated frame before resizing. Circles take the larger of the
/// two resulting extents and keep the edges opposite the handle fixed.
/// Polygons are returned unchanged.
pub fn apply_resize(shape: &Shape, handle: HandleKind, delta: Vec2, min_size: f64) -> Shape {
    let mut shape = shape.clone();
    let local = if shape.rotation() == 0.0 {
        delta
    } else {
        Affine::rotate(-shape.rotation().to_radians()) * delta.to_point() - Point::ZERO
    };
    let (h_side, v_side) = handle.sides();
    let frame = shape.frame();
    let (x, w) = resize_axis(frame.x0, frame.width(), local.x, h_side, min_size);
    let (y, h) = resize_axis(frame.y0, frame.height(), local.y, v_side, min_size);

    match &mut shape {
        Shape::Rectangle(rect) => {
            rect.position = Point::new(x, y);
            rect.width = w;
            rect.height = h;
        }
        Shape::Circle(circle) => {
            let side = w.max(h);
            let cx = if h_side == Side::Min { x + w - side } else { x };
            let cy = if v_side == Side::Min { y + h - side } else { y };
            circle.position = Point::new(cx, cy);
            circle.diameter = side;
        }
        Shape::Polygon(_) => {}
    }
    shape
}
