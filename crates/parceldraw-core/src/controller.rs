//! Pointer interaction state machine.
//!
//! The controller turns pointer events into edits on a [`Canvas`]: drawing
//! new shapes, dragging, resizing and moving polygon vertices. Every gesture
//! holds a [`PointerCapture`] for its whole lifetime, so move and up events
//! keep arriving when the pointer leaves the canvas, and the capture is
//! released on whichever path the gesture ends.

use crate::canvas::Canvas;
use crate::input::{CanvasViewport, CaptureSlot, MouseButton, PointerCapture, PointerEvent};
use crate::selection::{ActionKind, HandleKind, ResizeState, hit_test_actions, hit_test_handles};
use crate::shapes::{BoxKind, Polygon, Shape, ShapeId, create_rectangle_or_circle, normalize_drag};
use kurbo::{Point, Rect, Size, Vec2};

/// Coarse interaction state, for callers that only need to know what is going on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    DrawingNew,
    Dragging,
    Resizing,
    EditingVertex,
}

/// Provisional geometry of a gesture in progress, for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPreview {
    /// Rectangle or circle being dragged out.
    Box { kind: BoxKind, rect: Rect },
    /// Polygon samples so far plus the live cursor position.
    Polygon { samples: Vec<Point>, cursor: Point },
}

/// A shape being drawn.
#[derive(Debug)]
enum Draft {
    Box {
        kind: BoxKind,
        anchor: Point,
        current: Point,
    },
    Polygon {
        samples: Vec<Point>,
        cursor: Point,
    },
}

#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    DrawingNew {
        draft: Draft,
        _capture: PointerCapture,
    },
    Dragging {
        shape_id: ShapeId,
        /// Pointer position minus shape origin at grab time.
        offset: Vec2,
        _capture: PointerCapture,
    },
    Resizing {
        resize: ResizeState,
        _capture: PointerCapture,
    },
    EditingVertex {
        shape_id: ShapeId,
        index: usize,
        start_point: Point,
        start_vertex: Point,
        _capture: PointerCapture,
    },
}

impl Gesture {
    fn state(&self) -> InteractionState {
        match self {
            Gesture::Idle => InteractionState::Idle,
            Gesture::DrawingNew { .. } => InteractionState::DrawingNew,
            Gesture::Dragging { .. } => InteractionState::Dragging,
            Gesture::Resizing { .. } => InteractionState::Resizing,
            Gesture::EditingVertex { .. } => InteractionState::EditingVertex,
        }
    }

    /// Shape being manipulated, if any.
    fn target(&self) -> Option<ShapeId> {
        match self {
            Gesture::Dragging { shape_id, .. } | Gesture::EditingVertex { shape_id, .. } => Some(*shape_id),
            Gesture::Resizing { resize, .. } => Some(resize.shape_id),
            Gesture::Idle | Gesture::DrawingNew { .. } => None,
        }
    }
}

/// Drives a [`Canvas`] from pointer events.
#[derive(Debug, Default)]
pub struct InteractionController {
    gesture: Gesture,
    captures: CaptureSlot,
    /// Last pointer position seen, in canvas coordinates.
    last_point: Option<Point>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.gesture.state()
    }

    /// Whether a gesture currently holds the pointer.
    pub fn is_captured(&self) -> bool {
        self.captures.is_captured()
    }

    /// Provisional shape of the gesture in progress.
    pub fn preview(&self) -> Option<InteractionPreview> {
        match &self.gesture {
            Gesture::DrawingNew {
                draft: Draft::Box { kind, anchor, current },
                ..
            } => {
                let (position, size) = normalize_drag(*kind, *anchor, *current - *anchor);
                Some(InteractionPreview::Box {
                    kind: *kind,
                    rect: Rect::from_origin_size(position, size),
                })
            }
            Gesture::DrawingNew {
                draft: Draft::Polygon { samples, cursor },
                ..
            } => Some(InteractionPreview::Polygon {
                samples: samples.clone(),
                cursor: *cursor,
            }),
            _ => None,
        }
    }

    /// Route a screen-space pointer event.
    ///
    /// Presses outside the canvas and non-primary buttons are ignored. While a
    /// gesture holds the capture, move and up events are delivered wherever
    /// they happen; otherwise events outside the canvas are dropped.
    pub fn handle_event(&mut self, canvas: &mut Canvas, viewport: &CanvasViewport, event: PointerEvent) {
        let screen = event.position();
        let point = viewport.to_canvas(screen);
        let inside = viewport.contains(screen);
        match event {
            PointerEvent::Down { button, .. } => {
                if button == MouseButton::Left && inside {
                    self.pointer_down(canvas, point);
                }
            }
            PointerEvent::Move { .. } => {
                if self.is_captured() || inside {
                    self.pointer_move(canvas, point);
                }
            }
            PointerEvent::Up { button, .. } => {
                if button == MouseButton::Left && self.is_captured() {
                    self.pointer_up(canvas, point);
                }
            }
        }
    }

    /// Primary button pressed at `point` (canvas coordinates).
    pub fn pointer_down(&mut self, canvas: &mut Canvas, point: Point) {
        self.last_point = Some(point);
        if !matches!(self.gesture, Gesture::Idle) {
            log::debug!("Ignoring pointer down during {:?}", self.state());
            return;
        }

        if let Some(selected) = canvas.selected_shape() {
            if let Some(action) = hit_test_actions(selected, canvas.config.action_offset, point) {
                match action {
                    ActionKind::Rotate => {
                        self.rotate_selected(canvas);
                    }
                    ActionKind::Delete => {
                        self.delete_selected(canvas);
                    }
                }
                return;
            }
            if let Some(handle) = hit_test_handles(selected, point, canvas.config.handle_tolerance) {
                let shape_id = selected.id();
                let gesture = match handle {
                    HandleKind::Vertex(index) => {
                        let Some(&start_vertex) = selected.as_polygon().and_then(|p| p.points().get(index))
                        else {
                            return;
                        };
                        self.capture().map(|capture| Gesture::EditingVertex {
                            shape_id,
                            index,
                            start_point: point,
                            start_vertex,
                            _capture: capture,
                        })
                    }
                    _ => {
                        let resize = ResizeState::new(shape_id, handle, point, selected.clone());
                        self.capture().map(|capture| Gesture::Resizing {
                            resize,
                            _capture: capture,
                        })
                    }
                };
                if let Some(gesture) = gesture {
                    log::debug!("Grabbed {handle:?} of shape {shape_id}");
                    self.gesture = gesture;
                }
                return;
            }
        }

        if let Some(shape_id) = canvas.shape_at(point) {
            canvas.select(shape_id);
            let Some(origin) = canvas.selected_shape().map(Shape::origin) else {
                return;
            };
            if let Some(capture) = self.capture() {
                log::debug!("Dragging shape {shape_id}");
                self.gesture = Gesture::Dragging {
                    shape_id,
                    offset: point - origin,
                    _capture: capture,
                };
            }
            return;
        }

        canvas.clear_selection();
        let draft = match canvas.tool_manager.current_tool.box_kind() {
            Some(kind) => Draft::Box {
                kind,
                anchor: point,
                current: point,
            },
            None => Draft::Polygon {
                samples: vec![point],
                cursor: point,
            },
        };
        if let Some(capture) = self.capture() {
            log::debug!("Drawing new {:?}", canvas.tool_manager.current_tool);
            self.gesture = Gesture::DrawingNew {
                draft,
                _capture: capture,
            };
        }
    }

    /// Pointer moved to `point` (canvas coordinates). A no-op when idle.
    pub fn pointer_move(&mut self, canvas: &mut Canvas, point: Point) {
        self.last_point = Some(point);
        Self::track(&mut self.gesture, canvas, point);
    }

    /// Primary button released at `point` (canvas coordinates).
    pub fn pointer_up(&mut self, canvas: &mut Canvas, point: Point) {
        self.last_point = Some(point);
        let mut gesture = std::mem::take(&mut self.gesture);
        if !matches!(
            gesture,
            Gesture::DrawingNew {
                draft: Draft::Polygon { .. },
                ..
            }
        ) {
            Self::track(&mut gesture, canvas, point);
        }

        match gesture {
            Gesture::Idle => {}
            Gesture::DrawingNew { draft, .. } => Self::commit(canvas, draft),
            other => log::debug!("{:?} finished", other.state()),
        }
    }

    /// End the gesture in progress as if the pointer were released at its
    /// last known position.
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        if let Some(point) = self.last_point {
            if !matches!(self.gesture, Gesture::Idle) {
                log::debug!("Cancelling {:?} at {point:?}", self.state());
                self.pointer_up(canvas, point);
            }
        }
    }

    /// The host window lost focus mid-gesture.
    pub fn focus_lost(&mut self, canvas: &mut Canvas) {
        self.cancel(canvas);
    }

    /// Rotate the selected rectangle or circle. Works in any state.
    pub fn rotate_selected(&mut self, canvas: &mut Canvas) -> Option<f64> {
        let rotation = canvas.rotate_selected()?;
        // A resize in flight restores from its snapshot on every move.
        if let Gesture::Resizing { resize, .. } = &mut self.gesture {
            if canvas.is_selected(resize.shape_id) {
                resize.original_shape.set_rotation(rotation);
            }
        }
        Some(rotation)
    }

    /// Delete the selected shape, ending any gesture on it. Works in any state.
    pub fn delete_selected(&mut self, canvas: &mut Canvas) -> Option<Shape> {
        let selected = canvas.selected()?;
        if self.gesture.target() == Some(selected) {
            log::debug!("{:?} ended by delete", self.state());
            self.gesture = Gesture::Idle;
        }
        canvas.delete_selected()
    }

    fn capture(&self) -> Option<PointerCapture> {
        let capture = self.captures.acquire();
        if capture.is_none() {
            log::warn!("Pointer already captured; gesture not started");
        }
        capture
    }

    /// Apply pointer motion to the gesture in progress.
    fn track(gesture: &mut Gesture, canvas: &mut Canvas, point: Point) {
        match gesture {
            Gesture::Idle => {}
            Gesture::DrawingNew { draft, .. } => match draft {
                Draft::Box { current, .. } => *current = point,
                Draft::Polygon { samples, cursor } => {
                    *cursor = point;
                    let far_enough = samples
                        .last()
                        .is_none_or(|last| last.distance(point) > canvas.config.polygon_sample_distance);
                    if far_enough {
                        samples.push(point);
                        log::trace!("Polygon sample {} at {point:?}", samples.len());
                    }
                }
            },
            Gesture::Dragging { shape_id, offset, .. } => {
                if let Some(shape) = canvas.document.get_shape_mut(*shape_id) {
                    shape.move_origin_to(point - *offset);
                }
            }
            Gesture::Resizing { resize, .. } => {
                let resized = resize.apply(point, canvas.config.min_resize_size);
                if let Some(shape) = canvas.document.get_shape_mut(resize.shape_id) {
                    *shape = resized;
                }
            }
            Gesture::EditingVertex {
                shape_id,
                index,
                start_point,
                start_vertex,
                ..
            } => {
                let target = *start_vertex + (point - *start_point);
                if let Some(poly) = canvas
                    .document
                    .get_shape_mut(*shape_id)
                    .and_then(Shape::as_polygon_mut)
                {
                    poly.set_point(*index, target);
                }
            }
        }
    }

    /// Turn a finished draft into a shape, or drop it if it is too small.
    fn commit(canvas: &mut Canvas, draft: Draft) {
        let style = canvas.tool_manager.current_style.clone();
        match draft {
            Draft::Box { kind, anchor, current } => {
                let mut shape = create_rectangle_or_circle(kind, anchor, current - anchor);
                let Size { width, height } = shape.frame().size();
                let min = canvas.config.min_draw_extent;
                if width > min && height > min {
                    *shape.style_mut() = style;
                    log::info!("Created {:?} {} ({width}x{height})", shape.kind(), shape.id());
                    canvas.document.add_shape(shape);
                } else {
                    log::debug!("Discarded {kind:?} below {min}px ({width}x{height})");
                }
            }
            Draft::Polygon { samples, .. } => {
                let target = canvas.tool_manager.point_count();
                match Polygon::from_samples(&samples, target) {
                    Some(mut poly) => {
                        poly.style = style;
                        let shape = Shape::Polygon(poly);
                        let id = shape.id();
                        log::info!(
                            "Created polygon {id} from {} samples ({} points)",
                            samples.len(),
                            target.min(samples.len())
                        );
                        canvas.document.add_shape(shape);
                        canvas.select(id);
                    }
                    None => log::debug!("Discarded polygon with {} samples", samples.len()),
                }
            }
        }
    }
}
