//! Pointer input translation and capture.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => position,
        }
    }
}

/// Placement of the canvas inside the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasViewport {
    /// Top-left of the canvas in screen coordinates.
    pub origin: Point,
    /// Canvas size in screen pixels.
    pub size: Size,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::new(1280.0, 800.0),
        }
    }
}

impl CanvasViewport {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Canvas bounds in screen coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Convert a screen position to canvas coordinates.
    pub fn to_canvas(&self, screen: Point) -> Point {
        (screen - self.origin).to_point()
    }

    /// Whether a screen position lies on the canvas (edges inclusive).
    pub fn contains(&self, screen: Point) -> bool {
        let b = self.bounds();
        screen.x >= b.x0 && screen.x <= b.x1 && screen.y >= b.y0 && screen.y <= b.y1
    }
}

/// Source of pointer captures. At most one capture is live at a time.
#[derive(Debug, Default)]
pub struct CaptureSlot {
    held: Rc<Cell<bool>>,
}

impl CaptureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route move/up events to the caller until the returned guard drops.
    ///
    /// Returns `None` while another capture is still held.
    pub fn acquire(&self) -> Option<PointerCapture> {
        if self.held.get() {
            return None;
        }
        self.held.set(true);
        log::trace!("Pointer captured");
        Some(PointerCapture {
            held: Rc::clone(&self.held),
        })
    }

    pub fn is_captured(&self) -> bool {
        self.held.get()
    }
}

/// Live pointer capture. Dropping it releases the capture.
#[derive(Debug)]
pub struct PointerCapture {
    held: Rc<Cell<bool>>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.held.set(false);
        log::trace!("Pointer released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_canvas() {
        let viewport = CanvasViewport::new(Point::new(200.0, 64.0), Size::new(800.0, 600.0));
        assert_eq!(viewport.to_canvas(Point::new(250.0, 114.0)), Point::new(50.0, 50.0));
        assert!(viewport.contains(Point::new(200.0, 64.0)));
        assert!(!viewport.contains(Point::new(199.0, 100.0)));
        assert!(!viewport.contains(Point::new(500.0, 700.0)));
    }

    #[test]
    fn test_capture_released_on_drop() {
        let slot = CaptureSlot::new();
        let capture = slot.acquire().expect("slot free");
        assert!(slot.is_captured());
        assert!(slot.acquire().is_none());
        drop(capture);
        assert!(!slot.is_captured());
        assert!(slot.acquire().is_some());
    }

    #[test]
    fn test_event_position() {
        let event = PointerEvent::Up {
            position: Point::new(3.0, 4.0),
            button: MouseButton::Left,
        };
        assert_eq!(event.position(), Point::new(3.0, 4.0));
    }
}
