//! Canvas document and editor state.

use crate::config::EditorConfig;
use crate::shapes::{Shape, ShapeId};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The shapes on a canvas together with their paint order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Paint order of shapes (back to front), oldest first.
    z_order: Vec<ShapeId>,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the existing ones.
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
    }

    /// Remove a shape from the document.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Shape IDs back to front.
    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes_ordered()
            .map(Shape::bounds)
            .reduce(|acc, b| acc.union(b))
    }

    /// Find shapes at a point, front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter(|id| {
                self.shapes
                    .get(id)
                    .is_some_and(|s| s.hit_test(point, tolerance))
            })
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// Editor state: the document, the single selection and the toolbox.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Thresholds used by the interaction controller.
    pub config: EditorConfig,
    /// Currently selected shape.
    selection: Option<ShapeId>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an empty canvas with the given configuration.
    pub fn with_config(config: EditorConfig) -> Self {
        let mut tool_manager = ToolManager::new();
        tool_manager.set_point_count(config.default_point_count);
        Self {
            document: CanvasDocument::new(),
            tool_manager,
            config,
            selection: None,
        }
    }

    /// Select a shape, replacing any previous selection.
    ///
    /// Unknown IDs clear the selection.
    pub fn select(&mut self, id: ShapeId) {
        self.selection = self.document.get_shape(id).map(|_| id);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection == Some(id)
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.and_then(|id| self.document.get_shape(id))
    }

    pub fn selected_shape_mut(&mut self) -> Option<&mut Shape> {
        let id = self.selection?;
        self.document.get_shape_mut(id)
    }

    /// Remove the selected shape and clear the selection.
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let id = self.selection.take()?;
        let removed = self.document.remove_shape(id);
        if removed.is_some() {
            log::info!("Deleted shape {id}");
        }
        removed
    }

    /// Rotate the selected rectangle or circle by the configured step.
    ///
    /// Returns the new rotation, or `None` when nothing rotatable is selected.
    pub fn rotate_selected(&mut self) -> Option<f64> {
        let step = self.config.rotate_step;
        let shape = self.selected_shape_mut()?;
        if !shape.supports_rotation() {
            return None;
        }
        shape.set_rotation(shape.rotation() + step);
        log::debug!("Rotated shape {} to {}°", shape.id(), shape.rotation());
        Some(shape.rotation())
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool_manager.set_tool(tool);
    }

    /// Set the polygon target point count, clamped to `3..=20`.
    pub fn set_point_count(&mut self, count: usize) -> usize {
        self.tool_manager.set_point_count(count)
    }

    /// Shapes in the order they are painted: stored order, with the selected
    /// shape moved last. The stored order is not modified.
    pub fn paint_order(&self) -> impl Iterator<Item = &Shape> {
        let selected = self.selection;
        self.document
            .shapes_ordered()
            .filter(move |s| Some(s.id()) != selected)
            .chain(self.selected_shape())
    }

    /// Topmost shape under `point`, as painted.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        let tolerance = self.config.shape_tolerance;
        if let Some(shape) = self.selected_shape() {
            if shape.hit_test(point, tolerance) {
                return Some(shape.id());
            }
        }
        self.document.shapes_at_point(point, tolerance).first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Rectangle, ShapeTrait};

    fn add_rect(canvas: &mut Canvas, x: f64, y: f64) -> ShapeId {
        let rect = Rectangle::new(Point::new(x, y), 100.0, 100.0);
        let id = rect.id();
        canvas.document.add_shape(Shape::Rectangle(rect));
        id
    }

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::new();
        assert!(doc.is_empty());
        assert!(doc.bounds().is_none());
    }

    #[test]
    fn test_add_and_remove_shape() {
        let mut doc = CanvasDocument::new();
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        let id = rect.id();

        doc.add_shape(Shape::Rectangle(rect));
        assert_eq!(doc.len(), 1);
        assert!(doc.get_shape(id).is_some());

        assert!(doc.remove_shape(id).is_some());
        assert!(doc.is_empty());
        assert!(doc.z_order().is_empty());
    }

    #[test]
    fn test_shapes_at_point_front_to_back() {
        let mut canvas = Canvas::new();
        let id1 = add_rect(&mut canvas, 0.0, 0.0);
        let id2 = add_rect(&mut canvas, 50.0, 50.0);

        let hits = canvas.document.shapes_at_point(Point::new(75.0, 75.0), 0.0);
        assert_eq!(hits, vec![id2, id1]);
        let hits = canvas.document.shapes_at_point(Point::new(25.0, 25.0), 0.0);
        assert_eq!(hits, vec![id1]);
    }

    #[test]
    fn test_delete_selected_removes_one() {
        let mut canvas = Canvas::new();
        let id1 = add_rect(&mut canvas, 0.0, 0.0);
        let id2 = add_rect(&mut canvas, 200.0, 0.0);

        canvas.select(id1);
        let removed = canvas.delete_selected().expect("selected shape removed");
        assert_eq!(removed.id(), id1);
        assert_eq!(canvas.selected(), None);
        assert_eq!(canvas.document.len(), 1);
        assert!(canvas.document.get_shape(id2).is_some());

        // Nothing selected: no-op.
        assert!(canvas.delete_selected().is_none());
        assert_eq!(canvas.document.len(), 1);
    }

    #[test]
    fn test_select_unknown_clears() {
        let mut canvas = Canvas::new();
        let id = add_rect(&mut canvas, 0.0, 0.0);
        canvas.select(id);
        canvas.select(uuid::Uuid::new_v4());
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn test_four_rotations_restore() {
        let mut canvas = Canvas::new();
        let id = add_rect(&mut canvas, 0.0, 0.0);
        canvas.select(id);
        assert_eq!(canvas.rotate_selected(), Some(90.0));
        canvas.rotate_selected();
        canvas.rotate_selected();
        assert_eq!(canvas.rotate_selected(), Some(0.0));
    }

    #[test]
    fn test_paint_order_selected_on_top() {
        let mut canvas = Canvas::new();
        let id1 = add_rect(&mut canvas, 0.0, 0.0);
        let circle = Circle::new(Point::new(50.0, 50.0), 80.0);
        let id2 = circle.id();
        canvas.document.add_shape(Shape::Circle(circle));

        canvas.select(id1);
        let order: Vec<_> = canvas.paint_order().map(Shape::id).collect();
        assert_eq!(order, vec![id2, id1]);
        // Stored order is untouched.
        assert_eq!(canvas.document.z_order(), &[id1, id2]);
        // The selected shape wins picking where it overlaps.
        assert_eq!(canvas.shape_at(Point::new(70.0, 70.0)), Some(id1));

        canvas.clear_selection();
        let order: Vec<_> = canvas.paint_order().map(Shape::id).collect();
        assert_eq!(order, vec![id1, id2]);
        assert_eq!(canvas.shape_at(Point::new(70.0, 70.0)), Some(id2));
    }

    #[test]
    fn test_point_count_from_config() {
        let config = EditorConfig {
            default_point_count: 12,
            ..EditorConfig::default()
        };
        let mut canvas = Canvas::with_config(config);
        assert_eq!(canvas.tool_manager.point_count(), 12);
        assert_eq!(canvas.set_point_count(40), 20);
    }
}
