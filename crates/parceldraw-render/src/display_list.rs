//! Backend-independent drawing commands for a frame.
//!
//! [`build_display_list`] is a pure function of the [`RenderContext`]: it walks
//! the shapes in paint order and appends the selection and preview overlays.
//! Backends only replay the resulting commands.

use crate::renderer::RenderContext;
use kurbo::{Affine, Arc, BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use parceldraw_core::controller::InteractionPreview;
use parceldraw_core::selection::{
    ACTION_BUTTON_GAP, ActionButton, ActionKind, HANDLE_RADIUS, HandleKind, action_buttons, get_handles,
};
use parceldraw_core::shapes::{BoxKind, Rectangle, Shape, ShapeId};
use peniko::Color;
use std::f64::consts::PI;

/// Gap between a selected shape and its dashed outline.
const SELECTION_PADDING: f64 = 4.0;
const SELECTION_DASH: [f64; 2] = [4.0, 4.0];
const PREVIEW_DASH: [f64; 2] = [6.0, 4.0];
/// Radius of the dots marking polygon samples while drawing.
const SAMPLE_MARKER_RADIUS: f64 = 3.0;
const TOLERANCE: f64 = 0.1;

/// What a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Shape(ShapeId),
    SelectionOutline,
    Handle,
    ActionPanel,
    ActionGlyph(ActionKind),
    Preview,
}

/// How a path is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill,
    Stroke { width: f64, dash: Option<[f64; 2]> },
}

/// A single path draw.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub layer: Layer,
    pub paint: Paint,
    pub path: BezPath,
    pub transform: Affine,
    pub color: Color,
}

/// Ordered drawing commands, back to front.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn fill(&mut self, layer: Layer, path: BezPath, transform: Affine, color: Color) {
        self.commands.push(DrawCommand {
            layer,
            paint: Paint::Fill,
            path,
            transform,
            color,
        });
    }

    fn stroke(
        &mut self,
        layer: Layer,
        path: BezPath,
        transform: Affine,
        color: Color,
        width: f64,
        dash: Option<[f64; 2]>,
    ) {
        self.commands.push(DrawCommand {
            layer,
            paint: Paint::Stroke { width, dash },
            path,
            transform,
            color,
        });
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Build the drawing commands for one frame.
pub fn build_display_list(ctx: &RenderContext) -> DisplayList {
    let mut list = DisplayList::new();
    let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
    list.fill(
        Layer::Background,
        viewport.to_path(TOLERANCE),
        Affine::IDENTITY,
        ctx.background_color,
    );

    for shape in ctx.canvas.paint_order() {
        push_shape(&mut list, shape);
    }

    if let Some(shape) = ctx.canvas.selected_shape() {
        push_selection(&mut list, ctx, shape);
        push_actions(&mut list, ctx, &action_buttons(shape, ctx.canvas.config.action_offset));
    }

    if let Some(preview) = &ctx.preview {
        push_preview(&mut list, ctx, preview);
    }

    list
}

fn push_shape(list: &mut DisplayList, shape: &Shape) {
    let layer = Layer::Shape(shape.id());
    let path = shape.to_path();
    let transform = shape.transform();
    let style = shape.style();
    if let Some(fill) = style.fill() {
        list.fill(layer, path.clone(), transform, fill);
    }
    list.stroke(layer, path, transform, style.stroke(), style.stroke_width, None);
}

fn circle_path(center: Point, radius: f64) -> BezPath {
    Ellipse::new(center, (radius, radius), 0.0).to_path(TOLERANCE)
}

fn push_selection(list: &mut DisplayList, ctx: &RenderContext, shape: &Shape) {
    let outline = shape.frame().inflate(SELECTION_PADDING, SELECTION_PADDING);
    list.stroke(
        Layer::SelectionOutline,
        outline.to_path(TOLERANCE),
        shape.transform(),
        ctx.selection_color,
        1.5,
        Some(SELECTION_DASH),
    );

    for handle in get_handles(shape) {
        match handle.kind {
            HandleKind::Corner(_) | HandleKind::Edge(_) => {
                let path = circle_path(handle.position, HANDLE_RADIUS);
                list.fill(Layer::Handle, path.clone(), Affine::IDENTITY, Color::WHITE);
                list.stroke(Layer::Handle, path, Affine::IDENTITY, ctx.selection_color, 1.5, None);
            }
            HandleKind::Vertex(_) => {
                let path = circle_path(handle.position, HANDLE_RADIUS - 1.0);
                list.fill(Layer::Handle, path.clone(), Affine::IDENTITY, ctx.selection_color);
                list.stroke(Layer::Handle, path, Affine::IDENTITY, Color::WHITE, 1.5, None);
            }
        }
    }
}

fn push_actions(list: &mut DisplayList, ctx: &RenderContext, buttons: &[ActionButton]) {
    let Some(panel) = buttons
        .iter()
        .map(|b| b.bounds)
        .reduce(|acc, b| acc.union(b))
    else {
        return;
    };
    let panel = RoundedRect::from_rect(panel.inflate(ACTION_BUTTON_GAP, ACTION_BUTTON_GAP), 8.0).to_path(TOLERANCE);
    list.fill(Layer::ActionPanel, panel.clone(), Affine::IDENTITY, ctx.action_panel_color);
    list.stroke(
        Layer::ActionPanel,
        panel,
        Affine::IDENTITY,
        Color::from_rgba8(226, 232, 240, 255),
        1.0,
        None,
    );

    for button in buttons {
        let layer = Layer::ActionGlyph(button.kind);
        let c = button.bounds.center();
        let r = button.bounds.width().min(button.bounds.height()) / 4.0;
        match button.kind {
            ActionKind::Rotate => {
                // Three-quarter arc ending at the top, with an arrowhead.
                let arc = Arc::new(c, Vec2::new(r, r), 0.0, 1.5 * PI, 0.0);
                let mut path = arc.to_path(TOLERANCE);
                let tip = Point::new(c.x, c.y - r);
                path.move_to(tip + Vec2::new(-3.0, -3.0));
                path.line_to(tip);
                path.line_to(tip + Vec2::new(-3.0, 3.0));
                list.stroke(layer, path, Affine::IDENTITY, ctx.action_color, 2.0, None);
            }
            ActionKind::Delete => {
                let mut path = BezPath::new();
                path.move_to(c + Vec2::new(-r, -r));
                path.line_to(c + Vec2::new(r, r));
                path.move_to(c + Vec2::new(r, -r));
                path.line_to(c + Vec2::new(-r, r));
                list.stroke(layer, path, Affine::IDENTITY, ctx.delete_color, 2.0, None);
            }
        }
    }
}

fn push_preview(list: &mut DisplayList, ctx: &RenderContext, preview: &InteractionPreview) {
    match preview {
        InteractionPreview::Box { kind, rect } => {
            let path = match kind {
                BoxKind::Rectangle => {
                    let radius = Rectangle::CORNER_RADIUS
                        .min(rect.width() / 2.0)
                        .min(rect.height() / 2.0);
                    RoundedRect::from_rect(*rect, radius).to_path(TOLERANCE)
                }
                BoxKind::Circle => Ellipse::from_rect(*rect).to_path(TOLERANCE),
            };
            list.stroke(
                Layer::Preview,
                path,
                Affine::IDENTITY,
                ctx.preview_color,
                2.0,
                Some(PREVIEW_DASH),
            );
        }
        InteractionPreview::Polygon { samples, cursor } => {
            let mut path = BezPath::new();
            if let Some((first, rest)) = samples.split_first() {
                path.move_to(*first);
                for p in rest {
                    path.line_to(*p);
                }
                path.line_to(*cursor);
            }
            list.stroke(
                Layer::Preview,
                path,
                Affine::IDENTITY,
                ctx.preview_color,
                2.0,
                Some(PREVIEW_DASH),
            );
            for p in samples {
                list.fill(
                    Layer::Preview,
                    circle_path(*p, SAMPLE_MARKER_RADIUS),
                    Affine::IDENTITY,
                    ctx.preview_color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use parceldraw_core::canvas::Canvas;
    use parceldraw_core::shapes::{Circle, Polygon, ShapeTrait};

    fn viewport() -> Size {
        Size::new(800.0, 600.0)
    }

    fn add(canvas: &mut Canvas, shape: Shape) -> ShapeId {
        let id = shape.id();
        canvas.document.add_shape(shape);
        id
    }

    fn count(list: &DisplayList, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        list.iter().filter(|c| pred(c)).count()
    }

    fn shape_layers(list: &DisplayList) -> Vec<ShapeId> {
        let mut ids: Vec<ShapeId> = Vec::new();
        for cmd in list {
            if let Layer::Shape(id) = cmd.layer {
                if ids.last() != Some(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    #[test]
    fn test_empty_canvas() {
        let canvas = Canvas::new();
        let list = build_display_list(&RenderContext::new(&canvas, viewport()));
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0].layer, Layer::Background);
    }

    #[test]
    fn test_shape_fill_and_stroke() {
        let mut canvas = Canvas::new();
        let id = add(
            &mut canvas,
            Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 100.0, 50.0)),
        );
        let mut outline = Circle::new(Point::new(200.0, 10.0), 60.0);
        outline.style.fill_color = None;
        let outline_id = add(&mut canvas, Shape::Circle(outline));

        let list = build_display_list(&RenderContext::new(&canvas, viewport()));
        assert_eq!(count(&list, |c| c.layer == Layer::Shape(id)), 2);
        assert_eq!(count(&list, |c| c.layer == Layer::Shape(outline_id)), 1);
        assert_eq!(count(&list, |c| c.layer == Layer::Handle), 0);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_selected_drawn_last() {
        let mut canvas = Canvas::new();
        let id1 = add(&mut canvas, Shape::Rectangle(Rectangle::new(Point::ZERO, 100.0, 100.0)));
        let id2 = add(
            &mut canvas,
            Shape::Circle(Circle::new(Point::new(50.0, 50.0), 100.0)),
        );
        let list = build_display_list(&RenderContext::new(&canvas, viewport()));
        assert_eq!(shape_layers(&list), vec![id1, id2]);

        canvas.select(id1);
        let list = build_display_list(&RenderContext::new(&canvas, viewport()));
        assert_eq!(shape_layers(&list), vec![id2, id1]);
        assert_eq!(canvas.document.z_order(), &[id1, id2]);
    }

    #[test]
    fn test_selection_overlay_for_box_shape() {
        let mut canvas = Canvas::new();
        let id = add(
            &mut canvas,
            Shape::Rectangle(Rectangle::new(Point::new(100.0, 100.0), 80.0, 60.0)),
        );
        canvas.select(id);
        let list = build_display_list(&RenderContext::new(&canvas, viewport()));

        let outline = list
            .iter()
            .find(|c| c.layer == Layer::SelectionOutline)
            .expect("selection outline");
        assert!(matches!(outline.paint, Paint::Stroke { dash: Some(_), .. }));
        assert_eq!(
            count(&list, |c| c.layer == Layer::Handle && c.paint == Paint::Fill),
            8
        );
        assert_eq!(count(&list, |c| c.layer == Layer::ActionGlyph(ActionKind::Rotate)), 1);
        assert_eq!(count(&list, |c| c.layer == Layer::ActionGlyph(ActionKind::Delete)), 1);
        assert_eq!(count(&list, |c| c.layer == Layer::ActionPanel), 2);
    }

    #[test]
    fn test_selection_overlay_for_polygon() {
        let mut canvas = Canvas::new();
        let poly = Polygon::from_points(vec![
            Point::new(0.0, 100.0),
            Point::new(80.0, 100.0),
            Point::new(80.0, 180.0),
            Point::new(0.0, 180.0),
        ])
        .expect("four points");
        let id = add(&mut canvas, Shape::Polygon(poly));
        canvas.select(id);
        let list = build_display_list(&RenderContext::new(&canvas, viewport()));

        assert_eq!(
            count(&list, |c| c.layer == Layer::Handle && c.paint == Paint::Fill),
            4
        );
        assert_eq!(count(&list, |c| c.layer == Layer::ActionGlyph(ActionKind::Rotate)), 0);
        assert_eq!(count(&list, |c| c.layer == Layer::ActionGlyph(ActionKind::Delete)), 1);
    }

    #[test]
    fn test_rotation_transform_applied() {
        let mut canvas = Canvas::new();
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 40.0);
        rect.rotation = 90.0;
        let id = rect.id();
        canvas.document.add_shape(Shape::Rectangle(rect));
        let list = build_display_list(&RenderContext::new(&canvas, viewport()));
        let cmd = list
            .iter()
            .find(|c| c.layer == Layer::Shape(id))
            .expect("shape command");
        assert_ne!(cmd.transform, Affine::IDENTITY);
        // The center is a fixed point of the rotation.
        let center = cmd.transform * Point::new(50.0, 20.0);
        assert!((center - Point::new(50.0, 20.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_box_preview_is_dashed() {
        let canvas = Canvas::new();
        let ctx = RenderContext::new(&canvas, viewport()).with_preview(Some(InteractionPreview::Box {
            kind: BoxKind::Circle,
            rect: Rect::new(10.0, 10.0, 70.0, 70.0),
        }));
        let list = build_display_list(&ctx);
        assert_eq!(list.len(), 2);
        let preview = &list.commands()[1];
        assert_eq!(preview.layer, Layer::Preview);
        assert_eq!(
            preview.paint,
            Paint::Stroke {
                width: 2.0,
                dash: Some(PREVIEW_DASH)
            }
        );
    }

    #[test]
    fn test_polygon_preview_marks_samples() {
        let canvas = Canvas::new();
        let samples = vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0), Point::new(30.0, 30.0)];
        let ctx = RenderContext::new(&canvas, viewport()).with_preview(Some(InteractionPreview::Polygon {
            samples,
            cursor: Point::new(10.0, 40.0),
        }));
        let list = build_display_list(&ctx);
        assert_eq!(count(&list, |c| c.layer == Layer::Preview && c.paint == Paint::Fill), 3);
        let line = list
            .iter()
            .find(|c| c.layer == Layer::Preview && c.paint != Paint::Fill)
            .expect("rubber band");
        // Three samples plus the cursor.
        assert_eq!(line.path.elements().len(), 4);
    }
}
