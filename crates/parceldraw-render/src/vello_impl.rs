//! Vello-based renderer implementation.

use crate::display_list::{DisplayList, Paint, build_display_list};
use crate::renderer::{RenderContext, RenderResult, Renderer};
use kurbo::Stroke;
use peniko::Fill;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self { scene: Scene::new() }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Replay a display list into the scene.
    fn encode(&mut self, list: &DisplayList) {
        for cmd in list {
            match cmd.paint {
                Paint::Fill => {
                    self.scene.fill(Fill::NonZero, cmd.transform, cmd.color, None, &cmd.path);
                }
                Paint::Stroke { width, dash } => {
                    let stroke = match dash {
                        Some(pattern) => Stroke::new(width).with_dashes(0.0, pattern),
                        None => Stroke::new(width),
                    };
                    self.scene.stroke(&stroke, cmd.transform, cmd.color, None, &cmd.path);
                }
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.scene.reset();
        ctx.check_viewport()?;
        let list = build_display_list(ctx);
        log::trace!("Encoding {} draw commands", list.len());
        self.encode(&list);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use parceldraw_core::canvas::Canvas;
    use parceldraw_core::shapes::{Rectangle, Shape};

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_shapes() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();

        let rect = Rectangle::new(Point::new(100.0, 100.0), 200.0, 150.0);
        canvas.document.add_shape(Shape::Rectangle(rect));

        let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx).expect("valid viewport");
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::new();
        let ctx = RenderContext::new(&canvas, Size::new(0.0, 600.0));
        assert!(renderer.build_scene(&ctx).is_err());
        assert!(renderer.scene().encoding().is_empty());
    }
}
