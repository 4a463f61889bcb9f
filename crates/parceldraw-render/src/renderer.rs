//! Renderer trait abstraction.

use kurbo::Size;
use parceldraw_core::canvas::Canvas;
use parceldraw_core::controller::InteractionPreview;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport size: {0:?}")]
    InvalidViewport(Size),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything needed to draw one frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Provisional geometry of the gesture in progress.
    pub preview: Option<InteractionPreview>,
    /// Viewport size in canvas pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Selection outline and handle border color.
    pub selection_color: Color,
    /// Outline color of shapes being drawn.
    pub preview_color: Color,
    /// Background of the action cluster.
    pub action_panel_color: Color,
    /// Glyph color of the rotate button.
    pub action_color: Color,
    /// Glyph color of the delete button.
    pub delete_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            preview: None,
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            preview_color: Color::from_rgba8(100, 116, 139, 255),
            action_panel_color: Color::from_rgba8(255, 255, 255, 240),
            action_color: Color::from_rgba8(59, 130, 246, 255),
            delete_color: Color::from_rgba8(239, 68, 68, 255), // Red
        }
    }

    /// Set the interaction preview.
    pub fn with_preview(mut self, preview: Option<InteractionPreview>) -> Self {
        self.preview = preview;
        self
    }

    /// Fail unless the viewport has a finite, non-empty area.
    pub fn check_viewport(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(())
        } else {
            Err(RendererError::InvalidViewport(self.viewport_size))
        }
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;
}
