//! Drawing tools and toolbox state.

use crate::shapes::{BoxKind, MAX_POLYGON_POINTS, MIN_POLYGON_POINTS, ShapeStyle};
use serde::{Deserialize, Serialize};

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Rectangle,
    Circle,
    Polygon,
}

impl ToolKind {
    /// The box shape drawn by this tool, if it draws one.
    pub fn box_kind(self) -> Option<BoxKind> {
        match self {
            ToolKind::Rectangle => Some(BoxKind::Rectangle),
            ToolKind::Circle => Some(BoxKind::Circle),
            ToolKind::Polygon => None,
        }
    }
}

/// Current tool plus the options applied to newly drawn shapes.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Vertex count new polygons are simplified to.
    point_count: usize,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            point_count: 8,
            current_style: ShapeStyle::default(),
        }
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.current_tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.current_tool, tool);
        }
        self.current_tool = tool;
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Set the polygon target point count, clamped to `3..=20`.
    ///
    /// Returns the value actually stored.
    pub fn set_point_count(&mut self, count: usize) -> usize {
        self.point_count = count.clamp(MIN_POLYGON_POINTS, MAX_POLYGON_POINTS);
        self.point_count
    }
}
