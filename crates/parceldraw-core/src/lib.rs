//! parceldraw core library
//!
//! Shape model, canvas state and pointer interaction for the parceldraw
//! freeform shape editor. Rendering lives in `parceldraw-render`.

pub mod canvas;
pub mod config;
pub mod controller;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use canvas::{Canvas, CanvasDocument};
pub use config::{ConfigError, EditorConfig};
pub use controller::{InteractionController, InteractionPreview, InteractionState};
pub use input::{CanvasViewport, CaptureSlot, MouseButton, PointerCapture, PointerEvent};
pub use selection::{ActionButton, ActionKind, Handle, HandleKind, ResizeState};
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};
pub use tools::{ToolKind, ToolManager};
