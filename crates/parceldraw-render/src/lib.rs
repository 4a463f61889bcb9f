//! parceldraw render library
//!
//! Turns a canvas, its selection and the interaction preview into drawing
//! commands. The default backend uses Vello.

pub mod display_list;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use display_list::{DisplayList, DrawCommand, Layer, Paint, build_display_list};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
