//! The drawing surface the renderer talks to.
//!
//! Mirrors the subset of the Canvas 2D API the engine uses. The web crate
//! implements it over `CanvasRenderingContext2d`; tests use
//! [`RecordingContext`](super::recording::RecordingContext).
//!
//! Coordinates here are surface coordinates: Y grows downward.

use crate::api::types::{Color, ImageId};
use crate::core::bounds::Bounds;

/// Canvas `globalCompositeOperation` values the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceAtop,
    DestinationOut,
    Lighter,
    Multiply,
    Screen,
    Overlay,
}

impl CompositeOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeOperation::SourceOver => "source-over",
            CompositeOperation::SourceAtop => "source-atop",
            CompositeOperation::DestinationOut => "destination-out",
            CompositeOperation::Lighter => "lighter",
            CompositeOperation::Multiply => "multiply",
            CompositeOperation::Screen => "screen",
            CompositeOperation::Overlay => "overlay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    /// Pixels.
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 8.0,
            color: Color::WHITE,
            align: TextAlign::Center,
        }
    }
}

impl TextStyle {
    /// CSS font shorthand, e.g. `8px monospace`.
    pub fn font(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

pub trait DrawContext {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn scale(&mut self, x: f32, y: f32);
    fn set_composite_operation(&mut self, op: CompositeOperation);
    fn global_alpha(&self) -> f32;
    fn set_global_alpha(&mut self, alpha: f32);
    /// Draw `source` (whole image if `None`) of an image into `dest`.
    fn draw_image(&mut self, image: ImageId, source: Option<Bounds>, dest: Bounds);
    fn fill_rect(&mut self, rect: Bounds, color: Color);
    /// `y` is the alphabetic baseline.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f32;
}
