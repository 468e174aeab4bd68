use crate::api::types::{Color, ImageId};
use crate::core::bounds::Bounds;
use crate::renderer::context::{CompositeOperation, DrawContext, TextStyle};

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Translate(f32, f32),
    Scale(f32, f32),
    Composite(CompositeOperation),
    Alpha(f32),
    Image {
        image: ImageId,
        source: Option<Bounds>,
        dest: Bounds,
    },
    FillRect {
        rect: Bounds,
        color: Color,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
    },
}

/// Headless [`DrawContext`] that records every call, so draw order can be
/// asserted without a canvas.
#[derive(Debug, Clone)]
pub struct RecordingContext {
    pub calls: Vec<DrawCall>,
    alpha: f32,
    saved_alpha: Vec<f32>,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            alpha: 1.0,
            saved_alpha: Vec::new(),
        }
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangles filled so far, in order.
    pub fn rects(&self) -> Vec<(Bounds, Color)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Save/restore nesting currently open.
    pub fn depth(&self) -> usize {
        self.saved_alpha.len()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.saved_alpha.push(self.alpha);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.saved_alpha.pop() {
            self.alpha = alpha;
        }
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::Translate(x, y));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::Scale(x, y));
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.calls.push(DrawCall::Composite(op));
    }

    fn global_alpha(&self) -> f32 {
        self.alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        self.calls.push(DrawCall::Alpha(alpha));
    }

    fn draw_image(&mut self, image: ImageId, source: Option<Bounds>, dest: Bounds) {
        self.calls.push(DrawCall::Image {
            image,
            source,
            dest,
        });
    }

    fn fill_rect(&mut self, rect: Bounds, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, _style: &TextStyle) {
        self.calls.push(DrawCall::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    /// Monospace estimate: 0.6 em per character.
    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f32 {
        text.chars().count() as f32 * style.size * 0.6
    }
}
