use std::collections::HashMap;

use glade_engine::renderer::context::{CompositeOperation, DrawContext, TextStyle};
use glade_engine::{Bounds, Color, ImageId};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// [`DrawContext`] over a 2D canvas. Canvas calls that fail are skipped.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: HashMap<ImageId, HtmlImageElement>,
}

impl CanvasSurface {
    /// Find the canvas with DOM id `canvas_id` and take its 2D context.
    pub fn from_id(canvas_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_image_smoothing_enabled(false);
        Ok(Self {
            canvas,
            ctx,
            images: HashMap::new(),
        })
    }

    pub fn register_image(&mut self, id: ImageId, image: HtmlImageElement) {
        self.images.insert(id, image);
    }

    pub fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Reset the transform and paint the whole canvas `color`.
    pub fn clear(&mut self, color: Color) {
        let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.set_global_alpha(1.0);
        let (width, height) = self.size();
        self.fill_rect(Bounds::new(0.0, 0.0, width, height), color);
    }
}

impl DrawContext for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }

    fn scale(&mut self, x: f32, y: f32) {
        let _ = self.ctx.scale(x as f64, y as f64);
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        let _ = self.ctx.set_global_composite_operation(op.as_str());
    }

    fn global_alpha(&self) -> f32 {
        self.ctx.global_alpha() as f32
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn draw_image(&mut self, image: ImageId, source: Option<Bounds>, dest: Bounds) {
        let Some(element) = self.images.get(&image) else {
            log::debug!("image {:?} not registered", image);
            return;
        };
        let _ = match source {
            Some(src) => self
                .ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    element,
                    src.x as f64,
                    src.y as f64,
                    src.width as f64,
                    src.height as f64,
                    dest.x as f64,
                    dest.y as f64,
                    dest.width as f64,
                    dest.height as f64,
                ),
            None => self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                element,
                dest.x as f64,
                dest.y as f64,
                dest.width as f64,
                dest.height as f64,
            ),
        };
    }

    fn fill_rect(&mut self, rect: Bounds, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.ctx.set_font(&style.font());
        self.ctx.set_text_align(style.align.as_str());
        self.ctx.set_fill_style_str(&style.color.to_css());
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }

    fn measure_text(&mut self, text: &str, style: &TextStyle) -> f32 {
        self.ctx.set_font(&style.font());
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }
}
