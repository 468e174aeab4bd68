//! Deferred draw queue.
//!
//! Entities decide what to draw during update and queue [`RenderingItem`]s
//! here; the owning scene flushes the queue layer by layer during draw and
//! clears it once per frame.

use glam::Vec2;

use crate::api::types::Facing;
use crate::components::aseprite::AsepriteSheet;
use crate::components::layer::RenderingLayer;
use crate::renderer::context::DrawContext;
use crate::renderer::item::{DrawCommand, RenderingItem};

/// Optional parameters of [`Renderer::add_aseprite`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteOptions {
    pub facing: Facing,
    /// Seconds into the tag's loop.
    pub time: f32,
    pub alpha: f32,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            facing: Facing::Right,
            time: 0.0,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct Renderer {
    items: Vec<RenderingItem>,
    camera: Vec2,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an item. Nothing is drawn until a layer is flushed.
    pub fn add(&mut self, item: RenderingItem) {
        self.items.push(item);
    }

    /// Queue the frame `tag` shows at `options.time`, anchored bottom-center
    /// at `pos`. Returns false (and queues nothing) for an unknown tag.
    pub fn add_aseprite(
        &mut self,
        sheet: &AsepriteSheet,
        tag: &str,
        pos: Vec2,
        layer: RenderingLayer,
        options: SpriteOptions,
    ) -> bool {
        let Some(frame) = sheet.frame_at(tag, options.time) else {
            log::debug!("sprite tag {:?} not found", tag);
            return false;
        };
        let mut item = RenderingItem::new(
            layer,
            DrawCommand::Aseprite {
                image: sheet.image,
                frame: frame.source,
                mirrored: options.facing == Facing::Left,
            },
        )
        .at(pos);
        if options.alpha < 1.0 {
            item = item.with_alpha(options.alpha);
        }
        self.add(item);
        true
    }

    /// World point the scene's camera centers on. Needed to pin
    /// screen-relative items.
    pub fn set_camera(&mut self, center: Vec2) {
        self.camera = center;
    }

    /// Bit `1 << layer` set for every layer with at least one queued item.
    pub fn layers(&self) -> u32 {
        self.items.iter().fold(0, |mask, item| mask | item.layer.bit())
    }

    /// Draw the items of the single layer named by `layer_bit`, in queue order.
    pub fn draw_layer(&self, ctx: &mut dyn DrawContext, layer_bit: u32) {
        let layer = layer_bit.trailing_zeros();
        for item in self.items.iter().filter(|i| u32::from(i.layer.as_u8()) == layer) {
            item.draw(ctx, self.camera);
        }
    }

    /// Draw every non-empty layer not in `hidden`, back to front.
    pub fn draw_visible_layers(&self, ctx: &mut dyn DrawContext, hidden: u32) {
        let mut visible = self.layers() & !hidden;
        while visible != 0 {
            let bit = visible & visible.wrapping_neg();
            self.draw_layer(ctx, bit);
            visible &= !bit;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
