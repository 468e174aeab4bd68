use std::fmt;

use glam::Vec2;

use crate::api::types::{Color, ImageId};
use crate::components::layer::RenderingLayer;
use crate::core::bounds::Bounds;
use crate::renderer::context::{CompositeOperation, DrawContext, TextStyle};

/// A particle as drawn: world position, size and opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
}

/// The type-specific part of a queued draw.
///
/// Coordinates are local to the item after its translation, in surface
/// orientation (Y down).
pub enum DrawCommand {
    Image {
        image: ImageId,
        source: Option<Bounds>,
        dest: Bounds,
    },
    /// One sprite-sheet frame, anchored bottom-center at the origin.
    Aseprite {
        image: ImageId,
        frame: Bounds,
        mirrored: bool,
    },
    Rect {
        rect: Bounds,
        color: Color,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    /// Boxed text sitting on top of the origin. Lines split on `\n`.
    SpeechBubble {
        text: String,
        style: TextStyle,
        background: Color,
        padding: f32,
    },
    /// Particles in world coordinates; the item should not be translated.
    Particles {
        particles: Vec<ParticleSprite>,
        color: Color,
    },
    Raw(Box<dyn Fn(&mut dyn DrawContext)>),
}

impl fmt::Debug for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawCommand::Image { .. } => "Image",
            DrawCommand::Aseprite { .. } => "Aseprite",
            DrawCommand::Rect { .. } => "Rect",
            DrawCommand::Text { .. } => "Text",
            DrawCommand::SpeechBubble { .. } => "SpeechBubble",
            DrawCommand::Particles { .. } => "Particles",
            DrawCommand::Raw(_) => "Raw",
        };
        f.write_str(name)
    }
}

impl DrawCommand {
    fn draw(&self, ctx: &mut dyn DrawContext) {
        match self {
            DrawCommand::Image {
                image,
                source,
                dest,
            } => ctx.draw_image(*image, *source, *dest),
            DrawCommand::Aseprite {
                image,
                frame,
                mirrored,
            } => {
                if *mirrored {
                    ctx.scale(-1.0, 1.0);
                }
                let dest = Bounds::new(-frame.width / 2.0, -frame.height, frame.width, frame.height);
                ctx.draw_image(*image, Some(*frame), dest);
            }
            DrawCommand::Rect { rect, color } => ctx.fill_rect(*rect, *color),
            DrawCommand::Text { text, x, y, style } => ctx.fill_text(text, *x, *y, style),
            DrawCommand::SpeechBubble {
                text,
                style,
                background,
                padding,
            } => {
                let lines: Vec<&str> = text.lines().collect();
                let widest = lines
                    .iter()
                    .map(|line| ctx.measure_text(line, style))
                    .fold(0.0f32, f32::max);
                let line_height = style.size * 1.2;
                let width = widest + padding * 2.0;
                let height = lines.len() as f32 * line_height + padding * 2.0;
                ctx.fill_rect(Bounds::new(-width / 2.0, -height, width, height), *background);
                for (i, line) in lines.iter().enumerate() {
                    let baseline = -height + padding + style.size + i as f32 * line_height;
                    ctx.fill_text(line, 0.0, baseline, style);
                }
            }
            DrawCommand::Particles { particles, color } => {
                for p in particles {
                    let half = p.size / 2.0;
                    let tint = Color {
                        a: (color.a as f32 * p.alpha.clamp(0.0, 1.0)) as u8,
                        ..*color
                    };
                    ctx.fill_rect(Bounds::new(p.pos.x - half, -p.pos.y - half, p.size, p.size), tint);
                }
            }
            DrawCommand::Raw(callback) => callback(ctx),
        }
    }
}

/// One deferred draw: a common header plus the command.
#[derive(Debug)]
pub struct RenderingItem {
    pub layer: RenderingLayer,
    /// Ordering hint for callers that pre-sort before enqueueing.
    pub z_index: Option<i32>,
    /// World position (Y-up) of the item's origin.
    pub translation: Option<Vec2>,
    pub scale: Option<Vec2>,
    /// Pin to the viewport: undo the camera and re-center on the screen.
    pub relative_to_screen: bool,
    pub composite: Option<CompositeOperation>,
    pub alpha: Option<f32>,
    pub command: DrawCommand,
}

impl RenderingItem {
    pub fn new(layer: RenderingLayer, command: DrawCommand) -> Self {
        Self {
            layer,
            z_index: None,
            translation: None,
            scale: None,
            relative_to_screen: false,
            composite: None,
            alpha: None,
            command,
        }
    }

    pub fn rect(layer: RenderingLayer, rect: Bounds, color: Color) -> Self {
        Self::new(layer, DrawCommand::Rect { rect, color })
    }

    // -- Builder pattern --

    pub fn at(mut self, pos: Vec2) -> Self {
        self.translation = Some(pos);
        self
    }

    pub fn scaled(mut self, scale: Vec2) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn on_screen(mut self) -> Self {
        self.relative_to_screen = true;
        self
    }

    pub fn with_composite(mut self, op: CompositeOperation) -> Self {
        self.composite = Some(op);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    /// Draw with the header applied in a fixed order: save, translate, scale,
    /// screen pinning, composite, alpha, draw, restore. `camera` is the
    /// world point the active camera transform centers on.
    pub fn draw(&self, ctx: &mut dyn DrawContext, camera: Vec2) {
        ctx.save();
        if let Some(t) = self.translation {
            ctx.translate(t.x, -t.y);
        }
        if let Some(s) = self.scale {
            ctx.scale(s.x, s.y);
        }
        if self.relative_to_screen {
            ctx.translate(camera.x, -camera.y);
        }
        if let Some(op) = self.composite {
            ctx.set_composite_operation(op);
        }
        if let Some(alpha) = self.alpha {
            let base = ctx.global_alpha();
            ctx.set_global_alpha(base * alpha);
        }
        self.command.draw(ctx);
        ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::{DrawCall, RecordingContext};

    #[test]
    fn header_applies_in_fixed_order() {
        let item = RenderingItem::rect(
            RenderingLayer::Ui,
            Bounds::new(0.0, 0.0, 4.0, 4.0),
            Color::BLACK,
        )
        .at(Vec2::new(10.0, 20.0))
        .scaled(Vec2::new(2.0, 2.0))
        .on_screen()
        .with_composite(CompositeOperation::Lighter)
        .with_alpha(0.5);

        let mut ctx = RecordingContext::new();
        item.draw(&mut ctx, Vec2::new(100.0, 50.0));

        assert_eq!(
            ctx.calls,
            vec![
                DrawCall::Save,
                DrawCall::Translate(10.0, -20.0),
                DrawCall::Scale(2.0, 2.0),
                DrawCall::Translate(100.0, -50.0),
                DrawCall::Composite(CompositeOperation::Lighter),
                DrawCall::Alpha(0.5),
                DrawCall::FillRect {
                    rect: Bounds::new(0.0, 0.0, 4.0, 4.0),
                    color: Color::BLACK
                },
                DrawCall::Restore,
            ]
        );
        assert_eq!(ctx.global_alpha(), 1.0);
    }

    #[test]
    fn bare_item_only_saves_and_restores() {
        let item = RenderingItem::new(
            RenderingLayer::Entities,
            DrawCommand::Text {
                text: "hi".into(),
                x: 1.0,
                y: 2.0,
                style: TextStyle::default(),
            },
        );
        let mut ctx = RecordingContext::new();
        item.draw(&mut ctx, Vec2::ZERO);
        assert_eq!(ctx.calls.len(), 3);
        assert_eq!(ctx.texts(), vec!["hi"]);
    }

    #[test]
    fn mirrored_sprite_flips_before_drawing() {
        let frame = Bounds::new(16.0, 0.0, 16.0, 24.0);
        let item = RenderingItem::new(
            RenderingLayer::Player,
            DrawCommand::Aseprite {
                image: ImageId(2),
                frame,
                mirrored: true,
            },
        );
        let mut ctx = RecordingContext::new();
        item.draw(&mut ctx, Vec2::ZERO);
        assert_eq!(ctx.calls[1], DrawCall::Scale(-1.0, 1.0));
        assert_eq!(
            ctx.calls[2],
            DrawCall::Image {
                image: ImageId(2),
                source: Some(frame),
                dest: Bounds::new(-8.0, -24.0, 16.0, 24.0),
            }
        );
    }

    #[test]
    fn speech_bubble_boxes_every_line() {
        let item = RenderingItem::new(
            RenderingLayer::Dialog,
            DrawCommand::SpeechBubble {
                text: "hello\nthere you".into(),
                style: TextStyle::default(),
                background: Color::BLACK,
                padding: 2.0,
            },
        );
        let mut ctx = RecordingContext::new();
        item.draw(&mut ctx, Vec2::ZERO);

        let rects = ctx.rects();
        assert_eq!(rects.len(), 1);
        // "there you" is 9 chars at 8px * 0.6.
        let expected_width = 9.0 * 8.0 * 0.6 + 4.0;
        assert!((rects[0].0.width - expected_width).abs() < 1e-4);
        assert_eq!(ctx.texts(), vec!["hello", "there you"]);
    }

    #[test]
    fn raw_callback_runs() {
        let item = RenderingItem::new(
            RenderingLayer::Debug,
            DrawCommand::Raw(Box::new(|ctx| ctx.translate(3.0, 4.0))),
        );
        let mut ctx = RecordingContext::new();
        item.draw(&mut ctx, Vec2::ZERO);
        assert!(ctx.calls.contains(&DrawCall::Translate(3.0, 4.0)));
    }
}
