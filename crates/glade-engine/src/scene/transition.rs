//! Multi-frame scene transitions. A transition wraps a scene's draw call:
//! it sets up the surface, lets the scene draw, and may paint over it.

use crate::api::types::Color;
use crate::core::bounds::Bounds;
use crate::core::easing::Easing;
use crate::renderer::context::DrawContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    /// The scene is appearing.
    In,
    /// The scene is going away.
    Out,
}

/// Screen edge a slide enters from or leaves toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionKind {
    Fade,
    Slide(Edge),
    /// Two bars closing from the top and bottom.
    Curtain(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub direction: TransitionDirection,
    /// Seconds.
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
}

impl Transition {
    pub fn new(kind: TransitionKind, direction: TransitionDirection, duration: f32) -> Self {
        Self {
            kind,
            direction,
            duration: duration.max(0.0),
            easing: Easing::QuadInOut,
            elapsed: 0.0,
        }
    }

    pub fn fade_in(duration: f32) -> Self {
        Self::new(TransitionKind::Fade, TransitionDirection::In, duration)
    }

    pub fn fade_out(duration: f32) -> Self {
        Self::new(TransitionKind::Fade, TransitionDirection::Out, duration)
    }

    pub fn slide_in(from: Edge, duration: f32) -> Self {
        Self::new(TransitionKind::Slide(from), TransitionDirection::In, duration)
    }

    pub fn slide_out(to: Edge, duration: f32) -> Self {
        Self::new(TransitionKind::Slide(to), TransitionDirection::Out, duration)
    }

    pub fn curtain_in(color: Color, duration: f32) -> Self {
        Self::new(TransitionKind::Curtain(color), TransitionDirection::In, duration)
    }

    pub fn curtain_out(color: Color, duration: f32) -> Self {
        Self::new(TransitionKind::Curtain(color), TransitionDirection::Out, duration)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.easing.apply(self.elapsed / self.duration)
    }

    /// How much of the scene shows: 0 hidden, 1 fully shown.
    pub fn visibility(&self) -> f32 {
        match self.direction {
            TransitionDirection::In => self.progress(),
            TransitionDirection::Out => 1.0 - self.progress(),
        }
    }

    /// Draw a scene through this transition.
    pub fn draw(
        &self,
        ctx: &mut dyn DrawContext,
        width: f32,
        height: f32,
        draw_scene: &mut dyn FnMut(&mut dyn DrawContext),
    ) {
        let hidden = 1.0 - self.visibility();
        match self.kind {
            TransitionKind::Fade => {
                let base = ctx.global_alpha();
                ctx.set_global_alpha(base * self.visibility());
                draw_scene(ctx);
            }
            TransitionKind::Slide(edge) => {
                let (dx, dy) = match edge {
                    Edge::Left => (-width * hidden, 0.0),
                    Edge::Right => (width * hidden, 0.0),
                    Edge::Top => (0.0, -height * hidden),
                    Edge::Bottom => (0.0, height * hidden),
                };
                ctx.translate(dx, dy);
                draw_scene(ctx);
            }
            TransitionKind::Curtain(color) => {
                draw_scene(ctx);
                let bar = height / 2.0 * hidden;
                if bar > 0.0 {
                    ctx.fill_rect(Bounds::new(0.0, 0.0, width, bar), color);
                    ctx.fill_rect(Bounds::new(0.0, height - bar, width, bar), color);
                }
            }
        }
    }
}
