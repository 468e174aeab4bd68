use glam::Vec2;

use crate::core::bounds::Bounds;
use crate::core::easing::lerp_vec2;
use crate::renderer::context::DrawContext;

/// 2D camera for a Y-up world drawn onto a Y-down surface.
pub struct Camera2D {
    /// Visible width in world units.
    pub width: f32,
    /// Visible height in world units.
    pub height: f32,
    /// Camera center in world space.
    pub center: Vec2,
    /// Region the viewport must stay inside.
    pub bounds: Option<Bounds>,
    /// 0.0 = instant, 0.99 = very slow.
    pub smoothing: f32,
}

impl Camera2D {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::ZERO,
            bounds: None,
            smoothing: 0.0,
        }
    }

    /// Match the viewport to the surface size, keeping the center.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.clamp_to_bounds();
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
        self.clamp_to_bounds();
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.99);
    }

    pub fn look_at(&mut self, target: Vec2) {
        self.center = target;
        self.clamp_to_bounds();
    }

    /// Move toward `target`. Call once per frame.
    pub fn follow(&mut self, target: Vec2, dt: f32) {
        if self.smoothing <= 0.0 {
            self.look_at(target);
        } else {
            let t = 1.0 - self.smoothing.powf(dt * 60.0);
            self.center = lerp_vec2(self.center, target, t);
            self.clamp_to_bounds();
        }
    }

    fn clamp_to_bounds(&mut self) {
        let Some(b) = self.bounds else {
            return;
        };
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        // A viewport larger than the bounds centers on them.
        self.center.x = if self.width >= b.width {
            b.center().x
        } else {
            self.center.x.clamp(b.left() + half_w, b.right() - half_w)
        };
        self.center.y = if self.height >= b.height {
            b.center().y
        } else {
            self.center.y.clamp(b.bottom() + half_h, b.top() - half_h)
        };
    }

    /// Map world space onto the surface: the camera center lands in the
    /// middle of the surface. Items then draw at `(x, -y)`.
    pub fn apply(&self, ctx: &mut dyn DrawContext) {
        let x = (self.width / 2.0 - self.center.x).round();
        let y = (self.height / 2.0 + self.center.y).round();
        ctx.translate(x, y);
    }

    /// World-space rectangle currently on screen.
    pub fn view(&self) -> Bounds {
        Bounds::new(
            self.center.x - self.width / 2.0,
            self.center.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    pub fn is_visible(&self, rect: &Bounds) -> bool {
        self.view().intersects(rect)
    }
}
