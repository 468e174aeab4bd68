use glam::Vec2;
use serde::Deserialize;

/// Axis-aligned rectangle in world space. `y` is the bottom edge (Y-up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Box of an object whose position is its feet: centered horizontally,
    /// extending upward by `size.y`.
    pub fn from_feet(pos: Vec2, size: Vec2) -> Self {
        Self {
            x: pos.x - size.x / 2.0,
            y: pos.y,
            width: size.x,
            height: size.y,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Overlap test. Touching edges count as colliding.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.top() < other.y
            || self.y > other.top()
            || self.right() < other.x
            || self.x > other.right())
    }

    /// Point test: inclusive on the left/bottom edges, exclusive on right/top,
    /// so adjacent boxes never both claim a pixel.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.top()
    }
}

/// Free-function form of [`Bounds::intersects`].
pub fn bounding_boxes_collide(a: &Bounds, b: &Bounds) -> bool {
    a.intersects(b)
}
