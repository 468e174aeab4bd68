use glam::Vec2;

/// Path of a moving platform: ping-pong between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformPath {
    pub from: Vec2,
    pub to: Vec2,
    /// Meters per second.
    pub speed: f32,
    heading_to_end: bool,
}

impl PlatformPath {
    pub fn new(from: Vec2, to: Vec2, speed: f32) -> Self {
        Self {
            from,
            to,
            speed,
            heading_to_end: true,
        }
    }

    pub fn target(&self) -> Vec2 {
        if self.heading_to_end {
            self.to
        } else {
            self.from
        }
    }

    /// Velocity (m/s) that moves a platform at `pos` along the path this
    /// tick. When the target is within reach, the velocity lands exactly on
    /// it and the platform heads back.
    pub fn steer(&mut self, pos: Vec2, pixels_per_meter: f32, dt: f32) -> Vec2 {
        let delta = self.target() - pos;
        let reach = self.speed * pixels_per_meter * dt;
        if delta.length() <= reach {
            self.heading_to_end = !self.heading_to_end;
            if pixels_per_meter * dt <= 0.0 {
                return Vec2::ZERO;
            }
            return delta / (pixels_per_meter * dt);
        }
        delta.normalize_or_zero() * self.speed
    }
}
