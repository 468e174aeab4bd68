use glam::Vec2;

use crate::api::types::Color;
use crate::core::rng::Rng;

/// How the emitter releases particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmissionMode {
    /// Emit particles continuously at a fixed rate.
    Continuous,
    /// Emit particles in bursts.
    Burst,
}

/// A live particle, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub size: f32,
    pub life: f32,
    pub lifetime: f32,
}

impl Particle {
    /// Remaining life in [0, 1], used to fade the particle out.
    pub fn fade(&self) -> f32 {
        if self.lifetime <= 0.0 {
            0.0
        } else {
            (self.life / self.lifetime).clamp(0.0, 1.0)
        }
    }
}

/// Component that spawns and simulates particles around its entity.
#[derive(Debug, Clone)]
pub struct EmitterComponent {
    pub active: bool,
    pub mode: EmissionMode,
    /// Particles per second (Continuous mode).
    pub rate: f32,
    /// Particles per burst (Burst mode).
    pub burst_count: u32,
    /// Seconds between bursts (0 = one-shot).
    pub burst_interval: f32,
    /// Min/max initial speed in pixels per second.
    pub speed_range: (f32, f32),
    /// Spawn direction in radians and the spread around it.
    pub angle: f32,
    pub spread: f32,
    pub size: f32,
    /// Seconds.
    pub lifetime: f32,
    /// Pixels per second squared, Y-up.
    pub gravity: f32,
    pub color: Color,
    pub particles: Vec<Particle>,
    rng: Rng,
    accumulator: f32,
    burst_timer: f32,
    burst_fired: bool,
}

impl Default for EmitterComponent {
    fn default() -> Self {
        Self {
            active: true,
            mode: EmissionMode::Continuous,
            rate: 10.0,
            burst_count: 8,
            burst_interval: 0.0,
            speed_range: (10.0, 30.0),
            angle: std::f32::consts::FRAC_PI_2,
            spread: std::f32::consts::PI,
            size: 2.0,
            lifetime: 1.0,
            gravity: 0.0,
            color: Color::WHITE,
            particles: Vec::new(),
            rng: Rng::new(1),
            accumulator: 0.0,
            burst_timer: 0.0,
            burst_fired: false,
        }
    }
}

impl EmitterComponent {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_mode(mut self, mode: EmissionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_burst_count(mut self, count: u32) -> Self {
        self.burst_count = count;
        self
    }

    pub fn with_burst_interval(mut self, interval: f32) -> Self {
        self.burst_interval = interval;
        self
    }

    pub fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.speed_range = (min, max);
        self
    }

    pub fn with_direction(mut self, angle: f32, spread: f32) -> Self {
        self.angle = angle;
        self.spread = spread;
        self
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::new(seed);
        self
    }

    /// Advance emission by `dt` seconds. Returns the number of particles to spawn.
    fn emission(&mut self, dt: f32) -> usize {
        if !self.active {
            return 0;
        }

        match self.mode {
            EmissionMode::Continuous => {
                self.accumulator += self.rate * dt;
                let count = self.accumulator as usize;
                self.accumulator -= count as f32;
                count
            }
            EmissionMode::Burst => {
                if self.burst_interval <= 0.0 {
                    if self.burst_fired {
                        0
                    } else {
                        self.burst_fired = true;
                        self.burst_count as usize
                    }
                } else {
                    self.burst_timer += dt;
                    if self.burst_timer >= self.burst_interval {
                        self.burst_timer -= self.burst_interval;
                        self.burst_count as usize
                    } else {
                        0
                    }
                }
            }
        }
    }

    /// Age and move live particles, then spawn new ones at `origin`.
    pub fn tick(&mut self, origin: Vec2, dt: f32) {
        let gravity = Vec2::new(0.0, self.gravity);
        self.particles.retain_mut(|p| {
            p.life -= dt;
            if p.life <= 0.0 {
                return false;
            }
            p.velocity += gravity * dt;
            p.pos += p.velocity * dt;
            true
        });

        for _ in 0..self.emission(dt) {
            let angle = self.angle + self.rng.range(-0.5, 0.5) * self.spread;
            let speed = self.rng.range(self.speed_range.0, self.speed_range.1);
            self.particles.push(Particle {
                pos: origin,
                velocity: Vec2::from_angle(angle) * speed,
                size: self.size,
                life: self.lifetime,
                lifetime: self.lifetime,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_accumulator() {
        let mut e = EmitterComponent::new().with_rate(60.0);
        e.tick(Vec2::ZERO, 1.0 / 60.0);
        assert_eq!(e.particles.len(), 1);
    }

    #[test]
    fn burst_one_shot() {
        let mut e = EmitterComponent::new()
            .with_mode(EmissionMode::Burst)
            .with_burst_count(10)
            .with_burst_interval(0.0);
        e.tick(Vec2::new(5.0, 5.0), 0.016);
        assert_eq!(e.particles.len(), 10);
        assert!(e.particles.iter().all(|p| p.pos == Vec2::new(5.0, 5.0)));
        e.tick(Vec2::ZERO, 0.016);
        assert_eq!(e.particles.len(), 10);
    }

    #[test]
    fn burst_repeating() {
        let mut e = EmitterComponent::new()
            .with_mode(EmissionMode::Burst)
            .with_burst_count(5)
            .with_burst_interval(1.0)
            .with_lifetime(10.0);
        e.tick(Vec2::ZERO, 0.5);
        assert!(e.particles.is_empty());
        e.tick(Vec2::ZERO, 0.6);
        assert_eq!(e.particles.len(), 5);
    }

    #[test]
    fn particles_expire_and_fall() {
        let mut e = EmitterComponent::new()
            .with_mode(EmissionMode::Burst)
            .with_burst_count(3)
            .with_speed_range(0.0, 0.0)
            .with_gravity(-100.0)
            .with_lifetime(0.5);
        e.tick(Vec2::ZERO, 0.1);
        e.tick(Vec2::ZERO, 0.1);
        assert!(e.particles.iter().all(|p| p.pos.y < 0.0));
        e.tick(Vec2::ZERO, 1.0);
        assert!(e.particles.is_empty());
    }

    #[test]
    fn inactive_emitter_spawns_nothing() {
        let mut e = EmitterComponent::new().with_rate(100.0);
        e.active = false;
        e.tick(Vec2::ZERO, 1.0);
        assert!(e.particles.is_empty());
    }
}
