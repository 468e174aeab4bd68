//! Discrete-time integrator for bodies moving through a [`World`].
//!
//! A step moves a body by `velocity * pixels_per_meter * dt`, gated by a
//! swept box check against the world, then probes the point under the feet
//! to decide between gravity, drowning and landing. There is no sliding: a
//! rejected move zeroes the velocity and leaves the body where it was.

use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::bounds::Bounds;
use crate::core::collision_map::{round_coord, Environment};
use crate::core::world::World;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Physics state of a dynamic entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    /// Meters per second, Y-up.
    pub velocity: Vec2,
    /// Per-axis magnitude cap applied at the start of every step.
    pub max_velocity: Vec2,
    /// Floating bodies skip gravity and collision: they move unconditionally.
    pub floating: bool,
    /// Object under the feet as of the last step. Lookup only.
    pub ground: Option<EntityId>,
    pub on_ground: bool,
    pub submerged: bool,
    /// Where the body last stood on solid footing. Respawn anchor.
    pub last_ground_position: Option<Vec2>,
    /// Replaces the configured gravity while set (e.g. short hops).
    pub gravity_override: Option<f32>,
    /// Platforms are ignored while set.
    pub jumping_down: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            max_velocity: Vec2::splat(f32::INFINITY),
            floating: false,
            ground: None,
            on_ground: false,
            submerged: false,
            last_ground_position: None,
            gravity_override: None,
            jumping_down: false,
        }
    }
}

impl PhysicsBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floating() -> Self {
        Self {
            floating: true,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_max_velocity(mut self, max: Vec2) -> Self {
        self.max_velocity = max.abs();
        self
    }

    /// Set velocity, clamped to `max_velocity`.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity.clamp(-self.max_velocity, self.max_velocity);
    }

    /// Vertical acceleration for this body.
    pub fn gravity(&self, config: &PhysicsConfig) -> f32 {
        self.gravity_override.unwrap_or(config.gravity)
    }
}

/// The slice of an entity the integrator works on. Copied out of the world
/// so the step can query the world while moving the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub body: PhysicsBody,
}

impl Motion {
    /// `None` for entities without a physics body.
    pub fn of(entity: &Entity) -> Option<Self> {
        entity.body.map(|body| Self {
            id: entity.id,
            pos: entity.pos,
            size: entity.size,
            body,
        })
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_feet(self.pos, self.size)
    }
}

/// What the body ended the step standing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footing {
    Floating,
    Air,
    Water,
    Ground(Environment),
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

const PLATFORMS: [Environment; 1] = [Environment::Platform];

fn blocks(env: Environment) -> bool {
    !matches!(env, Environment::Air | Environment::Water)
}

/// Advance one body by `dt` seconds.
pub fn step(world: &World, m: &mut Motion, dt: f32) -> Footing {
    let config = *world.physics();
    let ppm = config.pixels_per_meter;
    m.body.velocity = m
        .body
        .velocity
        .clamp(-m.body.max_velocity, m.body.max_velocity);

    if m.body.floating {
        m.pos += m.body.velocity * ppm * dt;
        return Footing::Floating;
    }

    let self_only = [m.id];

    // Ride whatever physics-driven object we stand on.
    m.body.ground = world.object_at(m.pos.x, m.pos.y - 1.0, &self_only, &[]);
    let carry = m
        .body
        .ground
        .and_then(|id| world.get(id))
        .and_then(|ground| ground.body)
        .map(|body| body.velocity);
    if let Some(v) = carry {
        m.pos += v * ppm * dt;
    }

    let target = m.pos + m.body.velocity * ppm * dt;
    update_position(world, m, target);

    // Platforms only hold a body that is not rising.
    let ignore_platforms = m.body.jumping_down || m.body.velocity.y > 0.0;
    let ignore: &[Environment] = if ignore_platforms { &PLATFORMS } else { &[] };
    let was_on_ground = m.body.on_ground;
    match world.collides_with(m.pos.x, m.pos.y - 1.0, &self_only, ignore) {
        Environment::Air => {
            m.body.on_ground = false;
            m.body.submerged = false;
            let vy = m.body.velocity.y + m.body.gravity(&config) * dt;
            m.body.velocity.y = vy.max(-config.terminal_velocity);
            Footing::Air
        }
        Environment::Water => {
            m.body.on_ground = false;
            m.body.submerged = true;
            m.body.velocity = Vec2::new(0.0, -config.drowning_velocity);
            Footing::Water
        }
        env => {
            if m.body.velocity.y < 0.0 {
                m.body.velocity.y = 0.0;
            }
            if !was_on_ground {
                m.pos = Vec2::new(round_coord(m.pos.x) as f32, round_coord(m.pos.y) as f32);
            }
            m.body.on_ground = true;
            m.body.submerged = false;
            m.body.last_ground_position = Some(m.pos);
            Footing::Ground(env)
        }
    }
}

/// Move to `target` if the box fits there. A rejected move zeroes velocity.
pub fn update_position(world: &World, m: &mut Motion, target: Vec2) -> bool {
    if m.body.floating || !blocks(check_collision_box(world, m, target)) {
        m.pos = target;
        return true;
    }
    m.body.velocity = Vec2::ZERO;
    false
}

/// Sample the box edges at `target`. Returns the first blocking environment,
/// or air/water when the box fits.
///
/// Sides are sampled above the feet row, and the leading side is swept across
/// every column entered when moving sideways. The head is swept across every
/// row entered when moving up and the feet across every row entered when
/// moving down; platforms only count on that feet sweep.
pub fn check_collision_box(world: &World, m: &Motion, target: Vec2) -> Environment {
    let ignore_objects = [m.id];
    let half = m.size.x / 2.0;
    let left = target.x - half;
    let right = (target.x + half - 1.0).max(left);
    let head = (target.y + m.size.y - 1.0).max(target.y);
    let probe = |x: f32, y: f32, ignore: &[Environment]| {
        world.collides_with(x, y, &ignore_objects, ignore)
    };

    for y in span(target.y + 1.0, head) {
        for x in [left, right] {
            let env = probe(x, y, &PLATFORMS);
            if blocks(env) {
                return env;
            }
        }
    }

    if target.x != m.pos.x {
        let (from, to) = if target.x > m.pos.x {
            (m.pos.x + half - 1.0, right)
        } else {
            (m.pos.x - half, left)
        };
        for x in cells_entered(from, to) {
            for y in span(target.y + 1.0, head) {
                let env = probe(x, y, &PLATFORMS);
                if blocks(env) {
                    return env;
                }
            }
        }
    }

    if target.y > m.pos.y {
        let old_head = m.pos.y + m.size.y - 1.0;
        for y in cells_entered(old_head, head) {
            for x in span(left, right) {
                let env = probe(x, y, &PLATFORMS);
                if blocks(env) {
                    return env;
                }
            }
        }
    }

    if target.y < m.pos.y {
        let ignore: &[Environment] = if m.body.jumping_down { &PLATFORMS } else { &[] };
        for y in cells_entered(m.pos.y, target.y) {
            for x in span(left, right) {
                let env = probe(x, y, ignore);
                if blocks(env) {
                    return env;
                }
            }
        }
    }

    Environment::Air
}

/// Points from `from` to `to` inclusive, one pixel apart. Empty if `to < from`.
fn span(from: f32, to: f32) -> impl Iterator<Item = f32> {
    let count = if to < from {
        0
    } else {
        (to - from).ceil() as u32 + 1
    };
    (0..count).map(move |i| (from + i as f32).min(to))
}

/// Map cells crossed along one axis going from `from` to `to`, excluding the
/// starting cell.
fn cells_entered(from: f32, to: f32) -> Vec<f32> {
    let (a, b) = (round_coord(from), round_coord(to));
    if b > a {
        (a + 1..=b).map(|cell| cell as f32).collect()
    } else {
        (b..a).map(|cell| cell as f32).collect()
    }
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Nudge up 1px at a time until the feet are clear. Returns whether it moved.
pub fn pull_out_of_ground(world: &World, m: &mut Motion) -> bool {
    let limit = world.map().height() as f32;
    let mut moved = false;
    while m.pos.y < limit && blocks(world.collides_with(m.pos.x, m.pos.y, &[m.id], &[])) {
        m.pos.y += 1.0;
        moved = true;
    }
    moved
}

/// Nudge down 1px at a time until the head is clear.
pub fn pull_out_of_ceiling(world: &World, m: &mut Motion) -> bool {
    let mut moved = false;
    loop {
        let head = m.pos.y + m.size.y - 1.0;
        if m.pos.y <= 0.0 || !blocks(world.collides_with(m.pos.x, head, &[m.id], &PLATFORMS)) {
            return moved;
        }
        m.pos.y -= 1.0;
        moved = true;
    }
}

/// Nudge sideways 1px at a time, away from whichever side is embedded.
pub fn pull_out_of_wall(world: &World, m: &mut Motion) -> bool {
    let width = world.map().width() as f32;
    let half = m.size.x / 2.0;
    let mid = m.pos.y + m.size.y / 2.0;
    let hit = |x: f32| blocks(world.collides_with(x, mid, &[m.id], &PLATFORMS));

    let mut moved = false;
    if hit(m.pos.x + half - 1.0) {
        while m.pos.x > 0.0 && hit(m.pos.x + half - 1.0) {
            m.pos.x -= 1.0;
            moved = true;
        }
    } else if hit(m.pos.x - half) {
        while m.pos.x < width && hit(m.pos.x - half) {
            m.pos.x += 1.0;
            moved = true;
        }
    }
    moved
}

/// Whether the body's box currently overlaps terrain.
pub fn is_embedded(world: &World, m: &Motion) -> bool {
    let feet = world.collides_with(m.pos.x, m.pos.y, &[m.id], &PLATFORMS);
    blocks(feet) || blocks(check_collision_box(world, m, m.pos))
}
