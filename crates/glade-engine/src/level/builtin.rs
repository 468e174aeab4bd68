//! Constructors for the entity kinds the engine ships with. Each kind has
//! its own `register_*` function; [`register_all`] runs them all.

use glam::Vec2;

use crate::api::config::GameConfig;
use crate::api::error::GameError;
use crate::api::types::{Color, EntityId, Facing};
use crate::components::emitter::{EmissionMode, EmitterComponent};
use crate::components::entity::{Appearance, Entity, EntityKind};
use crate::components::gate::GateComponent;
use crate::components::layer::RenderingLayer;
use crate::components::npc::NpcBehavior;
use crate::components::platform::PlatformPath;
use crate::components::player::PlayerController;
use crate::components::trigger::TriggerComponent;
use crate::core::collision_map::Environment;
use crate::core::physics::PhysicsBody;
use crate::level::data::EntityDesc;
use crate::level::registry::EntityRegistry;

pub fn register_all(registry: &mut EntityRegistry) {
    register_player(registry);
    register_npc(registry);
    register_platform(registry);
    register_prop(registry);
    register_gate(registry);
    register_trigger(registry);
    register_camera_bounds(registry);
    register_particles(registry);
}

pub fn register_player(registry: &mut EntityRegistry) {
    registry.register("player", build_player);
}

pub fn register_npc(registry: &mut EntityRegistry) {
    registry.register("npc", build_npc);
}

pub fn register_platform(registry: &mut EntityRegistry) {
    registry.register("platform", build_platform);
}

pub fn register_prop(registry: &mut EntityRegistry) {
    registry.register("prop", build_prop);
}

pub fn register_gate(registry: &mut EntityRegistry) {
    registry.register("gate", build_gate);
}

pub fn register_trigger(registry: &mut EntityRegistry) {
    registry.register("trigger", build_trigger);
}

pub fn register_camera_bounds(registry: &mut EntityRegistry) {
    registry.register("camera_bounds", build_camera_bounds);
}

pub fn register_particles(registry: &mut EntityRegistry) {
    registry.register("particles", build_particles);
}

/// `sheet` (+ `tag`) draws a sprite, `color` a rectangle; `layer` overrides
/// the kind's default layer.
fn appearance(
    desc: &EntityDesc,
    layer: RenderingLayer,
    color: Option<Color>,
) -> Result<Appearance, GameError> {
    let layer = desc.prop_layer("layer")?.unwrap_or(layer);
    if let Some(sheet) = desc.prop_string("sheet")? {
        let tag = desc.prop_string("tag")?.unwrap_or_else(|| "idle".to_string());
        return Ok(Appearance::Sprite { sheet, tag, layer });
    }
    Ok(match desc.prop_color("color")?.or(color) {
        Some(color) => Appearance::Rect { color, layer },
        None => Appearance::Hidden,
    })
}

fn facing(desc: &EntityDesc) -> Result<Facing, GameError> {
    Ok(match desc.prop_str("facing")? {
        Some("left") => Facing::Left,
        _ => Facing::Right,
    })
}

fn require_area(desc: &EntityDesc) -> Result<Vec2, GameError> {
    if desc.width <= 0.0 || desc.height <= 0.0 {
        return Err(GameError::InvalidProperty {
            entity: desc.label().to_string(),
            property: "width/height".to_string(),
            reason: "area entities need a positive size".to_string(),
        });
    }
    Ok(Vec2::new(desc.width, desc.height))
}

fn build_player(desc: &EntityDesc, id: EntityId, config: &GameConfig) -> Result<Entity, GameError> {
    let size = desc.size_or(Vec2::new(config.player.width, config.player.height));
    let mut entity = Entity::new(id, EntityKind::Player)
        .with_pos(desc.pos())
        .with_size(size)
        .with_body(PhysicsBody::new())
        .with_player(PlayerController::new())
        .with_appearance(appearance(desc, RenderingLayer::Player, Some(Color::rgb(240, 200, 80)))?);
    entity.facing = facing(desc)?;
    Ok(entity)
}

fn build_npc(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    let mut npc = NpcBehavior::default();
    if let Some(speed) = desc.prop_f32("speed")? {
        npc = npc.with_walk_speed(speed);
    }
    if let Some(speech) = desc.prop_string("speech")? {
        npc = npc.with_speech(speech);
    }
    if let Some(margin) = desc.prop_f32("talkMargin")? {
        npc.talk_margin = margin;
    }
    npc.direction = facing(desc)?;

    let mut entity = Entity::new(id, EntityKind::Npc)
        .with_pos(desc.pos())
        .with_size(desc.size_or(Vec2::new(12.0, 24.0)))
        .with_body(PhysicsBody::new())
        .with_appearance(appearance(desc, RenderingLayer::Entities, Some(Color::rgb(120, 180, 255)))?);
    entity.facing = npc.direction;
    Ok(entity.with_npc(npc))
}

/// A floating platform moving between its placement and `toX`/`toY`.
fn build_platform(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    let from = desc.pos();
    let to = Vec2::new(
        desc.prop_f32("toX")?.unwrap_or(from.x),
        desc.prop_f32("toY")?.unwrap_or(from.y),
    );
    let speed = desc.prop_f32("speed")?.unwrap_or(2.0);
    let env = if desc.prop_bool("solid")?.unwrap_or(false) {
        Environment::Solid
    } else {
        Environment::Platform
    };
    Ok(Entity::new(id, EntityKind::Platform)
        .with_pos(from)
        .with_size(desc.size_or(Vec2::new(32.0, 8.0)))
        .with_solid(env)
        .with_trigger_enabled(false)
        .with_body(PhysicsBody::floating())
        .with_platform(PlatformPath::new(from, to, speed))
        .with_appearance(appearance(desc, RenderingLayer::Platforms, Some(Color::rgb(90, 70, 50)))?))
}

/// Scenery. `solid` makes it block, `physics` makes it fall.
fn build_prop(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    let mut entity = Entity::new(id, EntityKind::Prop)
        .with_pos(desc.pos())
        .with_size(desc.size_or(Vec2::splat(16.0)))
        .with_appearance(appearance(desc, RenderingLayer::Entities, None)?);
    if desc.prop_bool("solid")?.unwrap_or(false) {
        entity = entity.with_solid(Environment::Solid);
    }
    if desc.prop_bool("physics")?.unwrap_or(false) {
        entity = entity.with_body(PhysicsBody::new());
    }
    Ok(entity)
}

fn build_gate(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    let mut gate = GateComponent::default().with_sounds(
        desc.prop_string("enterSound")?,
        desc.prop_string("exitSound")?,
    );
    gate.target = desc.prop_string("target")?;
    gate.music = desc.prop_string("music")?;
    if let Some(seconds) = desc.prop_f32("fadeDuration")? {
        gate = gate.with_fade_duration(seconds);
    }
    gate.automatic = desc.prop_bool("automatic")?.unwrap_or(false);
    gate.disabled = desc.prop_bool("disabled")?.unwrap_or(false);

    Ok(Entity::new(id, EntityKind::Gate)
        .with_pos(desc.pos())
        .with_size(desc.size_or(Vec2::new(16.0, 32.0)))
        .with_trigger_enabled(false)
        .with_gate(gate)
        .with_appearance(appearance(desc, RenderingLayer::Background, None)?))
}

fn build_trigger(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    let trigger = if desc.prop_bool("once")?.unwrap_or(false) {
        TriggerComponent::once()
    } else {
        TriggerComponent::new()
    };
    Ok(Entity::new(id, EntityKind::Trigger)
        .with_pos(desc.pos())
        .with_size(require_area(desc)?)
        .with_trigger_enabled(false)
        .with_trigger(trigger))
}

fn build_camera_bounds(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    Ok(Entity::new(id, EntityKind::CameraBounds)
        .with_pos(desc.pos())
        .with_size(require_area(desc)?)
        .with_trigger_enabled(false))
}

fn build_particles(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
    let mut emitter = EmitterComponent::new().with_seed(id.0 as u64 + 1);
    if desc.prop_str("mode")? == Some("burst") {
        emitter = emitter.with_mode(EmissionMode::Burst);
        if let Some(count) = desc.prop_f32("count")? {
            emitter = emitter.with_burst_count(count.max(0.0) as u32);
        }
        if let Some(interval) = desc.prop_f32("interval")? {
            emitter = emitter.with_burst_interval(interval);
        }
    }
    if let Some(rate) = desc.prop_f32("rate")? {
        emitter = emitter.with_rate(rate);
    }
    if let Some(lifetime) = desc.prop_f32("lifetime")? {
        emitter = emitter.with_lifetime(lifetime);
    }
    if let Some(gravity) = desc.prop_f32("gravity")? {
        emitter = emitter.with_gravity(gravity);
    }
    if let Some(color) = desc.prop_color("color")? {
        emitter = emitter.with_color(color);
    }
    let (min, max) = emitter.speed_range;
    emitter = emitter.with_speed_range(
        desc.prop_f32("speedMin")?.unwrap_or(min),
        desc.prop_f32("speedMax")?.unwrap_or(max),
    );

    Ok(Entity::new(id, EntityKind::Particles)
        .with_pos(desc.pos())
        .with_size(desc.size_or(Vec2::ONE))
        .with_trigger_enabled(false)
        .with_emitter(emitter))
}
