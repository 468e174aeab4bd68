//! Per-kind behavior for one simulation tick.
//!
//! Entities are visited by index so each can be copied out, stepped against
//! the rest of the world, and written back.

use crate::api::config::GameConfig;
use crate::api::types::WorldEvent;
use crate::components::entity::EntityKind;
use crate::core::collision_map::Environment;
use crate::core::physics::{self, Footing, Motion};
use crate::core::world::World;
use crate::systems::emitter::tick_emitters;

/// Run behaviors and physics for every live entity, in list order.
pub fn tick_entities(world: &mut World, config: &GameConfig, dt: f32) {
    let ngp = world.new_game_plus();
    for index in 0..world.len() {
        let kind = match world.entity_at(index) {
            Some(e) if e.active && e.exists_in(ngp) => e.kind,
            _ => continue,
        };
        match kind {
            EntityKind::Player => tick_player(world, index, config, dt),
            EntityKind::Npc => tick_npc(world, index, dt),
            EntityKind::Platform => tick_platform(world, index, dt),
            EntityKind::Prop => {
                step_body(world, index, dt);
            }
            EntityKind::Gate
            | EntityKind::Trigger
            | EntityKind::CameraBounds
            | EntityKind::Particles => {}
        }
    }
    tick_emitters(world, dt);
}

fn tick_player(world: &mut World, index: usize, config: &GameConfig, dt: f32) {
    let Some(entity) = world.entity_at(index) else {
        return;
    };
    let on_platform = world.collides_with(entity.pos.x, entity.pos.y - 1.0, &[entity.id], &[])
        == Environment::Platform;

    let Some(entity) = world.entity_at_mut(index) else {
        return;
    };
    if let (Some(player), Some(body)) = (entity.player.as_mut(), entity.body.as_mut()) {
        if let Some(facing) = player.steer(body, on_platform, config, dt) {
            entity.facing = facing;
        }
    }
    step_body(world, index, dt);
}

fn tick_npc(world: &mut World, index: usize, dt: f32) {
    let Some(entity) = world.entity_at_mut(index) else {
        return;
    };
    let walking = match (entity.npc.as_ref(), entity.body.as_mut()) {
        (Some(npc), Some(body)) => npc.steer(body),
        _ => false,
    };
    step_body(world, index, dt);

    let Some(entity) = world.entity_at_mut(index) else {
        return;
    };
    if let (Some(npc), Some(body)) = (entity.npc.as_mut(), entity.body.as_ref()) {
        npc.react(walking, body);
        entity.facing = npc.direction;
    }
}

fn tick_platform(world: &mut World, index: usize, dt: f32) {
    let ppm = world.physics().pixels_per_meter;
    let Some(entity) = world.entity_at_mut(index) else {
        return;
    };
    let pos = entity.pos;
    if let (Some(path), Some(body)) = (entity.platform.as_mut(), entity.body.as_mut()) {
        body.velocity = path.steer(pos, ppm, dt);
    }
    step_body(world, index, dt);
}

/// Integrate the body of the entity at `index`, free it if it ended up
/// inside terrain, and report newly submerged bodies. `None` when the
/// entity has no body.
pub fn step_body(world: &mut World, index: usize, dt: f32) -> Option<Footing> {
    let mut motion = world.entity_at(index).and_then(Motion::of)?;
    let was_submerged = motion.body.submerged;

    let footing = physics::step(world, &mut motion, dt);
    if !motion.body.floating && physics::is_embedded(world, &motion) {
        let moved = physics::pull_out_of_ground(world, &mut motion)
            | physics::pull_out_of_ceiling(world, &mut motion)
            | physics::pull_out_of_wall(world, &mut motion);
        if moved {
            log::debug!("entity {:?} pulled out of terrain at {}", motion.id, motion.pos);
        }
    }
    if motion.body.submerged && !was_submerged {
        world.emit(WorldEvent::Drowned { entity: motion.id });
    }

    world.entity_at_mut(index)?.apply_motion(motion);
    Some(footing)
}
