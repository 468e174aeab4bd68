use crate::core::world::World;

/// Tick all emitters attached to live entities, spawning particles at each
/// entity's position. Particles live in the emitter, in world coordinates.
pub fn tick_emitters(world: &mut World, dt: f32) {
    let ngp = world.new_game_plus();
    for entity in world.iter_mut() {
        if !entity.active || !entity.exists_in(ngp) {
            continue;
        }
        let origin = entity.pos;
        let emitter = match &mut entity.emitter {
            Some(e) => e,
            None => continue,
        };
        emitter.tick(origin, dt);
    }
}
