use crate::api::types::{EntityId, WorldEvent};
use crate::core::world::World;

/// Feed every live trigger whether `source` overlaps it and emit
/// [`WorldEvent::TriggerEntered`] for each one it just walked into.
/// Returns the triggers entered this tick.
pub fn update_triggers(world: &mut World, source: EntityId) -> Vec<EntityId> {
    let Some(area) = world.bounds_of(source) else {
        return Vec::new();
    };
    let ngp = world.new_game_plus();

    let mut entered = Vec::new();
    for entity in world.iter_mut() {
        if !entity.active || !entity.exists_in(ngp) || entity.id == source {
            continue;
        }
        let inside = entity.bounds().intersects(&area);
        let Some(trigger) = entity.trigger.as_mut() else {
            continue;
        };
        if trigger.observe(inside) {
            entered.push((entity.id, entity.name.clone().unwrap_or_default()));
        }
    }

    entered
        .into_iter()
        .map(|(trigger, name)| {
            log::debug!("trigger {:?} ({}) entered", trigger, name);
            world.emit(WorldEvent::TriggerEntered { trigger, name });
            trigger
        })
        .collect()
}
