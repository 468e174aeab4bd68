//! The live object list of a level plus its collision map, and every spatial
//! query the simulation asks.
//!
//! Queries never mutate. Objects spawned or removed while a tick is running
//! are queued and applied by [`World::flush_pending`] once the update pass is
//! over, so iteration order is stable for the whole tick.

use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::types::{EntityId, WorldEvent};
use crate::components::entity::{Entity, EntityKind};
use crate::core::bounds::Bounds;
use crate::core::collision_map::{CollisionMap, Environment};

pub struct World {
    map: CollisionMap,
    physics: PhysicsConfig,
    new_game_plus: bool,
    entities: Vec<Entity>,
    pending_spawn: Vec<Entity>,
    pending_despawn: Vec<EntityId>,
    next_id: u32,
    events: Vec<WorldEvent>,
}

impl World {
    pub fn new(map: CollisionMap, physics: PhysicsConfig) -> Self {
        Self {
            map,
            physics,
            new_game_plus: false,
            entities: Vec::with_capacity(128),
            pending_spawn: Vec::new(),
            pending_despawn: Vec::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    pub fn with_new_game_plus(mut self, new_game_plus: bool) -> Self {
        self.new_game_plus = new_game_plus;
        self
    }

    pub fn map(&self) -> &CollisionMap {
        &self.map
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    pub fn new_game_plus(&self) -> bool {
        self.new_game_plus
    }

    pub fn set_new_game_plus(&mut self, new_game_plus: bool) {
        self.new_game_plus = new_game_plus;
    }

    // -- Object list --

    /// Allocate a fresh entity id.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity immediately. Only for level construction, outside a tick.
    pub fn insert(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id.0 + 1);
        self.entities.push(entity);
    }

    /// Queue an entity to join the world after the current tick.
    pub fn spawn(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id.0 + 1);
        self.pending_spawn.push(entity);
    }

    /// Queue an entity for removal after the current tick.
    pub fn despawn(&mut self, id: EntityId) {
        self.pending_despawn.push(id);
    }

    /// Apply queued spawns and removals. Returns (added, removed).
    pub fn flush_pending(&mut self) -> (usize, usize) {
        let before = self.entities.len();
        if !self.pending_despawn.is_empty() {
            let doomed = std::mem::take(&mut self.pending_despawn);
            self.entities.retain(|e| !doomed.contains(&e.id));
            self.pending_spawn.retain(|e| !doomed.contains(&e.id));
        }
        let removed = before - self.entities.len();
        let added = self.pending_spawn.len();
        self.entities.append(&mut self.pending_spawn);
        if added > 0 || removed > 0 {
            log::debug!("world flush: +{} -{}", added, removed);
        }
        (added, removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Entity by list position. Used by passes that must re-borrow the
    /// world between entities.
    pub fn entity_at(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn entity_at_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entities that exist in the current campaign mode.
    pub fn live(&self) -> impl Iterator<Item = &Entity> {
        let ngp = self.new_game_plus;
        self.entities
            .iter()
            .filter(move |e| e.active && e.exists_in(ngp))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.live().find(|e| e.name_is(name))
    }

    pub fn find_by_kind(&self, kind: EntityKind) -> Option<&Entity> {
        self.live().find(|e| e.kind == kind)
    }

    pub fn find_all_by_kind(&self, kind: EntityKind) -> Vec<&Entity> {
        self.live().filter(|e| e.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // -- Events --

    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Point queries --

    /// Static map only.
    pub fn environment_at(&self, x: f32, y: f32) -> Environment {
        self.map.get(x, y)
    }

    /// What occupies a point. Collidable objects are asked in list order and
    /// the first non-air answer not in `ignore_envs` wins; otherwise the
    /// static map answers, with `ignore_envs` reading as air.
    pub fn collides_with(
        &self,
        x: f32,
        y: f32,
        ignore_objects: &[EntityId],
        ignore_envs: &[Environment],
    ) -> Environment {
        for entity in &self.entities {
            if ignore_objects.contains(&entity.id) {
                continue;
            }
            let env = entity.collides_with(x, y);
            if !env.is_air() && !ignore_envs.contains(&env) {
                return env;
            }
        }
        let env = self.map.get(x, y);
        if ignore_envs.contains(&env) {
            Environment::Air
        } else {
            env
        }
    }

    /// First non-air environment going down from `(x, y)` over `height` pixels.
    pub fn collides_with_vertical_line(
        &self,
        x: f32,
        y: f32,
        height: u32,
        ignore_objects: &[EntityId],
        ignore_envs: &[Environment],
    ) -> Environment {
        (0..height)
            .map(|i| self.collides_with(x, y - i as f32, ignore_objects, ignore_envs))
            .find(|env| !env.is_air())
            .unwrap_or(Environment::Air)
    }

    /// Walk upward from `y` until something collides or the top of the map.
    pub fn ground_at(
        &self,
        x: f32,
        y: f32,
        ignore_objects: &[EntityId],
        ignore_envs: &[Environment],
    ) -> f32 {
        let top = self.map.height() as f32;
        let mut y = y;
        while y < top && self.collides_with(x, y, ignore_objects, ignore_envs).is_air() {
            y += 1.0;
        }
        y
    }

    /// The collidable object occupying a point, if any.
    pub fn object_at(
        &self,
        x: f32,
        y: f32,
        ignore_objects: &[EntityId],
        ignore_envs: &[Environment],
    ) -> Option<EntityId> {
        self.entities
            .iter()
            .filter(|e| !ignore_objects.contains(&e.id))
            .find(|e| {
                let env = e.collides_with(x, y);
                !env.is_air() && !ignore_envs.contains(&env)
            })
            .map(|e| e.id)
    }

    // -- Box queries --

    /// Entities overlapping `source`, both boxes grown by `margin`.
    /// Particle systems, entities with overlap queries disabled and entities
    /// outside the current campaign never match.
    pub fn entity_collisions(
        &self,
        source: EntityId,
        margin: f32,
        ignore: &[EntityId],
    ) -> Vec<EntityId> {
        let Some(src) = self.get(source) else {
            return Vec::new();
        };
        let area = src.bounds().expand(margin);
        self.live()
            .filter(|e| e.id != source && !ignore.contains(&e.id))
            .filter(|e| e.kind != EntityKind::Particles && e.trigger_enabled)
            .filter(|e| e.bounds().expand(margin).intersects(&area))
            .map(|e| e.id)
            .collect()
    }

    /// Enabled gates overlapping `source`.
    pub fn gate_collisions(&self, source: EntityId) -> Vec<EntityId> {
        self.overlapping(source, |e| e.gate.as_ref().is_some_and(|g| !g.disabled))
    }

    /// Camera-bounds regions overlapping `source`. Regions ignore the
    /// campaign filter.
    pub fn camera_bounds(&self, source: EntityId) -> Vec<EntityId> {
        let Some(area) = self.get(source).map(Entity::bounds) else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|e| e.kind == EntityKind::CameraBounds && e.id != source)
            .filter(|e| e.bounds().intersects(&area))
            .map(|e| e.id)
            .collect()
    }

    fn overlapping(&self, source: EntityId, filter: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        let Some(area) = self.get(source).map(Entity::bounds) else {
            return Vec::new();
        };
        self.live()
            .filter(|e| e.id != source && filter(e))
            .filter(|e| e.bounds().intersects(&area))
            .map(|e| e.id)
            .collect()
    }

    pub fn bounds_of(&self, id: EntityId) -> Option<Bounds> {
        self.get(id).map(Entity::bounds)
    }

    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.get(id).map(|e| e.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::gate::GateComponent;

    fn world() -> World {
        let map = CollisionMap::new(64, 64)
            .with_rect(0, 0, 64, 4, Environment::Solid)
            .with_rect(20, 10, 10, 1, Environment::Platform)
            .with_rect(40, 4, 5, 3, Environment::Water);
        World::new(map, PhysicsConfig::default())
    }

    fn prop(world: &mut World, x: f32, y: f32, w: f32, h: f32) -> EntityId {
        let id = world.next_id();
        world.insert(
            Entity::new(id, EntityKind::Prop)
                .with_pos(Vec2::new(x, y))
                .with_size(Vec2::new(w, h)),
        );
        id
    }

    #[test]
    fn static_map_queries() {
        let w = world();
        assert_eq!(w.environment_at(5.0, 2.0), Environment::Solid);
        assert_eq!(w.collides_with(25.0, 10.0, &[], &[]), Environment::Platform);
        assert_eq!(
            w.collides_with(25.0, 10.0, &[], &[Environment::Platform]),
            Environment::Air
        );
        assert_eq!(w.collides_with(5.0, -50.0, &[], &[]), Environment::Air);
    }

    #[test]
    fn objects_win_over_map_in_list_order() {
        let mut w = world();
        let a = prop(&mut w, 10.0, 20.0, 8.0, 8.0);
        w.get_mut(a).unwrap().solid = Some(Environment::Bounce);
        let b = prop(&mut w, 10.0, 20.0, 8.0, 8.0);
        w.get_mut(b).unwrap().solid = Some(Environment::Solid);

        assert_eq!(w.collides_with(10.0, 22.0, &[], &[]), Environment::Bounce);
        assert_eq!(w.collides_with(10.0, 22.0, &[a], &[]), Environment::Solid);
        assert_eq!(
            w.collides_with(10.0, 22.0, &[], &[Environment::Bounce]),
            Environment::Solid
        );
        assert_eq!(w.object_at(10.0, 22.0, &[a], &[]), Some(b));
        assert_eq!(w.object_at(30.0, 22.0, &[], &[]), None);
    }

    #[test]
    fn vertical_line_and_ground() {
        let w = world();
        assert_eq!(
            w.collides_with_vertical_line(5.0, 10.0, 8, &[], &[]),
            Environment::Solid
        );
        assert_eq!(
            w.collides_with_vertical_line(5.0, 10.0, 3, &[], &[]),
            Environment::Air
        );
        // Walks upward from below the platform until it hits it.
        assert_eq!(w.ground_at(25.0, 5.0, &[], &[]), 10.0);
        // Nothing above: stops at the map height.
        assert_eq!(w.ground_at(5.0, 30.0, &[], &[]), 64.0);
    }

    #[test]
    fn entity_collisions_respect_margin_and_filters() {
        let mut w = world();
        let hero = prop(&mut w, 10.0, 4.0, 10.0, 10.0);
        let near = prop(&mut w, 22.0, 4.0, 10.0, 10.0);
        let far = prop(&mut w, 50.0, 4.0, 10.0, 10.0);
        let hidden = prop(&mut w, 12.0, 4.0, 4.0, 4.0);
        w.get_mut(hidden).unwrap().trigger_enabled = false;
        let sparks = prop(&mut w, 12.0, 4.0, 4.0, 4.0);
        w.get_mut(sparks).unwrap().kind = EntityKind::Particles;
        let other_campaign = prop(&mut w, 12.0, 4.0, 4.0, 4.0);
        w.get_mut(other_campaign).unwrap().new_game_plus = Some(true);

        assert!(w.entity_collisions(hero, 0.0, &[]).is_empty());
        assert_eq!(w.entity_collisions(hero, 1.0, &[]), vec![near]);
        assert!(w.entity_collisions(hero, 1.0, &[near]).is_empty());
        assert_eq!(w.entity_collisions(hero, 20.0, &[]), vec![near, far]);
        assert!(w.entity_collisions(EntityId(999), 5.0, &[]).is_empty());
    }

    #[test]
    fn gate_and_camera_queries() {
        let mut w = world();
        let hero = prop(&mut w, 10.0, 4.0, 10.0, 10.0);
        let gate = prop(&mut w, 12.0, 4.0, 8.0, 16.0);
        w.get_mut(gate).unwrap().gate = Some(GateComponent::to("elsewhere"));
        let closed = prop(&mut w, 12.0, 4.0, 8.0, 16.0);
        w.get_mut(closed).unwrap().gate = Some(GateComponent {
            disabled: true,
            ..GateComponent::default()
        });
        let cam = prop(&mut w, 32.0, 0.0, 64.0, 64.0);
        w.get_mut(cam).unwrap().kind = EntityKind::CameraBounds;

        assert_eq!(w.gate_collisions(hero), vec![gate]);
        assert_eq!(w.camera_bounds(hero), vec![cam]);
    }

    #[test]
    fn spawns_and_despawns_wait_for_flush() {
        let mut w = world();
        let a = prop(&mut w, 0.0, 0.0, 1.0, 1.0);
        let id = w.next_id();
        w.spawn(Entity::new(id, EntityKind::Prop));
        w.despawn(a);
        assert_eq!(w.len(), 1);
        assert!(w.get(id).is_none());

        assert_eq!(w.flush_pending(), (1, 1));
        assert!(w.get(a).is_none());
        assert!(w.get(id).is_some());
    }
}
