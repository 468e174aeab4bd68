use std::collections::HashMap;

use crate::api::config::GameConfig;
use crate::api::error::GameError;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::level::builtin;
use crate::level::data::EntityDesc;

/// Builds an entity from its level description.
pub type EntityFactory = fn(&EntityDesc, EntityId, &GameConfig) -> Result<Entity, GameError>;

/// Maps entity names and type keys to their factories.
///
/// A description resolves by its `name` first, so a level can give one
/// entity bespoke construction, then by its `type`.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    factories: HashMap<String, EntityFactory>,
}

impl EntityRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in entity kind.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register `factory` under `key`, replacing any previous one.
    pub fn register(&mut self, key: impl Into<String>, factory: EntityFactory) {
        let key = key.into();
        if self.factories.insert(key.clone(), factory).is_some() {
            log::debug!("entity factory {:?} replaced", key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn resolve(&self, desc: &EntityDesc) -> Option<EntityFactory> {
        desc.name
            .as_deref()
            .and_then(|name| self.factories.get(name))
            .or_else(|| self.factories.get(&desc.kind))
            .copied()
    }

    /// Construct the entity `desc` describes.
    pub fn build(&self, desc: &EntityDesc, id: EntityId, config: &GameConfig) -> Result<Entity, GameError> {
        let factory = self.resolve(desc).ok_or_else(|| GameError::UnknownEntity {
            kind: desc.kind.clone(),
            name: desc.name.clone(),
        })?;
        let mut entity = factory(desc, id, config)?;
        if entity.name.is_none() {
            entity.name = desc.name.clone();
        }
        if entity.new_game_plus.is_none() {
            entity.new_game_plus = desc.new_game_plus;
        }
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::EntityKind;
    use glam::Vec2;

    fn statue(desc: &EntityDesc, id: EntityId, _config: &GameConfig) -> Result<Entity, GameError> {
        Ok(Entity::new(id, EntityKind::Prop).with_pos(desc.pos()).with_size(Vec2::splat(99.0)))
    }

    #[test]
    fn resolves_name_before_type() {
        let mut registry = EntityRegistry::with_builtin();
        registry.register("statue", statue);
        let config = GameConfig::default();

        let named = EntityDesc::new("prop", 5.0, 6.0).with_name("statue");
        let entity = registry.build(&named, EntityId(1), &config).unwrap();
        assert_eq!(entity.size, Vec2::splat(99.0));
        assert_eq!(entity.name.as_deref(), Some("statue"));

        let plain = EntityDesc::new("prop", 5.0, 6.0).with_size(8.0, 8.0);
        let entity = registry.build(&plain, EntityId(2), &config).unwrap();
        assert_eq!(entity.size, Vec2::splat(8.0));
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let registry = EntityRegistry::new();
        let desc = EntityDesc::new("dragon", 0.0, 0.0).with_name("smaug");
        let err = registry.build(&desc, EntityId(1), &GameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            GameError::UnknownEntity { kind, name: Some(name) } if kind == "dragon" && name == "smaug"
        ));
    }

    #[test]
    fn campaign_flag_carries_over() {
        let registry = EntityRegistry::with_builtin();
        let mut desc = EntityDesc::new("prop", 0.0, 0.0);
        desc.new_game_plus = Some(true);
        let entity = registry.build(&desc, EntityId(1), &GameConfig::default()).unwrap();
        assert_eq!(entity.new_game_plus, Some(true));
    }
}
