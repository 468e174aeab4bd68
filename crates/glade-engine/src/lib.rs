pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod level;
pub mod renderer;
pub mod scene;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{GameConfig, PhysicsConfig, PlayerConfig};
pub use api::context::GameContext;
pub use api::error::GameError;
pub use api::game::{Game, GameLoop};
pub use api::types::{AudioCommand, Color, EntityId, Facing, ImageId, WorldEvent};
pub use assets::manifest::AssetManifest;
pub use components::entity::{Appearance, Entity, EntityKind};
pub use components::layer::RenderingLayer;
pub use core::bounds::Bounds;
pub use core::collision_map::{CollisionMap, Environment};
pub use core::world::World;
pub use input::queue::{Button, InputEvent, InputQueue};
pub use level::{EntityDesc, EntityRegistry, LevelData, LevelScene};
pub use renderer::{Camera2D, DrawContext, RecordingContext, Renderer, RenderingItem, TextStyle};
pub use scene::{Scene, SceneCommand, Scenes, Transition};
