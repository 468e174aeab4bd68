//! Levels: serialized entity lists, the factories that turn them into
//! entities, and the scene that plays them.

pub mod builtin;
pub mod data;
pub mod registry;
pub mod scene;

pub use data::{EntityDesc, LevelData};
pub use registry::{EntityFactory, EntityRegistry};
pub use scene::{LevelScene, SceneFactory};
