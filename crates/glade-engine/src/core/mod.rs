pub mod bounds;
pub mod collision_map;
pub mod easing;
pub mod physics;
pub mod rng;
pub mod time;
pub mod world;
