pub mod aseprite;
pub mod emitter;
pub mod entity;
pub mod gate;
pub mod layer;
pub mod npc;
pub mod platform;
pub mod player;
pub mod trigger;
