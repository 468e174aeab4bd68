pub mod emitter;
pub mod gates;
pub mod render;
pub mod triggers;
pub mod update;
