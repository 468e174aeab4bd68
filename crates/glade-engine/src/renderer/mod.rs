pub mod camera;
pub mod context;
pub mod item;
pub mod queue;
pub mod recording;

pub use camera::Camera2D;
pub use context::{CompositeOperation, DrawContext, TextAlign, TextStyle};
pub use item::{DrawCommand, ParticleSprite, RenderingItem};
pub use queue::{Renderer, SpriteOptions};
pub use recording::{DrawCall, RecordingContext};
