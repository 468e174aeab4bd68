//! Scenes: independently updated and drawn layers of the game (a level, a
//! pause overlay, a title card), stacked and ordered by z-index.

pub mod stack;
pub mod transition;

use crate::api::context::GameContext;
use crate::api::error::GameError;
use crate::input::queue::InputEvent;
use crate::renderer::context::DrawContext;

pub use stack::{SceneCommand, SceneId, ScenePhase, Scenes};
pub use transition::{Edge, Transition, TransitionDirection, TransitionKind};

/// A scene on the stack.
///
/// Lifecycle: `setup` once after construction, then `activate` /
/// `deactivate` as the scene gains and loses input focus, and `cleanup`
/// once when it leaves the stack. Every stacked scene is updated and drawn
/// every frame, focused or not.
pub trait Scene {
    fn name(&self) -> &str {
        "scene"
    }

    /// Draw order. Lower draws first; ties keep push order.
    fn z_index(&self) -> i32 {
        0
    }

    /// Build the scene. An error aborts the scene change that created it.
    fn setup(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
        Ok(())
    }

    fn activate(&mut self, _ctx: &mut GameContext) {}

    fn deactivate(&mut self, _ctx: &mut GameContext) {}

    fn cleanup(&mut self, _ctx: &mut GameContext) {}

    fn in_transition(&self) -> Option<Transition> {
        None
    }

    fn out_transition(&self) -> Option<Transition> {
        None
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32);

    fn draw(&mut self, ctx: &mut dyn DrawContext, width: f32, height: f32);

    /// Only the active scene receives input.
    fn handle_input(&mut self, _ctx: &mut GameContext, _event: InputEvent) {}
}
