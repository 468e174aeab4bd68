use crate::api::config::GameConfig;
use crate::api::context::GameContext;
use crate::api::error::GameError;
use crate::api::types::AudioCommand;
use crate::core::time::FrameClock;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::context::DrawContext;
use crate::scene::Scenes;

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Load the manifest and sheets, then push the first scene.
    fn init(&mut self, ctx: &mut GameContext, scenes: &mut Scenes) -> Result<(), GameError>;
}

/// Drives a [`Game`] one host frame at a time: input, then update, then draw.
pub struct GameLoop<G: Game> {
    game: G,
    ctx: GameContext,
    scenes: Scenes,
    input: InputQueue,
    clock: FrameClock,
}

impl<G: Game> GameLoop<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let clock = FrameClock::new(config.first_frame_dt, config.max_frame_dt);
        Self {
            game,
            ctx: GameContext::new(config),
            scenes: Scenes::new(),
            input: InputQueue::new(),
            clock,
        }
    }

    pub fn init(&mut self) -> Result<(), GameError> {
        self.game.init(&mut self.ctx, &mut self.scenes)?;
        log::info!("game initialized: scenes {:?}", self.scenes.names());
        Ok(())
    }

    /// Queue an input event for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame at host time `timestamp_ms`. Returns the delta time used.
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        surface: &mut dyn DrawContext,
        width: f32,
        height: f32,
    ) -> Result<f32, GameError> {
        let dt = self.clock.tick(timestamp_ms);

        for event in self.input.drain() {
            self.scenes.handle_input(&mut self.ctx, event)?;
        }
        self.scenes.update(&mut self.ctx, dt)?;
        self.scenes.draw(surface, width, height);

        Ok(dt)
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCommand> {
        self.ctx.drain_audio()
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn scenes(&self) -> &Scenes {
        &self.scenes
    }

    pub fn game(&self) -> &G {
        &self.game
    }
}
