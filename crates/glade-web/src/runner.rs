use glade_engine::{AudioCommand, Button, Color, Game, GameLoop, ImageId, InputEvent};
use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

use crate::canvas::CanvasSurface;

/// Generic game runner that wires a [`GameLoop`] to a canvas.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game_loop: GameLoop<G>,
    surface: CanvasSurface,
    background: Color,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G, canvas_id: &str) -> Result<Self, JsValue> {
        Ok(Self {
            game_loop: GameLoop::new(game),
            surface: CanvasSurface::from_id(canvas_id)?,
            background: Color::BLACK,
            initialized: false,
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        match self.game_loop.init() {
            Ok(()) => self.initialized = true,
            Err(err) => log::error!("game init failed: {err}"),
        }
    }

    /// Run one frame at `requestAnimationFrame` time `timestamp_ms`.
    pub fn frame(&mut self, timestamp_ms: f64) {
        if !self.initialized {
            return;
        }
        self.surface.clear(self.background);
        let (width, height) = self.surface.size();
        if let Err(err) = self.game_loop.frame(timestamp_ms, &mut self.surface, width, height) {
            log::error!("frame failed: {err}");
        }
    }

    /// Queue a button edge. Unknown codes are dropped.
    pub fn push_button(&mut self, code: u32, down: bool) {
        let Some(button) = Button::from_code(code) else {
            log::debug!("unknown button code {code}");
            return;
        };
        let event = if down {
            InputEvent::ButtonDown(button)
        } else {
            InputEvent::ButtonUp(button)
        };
        self.game_loop.push_input(event);
    }

    pub fn register_image(&mut self, id: u32, image: HtmlImageElement) {
        self.surface.register_image(ImageId(id), image);
    }

    /// Audio requests since the last call, as a JSON array of
    /// `{"kind": "play_sound" | "play_music", "id": ...}`.
    pub fn drain_audio_json(&mut self) -> String {
        let commands: Vec<AudioCommand> = self.game_loop.drain_audio();
        serde_json::to_string(&commands).unwrap_or_else(|err| {
            log::warn!("audio commands not serializable: {err}");
            "[]".to_string()
        })
    }

    pub fn game_loop(&self) -> &GameLoop<G> {
        &self.game_loop
    }

    pub fn game_loop_mut(&mut self) -> &mut GameLoop<G> {
        &mut self.game_loop
    }
}
