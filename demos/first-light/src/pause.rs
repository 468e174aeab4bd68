use glade_engine::renderer::context::{DrawContext, TextStyle};
use glade_engine::{Bounds, Button, Color, GameContext, InputEvent, Scene, Transition};

/// Dimmed overlay over the level. Pause again to resume.
pub struct PauseScene {
    style: TextStyle,
}

impl PauseScene {
    pub fn new() -> Self {
        Self {
            style: TextStyle {
                size: 16.0,
                ..TextStyle::default()
            },
        }
    }
}

impl Scene for PauseScene {
    fn name(&self) -> &str {
        "pause"
    }

    fn z_index(&self) -> i32 {
        10
    }

    fn in_transition(&self) -> Option<Transition> {
        Some(Transition::fade_in(0.15))
    }

    fn out_transition(&self) -> Option<Transition> {
        Some(Transition::fade_out(0.15))
    }

    fn update(&mut self, _ctx: &mut GameContext, _dt: f32) {}

    fn draw(&mut self, ctx: &mut dyn DrawContext, width: f32, height: f32) {
        ctx.fill_rect(Bounds::new(0.0, 0.0, width, height), Color::rgba(0, 0, 0, 160));
        ctx.fill_text("PAUSED", width / 2.0, height / 2.0, &self.style);
    }

    fn handle_input(&mut self, ctx: &mut GameContext, event: InputEvent) {
        if event == InputEvent::ButtonDown(Button::Pause) {
            ctx.pop_scene();
        }
    }
}
