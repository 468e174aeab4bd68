use glade_engine::{
    AssetManifest, CollisionMap, Environment, Game, GameConfig, GameContext, GameError, LevelData,
    LevelScene, Scenes,
};

use crate::pause::PauseScene;

const MANIFEST: &str = include_str!("../assets/manifest.json");
const HERO_SHEET: &str = include_str!("../assets/hero.json");
const LEVEL: &str = include_str!("../assets/level.json");

const MAP_W: u32 = 640;
const MAP_H: u32 = 240;

/// Two stacked rooms joined by a door pair, with a pool, a ledge, a moving
/// platform and a patrolling keeper.
pub struct FirstLight {
    new_game_plus: bool,
}

impl FirstLight {
    pub fn new() -> Self {
        Self {
            new_game_plus: false,
        }
    }

    pub fn new_game_plus() -> Self {
        Self {
            new_game_plus: true,
        }
    }
}

/// Terrain, painted in code rather than loaded from a bitmap.
pub fn collision_map() -> CollisionMap {
    CollisionMap::new(MAP_W, MAP_H)
        // Ground with a pool cut into it.
        .with_rect(0, 0, 380, 16, Environment::Solid)
        .with_rect(460, 0, 180, 16, Environment::Solid)
        .with_rect(380, 0, 80, 2, Environment::Solid)
        .with_rect(380, 2, 80, 10, Environment::Water)
        // Walls.
        .with_rect(0, 0, 8, MAP_H, Environment::Solid)
        .with_rect(MAP_W - 8, 0, 8, MAP_H, Environment::Solid)
        // Upper room floor.
        .with_rect(8, 160, MAP_W - 16, 8, Environment::Solid)
        // One-way ledge.
        .with_rect(120, 56, 64, 4, Environment::Platform)
}

impl Game for FirstLight {
    fn config(&self) -> GameConfig {
        GameConfig {
            new_game_plus: self.new_game_plus,
            max_frame_dt: 1.0 / 20.0,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut GameContext, scenes: &mut Scenes) -> Result<(), GameError> {
        ctx.manifest = AssetManifest::from_json(MANIFEST)?;
        ctx.load_sheet("hero", HERO_SHEET)?;

        let level = LevelData::from_json(LEVEL)?;
        let scene = LevelScene::new(level, collision_map())
            .with_camera_smoothing(0.85)
            .with_pause_scene(|| Box::new(PauseScene::new()));
        scenes.push_scene(ctx, Box::new(scene))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glade_engine::renderer::recording::RecordingContext;
    use glade_engine::{AudioCommand, Button, GameLoop, InputEvent};

    fn run(game: &mut GameLoop<FirstLight>, frames: u32, start_ms: f64) -> f64 {
        let mut surface = RecordingContext::new();
        let mut t = start_ms;
        for _ in 0..frames {
            t += 1000.0 / 60.0;
            game.frame(t, &mut surface, 320.0, 180.0).unwrap();
        }
        t
    }

    #[test]
    fn level_loads_and_runs() {
        let mut game = GameLoop::new(FirstLight::new());
        game.init().unwrap();
        assert_eq!(game.scenes().names(), vec!["first-light"]);

        let t = run(&mut game, 120, 0.0);
        assert!(t > 0.0);
        let audio = game.drain_audio();
        assert!(audio.contains(&AudioCommand::PlayMusic("cavern".into())));
        assert!(audio.contains(&AudioCommand::PlaySound("drip".into())));
    }

    #[test]
    fn pause_overlay_comes_and_goes() {
        let mut game = GameLoop::new(FirstLight::new());
        game.init().unwrap();
        let t = run(&mut game, 60, 0.0);

        game.push_input(InputEvent::ButtonDown(Button::Pause));
        let t = run(&mut game, 30, t);
        assert_eq!(game.scenes().active_name(), Some("pause"));

        game.push_input(InputEvent::ButtonUp(Button::Pause));
        game.push_input(InputEvent::ButtonDown(Button::Pause));
        run(&mut game, 30, t);
        assert_eq!(game.scenes().names(), vec!["first-light"]);
        assert_eq!(game.scenes().active_name(), Some("first-light"));
    }

    #[test]
    fn campaign_flag_reaches_the_world() {
        let game = FirstLight::new_game_plus();
        assert!(game.config().new_game_plus);
    }
}
