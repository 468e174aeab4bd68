use serde::Deserialize;

use crate::api::error::GameError;

/// Constants shared by every physics body in a world.
///
/// Velocities are in meters per second; `pixels_per_meter` converts them to
/// per-tick pixel displacement. The world is Y-up, so gravity is negative.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub pixels_per_meter: f32,
    /// Vertical acceleration in m/s².
    pub gravity: f32,
    /// Maximum falling speed (magnitude, m/s).
    pub terminal_velocity: f32,
    /// Fixed sinking speed once a body is in water (magnitude, m/s).
    pub drowning_velocity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 32.0,
            gravity: -20.0,
            terminal_velocity: 10.0,
            drowning_velocity: 0.5,
        }
    }
}

/// Player movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub jump_velocity: f32,
    /// Gravity multiplier applied while rising with the jump button released.
    pub short_hop_gravity_factor: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            jump_velocity: 9.0,
            short_hop_gravity_factor: 2.5,
            width: 12.0,
            height: 24.0,
        }
    }
}

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    /// Campaign mode. Objects flagged for one mode only exist in that mode.
    pub new_game_plus: bool,
    /// Upper bound on a single frame's delta time in seconds.
    pub max_frame_dt: f32,
    /// Delta time used for the very first frame (default: 1/60).
    pub first_frame_dt: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            new_game_plus: false,
            max_frame_dt: 0.1,
            first_frame_dt: 1.0 / 60.0,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "physics": { "gravity": -9.81 }, "new_game_plus": true }"#)
            .unwrap();
        assert_eq!(config.physics.gravity, -9.81);
        assert_eq!(config.physics.pixels_per_meter, 32.0);
        assert!(config.new_game_plus);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(GameError::Json(_))));
    }
}
