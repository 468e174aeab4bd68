use crate::api::config::GameConfig;
use crate::api::types::Facing;
use crate::core::physics::PhysicsBody;

/// How long `jumping_down` stays set after a drop-through, in seconds.
pub const DROP_THROUGH_TIME: f32 = 0.3;

/// Buttons currently held, as seen by the player controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub interact: bool,
}

/// Turns held buttons into velocity for the player's physics body.
#[derive(Debug, Clone, Default)]
pub struct PlayerController {
    pub input: PlayerInput,
    /// Set while a gate transit owns the player.
    pub frozen: bool,
    jump_held: bool,
    interact_held: bool,
    interact_pressed: bool,
    drop_timer: f32,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True on the tick the interact button went down.
    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    /// Apply this tick's input to `body`. Returns the new facing when the
    /// player is walking.
    pub fn steer(
        &mut self,
        body: &mut PhysicsBody,
        standing_on_platform: bool,
        config: &GameConfig,
        dt: f32,
    ) -> Option<Facing> {
        if self.drop_timer > 0.0 {
            self.drop_timer -= dt;
            if self.drop_timer <= 0.0 {
                body.jumping_down = false;
            }
        }

        let jump_pressed = self.input.jump && !self.jump_held;
        self.jump_held = self.input.jump;
        self.interact_pressed = self.input.interact && !self.interact_held;
        self.interact_held = self.input.interact;

        if self.frozen {
            body.velocity.x = 0.0;
            body.gravity_override = None;
            return None;
        }

        let dir = self.input.right as i32 - self.input.left as i32;
        body.velocity.x = dir as f32 * config.player.walk_speed;

        if jump_pressed && body.on_ground {
            if self.input.down && standing_on_platform {
                body.jumping_down = true;
                self.drop_timer = DROP_THROUGH_TIME;
            } else {
                body.velocity.y = config.player.jump_velocity;
            }
        }

        // Releasing jump while rising cuts the arc short.
        body.gravity_override = if body.velocity.y > 0.0 && !self.input.jump {
            Some(config.physics.gravity * config.player.short_hop_gravity_factor)
        } else {
            None
        };

        match dir {
            d if d < 0 => Some(Facing::Left),
            d if d > 0 => Some(Facing::Right),
            _ => None,
        }
    }

    /// Drop all held buttons, e.g. when the level loses focus.
    pub fn release_all(&mut self) {
        self.input = PlayerInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> PhysicsBody {
        let mut body = PhysicsBody::new();
        body.on_ground = true;
        body
    }

    #[test]
    fn walks_and_faces() {
        let config = GameConfig::default();
        let mut pc = PlayerController::new();
        let mut body = grounded();
        pc.input.left = true;
        assert_eq!(pc.steer(&mut body, false, &config, 0.016), Some(Facing::Left));
        assert_eq!(body.velocity.x, -config.player.walk_speed);
    }

    #[test]
    fn jump_only_on_press_edge() {
        let config = GameConfig::default();
        let mut pc = PlayerController::new();
        let mut body = grounded();
        pc.input.jump = true;
        pc.steer(&mut body, false, &config, 0.016);
        assert_eq!(body.velocity.y, config.player.jump_velocity);

        body.velocity.y = 0.0;
        pc.steer(&mut body, false, &config, 0.016);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn released_jump_uses_short_hop_gravity() {
        let config = GameConfig::default();
        let mut pc = PlayerController::new();
        let mut body = grounded();
        body.velocity.y = 3.0;
        pc.steer(&mut body, false, &config, 0.016);
        assert_eq!(
            body.gravity_override,
            Some(config.physics.gravity * config.player.short_hop_gravity_factor)
        );
    }

    #[test]
    fn down_jump_drops_through_platform_then_expires() {
        let config = GameConfig::default();
        let mut pc = PlayerController::new();
        let mut body = grounded();
        pc.input.down = true;
        pc.input.jump = true;
        pc.steer(&mut body, true, &config, 0.016);
        assert!(body.jumping_down);
        assert_eq!(body.velocity.y, 0.0);

        pc.input = PlayerInput::default();
        pc.steer(&mut body, false, &config, DROP_THROUGH_TIME);
        assert!(!body.jumping_down);
    }

    #[test]
    fn frozen_player_stands_still() {
        let config = GameConfig::default();
        let mut pc = PlayerController::new();
        pc.frozen = true;
        pc.input.right = true;
        let mut body = grounded();
        body.velocity.x = 3.0;
        assert_eq!(pc.steer(&mut body, false, &config, 0.016), None);
        assert_eq!(body.velocity.x, 0.0);
    }
}
