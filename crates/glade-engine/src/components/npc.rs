use crate::api::types::Facing;
use crate::core::physics::PhysicsBody;

/// Patrol behavior: walk until stopped, then turn around.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcBehavior {
    /// Meters per second. Zero stands still.
    pub walk_speed: f32,
    pub direction: Facing,
    /// Line shown in a bubble while the player is close.
    pub speech: Option<String>,
    /// How close the player must be to see the speech bubble, in pixels.
    pub talk_margin: f32,
}

impl Default for NpcBehavior {
    fn default() -> Self {
        Self {
            walk_speed: 1.5,
            direction: Facing::Right,
            speech: None,
            talk_margin: 16.0,
        }
    }
}

impl NpcBehavior {
    pub fn with_speech(mut self, text: impl Into<String>) -> Self {
        self.speech = Some(text.into());
        self
    }

    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Set walking velocity before the physics step. Returns whether the
    /// NPC is trying to move.
    pub fn steer(&self, body: &mut PhysicsBody) -> bool {
        if !body.on_ground || self.walk_speed == 0.0 {
            return false;
        }
        body.velocity.x = self.direction.sign() * self.walk_speed;
        true
    }

    /// After the step: the integrator zeroes velocity on a rejected move, so
    /// a walking NPC with no horizontal velocity hit something.
    pub fn react(&mut self, walking: bool, body: &PhysicsBody) {
        if walking && body.velocity.x == 0.0 {
            self.turn();
        }
    }

    pub fn turn(&mut self) {
        self.direction = match self.direction {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_when_blocked() {
        let mut npc = NpcBehavior::default();
        let mut body = PhysicsBody::new();
        body.on_ground = true;
        let walking = npc.steer(&mut body);
        assert!(walking);
        assert!(body.velocity.x > 0.0);

        body.velocity = glam::Vec2::ZERO;
        npc.react(walking, &body);
        assert_eq!(npc.direction, Facing::Left);
    }

    #[test]
    fn airborne_npc_does_not_steer() {
        let npc = NpcBehavior::default();
        let mut body = PhysicsBody::new();
        assert!(!npc.steer(&mut body));
        assert_eq!(body.velocity.x, 0.0);
    }
}
