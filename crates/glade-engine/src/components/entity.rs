use glam::Vec2;

use crate::api::types::{Color, EntityId, Facing};
use crate::components::emitter::EmitterComponent;
use crate::components::gate::GateComponent;
use crate::components::layer::RenderingLayer;
use crate::components::npc::NpcBehavior;
use crate::components::platform::PlatformPath;
use crate::components::player::PlayerController;
use crate::components::trigger::TriggerComponent;
use crate::core::bounds::Bounds;
use crate::core::collision_map::Environment;
use crate::core::physics::{Motion, PhysicsBody};

/// What an entity is. Drives which behavior runs in the update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Npc,
    Platform,
    Prop,
    Gate,
    Trigger,
    CameraBounds,
    Particles,
}

/// How the render pass draws an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Appearance {
    #[default]
    Hidden,
    /// Flat rectangle covering the entity's box.
    Rect { color: Color, layer: RenderingLayer },
    /// Animated Aseprite sprite, anchored at the feet.
    Sprite {
        sheet: String,
        tag: String,
        layer: RenderingLayer,
    },
}

/// Fat Entity: a single struct with optional components.
///
/// `pos` is the feet: horizontally centered, at the bottom edge of the box.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Level-data name, used to resolve gates and find points of interest.
    pub name: Option<String>,
    /// Inactive entities are skipped by queries, updates and rendering.
    pub active: bool,
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    /// Environment this entity presents to point queries. `None` = not collidable.
    pub solid: Option<Environment>,
    /// Whether entity-overlap queries see this entity.
    pub trigger_enabled: bool,
    /// Campaign filter. `None` exists in both campaigns.
    pub new_game_plus: Option<bool>,
    pub appearance: Appearance,
    pub body: Option<PhysicsBody>,
    pub player: Option<PlayerController>,
    pub npc: Option<NpcBehavior>,
    pub platform: Option<PlatformPath>,
    pub gate: Option<GateComponent>,
    pub trigger: Option<TriggerComponent>,
    pub emitter: Option<EmitterComponent>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            active: true,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            facing: Facing::Right,
            solid: None,
            trigger_enabled: true,
            new_game_plus: None,
            appearance: Appearance::Hidden,
            body: None,
            player: None,
            npc: None,
            platform: None,
            gate: None,
            trigger: None,
            emitter: None,
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_solid(mut self, env: Environment) -> Self {
        self.solid = Some(env);
        self
    }

    pub fn with_trigger_enabled(mut self, enabled: bool) -> Self {
        self.trigger_enabled = enabled;
        self
    }

    pub fn with_new_game_plus(mut self, flag: Option<bool>) -> Self {
        self.new_game_plus = flag;
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_player(mut self, player: PlayerController) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_npc(mut self, npc: NpcBehavior) -> Self {
        self.npc = Some(npc);
        self
    }

    pub fn with_platform(mut self, path: PlatformPath) -> Self {
        self.platform = Some(path);
        self
    }

    pub fn with_gate(mut self, gate: GateComponent) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerComponent) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_emitter(mut self, emitter: EmitterComponent) -> Self {
        self.emitter = Some(emitter);
        self
    }

    // -- Queries --

    pub fn bounds(&self) -> Bounds {
        Bounds::from_feet(self.pos, self.size)
    }

    /// Environment this entity reports at a world point, or air.
    pub fn collides_with(&self, x: f32, y: f32) -> Environment {
        match self.solid {
            Some(env) if self.active && self.bounds().contains(x, y) => env,
            _ => Environment::Air,
        }
    }

    /// Whether the entity exists in the given campaign mode.
    pub fn exists_in(&self, new_game_plus: bool) -> bool {
        self.new_game_plus.map_or(true, |flag| flag == new_game_plus)
    }

    pub fn name_is(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Copy back the result of a physics step.
    pub fn apply_motion(&mut self, motion: Motion) {
        self.pos = motion.pos;
        self.body = Some(motion.body);
    }
}
