//! A playable level: a world built from level data, simulated and drawn
//! as one scene.

use crate::api::config::PhysicsConfig;
use crate::api::context::GameContext;
use crate::api::error::GameError;
use crate::api::types::{Color, EntityId, WorldEvent};
use crate::components::entity::EntityKind;
use crate::components::layer::RenderingLayer;
use crate::components::player::PlayerInput;
use crate::core::bounds::Bounds;
use crate::core::collision_map::CollisionMap;
use crate::core::world::World;
use crate::input::queue::{Button, InputEvent};
use crate::level::data::LevelData;
use crate::renderer::camera::Camera2D;
use crate::renderer::context::{DrawContext, TextStyle};
use crate::renderer::queue::Renderer;
use crate::scene::{Scene, Transition};
use crate::systems::gates::{self, GateTransit, TransitStep};
use crate::systems::render::{queue_debug, queue_entities, queue_speech};
use crate::systems::triggers::update_triggers;
use crate::systems::update::tick_entities;

/// Builds the overlay pushed when the pause button goes down.
pub type SceneFactory = Box<dyn Fn() -> Box<dyn Scene>>;

pub struct LevelScene {
    data: LevelData,
    world: World,
    renderer: Renderer,
    camera: Camera2D,
    player: Option<EntityId>,
    input: PlayerInput,
    /// Layer mask the draw pass skips. Debug starts hidden.
    hidden_layers: u32,
    time: f32,
    transit: Option<GateTransit>,
    /// Gates the player overlapped last tick.
    gates_inside: Vec<EntityId>,
    events: Vec<WorldEvent>,
    music_started: bool,
    /// Set while another scene has focus; the world does not tick.
    suspended: bool,
    pause_scene: Option<SceneFactory>,
    speech_style: TextStyle,
    in_transition: Option<Transition>,
    out_transition: Option<Transition>,
}

impl LevelScene {
    pub fn new(data: LevelData, map: CollisionMap) -> Self {
        Self {
            data,
            world: World::new(map, PhysicsConfig::default()),
            renderer: Renderer::new(),
            camera: Camera2D::new(320.0, 180.0),
            player: None,
            input: PlayerInput::default(),
            hidden_layers: RenderingLayer::Debug.bit(),
            time: 0.0,
            transit: None,
            gates_inside: Vec::new(),
            events: Vec::new(),
            music_started: false,
            suspended: false,
            pause_scene: None,
            speech_style: TextStyle::default(),
            in_transition: Some(Transition::fade_in(0.5)),
            out_transition: Some(Transition::fade_out(0.5)),
        }
    }

    pub fn with_pause_scene(mut self, factory: impl Fn() -> Box<dyn Scene> + 'static) -> Self {
        self.pause_scene = Some(Box::new(factory));
        self
    }

    pub fn with_transitions(mut self, enter: Option<Transition>, leave: Option<Transition>) -> Self {
        self.in_transition = enter;
        self.out_transition = leave;
        self
    }

    pub fn with_camera_smoothing(mut self, smoothing: f32) -> Self {
        self.camera.set_smoothing(smoothing);
        self
    }

    pub fn with_speech_style(mut self, style: TextStyle) -> Self {
        self.speech_style = style;
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn in_transit(&self) -> bool {
        self.transit.is_some()
    }

    /// World events since the last call.
    pub fn take_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_layer_visible(&mut self, layer: RenderingLayer, visible: bool) {
        if visible {
            self.hidden_layers &= !layer.bit();
        } else {
            self.hidden_layers |= layer.bit();
        }
    }

    pub fn is_layer_visible(&self, layer: RenderingLayer) -> bool {
        self.hidden_layers & layer.bit() == 0
    }

    // -- Setup --

    fn build_world(&mut self, ctx: &GameContext) -> Result<(), GameError> {
        self.world.set_physics(ctx.config.physics);
        self.world.set_new_game_plus(ctx.config.new_game_plus);
        for desc in &self.data.entities {
            let id = self.world.next_id();
            let entity = ctx.registry.build(desc, id, &ctx.config)?;
            self.world.insert(entity);
        }

        let player = self
            .world
            .find_by_kind(EntityKind::Player)
            .map(|e| e.id)
            .ok_or_else(|| GameError::MissingPointOfInterest("player".to_string()))?;
        self.player = Some(player);

        gates::validate_gates(&self.world)?;
        for sound in self.referenced_sounds() {
            ctx.manifest.require_sound(&sound)?;
        }
        Ok(())
    }

    fn referenced_sounds(&self) -> Vec<String> {
        let mut sounds: Vec<String> = self.data.music.iter().cloned().collect();
        sounds.extend(self.data.ambient_sounds.iter().cloned());
        for gate in self.world.live().filter_map(|e| e.gate.as_ref()) {
            sounds.extend(gate.sounds().map(str::to_string));
        }
        sounds
    }

    // -- Tick --

    fn feed_input(&mut self) {
        let input = self.input;
        let controller = self
            .player
            .and_then(|id| self.world.get_mut(id))
            .and_then(|e| e.player.as_mut());
        if let Some(controller) = controller {
            controller.input = input;
        }
    }

    fn set_frozen(&mut self, frozen: bool) {
        let controller = self
            .player
            .and_then(|id| self.world.get_mut(id))
            .and_then(|e| e.player.as_mut());
        if let Some(controller) = controller {
            controller.frozen = frozen;
        }
    }

    /// Start a transit through the first gate the player just walked into
    /// (automatic gates) or is using (interact).
    fn check_gates(&mut self, ctx: &mut GameContext) {
        let Some(player) = self.player else {
            return;
        };
        let touching = self.world.gate_collisions(player);
        let interact = self
            .world
            .get(player)
            .and_then(|e| e.player.as_ref())
            .is_some_and(|p| p.interact_pressed());
        let used = touching.iter().copied().find(|id| {
            let Some(gate) = self.world.get(*id).and_then(|e| e.gate.as_ref()) else {
                return false;
            };
            if gate.automatic {
                !self.gates_inside.contains(id)
            } else {
                interact
            }
        });
        self.gates_inside = touching;

        let Some(from) = used else {
            return;
        };
        if gates::resolve_target(&self.world, from).is_none() {
            return;
        }
        let Some(gate) = self.world.get(from).and_then(|e| e.gate.clone()) else {
            return;
        };
        if let Some(sound) = gate.enter_sound {
            ctx.play_sound(sound);
        }
        self.set_frozen(true);
        self.transit = Some(GateTransit::new(player, from, gate.fade_duration));
    }

    fn arrive(&mut self, ctx: &mut GameContext, transit: &GateTransit) {
        let Some(to) = gates::teleport(&mut self.world, transit.traveller, transit.from) else {
            return;
        };
        if let Some(gate) = self.world.get(to).and_then(|e| e.gate.as_ref()) {
            if let Some(sound) = &gate.exit_sound {
                ctx.play_sound(sound.clone());
            }
            if let Some(music) = &gate.music {
                ctx.play_music(music.clone());
            }
        }
        self.gates_inside = self.world.gate_collisions(transit.traveller);
        self.update_camera_bounds();
        if let Some(focus) = self.focus() {
            self.camera.look_at(focus);
        }
    }

    fn advance_transit(&mut self, ctx: &mut GameContext, dt: f32) {
        let Some(mut transit) = self.transit.take() else {
            return;
        };
        match transit.advance(dt) {
            TransitStep::Continue => self.transit = Some(transit),
            TransitStep::Arrive => {
                self.arrive(ctx, &transit);
                self.transit = Some(transit);
            }
            TransitStep::Done => self.set_frozen(false),
        }
    }

    fn focus(&self) -> Option<glam::Vec2> {
        self.player
            .and_then(|id| self.world.bounds_of(id))
            .map(|b| b.center())
    }

    fn update_camera_bounds(&mut self) {
        let region = self
            .player
            .and_then(|id| self.world.camera_bounds(id).first().copied())
            .and_then(|id| self.world.bounds_of(id));
        match region {
            Some(bounds) => self.camera.set_bounds(bounds),
            None => self.camera.clear_bounds(),
        }
    }

    fn queue_draw(&mut self, ctx: &GameContext) {
        self.renderer.clear();
        self.renderer.set_camera(self.camera.center);
        queue_entities(&self.world, ctx.sheets(), self.time, &mut self.renderer);
        if let Some(player) = self.player {
            queue_speech(&self.world, player, &self.speech_style, &mut self.renderer);
        }
        if self.is_layer_visible(RenderingLayer::Debug) {
            queue_debug(&self.world, &mut self.renderer);
        }
    }
}

impl Scene for LevelScene {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn setup(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        self.build_world(ctx)?;
        self.update_camera_bounds();
        if let Some(focus) = self.focus() {
            self.camera.look_at(focus);
        }
        self.queue_draw(ctx);
        log::info!(
            "level {:?} built: {} entities",
            self.data.name,
            self.world.len()
        );
        Ok(())
    }

    fn activate(&mut self, ctx: &mut GameContext) {
        self.suspended = false;
        if self.music_started {
            return;
        }
        self.music_started = true;
        if let Some(music) = &self.data.music {
            ctx.play_music(music.clone());
        }
        for sound in &self.data.ambient_sounds {
            ctx.play_sound(sound.clone());
        }
    }

    fn deactivate(&mut self, _ctx: &mut GameContext) {
        self.suspended = true;
        self.input = PlayerInput::default();
        let controller = self
            .player
            .and_then(|id| self.world.get_mut(id))
            .and_then(|e| e.player.as_mut());
        if let Some(controller) = controller {
            controller.release_all();
        }
    }

    fn cleanup(&mut self, _ctx: &mut GameContext) {
        log::info!("level {:?} unloaded", self.data.name);
    }

    fn in_transition(&self) -> Option<Transition> {
        self.in_transition.clone()
    }

    fn out_transition(&self) -> Option<Transition> {
        self.out_transition.clone()
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        if self.suspended {
            return;
        }
        self.time += dt;
        self.advance_transit(ctx, dt);

        self.feed_input();
        tick_entities(&mut self.world, &ctx.config, dt);
        if self.transit.is_none() {
            self.check_gates(ctx);
        }
        if let Some(player) = self.player {
            update_triggers(&mut self.world, player);
        }
        self.world.flush_pending();
        for event in self.world.drain_events() {
            log::debug!("world event {:?}", event);
            self.events.push(event);
        }

        self.update_camera_bounds();
        if let Some(focus) = self.focus() {
            self.camera.follow(focus, dt);
        }
        self.queue_draw(ctx);
    }

    fn draw(&mut self, ctx: &mut dyn DrawContext, width: f32, height: f32) {
        if self.camera.width != width || self.camera.height != height {
            self.camera.resize(width, height);
        }
        ctx.save();
        self.camera.apply(ctx);
        self.renderer.draw_visible_layers(ctx, self.hidden_layers);
        ctx.restore();

        if let Some(transit) = &self.transit {
            let alpha = (transit.cover() * 255.0).round() as u8;
            if alpha > 0 {
                ctx.fill_rect(Bounds::new(0.0, 0.0, width, height), Color::rgba(0, 0, 0, alpha));
            }
        }
    }

    fn handle_input(&mut self, ctx: &mut GameContext, event: InputEvent) {
        let (button, down) = match event {
            InputEvent::ButtonDown(button) => (button, true),
            InputEvent::ButtonUp(button) => (button, false),
        };
        match button {
            Button::Left => self.input.left = down,
            Button::Right => self.input.right = down,
            Button::Up => self.input.up = down,
            Button::Down => self.input.down = down,
            Button::Jump => self.input.jump = down,
            Button::Interact => self.input.interact = down,
            Button::Pause => {
                if let (true, Some(factory)) = (down, &self.pause_scene) {
                    ctx.push_scene(factory());
                }
            }
        }
    }
}
