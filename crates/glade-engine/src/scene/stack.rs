//! The scene stack.
//!
//! Scene changes are commands. They run one at a time: a change whose
//! transitions span several frames stays in flight while every stacked
//! scene keeps updating, and later commands wait in a queue behind it.
//! Nothing is cancelled.

use std::collections::VecDeque;
use std::fmt;

use crate::api::context::GameContext;
use crate::api::error::GameError;
use crate::input::queue::InputEvent;
use crate::renderer::context::DrawContext;
use crate::scene::transition::Transition;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u32);

/// A requested change to the stack.
pub enum SceneCommand {
    Push(Box<dyn Scene>),
    Pop { no_transition: bool },
    Set(Box<dyn Scene>),
}

impl fmt::Debug for SceneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneCommand::Push(scene) => write!(f, "Push({})", scene.name()),
            SceneCommand::Pop { no_transition } => write!(f, "Pop {{ no_transition: {} }}", no_transition),
            SceneCommand::Set(scene) => write!(f, "Set({})", scene.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Set up, in-transition running, not yet activated.
    Entering,
    Active,
    /// Stacked under another scene.
    Inactive,
    /// Deactivated, out-transition running, cleaned up when it ends.
    Leaving,
}

struct SceneEntry {
    id: SceneId,
    scene: Box<dyn Scene>,
    z_index: i32,
    phase: ScenePhase,
    transition: Option<Transition>,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Push {
        incoming: SceneId,
    },
    Pop {
        outgoing: SceneId,
    },
    Set {
        incoming: SceneId,
        incoming_ready: bool,
        outgoing: Option<SceneId>,
    },
}

pub struct Scenes {
    /// Sorted by z-index; ties keep push order.
    entries: Vec<SceneEntry>,
    active: Option<SceneId>,
    pending: VecDeque<SceneCommand>,
    in_flight: Option<Operation>,
    next_id: u32,
}

impl Default for Scenes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenes {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            active: None,
            pending: VecDeque::new(),
            in_flight: None,
            next_id: 1,
        }
    }

    // -- Consumer API --

    /// Deactivate the active scene, set up `scene` and stack it. It becomes
    /// active once its in-transition finishes.
    pub fn push_scene(&mut self, ctx: &mut GameContext, scene: Box<dyn Scene>) -> Result<(), GameError> {
        self.pending.push_back(SceneCommand::Push(scene));
        self.pump(ctx)
    }

    /// Remove the active scene (after its out-transition unless
    /// `no_transition`) and activate the new top.
    pub fn pop_scene(&mut self, ctx: &mut GameContext, no_transition: bool) -> Result<(), GameError> {
        self.pending.push_back(SceneCommand::Pop { no_transition });
        self.pump(ctx)
    }

    /// Replace the active scene. `scene` is active immediately; the
    /// outgoing scene's out-transition runs alongside the incoming
    /// in-transition and it is removed once both are done.
    pub fn set_scene(&mut self, ctx: &mut GameContext, scene: Box<dyn Scene>) -> Result<(), GameError> {
        self.pending.push_back(SceneCommand::Set(scene));
        self.pump(ctx)
    }

    /// Advance transitions and update every stacked scene, then settle
    /// finished transitions and run queued changes.
    pub fn update(&mut self, ctx: &mut GameContext, dt: f32) -> Result<(), GameError> {
        for entry in &mut self.entries {
            if let Some(transition) = entry.transition.as_mut() {
                transition.advance(dt);
            }
            entry.scene.update(ctx, dt);
        }
        self.settle(ctx);
        self.collect(ctx);
        self.pump(ctx)
    }

    /// Draw every stacked scene back to front, each through its transition.
    pub fn draw(&mut self, surface: &mut dyn DrawContext, width: f32, height: f32) {
        for entry in &mut self.entries {
            surface.save();
            let scene = &mut entry.scene;
            match &entry.transition {
                Some(transition) => {
                    transition.draw(surface, width, height, &mut |s| scene.draw(s, width, height))
                }
                None => scene.draw(surface, width, height),
            }
            surface.restore();
        }
    }

    /// Deliver input to the active scene only.
    pub fn handle_input(&mut self, ctx: &mut GameContext, event: InputEvent) -> Result<(), GameError> {
        if let Some(id) = self.active {
            if let Some(entry) = self.entry_mut(id) {
                entry.scene.handle_input(ctx, event);
            }
        }
        self.collect(ctx);
        self.pump(ctx)
    }

    // -- Inspection --

    pub fn active(&self) -> Option<SceneId> {
        self.active
    }

    pub fn active_name(&self) -> Option<&str> {
        let id = self.active?;
        self.entry(id).map(|e| e.scene.name())
    }

    pub fn phase(&self, id: SceneId) -> Option<ScenePhase> {
        self.entry(id).map(|e| e.phase)
    }

    /// Scene ids in update/draw order.
    pub fn draw_order(&self) -> Vec<SceneId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.scene.name()).collect()
    }

    /// A change is in flight or queued.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -- State machine --

    fn entry(&self, id: SceneId) -> Option<&SceneEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: SceneId) -> Option<&mut SceneEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    fn collect(&mut self, ctx: &mut GameContext) {
        self.pending.extend(ctx.take_scene_commands());
    }

    /// Start queued commands until one leaves a transition in flight.
    fn pump(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        while self.in_flight.is_none() {
            let Some(command) = self.pending.pop_front() else {
                break;
            };
            log::debug!("scene command {:?}", command);
            match command {
                SceneCommand::Push(scene) => self.start_push(ctx, scene)?,
                SceneCommand::Pop { no_transition } => self.start_pop(ctx, no_transition),
                SceneCommand::Set(scene) => self.start_set(ctx, scene)?,
            }
            // Lifecycle hooks may have asked for more changes.
            self.collect(ctx);
        }
        Ok(())
    }

    fn insert(&mut self, scene: Box<dyn Scene>, phase: ScenePhase) -> SceneId {
        let id = SceneId(self.next_id);
        self.next_id += 1;
        let z_index = scene.z_index();
        self.entries.push(SceneEntry {
            id,
            scene,
            z_index,
            phase,
            transition: None,
        });
        self.entries.sort_by_key(|e| e.z_index);
        id
    }

    fn remove(&mut self, ctx: &mut GameContext, id: SceneId) {
        if let Some(index) = self.entries.iter().position(|e| e.id == id) {
            let mut entry = self.entries.remove(index);
            entry.scene.cleanup(ctx);
            log::info!("scene {:?} removed", entry.scene.name());
        }
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Deactivate the active scene. Returns it so a failed change can restore it.
    fn release_active(&mut self, ctx: &mut GameContext) -> Option<SceneId> {
        let id = self.active.take()?;
        if let Some(entry) = self.entry_mut(id) {
            if entry.phase == ScenePhase::Active {
                entry.scene.deactivate(ctx);
                entry.phase = ScenePhase::Inactive;
            }
        }
        Some(id)
    }

    /// Activate a scene and give it focus.
    fn enter(&mut self, ctx: &mut GameContext, id: SceneId) {
        let Some(entry) = self.entry_mut(id) else {
            return;
        };
        entry.transition = None;
        entry.scene.activate(ctx);
        entry.phase = ScenePhase::Active;
        log::info!("scene {:?} active", entry.scene.name());
        self.active = Some(id);
    }

    fn setup(
        &mut self,
        ctx: &mut GameContext,
        scene: &mut dyn Scene,
        previous: Option<SceneId>,
    ) -> Result<(), GameError> {
        if let Err(err) = scene.setup(ctx) {
            log::error!("setup of scene {:?} failed: {}", scene.name(), err);
            if let Some(id) = previous {
                self.enter(ctx, id);
            }
            return Err(err);
        }
        Ok(())
    }

    fn start_push(&mut self, ctx: &mut GameContext, mut scene: Box<dyn Scene>) -> Result<(), GameError> {
        let previous = self.release_active(ctx);
        self.setup(ctx, scene.as_mut(), previous)?;

        let transition = scene.in_transition().filter(|t| !t.is_complete());
        let id = self.insert(scene, ScenePhase::Entering);
        match transition {
            Some(t) => {
                if let Some(entry) = self.entry_mut(id) {
                    entry.transition = Some(t);
                }
                self.in_flight = Some(Operation::Push { incoming: id });
            }
            None => self.enter(ctx, id),
        }
        Ok(())
    }

    fn start_pop(&mut self, ctx: &mut GameContext, no_transition: bool) {
        let Some(id) = self.active.or_else(|| self.entries.last().map(|e| e.id)) else {
            log::warn!("pop_scene on an empty scene stack");
            return;
        };
        self.release_active(ctx);

        let Some(entry) = self.entry_mut(id) else {
            return;
        };
        entry.phase = ScenePhase::Leaving;
        let transition = if no_transition {
            None
        } else {
            entry.scene.out_transition().filter(|t| !t.is_complete())
        };
        match transition {
            Some(t) => {
                entry.transition = Some(t);
                self.in_flight = Some(Operation::Pop { outgoing: id });
            }
            None => self.finish_pop(ctx, id),
        }
    }

    fn finish_pop(&mut self, ctx: &mut GameContext, id: SceneId) {
        self.remove(ctx, id);
        if self.active.is_none() {
            if let Some(top) = self.entries.last().map(|e| e.id) {
                self.enter(ctx, top);
            }
        }
    }

    fn start_set(&mut self, ctx: &mut GameContext, mut scene: Box<dyn Scene>) -> Result<(), GameError> {
        let outgoing = self.active.or_else(|| self.entries.last().map(|e| e.id));
        let previous = self.release_active(ctx);
        self.setup(ctx, scene.as_mut(), previous)?;

        if let Some(entry) = outgoing.and_then(|id| self.entry_mut(id)) {
            entry.phase = ScenePhase::Leaving;
            entry.transition = entry.scene.out_transition().filter(|t| !t.is_complete());
        }

        let transition = scene.in_transition().filter(|t| !t.is_complete());
        let incoming = self.insert(scene, ScenePhase::Entering);
        self.active = Some(incoming);
        let incoming_ready = match transition {
            Some(t) => {
                if let Some(entry) = self.entry_mut(incoming) {
                    entry.transition = Some(t);
                }
                false
            }
            None => {
                self.enter(ctx, incoming);
                true
            }
        };
        self.in_flight = Some(Operation::Set {
            incoming,
            incoming_ready,
            outgoing,
        });
        self.settle(ctx);
        Ok(())
    }

    fn transition_done(&self, id: SceneId) -> bool {
        self.entry(id)
            .and_then(|e| e.transition.as_ref())
            .map_or(true, Transition::is_complete)
    }

    /// Finish the in-flight change if its transitions are done.
    fn settle(&mut self, ctx: &mut GameContext) {
        let Some(op) = self.in_flight.take() else {
            return;
        };
        self.in_flight = match op {
            Operation::Push { incoming } => {
                if self.transition_done(incoming) {
                    self.enter(ctx, incoming);
                    None
                } else {
                    Some(op)
                }
            }
            Operation::Pop { outgoing } => {
                if self.transition_done(outgoing) {
                    self.finish_pop(ctx, outgoing);
                    None
                } else {
                    Some(op)
                }
            }
            Operation::Set {
                incoming,
                mut incoming_ready,
                outgoing,
            } => {
                if !incoming_ready && self.transition_done(incoming) {
                    self.enter(ctx, incoming);
                    incoming_ready = true;
                }
                let outgoing_done = outgoing.map_or(true, |id| self.transition_done(id));
                if incoming_ready && outgoing_done {
                    if let Some(id) = outgoing {
                        self.remove(ctx, id);
                    }
                    None
                } else {
                    Some(Operation::Set {
                        incoming,
                        incoming_ready,
                        outgoing,
                    })
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::api::config::GameConfig;
    use crate::input::queue::Button;
    use crate::renderer::recording::RecordingContext;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Probe {
        name: &'static str,
        z: i32,
        log: Log,
        in_t: Option<Transition>,
        out_t: Option<Transition>,
        fail_setup: bool,
        pop_on_input: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                z: 0,
                log: log.clone(),
                in_t: None,
                out_t: None,
                fail_setup: false,
                pop_on_input: false,
            }
        }

        fn z(mut self, z: i32) -> Self {
            self.z = z;
            self
        }

        fn fade_in(mut self, seconds: f32) -> Self {
            self.in_t = Some(Transition::fade_in(seconds));
            self
        }

        fn fade_out(mut self, seconds: f32) -> Self {
            self.out_t = Some(Transition::fade_out(seconds));
            self
        }

        fn boxed(self) -> Box<dyn Scene> {
            Box::new(self)
        }

        fn note(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, what));
        }
    }

    impl Scene for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn z_index(&self) -> i32 {
            self.z
        }

        fn setup(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
            self.note("setup");
            if self.fail_setup {
                return Err(GameError::MissingPointOfInterest("player".into()));
            }
            Ok(())
        }

        fn activate(&mut self, _ctx: &mut GameContext) {
            self.note("activate");
        }

        fn deactivate(&mut self, _ctx: &mut GameContext) {
            self.note("deactivate");
        }

        fn cleanup(&mut self, _ctx: &mut GameContext) {
            self.note("cleanup");
        }

        fn in_transition(&self) -> Option<Transition> {
            self.in_t.clone()
        }

        fn out_transition(&self) -> Option<Transition> {
            self.out_t.clone()
        }

        fn update(&mut self, _ctx: &mut GameContext, _dt: f32) {
            self.note("update");
        }

        fn draw(&mut self, _ctx: &mut dyn DrawContext, _width: f32, _height: f32) {
            self.note("draw");
        }

        fn handle_input(&mut self, ctx: &mut GameContext, _event: InputEvent) {
            self.note("input");
            if self.pop_on_input {
                ctx.pop_scene_immediately();
            }
        }
    }

    fn setup() -> (Scenes, GameContext, Log) {
        (
            Scenes::new(),
            GameContext::new(GameConfig::default()),
            Rc::new(RefCell::new(Vec::new())),
        )
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn draw_order_sorts_by_z_index() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("zero", &log).z(0).boxed()).unwrap();
        scenes.push_scene(&mut ctx, Probe::new("two", &log).z(2).boxed()).unwrap();
        scenes.push_scene(&mut ctx, Probe::new("one", &log).z(1).boxed()).unwrap();
        assert_eq!(scenes.names(), vec!["zero", "one", "two"]);
    }

    #[test]
    fn equal_z_keeps_push_order() {
        let (mut scenes, mut ctx, log) = setup();
        for name in ["a", "b", "c"] {
            scenes.push_scene(&mut ctx, Probe::new(name, &log).z(5).boxed()).unwrap();
        }
        scenes.push_scene(&mut ctx, Probe::new("low", &log).z(-1).boxed()).unwrap();
        assert_eq!(scenes.names(), vec!["low", "a", "b", "c"]);
    }

    #[test]
    fn push_runs_lifecycle_in_order() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("a", &log).boxed()).unwrap();
        scenes
            .push_scene(&mut ctx, Probe::new("b", &log).fade_in(0.5).boxed())
            .unwrap();

        assert_eq!(
            entries(&log),
            vec!["a:setup", "a:activate", "a:deactivate", "b:setup"]
        );
        assert_eq!(scenes.active(), None);
        assert!(scenes.is_busy());

        scenes.update(&mut ctx, 0.6).unwrap();
        assert_eq!(scenes.active_name(), Some("b"));
        assert_eq!(entries(&log).last().map(String::as_str), Some("b:activate"));
        assert!(!scenes.is_busy());
    }

    #[test]
    fn set_scene_activates_incoming_immediately() {
        let (mut scenes, mut ctx, log) = setup();
        scenes
            .push_scene(&mut ctx, Probe::new("a", &log).fade_out(1.0).boxed())
            .unwrap();
        scenes
            .set_scene(&mut ctx, Probe::new("b", &log).fade_in(0.2).boxed())
            .unwrap();

        assert_eq!(scenes.active_name(), Some("b"));
        assert_eq!(scenes.len(), 2);
        let a = scenes.draw_order()[0];
        assert_eq!(scenes.phase(a), Some(ScenePhase::Leaving));

        scenes.update(&mut ctx, 0.3).unwrap();
        assert!(entries(&log).contains(&"b:activate".to_string()));
        assert_eq!(scenes.len(), 2, "outgoing waits for its own transition");

        scenes.update(&mut ctx, 0.8).unwrap();
        assert_eq!(scenes.names(), vec!["b"]);
        assert_eq!(scenes.active_name(), Some("b"));

        let log = entries(&log);
        let activated = log.iter().position(|e| e == "b:activate").unwrap();
        let cleaned = log.iter().position(|e| e == "a:cleanup").unwrap();
        assert!(activated < cleaned);
    }

    #[test]
    fn set_scene_waits_for_incoming_before_removing_outgoing() {
        let (mut scenes, mut ctx, log) = setup();
        scenes
            .push_scene(&mut ctx, Probe::new("a", &log).fade_out(0.1).boxed())
            .unwrap();
        scenes
            .set_scene(&mut ctx, Probe::new("b", &log).fade_in(1.0).boxed())
            .unwrap();

        scenes.update(&mut ctx, 0.5).unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes.active_name(), Some("b"));

        scenes.update(&mut ctx, 0.6).unwrap();
        assert_eq!(scenes.names(), vec!["b"]);
    }

    #[test]
    fn set_scene_without_transitions_swaps_at_once() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("a", &log).boxed()).unwrap();
        scenes.set_scene(&mut ctx, Probe::new("b", &log).boxed()).unwrap();
        assert_eq!(scenes.names(), vec!["b"]);
        assert!(!scenes.is_busy());
    }

    #[test]
    fn pop_reactivates_new_top() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("a", &log).boxed()).unwrap();
        scenes
            .push_scene(&mut ctx, Probe::new("b", &log).fade_out(0.5).boxed())
            .unwrap();

        scenes.pop_scene(&mut ctx, false).unwrap();
        assert_eq!(scenes.len(), 2, "out-transition still running");
        assert_eq!(scenes.active(), None);

        scenes.update(&mut ctx, 0.5).unwrap();
        assert_eq!(scenes.names(), vec!["a"]);
        assert_eq!(scenes.active_name(), Some("a"));
        assert_eq!(
            &entries(&log)[entries(&log).len() - 2..],
            &["b:cleanup".to_string(), "a:activate".to_string()]
        );
    }

    #[test]
    fn pop_without_transition_is_immediate() {
        let (mut scenes, mut ctx, log) = setup();
        scenes
            .push_scene(&mut ctx, Probe::new("a", &log).fade_out(0.5).boxed())
            .unwrap();
        scenes.pop_scene(&mut ctx, true).unwrap();
        assert!(scenes.is_empty());
        assert_eq!(scenes.active(), None);
    }

    #[test]
    fn pop_on_empty_stack_is_harmless() {
        let (mut scenes, mut ctx, _log) = setup();
        assert!(scenes.pop_scene(&mut ctx, false).is_ok());
        assert!(scenes.is_empty());
    }

    #[test]
    fn changes_queue_behind_an_in_flight_transition() {
        let (mut scenes, mut ctx, log) = setup();
        scenes
            .push_scene(&mut ctx, Probe::new("a", &log).fade_in(1.0).boxed())
            .unwrap();
        scenes.push_scene(&mut ctx, Probe::new("b", &log).boxed()).unwrap();
        assert_eq!(scenes.names(), vec!["a"]);

        scenes.update(&mut ctx, 1.0).unwrap();
        assert_eq!(scenes.names(), vec!["a", "b"]);
        assert_eq!(scenes.active_name(), Some("b"));
        let log = entries(&log);
        let a_active = log.iter().position(|e| e == "a:activate").unwrap();
        let b_setup = log.iter().position(|e| e == "b:setup").unwrap();
        assert!(a_active < b_setup);
    }

    #[test]
    fn failed_setup_restores_previous_scene() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("a", &log).boxed()).unwrap();
        let mut broken = Probe::new("broken", &log);
        broken.fail_setup = true;

        let err = scenes.push_scene(&mut ctx, broken.boxed()).unwrap_err();
        assert!(matches!(err, GameError::MissingPointOfInterest(_)));
        assert_eq!(scenes.names(), vec!["a"]);
        assert_eq!(scenes.active_name(), Some("a"));
    }

    #[test]
    fn every_scene_updates_but_only_active_gets_input() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("level", &log).boxed()).unwrap();
        scenes
            .push_scene(&mut ctx, Probe::new("pause", &log).z(1).boxed())
            .unwrap();
        log.borrow_mut().clear();

        scenes.update(&mut ctx, 0.016).unwrap();
        scenes
            .handle_input(&mut ctx, InputEvent::ButtonDown(Button::Pause))
            .unwrap();
        assert_eq!(
            entries(&log),
            vec!["level:update", "pause:update", "pause:input"]
        );
    }

    #[test]
    fn scenes_can_pop_themselves_from_input() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("level", &log).boxed()).unwrap();
        let mut overlay = Probe::new("pause", &log).z(1);
        overlay.pop_on_input = true;
        scenes.push_scene(&mut ctx, overlay.boxed()).unwrap();

        scenes
            .handle_input(&mut ctx, InputEvent::ButtonDown(Button::Pause))
            .unwrap();
        assert_eq!(scenes.names(), vec!["level"]);
        assert_eq!(scenes.active_name(), Some("level"));
    }

    #[test]
    fn draw_wraps_each_scene_in_save_restore() {
        let (mut scenes, mut ctx, log) = setup();
        scenes.push_scene(&mut ctx, Probe::new("a", &log).boxed()).unwrap();
        scenes
            .push_scene(&mut ctx, Probe::new("b", &log).fade_in(1.0).boxed())
            .unwrap();
        log.borrow_mut().clear();

        let mut surface = RecordingContext::new();
        scenes.draw(&mut surface, 320.0, 180.0);
        assert_eq!(entries(&log), vec!["a:draw", "b:draw"]);
        assert_eq!(surface.depth(), 0);
        assert!(surface.calls.contains(&crate::renderer::recording::DrawCall::Alpha(0.0)));
    }
}
