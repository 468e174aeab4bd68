use std::collections::HashMap;

use crate::api::config::GameConfig;
use crate::api::error::GameError;
use crate::api::types::AudioCommand;
use crate::assets::manifest::AssetManifest;
use crate::components::aseprite::AsepriteSheet;
use crate::level::registry::EntityRegistry;
use crate::scene::{Scene, SceneCommand};

/// Engine state shared by every scene, passed to lifecycle hooks and updates.
pub struct GameContext {
    pub config: GameConfig,
    pub registry: EntityRegistry,
    pub manifest: AssetManifest,
    sheets: HashMap<String, AsepriteSheet>,
    audio: Vec<AudioCommand>,
    scene_commands: Vec<SceneCommand>,
}

impl GameContext {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            registry: EntityRegistry::with_builtin(),
            manifest: AssetManifest::default(),
            sheets: HashMap::new(),
            audio: Vec::new(),
            scene_commands: Vec::new(),
        }
    }

    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = manifest;
        self
    }

    // -- Sprite sheets --

    pub fn add_sheet(&mut self, name: impl Into<String>, sheet: AsepriteSheet) {
        self.sheets.insert(name.into(), sheet);
    }

    /// Parse an Aseprite export declared in the manifest and register it.
    pub fn load_sheet(&mut self, name: &str, json: &str) -> Result<(), GameError> {
        let image = self.manifest.require_sheet_image(name)?;
        let sheet = AsepriteSheet::from_json(json, image)?;
        log::debug!("sheet {:?}: {} frames", name, sheet.frame_count());
        self.add_sheet(name, sheet);
        Ok(())
    }

    pub fn sheet(&self, name: &str) -> Option<&AsepriteSheet> {
        self.sheets.get(name)
    }

    pub fn sheets(&self) -> &HashMap<String, AsepriteSheet> {
        &self.sheets
    }

    // -- Audio --

    /// Queue a sound effect for the host.
    pub fn play_sound(&mut self, id: impl Into<String>) {
        self.audio.push(AudioCommand::PlaySound(id.into()));
    }

    pub fn play_music(&mut self, id: impl Into<String>) {
        self.audio.push(AudioCommand::PlayMusic(id.into()));
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.audio)
    }

    // -- Scene requests, applied by the stack after the current call --

    pub fn push_scene(&mut self, scene: Box<dyn Scene>) {
        self.scene_commands.push(SceneCommand::Push(scene));
    }

    pub fn pop_scene(&mut self) {
        self.scene_commands.push(SceneCommand::Pop { no_transition: false });
    }

    pub fn pop_scene_immediately(&mut self) {
        self.scene_commands.push(SceneCommand::Pop { no_transition: true });
    }

    pub fn set_scene(&mut self, scene: Box<dyn Scene>) {
        self.scene_commands.push(SceneCommand::Set(scene));
    }

    pub(crate) fn take_scene_commands(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.scene_commands)
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
