use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::api::error::GameError;
use crate::api::types::ImageId;

/// Asset manifest describing the images, sprite sheets and sounds of a game.
/// Loaded from a JSON file at runtime; the host loads the files themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Images in registration order. An image's index is its `ImageId`.
    #[serde(default)]
    pub images: Vec<ImageDescriptor>,
    /// Aseprite sheets by name.
    #[serde(default)]
    pub sheets: HashMap<String, SheetDescriptor>,
    /// Sound and music ids.
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Human-readable name (e.g., "hero").
    pub name: String,
    /// Relative path to the PNG file (e.g., "hero.png").
    pub path: String,
}

/// An Aseprite JSON export and the image it slices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDescriptor {
    /// Name of an entry in `images`.
    pub image: String,
    /// Relative path to the Aseprite JSON file.
    pub path: String,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Music tracks loop.
    #[serde(default, rename = "loop")]
    pub looped: bool,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn image_id(&self, name: &str) -> Option<ImageId> {
        self.images
            .iter()
            .position(|image| image.name == name)
            .map(|index| ImageId(index as u32))
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageDescriptor> {
        self.images.get(id.0 as usize)
    }

    /// Image backing a named sheet.
    pub fn sheet_image(&self, sheet: &str) -> Option<ImageId> {
        self.sheets.get(sheet).and_then(|s| self.image_id(&s.image))
    }

    /// Fail with `MissingSheet` unless `sheet` and its image are declared.
    pub fn require_sheet_image(&self, sheet: &str) -> Result<ImageId, GameError> {
        self.sheet_image(sheet)
            .ok_or_else(|| GameError::MissingSheet(sheet.to_string()))
    }

    pub fn has_sound(&self, id: &str) -> bool {
        self.sounds.contains_key(id)
    }

    /// Fail with `MissingSound` unless `id` is declared.
    pub fn require_sound(&self, id: &str) -> Result<(), GameError> {
        if self.has_sound(id) {
            Ok(())
        } else {
            Err(GameError::MissingSound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "images": [
            { "name": "tiles", "path": "tiles.png" },
            { "name": "hero", "path": "hero.png" }
        ],
        "sheets": {
            "hero": { "image": "hero", "path": "hero.json" }
        },
        "sounds": {
            "door": { "path": "door.ogg" },
            "cave": { "path": "cave.ogg", "loop": true }
        }
    }"#;

    #[test]
    fn parse_manifest() {
        let manifest = AssetManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.images.len(), 2);
        assert_eq!(manifest.image_id("hero"), Some(ImageId(1)));
        assert_eq!(manifest.image_id("missing"), None);
        assert_eq!(manifest.image(ImageId(0)).unwrap().path, "tiles.png");
        assert_eq!(manifest.sheet_image("hero"), Some(ImageId(1)));
        assert!(manifest.sounds["cave"].looped);
        assert!(!manifest.sounds["door"].looped);
    }

    #[test]
    fn missing_sound_is_an_error() {
        let manifest = AssetManifest::from_json(MANIFEST).unwrap();
        assert!(manifest.require_sound("door").is_ok());
        assert!(matches!(
            manifest.require_sound("thunder"),
            Err(GameError::MissingSound(id)) if id == "thunder"
        ));
    }

    #[test]
    fn sheet_without_image_is_an_error() {
        let manifest = AssetManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.require_sheet_image("hero").unwrap(), ImageId(1));
        assert!(matches!(
            manifest.require_sheet_image("ghost"),
            Err(GameError::MissingSheet(name)) if name == "ghost"
        ));
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert!(manifest.images.is_empty());
        assert!(!manifest.has_sound("door"));
    }
}
