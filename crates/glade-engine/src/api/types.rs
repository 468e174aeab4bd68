use serde::Serialize;

/// Unique identifier for an object in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Identifies an image registered with the host surface.
/// Index into the AssetManifest's image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageId(pub u32);

/// An audio request emitted by game logic.
/// The host forwards these to its audio backend; ids name entries in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AudioCommand {
    PlaySound(String),
    PlayMusic(String),
}

/// Something that happened inside the world during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// The player overlapped a trigger it was not overlapping on the previous tick.
    TriggerEntered { trigger: EntityId, name: String },
    /// An entity was moved from one gate to its linked gate.
    Teleported { entity: EntityId, from: EntityId, to: EntityId },
    /// A physics body sank into water.
    Drowned { entity: EntityId },
}

/// Horizontal facing, used to mirror sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// RGBA color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string, e.g. `rgba(255,0,0,0.5)`.
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_color() {
        assert_eq!(Color::rgb(255, 0, 0).to_css(), "rgba(255,0,0,1)");
        assert_eq!(Color::rgba(0, 0, 0, 0).to_css(), "rgba(0,0,0,0)");
    }

    #[test]
    fn audio_command_serializes_tagged() {
        let json = serde_json::to_string(&AudioCommand::PlayMusic("cave".into())).unwrap();
        assert_eq!(json, r#"{"kind":"play_music","id":"cave"}"#);
    }
}
