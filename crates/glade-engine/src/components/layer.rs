/// Rendering layer: controls draw order of queued items.
///
/// Layers are drawn back-to-front, Sky first, Debug last. Each layer owns
/// one bit of a `u32` mask so hosts can hide layers (see
/// `Renderer::draw_visible_layers`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderingLayer {
    Sky = 0,
    Background = 1,
    Terrain = 2,
    Platforms = 3,
    #[default]
    Entities = 4,
    Player = 5,
    Particles = 6,
    Foreground = 7,
    Light = 8,
    Ui = 9,
    Dialog = 10,
    Debug = 11,
}

impl RenderingLayer {
    pub const COUNT: usize = 12;

    pub const ALL: [RenderingLayer; Self::COUNT] = [
        Self::Sky,
        Self::Background,
        Self::Terrain,
        Self::Platforms,
        Self::Entities,
        Self::Player,
        Self::Particles,
        Self::Foreground,
        Self::Light,
        Self::Ui,
        Self::Dialog,
        Self::Debug,
    ];

    /// Returns None if the value is out of range.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// This layer's bit in a layer mask.
    pub fn bit(self) -> u32 {
        1 << self.as_u8()
    }

    /// Parse a layer name as written in level data (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let layer = match name.to_ascii_lowercase().as_str() {
            "sky" => Self::Sky,
            "background" => Self::Background,
            "terrain" => Self::Terrain,
            "platforms" => Self::Platforms,
            "entities" => Self::Entities,
            "player" => Self::Player,
            "particles" => Self::Particles,
            "foreground" => Self::Foreground,
            "light" => Self::Light,
            "ui" => Self::Ui,
            "dialog" => Self::Dialog,
            "debug" => Self::Debug,
            _ => return None,
        };
        Some(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_back_to_front() {
        for pair in RenderingLayer::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn round_trip_u8() {
        for val in 0..RenderingLayer::COUNT as u8 {
            let layer = RenderingLayer::from_u8(val).unwrap();
            assert_eq!(layer.as_u8(), val);
        }
        assert!(RenderingLayer::from_u8(12).is_none());
    }

    #[test]
    fn bits_are_distinct() {
        let mask = RenderingLayer::ALL.iter().fold(0u32, |m, l| {
            assert_eq!(m & l.bit(), 0);
            m | l.bit()
        });
        assert_eq!(mask, 0xFFF);
    }

    #[test]
    fn names_parse() {
        assert_eq!(RenderingLayer::from_name("Foreground"), Some(RenderingLayer::Foreground));
        assert_eq!(RenderingLayer::from_name("nope"), None);
    }
}
