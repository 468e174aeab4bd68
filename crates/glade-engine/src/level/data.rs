//! Level files: a flat list of entity descriptions in world coordinates.

use glam::Vec2;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::error::GameError;
use crate::api::types::Color;
use crate::components::layer::RenderingLayer;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub name: String,
    /// Music started when the level activates.
    #[serde(default)]
    pub music: Option<String>,
    /// Looping ambience, started with the music.
    #[serde(default)]
    pub ambient_sounds: Vec<String>,
    #[serde(default)]
    pub entities: Vec<EntityDesc>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One placed entity. `x`/`y` is the feet position (Y-up).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDesc {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    /// Campaign filter: absent exists in both.
    #[serde(default)]
    pub new_game_plus: Option<bool>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl EntityDesc {
    pub fn new(kind: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            x,
            y,
            width: 0.0,
            height: 0.0,
            new_game_plus: None,
            properties: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Declared size, or `fallback` for any zero dimension.
    pub fn size_or(&self, fallback: Vec2) -> Vec2 {
        Vec2::new(
            if self.width > 0.0 { self.width } else { fallback.x },
            if self.height > 0.0 { self.height } else { fallback.y },
        )
    }

    /// Name for error messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    fn invalid(&self, property: &str, reason: impl Into<String>) -> GameError {
        GameError::InvalidProperty {
            entity: self.label().to_string(),
            property: property.to_string(),
            reason: reason.into(),
        }
    }

    pub fn prop_str(&self, key: &str) -> Result<Option<&str>, GameError> {
        match self.properties.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    pub fn prop_string(&self, key: &str) -> Result<Option<String>, GameError> {
        Ok(self.prop_str(key)?.map(str::to_string))
    }

    pub fn prop_f32(&self, key: &str) -> Result<Option<f32>, GameError> {
        match self.properties.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(|v| Some(v as f32))
                .ok_or_else(|| self.invalid(key, "expected a number")),
            Some(_) => Err(self.invalid(key, "expected a number")),
        }
    }

    pub fn prop_bool(&self, key: &str) -> Result<Option<bool>, GameError> {
        match self.properties.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(key, "expected a boolean")),
        }
    }

    /// `#rrggbb` or `#rrggbbaa`.
    pub fn prop_color(&self, key: &str) -> Result<Option<Color>, GameError> {
        let Some(text) = self.prop_str(key)? else {
            return Ok(None);
        };
        parse_hex_color(text)
            .map(Some)
            .ok_or_else(|| self.invalid(key, format!("{:?} is not a #rrggbb color", text)))
    }

    pub fn prop_layer(&self, key: &str) -> Result<Option<RenderingLayer>, GameError> {
        let Some(text) = self.prop_str(key)? else {
            return Ok(None);
        };
        RenderingLayer::from_name(text)
            .map(Some)
            .ok_or_else(|| self.invalid(key, format!("unknown layer {:?}", text)))
    }
}

fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}
