//! Aseprite sprite sheets.
//!
//! Parses the JSON that Aseprite exports next to a packed sheet (array
//! format) and resolves which frame a tag shows at a given time.

use std::collections::HashMap;

use serde::Deserialize;

use crate::api::error::GameError;
use crate::api::types::ImageId;
use crate::core::bounds::Bounds;

#[derive(Debug, Deserialize)]
struct SheetJson {
    frames: Vec<FrameJson>,
    #[serde(default)]
    meta: MetaJson,
}

#[derive(Debug, Deserialize)]
struct FrameJson {
    frame: RectJson,
    /// Milliseconds.
    #[serde(default = "default_duration")]
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct RectJson {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Debug, Default, Deserialize)]
struct MetaJson {
    #[serde(default, rename = "frameTags")]
    frame_tags: Vec<TagJson>,
}

#[derive(Debug, Deserialize)]
struct TagJson {
    name: String,
    from: usize,
    to: usize,
    #[serde(default)]
    direction: LoopDirection,
}

fn default_duration() -> u32 {
    100
}

/// Playback direction of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopDirection {
    #[default]
    Forward,
    Reverse,
    Pingpong,
}

/// One cell of the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetFrame {
    /// Source rectangle in image pixels (top-down).
    pub source: Bounds,
    /// Seconds.
    pub duration: f32,
}

#[derive(Debug, Clone)]
struct SheetTag {
    /// Frame indices in playback order, one loop.
    sequence: Vec<usize>,
    total: f32,
}

/// A parsed sheet bound to the image that holds its pixels.
#[derive(Debug, Clone)]
pub struct AsepriteSheet {
    pub image: ImageId,
    frames: Vec<SheetFrame>,
    tags: HashMap<String, SheetTag>,
}

impl AsepriteSheet {
    pub fn from_json(json: &str, image: ImageId) -> Result<Self, GameError> {
        let raw: SheetJson = serde_json::from_str(json)?;
        let frames: Vec<SheetFrame> = raw
            .frames
            .iter()
            .map(|f| SheetFrame {
                source: Bounds::new(f.frame.x, f.frame.y, f.frame.w, f.frame.h),
                duration: f.duration as f32 / 1000.0,
            })
            .collect();

        let mut tags = HashMap::new();
        for tag in raw.meta.frame_tags {
            let to = tag.to.min(frames.len().saturating_sub(1));
            if tag.from > to {
                log::warn!("sprite tag {:?} has an empty frame range", tag.name);
                continue;
            }
            let sequence: Vec<usize> = match tag.direction {
                LoopDirection::Forward => (tag.from..=to).collect(),
                LoopDirection::Reverse => (tag.from..=to).rev().collect(),
                LoopDirection::Pingpong => (tag.from..=to)
                    .chain((tag.from + 1..to).rev())
                    .collect(),
            };
            let total = sequence.iter().map(|&i| frames[i].duration).sum();
            tags.insert(tag.name, SheetTag { sequence, total });
        }

        Ok(Self {
            image,
            frames,
            tags,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Length of one loop of `tag`, in seconds.
    pub fn tag_duration(&self, tag: &str) -> Option<f32> {
        self.tags.get(tag).map(|t| t.total)
    }

    /// Frame shown by `tag` at `time` seconds into a looping playback.
    pub fn frame_at(&self, tag: &str, time: f32) -> Option<&SheetFrame> {
        let tag = self.tags.get(tag)?;
        if tag.total <= 0.0 {
            return tag.sequence.first().map(|&i| &self.frames[i]);
        }
        let mut t = time.rem_euclid(tag.total);
        for &index in &tag.sequence {
            let frame = &self.frames[index];
            if t < frame.duration {
                return Some(frame);
            }
            t -= frame.duration;
        }
        tag.sequence.last().map(|&i| &self.frames[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "frames": [
            { "frame": { "x": 0,  "y": 0, "w": 16, "h": 24 }, "duration": 100 },
            { "frame": { "x": 16, "y": 0, "w": 16, "h": 24 }, "duration": 100 },
            { "frame": { "x": 32, "y": 0, "w": 16, "h": 24 }, "duration": 200 }
        ],
        "meta": {
            "frameTags": [
                { "name": "walk", "from": 0, "to": 2, "direction": "forward" },
                { "name": "back", "from": 0, "to": 2, "direction": "reverse" },
                { "name": "bob",  "from": 0, "to": 2, "direction": "pingpong" }
            ]
        }
    }"#;

    fn sheet() -> AsepriteSheet {
        AsepriteSheet::from_json(SHEET, ImageId(3)).unwrap()
    }

    #[test]
    fn forward_tag_walks_frames_and_loops() {
        let s = sheet();
        assert_eq!(s.frame_at("walk", 0.05).unwrap().source.x, 0.0);
        assert_eq!(s.frame_at("walk", 0.15).unwrap().source.x, 16.0);
        assert_eq!(s.frame_at("walk", 0.35).unwrap().source.x, 32.0);
        assert_eq!(s.frame_at("walk", 0.45).unwrap().source.x, 0.0);
    }

    #[test]
    fn reverse_and_pingpong() {
        let s = sheet();
        assert_eq!(s.frame_at("back", 0.05).unwrap().source.x, 32.0);
        // 0,1,2,1: total 0.5s
        assert!((s.tag_duration("bob").unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(s.frame_at("bob", 0.45).unwrap().source.x, 16.0);
    }

    #[test]
    fn unknown_tag_is_none() {
        assert!(sheet().frame_at("swim", 0.0).is_none());
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(AsepriteSheet::from_json("{}", ImageId(0)).is_err());
    }
}
