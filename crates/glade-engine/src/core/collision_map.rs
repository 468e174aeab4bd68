//! Static collision data: a grid of environment codes rasterised from a
//! pre-rendered bitmap.
//!
//! Row 0 is the bottom of the level (world Y-up). Bitmaps are stored top-down,
//! so loading flips them once.

use crate::api::error::GameError;

const fn rgba_code(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24
}

/// What occupies a point of the world.
///
/// Each non-air variant is tagged by the RGBA value its pixels carry in the
/// collision bitmap, read as a little-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Environment {
    #[default]
    Air = 0,
    Solid = rgba_code(0, 0, 0, 255),
    /// One-way: blocks only from above.
    Platform = rgba_code(0, 255, 0, 255),
    Bounce = rgba_code(255, 0, 255, 255),
    Water = rgba_code(0, 0, 255, 255),
    Soil = rgba_code(128, 64, 0, 255),
    RainCloud = rgba_code(0, 255, 255, 255),
}

impl Environment {
    pub const ALL: [Environment; 7] = [
        Environment::Air,
        Environment::Solid,
        Environment::Platform,
        Environment::Bounce,
        Environment::Water,
        Environment::Soil,
        Environment::RainCloud,
    ];

    /// Decode a bitmap value. Codes outside the known set read as air.
    pub fn from_code(code: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|env| env.code() == code)
            .unwrap_or(Environment::Air)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_air(self) -> bool {
        self == Environment::Air
    }
}

/// Round half up, matching how world coordinates address map cells.
pub(crate) fn round_coord(v: f32) -> i64 {
    (v + 0.5).floor() as i64
}

/// Immutable grid of environment codes.
#[derive(Debug, Clone)]
pub struct CollisionMap {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl CollisionMap {
    /// An all-air map.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    /// Load from top-down RGBA8 pixel data (e.g. a decoded PNG).
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, GameError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(GameError::InvalidCollisionMap {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        let mut map = Self::new(width, height);
        let row_bytes = width as usize * 4;
        for (image_row, row) in rgba.chunks_exact(row_bytes).enumerate() {
            let world_row = height as usize - 1 - image_row;
            let start = world_row * width as usize;
            for (x, pixel) in row.chunks_exact(4).enumerate() {
                let code = u32::from_le(bytemuck::pod_read_unaligned::<u32>(pixel));
                map.cells[start + x] = code;
            }
        }
        Ok(map)
    }

    /// Build from codes already in world order (row 0 at the bottom).
    pub fn from_codes(width: u32, height: u32, codes: Vec<u32>) -> Result<Self, GameError> {
        let expected = width as usize * height as usize;
        if codes.len() != expected {
            return Err(GameError::InvalidCollisionMap {
                width,
                height,
                expected: expected * 4,
                actual: codes.len() * 4,
            });
        }
        Ok(Self {
            width,
            height,
            cells: codes,
        })
    }

    /// Paint a rectangle of cells, clipped to the map. Used to author maps in code.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, env: Environment) {
        let x_end = (x + width).min(self.width);
        let y_end = (y + height).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.cells[(row * self.width + col) as usize] = env.code();
            }
        }
    }

    pub fn with_rect(mut self, x: u32, y: u32, width: u32, height: u32, env: Environment) -> Self {
        self.fill_rect(x, y, width, height, env);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat index for a world point. Only the flat range is checked, so an
    /// out-of-range `x` on an in-range row addresses the neighbouring row.
    fn index(&self, x: f32, y: f32) -> Option<usize> {
        let index = round_coord(y) * self.width as i64 + round_coord(x);
        if index < 0 || index >= self.cells.len() as i64 {
            None
        } else {
            Some(index as usize)
        }
    }

    /// Environment at a world point; out-of-range reads as air.
    pub fn get(&self, x: f32, y: f32) -> Environment {
        match self.index(x, y) {
            Some(i) => Environment::from_code(self.cells[i]),
            None => Environment::Air,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn codes_round_trip() {
        for env in Environment::ALL {
            assert_eq!(Environment::from_code(env.code()), env);
        }
        assert_eq!(Environment::from_code(0x1234_5678), Environment::Air);
    }

    #[test]
    fn rgba_load_flips_rows() {
        // 2x2 image: top row solid, bottom row water.
        let black = [0, 0, 0, 255];
        let blue = [0, 0, 255, 255];
        let pixels: Vec<u8> = [black, black, blue, blue].concat();
        let map = CollisionMap::from_rgba(2, 2, &pixels).unwrap();
        assert_eq!(map.get(0.0, 0.0), Environment::Water);
        assert_eq!(map.get(1.0, 0.0), Environment::Water);
        assert_eq!(map.get(0.0, 1.0), Environment::Solid);
    }

    #[test]
    fn rgba_length_is_checked() {
        let err = CollisionMap::from_rgba(4, 4, &[0; 10]).unwrap_err();
        assert!(matches!(err, GameError::InvalidCollisionMap { expected: 64, actual: 10, .. }));
    }

    #[test]
    fn lookups_round_half_up() {
        let map = CollisionMap::new(10, 10).with_rect(3, 3, 1, 1, Environment::Solid);
        assert_eq!(map.get(2.5, 3.0), Environment::Solid);
        assert_eq!(map.get(3.49, 2.5), Environment::Solid);
        assert_eq!(map.get(3.5, 3.0), Environment::Air);
    }

    #[test]
    fn fill_rect_clips() {
        let map = CollisionMap::new(4, 4).with_rect(2, 2, 10, 10, Environment::Soil);
        assert_eq!(map.get(3.0, 3.0), Environment::Soil);
        assert_eq!(map.get(1.0, 1.0), Environment::Air);
    }

    proptest! {
        #[test]
        fn out_of_range_reads_air(
            width in 1u32..40,
            height in 1u32..40,
            x in -200.0f32..200.0,
            y in -200.0f32..200.0,
        ) {
            let map = CollisionMap::new(width, height)
                .with_rect(0, 0, width, height, Environment::Solid);
            let index = round_coord(y) * width as i64 + round_coord(x);
            let in_range = index >= 0 && index < (width * height) as i64;
            let expected = if in_range { Environment::Solid } else { Environment::Air };
            prop_assert_eq!(map.get(x, y), expected);
        }
    }
}
