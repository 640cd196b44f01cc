use crate::constants::{MAP_MASK, MAP_TEXELS, PRIMARY_TILE_MAX, PRIMARY_TILE_MIN};
use crate::error::SteppeError;

/// Wrap a world coordinate onto the 1024-wide tile.
///
/// The world is toroidal: every coordinate, including negative ones, maps to
/// `0..1024` by masking the low ten bits (two's complement makes `-1` land on
/// `1023`).
#[inline]
pub fn wrap_coordinate(v: i32) -> usize {
    (v & MAP_MASK) as usize
}

/// Flat heightmap/texturemap index for a world coordinate: `(z & 1023) << 10 | (x & 1023)`.
#[inline]
pub fn heightmap_index(x: i32, z: i32) -> usize {
    (wrap_coordinate(z) << 10) | wrap_coordinate(x)
}

/// Whether a world coordinate lies on the primary tile (`1024..2048` on both axes).
#[inline]
pub fn in_primary_tile(x: i32, z: i32) -> bool {
    (PRIMARY_TILE_MIN..PRIMARY_TILE_MAX).contains(&x)
        && (PRIMARY_TILE_MIN..PRIMARY_TILE_MAX).contains(&z)
}

/// 1024x1024 grid of elevations, row-major by z.
#[derive(Clone, PartialEq, Eq)]
pub struct Heightmap {
    data: Vec<u8>,
}

impl std::fmt::Debug for Heightmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heightmap")
            .field("texels", &self.data.len())
            .finish()
    }
}

impl Default for Heightmap {
    fn default() -> Self {
        Self::flat(0)
    }
}

impl Heightmap {
    /// Heightmap with every texel at `elevation`.
    pub fn flat(elevation: u8) -> Self {
        Self {
            data: vec![elevation; MAP_TEXELS],
        }
    }

    pub fn from_vec(data: Vec<u8>) -> Result<Self, SteppeError> {
        if data.len() != MAP_TEXELS {
            return Err(SteppeError::HeightmapLength {
                expected: MAP_TEXELS,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, SteppeError> {
        Self::from_vec(data.to_vec())
    }

    /// Elevation at a world coordinate, wrapped toroidally.
    #[inline]
    pub fn get(&self, x: i32, z: i32) -> u8 {
        self.data[heightmap_index(x, z)]
    }

    #[inline]
    pub fn set(&mut self, x: i32, z: i32, elevation: u8) {
        self.data[heightmap_index(x, z)] = elevation;
    }

    /// Elevation at an already-computed flat index.
    #[inline]
    pub fn at(&self, index: usize) -> u8 {
        self.data[index]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_coordinate() {
        assert_eq!(wrap_coordinate(0), 0);
        assert_eq!(wrap_coordinate(1023), 1023);
        assert_eq!(wrap_coordinate(1024), 0);
        assert_eq!(wrap_coordinate(1500), 476);
        assert_eq!(wrap_coordinate(-1), 1023);
        assert_eq!(wrap_coordinate(-1024), 0);
    }

    #[test]
    fn test_heightmap_index_layout() {
        assert_eq!(heightmap_index(5, 0), 5);
        assert_eq!(heightmap_index(0, 1), 1024);
        assert_eq!(heightmap_index(1024 + 3, 1024 + 2), 2 * 1024 + 3);
    }

    #[test]
    fn test_primary_tile_bounds() {
        assert!(in_primary_tile(1024, 1024));
        assert!(in_primary_tile(2047, 2047));
        assert!(!in_primary_tile(2048, 1500));
        assert!(!in_primary_tile(1500, 1023));
        assert!(!in_primary_tile(-5, 1500));
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert_eq!(
            Heightmap::from_vec(vec![0; 10]).unwrap_err(),
            SteppeError::HeightmapLength {
                expected: MAP_TEXELS,
                actual: 10
            }
        );
        assert!(Heightmap::from_vec(vec![0; MAP_TEXELS]).is_ok());
    }

    #[test]
    fn test_get_wraps_toroidally() {
        let mut map = Heightmap::flat(0);
        map.set(7, 9, 200);
        for k in -3..=3 {
            for m in -3..=3 {
                assert_eq!(map.get(7 + 1024 * k, 9 + 1024 * m), 200, "k={k} m={m}");
            }
        }
        assert_eq!(map.get(8, 9), 0);
    }
}
