use steppe_core::constants::MAP_SIZE;
use steppe_core::Heightmap;

/// Mean elevation of generated terrain.
const BASE_ELEVATION: f64 = 96.0;

/// Procedural heightmap generator using 2D simplex noise.
///
/// The output tiles seamlessly so the renderer's toroidal wrap shows no seam.
pub struct TerrainGenerator {
    /// Permutation table for simplex noise (doubled for wrapping).
    perm: [u8; 512],
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        let perm = Self::build_permutation(seed);
        Self { perm }
    }

    /// Generate a full 1024x1024 heightmap.
    pub fn generate_heightmap(&self) -> Heightmap {
        let mut map = Heightmap::default();
        let size = MAP_SIZE as i32;
        let data = map.as_bytes_mut();
        for z in 0..size {
            for x in 0..size {
                data[((z << 10) | x) as usize] = self.elevation(x, z);
            }
        }
        log::info!("Generated {size}x{size} procedural heightmap");
        map
    }

    /// Elevation at a tile coordinate in `0..1024`.
    pub fn elevation(&self, x: i32, z: i32) -> u8 {
        let h = BASE_ELEVATION + self.tileable_height(x as f64, z as f64);
        h.round().clamp(0.0, 255.0) as u8
    }

    /// Blend four offset noise samples so opposite tile edges agree.
    fn tileable_height(&self, x: f64, z: f64) -> f64 {
        let size = MAP_SIZE as f64;
        let u = x / size;
        let v = z / size;
        let a = self.octaves(x, z);
        let b = self.octaves(x - size, z);
        let c = self.octaves(x, z - size);
        let d = self.octaves(x - size, z - size);
        let top = a * (1.0 - u) + b * u;
        let bottom = c * (1.0 - u) + d * u;
        top * (1.0 - v) + bottom * v
    }

    /// 3 octaves of 2D simplex noise, amplitude ~ +/-100.
    fn octaves(&self, x: f64, z: f64) -> f64 {
        let scale = 0.006;
        let mut h = 0.0f64;
        h += self.simplex2d(x * scale, z * scale) * 64.0;
        h += self.simplex2d(x * scale * 2.0 + 100.0, z * scale * 2.0 + 100.0) * 24.0;
        h += self.simplex2d(x * scale * 4.0 + 200.0, z * scale * 4.0 + 200.0) * 12.0;
        h
    }

    /// 2D simplex noise. Returns value in [-1, 1].
    fn simplex2d(&self, x: f64, z: f64) -> f64 {
        const F2: f64 = 0.5 * (1.7320508075688772 - 1.0); // (sqrt(3)-1)/2
        const G2: f64 = (3.0 - 1.7320508075688772) / 6.0; // (3-sqrt(3))/6

        let s = (x + z) * F2;
        let i = (x + s).floor();
        let j = (z + s).floor();

        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = z - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i32 & 255) as usize;
        let jj = (j as i32 & 255) as usize;

        let gi0 = self.perm[ii + self.perm[jj] as usize] as usize & 7;
        let gi1 = self.perm[ii + i1 + self.perm[jj + j1] as usize] as usize & 7;
        let gi2 = self.perm[ii + 1 + self.perm[jj + 1] as usize] as usize & 7;

        let n0 = Self::corner_contribution(gi0, x0, y0);
        let n1 = Self::corner_contribution(gi1, x1, y1);
        let n2 = Self::corner_contribution(gi2, x2, y2);

        70.0 * (n0 + n1 + n2)
    }

    fn corner_contribution(gi: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let t = t * t;
            t * t * Self::grad2d(gi, x, y)
        }
    }

    fn grad2d(hash: usize, x: f64, y: f64) -> f64 {
        const GRAD: [[f64; 2]; 8] = [
            [1.0, 1.0],
            [-1.0, 1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
            [1.0, 0.0],
            [-1.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
        ];
        let g = &GRAD[hash];
        g[0] * x + g[1] * y
    }

    fn build_permutation(seed: u64) -> [u8; 512] {
        let mut p: [u8; 256] = [0; 256];
        for (i, val) in p.iter_mut().enumerate() {
            *val = i as u8;
        }

        // Fisher-Yates with an LCG stream
        let mut rng = seed;
        for i in (1..256).rev() {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let j = (rng >> 33) as usize % (i + 1);
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, val) in perm.iter_mut().enumerate() {
            *val = p[i & 255];
        }
        perm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_deterministic() {
        let a = TerrainGenerator::new(42);
        let b = TerrainGenerator::new(42);
        for (x, z) in [(0, 0), (17, 900), (512, 512), (1023, 3)] {
            assert_eq!(a.elevation(x, z), b.elevation(x, z));
        }
    }

    #[test]
    fn test_seeds_differ() {
        let a = TerrainGenerator::new(42);
        let b = TerrainGenerator::new(7);
        let differs = (0..64).any(|i| a.elevation(i * 13, i * 7) != b.elevation(i * 13, i * 7));
        assert!(differs, "different seeds should give different terrain");
    }

    #[test]
    fn test_terrain_tiles_seamlessly() {
        let gen = TerrainGenerator::new(42);
        let size = MAP_SIZE as i32;
        // Stepping across the tile edge must not jump more than an interior step.
        for k in (0..size).step_by(37) {
            let across_x = (gen.elevation(size - 1, k) as i32 - gen.elevation(0, k) as i32).abs();
            let across_z = (gen.elevation(k, size - 1) as i32 - gen.elevation(k, 0) as i32).abs();
            assert!(across_x <= 8, "x seam at z={k}: {across_x}");
            assert!(across_z <= 8, "z seam at x={k}: {across_z}");
        }
    }

    #[test]
    fn test_terrain_has_relief() {
        let gen = TerrainGenerator::new(42);
        let map = gen.generate_heightmap();
        let min = map.as_bytes().iter().copied().min().unwrap_or(0);
        let max = map.as_bytes().iter().copied().max().unwrap_or(0);
        assert!(max - min > 40, "terrain too flat: {min}..{max}");
    }
}
