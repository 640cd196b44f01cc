//! Precomputed trigonometry and ray geometry.
//! Sine/cosine and the inverse-distortion factors depend only on the view
//! geometry and are built once. The ray-length table depends on camera height
//! and is rebuilt whenever it changes.

use steppe_core::constants::{
    ANGULAR_INCREMENT, CANVAS_HEIGHT, CANVAS_WIDTH, MAXIMUM_ROW, PROJECTION_DISTANCE,
    THIRTY_DEGREE_ANGLE, THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE,
};

/// Entries in the inverse-distortion table: one per screen column plus the
/// right edge, so projected sprite positions at x == 320 stay addressable.
pub const INVERSE_DISTORTION_ENTRIES: usize = CANVAS_WIDTH as usize + 1;

/// Entries in the ray-length table: one per (row, ray) pair.
pub const RAY_LENGTH_ENTRIES: usize = (MAXIMUM_ROW as usize + 1) * CANVAS_WIDTH as usize;

pub struct LookupTables {
    sine: Vec<f64>,
    cosine: Vec<f64>,
    inverse_distortion: Vec<f64>,
    ray_length: Vec<f64>,
    /// Camera height the ray-length table was built for.
    ray_length_camera_y: i32,
    /// Bumped on every ray-length rebuild.
    generation: u64,
}

impl LookupTables {
    pub fn new(camera_y: i32) -> Self {
        let revolution = THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as usize;
        let mut sine = Vec::with_capacity(revolution);
        let mut cosine = Vec::with_capacity(revolution);
        for angle in 0..revolution {
            let radians = (angle as f64 * ANGULAR_INCREMENT).to_radians();
            sine.push(radians.sin());
            cosine.push(radians.cos());
        }

        let inverse_distortion = (0..INVERSE_DISTORTION_ENTRIES)
            .map(|column| {
                let offset = column as i32 - THIRTY_DEGREE_ANGLE;
                1.0 / (offset as f64 * ANGULAR_INCREMENT).to_radians().cos()
            })
            .collect();

        let mut tables = Self {
            sine,
            cosine,
            inverse_distortion,
            ray_length: vec![0.0; RAY_LENGTH_ENTRIES],
            ray_length_camera_y: camera_y,
            generation: 0,
        };
        tables.recompute_ray_length_table(camera_y);
        tables
    }

    /// Rebuild the ray-length table for a new camera height.
    ///
    /// `rayLength = inverseDistortion[ray] * (distance * y) / (y - invertedRow)`
    /// where `invertedRow = 199 - row`. Callers keep `y` in `200..=300`, so the
    /// denominator is always at least 1.
    pub fn recompute_ray_length_table(&mut self, camera_y: i32) {
        let width = CANVAS_WIDTH as usize;
        let y = camera_y as f64;
        for row in 0..=MAXIMUM_ROW {
            let inverted_row = (CANVAS_HEIGHT as i32 - 1 - row) as f64;
            let projected = PROJECTION_DISTANCE * y / (y - inverted_row);
            let base = row as usize * width;
            for ray in 0..width {
                self.ray_length[base + ray] = self.inverse_distortion[ray] * projected;
            }
        }
        self.ray_length_camera_y = camera_y;
        self.generation += 1;
        log::debug!(
            "Ray-length table rebuilt for camera y {} (generation {})",
            camera_y,
            self.generation
        );
    }

    #[inline]
    pub fn sine(&self, angle: usize) -> f64 {
        self.sine[angle]
    }

    #[inline]
    pub fn cosine(&self, angle: usize) -> f64 {
        self.cosine[angle]
    }

    #[inline]
    pub fn inverse_distortion(&self, column: usize) -> f64 {
        self.inverse_distortion[column]
    }

    #[inline]
    pub fn ray_length(&self, row: usize, ray: usize) -> f64 {
        self.ray_length[row * CANVAS_WIDTH as usize + ray]
    }

    pub fn ray_length_camera_y(&self) -> i32 {
        self.ray_length_camera_y
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_trig_tables_cover_a_revolution() {
        let tables = LookupTables::new(200);
        assert!(approx(tables.sine(0), 0.0));
        assert!(approx(tables.cosine(0), 1.0));
        assert!(approx(tables.sine(480), 1.0));
        assert!(approx(tables.cosine(960), -1.0));
        assert!(approx(tables.sine(1440), -1.0));
    }

    #[test]
    fn test_inverse_distortion_symmetric() {
        let tables = LookupTables::new(200);
        assert!(approx(tables.inverse_distortion(160), 1.0));
        for offset in 1..=160 {
            assert!(approx(
                tables.inverse_distortion(160 - offset),
                tables.inverse_distortion(160 + offset)
            ));
            assert!(tables.inverse_distortion(160 + offset) > 1.0);
        }
        // Edge columns look 30 degrees off-centre.
        let edge = 1.0 / 30f64.to_radians().cos();
        assert!(approx(tables.inverse_distortion(0), edge));
        assert!(approx(tables.inverse_distortion(320), edge));
    }

    #[test]
    fn test_ray_length_formula() {
        let tables = LookupTables::new(250);
        for (row, ray) in [(0, 1), (100, 160), (199, 40), (299, 319)] {
            let inverted = 199.0 - row as f64;
            let expected = tables.inverse_distortion(ray) * (75.0 * 250.0) / (250.0 - inverted);
            assert!(approx(tables.ray_length(row, ray), expected), "row {row} ray {ray}");
        }
    }

    #[test]
    fn test_ray_length_shrinks_toward_bottom_rows() {
        let tables = LookupTables::new(200);
        for row in 1..=MAXIMUM_ROW as usize {
            assert!(tables.ray_length(row, 160) < tables.ray_length(row - 1, 160));
        }
    }

    #[test]
    fn test_recompute_tracks_height_and_generation() {
        let mut tables = LookupTables::new(200);
        assert_eq!(tables.generation(), 1);
        let before = tables.ray_length(50, 100);
        tables.recompute_ray_length_table(300);
        assert_eq!(tables.generation(), 2);
        assert_eq!(tables.ray_length_camera_y(), 300);
        assert!(tables.ray_length(50, 100) != before);
    }
}
