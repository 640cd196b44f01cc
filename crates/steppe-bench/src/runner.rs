use std::time::Instant;

use steppe_compositor::CompositeError;
use steppe_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use steppe_core::{CameraUpdate, Image};
use steppe_render::{RenderError, Renderer};

use crate::scenes::{sprite_positions, SceneAssets, SceneConfig, TERRAIN_SEED};

/// Failures while preparing or running a benchmark scene.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("failed to build scene assets: {0}")]
    Assets(#[from] CompositeError),

    #[error("failed to configure renderer: {0}")]
    Render(#[from] RenderError),
}

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub quality: String,
    pub sprite_count: u32,
    /// Sprites that survived culling on the last frame.
    pub visible_sprites: u32,
    pub frame_count: u32,
    pub timings: TimingSeries,
}

/// Renders scenes on the CPU and times each frame.
pub struct BenchmarkRunner {
    assets: SceneAssets,
    frame_count: u32,
}

impl BenchmarkRunner {
    /// Generate the shared terrain, texturemaps and sky once up front.
    pub fn new(frame_count: u32) -> Result<Self, BenchError> {
        let start = Instant::now();
        let assets = SceneAssets::generate(TERRAIN_SEED)?;
        log::info!(
            "Generated scene assets in {:.1}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(Self {
            assets,
            frame_count,
        })
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, BenchError> {
        log::info!(
            "Running scene '{}' ({} quality, {} sprites)...",
            config.name,
            config.quality,
            config.sprite_count
        );

        let mut renderer = self.build_renderer(config)?;
        let [angle, ..] = config.camera;

        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        for frame in 0..self.frame_count {
            let heading = angle + config.turn_per_frame * frame as f64;
            renderer.set_camera(CameraUpdate::new().angle(heading))?;

            let frame_start = Instant::now();
            renderer.render();
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            quality: config.quality.to_string(),
            sprite_count: config.sprite_count,
            visible_sprites: renderer.visible_sprites().len() as u32,
            frame_count: self.frame_count,
            timings,
        })
    }

    fn build_renderer(&self, config: &SceneConfig) -> Result<Renderer, BenchError> {
        let assets = &self.assets;
        let mut renderer = Renderer::new(Image::new(CANVAS_WIDTH, CANVAS_HEIGHT))?;
        renderer
            .set_heightmap(assets.heightmap.clone())
            .set_out_of_bounds_heightmap(assets.out_of_bounds_heightmap.clone());
        renderer
            .set_texturemap(assets.texturemap.clone())?
            .set_out_of_bounds_texturemap(assets.out_of_bounds_texturemap.clone())?
            .set_sky(assets.sky.clone())?
            .apply_settings(&config.settings())?;

        let [_, x, _, z] = config.camera;
        for (sprite_x, sprite_z) in sprite_positions(config.sprite_count, x, z) {
            renderer.add_sprite(assets.sprite.clone(), sprite_x, sprite_z)?;
        }
        Ok(renderer)
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::standard_scenes;

    #[test]
    fn test_compute_timings_empty() {
        let t = compute_timings(&[]);
        assert_eq!(t.mean_ms, 0.0);
        assert_eq!(t.max_ms, 0.0);
    }

    #[test]
    fn test_compute_timings_even_median() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(t.median_ms, 2.5);
        assert_eq!(t.mean_ms, 2.5);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.p95_ms, 4.0);
    }

    #[test]
    fn test_compute_timings_percentiles() {
        let times: Vec<f64> = (1..=100).map(f64::from).collect();
        let t = compute_timings(&times);
        assert_eq!(t.median_ms, 50.5);
        assert_eq!(t.p95_ms, 96.0);
        assert_eq!(t.p99_ms, 100.0);
    }

    #[test]
    fn test_run_scene_renders_requested_frames() {
        let runner = BenchmarkRunner::new(2).expect("assets build");
        let scenes = standard_scenes();
        let sprites = scenes
            .iter()
            .find(|s| s.name == "sprites-64")
            .expect("scene exists");
        let result = runner.run_scene(sprites).expect("scene runs");
        assert_eq!(result.frame_count, 2);
        assert_eq!(result.sprite_count, 64);
        assert_eq!(result.quality, "medium");
        assert!(result.visible_sprites > 0);
        assert!(result.timings.min_ms <= result.timings.max_ms);
    }
}
