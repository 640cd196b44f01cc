use std::sync::Arc;

use steppe_compositor::{CompositeError, Compositor, TerrainGenerator};
use steppe_core::constants::{MAP_SIZE, PRIMARY_TILE_MIN, SKY_HEIGHT, SKY_WIDTH, TEXTURE_SIZE};
use steppe_core::{
    CameraUpdate, Color, FogSettings, Heightmap, Image, Quality, ReflectionSettings,
    RenderSettings,
};

/// Seed for the procedural terrain shared by every scene.
pub const TERRAIN_SEED: u64 = 42;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub quality: Quality,
    pub fog: bool,
    pub reflection_map: bool,
    pub smooth: bool,
    pub sprite_count: u32,
    /// Starting camera: heading in degrees, then world x, y, z.
    pub camera: [f64; 4],
    /// Degrees the camera turns between frames.
    pub turn_per_frame: f64,
}

impl SceneConfig {
    /// Renderer settings for the first frame of the scene.
    pub fn settings(&self) -> RenderSettings {
        let [angle, x, y, z] = self.camera;
        RenderSettings {
            quality: self.quality,
            fog: FogSettings {
                enabled: self.fog,
                ..FogSettings::default()
            },
            reflection_map: ReflectionSettings {
                enabled: self.reflection_map,
                water_height: WATER_HEIGHT,
            },
            smooth: self.smooth,
            camera: CameraUpdate::new().angle(angle).x(x).y(y).z(z),
        }
    }
}

/// Water line for scenes with the reflection map on.
const WATER_HEIGHT: i32 = 72;

/// Return the standard suite of benchmark scenes, cheapest first.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let centre = (PRIMARY_TILE_MIN + MAP_SIZE as i32 / 2) as f64;

    vec![
        SceneConfig {
            name: "low",
            quality: Quality::Low,
            fog: false,
            reflection_map: false,
            smooth: false,
            sprite_count: 0,
            camera: [0.0, centre, 220.0, centre],
            turn_per_frame: 1.0,
        },
        SceneConfig {
            name: "medium",
            quality: Quality::Medium,
            fog: false,
            reflection_map: false,
            smooth: false,
            sprite_count: 0,
            camera: [0.0, centre, 220.0, centre],
            turn_per_frame: 1.0,
        },
        SceneConfig {
            name: "high",
            quality: Quality::High,
            fog: false,
            reflection_map: false,
            smooth: false,
            sprite_count: 0,
            camera: [0.0, centre, 220.0, centre],
            turn_per_frame: 1.0,
        },
        SceneConfig {
            name: "high-fog-water",
            quality: Quality::High,
            fog: true,
            reflection_map: true,
            smooth: false,
            sprite_count: 0,
            camera: [90.0, centre, 240.0, centre],
            turn_per_frame: 1.0,
        },
        SceneConfig {
            name: "high-smooth",
            quality: Quality::High,
            fog: true,
            reflection_map: false,
            smooth: true,
            sprite_count: 0,
            camera: [180.0, centre, 220.0, centre],
            turn_per_frame: 1.0,
        },
        SceneConfig {
            name: "sprites-64",
            quality: Quality::Medium,
            fog: false,
            reflection_map: false,
            smooth: false,
            sprite_count: 64,
            camera: [0.0, centre, 220.0, centre],
            turn_per_frame: 0.0,
        },
        SceneConfig {
            name: "sprites-256",
            quality: Quality::High,
            fog: true,
            reflection_map: true,
            smooth: false,
            sprite_count: 256,
            camera: [0.0, centre, 220.0, centre],
            turn_per_frame: 0.0,
        },
    ]
}

/// Maps and images shared by all scenes.
pub struct SceneAssets {
    pub heightmap: Heightmap,
    pub out_of_bounds_heightmap: Heightmap,
    pub texturemap: Image,
    pub out_of_bounds_texturemap: Image,
    pub sky: Image,
    pub sprite: Arc<Image>,
}

impl SceneAssets {
    /// Generate terrain, bake its texturemap and paint the sky.
    pub fn generate(seed: u64) -> Result<Self, CompositeError> {
        let heightmap = TerrainGenerator::new(seed).generate_heightmap();

        let mut compositor = Compositor::new();
        compositor.set_heightmap_data(heightmap);
        for (band, base) in BANDS {
            compositor.add_texture(band, &band_texture(base, band as u32))?;
        }
        let texturemap = compositor.composite()?;

        let out_of_bounds_heightmap = Heightmap::flat(24);
        let mut distant = Compositor::new();
        distant.set_heightmap_data(out_of_bounds_heightmap.clone());
        distant.add_texture(255, &band_texture(Color::rgb(70, 96, 64), 7))?;
        let out_of_bounds_texturemap = distant.composite()?;

        Ok(Self {
            heightmap: compositor.heightmap().clone(),
            out_of_bounds_heightmap,
            texturemap,
            out_of_bounds_texturemap,
            sky: sky_panorama(),
            sprite: Arc::new(tree_sprite()),
        })
    }
}

/// Elevation bands and their base colours, highest first.
const BANDS: [(i32, Color); 5] = [
    (255, Color::rgb(236, 236, 240)),
    (170, Color::rgb(128, 120, 112)),
    (120, Color::rgb(72, 128, 56)),
    (80, Color::rgb(196, 176, 120)),
    (50, Color::rgb(48, 72, 128)),
];

/// A 256x256 texture: the base colour with a deterministic speckle.
pub fn band_texture(base: Color, salt: u32) -> Image {
    Image::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |x, y| {
        let hash = (x.wrapping_mul(31337) ^ y.wrapping_mul(7919) ^ salt.wrapping_mul(104_729)) % 24;
        let shade = |c: u8| c.saturating_sub(12).saturating_add(hash as u8);
        Color::rgb(shade(base.r), shade(base.g), shade(base.b))
    })
}

/// Sky panorama: blue fading to pale at the horizon, with a slow hue drift
/// around the revolution.
pub fn sky_panorama() -> Image {
    Image::from_fn(SKY_WIDTH, SKY_HEIGHT, |x, y| {
        let drift = (x * 32 / SKY_WIDTH) as u8;
        let lift = (y * 120 / SKY_HEIGHT) as u8;
        Color::rgb(60 + lift + drift, 110 + lift, 150 + lift / 2)
    })
}

/// A 32x64 tree-like billboard with a transparent surround.
pub fn tree_sprite() -> Image {
    Image::from_fn(32, 64, |x, y| {
        let dx = x as i32 - 16;
        if y >= 48 {
            if dx.abs() <= 2 {
                Color::rgb(96, 64, 32)
            } else {
                Color::TRANSPARENT
            }
        } else if dx.abs() <= (y as i32 / 3) + 2 {
            Color::rgb(24, 96 + (y as u8), 40)
        } else {
            Color::TRANSPARENT
        }
    })
}

/// Deterministic sprite positions scattered in front of a camera at
/// `(x, z)` facing +x, all on the primary tile.
pub fn sprite_positions(count: u32, x: f64, z: f64) -> Vec<(i32, i32)> {
    (0..count)
        .map(|i| {
            let hash = i.wrapping_mul(2_654_435_761);
            let distance = 40 + (hash % 320) as i32;
            let lateral = ((hash >> 9) % 201) as i32 - 100;
            (x as i32 + distance, z as i32 + lateral)
        })
        .collect()
}
