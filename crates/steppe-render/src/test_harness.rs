/// Deterministic fixtures shared by the renderer's unit tests.
///
/// Terrain comes from the compositor's procedural generator and a handful of
/// solid or patterned elevation bands, so every frame is reproducible.
use steppe_compositor::{Compositor, TerrainGenerator};
use steppe_core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, MAP_SIZE, SKY_HEIGHT, SKY_WIDTH};
use steppe_core::{CameraUpdate, Color, Heightmap, Image};

use crate::raster::TerrainView;
use crate::renderer::Renderer;
use crate::sky::sky_angle;
use crate::tables::LookupTables;

/// Fixture camera position: centre of the primary tile, facing +x.
pub const FIXTURE_CAMERA_X: i32 = 1536;
pub const FIXTURE_CAMERA_Z: i32 = 1536;

/// Panorama whose colour varies along both axes.
pub fn gradient_sky() -> Image {
    Image::from_fn(SKY_WIDTH, SKY_HEIGHT, |x, y| {
        Color::rgb((x % 256) as u8, (x / 8) as u8, 100 + y as u8)
    })
}

/// Bake a texturemap for `heightmap` from three elevation bands.
pub fn banded_texturemap(heightmap: &Heightmap) -> Image {
    let size = steppe_core::constants::TEXTURE_SIZE;
    let rock = Image::from_fn(size, size, |x, y| {
        Color::rgb(120 + (x % 16) as u8, 110 + (y % 16) as u8, 100)
    });
    let grass = Image::filled(size, size, Color::rgb(40, 140, 50));
    let sand = Image::filled(size, size, Color::rgb(200, 180, 120));

    let mut compositor = Compositor::new();
    compositor.set_heightmap_data(heightmap.clone());
    compositor
        .add_texture(255, &rock)
        .and_then(|c| c.add_texture(110, &grass))
        .and_then(|c| c.add_texture(70, &sand))
        .expect("fixture textures are 256x256");
    compositor.composite().expect("band 255 is registered")
}

/// Owned inputs for a [`TerrainView`].
pub struct ViewFixture {
    pub tables: LookupTables,
    pub heightmap: Heightmap,
    pub out_of_bounds_heightmap: Option<Heightmap>,
    pub texturemap: Image,
    pub out_of_bounds_texturemap: Image,
    pub sky: Image,
}

impl ViewFixture {
    /// Constant elevation everywhere, one texturemap for both tiles.
    pub fn flat(elevation: u8) -> Self {
        let heightmap = Heightmap::flat(elevation);
        let texturemap = banded_texturemap(&heightmap);
        Self {
            tables: LookupTables::new(200),
            out_of_bounds_texturemap: texturemap.clone(),
            texturemap,
            heightmap,
            out_of_bounds_heightmap: None,
            sky: gradient_sky(),
        }
    }

    /// Procedural hills with a low, plain out-of-bounds horizon.
    pub fn rolling(seed: u64) -> Self {
        let heightmap = TerrainGenerator::new(seed).generate_heightmap();
        let texturemap = banded_texturemap(&heightmap);
        Self {
            tables: LookupTables::new(200),
            heightmap,
            out_of_bounds_heightmap: Some(Heightmap::flat(20)),
            texturemap,
            out_of_bounds_texturemap: Image::filled(MAP_SIZE, MAP_SIZE, Color::rgb(60, 90, 60)),
            sky: gradient_sky(),
        }
    }

    pub fn view(&self) -> TerrainView<'_> {
        TerrainView {
            tables: &self.tables,
            heightmap: &self.heightmap,
            out_of_bounds_heightmap: self.out_of_bounds_heightmap.as_ref(),
            texturemap: Some(&self.texturemap),
            out_of_bounds_texturemap: Some(&self.out_of_bounds_texturemap),
            sky: Some(&self.sky),
            camera_x: FIXTURE_CAMERA_X,
            camera_y: self.tables.ray_length_camera_y(),
            camera_z: FIXTURE_CAMERA_Z,
            sky_angle: sky_angle(0.0),
            water_height: None,
            fog: None,
            stride: 2,
        }
    }
}

/// A renderer with rolling terrain, both texturemaps and a sky bound, camera
/// at the fixture position.
pub fn fixture_renderer() -> Renderer {
    let fixture = ViewFixture::rolling(42);
    let mut renderer =
        Renderer::new(Image::new(CANVAS_WIDTH, CANVAS_HEIGHT)).expect("320x200 canvas");
    renderer
        .set_heightmap(fixture.heightmap)
        .set_out_of_bounds_heightmap(Heightmap::flat(20));
    renderer
        .set_texturemap(fixture.texturemap)
        .and_then(|r| r.set_out_of_bounds_texturemap(fixture.out_of_bounds_texturemap))
        .and_then(|r| r.set_sky(fixture.sky))
        .and_then(|r| {
            r.set_camera(
                CameraUpdate::new()
                    .angle(0.0)
                    .x(FIXTURE_CAMERA_X as f64)
                    .y(200.0)
                    .z(FIXTURE_CAMERA_Z as f64),
            )
        })
        .expect("fixture maps have valid dimensions");
    renderer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fixture_texturemap_is_uniform() {
        let fixture = ViewFixture::flat(40);
        let first = fixture.texturemap.get(0, 0);
        assert!(fixture.texturemap.pixels().iter().all(|&p| p == first));
    }

    #[test]
    fn test_fixture_renderer_is_positioned() {
        let renderer = fixture_renderer();
        let camera = renderer.camera();
        assert_eq!((camera.x, camera.y, camera.z), (1536, 200, 1536));
    }
}
