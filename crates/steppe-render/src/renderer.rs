use std::sync::Arc;

use steppe_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_CAMERA_Y, DEFAULT_FOG_COLOR, DEFAULT_WATER_HEIGHT,
    MAP_SIZE, MAX_CAMERA_Y, MIN_CAMERA_Y, SKY_HEIGHT, SKY_WIDTH,
};
use steppe_core::math::{degrees_to_units, units_to_degrees};
use steppe_core::{
    in_primary_tile, Camera, CameraUpdate, Capability, Color, Heightmap, Image, Quality,
    RenderSettings,
};

use crate::error::RenderError;
use crate::raster::{self, TerrainView, TraversalMode};
use crate::sky;
use crate::smooth;
use crate::sprite::{self, Sprite, Viewpoint, VisibleSprite};
use crate::tables::LookupTables;

/// Camera pose as stored: heading in internal angular units, position in
/// whole world units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraState {
    angle: f64,
    x: i32,
    y: i32,
    z: i32,
}

/// Single public struct owning the framebuffer, lookup tables, bound maps
/// and capability flags. All mutation goes through its setters, between
/// frames.
pub struct Renderer {
    framebuffer: Image,
    tables: LookupTables,
    camera: CameraState,
    heightmap: Heightmap,
    out_of_bounds_heightmap: Option<Heightmap>,
    texturemap: Option<Image>,
    out_of_bounds_texturemap: Option<Image>,
    sky: Option<Image>,
    sprites: Vec<Sprite>,
    visible_sprites: Vec<VisibleSprite>,
    quality: Quality,
    fog: bool,
    fog_color: Color,
    /// `Some` while the reflection map is enabled.
    water_height: Option<u8>,
    smooth: bool,
    last_traversal: Option<TraversalMode>,
}

impl Renderer {
    /// Take ownership of a 320x200 output surface and build the lookup tables.
    pub fn new(canvas: Image) -> Result<Self, RenderError> {
        let (width, height) = canvas.dimensions();
        if width != CANVAS_WIDTH || height != CANVAS_HEIGHT {
            return Err(RenderError::CanvasDimensions { width, height });
        }

        let tables = LookupTables::new(DEFAULT_CAMERA_Y);
        log::info!("Renderer created for {width}x{height} canvas");

        Ok(Self {
            framebuffer: canvas,
            tables,
            camera: CameraState {
                angle: 0.0,
                x: 0,
                y: DEFAULT_CAMERA_Y,
                z: 0,
            },
            heightmap: Heightmap::default(),
            out_of_bounds_heightmap: None,
            texturemap: None,
            out_of_bounds_texturemap: None,
            sky: None,
            sprites: Vec::new(),
            visible_sprites: Vec::new(),
            quality: Quality::default(),
            fog: false,
            fog_color: Color::from_u32(DEFAULT_FOG_COLOR),
            water_height: None,
            smooth: false,
            last_traversal: None,
        })
    }

    // -- Map binding --

    pub fn set_heightmap(&mut self, heightmap: Heightmap) -> &mut Self {
        self.heightmap = heightmap;
        self
    }

    /// Bind a heightmap from raw bytes; fails unless exactly 1024x1024.
    pub fn set_heightmap_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, RenderError> {
        let heightmap = Heightmap::from_slice(bytes)?;
        Ok(self.set_heightmap(heightmap))
    }

    pub fn set_out_of_bounds_heightmap(&mut self, heightmap: Heightmap) -> &mut Self {
        self.out_of_bounds_heightmap = Some(heightmap);
        self
    }

    pub fn set_out_of_bounds_heightmap_bytes(
        &mut self,
        bytes: &[u8],
    ) -> Result<&mut Self, RenderError> {
        let heightmap = Heightmap::from_slice(bytes)?;
        Ok(self.set_out_of_bounds_heightmap(heightmap))
    }

    pub fn set_texturemap(&mut self, texturemap: Image) -> Result<&mut Self, RenderError> {
        check_map_dimensions("texturemap", &texturemap)?;
        self.texturemap = Some(texturemap);
        log::info!("Texturemap bound");
        Ok(self)
    }

    pub fn set_out_of_bounds_texturemap(
        &mut self,
        texturemap: Image,
    ) -> Result<&mut Self, RenderError> {
        check_map_dimensions("out-of-bounds texturemap", &texturemap)?;
        self.out_of_bounds_texturemap = Some(texturemap);
        log::info!("Out-of-bounds texturemap bound");
        Ok(self)
    }

    pub fn set_sky(&mut self, sky: Image) -> Result<&mut Self, RenderError> {
        let (width, height) = sky.dimensions();
        if width != SKY_WIDTH || height != SKY_HEIGHT {
            return Err(RenderError::SkyDimensions { width, height });
        }
        self.sky = Some(sky);
        log::info!("Sky panorama bound");
        Ok(self)
    }

    // -- Camera --

    /// Apply a partial camera update. Angle is in real degrees; positions are
    /// rounded to whole units. A `y` outside `200..=300` rejects the whole
    /// update. A valid `y` rebuilds the ray-length table.
    pub fn set_camera(&mut self, update: CameraUpdate) -> Result<&mut Self, RenderError> {
        let y = update.y.map(validate_camera_y).transpose()?;

        if let Some(degrees) = update.angle {
            self.camera.angle = degrees_to_units(degrees);
        }
        if let Some(x) = update.x {
            self.camera.x = round_coordinate(x);
        }
        if let Some(z) = update.z {
            self.camera.z = round_coordinate(z);
        }
        if let Some(y) = y {
            self.set_camera_height(y);
        }
        Ok(self)
    }

    fn set_camera_height(&mut self, y: i32) {
        self.camera.y = y;
        self.recompute_ray_length_table();
    }

    /// Rebuild the ray-length table for the current camera height.
    pub fn recompute_ray_length_table(&mut self) {
        self.tables.recompute_ray_length_table(self.camera.y);
    }

    /// Camera with the heading in whole real degrees.
    pub fn camera(&self) -> Camera {
        Camera {
            angle: units_to_degrees(self.camera.angle),
            x: self.camera.x,
            y: self.camera.y,
            z: self.camera.z,
        }
    }

    /// Heading in internal angular units (1920 per revolution).
    pub fn camera_angle_units(&self) -> f64 {
        self.camera.angle
    }

    // -- Quality and capabilities --

    pub fn set_quality(&mut self, quality: Quality) -> &mut Self {
        self.quality = quality;
        self
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn enable(&mut self, capability: Capability) -> &mut Self {
        match capability {
            Capability::Fog => self.fog = true,
            Capability::ReflectionMap => self.water_height = Some(DEFAULT_WATER_HEIGHT),
            Capability::Smooth => self.smooth = true,
        }
        log::debug!("Enabled {capability}");
        self
    }

    pub fn disable(&mut self, capability: Capability) -> &mut Self {
        match capability {
            Capability::Fog => self.fog = false,
            Capability::ReflectionMap => self.water_height = None,
            Capability::Smooth => self.smooth = false,
        }
        log::debug!("Disabled {capability}");
        self
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Fog => self.fog,
            Capability::ReflectionMap => self.water_height.is_some(),
            Capability::Smooth => self.smooth,
        }
    }

    /// Set the water line; the reflection map must be enabled.
    pub fn set_water_height(&mut self, height: i32) -> Result<&mut Self, RenderError> {
        if self.water_height.is_none() {
            return Err(RenderError::CapabilityNotEnabled(Capability::ReflectionMap));
        }
        let height = u8::try_from(height).map_err(|_| RenderError::WaterHeightOutOfRange(height))?;
        self.water_height = Some(height);
        Ok(self)
    }

    pub fn water_height(&self) -> Option<u8> {
        self.water_height
    }

    /// Set the fog colour; fog must be enabled.
    pub fn set_fog_color(&mut self, color: Color) -> Result<&mut Self, RenderError> {
        if !self.fog {
            return Err(RenderError::CapabilityNotEnabled(Capability::Fog));
        }
        self.fog_color = Color::rgb(color.r, color.g, color.b);
        Ok(self)
    }

    pub fn fog_color(&self) -> Color {
        self.fog_color
    }

    /// Validate a whole settings document, then apply it. On error nothing
    /// changes.
    pub fn apply_settings(&mut self, settings: &RenderSettings) -> Result<&mut Self, RenderError> {
        let water = if settings.reflection_map.enabled {
            let height = settings.reflection_map.water_height;
            Some(u8::try_from(height).map_err(|_| RenderError::WaterHeightOutOfRange(height))?)
        } else {
            None
        };
        let camera_y = settings.camera.y.map(validate_camera_y).transpose()?;

        self.quality = settings.quality;
        self.fog = settings.fog.enabled;
        self.fog_color = settings.fog.color;
        self.water_height = water;
        self.smooth = settings.smooth;
        // y is already validated; the remaining fields cannot fail.
        let camera = CameraUpdate {
            y: None,
            ..settings.camera
        };
        self.set_camera(camera)?;
        if let Some(y) = camera_y {
            self.set_camera_height(y);
        }

        log::info!(
            "Applied settings: quality {}, fog {}, reflection map {}, smooth {}",
            self.quality,
            self.fog,
            self.water_height.is_some(),
            self.smooth
        );
        Ok(self)
    }

    // -- Sprites --

    /// Place a sprite on the primary tile; its elevation is sampled now.
    pub fn add_sprite(&mut self, image: Arc<Image>, x: i32, z: i32) -> Result<&mut Self, RenderError> {
        if !in_primary_tile(x, z) {
            return Err(RenderError::SpriteOutOfBounds { x, z });
        }
        let y = self.heightmap.get(x, z);
        self.sprites.push(Sprite { image, x, y, z });
        Ok(self)
    }

    pub fn clear_sprites(&mut self) -> &mut Self {
        self.sprites.clear();
        self
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Sprites that survived culling in the last frame.
    pub fn visible_sprites(&self) -> &[VisibleSprite] {
        &self.visible_sprites
    }

    // -- Queries --

    /// Terrain elevation at a world coordinate, wrapped toroidally.
    pub fn height_at(&self, x: i32, z: i32) -> u8 {
        self.heightmap.get(x, z)
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Number of ray-length table rebuilds so far.
    pub fn ray_length_generation(&self) -> u64 {
        self.tables.generation()
    }

    pub fn framebuffer(&self) -> &Image {
        &self.framebuffer
    }

    pub fn into_framebuffer(self) -> Image {
        self.framebuffer
    }

    pub fn last_traversal(&self) -> Option<TraversalMode> {
        self.last_traversal
    }

    // -- Frame --

    /// Render one frame. Terrain is swept front-to-back unless a sprite is in
    /// view, in which case the row-major back-to-front sweep interleaves them.
    pub fn render(&mut self) -> &Image {
        self.project_sprites();
        let mode = TraversalMode::for_visible_sprites(&self.visible_sprites);
        self.draw(mode);
        &self.framebuffer
    }

    /// Render one frame with a forced traversal order.
    pub fn render_with_traversal(&mut self, mode: TraversalMode) -> &Image {
        self.project_sprites();
        self.draw(mode);
        &self.framebuffer
    }

    fn project_sprites(&mut self) {
        let viewpoint = Viewpoint {
            angle: self.camera.angle,
            x: self.camera.x,
            y: self.camera.y,
            z: self.camera.z,
        };
        self.visible_sprites = sprite::project_sprites(&self.sprites, &viewpoint, &self.tables);
    }

    /// The horizon band takes the current fog colour, so it follows
    /// `set_fog_color` rather than staying at the default grey.
    fn draw(&mut self, mode: TraversalMode) {
        let fog = self.fog.then_some(self.fog_color);
        let sky_angle = sky::sky_angle(self.camera.angle);

        self.framebuffer.pixels_mut().fill(Color::BLACK);
        sky::fill_horizon_band(&mut self.framebuffer, self.fog_color);
        sky::render_sky(
            &mut self.framebuffer,
            self.sky.as_ref(),
            sky_angle,
            self.camera.y,
            fog,
        );

        let view = TerrainView {
            tables: &self.tables,
            heightmap: &self.heightmap,
            out_of_bounds_heightmap: self.out_of_bounds_heightmap.as_ref(),
            texturemap: self.texturemap.as_ref(),
            out_of_bounds_texturemap: self.out_of_bounds_texturemap.as_ref(),
            sky: self.sky.as_ref(),
            camera_x: self.camera.x,
            camera_y: self.camera.y,
            camera_z: self.camera.z,
            sky_angle,
            water_height: self.water_height,
            fog,
            stride: self.quality.stride(),
        };
        match mode {
            TraversalMode::FrontToBack => {
                raster::render_front_to_back(&view, &mut self.framebuffer)
            }
            TraversalMode::BackToFront => raster::render_back_to_front(
                &view,
                &mut self.framebuffer,
                &self.visible_sprites,
            ),
        }

        if self.smooth {
            smooth::smooth(&mut self.framebuffer);
        }
        self.last_traversal = Some(mode);
    }
}

fn check_map_dimensions(name: &'static str, image: &Image) -> Result<(), RenderError> {
    let (width, height) = image.dimensions();
    if width != MAP_SIZE || height != MAP_SIZE {
        return Err(RenderError::TexturemapDimensions {
            name,
            width,
            height,
        });
    }
    Ok(())
}

fn round_coordinate(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

fn validate_camera_y(y: f64) -> Result<i32, RenderError> {
    let rounded = (y + 0.5).floor();
    if !(MIN_CAMERA_Y as f64..=MAX_CAMERA_Y as f64).contains(&rounded) {
        return Err(RenderError::CameraHeightOutOfRange(rounded as i64));
    }
    Ok(rounded as i32)
}
