use steppe_core::constants::{ELEVATION_BANDS, MAP_SIZE, MASK_BASE_HEIGHT, TEXTURE_SIZE};
use steppe_core::{Color, Heightmap, Image};

use crate::error::CompositeError;

/// Builds the heightmaps and the baked texturemap the renderer consumes.
///
/// Textures are registered per elevation band. At composite time every band
/// without its own texture borrows the nearest band above it, so a texture at
/// 255 is mandatory: it anchors the fill for everything below.
pub struct Compositor {
    heightmap: Heightmap,
    out_of_bounds_heightmap: Heightmap,
    textures: Vec<Option<Image>>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            heightmap: Heightmap::default(),
            out_of_bounds_heightmap: Heightmap::default(),
            textures: vec![None; ELEVATION_BANDS],
        }
    }

    /// Load the heightmap from a greyscale image (red channel), resampling
    /// nearest-neighbour to 1024x1024. The out-of-bounds heightmap is reset to
    /// an identical copy.
    pub fn set_heightmap(&mut self, source: &Image) -> Result<&mut Self, CompositeError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Err(CompositeError::EmptyHeightmapSource { width, height });
        }

        let size = MAP_SIZE as u64;
        let data = self.heightmap.as_bytes_mut();
        for y in 0..MAP_SIZE {
            let sy = (y as u64 * height as u64 / size) as u32;
            for x in 0..MAP_SIZE {
                let sx = (x as u64 * width as u64 / size) as u32;
                data[((y << 10) | x) as usize] = source.get(sx, sy).r;
            }
        }
        self.out_of_bounds_heightmap = self.heightmap.clone();

        log::info!("Heightmap set from {width}x{height} source");
        Ok(self)
    }

    /// Register a 256x256 texture for one elevation band.
    pub fn add_texture(
        &mut self,
        elevation: i32,
        texture: &Image,
    ) -> Result<&mut Self, CompositeError> {
        if !(0..ELEVATION_BANDS as i32).contains(&elevation) {
            return Err(CompositeError::ElevationOutOfRange(elevation));
        }
        let (width, height) = texture.dimensions();
        if width != TEXTURE_SIZE || height != TEXTURE_SIZE {
            return Err(CompositeError::TextureDimensions { width, height });
        }

        self.textures[elevation as usize] = Some(texture.clone());
        Ok(self)
    }

    /// For each elevation, the band whose texture paints it: the elevation
    /// itself if it has a texture, otherwise the nearest band above that does.
    pub fn resolve_bands(&self) -> Result<[u8; ELEVATION_BANDS], CompositeError> {
        if self.textures[ELEVATION_BANDS - 1].is_none() {
            return Err(CompositeError::MissingTopTexture);
        }

        let mut bands = [0u8; ELEVATION_BANDS];
        let mut source = (ELEVATION_BANDS - 1) as u8;
        let mut filled = 0;
        for elevation in (0..ELEVATION_BANDS).rev() {
            if self.textures[elevation].is_some() {
                source = elevation as u8;
            } else {
                filled += 1;
            }
            bands[elevation] = source;
        }

        log::debug!(
            "Resolved {} elevation bands ({} inherited from above)",
            ELEVATION_BANDS,
            filled
        );
        Ok(bands)
    }

    /// Bake a fresh 1024x1024 texturemap.
    pub fn composite(&self) -> Result<Image, CompositeError> {
        let mut texturemap = Image::new(MAP_SIZE, MAP_SIZE);
        self.composite_into(&mut texturemap)?;
        Ok(texturemap)
    }

    /// Bake the texturemap into an existing 1024x1024 surface. Each texel takes
    /// its band's texture sampled at `(x mod 256, y mod 256)`.
    pub fn composite_into(&self, texturemap: &mut Image) -> Result<(), CompositeError> {
        let (width, height) = texturemap.dimensions();
        if width != MAP_SIZE || height != MAP_SIZE {
            return Err(CompositeError::TexturemapDimensions { width, height });
        }
        let bands = self.resolve_bands()?;

        let mask = TEXTURE_SIZE - 1;
        for y in 0..MAP_SIZE {
            for x in 0..MAP_SIZE {
                let elevation = self.heightmap.at(((y << 10) | x) as usize);
                let band = bands[elevation as usize] as usize;
                // resolve_bands only points at populated bands
                if let Some(texture) = &self.textures[band] {
                    let texel = texture.get(x & mask, y & mask);
                    texturemap.put(x, y, Color::rgb(texel.r, texel.g, texel.b));
                }
            }
        }
        Ok(())
    }

    /// Stamp a greyscale mask into the heightmap with its top-left corner at
    /// `(x, y)`. Every pixel with non-zero alpha writes
    /// `192 + red * scale_factor`, saturated to `0..=255`. Target coordinates
    /// wrap toroidally. The out-of-bounds heightmap is left untouched.
    pub fn put_mask(&mut self, mask: &Image, x: i32, y: i32, scale_factor: f32) -> &mut Self {
        let mut stamped = 0usize;
        for my in 0..mask.height() {
            for mx in 0..mask.width() {
                let pixel = mask.get(mx, my);
                if pixel.a == 0 {
                    continue;
                }
                let value = (MASK_BASE_HEIGHT + pixel.r as f32 * scale_factor).clamp(0.0, 255.0);
                self.heightmap
                    .set(x + mx as i32, y + my as i32, value as u8);
                stamped += 1;
            }
        }
        log::debug!("Mask stamped {stamped} texels at ({x}, {y})");
        self
    }

    pub fn heightmap(&self) -> &Heightmap {
        &self.heightmap
    }

    pub fn out_of_bounds_heightmap(&self) -> &Heightmap {
        &self.out_of_bounds_heightmap
    }

    /// Replace both heightmaps with an already-built one (e.g. procedural terrain).
    pub fn set_heightmap_data(&mut self, heightmap: Heightmap) -> &mut Self {
        self.out_of_bounds_heightmap = heightmap.clone();
        self.heightmap = heightmap;
        self
    }
}
