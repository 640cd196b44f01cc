use steppe_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, MAXIMUM_ROW, OUT_OF_BOUNDS_FALLBACK_COLOR, SCALE_FACTOR,
    THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE,
};
use steppe_core::{alpha_blend, heightmap_index, in_primary_tile, Color, Heightmap, Image};

use crate::sky;
use crate::sprite::{self, VisibleSprite};
use crate::tables::LookupTables;

/// Row of the framebuffer the flat horizon sits on at the lowest camera height.
const HORIZON_ROW: i32 = (CANVAS_HEIGHT / 2) as i32;

/// Order in which terrain slivers are produced for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalMode {
    /// Column by column, nearest row first, with top-edge occlusion.
    FrontToBack,
    /// Row by row, farthest first, so sprites can be interleaved.
    BackToFront,
}

impl TraversalMode {
    /// Sprites need the row-major sweep; otherwise the cheaper column sweep.
    pub fn for_visible_sprites(sprites: &[VisibleSprite]) -> Self {
        if sprites.is_empty() {
            TraversalMode::FrontToBack
        } else {
            TraversalMode::BackToFront
        }
    }
}

/// A projected terrain sample for one (row, ray) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub world_x: i32,
    pub world_z: i32,
    /// Elevation read from the heightmap before any water clamp.
    pub elevation: i32,
    /// Screen row of the sliver's top edge.
    pub top: i32,
    /// Sliver height in pixels.
    pub scale: i32,
}

/// Borrowed, read-only view of everything a terrain pass samples.
pub struct TerrainView<'a> {
    pub tables: &'a LookupTables,
    pub heightmap: &'a Heightmap,
    pub out_of_bounds_heightmap: Option<&'a Heightmap>,
    pub texturemap: Option<&'a Image>,
    pub out_of_bounds_texturemap: Option<&'a Image>,
    pub sky: Option<&'a Image>,
    pub camera_x: i32,
    pub camera_y: i32,
    pub camera_z: i32,
    /// Leftmost view angle in internal units, `0..1920`.
    pub sky_angle: f64,
    pub water_height: Option<u8>,
    /// Fog colour when fog is enabled.
    pub fog: Option<Color>,
    pub stride: usize,
}

impl TerrainView<'_> {
    /// Angle index of the first ray.
    fn initial_angle(&self) -> usize {
        self.sky_angle as usize
    }

    fn next_angle(&self, angle: usize) -> usize {
        (angle + self.stride) % THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as usize
    }

    /// Inclusive column span painted by a ray. The leftmost ray also covers
    /// the columns left of it, which have no ray of their own.
    fn column_span(&self, ray: usize) -> (i32, i32) {
        let last = (ray + self.stride - 1) as i32;
        if ray == self.stride {
            (0, last)
        } else {
            (ray as i32, last)
        }
    }

    /// Project one (row, ray) pair onto the terrain.
    pub fn project(&self, row: usize, ray: usize, angle: usize) -> Projection {
        let ray_length = self.tables.ray_length(row, ray);
        let world_x = (self.camera_x as f64 + ray_length * self.tables.cosine(angle)) as i32;
        let world_z = (self.camera_z as f64 + ray_length * self.tables.sine(angle)) as i32;

        let index = heightmap_index(world_x, world_z);
        let in_bounds = in_primary_tile(world_x, world_z);
        let elevation = match self.out_of_bounds_heightmap {
            Some(map) if !in_bounds => map.at(index),
            _ => self.heightmap.at(index),
        } as i32;

        // Submerged terrain renders flat at the water line.
        let height = match self.water_height {
            Some(water) if in_bounds && elevation < water as i32 => water as i32,
            _ => elevation,
        };

        let scale = (height as f64 * SCALE_FACTOR / (ray_length + 1.0)) as i32;
        let top = HORIZON_ROW - (self.camera_y - CANVAS_HEIGHT as i32) + row as i32 - scale;

        Projection {
            world_x,
            world_z,
            elevation,
            top,
            scale,
        }
    }

    /// Final colour of a projected texel on screen row `row` of ray `ray`.
    pub fn resolve_color(&self, projection: &Projection, ray: usize, row: usize) -> Color {
        let x = projection.world_x;
        let z = projection.world_z;
        let u = (x & 1023) as u32;
        let v = (z & 1023) as u32;

        let color = if !in_primary_tile(x, z) {
            match self.out_of_bounds_texturemap {
                Some(map) => opaque(map.get(u, v)),
                None => Color::from_u32(OUT_OF_BOUNDS_FALLBACK_COLOR),
            }
        } else {
            let texel = match self.texturemap {
                Some(map) => opaque(map.get(u, v)),
                None => Color::WHITE,
            };
            match self.water_height {
                Some(water) if projection.elevation < water as i32 => {
                    let reflected = sky::sky_pixel(
                        self.sky,
                        self.sky_angle,
                        ray as i32,
                        CANVAS_HEIGHT as i32 - projection.top,
                    );
                    let depth = (water as i32 - projection.elevation) as f64 / water as f64;
                    alpha_blend(reflected, texel, (depth * 255.0 * 2.0) as i32)
                }
                _ => texel,
            }
        };

        match self.fog {
            Some(fog) => alpha_blend(color, fog, (row as f64 / 100.0 * 255.0) as i32),
            None => color,
        }
    }
}

fn opaque(color: Color) -> Color {
    Color::rgb(color.r, color.g, color.b)
}

/// Column-major sweep, nearest row first. A sliver is emitted only when its
/// top rises above everything already drawn in the column, and covers
/// `[top, previous_top)`.
pub fn render_front_to_back(view: &TerrainView<'_>, frame: &mut Image) {
    let mut angle = view.initial_angle();
    for ray in (view.stride..CANVAS_WIDTH as usize).step_by(view.stride) {
        let (x0, x1) = view.column_span(ray);
        let mut previous_top = MAXIMUM_ROW;

        for row in (0..=MAXIMUM_ROW as usize).rev() {
            let projection = view.project(row, ray, angle);
            if projection.top >= previous_top {
                continue;
            }
            let color = view.resolve_color(&projection, ray, row);
            frame.fill_rect(x0, projection.top, x1, previous_top - 1, color);
            previous_top = projection.top;
            if previous_top <= 0 {
                break;
            }
        }

        angle = view.next_angle(angle);
    }
}

/// Row-major sweep, farthest row first, overdrawing with full slivers.
/// Each visible sprite is blitted right after the terrain of its terminal row.
pub fn render_back_to_front(view: &TerrainView<'_>, frame: &mut Image, sprites: &[VisibleSprite]) {
    let mut pending: Vec<&VisibleSprite> = sprites.iter().collect();
    pending.sort_by_key(|sprite| sprite.row);
    let mut next_sprite = 0;

    for row in 0..=MAXIMUM_ROW as usize {
        let mut angle = view.initial_angle();
        for ray in (view.stride..CANVAS_WIDTH as usize).step_by(view.stride) {
            let (x0, x1) = view.column_span(ray);
            let projection = view.project(row, ray, angle);
            let color = view.resolve_color(&projection, ray, row);
            frame.fill_rect(
                x0,
                projection.top,
                x1,
                projection.top + projection.scale,
                color,
            );
            angle = view.next_angle(angle);
        }

        while let Some(sprite) = pending.get(next_sprite) {
            if sprite.row != row as i32 {
                break;
            }
            sprite::blit(frame, sprite);
            next_sprite += 1;
        }
    }
}
