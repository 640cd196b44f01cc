use std::sync::Arc;

use glam::DVec2;
use steppe_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FAKE_DEGREES_TO_RADIANS, MAXIMUM_ROW, PROJECTION_DISTANCE,
    RADIANS_TO_FAKE_DEGREES, SCALE_FACTOR, SPRITE_VISIBILITY_RADIUS, THIRTY_DEGREE_ANGLE,
};
use steppe_core::math::units_to_radians;
use steppe_core::{alpha_blend, Image};

use crate::tables::LookupTables;

/// A billboard placed in the world. `y` is the terrain elevation under it,
/// sampled when it was added.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub image: Arc<Image>,
    pub x: i32,
    pub y: u8,
    pub z: i32,
}

/// A sprite that survived culling this frame, in screen space.
#[derive(Debug, Clone)]
pub struct VisibleSprite {
    pub image: Arc<Image>,
    /// Sweep row after whose terrain the sprite is drawn.
    pub row: i32,
    /// Left edge of the scaled sprite.
    pub x: i32,
    /// Top edge of the scaled sprite.
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub distance: f64,
}

/// Camera pose as the projection needs it.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    /// Heading in internal angular units.
    pub angle: f64,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Project every sprite into screen space, dropping those out of range,
/// behind the camera, or outside the field of view.
pub fn project_sprites(
    sprites: &[Sprite],
    viewpoint: &Viewpoint,
    tables: &LookupTables,
) -> Vec<VisibleSprite> {
    let radians = units_to_radians(viewpoint.angle);
    let facing = DVec2::new(radians.cos(), radians.sin());
    let visible: Vec<VisibleSprite> = sprites
        .iter()
        .filter_map(|sprite| project_sprite(sprite, facing, viewpoint, tables))
        .collect();
    if !sprites.is_empty() {
        log::debug!("{} of {} sprites visible", visible.len(), sprites.len());
    }
    visible
}

fn project_sprite(
    sprite: &Sprite,
    facing: DVec2,
    viewpoint: &Viewpoint,
    tables: &LookupTables,
) -> Option<VisibleSprite> {
    // Camera coordinates are unbounded; subtract in f64.
    let offset = DVec2::new(
        sprite.x as f64 - viewpoint.x as f64,
        sprite.z as f64 - viewpoint.z as f64,
    );
    let distance = offset.length();
    if distance > SPRITE_VISIBILITY_RADIUS || distance == 0.0 {
        return None;
    }

    let direction = offset / distance;
    let dot = facing.dot(direction);
    if dot < 0.0 {
        return None;
    }
    let theta = dot.min(1.0).acos();
    if theta > THIRTY_DEGREE_ANGLE as f64 * FAKE_DEGREES_TO_RADIANS {
        return None;
    }

    let scale = SCALE_FACTOR / (distance + 1.0);
    let width = (scale * sprite.image.width() as f64) as u32;
    let height = (scale * sprite.image.height() as f64) as u32;

    // Signed: negative puts the sprite left of centre.
    let cross = facing.perp_dot(direction);
    let centre = (CANVAS_WIDTH / 2) as f64;
    let offset_units = theta * RADIANS_TO_FAKE_DEGREES;
    let column = if cross < 0.0 {
        (centre - offset_units) as i32
    } else {
        (centre + offset_units) as i32
    };

    let row = terminal_row(distance, column, viewpoint.y, tables);
    let projected_scale = sprite.y as f64 * scale;
    let base = (CANVAS_HEIGHT / 2) as f64 - (viewpoint.y - CANVAS_HEIGHT as i32) as f64;
    let top = base + row as f64 - projected_scale;

    Some(VisibleSprite {
        image: Arc::clone(&sprite.image),
        row,
        x: column - (width >> 1) as i32,
        y: (top - height as f64) as i32,
        width,
        height,
        distance,
    })
}

/// Sweep row whose flat-ground ray length matches the sprite distance, by
/// inverting the ray-length relation. Clamped to the sweep.
fn terminal_row(distance: f64, column: i32, camera_y: i32, tables: &LookupTables) -> i32 {
    let column = column.clamp(0, CANVAS_WIDTH as i32) as usize;
    let corrected = distance / tables.inverse_distortion(column);
    let y = (PROJECTION_DISTANCE * camera_y as f64 / corrected).round() as i32;
    let row = y + CANVAS_HEIGHT as i32 - 1 - camera_y;
    row.clamp(0, MAXIMUM_ROW)
}

/// Draw a visible sprite with nearest-neighbour scaling. Fully transparent
/// pixels are skipped and partial alpha blends over the frame.
pub fn blit(frame: &mut Image, sprite: &VisibleSprite) {
    let (source_width, source_height) = sprite.image.dimensions();
    if sprite.width == 0 || sprite.height == 0 || source_width == 0 || source_height == 0 {
        return;
    }
    let (frame_width, frame_height) = (frame.width() as i32, frame.height() as i32);

    for dy in 0..sprite.height {
        let ty = sprite.y + dy as i32;
        if ty < 0 || ty >= frame_height {
            continue;
        }
        let sy = (dy as u64 * source_height as u64 / sprite.height as u64) as u32;
        for dx in 0..sprite.width {
            let tx = sprite.x + dx as i32;
            if tx < 0 || tx >= frame_width {
                continue;
            }
            let sx = (dx as u64 * source_width as u64 / sprite.width as u64) as u32;
            let pixel = sprite.image.get(sx, sy);
            match pixel.a {
                0 => {}
                255 => frame.put(tx as u32, ty as u32, pixel),
                alpha => {
                    let under = frame.get(tx as u32, ty as u32);
                    frame.put(
                        tx as u32,
                        ty as u32,
                        alpha_blend(pixel, under, alpha as i32),
                    );
                }
            }
        }
    }
}
