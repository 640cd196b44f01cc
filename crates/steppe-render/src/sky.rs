//! Panoramic sky pass.
//! The 1920x100 panorama covers one full revolution, so one sky column maps to
//! one internal angular unit and the visible slice starts at the left edge of
//! the field of view. The slice wraps across the panorama seam.

use steppe_core::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, HORIZON_BAND_ROWS, HORIZON_BAND_TOP, SKY_HEIGHT, SKY_WIDTH,
    THIRTY_DEGREE_ANGLE, THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE,
};
use steppe_core::{alpha_blend, Color, Image};

/// Leftmost view angle for a camera angle, in internal units `0..1920`.
pub fn sky_angle(camera_angle: f64) -> f64 {
    let angle = camera_angle - THIRTY_DEGREE_ANGLE as f64;
    if angle < 0.0 {
        angle + THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as f64
    } else {
        angle
    }
}

/// Sky colour seen `x` columns right of the view's left edge at panorama row
/// `y` (clamped to the panorama). Black when no sky is bound.
pub fn sky_pixel(sky: Option<&Image>, sky_angle: f64, x: i32, y: i32) -> Color {
    let Some(sky) = sky else {
        return Color::BLACK;
    };
    let y = y.clamp(0, SKY_HEIGHT as i32 - 1) as u32;
    let x = ((sky_angle + x as f64) as i32).rem_euclid(SKY_WIDTH as i32) as u32;
    let c = sky.get(x, y);
    Color::rgb(c.r, c.g, c.b)
}

/// Rows of sky visible for a camera height; a raised camera sees less sky.
pub fn visible_sky_rows(camera_y: i32) -> i32 {
    let rows = (CANVAS_HEIGHT / 2) as i32 - (camera_y - CANVAS_HEIGHT as i32);
    rows.clamp(0, SKY_HEIGHT as i32)
}

/// Paint the band just below the horizon, which distant terrain may leave
/// uncovered.
pub fn fill_horizon_band(frame: &mut Image, color: Color) {
    frame.fill_rect(
        0,
        HORIZON_BAND_TOP as i32,
        CANVAS_WIDTH as i32 - 1,
        (HORIZON_BAND_TOP + HORIZON_BAND_ROWS) as i32 - 1,
        color,
    );
}

/// Copy the visible slice of the panorama into the top of the frame, then
/// lay the fog gradient over it when fog is on.
pub fn render_sky(
    frame: &mut Image,
    sky: Option<&Image>,
    sky_angle: f64,
    camera_y: i32,
    fog: Option<Color>,
) {
    let rows = visible_sky_rows(camera_y);
    let source_top = (camera_y - CANVAS_HEIGHT as i32).max(0);

    if let Some(panorama) = sky {
        let start = sky_angle as u32;
        for y in 0..rows as u32 {
            let source_y = (source_top as u32 + y).min(SKY_HEIGHT - 1);
            for x in 0..CANVAS_WIDTH {
                let c = panorama.get((start + x) % SKY_WIDTH, source_y);
                frame.put(x, y, Color::rgb(c.r, c.g, c.b));
            }
        }
    }

    if let Some(fog) = fog {
        apply_fog_gradient(frame, rows, fog);
    }
}

/// Fog opacity runs linearly from `1 - rows/100` on the first row to fully
/// opaque on the last sky row.
fn apply_fog_gradient(frame: &mut Image, rows: i32, fog: Color) {
    if rows <= 0 {
        return;
    }
    let start = 1.0 - rows as f64 / SKY_HEIGHT as f64;
    for y in 0..rows {
        let t = if rows > 1 {
            y as f64 / (rows - 1) as f64
        } else {
            1.0
        };
        let alpha = ((start + (1.0 - start) * t) * 255.0) as i32;
        for x in 0..CANVAS_WIDTH {
            let under = frame.get(x, y as u32);
            frame.put(x, y as u32, alpha_blend(fog, under, alpha));
        }
    }
}
