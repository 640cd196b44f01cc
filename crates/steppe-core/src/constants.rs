//! Single source of truth for shared constants.
//! The renderer's lookup tables, the compositor's bake and the benchmark
//! scenes all size themselves from these values.

/// Output framebuffer width in pixels.
pub const CANVAS_WIDTH: u32 = 320;

/// Output framebuffer height in pixels.
pub const CANVAS_HEIGHT: u32 = 200;

/// Horizontal field of view in real degrees.
pub const ANGLE_OF_VIEW: u32 = 60;

/// Internal angular units per real degree (320 / 60).
pub const ONE_DEGREE_ANGLE: f64 = CANVAS_WIDTH as f64 / ANGLE_OF_VIEW as f64;

/// Half field of view in internal angular units.
pub const THIRTY_DEGREE_ANGLE: i32 = 160;

/// One full revolution in internal angular units.
pub const THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE: i32 = 1920;

/// Real degrees covered by one internal angular unit (60 / 320).
pub const ANGULAR_INCREMENT: f64 = ANGLE_OF_VIEW as f64 / CANVAS_WIDTH as f64;

/// Converts internal angular units directly to radians.
pub const FAKE_DEGREES_TO_RADIANS: f64 =
    (2.0 * std::f64::consts::PI) / THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as f64;

/// Converts radians directly to internal angular units.
pub const RADIANS_TO_FAKE_DEGREES: f64 =
    THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as f64 / (2.0 * std::f64::consts::PI);

/// Sliver height multiplier: projected height = elevation * SCALE_FACTOR / (distance + 1).
pub const SCALE_FACTOR: f64 = 35.0;

/// Distance from the eye to the projection plane.
pub const PROJECTION_DISTANCE: f64 = 75.0;

/// Last row of the ray-length table (200 + 100 - 1).
pub const MAXIMUM_ROW: i32 = (CANVAS_HEIGHT + CANVAS_HEIGHT / 2 - 1) as i32;

/// Lowest accepted camera height.
pub const MIN_CAMERA_Y: i32 = 200;

/// Highest accepted camera height.
pub const MAX_CAMERA_Y: i32 = 300;

/// Camera height a fresh renderer starts at.
pub const DEFAULT_CAMERA_Y: i32 = MIN_CAMERA_Y;

/// Water height applied when the reflection map is first enabled.
pub const DEFAULT_WATER_HEIGHT: u8 = 64;

/// Sprites farther than this from the camera are culled.
pub const SPRITE_VISIBILITY_RADIUS: f64 = 400.0;

/// Side length of the heightmap and texturemap tiles.
pub const MAP_SIZE: u32 = 1024;

/// Mask applied to world coordinates to wrap them onto the tile (MAP_SIZE - 1).
pub const MAP_MASK: i32 = 1023;

/// Total texels in a heightmap (1024^2).
pub const MAP_TEXELS: usize = (MAP_SIZE * MAP_SIZE) as usize;

/// First world coordinate of the primary (in-bounds) tile on both axes.
pub const PRIMARY_TILE_MIN: i32 = 1024;

/// One past the last world coordinate of the primary tile.
pub const PRIMARY_TILE_MAX: i32 = PRIMARY_TILE_MIN + MAP_SIZE as i32;

/// Side length of a compositor texture.
pub const TEXTURE_SIZE: u32 = 256;

/// Number of elevation bands (one per possible height value).
pub const ELEVATION_BANDS: usize = 256;

/// Baseline height written under every opaque mask pixel.
pub const MASK_BASE_HEIGHT: f32 = 192.0;

/// Width of the sky panorama (one full revolution).
pub const SKY_WIDTH: u32 = 1920;

/// Height of the sky panorama.
pub const SKY_HEIGHT: u32 = 100;

/// First framebuffer row of the horizon band pre-filled before the sky pass.
pub const HORIZON_BAND_TOP: u32 = 100;

/// Rows in the horizon band.
pub const HORIZON_BAND_ROWS: u32 = 25;

/// Default fog colour (0xRRGGBB).
pub const DEFAULT_FOG_COLOR: u32 = 0x7f7f7f;

/// Colour returned for out-of-bounds texels when no out-of-bounds texturemap is bound.
pub const OUT_OF_BOUNDS_FALLBACK_COLOR: u32 = 0x7f7f7f;

/// Centre weight of the 3x3 smoothing kernel (neighbours weigh 1).
pub const SMOOTH_WEIGHT: u32 = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angular_units_match_field_of_view() {
        assert_eq!(THIRTY_DEGREE_ANGLE as f64, ONE_DEGREE_ANGLE * 30.0);
        assert_eq!(
            THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as f64,
            ONE_DEGREE_ANGLE * 360.0
        );
        assert_eq!(THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as u32, SKY_WIDTH);
    }

    #[test]
    fn test_maximum_row() {
        assert_eq!(MAXIMUM_ROW, 299);
    }

    #[test]
    fn test_camera_range_keeps_denominator_positive() {
        // y - (CANVAS_HEIGHT - 1 - row) must stay >= 1 for every row.
        for y in MIN_CAMERA_Y..=MAX_CAMERA_Y {
            assert!(y - (CANVAS_HEIGHT as i32 - 1) >= 1);
        }
    }
}
