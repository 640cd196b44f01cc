use crate::constants::{
    ANGLE_OF_VIEW, ANGULAR_INCREMENT, CANVAS_WIDTH, THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE,
};
use crate::types::Color;

/// Blend two colours: `first * alpha + second * (1 - alpha)` per channel,
/// each term floored, with `alpha` clamped to `0..=255`. The result is opaque.
#[inline]
pub fn alpha_blend(first: Color, second: Color, alpha: i32) -> Color {
    let a = alpha.clamp(0, 255) as u32;
    let inv = 255 - a;
    let mix = |f: u8, s: u8| ((f as u32 * a) / 255 + (s as u32 * inv) / 255) as u8;
    Color::rgb(
        mix(first.r, second.r),
        mix(first.g, second.g),
        mix(first.b, second.b),
    )
}

/// Normalise an internal angle into `0..1920`.
#[inline]
pub fn wrap_angle(units: i32) -> i32 {
    units.rem_euclid(THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE)
}

/// Real degrees (rounded to whole degrees, any sign) to internal angular units
/// in `0..1920`.
pub fn degrees_to_units(degrees: f64) -> f64 {
    let whole = (degrees.round() as i64).rem_euclid(360);
    whole as f64 / ANGLE_OF_VIEW as f64 * CANVAS_WIDTH as f64
}

/// Internal angular units to whole real degrees in `0..360`.
pub fn units_to_degrees(units: f64) -> i32 {
    let degrees =
        (units / THREE_HUNDRED_AND_SIXTY_DEGREE_ANGLE as f64 * 360.0 + 0.5).floor() as i32;
    degrees.rem_euclid(360)
}

/// Internal angular units to radians.
#[inline]
pub fn units_to_radians(units: f64) -> f64 {
    (units * ANGULAR_INCREMENT).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_blend_extremes() {
        let a = Color::rgb(200, 100, 50);
        let b = Color::rgb(10, 20, 30);
        assert_eq!(alpha_blend(a, b, 255), a);
        assert_eq!(alpha_blend(a, b, 0), b);
    }

    #[test]
    fn test_alpha_blend_clamps_alpha() {
        let a = Color::rgb(200, 100, 50);
        let b = Color::rgb(10, 20, 30);
        assert_eq!(alpha_blend(a, b, 1000), a);
        assert_eq!(alpha_blend(a, b, -40), b);
    }

    #[test]
    fn test_alpha_blend_floors_each_term() {
        // 255*128/255 = 128, 255*127/255 = 127 -> 255
        let white = Color::WHITE;
        assert_eq!(alpha_blend(white, white, 128), white);
        // 100*128/255 = 50.19 -> 50, 0 -> 50
        assert_eq!(alpha_blend(Color::rgb(100, 0, 0), Color::BLACK, 128).r, 50);
        // 1*128/255 -> 0, 1*127/255 -> 0: both terms floor away
        assert_eq!(
            alpha_blend(Color::rgb(1, 1, 1), Color::rgb(1, 1, 1), 128),
            Color::BLACK
        );
    }

    #[test]
    fn test_alpha_blend_is_opaque() {
        let out = alpha_blend(Color::TRANSPARENT, Color::TRANSPARENT, 100);
        assert_eq!(out.a, 255);
    }

    #[test]
    fn test_degrees_to_units() {
        assert_eq!(degrees_to_units(0.0), 0.0);
        assert_eq!(degrees_to_units(30.0), 160.0);
        assert_eq!(degrees_to_units(180.0), 960.0);
        assert_eq!(degrees_to_units(360.0), 0.0);
        assert_eq!(degrees_to_units(-90.0), degrees_to_units(270.0));
        assert_eq!(degrees_to_units(89.6), degrees_to_units(90.0));
    }

    #[test]
    fn test_units_to_degrees_roundtrip() {
        for degrees in [0, 1, 45, 90, 179, 240, 359] {
            assert_eq!(units_to_degrees(degrees_to_units(degrees as f64)), degrees);
        }
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(-160), 1760);
        assert_eq!(wrap_angle(1920), 0);
        assert_eq!(wrap_angle(1925), 5);
    }

    #[test]
    fn test_units_to_radians() {
        let quarter = units_to_radians(480.0);
        assert!((quarter - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
