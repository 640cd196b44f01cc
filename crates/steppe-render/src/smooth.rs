use steppe_core::constants::SMOOTH_WEIGHT;
use steppe_core::{Color, Image};

/// 3x3 smoothing post-pass. The centre pixel weighs [`SMOOTH_WEIGHT`] and each
/// neighbour weighs 1; samples past the border repeat the edge pixel.
pub fn smooth(frame: &mut Image) {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let source = frame.clone();
    let divisor = SMOOTH_WEIGHT + 8;
    let max_x = width as i32 - 1;
    let max_y = height as i32 - 1;

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let mut sum = [0u32; 3];
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let weight = if dx == 0 && dy == 0 { SMOOTH_WEIGHT } else { 1 };
                    let p = source.get(
                        (x + dx).clamp(0, max_x) as u32,
                        (y + dy).clamp(0, max_y) as u32,
                    );
                    sum[0] += p.r as u32 * weight;
                    sum[1] += p.g as u32 * weight;
                    sum[2] += p.b as u32 * weight;
                }
            }
            frame.put(
                x as u32,
                y as u32,
                Color::rgb(
                    (sum[0] / divisor) as u8,
                    (sum[1] / divisor) as u8,
                    (sum[2] / divisor) as u8,
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_keeps_uniform_image() {
        let mut frame = Image::filled(6, 4, Color::rgb(90, 45, 23));
        smooth(&mut frame);
        assert!(frame.pixels().iter().all(|&p| p == Color::rgb(90, 45, 23)));
    }

    #[test]
    fn test_smooth_spreads_a_single_bright_pixel() {
        let mut frame = Image::filled(5, 5, Color::BLACK);
        frame.put(2, 2, Color::rgb(230, 230, 230));
        smooth(&mut frame);
        // Centre keeps 15/23 of its value, neighbours get 1/23.
        assert_eq!(frame.get(2, 2).r, 150);
        assert_eq!(frame.get(1, 1).r, 10);
        assert_eq!(frame.get(3, 2).r, 10);
        assert_eq!(frame.get(0, 0).r, 0);
    }

    #[test]
    fn test_smooth_clamps_at_edges() {
        let mut frame = Image::filled(3, 3, Color::BLACK);
        frame.put(0, 0, Color::rgb(230, 0, 0));
        smooth(&mut frame);
        // Corner sees itself at the centre plus three clamped copies: 18/23.
        assert_eq!(frame.get(0, 0).r, 180);
    }
}
