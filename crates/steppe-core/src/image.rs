use crate::error::SteppeError;
use crate::types::Color;

/// Row-major RGBA image. Used for textures, texturemaps, the sky panorama,
/// sprite billboards and the output framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    /// Transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap a decoded RGBA8 buffer (4 bytes per pixel, row-major).
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, SteppeError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(SteppeError::PixelBufferLength {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: bytemuck::cast_slice(bytes).to_vec(),
        })
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at (x, y). Caller guarantees the coordinate is inside the image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = color;
    }

    /// Fill the inclusive rectangle `[x0, x1] x [y0, y1]`, clipped to the image.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.width as i32 - 1);
        let y1 = y1.min(self.height as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }
        let stride = self.width as usize;
        for y in y0 as usize..=y1 as usize {
            let row = y * stride;
            self.pixels[row + x0 as usize..=row + x1 as usize].fill(color);
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Raw RGBA8 bytes, zero-copy.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_roundtrips_bytes() {
        let bytes: Vec<u8> = (0..2 * 3 * 4).map(|i| i as u8).collect();
        let image = Image::from_rgba8(2, 3, &bytes).expect("valid buffer");
        assert_eq!(image.dimensions(), (2, 3));
        assert_eq!(image.get(1, 0), Color::rgba(4, 5, 6, 7));
        assert_eq!(image.as_bytes(), bytes.as_slice());
    }

    #[test]
    fn test_from_rgba8_rejects_wrong_length() {
        let err = Image::from_rgba8(2, 2, &[0; 15]).unwrap_err();
        assert_eq!(
            err,
            SteppeError::PixelBufferLength {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut image = Image::new(4, 4);
        image.fill_rect(-2, 2, 1, 10, Color::WHITE);
        for y in 0..4 {
            for x in 0..4 {
                let expected = if x <= 1 && y >= 2 {
                    Color::WHITE
                } else {
                    Color::TRANSPARENT
                };
                assert_eq!(image.get(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_fill_rect_empty_when_inverted() {
        let mut image = Image::new(4, 4);
        image.fill_rect(3, 3, 2, 2, Color::WHITE);
        image.fill_rect(0, 5, 3, 8, Color::WHITE);
        assert!(image.pixels().iter().all(|&p| p == Color::TRANSPARENT));
    }

    #[test]
    fn test_from_fn_row_major() {
        let image = Image::from_fn(3, 2, |x, y| Color::rgb(x as u8, y as u8, 0));
        assert_eq!(image.row(1)[2], Color::rgb(2, 1, 0));
    }
}
