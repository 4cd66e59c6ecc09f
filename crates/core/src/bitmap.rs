//! RGB8 bitmap used as the opaque image handle of a piece.
//!
//! Decoding lives in the adapter; by the time pixels reach the core they are a
//! plain row-major buffer.

/// Row-major RGB8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Bitmap {
    /// Wrap a pixel buffer. Returns `None` if the length does not match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
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

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    #[inline(always)]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Copy a sub-rectangle. The rectangle is clipped to the bitmap.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Bitmap {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        let w = x_end.saturating_sub(x);
        let h = y_end.saturating_sub(y);
        Bitmap::from_fn(w, h, |dx, dy| {
            self.pixels[((y + dy) as usize) * (self.width as usize) + ((x + dx) as usize)]
        })
    }

    /// Nearest-neighbour sample at normalized coordinates in `[0, 1)`.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 3] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0];
        }
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        self.pixels[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_rejects_wrong_length() {
        assert!(Bitmap::from_pixels(2, 2, vec![[0; 3]; 3]).is_none());
        assert!(Bitmap::from_pixels(2, 2, vec![[0; 3]; 4]).is_some());
    }

    #[test]
    fn crop_copies_the_requested_region() {
        let bmp = Bitmap::from_fn(4, 4, |x, y| [x as u8, y as u8, 0]);
        let tile = bmp.crop(2, 1, 2, 2);
        assert_eq!(tile.width(), 2);
        assert_eq!(tile.height(), 2);
        assert_eq!(tile.get(0, 0), Some([2, 1, 0]));
        assert_eq!(tile.get(1, 1), Some([3, 2, 0]));
    }

    #[test]
    fn crop_clips_to_bounds() {
        let bmp = Bitmap::from_fn(3, 3, |_, _| [1, 1, 1]);
        let tile = bmp.crop(2, 2, 5, 5);
        assert_eq!((tile.width(), tile.height()), (1, 1));
    }

    #[test]
    fn sample_clamps_coordinates() {
        let bmp = Bitmap::from_fn(2, 1, |x, _| [x as u8 * 100, 0, 0]);
        assert_eq!(bmp.sample(0.0, 0.0), [0, 0, 0]);
        assert_eq!(bmp.sample(1.0, 1.0), [100, 0, 0]);
        assert_eq!(bmp.sample(-3.0, 0.5), [0, 0, 0]);
    }
}
