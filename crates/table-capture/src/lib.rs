use image::RgbaImage;
use std::time::Instant;

mod geometry;
mod layout;
mod window;

pub use geometry::Rect;
pub use layout::TableLayout;
pub use window::{list_windows, CaptureInsets, WindowCapture};

/// One captured frame: an immutable pixel buffer plus the capture
/// timestamp. The timestamp is the tick's only clock, which keeps the
/// downstream settle bookkeeping deterministic under test.
#[derive(Debug, Clone)]
pub struct Frame {
    pub pixels: RgbaImage,
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            captured_at: Instant::now(),
        }
    }

    pub fn with_timestamp(pixels: RgbaImage, captured_at: Instant) -> Self {
        Self { pixels, captured_at }
    }
}

/// Supplies one frame per tick. `Ok(None)` means the tick is skipped;
/// the caller retries on the next tick.
pub trait FrameSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<Frame>>;
}

/// Crop a calibrated region out of a frame, clamped to the image bounds.
pub fn crop_rect(frame: &RgbaImage, rect: &Rect) -> RgbaImage {
    let (w, h) = (frame.width(), frame.height());
    let x = rect.x.min(w.saturating_sub(1));
    let y = rect.y.min(h.saturating_sub(1));
    let rw = rect.width.min(w - x);
    let rh = rect.height.min(h - y);

    image::imageops::crop_imm(frame, x, y, rw, rh).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_rect() {
        let img = RgbaImage::from_fn(100, 80, |x, y| image::Rgba([x as u8, y as u8, 0, 255]));
        let crop = crop_rect(&img, &Rect::new(10, 20, 30, 40));
        assert_eq!(crop.dimensions(), (30, 40));
        assert_eq!(crop.get_pixel(0, 0)[0], 10);
        assert_eq!(crop.get_pixel(0, 0)[1], 20);
    }

    #[test]
    fn test_crop_rect_clamps_to_bounds() {
        let img = RgbaImage::new(50, 50);
        let crop = crop_rect(&img, &Rect::new(40, 40, 30, 30));
        assert_eq!(crop.dimensions(), (10, 10));
    }
}
