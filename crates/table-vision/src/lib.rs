use image::RgbaImage;

mod card_matcher;
mod settle;

pub use card_matcher::{CardMatcher, CARD_HEIGHT, CARD_WIDTH};
pub use settle::SettleDetector;

use table_capture::{crop_rect, Frame, Rect};

/// Mean intensity over the RGB planes, 0.0-255.0.
pub fn mean_intensity(img: &RgbaImage) -> f64 {
    let mut sum = 0u64;
    let mut count = 0u64;
    for px in img.pixels() {
        sum += px[0] as u64 + px[1] as u64 + px[2] as u64;
        count += 3;
    }
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// An indicator region is "lit" when it is solid white; the client
/// paints the sampled pixels pure white while the matching card back is
/// on the felt.
pub fn indicator_lit(frame: &Frame, rect: &Rect) -> bool {
    let crop = crop_rect(&frame.pixels, rect);
    (mean_intensity(&crop) - 255.0).abs() < f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::Instant;

    #[test]
    fn test_mean_intensity() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 150, 200, 255]));
        assert!((mean_intensity(&img) - 150.0).abs() < 1e-9);
        assert_eq!(mean_intensity(&RgbaImage::new(0, 0)), 0.0);
    }

    #[test]
    fn test_indicator_lit_requires_solid_white() {
        let mut pixels = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let frame = Frame::with_timestamp(pixels.clone(), Instant::now());
        let rect = Rect::new(4, 4, 1, 1);
        assert!(indicator_lit(&frame, &rect));

        // One dim channel in the sampled pixel is enough to unlight it.
        pixels.put_pixel(4, 4, Rgba([255, 254, 255, 255]));
        let frame = Frame::with_timestamp(pixels, Instant::now());
        assert!(!indicator_lit(&frame, &rect));
    }
}
