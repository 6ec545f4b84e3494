use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as OutlineRect;
use ldc_core::Point2D;
use tracing::debug;

use crate::error::Result;

pub mod colors {
    use image::Rgb;

    /// Calibration rectangle as measured on the distorted image
    pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    /// Calibration rectangle after undistortion
    pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
}

/// Open an image from file path as 8-bit RGB
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path)?.to_rgb8();
    debug!(path = %path.display(), width = img.width(), height = img.height(), "loaded image");
    Ok(img)
}

/// Write an RGB image; format follows the file extension
pub fn save_rgb<P: AsRef<Path>>(img: &RgbImage, path: P) -> Result<()> {
    let path = path.as_ref();
    img.save(path)?;
    debug!(path = %path.display(), "wrote image");
    Ok(())
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u64,
    pub height: u64,
}

impl Rect {
    /// Rectangle spanned by two opposite corners.
    ///
    /// The top-left corner is inclusive and the bottom-right is exclusive,
    /// so `(765,567)`-`(1056,931)` is 291 x 364 pixels.
    pub fn from_corners(a: Point2D, b: Point2D) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x),
            height: a.y.abs_diff(b.y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Draw the outline of `rect`, `thickness` pixels wide and centered on its
/// border. Pixels outside the image are skipped.
pub fn draw_rect(img: &mut RgbImage, rect: Rect, color: Rgb<u8>, thickness: u32) {
    if rect.is_empty() || thickness == 0 {
        return;
    }

    let t = thickness as i64;
    for d in -((t - 1) / 2)..=(t / 2) {
        let w = rect.width as i64 + 2 * d;
        let h = rect.height as i64 + 2 * d;
        if w <= 0 || h <= 0 {
            continue;
        }
        let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
            i32::try_from(rect.x - d),
            i32::try_from(rect.y - d),
            u32::try_from(w),
            u32::try_from(h),
        ) else {
            continue;
        };
        draw_hollow_rect_mut(img, OutlineRect::at(x, y).of_size(w, h), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    #[test]
    fn test_rect_from_corners_normalizes() {
        let r = Rect::from_corners(Point2D::new(1056, 931), Point2D::new(765, 567));
        assert_eq!(
            r,
            Rect {
                x: 765,
                y: 567,
                width: 291,
                height: 364
            }
        );
        // Same rectangle whichever corner comes first
        assert_eq!(r, Rect::from_corners(Point2D::new(765, 567), Point2D::new(1056, 931)));
    }

    #[test]
    fn test_draw_single_pixel_outline() {
        let mut img = RgbImage::new(20, 20);
        let rect = Rect::from_corners(Point2D::new(5, 5), Point2D::new(10, 8));
        draw_rect(&mut img, rect, colors::GREEN, 1);

        // Corners of the outline, bottom-right is exclusive
        assert_eq!(*img.get_pixel(5, 5), colors::GREEN);
        assert_eq!(*img.get_pixel(9, 7), colors::GREEN);
        assert_eq!(*img.get_pixel(10, 8), Rgb([0, 0, 0]));
        // Interior untouched
        assert_eq!(*img.get_pixel(7, 6), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_thick_outline() {
        let mut img = RgbImage::new(40, 40);
        let rect = Rect::from_corners(Point2D::new(10, 10), Point2D::new(30, 30));
        draw_rect(&mut img, rect, colors::RED, 2);

        assert_eq!(*img.get_pixel(10, 20), colors::RED);
        assert_eq!(*img.get_pixel(9, 20), colors::RED);
        assert_eq!(*img.get_pixel(11, 20), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(8, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_clips_at_border() {
        let mut img = RgbImage::new(10, 10);
        let rect = Rect::from_corners(Point2D::new(-5, -5), Point2D::new(5, 5));
        draw_rect(&mut img, rect, colors::GREEN, 2);
        assert_eq!(*img.get_pixel(4, 0), colors::GREEN);
        assert_eq!(*img.get_pixel(0, 4), colors::GREEN);
    }

    #[test]
    fn test_empty_rect_draws_nothing() {
        let mut img = RgbImage::new(10, 10);
        let rect = Rect::from_corners(Point2D::new(3, 3), Point2D::new(3, 8));
        draw_rect(&mut img, rect, colors::GREEN, 2);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.png");

        let mut img = RgbImage::new(16, 12);
        draw_rect(
            &mut img,
            Rect::from_corners(Point2D::new(2, 2), Point2D::new(14, 10)),
            colors::RED,
            1,
        );
        save_rgb(&img, &path).unwrap();

        let loaded = load_rgb(&path).unwrap();
        assert_eq!(loaded.dimensions(), (16, 12));
        assert_eq!(*loaded.get_pixel(2, 2), colors::RED);
    }

    #[test]
    fn test_load_missing_file() {
        let res = load_rgb("/nonexistent/frame.png");
        assert!(matches!(res, Err(IoError::Image(_))));
    }
}
