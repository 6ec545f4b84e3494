//! Resample a distorted image through a backward map

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, warp_with};
use ldc_core::BackwardMap;

use crate::error::{IoError, Result};

/// Render the undistorted image.
///
/// Every output pixel reads `src` at the coordinate stored in `map` with
/// bilinear interpolation. Samples whose neighbourhood leaves `src` are
/// black. `src` must have the map's size.
pub fn remap_image(src: &RgbImage, map: &BackwardMap) -> Result<RgbImage> {
    let (map_w, map_h) = map.size();
    let mismatch = || IoError::SizeMismatch {
        map_w,
        map_h,
        image_w: src.width(),
        image_h: src.height(),
    };
    let (Ok(w), Ok(h)) = (u32::try_from(map_w), u32::try_from(map_h)) else {
        return Err(mismatch());
    };
    if src.dimensions() != (w, h) {
        return Err(mismatch());
    }

    let map_x = map.map_x();
    let map_y = map.map_y();
    Ok(warp_with(
        src,
        |x, y| {
            let idx = [y as usize, x as usize];
            (map_x[idx], map_y[idx])
        },
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
    ))
}
