//! Bulk transforms over every pixel of a frame

use ndarray::{Array2, ArrayViewMut1, Axis, Zip};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{BackwardMap, FrameDimensions};
use crate::camera::CameraModel;

/// Build the rectification map for `camera` with identity rotation.
///
/// The rectified image uses the camera's own intrinsic matrix, so entry
/// `[[row, col]]` holds the distorted-image location of undistorted pixel
/// `(col, row)`.
pub fn init_undistort_rectify_map<C>(camera: &C, dims: FrameDimensions) -> BackwardMap
where
    C: CameraModel + Sync,
{
    let shape = (dims.height(), dims.width());
    let mut map_x = Array2::<f32>::zeros(shape);
    let mut map_y = Array2::<f32>::zeros(shape);

    let fill_row = |row: usize, mut xs: ArrayViewMut1<f32>, mut ys: ArrayViewMut1<f32>| {
        for (col, (x, y)) in xs.iter_mut().zip(ys.iter_mut()).enumerate() {
            let (u, v) = camera.distort_pixel((col as f64, row as f64));
            *x = u as f32;
            *y = v as f32;
        }
    };

    let rows = Zip::indexed(map_x.rows_mut()).and(map_y.rows_mut());
    #[cfg(feature = "parallel")]
    rows.par_for_each(fill_row);
    #[cfg(not(feature = "parallel"))]
    rows.for_each(fill_row);

    BackwardMap::new(map_x, map_y)
}

/// Every pixel of the frame, `x` outer and `y` inner
pub fn pixel_grid(dims: FrameDimensions) -> Vec<(f64, f64)> {
    let mut grid = Vec::with_capacity(dims.area());
    for x in 0..dims.width() {
        for y in 0..dims.height() {
            grid.push((x as f64, y as f64));
        }
    }
    grid
}

/// Undistort a batch of distorted pixels.
///
/// Row `i` of the `(n, 2)` result is the undistorted `(x, y)` of `points[i]`.
pub fn undistort_points<C>(camera: &C, points: &[(f64, f64)]) -> Array2<f32>
where
    C: CameraModel + Sync,
{
    let mut out = Array2::<f32>::zeros((points.len(), 2));

    let write = |(mut row, &p): (ArrayViewMut1<f32>, &(f64, f64))| {
        let (u, v) = camera.undistort_pixel(p);
        row[0] = u as f32;
        row[1] = v as f32;
    };

    #[cfg(feature = "parallel")]
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(points.par_iter())
        .for_each(write);
    #[cfg(not(feature = "parallel"))]
    out.axis_iter_mut(Axis(0)).zip(points.iter()).for_each(write);

    out
}
