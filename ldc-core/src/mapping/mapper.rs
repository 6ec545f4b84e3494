use std::time::Instant;

use ndarray::Array2;
use tracing::debug;

use super::rectify::{init_undistort_rectify_map, pixel_grid, undistort_points};
use super::{BackwardMap, FrameDimensions, Point2D};
use crate::camera::{CameraModel, PinholeCamera};
use crate::error::{LdcError, Result};

/// Precomputed point correspondences between a distorted frame and its
/// undistorted rendering.
///
/// Both tables are built once in [`CoordinateMapper::new`] and never change,
/// so a mapper can be shared across threads for read-only queries.
///
/// Queries take 1-based bounds: `0 < x <= width` and `0 < y <= height`.
/// The last column (`x == width`) and last row (`y == height`) have no table
/// entry and are evaluated directly through the camera model.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    dims: FrameDimensions,
    camera: PinholeCamera,
    backward: BackwardMap,
    /// `(width * height, 2)`, row `x * height + y`
    forward: Array2<f32>,
}

impl CoordinateMapper {
    /// Build both maps for a `width` x `height` frame
    pub fn new(width: i64, height: i64, camera: PinholeCamera) -> Result<Self> {
        let dims = FrameDimensions::new(width, height)?;

        let started = Instant::now();
        let backward = init_undistort_rectify_map(&camera, dims);
        debug!(
            width,
            height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built rectification map"
        );

        let started = Instant::now();
        let forward = {
            let grid = pixel_grid(dims);
            undistort_points(&camera, &grid)
        };
        debug!(
            points = forward.nrows(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "undistorted pixel grid"
        );

        Ok(Self {
            dims,
            camera,
            backward,
            forward,
        })
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dims
    }

    pub fn camera(&self) -> &PinholeCamera {
        &self.camera
    }

    /// Undistorted -> distorted lookup tables
    pub fn backward_map(&self) -> &BackwardMap {
        &self.backward
    }

    /// Distorted -> undistorted table, one row per source pixel
    pub fn forward_map(&self) -> &Array2<f32> {
        &self.forward
    }

    /// Where source pixel `(x, y)` lands in the undistorted image
    pub fn get_undistorted_point(&self, x: i64, y: i64) -> Result<Point2D> {
        let (col, row) = self.check_bounds(x, y, "get_undistorted_point")?;

        let (u, v) = if col < self.dims.width() && row < self.dims.height() {
            let idx = col * self.dims.height() + row;
            (self.forward[[idx, 0]] as f64, self.forward[[idx, 1]] as f64)
        } else {
            self.camera.undistort_pixel((x as f64, y as f64))
        };

        Ok(Point2D::from_rounded(u, v))
    }

    /// Where undistorted pixel `(x, y)` comes from in the source image
    pub fn get_original_point(&self, x: i64, y: i64) -> Result<Point2D> {
        let (col, row) = self.check_bounds(x, y, "get_original_point")?;

        // Maps are stored (row, col), i.e. (y, x)
        let (u, v) = match self.backward.get(col, row) {
            Some((u, v)) => (u as f64, v as f64),
            None => self.camera.distort_pixel((x as f64, y as f64)),
        };

        Ok(Point2D::from_rounded(u, v))
    }

    fn check_bounds(&self, x: i64, y: i64, op: &str) -> Result<(usize, usize)> {
        let in_range = |v: i64, limit: usize| v > 0 && (v as u64) <= limit as u64;
        if !in_range(x, self.dims.width()) || !in_range(y, self.dims.height()) {
            return Err(LdcError::invalid(format!(
                "{op}: point ({x},{y}) outside 1..={} x 1..={}",
                self.dims.width(),
                self.dims.height()
            )));
        }
        Ok((x as usize, y as usize))
    }
}
