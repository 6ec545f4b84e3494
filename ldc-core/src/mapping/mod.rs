//! Dense pixel correspondence tables between distorted and undistorted images

mod mapper;
pub mod rectify;

pub use mapper::CoordinateMapper;
pub use rectify::{init_undistort_rectify_map, pixel_grid, undistort_points};

use std::fmt;

use ndarray::Array2;

use crate::error::{LdcError, Result};

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2D {
    pub x: i64,
    pub y: i64,
}

impl Point2D {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Nearest integer pixel, halfway cases rounded away from zero
    pub fn from_rounded(x: f64, y: f64) -> Self {
        Self {
            x: x.round() as i64,
            y: y.round() as i64,
        }
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i64, i64)> for Point2D {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

/// Frame size in pixels, both sides strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDimensions {
    width: usize,
    height: usize,
}

impl FrameDimensions {
    pub fn new(width: i64, height: i64) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(LdcError::invalid(format!(
                "frame width and height must be greater than 0 (got {width}x{height})"
            )));
        }
        let width = usize::try_from(width)
            .map_err(|_| LdcError::invalid(format!("frame width {width} is too large")))?;
        let height = usize::try_from(height)
            .map_err(|_| LdcError::invalid(format!("frame height {height} is too large")))?;
        width
            .checked_mul(height)
            .ok_or_else(|| LdcError::invalid("frame pixel count overflows"))?;

        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of pixels
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Undistorted pixel -> distorted source pixel, one array per axis.
///
/// Both arrays are stored `(height, width)`, so they are indexed `[[y, x]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackwardMap {
    map_x: Array2<f32>,
    map_y: Array2<f32>,
}

impl BackwardMap {
    pub(crate) fn new(map_x: Array2<f32>, map_y: Array2<f32>) -> Self {
        debug_assert_eq!(map_x.dim(), map_y.dim());
        Self { map_x, map_y }
    }

    /// Source x coordinate for every undistorted pixel
    pub fn map_x(&self) -> &Array2<f32> {
        &self.map_x
    }

    /// Source y coordinate for every undistorted pixel
    pub fn map_y(&self) -> &Array2<f32> {
        &self.map_y
    }

    /// `(width, height)` of the covered frame
    pub fn size(&self) -> (usize, usize) {
        let (rows, cols) = self.map_x.dim();
        (cols, rows)
    }

    /// Source coordinate for undistorted pixel `(x, y)`, if inside the map
    pub fn get(&self, x: usize, y: usize) -> Option<(f32, f32)> {
        Some((*self.map_x.get([y, x])?, *self.map_y.get([y, x])?))
    }
}
