use nalgebra::{Matrix3, Vector3};

use crate::error::{LdcError, Result};

/// Pinhole intrinsic matrix `K`
///
/// ```text
/// | fx  s  cx |
/// |  0  fy cy |
/// |  0  0  1  |
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Intrinsics {
    k: Matrix3<f64>,
    k_inv: Matrix3<f64>,
}

impl Intrinsics {
    /// Validate and wrap a 3x3 intrinsic matrix
    pub fn from_matrix(k: Matrix3<f64>) -> Result<Self> {
        if k.iter().any(|v| !v.is_finite()) {
            return Err(LdcError::invalid("intrinsic matrix contains non-finite entries"));
        }
        if k[(0, 0)] <= 0.0 || k[(1, 1)] <= 0.0 {
            return Err(LdcError::invalid(format!(
                "focal lengths must be positive (fx={}, fy={})",
                k[(0, 0)],
                k[(1, 1)]
            )));
        }
        if k[(1, 0)] != 0.0 || k[(2, 0)] != 0.0 || k[(2, 1)] != 0.0 || k[(2, 2)] != 1.0 {
            return Err(LdcError::invalid(
                "intrinsic matrix must be upper triangular with K[2][2] = 1",
            ));
        }

        let k_inv = k
            .try_inverse()
            .ok_or_else(|| LdcError::invalid("intrinsic matrix is singular"))?;

        Ok(Self { k, k_inv })
    }

    /// Build from row-major entries
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self> {
        Self::from_matrix(Matrix3::from_fn(|r, c| rows[r][c]))
    }

    /// Skew-free intrinsics from focal lengths and principal point
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self> {
        Self::from_rows([[fx, 0.0, cx], [0.0, fy, cy], [0.0, 0.0, 1.0]])
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.k
    }

    /// Get focal lengths
    pub fn focal_length(&self) -> (f64, f64) {
        (self.k[(0, 0)], self.k[(1, 1)])
    }

    /// Get principal point
    pub fn principal_point(&self) -> (f64, f64) {
        (self.k[(0, 2)], self.k[(1, 2)])
    }

    /// Pixel coordinates to normalized image-plane coordinates (`K^-1 * [u v 1]`)
    pub fn pixel_to_normalized(&self, pixel: (f64, f64)) -> (f64, f64) {
        let n = self.k_inv * Vector3::new(pixel.0, pixel.1, 1.0);
        (n.x / n.z, n.y / n.z)
    }

    /// Normalized image-plane coordinates to pixel coordinates (`K * [x y 1]`)
    pub fn normalized_to_pixel(&self, normalized: (f64, f64)) -> (f64, f64) {
        let p = self.k * Vector3::new(normalized.0, normalized.1, 1.0);
        (p.x / p.z, p.y / p.z)
    }
}
