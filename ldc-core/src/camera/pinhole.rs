use super::{
    CameraModel,
    distortion::{DistortionModel, UndistortCriteria},
    intrinsics::Intrinsics,
};
use crate::error::Result;
use nalgebra::Vector3;

/// Pinhole camera with lens distortion.
///
/// The camera is its own rectified target: undistorted pixels are expressed
/// with the same intrinsic matrix as the distorted ones.
#[derive(Debug, Clone, PartialEq)]
pub struct PinholeCamera {
    intrinsics: Intrinsics,
    distortion: DistortionModel,
    criteria: UndistortCriteria,
}

impl PinholeCamera {
    pub fn new(intrinsics: Intrinsics, distortion: DistortionModel) -> Self {
        Self {
            intrinsics,
            distortion,
            criteria: UndistortCriteria::default(),
        }
    }

    /// Create a camera from a row-major intrinsic matrix and a coefficient vector
    pub fn from_parts(intrinsic_matrix: [[f64; 3]; 3], distortion: &[f64]) -> Result<Self> {
        Ok(Self::new(
            Intrinsics::from_rows(intrinsic_matrix)?,
            DistortionModel::from_coefficients(distortion)?,
        ))
    }

    /// Create a new pinhole camera with no distortion
    pub fn new_ideal(fx: f64, fy: f64, cx: f64, cy: f64) -> Result<Self> {
        Ok(Self::new(Intrinsics::new(fx, fy, cx, cy)?, DistortionModel::None))
    }

    /// Replace the undistortion termination criteria
    pub fn with_criteria(mut self, criteria: UndistortCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn distortion(&self) -> &DistortionModel {
        &self.distortion
    }

    pub fn criteria(&self) -> &UndistortCriteria {
        &self.criteria
    }
}

impl CameraModel for PinholeCamera {
    fn project(&self, point_camera: &Vector3<f64>) -> Option<(f64, f64)> {
        if point_camera.z <= 0.0 {
            return None;
        }

        // Normalized coordinates
        let x_norm = point_camera.x / point_camera.z;
        let y_norm = point_camera.y / point_camera.z;

        // Apply distortion
        let (x_dist, y_dist) = self.distortion.distort(x_norm, y_norm);

        Some(self.intrinsics.normalized_to_pixel((x_dist, y_dist)))
    }

    fn unproject(&self, pixel: (f64, f64)) -> Vector3<f64> {
        let (x_dist, y_dist) = self.intrinsics.pixel_to_normalized(pixel);

        // Remove distortion
        let (x_norm, y_norm) = self.distortion.undistort(x_dist, y_dist, &self.criteria);

        Vector3::new(x_norm, y_norm, 1.0)
    }

    fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_camera() -> PinholeCamera {
        PinholeCamera::from_parts(
            [
                [2121.681721718232, 0.0, 1895.012004804072],
                [0.0, 2117.549237622574, 1050.755447331050],
                [0.0, 0.0, 1.0],
            ],
            &[-0.03609522335233882, -0.02746143827407117, 0.0003257971946657707, 0.001718441290499934, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_pinhole_ideal_projection() {
        let camera = PinholeCamera::new_ideal(1000.0, 1000.0, 960.0, 540.0).unwrap();

        let point = Vector3::new(0.0, 0.0, 1.0);
        let pixel = camera.project(&point).unwrap();
        assert!((pixel.0 - 960.0).abs() < 1e-6);
        assert!((pixel.1 - 540.0).abs() < 1e-6);
    }

    #[test]
    fn test_pinhole_ideal_offset_projection() {
        let camera = PinholeCamera::new_ideal(1000.0, 1000.0, 960.0, 540.0).unwrap();

        let point = Vector3::new(0.5, 0.3, 1.0);
        let pixel = camera.project(&point).unwrap();
        assert!((pixel.0 - 1460.0).abs() < 1e-6); // 960 + 1000 * 0.5
        assert!((pixel.1 - 840.0).abs() < 1e-6); // 540 + 1000 * 0.3
    }

    #[test]
    fn test_pinhole_behind_camera() {
        let camera = PinholeCamera::new_ideal(1000.0, 1000.0, 960.0, 540.0).unwrap();
        assert!(camera.project(&Vector3::new(0.0, 0.0, -1.0)).is_none());
        assert!(camera.project(&Vector3::new(0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_pinhole_roundtrip() {
        let camera = demo_camera().with_criteria(UndistortCriteria {
            max_iters: 50,
            eps: Some(1e-12),
        });

        let point = Vector3::new(-0.4, 0.3, 2.0);
        let pixel = camera.project(&point).unwrap();
        let ray = camera.unproject(pixel);

        let dot = ray.normalize().dot(&point.normalize());
        assert!((dot - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_principal_point_is_fixed() {
        let camera = demo_camera();
        let (cx, cy) = camera.intrinsics().principal_point();
        let (u, v) = camera.distort_pixel((cx, cy));
        assert!((u - cx).abs() < 1e-9);
        assert!((v - cy).abs() < 1e-9);
    }

    #[test]
    fn test_demo_corners_undistort() {
        let camera = demo_camera();
        let (u, v) = camera.undistort_pixel((765.0, 567.0));
        assert_eq!((u.round(), v.round()), (743.0, 558.0));
        let (u, v) = camera.undistort_pixel((1056.0, 931.0));
        assert_eq!((u.round(), v.round()), (1049.0, 930.0));
    }

    #[test]
    fn test_distort_inverts_undistort() {
        let camera = demo_camera();
        let (u, v) = camera.undistort_pixel((765.0, 567.0));
        let (x, y) = camera.distort_pixel((u, v));
        assert!((x - 765.0).abs() < 0.05);
        assert!((y - 567.0).abs() < 0.05);
    }

    #[test]
    fn test_from_parts_rejects_bad_coefficients() {
        let res = PinholeCamera::from_parts(
            [[1000.0, 0.0, 960.0], [0.0, 1000.0, 540.0], [0.0, 0.0, 1.0]],
            &[0.1, 0.2, 0.3],
        );
        assert!(res.is_err());
    }
}
