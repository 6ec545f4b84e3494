//! Camera models and projections

mod distortion;
mod intrinsics;
mod pinhole;

pub use distortion::{DistortionModel, UndistortCriteria};
pub use intrinsics::Intrinsics;
pub use pinhole::PinholeCamera;

use nalgebra::Vector3;

/// Generic CameraModel
pub trait CameraModel {
    /// Project 3D point in camera frame to (distorted) image coordinates
    /// Returns None if point is behind camera
    fn project(&self, point_camera: &Vector3<f64>) -> Option<(f64, f64)>;

    /// Unproject (distorted) image coordinates to a ray `[x, y, 1]` on the
    /// normalized image plane
    fn unproject(&self, pixel: (f64, f64)) -> Vector3<f64>;

    /// Intrinsic matrix used for both distorted and undistorted pixels
    fn intrinsics(&self) -> &Intrinsics;

    /// Undistorted pixel to its location in the distorted image
    fn distort_pixel(&self, pixel: (f64, f64)) -> (f64, f64) {
        let (x, y) = self.intrinsics().pixel_to_normalized(pixel);
        // z = 1 is always in front of the camera
        self.project(&Vector3::new(x, y, 1.0)).unwrap_or(pixel)
    }

    /// Distorted pixel to its location in the undistorted image
    fn undistort_pixel(&self, pixel: (f64, f64)) -> (f64, f64) {
        let ray = self.unproject(pixel);
        self.intrinsics()
            .normalized_to_pixel((ray.x / ray.z, ray.y / ray.z))
    }
}
