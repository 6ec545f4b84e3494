//! Lens distortion correction: camera model and precomputed pixel maps

pub mod camera;
pub mod error;
pub mod mapping;

pub use camera::{CameraModel, DistortionModel, Intrinsics, PinholeCamera, UndistortCriteria};
pub use error::{LdcError, Result};
pub use mapping::{BackwardMap, CoordinateMapper, FrameDimensions, Point2D};
