//! Camera and demo settings loaded from JSON

use std::fs;
use std::path::Path;

use ldc_core::{PinholeCamera, Point2D, UndistortCriteria};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Frame size in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FrameConfig {
    pub width: i64,
    pub height: i64,
}

/// Intrinsic matrix (row-major) and distortion coefficients `(k1, k2, p1, p2[, k3[, k4, k5, k6]])`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    pub intrinsic_matrix: [[f64; 3]; 3],
    pub distortion: Vec<f64>,
}

/// Iterative undistortion settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CriteriaConfig {
    pub max_iters: usize,
    #[serde(default)]
    pub eps: Option<f64>,
}

impl From<CriteriaConfig> for UndistortCriteria {
    fn from(c: CriteriaConfig) -> Self {
        UndistortCriteria {
            max_iters: c.max_iters,
            eps: c.eps,
        }
    }
}

/// Two opposite corners of the calibration rectangle in the distorted image
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CalibrationConfig {
    pub first: [i64; 2],
    pub second: [i64; 2],
}

impl CalibrationConfig {
    pub fn corners(&self) -> (Point2D, Point2D) {
        (
            Point2D::new(self.first[0], self.first[1]),
            Point2D::new(self.second[0], self.second[1]),
        )
    }
}

/// Everything the demo driver needs besides image paths
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoConfig {
    pub frame: FrameConfig,
    pub camera: CameraConfig,
    #[serde(default)]
    pub criteria: Option<CriteriaConfig>,
    pub calibration: CalibrationConfig,
    /// Undistorted points to map back for the round-trip check
    #[serde(default)]
    pub verification: Vec<[i64; 2]>,
}

impl DemoConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Validated camera model
    pub fn camera(&self) -> Result<PinholeCamera> {
        let camera = PinholeCamera::from_parts(self.camera.intrinsic_matrix, &self.camera.distortion)?;
        Ok(match self.criteria {
            Some(c) => camera.with_criteria(c.into()),
            None => camera,
        })
    }

    pub fn verification_points(&self) -> Vec<Point2D> {
        self.verification
            .iter()
            .map(|p| Point2D::new(p[0], p[1]))
            .collect()
    }
}
