use crate::error::{LdcError, Result};

/// Lens distortion in normalized image coordinates.
///
/// Coefficients follow the usual vision-library ordering
/// `(k1, k2, p1, p2[, k3[, k4, k5, k6]])`.
#[derive(Debug, Clone, PartialEq)]
pub enum DistortionModel {
    None,
    BrownConrady {
        k1: f64,
        k2: f64,
        k3: f64,
        p1: f64,
        p2: f64,
    },
    /// Brown-Conrady with a rational radial term
    Rational {
        k1: f64,
        k2: f64,
        k3: f64,
        k4: f64,
        k5: f64,
        k6: f64,
        p1: f64,
        p2: f64,
    },
}

/// Termination settings for iterative undistortion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndistortCriteria {
    /// Fixed-point iterations to run at most.
    pub max_iters: usize,
    /// Stop early once the re-distorted point is within this distance of the
    /// input, in normalized image units. `None` always runs `max_iters`.
    pub eps: Option<f64>,
}

impl Default for UndistortCriteria {
    fn default() -> Self {
        Self {
            max_iters: 5,
            eps: None,
        }
    }
}

impl DistortionModel {
    /// Build from a coefficient vector of length 4, 5 or 8
    pub fn from_coefficients(coeffs: &[f64]) -> Result<Self> {
        if let Some(bad) = coeffs.iter().find(|c| !c.is_finite()) {
            return Err(LdcError::invalid(format!(
                "distortion coefficient {bad} is not finite"
            )));
        }

        match *coeffs {
            [k1, k2, p1, p2] => Ok(DistortionModel::BrownConrady {
                k1,
                k2,
                k3: 0.0,
                p1,
                p2,
            }),
            [k1, k2, p1, p2, k3] => Ok(DistortionModel::BrownConrady { k1, k2, k3, p1, p2 }),
            [k1, k2, p1, p2, k3, k4, k5, k6] => Ok(DistortionModel::Rational {
                k1,
                k2,
                k3,
                k4,
                k5,
                k6,
                p1,
                p2,
            }),
            _ => Err(LdcError::invalid(format!(
                "expected 4, 5 or 8 distortion coefficients, got {}",
                coeffs.len()
            ))),
        }
    }

    /// No distortion
    pub fn none() -> Self {
        DistortionModel::None
    }

    /// Coefficients in `(k1, k2, p1, p2, k3, ...)` order
    pub fn coefficients(&self) -> Vec<f64> {
        match *self {
            DistortionModel::None => Vec::new(),
            DistortionModel::BrownConrady { k1, k2, k3, p1, p2 } => vec![k1, k2, p1, p2, k3],
            DistortionModel::Rational {
                k1,
                k2,
                k3,
                k4,
                k5,
                k6,
                p1,
                p2,
            } => vec![k1, k2, p1, p2, k3, k4, k5, k6],
        }
    }

    /// True when distortion leaves every point in place
    pub fn is_identity(&self) -> bool {
        self.coefficients().iter().all(|c| *c == 0.0)
    }

    /// Radial numerator/denominator and tangential offsets at `(x, y)`
    fn terms(&self, x: f64, y: f64) -> (f64, f64, f64, f64) {
        let (k1, k2, k3, k4, k5, k6, p1, p2) = match *self {
            DistortionModel::None => return (1.0, 1.0, 0.0, 0.0),
            DistortionModel::BrownConrady { k1, k2, k3, p1, p2 } => {
                (k1, k2, k3, 0.0, 0.0, 0.0, p1, p2)
            }
            DistortionModel::Rational {
                k1,
                k2,
                k3,
                k4,
                k5,
                k6,
                p1,
                p2,
            } => (k1, k2, k3, k4, k5, k6, p1, p2),
        };

        let r2 = x * x + y * y;
        let num = 1.0 + ((k3 * r2 + k2) * r2 + k1) * r2;
        let den = 1.0 + ((k6 * r2 + k5) * r2 + k4) * r2;
        let dx = 2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x);
        let dy = p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y;
        (num, den, dx, dy)
    }

    /// Apply distortion to normalized image coordinates
    pub fn distort(&self, x_norm: f64, y_norm: f64) -> (f64, f64) {
        if let DistortionModel::None = self {
            return (x_norm, y_norm);
        }
        let (num, den, dx, dy) = self.terms(x_norm, y_norm);
        let radial = num / den;
        (x_norm * radial + dx, y_norm * radial + dy)
    }

    /// Remove distortion from normalized image coordinates.
    ///
    /// Fixed-point iteration `x = (x_d - tangential(x)) / radial(x)`. When the
    /// radial factor turns negative the model is outside its valid range and
    /// the distorted input is returned unchanged.
    pub fn undistort(&self, x_dist: f64, y_dist: f64, criteria: &UndistortCriteria) -> (f64, f64) {
        if let DistortionModel::None = self {
            return (x_dist, y_dist);
        }

        let mut x = x_dist;
        let mut y = y_dist;

        for _ in 0..criteria.max_iters {
            let (num, den, dx, dy) = self.terms(x, y);
            let inv_radial = den / num;
            if inv_radial < 0.0 || !inv_radial.is_finite() {
                return (x_dist, y_dist);
            }

            x = (x_dist - dx) * inv_radial;
            y = (y_dist - dy) * inv_radial;

            if let Some(eps) = criteria.eps {
                let (xd, yd) = self.distort(x, y);
                if ((xd - x_dist).powi(2) + (yd - y_dist).powi(2)).sqrt() < eps {
                    break;
                }
            }
        }

        (x, y)
    }
}
