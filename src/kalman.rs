//! Constant-velocity Kalman filter for a 2D position sensor.
//!
//! State is `[px, py, vx, vy]`. The transition is constant velocity and the
//! process noise is the discretized continuous white-noise-acceleration
//! model, so all tuning concentrates into the two standard deviations
//! `sigma_a` (acceleration) and `sigma_z` (measurement).

use crate::common::linalg::{position_observation, symmetrize, Mat2, Mat4, Vec2, Vec4};
use crate::errors::TrackerError;

/// Constant-velocity Kalman filter over a 4-state, 2D-position model.
#[derive(Debug, Clone)]
pub struct KalmanCv2d {
    /// State estimate [px, py, vx, vy]
    pub x: Vec4,
    /// State covariance, kept symmetric positive-definite
    pub p: Mat4,
    /// Step length in seconds
    pub dt: f64,
    /// Process noise acceleration standard deviation
    pub sigma_a: f64,
    /// Measurement noise standard deviation (position)
    pub sigma_z: f64,
}

impl KalmanCv2d {
    /// Create a filter with zero state and identity covariance.
    pub fn new(dt: f64, sigma_a: f64, sigma_z: f64) -> Self {
        Self {
            x: Vec4::zeros(),
            p: Mat4::identity(),
            dt,
            sigma_a,
            sigma_z,
        }
    }

    /// Advance the state by one step of the constant-velocity transition
    /// and add the discretized process noise.
    pub fn predict(&mut self) {
        let mut f = Mat4::identity();
        f[(0, 2)] = self.dt;
        f[(1, 3)] = self.dt;

        let dt2 = self.dt * self.dt;
        let dt3 = dt2 * self.dt;
        let dt4 = dt2 * dt2;
        let q_a = self.sigma_a * self.sigma_a;

        let mut q = Mat4::zeros();
        q[(0, 0)] = dt4 / 4.0 * q_a;
        q[(0, 2)] = dt3 / 2.0 * q_a;
        q[(1, 1)] = dt4 / 4.0 * q_a;
        q[(1, 3)] = dt3 / 2.0 * q_a;
        q[(2, 0)] = dt3 / 2.0 * q_a;
        q[(2, 2)] = dt2 * q_a;
        q[(3, 1)] = dt3 / 2.0 * q_a;
        q[(3, 3)] = dt2 * q_a;

        self.x = f * self.x;
        self.p = f * self.p * f.transpose() + q;
    }

    /// Fold a position measurement into the state.
    ///
    /// Returns the innovation `y = z - H*x` and its covariance
    /// `S = H*P*H' + R` so callers can log residuals. A singular `S` is an
    /// arithmetic pathology (it cannot happen for `sigma_z > 0`) and is
    /// surfaced rather than masked.
    pub fn update(&mut self, z: &Vec2) -> Result<(Vec2, Mat2), TrackerError> {
        let h = position_observation();
        let r = Mat2::identity() * (self.sigma_z * self.sigma_z);

        let y = z - h * self.x;
        let s = h * self.p * h.transpose() + r;

        let s_inv = s
            .try_inverse()
            .ok_or(TrackerError::SingularInnovationCovariance)?;

        let k = self.p * h.transpose() * s_inv;

        self.x += k * y;
        self.p = (Mat4::identity() - k * h) * self.p;
        self.p = symmetrize(&self.p);

        Ok((y, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_moves_position_by_velocity() {
        let mut kf = KalmanCv2d::new(0.5, 0.0, 1.0);
        kf.x = Vec4::new(1.0, 2.0, 4.0, -2.0);
        kf.predict();
        assert_eq!(kf.x, Vec4::new(3.0, 1.0, 4.0, -2.0));
    }

    #[test]
    fn test_predict_grows_position_uncertainty() {
        let mut kf = KalmanCv2d::new(0.1, 1.5, 3.0);
        let before = kf.p[(0, 0)];
        kf.predict();
        assert!(kf.p[(0, 0)] > before);
    }

    #[test]
    fn test_exact_measurement_round_trip() {
        // Zero process noise and a measurement equal to H*x: the update must
        // produce a zero innovation, leave x unchanged, and still contract
        // the position variances.
        let mut kf = KalmanCv2d::new(0.05, 0.0, 2.0);
        kf.x = Vec4::new(7.0, -3.0, 1.0, 0.5);
        let p00 = kf.p[(0, 0)];
        let p11 = kf.p[(1, 1)];

        let z = Vec2::new(7.0, -3.0);
        let (y, s) = kf.update(&z).unwrap();

        assert_eq!(y, Vec2::zeros());
        assert_eq!(kf.x, Vec4::new(7.0, -3.0, 1.0, 0.5));
        assert!(kf.p[(0, 0)] < p00);
        assert!(kf.p[(1, 1)] < p11);
        assert!(s[(0, 0)] > 0.0 && s[(1, 1)] > 0.0);
    }

    #[test]
    fn test_update_pulls_state_toward_measurement() {
        let mut kf = KalmanCv2d::new(0.05, 1.5, 3.0);
        kf.x = Vec4::new(0.0, 0.0, 0.0, 0.0);
        let z = Vec2::new(10.0, 0.0);
        kf.update(&z).unwrap();
        assert!(kf.x[0] > 0.0 && kf.x[0] < 10.0);
        assert_eq!(kf.x[1], 0.0);
    }

    #[test]
    fn test_singular_innovation_covariance_is_an_error() {
        // Zero measurement noise and a zero covariance make S exactly zero.
        let mut kf = KalmanCv2d::new(0.05, 0.0, 0.0);
        kf.x = Vec4::new(1.0, 2.0, 0.0, 0.0);
        kf.p = Mat4::zeros();

        assert_eq!(
            kf.update(&Vec2::new(1.0, 2.0)),
            Err(TrackerError::SingularInnovationCovariance)
        );
    }

    #[test]
    fn test_covariance_stays_symmetric() {
        let mut kf = KalmanCv2d::new(0.05, 1.5, 3.0);
        for i in 0..50 {
            kf.predict();
            kf.update(&Vec2::new(i as f64 * 0.3, -(i as f64) * 0.1))
                .unwrap();
        }
        assert_eq!(kf.p, kf.p.transpose());
    }
}
