//! Fixed-size linear algebra aliases and helpers.
//!
//! The state and measurement dimensions are fixed (4-state constant-velocity
//! model observed by a 2D position sensor), so everything uses nalgebra's
//! statically sized types.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Matrix4x2, Vector2, Vector4};

/// 2D measurement-space vector
pub type Vec2 = Vector2<f64>;
/// 4D state-space vector [px, py, vx, vy]
pub type Vec4 = Vector4<f64>;
/// 2x2 measurement-space matrix
pub type Mat2 = Matrix2<f64>;
/// 4x4 state-space matrix
pub type Mat4 = Matrix4<f64>;
/// Observation matrix shape (measurement rows x state columns)
pub type Mat2x4 = Matrix2x4<f64>;
/// Gain matrix shape (state rows x measurement columns)
pub type Mat4x2 = Matrix4x2<f64>;

/// Observation matrix selecting position from the state
pub fn position_observation() -> Mat2x4 {
    let mut h = Mat2x4::zeros();
    h[(0, 0)] = 1.0;
    h[(1, 1)] = 1.0;
    h
}

/// Make a matrix symmetric by averaging with its transpose.
///
/// The Kalman covariance is maintained symmetric positive-definite; this
/// removes the asymmetry that accumulates from floating-point products.
pub fn symmetrize(m: &Mat4) -> Mat4 {
    0.5 * (m + m.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_observation_selects_position() {
        let h = position_observation();
        let x = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let z = h * x;
        assert_eq!(z, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_symmetrize() {
        let mut m = Mat4::identity();
        m[(0, 1)] = 1.0;
        let s = symmetrize(&m);
        assert_eq!(s[(0, 1)], 0.5);
        assert_eq!(s[(1, 0)], 0.5);
        assert_eq!(s, s.transpose());
    }
}
