/// Rotation matrices and vector helpers used by the transform stack
use nalgebra::{Matrix3, Vector3};

/// An orthonormal 3x3 rotation matrix
pub type RotationMatrix = Matrix3<f64>;

/// Rotation about the X axis (pitch), angle in radians
pub fn rx(angle: f64) -> RotationMatrix {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, c, -s, //
        0.0, s, c,
    )
}

/// Rotation about the Y axis (yaw), angle in radians
pub fn ry(angle: f64) -> RotationMatrix {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, 0.0, s, //
        0.0, 1.0, 0.0, //
        -s, 0.0, c,
    )
}

/// Rotation about the Z axis (roll), angle in radians
pub fn rz(angle: f64) -> RotationMatrix {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Build a rotation matrix from angles in degrees.
///
/// The product is taken as `Rx * (Rz * Ry)`. Every transform stored on the
/// stack is expressed in this order, so it must not be swapped for the usual
/// yaw-pitch-roll composition.
pub fn rotation_matrix(pitch: f64, yaw: f64, roll: f64) -> RotationMatrix {
    let pitch = pitch.to_radians();
    let yaw = yaw.to_radians();
    let roll = roll.to_radians();

    multiply(&rx(pitch), &multiply(&rz(roll), &ry(yaw)))
}

pub fn multiply(a: &RotationMatrix, b: &RotationMatrix) -> RotationMatrix {
    a * b
}

/// Inverse of a rotation matrix (valid only because it is orthonormal)
pub fn transpose(m: &RotationMatrix) -> RotationMatrix {
    m.transpose()
}

pub fn transform_point(point: &Vector3<f64>, m: &RotationMatrix) -> Vector3<f64> {
    m * point
}

pub fn add(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a + b
}
