//! Affine matrices used to place a sweep profile at an axis station.

use super::{Matrix4, Point3, Vector3, TOLERANCE};

/// Builds a 4x4 rotation matrix around an axis through the origin (Rodrigues).
///
/// The axis does not need to be normalised. A zero-length axis yields the
/// identity.
#[allow(clippy::many_single_char_names)]
#[must_use]
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let len = axis.norm();
    if len < TOLERANCE {
        return Matrix4::identity();
    }
    let axis = axis / len;

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}

/// Builds `Translate(center) · Rotate(angle, axis) · Scale(scale)`.
#[must_use]
pub fn station_matrix(center: &Point3, axis: &Vector3, angle: f64, scale: &Vector3) -> Matrix4 {
    let t = Matrix4::new_translation(&center.coords);
    let r = rotation_matrix(axis, angle);
    let s = Matrix4::new_nonuniform_scaling(scale);
    t * r * s
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}
