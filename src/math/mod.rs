pub mod transform;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `v / |v|`, or the zero vector when `v` is shorter than [`TOLERANCE`].
#[must_use]
pub fn normalize_or_zero(v: &Vector3) -> Vector3 {
    v.try_normalize(TOLERANCE).unwrap_or_else(Vector3::zeros)
}

/// Signed angle from `x` to `y`, measured around `reference`.
///
/// Both inputs are expected to be unit length. The magnitude is the
/// unsigned angle between them; the sign is negative when `x × y` points
/// away from `reference`.
#[must_use]
pub fn oriented_angle(x: &Vector3, y: &Vector3, reference: &Vector3) -> f64 {
    let angle = x.dot(y).clamp(-1.0, 1.0).acos();
    if reference.dot(&x.cross(y)) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Component-wise midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(
        f64::midpoint(a.x, b.x),
        f64::midpoint(a.y, b.y),
        f64::midpoint(a.z, b.z),
    )
}
