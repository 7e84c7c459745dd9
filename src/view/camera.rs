use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8, TAU};

use nalgebra::{Isometry3, Perspective3};

use crate::geometry::Curve;
use crate::math::transform::{rotation_matrix, transform_point};
use crate::math::{normalize_or_zero, Matrix4, Point2, Point3, Vector3, TOLERANCE};

/// Largest polar angle magnitude; keeps the eye off the world up axis.
pub const THETA_LIMIT: f64 = FRAC_PI_2 - 1e-4;

/// Smallest orbit radius reachable by zooming.
pub const MIN_RADIUS: f64 = 0.1;

/// Half of the vertical field of view used for the drawing plane.
pub const HALF_FOV: f64 = FRAC_PI_8;

const NEAR: f64 = 0.01;
const FAR: f64 = 1000.0;

/// Which up vector orients profiles at an axis station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpMode {
    /// The fixed world `+Y`.
    #[default]
    World,
    /// The camera's screen-up, perpendicular to the view direction.
    Orbit,
}

/// A spherical orbit camera around the origin.
///
/// Besides driving the view, the frame is the coordinate system strokes are
/// drawn in: cursor positions unproject onto the plane through the origin
/// perpendicular to the view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    theta: f64,
    phi: f64,
    radius: f64,
    is_fixed: bool,
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self::new(FRAC_PI_4, FRAC_PI_4, 3.0)
    }
}

impl CameraFrame {
    /// Creates a frame, clamping `theta` and `radius` and wrapping `phi`.
    #[must_use]
    pub fn new(theta: f64, phi: f64, radius: f64) -> Self {
        Self {
            theta: theta.clamp(-THETA_LIMIT, THETA_LIMIT),
            phi: phi.rem_euclid(TAU),
            radius: radius.max(MIN_RADIUS),
            is_fixed: false,
        }
    }

    #[must_use]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    #[must_use]
    pub fn phi(&self) -> f64 {
        self.phi
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    /// Freezes orbit and zoom, e.g. while a stroke is being drawn.
    pub fn fix(&mut self) {
        self.is_fixed = true;
    }

    pub fn unfix(&mut self) {
        self.is_fixed = false;
    }

    pub fn set_fixed(&mut self, fixed: bool) {
        self.is_fixed = fixed;
    }

    /// `radius * (cos θ sin φ, sin θ, cos θ cos φ)`.
    #[must_use]
    pub fn eye_position(&self) -> Point3 {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        Point3::new(ct * sp, st, ct * cp) * self.radius
    }

    /// Unit vector from the eye towards the origin.
    #[must_use]
    pub fn view_direction(&self) -> Vector3 {
        -normalize_or_zero(&self.eye_position().coords)
    }

    /// The world up vector used by the view matrix.
    #[must_use]
    pub fn up(&self) -> Vector3 {
        Vector3::y()
    }

    /// Screen-up: `normalize(-sin φ sin θ, cos θ, -cos φ sin θ)`.
    #[must_use]
    pub fn orbit_up(&self) -> Vector3 {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        normalize_or_zero(&Vector3::new(-sp * st, ct, -cp * st))
    }

    /// Returns the up vector selected by `mode`.
    #[must_use]
    pub fn up_for(&self, mode: UpMode) -> Vector3 {
        match mode {
            UpMode::World => self.up(),
            UpMode::Orbit => self.orbit_up(),
        }
    }

    /// `1 - |normalize(eye)|` per component: 1 on axes lying in the view
    /// plane of an axis-aligned view, 0 along the view axis.
    #[must_use]
    pub fn drawing_plane_mask(&self) -> Vector3 {
        Vector3::repeat(1.0) - normalize_or_zero(&self.eye_position().coords).abs()
    }

    /// World-to-view isometry looking from the eye at the origin.
    #[must_use]
    pub fn view_isometry(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.eye_position(), &Point3::origin(), &self.up())
    }

    /// `look_at(eye, origin, world up)` as a matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Matrix4 {
        self.view_isometry().to_homogeneous()
    }

    /// Perspective projection with a 45° vertical field of view.
    #[must_use]
    pub fn projection(&self, aspect: f64) -> Matrix4 {
        Perspective3::new(aspect.max(TOLERANCE), 2.0 * HALF_FOV, NEAR, FAR).to_homogeneous()
    }

    /// Maps a world point into view space.
    #[must_use]
    pub fn to_view(&self, point: &Point3) -> Point3 {
        self.view_isometry().transform_point(point)
    }

    /// Maps a view-space point back into world space.
    #[must_use]
    pub fn from_view(&self, point: &Point3) -> Point3 {
        self.view_isometry().inverse_transform_point(point)
    }

    /// Unprojects normalised device coordinates onto the drawing plane at
    /// distance `radius` from the eye.
    #[must_use]
    pub fn screen_to_world(&self, ndc: &Point2) -> Point3 {
        let extent = HALF_FOV.tan() * self.radius;
        self.from_view(&Point3::new(ndc.x * extent, ndc.y * extent, -self.radius))
    }

    /// Projects a world point to normalised device coordinates.
    ///
    /// Returns `None` for points on or behind the eye plane.
    #[must_use]
    pub fn world_to_screen(&self, point: &Point3) -> Option<Point2> {
        let v = self.to_view(point);
        let depth = -v.z;
        if depth < TOLERANCE {
            return None;
        }
        let extent = HALF_FOV.tan() * depth;
        Some(Point2::new(v.x / extent, v.y / extent))
    }

    /// The default sweep profile: `n` points on a unit circle centred at the
    /// origin, lying in the plane spanned by screen-up and the view direction.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn unit_circle(&self, n: usize) -> Curve {
        let quarter_turn = rotation_matrix(&self.orbit_up(), FRAC_PI_2);
        let points = (0..n)
            .map(|i| {
                let angle = i as f64 * TAU / n as f64;
                let (s, c) = angle.sin_cos();
                let on_plane = self.from_view(&Point3::new(c, s, -self.radius));
                transform_point(&quarter_turn, &on_plane)
            })
            .collect();
        Curve::new(points)
    }

    /// Orbits by the given angle deltas. No-op while fixed.
    pub fn orbit(&mut self, d_theta: f64, d_phi: f64) {
        if self.is_fixed {
            return;
        }
        self.theta = (self.theta + d_theta).clamp(-THETA_LIMIT, THETA_LIMIT);
        self.phi = (self.phi + d_phi).rem_euclid(TAU);
    }

    /// Moves the eye towards the origin by `d_radius`. No-op while fixed.
    pub fn zoom(&mut self, d_radius: f64) {
        if self.is_fixed {
            return;
        }
        self.radius = (self.radius - d_radius).max(MIN_RADIUS);
    }

    /// Looks down `-Z` at the XY plane.
    pub fn view_xy(&mut self) {
        self.theta = 0.0;
        self.phi = 0.0;
    }

    /// Looks down `-Y` at the XZ plane.
    pub fn view_xz(&mut self) {
        self.theta = THETA_LIMIT;
        self.phi = 0.0;
    }

    /// Looks down `-X` at the ZY plane.
    pub fn view_zy(&mut self) {
        self.theta = 0.0;
        self.phi = FRAC_PI_2;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn front() -> CameraFrame {
        CameraFrame::new(0.0, 0.0, 3.0)
    }

    #[test]
    fn eye_position_front_view() {
        assert_abs_diff_eq!(front().eye_position(), p(0.0, 0.0, 3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(front().view_direction(), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn orbit_up_is_perpendicular_to_view() {
        let frame = CameraFrame::new(0.6, 1.3, 4.0);
        let up = frame.orbit_up();
        assert_abs_diff_eq!(up.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(up.dot(&frame.view_direction()), 0.0, epsilon = 1e-12);
        assert!(up.y > 0.0);
    }

    #[test]
    fn screen_centre_maps_to_origin() {
        let frame = CameraFrame::new(0.4, 2.0, 5.0);
        let w = frame.screen_to_world(&Point2::origin());
        assert_abs_diff_eq!(w, Point3::origin(), epsilon = 1e-9);
    }

    #[test]
    fn screen_edge_uses_half_fov() {
        let w = front().screen_to_world(&Point2::new(0.0, 1.0));
        assert_abs_diff_eq!(w, p(0.0, 3.0 * HALF_FOV.tan(), 0.0), epsilon = 1e-9);
    }

    #[test]
    fn screen_round_trip() {
        let frame = CameraFrame::new(-0.3, 5.0, 2.5);
        let ndc = Point2::new(0.25, -0.7);
        let back = frame.world_to_screen(&frame.screen_to_world(&ndc)).unwrap();
        assert_abs_diff_eq!(back, ndc, epsilon = 1e-9);
    }

    #[test]
    fn point_behind_eye_has_no_projection() {
        assert!(front().world_to_screen(&p(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn orbit_clamps_theta_and_wraps_phi() {
        let mut frame = front();
        frame.orbit(10.0, -0.5);
        assert_abs_diff_eq!(frame.theta(), THETA_LIMIT);
        assert!(frame.phi() >= 0.0 && frame.phi() < TAU);
        assert_abs_diff_eq!(frame.phi(), TAU - 0.5, epsilon = 1e-12);
    }

    #[test]
    fn fixed_frame_ignores_orbit_and_zoom() {
        let mut frame = front();
        frame.fix();
        frame.orbit(0.3, 0.3);
        frame.zoom(1.0);
        assert_eq!(frame.theta(), 0.0);
        assert_eq!(frame.radius(), 3.0);
        frame.unfix();
        frame.zoom(1.0);
        assert_abs_diff_eq!(frame.radius(), 2.0);
    }

    #[test]
    fn zoom_keeps_radius_positive() {
        let mut frame = front();
        frame.zoom(100.0);
        assert_abs_diff_eq!(frame.radius(), MIN_RADIUS);
    }

    #[test]
    fn unit_circle_faces_along_view() {
        let frame = CameraFrame::new(0.3, 0.8, 3.0);
        let circle = frame.unit_circle(16);
        assert_eq!(circle.len(), 16);
        // Plane normal is the horizontal screen direction.
        let right = frame.view_direction().cross(&frame.orbit_up());
        for q in circle.points() {
            assert_abs_diff_eq!(q.coords.norm(), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(q.coords.dot(&right), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn drawing_plane_mask_for_front_view() {
        assert_abs_diff_eq!(front().drawing_plane_mask(), Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let frame = CameraFrame::new(0.3, 1.1, 4.0);
        let eye = transform_point(&frame.view_matrix(), &frame.eye_position());
        assert_abs_diff_eq!(eye, Point3::origin(), epsilon = 1e-9);
        let target = transform_point(&frame.view_matrix(), &Point3::origin());
        assert_abs_diff_eq!(target, p(0.0, 0.0, -4.0), epsilon = 1e-9);
    }

    #[test]
    fn projection_keeps_view_centre() {
        let frame = front();
        let clip = frame.projection(1.5) * frame.view_matrix() * nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(clip.x / clip.w, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(clip.y / clip.w, 0.0, epsilon = 1e-12);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn view_presets() {
        let mut frame = CameraFrame::default();
        frame.view_zy();
        assert_abs_diff_eq!(frame.view_direction(), -Vector3::x(), epsilon = 1e-9);
        frame.view_xz();
        assert!(frame.view_direction().y < -0.999);
        frame.view_xy();
        assert_abs_diff_eq!(frame.view_direction(), -Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn up_modes_agree_for_level_view() {
        let frame = front();
        assert_abs_diff_eq!(frame.up_for(UpMode::World), frame.up_for(UpMode::Orbit), epsilon = 1e-12);
    }
}
