use crate::error::{OperationError, Result};
use crate::geometry::Curve;
use crate::math::{midpoint, normalize_or_zero, oriented_angle, Point3, Vector3, TOLERANCE};
use crate::view::{CameraFrame, UpMode};

/// Reverses `a` and/or `b` so that `a[0]` corresponds to `b[0]`.
///
/// The four endpoint pairings (start-start, start-end, end-start, end-end)
/// are compared by Euclidean distance and the first minimum wins. Empty
/// curves are left untouched.
pub fn order_lines(a: &mut Curve, b: &mut Curve) {
    let (Some(a0), Some(an), Some(b0), Some(bn)) = (a.first(), a.last(), b.first(), b.last()) else {
        return;
    };
    let distances = [
        nalgebra::distance(a0, b0),
        nalgebra::distance(a0, bn),
        nalgebra::distance(an, b0),
        nalgebra::distance(an, bn),
    ];

    let mut best = 0;
    for (i, d) in distances.iter().enumerate().skip(1) {
        if *d < distances[best] {
            best = i;
        }
    }

    match best {
        0 => {}
        1 => b.reverse(),
        2 => a.reverse(),
        _ => {
            a.reverse();
            b.reverse();
        }
    }
}

/// Per-index midpoint of two equally long curves.
///
/// # Errors
///
/// Returns an error if the curves differ in length.
pub fn center_axis(a: &Curve, b: &Curve) -> Result<Curve> {
    if a.len() != b.len() {
        return Err(OperationError::InvalidInput(format!(
            "boundary curves must have equal length, got {} and {}",
            a.len(),
            b.len()
        ))
        .into());
    }
    Ok(Curve::new(
        a.points()
            .iter()
            .zip(b.points())
            .map(|(p, q)| midpoint(p, q))
            .collect(),
    ))
}

/// Returns the point of `points` closest to `target` after masking both
/// with `mask` component-wise.
///
/// With the up vector as mask only the height along the axis counts, so a
/// station picks the pinch sample level with it.
#[must_use]
pub fn closest_masked(points: &[Point3], target: &Point3, mask: &Vector3) -> Option<Point3> {
    let masked_target = target.coords.component_mul(mask);
    points
        .iter()
        .map(|p| (p, (p.coords.component_mul(mask) - masked_target).norm()))
        .fold(None, |best: Option<(&Point3, f64)>, (p, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((p, d)),
        })
        .map(|(p, _)| *p)
}

/// Extents of a sweep profile used to normalise station scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileExtents {
    /// `|S[0] - S[R/2]|`, matched against the boundary diameter.
    pub height: f64,
    /// `|S[R/4] - S[3R/4]|`, matched against the pinch diameter.
    pub width: f64,
}

impl ProfileExtents {
    /// Minimum number of profile points for a closed ring.
    pub const MIN_POINTS: usize = 3;

    /// Measures a sweep profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile has fewer than [`Self::MIN_POINTS`]
    /// points or zero height.
    pub fn of(profile: &Curve) -> Result<Self> {
        let r = profile.len();
        if r < Self::MIN_POINTS {
            return Err(OperationError::InvalidInput(format!(
                "sweep profile needs at least {} points, got {r}",
                Self::MIN_POINTS
            ))
            .into());
        }
        let s = profile.points();
        let height = nalgebra::distance(&s[0], &s[r / 2]);
        let width = nalgebra::distance(&s[r / 4], &s[3 * r / 4]);
        if height < TOLERANCE {
            return Err(OperationError::InvalidInput("sweep profile has zero height".into()).into());
        }
        Ok(Self { height, width })
    }
}

/// Station-index range `[startDefault, startPinch, endPinch, endDefault]`.
///
/// Stations with `start_pinch <= i < end_pinch` take pinch-driven centre
/// and scale; every other station keeps the boundary-derived values. The
/// switch is discrete: no feathering happens at the range ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchRange {
    pub start_default: usize,
    pub start_pinch: usize,
    pub end_pinch: usize,
    pub end_default: usize,
}

impl PinchRange {
    /// Creates a range from its four markers.
    ///
    /// # Errors
    ///
    /// Returns an error if the markers are not non-decreasing.
    pub fn new(markers: [usize; 4]) -> Result<Self> {
        if markers.windows(2).any(|w| w[0] > w[1]) {
            return Err(OperationError::InvalidInput(format!(
                "pinch range markers must be non-decreasing, got {markers:?}"
            ))
            .into());
        }
        let [start_default, start_pinch, end_pinch, end_default] = markers;
        Ok(Self {
            start_default,
            start_pinch,
            end_pinch,
            end_default,
        })
    }

    /// Every station is pinch-driven.
    #[must_use]
    pub fn full(stations: usize) -> Self {
        Self {
            start_default: 0,
            start_pinch: 0,
            end_pinch: stations,
            end_default: stations,
        }
    }

    /// No station is pinch-driven.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start_default: 0,
            start_pinch: 0,
            end_pinch: 0,
            end_default: 0,
        }
    }

    /// Whether station `i` takes pinch values.
    #[must_use]
    pub fn contains(&self, i: usize) -> bool {
        (self.start_pinch..self.end_pinch).contains(&i)
    }
}

/// Two pinch curves, densely sampled, plus the stations they drive.
#[derive(Debug, Clone)]
pub struct PinchProfiles {
    pub first: Curve,
    pub second: Curve,
    pub range: PinchRange,
}

/// Placement of the sweep profile at one axis station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub center: Point3,
    /// Per-axis scale; uniform unless a pinch curve drives the station.
    pub scale: Vector3,
    /// Rotation about the view axis taking up onto the local diameter.
    pub theta: f64,
}

/// Output of [`ResolveStations`].
#[derive(Debug, Clone)]
pub struct StationFrames {
    /// Boundary midpoints, one per station.
    pub axis: Curve,
    pub stations: Vec<Station>,
    /// Rotation axis shared by every station (`-normalize(eye)`).
    pub view_axis: Vector3,
}

/// Resolves the axis and per-station transforms for a boundary pair.
pub struct ResolveStations {
    bound1: Curve,
    bound2: Curve,
    frame: CameraFrame,
    up_mode: UpMode,
    extents: ProfileExtents,
    pinch: Option<PinchProfiles>,
}

impl ResolveStations {
    /// Creates a new `ResolveStations` operation over two dense boundary
    /// curves sampled with the same precision.
    #[must_use]
    pub fn new(
        bound1: Curve,
        bound2: Curve,
        frame: CameraFrame,
        up_mode: UpMode,
        extents: ProfileExtents,
    ) -> Self {
        Self {
            bound1,
            bound2,
            frame,
            up_mode,
            extents,
            pinch: None,
        }
    }

    /// Blends stations inside the pinch range towards the pinch curves.
    #[must_use]
    pub fn with_pinch(mut self, pinch: Option<PinchProfiles>) -> Self {
        self.pinch = pinch;
        self
    }

    /// Orders the boundaries, then computes the axis and every station.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundaries differ in length or have fewer
    /// than two stations, or if a pinch is given with empty curves, a range
    /// past the last station, or a profile of zero width.
    pub fn execute(&self) -> Result<StationFrames> {
        let mut bound1 = self.bound1.clone();
        let mut bound2 = self.bound2.clone();
        order_lines(&mut bound1, &mut bound2);

        let axis = center_axis(&bound1, &bound2)?;
        let count = axis.len();
        if count < 2 {
            return Err(OperationError::InvalidInput(format!(
                "boundary curves need at least 2 stations, got {count}"
            ))
            .into());
        }
        self.validate_pinch(count)?;

        let up = normalize_or_zero(&self.frame.up_for(self.up_mode));
        let eye = normalize_or_zero(&self.frame.eye_position().coords);
        let view_axis = -eye;
        let depth_weight = eye.abs();
        let plane_weight = Vector3::repeat(1.0) - depth_weight;

        let stations = bound1
            .points()
            .iter()
            .zip(bound2.points())
            .zip(axis.points())
            .enumerate()
            .map(|(i, ((p1, p2), center))| {
                let diameter = p1 - p2;
                let length = diameter.norm();
                let (uniform, theta) = if length < TOLERANCE {
                    (0.0, 0.0)
                } else {
                    let dir = diameter / length;
                    (length / self.extents.height, oriented_angle(&up, &dir, &view_axis))
                };

                let mut station = Station {
                    center: *center,
                    scale: Vector3::repeat(uniform),
                    theta,
                };

                if let Some(pinch) = self.pinch.as_ref().filter(|p| p.range.contains(i)) {
                    if let (Some(q1), Some(q2)) = (
                        closest_masked(pinch.first.points(), center, &up),
                        closest_masked(pinch.second.points(), center, &up),
                    ) {
                        let pinch_center = midpoint(&q1, &q2);
                        let pinch_scale = (q2 - q1).norm() / self.extents.width;
                        station.center = Point3::from(
                            center.coords.component_mul(&plane_weight)
                                + pinch_center.coords.component_mul(&depth_weight),
                        );
                        station.scale =
                            depth_weight * pinch_scale + plane_weight * uniform;
                    }
                }
                station
            })
            .collect();

        Ok(StationFrames {
            axis,
            stations,
            view_axis,
        })
    }

    fn validate_pinch(&self, count: usize) -> Result<()> {
        let Some(pinch) = &self.pinch else {
            return Ok(());
        };
        if pinch.first.is_empty() || pinch.second.is_empty() {
            return Err(OperationError::InvalidInput("pinch curves must not be empty".into()).into());
        }
        if pinch.range.end_default > count {
            return Err(OperationError::InvalidInput(format!(
                "pinch range ends at {} but there are only {count} stations",
                pinch.range.end_default
            ))
            .into());
        }
        if self.extents.width < TOLERANCE {
            return Err(OperationError::InvalidInput("sweep profile has zero width".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn front() -> CameraFrame {
        CameraFrame::new(0.0, 0.0, 3.0)
    }

    #[allow(clippy::cast_precision_loss)]
    fn line(from: Point3, to: Point3, n: usize) -> Curve {
        Curve::new(
            (0..n)
                .map(|i| from + (to - from) * (i as f64 / (n - 1) as f64))
                .collect(),
        )
    }

    fn circle_extents() -> ProfileExtents {
        ProfileExtents::of(&front().unit_circle(8)).unwrap()
    }

    // ── Correspondence ─────────────────────────────────────────

    #[test]
    fn order_lines_reverses_second_when_ends_meet() {
        let mut a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 3);
        let mut b = line(p(1.0, 2.0, 0.0), p(1.0, 0.0, 0.0), 3);
        order_lines(&mut a, &mut b);
        assert_eq!(a.first(), Some(&p(0.0, 0.0, 0.0)));
        assert_eq!(b.first(), Some(&p(1.0, 0.0, 0.0)));
    }

    #[test]
    fn order_lines_reverses_both() {
        let mut a = line(p(0.0, 0.0, 0.0), p(0.0, 10.0, 0.0), 3);
        let mut b = line(p(1.0, 30.0, 0.0), p(1.0, 10.2, 0.0), 3);
        order_lines(&mut a, &mut b);
        // end-end is closest, so both flip.
        assert_eq!(a.first(), Some(&p(0.0, 10.0, 0.0)));
        assert_eq!(b.first(), Some(&p(1.0, 10.2, 0.0)));
    }

    #[test]
    fn correspondence_is_symmetric() {
        let a = line(p(0.0, 0.0, 0.0), p(0.2, 3.0, 0.1), 7);
        let b = line(p(1.5, 2.8, 0.0), p(1.1, 0.3, 0.0), 7);

        let (mut a1, mut b1) = (a.clone(), b.clone());
        order_lines(&mut a1, &mut b1);
        let (mut b2, mut a2) = (b.clone(), a.clone());
        order_lines(&mut b2, &mut a2);

        for i in 0..a.len() {
            assert_abs_diff_eq!(a1.points()[i], a2.points()[i], epsilon = 1e-12);
            assert_abs_diff_eq!(b1.points()[i], b2.points()[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn center_axis_is_midline() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 5);
        let axis = center_axis(&a, &b).unwrap();
        assert_eq!(axis.len(), 5);
        for q in axis.points() {
            assert_abs_diff_eq!(q.x, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn center_axis_rejects_mismatched_lengths() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 4);
        assert!(center_axis(&a, &b).is_err());
    }

    // ── Stations ───────────────────────────────────────────────

    #[test]
    fn stations_for_vertical_boundaries() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 5);
        let frames = ResolveStations::new(a, b, front(), UpMode::World, circle_extents())
            .execute()
            .unwrap();
        assert_eq!(frames.stations.len(), 5);
        assert_abs_diff_eq!(frames.view_axis, -Vector3::z(), epsilon = 1e-12);
        for s in &frames.stations {
            // Diameter (-1, 0, 0) over a profile height of 2.
            assert_abs_diff_eq!(s.scale, Vector3::repeat(0.5), epsilon = 1e-9);
            // Up (0,1,0) onto (-1,0,0) is a negative quarter turn about -Z.
            assert_abs_diff_eq!(s.theta, -FRAC_PI_2, epsilon = 1e-9);
        }
    }

    #[test]
    fn coincident_boundary_points_give_zero_scale() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 4);
        let b = line(p(0.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 4);
        let frames = ResolveStations::new(a, b, front(), UpMode::World, circle_extents())
            .execute()
            .unwrap();
        let first = frames.stations[0];
        assert_eq!(first.scale, Vector3::zeros());
        assert_eq!(first.theta, 0.0);
        assert!(frames
            .stations
            .iter()
            .all(|s| s.center.coords.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn pinch_moves_centre_in_depth_only() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 5);
        let pinch = PinchProfiles {
            first: line(p(0.0, 0.0, -0.5), p(0.0, 2.0, -0.5), 9),
            second: line(p(0.0, 0.0, 0.1), p(0.0, 2.0, 0.1), 9),
            range: PinchRange::full(5),
        };
        let frames = ResolveStations::new(a, b, front(), UpMode::World, circle_extents())
            .with_pinch(Some(pinch))
            .execute()
            .unwrap();
        for s in &frames.stations {
            assert_abs_diff_eq!(s.center.x, 0.5, epsilon = 1e-9);
            assert_abs_diff_eq!(s.center.z, -0.2, epsilon = 1e-9);
            // Depth axis takes the pinch diameter 0.6 over width 2.
            assert_abs_diff_eq!(s.scale, Vector3::new(0.5, 0.5, 0.3), epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_pinch_range_matches_no_pinch() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 5);
        let plain = ResolveStations::new(a.clone(), b.clone(), front(), UpMode::World, circle_extents())
            .execute()
            .unwrap();
        let pinch = PinchProfiles {
            first: line(p(0.0, 0.0, -0.5), p(0.0, 2.0, -0.5), 9),
            second: line(p(0.0, 0.0, 0.1), p(0.0, 2.0, 0.1), 9),
            range: PinchRange::empty(),
        };
        let pinched = ResolveStations::new(a, b, front(), UpMode::World, circle_extents())
            .with_pinch(Some(pinch))
            .execute()
            .unwrap();
        assert_eq!(plain.stations, pinched.stations);
    }

    #[test]
    fn partial_pinch_range_switches_discretely() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 5);
        let pinch = PinchProfiles {
            first: line(p(0.0, 0.0, -0.5), p(0.0, 2.0, -0.5), 9),
            second: line(p(0.0, 0.0, 0.1), p(0.0, 2.0, 0.1), 9),
            range: PinchRange::new([0, 1, 3, 5]).unwrap(),
        };
        let frames = ResolveStations::new(a, b, front(), UpMode::World, circle_extents())
            .with_pinch(Some(pinch))
            .execute()
            .unwrap();
        let depths: Vec<f64> = frames.stations.iter().map(|s| s.center.z).collect();
        assert_abs_diff_eq!(depths[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(depths[1], -0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(depths[2], -0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(depths[3], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(depths[4], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn pinch_range_past_last_station_is_rejected() {
        let a = line(p(0.0, 0.0, 0.0), p(0.0, 2.0, 0.0), 5);
        let b = line(p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0), 5);
        let pinch = PinchProfiles {
            first: line(p(0.0, 0.0, -0.5), p(0.0, 2.0, -0.5), 9),
            second: line(p(0.0, 0.0, 0.1), p(0.0, 2.0, 0.1), 9),
            range: PinchRange::full(6),
        };
        let result = ResolveStations::new(a, b, front(), UpMode::World, circle_extents())
            .with_pinch(Some(pinch))
            .execute();
        assert!(result.is_err());
    }

    #[test]
    fn pinch_range_must_be_ordered() {
        assert!(PinchRange::new([0, 3, 2, 5]).is_err());
        let r = PinchRange::new([0, 1, 3, 5]).unwrap();
        assert!(!r.contains(0));
        assert!(r.contains(1));
        assert!(r.contains(2));
        assert!(!r.contains(3));
    }

    #[test]
    fn closest_masked_ignores_unmasked_axes() {
        let pts = vec![p(5.0, 0.0, 0.0), p(-9.0, 1.0, 4.0), p(0.0, 2.0, 0.0)];
        let q = closest_masked(&pts, &p(0.0, 1.1, 0.0), &Vector3::y()).unwrap();
        assert_eq!(q, p(-9.0, 1.0, 4.0));
        assert!(closest_masked(&[], &Point3::origin(), &Vector3::y()).is_none());
    }

    #[test]
    fn profile_extents_of_unit_circle() {
        let e = circle_extents();
        assert_abs_diff_eq!(e.height, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(e.width, 2.0, epsilon = 1e-9);
        assert!(ProfileExtents::of(&Curve::new(vec![Point3::origin(); 2])).is_err());
    }
}
