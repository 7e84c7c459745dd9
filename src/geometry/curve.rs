use crate::error::{GeometryError, Result};
use crate::math::transform::{rotation_matrix, transform_point};
use crate::math::{midpoint, normalize_or_zero, oriented_angle, Matrix4, Point3, Vector3, TOLERANCE};
use crate::view::CameraFrame;

use super::bspline::BSpline;
use super::subdivision;

/// An ordered sequence of points.
///
/// The same container holds raw stroke samples, reduced control polygons
/// and densely evaluated splines. Every operation returns a new curve, so
/// each stage of the pipeline is a distinct value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    points: Vec<Point3>,
}

impl Curve {
    /// Creates a curve from points.
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Returns the points of the curve.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Consumes the curve, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Point3> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Point3> {
        self.points.last()
    }

    /// Reverses the point order in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Returns a copy with the point order reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Applies a 4x4 transform to every point.
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix4) -> Self {
        Self::new(self.points.iter().map(|p| transform_point(matrix, p)).collect())
    }

    /// Evaluates the cubic B-spline over this control polygon at
    /// `precision + 1` evenly spaced parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve has fewer than 4 points or `precision`
    /// is zero.
    pub fn fit_bspline(&self, precision: usize) -> Result<Self> {
        let spline = BSpline::new(self.points.clone())?;
        Ok(Self::new(spline.sample(precision)?))
    }

    /// Corner-cutting refinement.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is too short to refine.
    pub fn chaikin(&self, iterations: usize) -> Result<Self> {
        Ok(Self::new(subdivision::chaikin(&self.points, iterations)?))
    }

    /// Exact inverse of [`Curve::chaikin`].
    ///
    /// # Errors
    ///
    /// Returns an error if a round sees fewer than 6 points.
    pub fn chaikin_inverse(&self, iterations: usize) -> Result<Self> {
        Ok(Self::new(subdivision::chaikin_inverse(&self.points, iterations)?))
    }

    /// Decimates towards a control polygon, stopping early when too short.
    #[must_use]
    pub fn reduce(&self, max_iterations: usize) -> Self {
        Self::new(subdivision::reduce(&self.points, max_iterations))
    }

    /// Re-projects the curve onto the frame's drawing plane, centred on the
    /// view axis and scaled so its vertical screen extent spans `[-1, 1]`.
    ///
    /// Curves with no vertical extent are scaled by their horizontal extent.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is empty or collapses to a point.
    pub fn standardize(&self, frame: &CameraFrame) -> Result<Self> {
        if self.points.is_empty() {
            return Err(GeometryError::Degenerate("cannot standardize an empty curve".into()).into());
        }

        let view: Vec<Point3> = self.points.iter().map(|p| frame.to_view(p)).collect();
        let (min, max) = view.iter().fold(
            (
                Point3::new(f64::INFINITY, f64::INFINITY, 0.0),
                Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, 0.0),
            ),
            |(lo, hi), p| {
                (
                    Point3::new(lo.x.min(p.x), lo.y.min(p.y), 0.0),
                    Point3::new(hi.x.max(p.x), hi.y.max(p.y), 0.0),
                )
            },
        );

        let height = max.y - min.y;
        let width = max.x - min.x;
        let extent = if height > TOLERANCE { height } else { width };
        if extent < TOLERANCE {
            return Err(GeometryError::Degenerate("curve has no extent on the drawing plane".into()).into());
        }
        let scale = 2.0 / extent;
        let center = midpoint(&min, &max);

        let points = view
            .iter()
            .map(|p| {
                frame.from_view(&Point3::new(
                    (p.x - center.x) * scale,
                    (p.y - center.y) * scale,
                    -frame.radius(),
                ))
            })
            .collect();
        Ok(Self::new(points))
    }

    /// Derives a closed cross-section from a half-profile stroke.
    ///
    /// The stroke is moved so its endpoints sit at `±up` around the origin,
    /// then mirrored with the per-axis scale `2|up| - fixed`, where `fixed`
    /// masks the axes of the drawing plane. The mirrored half is appended in
    /// reverse so the result runs around the whole outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the stroke has fewer than 2 points or its
    /// endpoints coincide.
    pub fn cross_section_from_endpoints(&self, frame: &CameraFrame, fixed: &Vector3) -> Result<Self> {
        let n = self.points.len();
        if n < 2 {
            return Err(GeometryError::TooFewPoints {
                what: "cross-section stroke",
                required: 2,
                actual: n,
            }
            .into());
        }
        let (p1, p2) = (&self.points[0], &self.points[n - 1]);

        let center = midpoint(p1, p2);
        let mut d = p2 - p1;
        let span = d.norm();
        if span < TOLERANCE {
            return Err(GeometryError::Degenerate("cross-section endpoints coincide".into()).into());
        }

        let up = normalize_or_zero(&frame.up());
        if d.component_mul(&up).sum() < 0.0 {
            d = -d;
        }
        let eye = frame.eye_position().coords;
        let angle = oriented_angle(&up, &normalize_or_zero(&d), &-normalize_or_zero(&eye));

        let to_origin = Matrix4::new_translation(&-center.coords);
        let align = rotation_matrix(&-eye, -angle);
        let unit = Matrix4::new_scaling(2.0 / span);
        let normalize = unit * align * to_origin;

        let half: Vec<Point3> = self.points.iter().map(|p| transform_point(&normalize, p)).collect();
        let mirror = Matrix4::new_nonuniform_scaling(&(up.abs() * 2.0 - fixed));

        let mut points = half.clone();
        points.extend(half.iter().rev().map(|p| transform_point(&mirror, p)));
        Ok(Self::new(points))
    }
}

impl From<Vec<Point3>> for Curve {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}
