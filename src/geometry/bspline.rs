use crate::error::{GeometryError, Result};
use crate::math::Point3;

/// Degree used for every fitted curve in the pipeline.
pub const DEFAULT_DEGREE: usize = 3;

/// Builds a clamped knot vector on `[0, 1]` for `m + 1` control points.
///
/// The vector has `m + degree + 2` entries: `degree + 1` zeros, `degree + 1`
/// ones and `m - degree` uniformly spaced interior knots.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn basis_knots(degree: usize, m: usize) -> Vec<f64> {
    let interior = m.saturating_sub(degree);
    let mut knots = Vec::with_capacity(m + degree + 2);
    knots.extend(std::iter::repeat_n(0.0, degree + 1));
    for j in 1..=interior {
        knots.push(j as f64 / (interior + 1) as f64);
    }
    knots.extend(std::iter::repeat_n(1.0, degree + 1));
    knots
}

/// Finds `i` in `degree..=m` with `knots[i] <= u < knots[i + 1]`.
///
/// Returns `None` when no span matches (`u` at or beyond the last knot).
#[must_use]
pub fn find_span(knots: &[f64], u: f64, degree: usize, m: usize) -> Option<usize> {
    (degree..=m).find(|&i| match (knots.get(i), knots.get(i + 1)) {
        (Some(&lo), Some(&hi)) => u >= lo && u < hi,
        _ => false,
    })
}

/// Evaluates a B-spline at `u` with de Boor's algorithm.
///
/// `control_points` must hold `m + 1` points and `knots` must be a vector
/// produced by [`basis_knots`] for the same `degree` and `m`. When `u` is
/// past the last span the final span `m` is used, so `u = 1` reproduces the
/// last control point.
///
/// # Errors
///
/// Returns an error if `m < degree`, or if the control point or knot counts
/// do not match `m` and `degree`.
pub fn evaluate(control_points: &[Point3], knots: &[f64], u: f64, degree: usize, m: usize) -> Result<Point3> {
    if m < degree {
        return Err(GeometryError::TooFewPoints {
            what: "de Boor evaluation",
            required: degree + 1,
            actual: m + 1,
        }
        .into());
    }
    if control_points.len() != m + 1 || knots.len() != m + degree + 2 {
        return Err(GeometryError::Degenerate(format!(
            "degree {degree}, m {m} needs {} control points and {} knots, got {} and {}",
            m + 1,
            m + degree + 2,
            control_points.len(),
            knots.len()
        ))
        .into());
    }
    Ok(de_boor(control_points, knots, u, degree, m))
}

/// De Boor rounds over inputs already checked against `degree` and `m`.
fn de_boor(control_points: &[Point3], knots: &[f64], u: f64, degree: usize, m: usize) -> Point3 {
    let span = find_span(knots, u, degree, m).unwrap_or(m);

    let mut d: Vec<Point3> = (0..=degree)
        .map(|j| control_points[j + span - degree])
        .collect();

    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let lo = knots[j + span - degree];
            let hi = knots[j + 1 + span - r];
            let denom = hi - lo;
            let alpha = if denom == 0.0 { 0.0 } else { (u - lo) / denom };
            d[j] = Point3::from(d[j - 1].coords * (1.0 - alpha) + d[j].coords * alpha);
        }
    }

    d[degree]
}

/// A clamped non-uniform B-spline over a control polygon.
#[derive(Debug, Clone)]
pub struct BSpline {
    control_points: Vec<Point3>,
    knots: Vec<f64>,
    degree: usize,
}

impl BSpline {
    /// Creates a cubic B-spline over the given control polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than `degree + 1` control points are given.
    pub fn new(control_points: Vec<Point3>) -> Result<Self> {
        Self::with_degree(control_points, DEFAULT_DEGREE)
    }

    /// Creates a B-spline of arbitrary degree.
    ///
    /// # Errors
    ///
    /// Returns an error if `degree` is zero or fewer than `degree + 1`
    /// control points are given.
    pub fn with_degree(control_points: Vec<Point3>, degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(GeometryError::Degenerate("b-spline degree must be positive".into()).into());
        }
        if control_points.len() < degree + 1 {
            return Err(GeometryError::TooFewPoints {
                what: "b-spline fit",
                required: degree + 1,
                actual: control_points.len(),
            }
            .into());
        }
        let m = control_points.len() - 1;
        let knots = basis_knots(degree, m);
        Ok(Self {
            control_points,
            knots,
            degree,
        })
    }

    /// Returns the knot vector.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Returns the degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluates the curve at `u ∈ [0, 1]`.
    #[must_use]
    pub fn evaluate(&self, u: f64) -> Point3 {
        de_boor(
            &self.control_points,
            &self.knots,
            u,
            self.degree,
            self.control_points.len() - 1,
        )
    }

    /// Samples `precision + 1` evenly spaced parameters in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `precision` is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&self, precision: usize) -> Result<Vec<Point3>> {
        if precision == 0 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "precision",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            }
            .into());
        }
        Ok((0..=precision)
            .map(|i| self.evaluate(i as f64 / precision as f64))
            .collect())
    }
}
