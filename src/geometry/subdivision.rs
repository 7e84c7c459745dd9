//! Chaikin corner cutting and its exact inverse.
//!
//! [`chaikin`] refines a control polygon: every interior edge is cut at 1/4
//! and 3/4, the two end edges only at their midpoint, and both endpoints are
//! kept. A polygon of `n` points becomes `2n - 2` points.
//!
//! [`chaikin_inverse`] undoes one refinement step with the stencil
//! `-1/4, 3/4, 3/4, -1/4`, using closed-form boundary stencils for the
//! second and second-to-last outputs. Applied to raw stroke samples it
//! yields a coarse control polygon whose refinement approximates the stroke.

use crate::error::{GeometryError, Result};
use crate::math::Point3;

/// Minimum input length for one refinement step.
pub const MIN_REFINE_POINTS: usize = 3;

/// Minimum input length for one inverse step.
pub const MIN_INVERSE_POINTS: usize = 6;

/// Applies `iterations` rounds of corner cutting.
///
/// # Errors
///
/// Returns an error if `points` has fewer than [`MIN_REFINE_POINTS`] points.
pub fn chaikin(points: &[Point3], iterations: usize) -> Result<Vec<Point3>> {
    let mut current = points.to_vec();
    for _ in 0..iterations {
        current = refine_once(&current)?;
    }
    Ok(current)
}

/// Applies `iterations` rounds of the inverse (decimating) stencil.
///
/// # Errors
///
/// Returns an error if any round sees fewer than [`MIN_INVERSE_POINTS`] points.
pub fn chaikin_inverse(points: &[Point3], iterations: usize) -> Result<Vec<Point3>> {
    let mut current = points.to_vec();
    for _ in 0..iterations {
        current = inverse_once(&current)?;
    }
    Ok(current)
}

/// Decimates for up to `max_iterations` rounds, stopping early once another
/// round would need more points than are left.
#[must_use]
pub fn reduce(points: &[Point3], max_iterations: usize) -> Vec<Point3> {
    let mut current = points.to_vec();
    for _ in 0..max_iterations {
        match inverse_once(&current) {
            Ok(next) if next.len() >= 4 => current = next,
            _ => break,
        }
    }
    current
}

fn refine_once(c: &[Point3]) -> Result<Vec<Point3>> {
    let n = c.len();
    if n < MIN_REFINE_POINTS {
        return Err(GeometryError::TooFewPoints {
            what: "chaikin refinement",
            required: MIN_REFINE_POINTS,
            actual: n,
        }
        .into());
    }

    let mut f = Vec::with_capacity(2 * n - 2);
    f.push(c[0]);
    f.push(blend(&[(0.5, &c[0]), (0.5, &c[1])]));
    for i in 1..n - 2 {
        f.push(blend(&[(0.75, &c[i]), (0.25, &c[i + 1])]));
        f.push(blend(&[(0.25, &c[i]), (0.75, &c[i + 1])]));
    }
    f.push(blend(&[(0.5, &c[n - 2]), (0.5, &c[n - 1])]));
    f.push(c[n - 1]);
    Ok(f)
}

fn inverse_once(f: &[Point3]) -> Result<Vec<Point3>> {
    let len = f.len();
    if len < MIN_INVERSE_POINTS {
        return Err(GeometryError::TooFewPoints {
            what: "inverse chaikin",
            required: MIN_INVERSE_POINTS,
            actual: len,
        }
        .into());
    }
    let m = len - 1;

    let mut c = Vec::with_capacity(len / 2 + 2);
    c.push(f[0]);
    c.push(blend(&[(-0.5, &f[0]), (1.0, &f[1]), (0.75, &f[2]), (-0.25, &f[3])]));
    let mut i = 2;
    while i + 5 <= m {
        c.push(blend(&[
            (-0.25, &f[i]),
            (0.75, &f[i + 1]),
            (0.75, &f[i + 2]),
            (-0.25, &f[i + 3]),
        ]));
        i += 2;
    }
    c.push(blend(&[
        (-0.25, &f[m - 3]),
        (0.75, &f[m - 2]),
        (1.0, &f[m - 1]),
        (-0.5, &f[m]),
    ]));
    c.push(f[m]);
    Ok(c)
}

/// Affine combination of points; weights must sum to one.
fn blend(terms: &[(f64, &Point3)]) -> Point3 {
    let coords = terms
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, (w, p)| acc + p.coords * *w);
    Point3::from(coords)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn arc(n: usize) -> Vec<Point3> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let a = std::f64::consts::PI * i as f64 / (n - 1) as f64;
                p(a.cos(), a.sin(), 0.0)
            })
            .collect()
    }

    fn polyline_length(points: &[Point3]) -> f64 {
        points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    fn max_turning(points: &[Point3]) -> f64 {
        points
            .windows(3)
            .map(|w| {
                let a = (w[1] - w[0]).normalize();
                let b = (w[2] - w[1]).normalize();
                a.dot(&b).clamp(-1.0, 1.0).acos()
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn refinement_doubles_minus_two() {
        let out = chaikin(&arc(6), 1).unwrap();
        assert_eq!(out.len(), 10);
        let out = chaikin(&arc(6), 2).unwrap();
        assert_eq!(out.len(), 18);
    }

    #[test]
    fn refinement_keeps_endpoints() {
        let input = arc(7);
        for iterations in 1..5 {
            let out = chaikin(&input, iterations).unwrap();
            assert_abs_diff_eq!(out[0], input[0], epsilon = 1e-12);
            assert_abs_diff_eq!(out[out.len() - 1], input[6], epsilon = 1e-12);
        }
    }

    #[test]
    fn refinement_shortens_and_smooths_convex_polygon() {
        let mut current = arc(5);
        for _ in 0..4 {
            let next = chaikin(&current, 1).unwrap();
            assert!(polyline_length(&next) < polyline_length(&current));
            assert!(max_turning(&next) < max_turning(&current));
            current = next;
        }
    }

    #[test]
    fn inverse_undoes_refinement_exactly() {
        let input = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 2.0, 0.0),
            p(2.0, -1.0, 0.5),
            p(3.0, 3.0, 0.0),
            p(4.0, 0.0, -1.0),
            p(5.0, 1.0, 0.0),
        ];
        let refined = chaikin(&input, 2).unwrap();
        let back = chaikin_inverse(&refined, 2).unwrap();
        assert_eq!(back.len(), input.len());
        for (a, b) in back.iter().zip(&input) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn inverse_rejects_short_input() {
        assert!(chaikin_inverse(&arc(5), 1).is_err());
        assert!(chaikin_inverse(&arc(6), 1).is_ok());
    }

    #[test]
    fn refine_rejects_two_points() {
        assert!(chaikin(&arc(2), 1).is_err());
        assert!(chaikin(&arc(2), 0).is_ok());
    }

    #[test]
    fn reduce_stops_before_running_out() {
        let samples = arc(200);
        let reduced = reduce(&samples, 20);
        assert!(reduced.len() >= 4);
        assert!(reduced.len() < 10);
        assert_abs_diff_eq!(reduced[0], samples[0], epsilon = 1e-12);
        assert_abs_diff_eq!(reduced[reduced.len() - 1], samples[199], epsilon = 1e-12);
    }
}
