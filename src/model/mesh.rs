use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Rotation3;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Color, Curve, Vertex};
use crate::math::transform::rotation_matrix;
use crate::math::{midpoint, normalize_or_zero, Matrix4, Point3, Vector3};
use crate::operations::{PinchProfiles, PinchRange, ProfileExtents, ResolveStations};
use crate::tessellation::{SweepSurface, TriangleMesh};
use crate::view::CameraFrame;

use super::SurfaceParams;

/// Inverse-Chaikin rounds applied to pinch silhouettes.
const SILHOUETTE_REDUCTION: usize = 4;

/// Control polygons of the two pinch curves and the stations they drive.
///
/// A `range` of `None` pinches every station.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchCurves {
    pub first: Curve,
    pub second: Curve,
    pub range: Option<PinchRange>,
}

/// A rotational blending surface and the curves it is built from.
///
/// The mesh owns copies of its input curves and a snapshot of the camera
/// frame active when it was created; later camera moves do not affect it.
/// Every mutator rebuilds the triangle mesh and commits only if the rebuild
/// succeeds, so a rejected edit leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct Mesh {
    params: SurfaceParams,
    frame: CameraFrame,
    bound1: Curve,
    bound2: Curve,
    sweep: Curve,
    pinch: Option<PinchCurves>,
    axis: Curve,
    geometry: TriangleMesh,
}

impl Mesh {
    /// Builds a surface from two boundary control polygons, sweeping the
    /// frame's default circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundaries cannot be fitted or swept.
    pub fn new(bound1: Curve, bound2: Curve, frame: CameraFrame, params: SurfaceParams) -> Result<Self> {
        let mut mesh = Self {
            params,
            frame,
            bound1,
            bound2,
            sweep: frame.unit_circle(params.sweep_resolution),
            pinch: None,
            axis: Curve::default(),
            geometry: TriangleMesh::default(),
        };
        mesh.create()?;
        Ok(mesh)
    }

    /// Recomputes the axis and triangle mesh from the current inputs.
    ///
    /// On failure the previously built geometry is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if any input violates a fitting or sweeping
    /// precondition.
    pub fn create(&mut self) -> Result<()> {
        match self.build() {
            Ok((axis, geometry)) => {
                debug!(
                    precision = self.params.precision,
                    ring = self.sweep.len(),
                    vertices = geometry.vertex_count(),
                    triangles = geometry.triangle_count(),
                    pinched = self.pinch.is_some(),
                    "rebuilt blending surface"
                );
                self.axis = axis;
                self.geometry = geometry;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "rejected surface rebuild");
                Err(e)
            }
        }
    }

    fn build(&self) -> Result<(Curve, TriangleMesh)> {
        let precision = self.params.precision;
        let dense1 = self.bound1.fit_bspline(precision)?;
        let dense2 = self.bound2.fit_bspline(precision)?;
        let extents = ProfileExtents::of(&self.sweep)?;

        let pinch = match &self.pinch {
            Some(curves) => {
                let oversampled = precision * self.params.pinch_oversampling.max(1);
                Some(PinchProfiles {
                    first: curves.first.fit_bspline(oversampled)?,
                    second: curves.second.fit_bspline(oversampled)?,
                    range: curves.range.unwrap_or_else(|| PinchRange::full(precision + 1)),
                })
            }
            None => None,
        };

        let frames = ResolveStations::new(dense1, dense2, self.frame, self.params.up_mode, extents)
            .with_pinch(pinch)
            .execute()?;
        let axis = frames.axis.clone();
        let geometry = SweepSurface::new(self.sweep.clone(), frames)
            .with_color(self.params.color)
            .with_normal_mode(self.params.normal_mode)
            .execute()?;
        Ok((axis, geometry))
    }

    /// Applies `edit` to a copy, rebuilds it, and commits on success.
    fn update(&mut self, edit: impl FnOnce(&mut Self)) -> Result<()> {
        let mut next = self.clone();
        edit(&mut next);
        next.create()?;
        *self = next;
        Ok(())
    }

    /// Replaces both boundary control polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the new boundaries cannot be fitted or swept.
    pub fn set_boundaries(&mut self, bound1: Curve, bound2: Curve) -> Result<()> {
        self.update(|m| {
            m.bound1 = bound1;
            m.bound2 = bound2;
        })
    }

    /// Replaces the surface parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be rebuilt with `params`.
    pub fn set_params(&mut self, params: SurfaceParams) -> Result<()> {
        self.update(|m| m.params = params)
    }

    /// Changes the number of axis stations minus one.
    ///
    /// # Errors
    ///
    /// Returns an error if `precision` is zero.
    pub fn set_precision(&mut self, precision: usize) -> Result<()> {
        self.update(|m| m.params.precision = precision)
    }

    /// Sweeps `profile` instead of the current cross-section.
    ///
    /// The profile should be centred on the origin in the plane spanned by
    /// the view direction and screen-up, like [`CameraFrame::unit_circle`].
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is too short or has zero height.
    pub fn set_sweep(&mut self, profile: Curve) -> Result<()> {
        self.update(|m| m.sweep = profile)
    }

    /// Derives the cross-section from a half-profile stroke drawn in `frame`.
    ///
    /// The stroke keeps its on-screen shape but is carried into the creation
    /// frame, so the profile is oriented the same way as the default circle
    /// whichever view it was drawn from. It is then mirrored about its
    /// endpoint diameter, standardised to unit height, turned into the sweep
    /// plane and resampled with `sweep_resolution` points.
    ///
    /// # Errors
    ///
    /// Returns an error if the stroke is degenerate or the result cannot be
    /// swept.
    pub fn set_cross_section(&mut self, stroke: &Curve, frame: &CameraFrame) -> Result<()> {
        let own = self.frame;
        let redrawn = Curve::new(
            stroke
                .points()
                .iter()
                .map(|p| own.from_view(&frame.to_view(p)))
                .collect(),
        );
        let closed = redrawn
            .cross_section_from_endpoints(&own, &own.drawing_plane_mask())?
            .standardize(&own)?
            .transformed(&rotation_matrix(&own.orbit_up(), FRAC_PI_2));
        let mut profile = closed.fit_bspline(self.params.sweep_resolution)?.into_points();
        profile.pop();
        self.set_sweep(Curve::new(profile))
    }

    /// Restores the frame's default circular cross-section.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be rebuilt.
    pub fn reset_cross_section(&mut self) -> Result<()> {
        let circle = self.frame.unit_circle(self.params.sweep_resolution);
        self.set_sweep(circle)
    }

    /// Attaches pinch curves (control polygons).
    ///
    /// # Errors
    ///
    /// Returns an error if the curves cannot be fitted or the range does not
    /// fit the station count.
    pub fn set_pinch(&mut self, first: Curve, second: Curve, range: Option<PinchRange>) -> Result<()> {
        self.update(|m| {
            m.pinch = Some(PinchCurves { first, second, range });
        })
    }

    /// Removes the pinch curves.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be rebuilt.
    pub fn clear_pinch(&mut self) -> Result<()> {
        self.update(|m| m.pinch = None)
    }

    /// Recolours every vertex without rebuilding.
    pub fn set_color(&mut self, color: Color) {
        self.params.color = color;
        self.geometry.set_color(color);
    }

    #[must_use]
    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.params.color
    }

    /// Camera frame captured at creation.
    #[must_use]
    pub fn frame(&self) -> &CameraFrame {
        &self.frame
    }

    /// Boundary control polygons as last committed.
    #[must_use]
    pub fn boundaries(&self) -> (&Curve, &Curve) {
        (&self.bound1, &self.bound2)
    }

    #[must_use]
    pub fn sweep(&self) -> &Curve {
        &self.sweep
    }

    #[must_use]
    pub fn pinch(&self) -> Option<&PinchCurves> {
        self.pinch.as_ref()
    }

    /// Dense axis, one point per station.
    #[must_use]
    pub fn axis(&self) -> &Curve {
        &self.axis
    }

    #[must_use]
    pub fn geometry(&self) -> &TriangleMesh {
        &self.geometry
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.geometry.vertices
    }

    #[must_use]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.geometry.indices
    }

    /// Unit vector from the first to the last axis station.
    #[must_use]
    pub fn axis_direction(&self) -> Vector3 {
        match (self.axis.first(), self.axis.last()) {
            (Some(a), Some(b)) => normalize_or_zero(&(b - a)),
            _ => Vector3::zeros(),
        }
    }

    /// Midpoint of the first and last axis stations.
    #[must_use]
    pub fn center(&self) -> Point3 {
        match (self.axis.first(), self.axis.last()) {
            (Some(a), Some(b)) => midpoint(a, b),
            _ => Point3::origin(),
        }
    }

    /// Boundary control polygons moved to the origin and turned so the axis
    /// runs along the frame's up vector.
    #[must_use]
    pub fn normalized_boundaries(&self) -> (Curve, Curve) {
        let dir = self.axis_direction();
        let up = self.frame.up();
        let rotation = if dir == Vector3::zeros() {
            Rotation3::identity()
        } else {
            Rotation3::rotation_between(&dir, &up)
                .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI))
        };
        let m = rotation.to_homogeneous() * Matrix4::new_translation(&-self.center().coords);
        (self.bound1.transformed(&m), self.bound2.transformed(&m))
    }

    /// Outlines through the depth extremes of every station, reduced
    /// towards control polygons.
    ///
    /// The first curve runs through the profile point furthest along the
    /// creation frame's view direction, the second through the nearest one.
    /// These seed a pinch edit from the current surface. Returns `None`
    /// before the first successful build.
    #[must_use]
    pub fn pinch_silhouettes(&self) -> Option<(Curve, Curve)> {
        let ring = self.sweep.len();
        let stations = self.axis.len();
        if ring == 0 || stations == 0 || self.geometry.vertex_count() != 2 + ring * stations {
            return None;
        }
        let view = self.frame.view_direction();
        let depth = |k: &usize| self.sweep.points()[*k].coords.dot(&view);
        let far = (0..ring).max_by(|a, b| depth(a).total_cmp(&depth(b)))?;
        let near = (0..ring).min_by(|a, b| depth(a).total_cmp(&depth(b)))?;
        let outline = |k: usize| {
            let points: Vec<Point3> = (0..stations)
                .map(|j| self.geometry.vertices[1 + ring * j + k].position)
                .collect();
            Curve::new(points).reduce(SILHOUETTE_REDUCTION)
        };
        Some((outline(far), outline(near)))
    }
}

#[cfg(test)]
impl Mesh {
    /// Overwrites the precision without rebuilding.
    pub(crate) fn set_precision_unchecked(&mut self, precision: usize) {
        self.params.precision = precision;
    }
}
