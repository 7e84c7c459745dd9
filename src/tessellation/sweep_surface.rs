use tracing::debug;

use crate::error::{Result, TessellationError};
use crate::geometry::{Color, Curve, Vertex};
use crate::math::transform::{station_matrix, transform_point};
use crate::math::{Point3, Vector3};
use crate::operations::StationFrames;

use super::capped_tube::capped_tube_indices;
use super::normals::{pole_normals, ring_normals, NormalMode};
use super::TriangleMesh;

/// Default surface colour (light grey).
pub const DEFAULT_COLOR: Color = Vector3::new(0.8, 0.8, 0.8);

/// Sweeps a closed profile along resolved axis stations into a capped tube.
///
/// Each station places a copy of the profile with
/// `Translate(center) · Rotate(theta, view_axis) · Scale(scale)`; the two
/// ends are closed by fans around pole vertices at the first and last
/// station centres. Triangles are wound counter-clockwise seen from the side
/// their vertex normals face, whichever way round the profile runs.
#[derive(Debug)]
pub struct SweepSurface {
    profile: Curve,
    frames: StationFrames,
    color: Color,
    normal_mode: NormalMode,
}

impl SweepSurface {
    /// Creates a new sweep over `frames` with the default colour and normals.
    #[must_use]
    pub fn new(profile: Curve, frames: StationFrames) -> Self {
        Self {
            profile,
            frames,
            color: DEFAULT_COLOR,
            normal_mode: NormalMode::default(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_normal_mode(mut self, mode: NormalMode) -> Self {
        self.normal_mode = mode;
        self
    }

    /// Executes the sweep.
    ///
    /// Produces `2 + R * stations` vertices and `2 * R * stations`
    /// triangles for a profile of `R` points.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile has fewer than 3 points or there are
    /// no stations.
    pub fn execute(&self) -> Result<TriangleMesh> {
        let ring = self.profile.len();
        let stations = &self.frames.stations;
        let mut indices = capped_tube_indices(ring, stations.len())?;
        if stations.iter().any(|s| !s.scale.iter().chain(s.center.iter()).all(|c| c.is_finite())) {
            return Err(TessellationError::Failed("station transform is not finite".into()).into());
        }

        let centers: Vec<Point3> = stations.iter().map(|s| s.center).collect();
        let rings: Vec<Vec<Point3>> = stations
            .iter()
            .map(|s| {
                let m = station_matrix(&s.center, &self.frames.view_axis, s.theta, &s.scale);
                self.profile.points().iter().map(|p| transform_point(&m, p)).collect()
            })
            .collect();

        let normals = ring_normals(&rings, &centers, self.normal_mode);
        let (start_normal, end_normal) = pole_normals(&centers);

        let mut vertices = Vec::with_capacity(2 + ring * stations.len());
        vertices.push(Vertex::with_normal(centers[0], self.color, start_normal));
        vertices.extend(
            rings
                .iter()
                .flatten()
                .zip(&normals)
                .map(|(p, n)| Vertex::with_normal(*p, self.color, *n)),
        );
        vertices.push(Vertex::with_normal(centers[centers.len() - 1], self.color, end_normal));

        let flipped = winds_inward(&vertices, &indices);
        if flipped {
            for tri in &mut indices {
                tri.swap(1, 2);
            }
        }

        debug!(
            ring,
            stations = stations.len(),
            vertices = vertices.len(),
            triangles = indices.len(),
            flipped,
            "swept surface"
        );

        Ok(TriangleMesh { vertices, indices })
    }
}

/// Whether the triangles face away from their vertex normals on balance.
///
/// The tube is consistently wound, so one global sign decides every face.
fn winds_inward(vertices: &[Vertex], indices: &[[u32; 3]]) -> bool {
    let agreement: f64 = indices
        .iter()
        .map(|tri| {
            let [a, b, c] = tri.map(|i| &vertices[i as usize]);
            let face = (b.position - a.position).cross(&(c.position - a.position));
            face.dot(&(a.normal + b.normal + c.normal))
        })
        .sum();
    agreement < 0.0
}
