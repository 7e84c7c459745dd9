use crate::math::{normalize_or_zero, Point3, Vector3};

/// How ring vertex normals are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMode {
    /// Direction from the station centre to the vertex.
    Radial,
    /// Cross product of the ring and axis neighbour differences, falling
    /// back to radial where that degenerates.
    #[default]
    Neighbor,
}

/// Computes one normal per ring vertex, in ring-major order.
///
/// `rings[j]` holds the vertices of station `j`, all rings with the same
/// length; `centers[j]` is that station's axis point. Neighbour normals are
/// flipped as a whole so they point away from the axis on average.
pub(super) fn ring_normals(rings: &[Vec<Point3>], centers: &[Point3], mode: NormalMode) -> Vec<Vector3> {
    let radial = |j: usize, k: usize| normalize_or_zero(&(rings[j][k] - centers[j]));

    match mode {
        NormalMode::Radial => rings
            .iter()
            .enumerate()
            .flat_map(|(j, ring)| (0..ring.len()).map(move |k| (j, k)))
            .map(|(j, k)| radial(j, k))
            .collect(),
        NormalMode::Neighbor => {
            let last = rings.len().saturating_sub(1);
            let mut normals = Vec::with_capacity(rings.len() * rings.first().map_or(0, Vec::len));
            let mut outward = 0.0;

            for (j, ring) in rings.iter().enumerate() {
                let r = ring.len();
                let below = &rings[j.saturating_sub(1)];
                let above = &rings[(j + 1).min(last)];
                for k in 0..r {
                    let along_ring = ring[(k + 1) % r] - ring[(k + r - 1) % r];
                    let along_axis = above[k] - below[k];
                    let mut n = normalize_or_zero(&along_ring.cross(&along_axis));
                    if n == Vector3::zeros() {
                        n = radial(j, k);
                    }
                    outward += n.dot(&(ring[k] - centers[j]));
                    normals.push(n);
                }
            }

            if outward < 0.0 {
                for n in &mut normals {
                    *n = -*n;
                }
            }
            normals
        }
    }
}

/// Normals at the two poles: along the axis, pointing out of the tube.
pub(super) fn pole_normals(centers: &[Point3]) -> (Vector3, Vector3) {
    let n = centers.len();
    if n < 2 {
        return (Vector3::zeros(), Vector3::zeros());
    }
    (
        normalize_or_zero(&(centers[0] - centers[1])),
        normalize_or_zero(&(centers[n - 1] - centers[n - 2])),
    )
}
