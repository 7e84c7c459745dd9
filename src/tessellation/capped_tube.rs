//! Index topology of a closed tube: `rings` rings of `ring` vertices each,
//! capped by a pole vertex at both ends.
//!
//! Vertex layout: index 0 is the start pole, ring `j` vertex `k` sits at
//! `1 + ring * j + k`, and the end pole follows the last ring.

use crate::error::{Result, TessellationError};

/// Index of vertex `k` on ring `j`.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn ring_vertex_index(ring: usize, j: usize, k: usize) -> u32 {
    (1 + ring * j + k) as u32
}

/// Builds the triangle list of a capped tube.
///
/// Produces `2 * ring * rings` triangles: a fan at each pole and two
/// triangles per quad between consecutive rings. Every edge is shared by
/// exactly two triangles with opposite winding.
///
/// # Errors
///
/// Returns an error if `ring < 3`, `rings < 1`, or the vertex count does
/// not fit in a `u32` index.
#[allow(clippy::cast_possible_truncation)]
pub fn capped_tube_indices(ring: usize, rings: usize) -> Result<Vec<[u32; 3]>> {
    if ring < 3 || rings < 1 {
        return Err(TessellationError::InvalidParameters(format!(
            "capped tube needs ring >= 3 and rings >= 1, got ring {ring} and rings {rings}"
        ))
        .into());
    }
    let vertex_count = ring
        .checked_mul(rings)
        .and_then(|n| n.checked_add(2))
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or_else(|| {
            TessellationError::InvalidParameters(format!(
                "{ring} x {rings} ring vertices exceed the u32 index range"
            ))
        })?;

    let start_pole = 0u32;
    let end_pole = (vertex_count - 1) as u32;
    let at = |j: usize, k: usize| ring_vertex_index(ring, j, k % ring);

    let mut indices = Vec::with_capacity(2 * ring * rings);

    for k in 0..ring {
        indices.push([at(0, k + 1), start_pole, at(0, k)]);
    }

    for j in 0..rings - 1 {
        for k in 0..ring {
            let prev = k + ring - 1;
            indices.push([at(j, k), at(j, prev), at(j + 1, prev)]);
            indices.push([at(j + 1, k), at(j, k), at(j + 1, prev)]);
        }
    }

    let last = rings - 1;
    for k in 0..ring {
        indices.push([at(last, k), end_pole, at(last, k + 1)]);
    }

    Ok(indices)
}
