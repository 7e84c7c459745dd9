mod capped_tube;
mod normals;
mod sweep_surface;

pub use capped_tube::{capped_tube_indices, ring_vertex_index};
pub use normals::NormalMode;
pub use sweep_surface::{SweepSurface, DEFAULT_COLOR};

use crate::geometry::{Color, Vertex};

/// Floats per vertex in [`TriangleMesh::vertex_buffer`]: position, color, normal.
pub const FLOATS_PER_VERTEX: usize = 9;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex records.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Recolors every vertex.
    pub fn set_color(&mut self, color: Color) {
        for v in &mut self.vertices {
            v.color = color;
        }
    }

    /// Interleaved `f32` buffer, [`FLOATS_PER_VERTEX`] floats per vertex.
    #[must_use]
    pub fn vertex_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(Vertex::to_f32_array).collect()
    }

    /// Flat index buffer, three indices per triangle.
    #[must_use]
    pub fn index_buffer(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }
}
