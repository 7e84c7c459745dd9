use crate::math::{Point3, Vector3};

/// RGB colour with components in `[0, 1]`.
pub type Color = Vector3;

/// A render vertex: position plus cosmetic colour and shading normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3,
    pub color: Color,
    pub normal: Vector3,
}

impl Vertex {
    /// Creates a vertex with an explicit normal.
    #[must_use]
    pub fn with_normal(position: Point3, color: Color, normal: Vector3) -> Self {
        Self {
            position,
            color,
            normal,
        }
    }

    /// Interleaved `[px, py, pz, r, g, b, nx, ny, nz]` for GPU upload.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn to_f32_array(&self) -> [f32; 9] {
        [
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
            self.color.x as f32,
            self.color.y as f32,
            self.color.z as f32,
            self.normal.x as f32,
            self.normal.y as f32,
            self.normal.z as f32,
        ]
    }
}
