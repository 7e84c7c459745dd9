mod mesh;
mod scene;

pub use mesh::{Mesh, PinchCurves};
pub use scene::{MeshId, Scene};

use crate::geometry::Color;
use crate::tessellation::NormalMode;
use crate::view::UpMode;

/// Parameters controlling how a surface is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    /// Axis stations minus one; both boundaries are sampled at
    /// `precision + 1` points.
    pub precision: usize,
    /// Number of points in a user-drawn or default cross-section.
    pub sweep_resolution: usize,
    /// Pinch curves are sampled `pinch_oversampling` times as densely as
    /// the boundaries.
    pub pinch_oversampling: usize,
    pub normal_mode: NormalMode,
    pub up_mode: UpMode,
    pub color: Color,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            precision: 250,
            sweep_resolution: 50,
            pinch_oversampling: 2,
            normal_mode: NormalMode::default(),
            up_mode: UpMode::default(),
            color: crate::tessellation::DEFAULT_COLOR,
        }
    }
}
