mod event;
mod stroke;

pub use event::{pixel_to_ndc, AppEvent, InputState, Key, MouseButton};
pub use stroke::{FinishedStroke, StrokeSession};

/// Parameters controlling pointer interaction.
#[derive(Debug, Clone, Copy)]
pub struct InteractionParams {
    /// Radians of orbit per pixel of right-drag.
    pub orbit_sensitivity: f64,
    /// Radius change per scroll unit.
    pub zoom_step: f64,
    /// Inverse-Chaikin rounds applied to a finished stroke.
    pub stroke_reduction_iterations: usize,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.01,
            zoom_step: 1.0,
            stroke_reduction_iterations: 3,
        }
    }
}
