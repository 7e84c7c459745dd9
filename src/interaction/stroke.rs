use crate::geometry::Curve;
use crate::math::{Point2, Point3};
use crate::view::CameraFrame;

/// Samples of one freehand stroke, collected while the pointer is held.
///
/// The session snapshots the camera frame at the start of the stroke, so
/// every sample unprojects onto the same drawing plane even if the live
/// camera changes afterwards.
#[derive(Debug, Clone)]
pub struct StrokeSession {
    frame: CameraFrame,
    samples: Vec<Point3>,
}

/// A completed stroke at each pipeline stage.
#[derive(Debug, Clone)]
pub struct FinishedStroke {
    /// Unprojected pointer samples as drawn.
    pub raw: Curve,
    /// `raw` after inverse-Chaikin reduction.
    pub control: Curve,
    /// Camera frame the stroke was drawn in.
    pub frame: CameraFrame,
}

impl StrokeSession {
    #[must_use]
    pub fn new(frame: CameraFrame) -> Self {
        Self {
            frame,
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn frame(&self) -> &CameraFrame {
        &self.frame
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends a pointer sample given in normalised device coordinates.
    pub fn push(&mut self, ndc: &Point2) {
        self.samples.push(self.frame.screen_to_world(ndc));
    }

    /// Ends the session and reduces the stroke to a control polygon with up
    /// to `reduction_iterations` inverse-Chaikin steps.
    #[must_use]
    pub fn finish(self, reduction_iterations: usize) -> FinishedStroke {
        let raw = Curve::new(self.samples);
        let control = raw.reduce(reduction_iterations);
        FinishedStroke {
            raw,
            control,
            frame: self.frame,
        }
    }
}
