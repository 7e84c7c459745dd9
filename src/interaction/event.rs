use tracing::debug;

use crate::math::Point2;
use crate::view::CameraFrame;

use super::stroke::{FinishedStroke, StrokeSession};
use super::InteractionParams;

/// Keys the geometry core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Toggles draw mode; the camera is fixed while drawing.
    ToggleDraw,
    ViewXy,
    ViewXz,
    ViewZy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Window-system input, already decoded by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    KeyPress(Key),
    MouseButton { button: MouseButton, pressed: bool },
    /// Cursor position in window pixels, origin top-left.
    MouseMove { x: f64, y: f64 },
    Scroll { dy: f64 },
    Resize { width: u32, height: u32 },
}

/// Pointer and mode state between events.
#[derive(Debug, Clone)]
pub struct InputState {
    params: InteractionParams,
    width: u32,
    height: u32,
    cursor: Option<(f64, f64)>,
    left_down: bool,
    right_down: bool,
    draw_mode: bool,
}

impl InputState {
    #[must_use]
    pub fn new(width: u32, height: u32, params: InteractionParams) -> Self {
        Self {
            params,
            width,
            height,
            cursor: None,
            left_down: false,
            right_down: false,
            draw_mode: false,
        }
    }

    #[must_use]
    pub fn params(&self) -> &InteractionParams {
        &self.params
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.draw_mode
    }

    /// Width over height, or 1 for an empty window.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }

    /// Current cursor in normalised device coordinates.
    #[must_use]
    pub fn cursor_ndc(&self) -> Option<Point2> {
        let (x, y) = self.cursor?;
        pixel_to_ndc(x, y, self.width, self.height)
    }

    /// Applies one event to the camera and the active stroke.
    ///
    /// Returns the finished stroke when the left button is released while
    /// a stroke is in progress.
    pub fn dispatch(
        &mut self,
        event: AppEvent,
        camera: &mut CameraFrame,
        stroke: &mut Option<StrokeSession>,
    ) -> Option<FinishedStroke> {
        match event {
            AppEvent::KeyPress(key) => {
                self.key_press(key, camera, stroke);
                None
            }
            AppEvent::MouseButton { button, pressed } => self.mouse_button(button, pressed, camera, stroke),
            AppEvent::MouseMove { x, y } => {
                self.mouse_move(x, y, camera, stroke);
                None
            }
            AppEvent::Scroll { dy } => {
                camera.zoom(dy * self.params.zoom_step);
                None
            }
            AppEvent::Resize { width, height } => {
                self.width = width;
                self.height = height;
                None
            }
        }
    }

    fn key_press(&mut self, key: Key, camera: &mut CameraFrame, stroke: &mut Option<StrokeSession>) {
        match key {
            Key::ToggleDraw => {
                self.draw_mode = !self.draw_mode;
                camera.set_fixed(self.draw_mode);
                if !self.draw_mode {
                    *stroke = None;
                }
                debug!(draw_mode = self.draw_mode, "toggled draw mode");
            }
            Key::ViewXy => camera.view_xy(),
            Key::ViewXz => camera.view_xz(),
            Key::ViewZy => camera.view_zy(),
        }
    }

    fn mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        camera: &CameraFrame,
        stroke: &mut Option<StrokeSession>,
    ) -> Option<FinishedStroke> {
        match button {
            MouseButton::Left => {
                self.left_down = pressed;
                if pressed {
                    if self.draw_mode {
                        let mut session = StrokeSession::new(*camera);
                        if let Some(ndc) = self.cursor_ndc() {
                            session.push(&ndc);
                        }
                        *stroke = Some(session);
                    }
                    None
                } else {
                    stroke
                        .take()
                        .map(|s| s.finish(self.params.stroke_reduction_iterations))
                }
            }
            MouseButton::Right => {
                self.right_down = pressed;
                None
            }
            MouseButton::Middle => None,
        }
    }

    fn mouse_move(&mut self, x: f64, y: f64, camera: &mut CameraFrame, stroke: &mut Option<StrokeSession>) {
        if self.right_down {
            if let Some((old_x, old_y)) = self.cursor {
                let s = self.params.orbit_sensitivity;
                camera.orbit((y - old_y) * s, -(x - old_x) * s);
            }
        }
        self.cursor = Some((x, y));
        if self.left_down {
            if let (Some(session), Some(ndc)) = (stroke.as_mut(), self.cursor_ndc()) {
                session.push(&ndc);
            }
        }
    }
}

/// Converts a pixel position to normalised device coordinates, treating the
/// position as the pixel centre and flipping Y so up is positive.
#[must_use]
pub fn pixel_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Point2> {
    if width == 0 || height == 0 {
        return None;
    }
    let u = (x + 0.5) / f64::from(width);
    let v = 1.0 - (y + 0.5) / f64::from(height);
    Some(Point2::new(2.0 * u - 1.0, 2.0 * v - 1.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn state() -> InputState {
        InputState::new(100, 100, InteractionParams::default())
    }

    #[test]
    fn pixel_centre_convention() {
        let ndc = pixel_to_ndc(49.5, 49.5, 100, 100).unwrap();
        assert_abs_diff_eq!(ndc, Point2::new(0.0, 0.0), epsilon = 1e-12);
        let top_left = pixel_to_ndc(-0.5, -0.5, 100, 100).unwrap();
        assert_abs_diff_eq!(top_left, Point2::new(-1.0, 1.0), epsilon = 1e-12);
        assert!(pixel_to_ndc(0.0, 0.0, 0, 10).is_none());
    }

    #[test]
    fn right_drag_orbits() {
        let mut input = state();
        let mut camera = CameraFrame::new(0.0, 1.0, 3.0);
        let mut stroke = None;
        input.dispatch(AppEvent::MouseMove { x: 10.0, y: 10.0 }, &mut camera, &mut stroke);
        input.dispatch(
            AppEvent::MouseButton { button: MouseButton::Right, pressed: true },
            &mut camera,
            &mut stroke,
        );
        input.dispatch(AppEvent::MouseMove { x: 30.0, y: 20.0 }, &mut camera, &mut stroke);
        assert_abs_diff_eq!(camera.theta(), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(camera.phi(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn scroll_zooms() {
        let mut input = state();
        let mut camera = CameraFrame::new(0.0, 0.0, 3.0);
        input.dispatch(AppEvent::Scroll { dy: 1.0 }, &mut camera, &mut None);
        assert_abs_diff_eq!(camera.radius(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn left_drag_in_draw_mode_records_stroke() {
        let mut input = state();
        let mut camera = CameraFrame::new(0.0, 0.0, 3.0);
        let mut stroke = None;

        input.dispatch(AppEvent::KeyPress(Key::ToggleDraw), &mut camera, &mut stroke);
        assert!(camera.is_fixed());

        input.dispatch(AppEvent::MouseMove { x: 49.5, y: 49.5 }, &mut camera, &mut stroke);
        input.dispatch(
            AppEvent::MouseButton { button: MouseButton::Left, pressed: true },
            &mut camera,
            &mut stroke,
        );
        for i in 1..=9 {
            let t = f64::from(i) * 5.0;
            input.dispatch(AppEvent::MouseMove { x: 49.5 + t, y: 49.5 - t }, &mut camera, &mut stroke);
        }
        assert_eq!(stroke.as_ref().map(StrokeSession::len), Some(10));

        let done = input
            .dispatch(
                AppEvent::MouseButton { button: MouseButton::Left, pressed: false },
                &mut camera,
                &mut stroke,
            )
            .unwrap();
        assert!(stroke.is_none());
        assert_eq!(done.raw.len(), 10);
        assert_abs_diff_eq!(done.raw.points()[0], crate::math::Point3::origin(), epsilon = 1e-9);
    }

    #[test]
    fn left_drag_outside_draw_mode_is_ignored() {
        let mut input = state();
        let mut camera = CameraFrame::new(0.0, 0.0, 3.0);
        let mut stroke = None;
        input.dispatch(
            AppEvent::MouseButton { button: MouseButton::Left, pressed: true },
            &mut camera,
            &mut stroke,
        );
        input.dispatch(AppEvent::MouseMove { x: 1.0, y: 1.0 }, &mut camera, &mut stroke);
        assert!(stroke.is_none());
    }

    #[test]
    fn draw_mode_blocks_orbit() {
        let mut input = state();
        let mut camera = CameraFrame::new(0.0, 0.0, 3.0);
        let mut stroke = None;
        input.dispatch(AppEvent::KeyPress(Key::ToggleDraw), &mut camera, &mut stroke);
        input.dispatch(AppEvent::MouseMove { x: 0.0, y: 0.0 }, &mut camera, &mut stroke);
        input.dispatch(
            AppEvent::MouseButton { button: MouseButton::Right, pressed: true },
            &mut camera,
            &mut stroke,
        );
        input.dispatch(AppEvent::MouseMove { x: 50.0, y: 50.0 }, &mut camera, &mut stroke);
        assert_eq!(camera.theta(), 0.0);

        input.dispatch(AppEvent::KeyPress(Key::ToggleDraw), &mut camera, &mut stroke);
        assert!(!camera.is_fixed());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut input = state();
        input.dispatch(AppEvent::Resize { width: 200, height: 100 }, &mut CameraFrame::default(), &mut None);
        assert_abs_diff_eq!(input.aspect(), 2.0);
    }
}
