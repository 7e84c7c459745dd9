//! Builds a vase from synthetic pointer strokes and exports it as OBJ.
//!
//! Usage:
//! ```text
//! cargo run --example sweep                 # writes sweep.obj
//! cargo run --example sweep -- out/vase.obj
//! ```

use std::f64::consts::PI;
use std::path::PathBuf;
use std::process::ExitCode;

use blendsurf::interaction::{AppEvent, FinishedStroke, InputState, InteractionParams, Key, MouseButton};
use blendsurf::{CameraFrame, Mesh, Scene, SurfaceParams};
use tracing::{error, info};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 800;

/// Drags the left button through `pixels` and returns the finished stroke.
fn draw(
    input: &mut InputState,
    camera: &mut CameraFrame,
    pixels: impl IntoIterator<Item = (f64, f64)>,
) -> Option<FinishedStroke> {
    let mut stroke = None;
    let mut pixels = pixels.into_iter();
    let (x, y) = pixels.next()?;
    input.dispatch(AppEvent::MouseMove { x, y }, camera, &mut stroke);
    input.dispatch(AppEvent::MouseButton { button: MouseButton::Left, pressed: true }, camera, &mut stroke);
    for (x, y) in pixels {
        input.dispatch(AppEvent::MouseMove { x, y }, camera, &mut stroke);
    }
    input.dispatch(AppEvent::MouseButton { button: MouseButton::Left, pressed: false }, camera, &mut stroke)
}

/// A wavy vertical profile `side` pixels off the screen centre.
fn profile(side: f64) -> impl Iterator<Item = (f64, f64)> {
    (0..=60).map(move |i| {
        let t = f64::from(i) / 60.0;
        let bulge = 80.0 + 60.0 * (t * PI).sin() - 30.0 * (t * 3.0 * PI).sin().powi(2);
        (400.0 + side * bulge, 650.0 - 500.0 * t)
    })
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("sweep=info".parse().unwrap_or_default())
        .add_directive("blendsurf=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let path = std::env::args().nth(1).map_or_else(|| PathBuf::from("sweep.obj"), PathBuf::from);

    let mut camera = CameraFrame::new(0.0, 0.0, 3.0);
    let mut input = InputState::new(WIDTH, HEIGHT, InteractionParams::default());
    input.dispatch(AppEvent::KeyPress(Key::ToggleDraw), &mut camera, &mut None);

    let (Some(left), Some(right)) = (
        draw(&mut input, &mut camera, profile(-1.0)),
        draw(&mut input, &mut camera, profile(1.0)),
    ) else {
        error!("stroke was not recorded");
        return ExitCode::FAILURE;
    };

    let params = SurfaceParams {
        precision: 120,
        sweep_resolution: 32,
        ..SurfaceParams::default()
    };
    let mut mesh = match Mesh::new(left.control, right.control, left.frame, params) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!(error = %e, "could not build surface");
            return ExitCode::FAILURE;
        }
    };

    // Squash the depth with the surface's own silhouettes pulled inwards.
    if let Some((front, back)) = mesh.pinch_silhouettes() {
        let squash = nalgebra::Matrix4::new_nonuniform_scaling(&nalgebra::Vector3::new(1.0, 1.0, 0.6));
        if let Err(e) = mesh.set_pinch(front.transformed(&squash), back.transformed(&squash), None) {
            error!(error = %e, "pinch rejected");
        }
    }

    let mut scene = Scene::new();
    scene.add(mesh);
    info!(vertices = scene.export_obj().lines().filter(|l| l.starts_with("v ")).count(), "scene ready");

    if scene.save_obj(&path) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
