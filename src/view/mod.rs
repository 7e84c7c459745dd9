pub mod camera;

pub use camera::{CameraFrame, UpMode};
