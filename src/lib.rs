pub mod error;
pub mod geometry;
pub mod interaction;
pub mod io;
pub mod math;
pub mod model;
pub mod operations;
pub mod tessellation;
pub mod view;

pub use error::{BlendsurfError, Result};
pub use geometry::{Curve, Vertex};
pub use model::{Mesh, MeshId, Scene, SurfaceParams};
pub use view::CameraFrame;
