pub mod bspline;
pub mod curve;
pub mod subdivision;
pub mod vertex;

pub use bspline::BSpline;
pub use curve::Curve;
pub use vertex::{Color, Vertex};
