use thiserror::Error;

/// Top-level error type for the blending-surface pipeline.
#[derive(Debug, Error)]
pub enum BlendsurfError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("{what} needs at least {required} points, got {actual}")]
    TooFewPoints {
        what: &'static str,
        required: usize,
        actual: usize,
    },
}

/// Errors related to surface operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Errors related to the mesh scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("mesh not found: {0}")]
    MeshNotFound(String),
}

/// Errors raised while writing exported geometry.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`BlendsurfError`].
pub type Result<T> = std::result::Result<T, BlendsurfError>;
