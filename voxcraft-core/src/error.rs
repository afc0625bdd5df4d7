use thiserror::Error;

/// Result type alias for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised by the scene model
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("pop_matrix called with an empty transform stack")]
    StackUnderflow,

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while turning PLY or CSV input into box specs
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("missing or incomplete header")]
    MissingHeader,

    #[error("invalid header at line {line}: {reason}")]
    InvalidHeader { line: usize, reason: String },

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("expected {expected} vertices, found {found}")]
    VertexCount { expected: usize, found: usize },

    #[error("face {face} has zero extent")]
    DegenerateFace { face: usize },

    #[error("grid needs {expected} values, found {found}")]
    GridSize { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
