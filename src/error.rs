//! Error types for the GFX engine

use thiserror::Error;

/// Errors that can occur while loading, querying or exporting a graph
#[derive(Error, Debug)]
pub enum GfxError {
    /// Malformed or unsupported serialized input
    #[error("Format error: {0}")]
    Format(String),

    /// Document version outside 1.1 / 1.2 / 1.3
    #[error("Unsupported GEXF version: {0}")]
    Version(String),

    /// A referenced node identifier does not exist
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A weighted algorithm met an edge with a negative weight
    #[error("Negative weight {weight} on edge {from} -> {to}")]
    NegativeWeight { from: String, to: String, weight: f64 },

    /// An iterative algorithm exhausted its iteration cap
    #[error("{algorithm} did not converge within {iterations} iterations")]
    Convergence { algorithm: String, iterations: usize },

    /// A caller-supplied argument could not be used (bad glob, bad format name)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration document could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GfxResult<T> = Result<T, GfxError>;

/// Coarse error classification, one per distinct exit behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    Version,
    NodeNotFound,
    NegativeWeight,
    Convergence,
    Io,
    Other,
}

impl ErrorKind {
    /// Stable process exit code for this kind
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Other => 1,
            ErrorKind::Format => 2,
            ErrorKind::Version => 3,
            ErrorKind::NodeNotFound => 4,
            ErrorKind::NegativeWeight => 5,
            ErrorKind::Convergence => 6,
            ErrorKind::Io => 7,
        }
    }
}

impl GfxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GfxError::Format(_) | GfxError::Json(_) => ErrorKind::Format,
            GfxError::Version(_) => ErrorKind::Version,
            GfxError::NodeNotFound(_) => ErrorKind::NodeNotFound,
            GfxError::NegativeWeight { .. } => ErrorKind::NegativeWeight,
            GfxError::Convergence { .. } => ErrorKind::Convergence,
            GfxError::Io(_) => ErrorKind::Io,
            GfxError::InvalidArgument(_) | GfxError::Config(_) => ErrorKind::Other,
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        GfxError::Format(message.into())
    }
}
