use thiserror::Error;

/// The error taxonomy shared by all crates in the workspace.
///
/// Configuration and data-shape problems are raised when a chart is
/// constructed, before any frame is rendered. Backend failures surface
/// from the render or encode step.
#[derive(Debug, Clone, Error)]
pub enum ChartError {
    /// A parameter or input does not satisfy its contract
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Tables or categories do not line up with each other
    #[error("data shape mismatch: {0}")]
    DataShape(String),

    /// The rendering or encoding backend failed
    #[error("render backend: {0}")]
    Backend(String),
}

/// Convenience alias used throughout the workspace
pub type Result<T> = std::result::Result<T, ChartError>;
