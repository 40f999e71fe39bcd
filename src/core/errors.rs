use thiserror::Error;

/// Errors surfaced at the crate boundary.
///
/// Geometry and interaction paths never produce these; they degrade to a
/// no-op instead. Only loading (config, persisted masks, preview bytes) fails.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Decode task failed: {0}")]
    DecodeTask(#[from] tokio::task::JoinError),
}

/// Host command handlers return `Result<T, String>`.
impl From<CanvasError> for String {
    fn from(err: CanvasError) -> Self {
        err.to_string()
    }
}
