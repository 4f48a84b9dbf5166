//! Error types for Trall.

use thiserror::Error;

/// Library-level error type for Trall operations.
#[derive(Error, Debug)]
pub enum TrallError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Catalog directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Uploads are disabled")]
    UploadDisabled,

    #[error("Uploader {0} is not on the allow-list")]
    NotAuthorized(String),

    #[error("Remote file is too large: {advertised} bytes (limit {limit})")]
    TooLarge { advertised: u64, limit: u64 },

    #[error("Remote content is not audio")]
    NotAudio,

    #[error("A file named {0} already exists in the catalog")]
    NameCollision(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Message transport error: {0}")]
    Transport(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl TrallError {
    /// Short user-facing text for errors recovered at the invocation
    /// boundary. Deliberately terse; the full cause goes to the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            TrallError::InvalidPattern(_) => "Invalid search pattern",
            TrallError::DirectoryUnavailable(_) => "The audio catalog is unavailable",
            TrallError::UploadDisabled => "Uploads are disabled",
            TrallError::NotAuthorized(_) => "You are not allowed to upload",
            TrallError::TooLarge { .. } => "That file is too large to upload",
            TrallError::NotAudio => "That link does not point to an audio file",
            TrallError::NameCollision(_) => "A file with that name already exists",
            TrallError::TransferFailed(_) => "Upload failed, see the log for details",
            TrallError::PlaybackFailed(_) => "Playback failed, see the log for details",
            _ => "Something went wrong, see the log for details",
        }
    }
}

/// Result type alias for Trall operations.
pub type Result<T> = std::result::Result<T, TrallError>;
