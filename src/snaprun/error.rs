use thiserror::Error;

/// Everything that can stop a dispatch or a host operation.
///
/// The first three variants are the precondition failures a user sees when a
/// command cannot be sent; their messages are shown verbatim.
#[derive(Error, Debug)]
pub enum SnapError {
    #[error("No active file open.")]
    NoActiveFile,

    #[error("CLI tool path is not set in settings.")]
    ToolPathNotConfigured,

    #[error("Failed to save the current file.")]
    SaveFailed,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapError {
    /// True for the failures detected before anything reaches the session.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SnapError::NoActiveFile | SnapError::ToolPathNotConfigured | SnapError::SaveFailed
        )
    }
}

pub type Result<T> = std::result::Result<T, SnapError>;
