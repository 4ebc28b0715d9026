use thiserror::Error;

/// Errors surfaced by the notification domain layer
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The service origin could not be mapped to a channel URL
    #[error("invalid service origin: {0}")]
    InvalidOrigin(String),

    /// The subject binding is unusable (empty id)
    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    /// Configuration file could not be read
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for notification domain operations
pub type Result<T> = std::result::Result<T, NotifyError>;
