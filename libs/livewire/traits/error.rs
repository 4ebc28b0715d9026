use thiserror::Error;

/// Main error type for livewire
#[derive(Error, Debug)]
pub enum LivewireError {
    /// WebSocket connection error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed unexpectedly
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Frame parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Channel send error
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Liveness probe went unanswered past the configured timeout
    #[error("Liveness timeout: {0}")]
    LivenessTimeout(String),

    /// Generic error
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for livewire operations
pub type Result<T> = std::result::Result<T, LivewireError>;
