//! Relay error types
//!
//! One taxonomy for the whole crate. A clean end-of-stream is not an error
//! (`read_packet` returns `Ok(None)`); a cursor overrun is recovered inside
//! the queue and never surfaces here.

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RelayError>;

/// Error type for relay operations
#[derive(Debug)]
pub enum RelayError {
    /// Authentication or namespace check failed
    ///
    /// Deliberately carries no detail about which check fired.
    Rejected,
    /// Publish claim lost the race: the channel already has a publisher
    Conflict(String),
    /// No live channel under this name
    NotFound(String),
    /// Stream descriptors were already written to the queue
    HeaderAlreadyWritten,
    /// Append on a queue that has been closed
    QueueClosed,
    /// Read or write failure on a session's transport
    Transport(std::io::Error),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Rejected => write!(f, "session rejected"),
            RelayError::Conflict(name) => {
                write!(f, "channel already has a publisher: {}", name)
            }
            RelayError::NotFound(name) => write!(f, "channel not found: {}", name),
            RelayError::HeaderAlreadyWritten => write!(f, "stream header already written"),
            RelayError::QueueClosed => write!(f, "queue is closed"),
            RelayError::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RelayError {
    fn from(e: std::io::Error) -> Self {
        RelayError::Transport(e)
    }
}
