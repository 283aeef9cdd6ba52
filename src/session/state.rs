//! Session phase tracking
//!
//! Explicit lifecycle states for the two handler loops. The phases exist for
//! observability: every transition is logged with the phase name, so a
//! session's progress can be followed from the outside.

/// Lifecycle of a publish session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishPhase {
    /// Checking token and namespace
    Authorizing,
    /// Attempting the atomic registry claim
    ClaimingChannel,
    /// Draining packets into the channel queue
    Streaming,
    /// Removing the channel and closing the queue
    Releasing,
    /// Session torn down after a completed stream
    Closed,
    /// Terminal: auth/namespace failure, empty handshake, or lost claim
    Rejected,
}

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPhase {
    /// Checking token
    Authorizing,
    /// Looking up the requested channel
    Locating,
    /// Pumping filtered packets to the peer
    Streaming,
    /// Session torn down
    Closed,
    /// Terminal: auth failure
    Rejected,
    /// Terminal: no live channel under the requested name
    NotFound,
}

impl std::fmt::Display for PublishPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PublishPhase::Authorizing => "authorizing",
            PublishPhase::ClaimingChannel => "claiming",
            PublishPhase::Streaming => "streaming",
            PublishPhase::Releasing => "releasing",
            PublishPhase::Closed => "closed",
            PublishPhase::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

impl std::fmt::Display for PlayPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlayPhase::Authorizing => "authorizing",
            PlayPhase::Locating => "locating",
            PlayPhase::Streaming => "streaming",
            PlayPhase::Closed => "closed",
            PlayPhase::Rejected => "rejected",
            PlayPhase::NotFound => "notfound",
        };
        f.write_str(name)
    }
}
