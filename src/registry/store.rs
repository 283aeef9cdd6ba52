//! Channel registry implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::error::{RelayError, Result};
use crate::packet::StreamDescriptor;

use super::channel::{Channel, ChannelStats};

/// Concurrent map from channel name to live channel
///
/// Thread-safe via `RwLock`: many concurrent play lookups, exclusive
/// create/delete. At most one channel entry exists per name at any instant.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, Arc<Channel>>>,
}

impl ChannelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Atomically claim a name for publishing
    ///
    /// Checks for an existing entry and, if absent, constructs and inserts
    /// the channel as a single step under the exclusive lock. Returns
    /// `Conflict` if the name is already live; the existing publisher is
    /// left untouched.
    pub async fn claim_publish(
        &self,
        name: &str,
        streams: Vec<StreamDescriptor>,
        target_duration: Duration,
    ) -> Result<Arc<Channel>> {
        let mut channels = self.channels.write().await;

        if channels.contains_key(name) {
            return Err(RelayError::Conflict(name.to_string()));
        }

        let channel = Arc::new(Channel::new(name, streams, target_duration).await?);
        channels.insert(name.to_string(), Arc::clone(&channel));

        tracing::info!(channel = %name, "channel claimed");

        Ok(channel)
    }

    /// Look up a live channel for playing
    ///
    /// `None` means no channel is currently live under this name; that maps
    /// to "not found", not an error.
    pub async fn lookup(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels.read().await.get(name).cloned()
    }

    /// Remove a channel, performed by the owning publish session on
    /// termination
    ///
    /// Idempotent: releasing an already-released name is a no-op. Returns
    /// whether an entry was removed.
    pub async fn release(&self, name: &str) -> bool {
        let removed = self.channels.write().await.remove(name).is_some();

        if removed {
            tracing::info!(channel = %name, "channel released");
        } else {
            tracing::debug!(channel = %name, "release of absent channel ignored");
        }

        removed
    }

    /// Names of all currently-live channels
    pub async fn channel_names(&self) -> Vec<String> {
        self.channels.read().await.keys().cloned().collect()
    }

    /// Number of currently-live channels
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Buffering snapshot for one channel
    pub async fn channel_stats(&self, name: &str) -> Option<ChannelStats> {
        let channel = self.lookup(name).await?;
        Some(channel.stats().await)
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
