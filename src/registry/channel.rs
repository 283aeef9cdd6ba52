//! Per-channel state

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::packet::StreamDescriptor;
use crate::queue::{Cursor, DurationQueue};

/// A named live stream: one publisher's queue plus its stream metadata
///
/// Created only through a successful publish claim and removed from the
/// registry when the publishing session ends. Players that are still
/// attached at that point keep their cursors and drain the closed queue to
/// its natural end.
pub struct Channel {
    name: String,
    streams: Arc<[StreamDescriptor]>,
    has_audio: bool,
    has_video: bool,
    queue: DurationQueue,
}

impl Channel {
    pub(super) async fn new(
        name: &str,
        streams: Vec<StreamDescriptor>,
        target_duration: Duration,
    ) -> Result<Self> {
        let streams: Arc<[StreamDescriptor]> = streams.into();
        let has_audio = streams.iter().any(|s| s.is_audio());
        let has_video = streams.iter().any(|s| s.is_video());

        let queue = DurationQueue::new(target_duration);
        queue.write_header(Arc::clone(&streams)).await?;

        Ok(Self {
            name: name.to_string(),
            streams,
            has_audio,
            has_video,
            queue,
        })
    }

    /// Channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stream descriptors captured at publish start
    ///
    /// Fixed for the lifetime of this channel; a new publish session gets a
    /// new channel and may carry a different set.
    pub fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    /// Whether any descriptor is an audio stream
    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    /// Whether any descriptor is a video stream
    pub fn has_video(&self) -> bool {
        self.has_video
    }

    /// The channel's packet queue
    pub fn queue(&self) -> &DurationQueue {
        &self.queue
    }

    /// Convenience for players: a cursor at the oldest retained packet
    pub async fn new_cursor(&self) -> Cursor {
        self.queue.new_cursor().await
    }

    pub(super) async fn stats(&self) -> ChannelStats {
        ChannelStats {
            has_audio: self.has_audio,
            has_video: self.has_video,
            retained_packets: self.queue.retained().await,
            retained_span: self.queue.span().await,
            cursors: self.queue.cursor_count(),
        }
    }
}

/// Snapshot of a channel's buffering state
#[derive(Debug, Clone)]
pub struct ChannelStats {
    /// Whether the channel carries audio
    pub has_audio: bool,
    /// Whether the channel carries video
    pub has_video: bool,
    /// Packets currently retained in the queue
    pub retained_packets: usize,
    /// Timestamp span of the retained window
    pub retained_span: Duration,
    /// Cursors currently attached
    pub cursors: usize,
}
