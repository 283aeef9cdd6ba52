//! Packet and stream descriptor types
//!
//! The vocabulary of the relay. A [`Packet`] is immutable once created and is
//! shared by reference between the single writer and all cursors: `Bytes`
//! payloads are reference-counted, so fanning a packet out to N players never
//! copies the media data.

use bytes::Bytes;

use crate::error::Result;

/// A single demuxed media packet
///
/// Timestamps are milliseconds, monotonic within a stream. They may be
/// renormalized per player by the [`FixTime`](crate::filter::FixTime) filter;
/// the packet stored in the queue is never mutated.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Index of the stream this packet belongs to (position in the
    /// channel's descriptor list)
    pub stream_index: usize,
    /// Timestamp in milliseconds
    pub timestamp: i64,
    /// Whether this is a video packet
    pub is_video: bool,
    /// Whether this is an audio packet
    pub is_audio: bool,
    /// Whether this is a video key frame (a valid decode start point)
    pub is_key_frame: bool,
    /// Whether this is an in-band metadata packet
    pub is_metadata: bool,
    /// Packet payload (zero-copy via reference counting)
    pub payload: Bytes,
}

impl Packet {
    /// Create a video packet
    pub fn video(stream_index: usize, timestamp: i64, is_key_frame: bool, payload: Bytes) -> Self {
        Self {
            stream_index,
            timestamp,
            is_video: true,
            is_audio: false,
            is_key_frame,
            is_metadata: false,
            payload,
        }
    }

    /// Create an audio packet
    pub fn audio(stream_index: usize, timestamp: i64, payload: Bytes) -> Self {
        Self {
            stream_index,
            timestamp,
            is_video: false,
            is_audio: true,
            is_key_frame: false,
            is_metadata: false,
            payload,
        }
    }

    /// Create a metadata packet
    pub fn metadata(stream_index: usize, timestamp: i64, payload: Bytes) -> Self {
        Self {
            stream_index,
            timestamp,
            is_video: false,
            is_audio: false,
            is_key_frame: false,
            is_metadata: true,
            payload,
        }
    }

    /// Return a copy with the timestamp replaced
    pub fn with_timestamp(&self, timestamp: i64) -> Self {
        Self {
            timestamp,
            ..self.clone()
        }
    }
}

/// Media type of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Audio stream
    Audio,
    /// Video stream
    Video,
}

/// Per-stream codec metadata, captured once at publish start
///
/// The set of descriptors for a channel is fixed for the lifetime of a
/// publish session; a new set can only appear through a new claim after the
/// previous publisher fully terminated.
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    kind: MediaKind,
    codec_name: String,
    decoder_config: Option<Bytes>,
}

impl StreamDescriptor {
    /// Create an audio stream descriptor
    pub fn audio(codec_name: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Audio,
            codec_name: codec_name.into(),
            decoder_config: None,
        }
    }

    /// Create a video stream descriptor with its decoder configuration record
    pub fn video(codec_name: impl Into<String>, decoder_config: Option<Bytes>) -> Self {
        Self {
            kind: MediaKind::Video,
            codec_name: codec_name.into(),
            decoder_config,
        }
    }

    /// Media type of this stream
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Whether this is an audio stream
    pub fn is_audio(&self) -> bool {
        self.kind == MediaKind::Audio
    }

    /// Whether this is a video stream
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Codec name, e.g. "h264" or "aac"
    pub fn codec_name(&self) -> &str {
        &self.codec_name
    }

    /// Raw decoder configuration blob, if the parsing layer extracted one
    pub fn decoder_config(&self) -> Option<&Bytes> {
        self.decoder_config.as_ref()
    }
}

impl std::fmt::Display for StreamDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MediaKind::Audio => write!(f, "audio/{}", self.codec_name),
            MediaKind::Video => write!(f, "video/{}", self.codec_name),
        }
    }
}

/// Anything that produces an ordered packet stream
///
/// Implemented by the raw [`Cursor`](crate::queue::Cursor) and by
/// [`FilterChain`](crate::filter::FilterChain) wrapping it, so orchestration
/// code depends only on this capability, not on concrete types. `Ok(None)`
/// means end-of-stream.
pub trait PacketSource {
    /// Read the next packet, suspending until one is available
    fn read_packet(&mut self) -> impl std::future::Future<Output = Result<Option<Packet>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_constructors() {
        let key = Packet::video(0, 40, true, Bytes::from_static(&[1, 2, 3]));
        assert!(key.is_video && key.is_key_frame);
        assert!(!key.is_audio && !key.is_metadata);

        let audio = Packet::audio(1, 40, Bytes::from_static(&[4]));
        assert!(audio.is_audio && !audio.is_key_frame);

        let meta = Packet::metadata(0, 0, Bytes::new());
        assert!(meta.is_metadata && !meta.is_video);
    }

    #[test]
    fn test_with_timestamp_preserves_payload() {
        let pkt = Packet::video(0, 1000, true, Bytes::from_static(&[9, 9]));
        let rebased = pkt.with_timestamp(0);

        assert_eq!(rebased.timestamp, 0);
        assert_eq!(rebased.payload, pkt.payload);
        assert!(rebased.is_key_frame);
    }

    #[test]
    fn test_descriptor_kind() {
        let video = StreamDescriptor::video("h264", Some(Bytes::from_static(&[0x01])));
        assert!(video.is_video() && !video.is_audio());
        assert_eq!(video.to_string(), "video/h264");
        assert!(video.decoder_config().is_some());

        let audio = StreamDescriptor::audio("aac");
        assert!(audio.is_audio());
        assert_eq!(audio.to_string(), "audio/aac");
        assert!(audio.decoder_config().is_none());
    }
}
