//! Play session orchestration

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::filter::{FilterChain, FixTime, WaitKeyFrame};
use crate::packet::PacketSource;
use crate::registry::ChannelRegistry;

use super::state::PlayPhase;
use super::{Session, SessionRole};

/// Drive a playing session against the registry until the stream ends
///
/// Looks up the live channel, attaches a cursor at the oldest retained
/// packet, and pumps packets through the per-player filter pipeline:
/// key-frame gating first (only for channels carrying video), then timestamp
/// rebasing anchored to the first emitted packet.
///
/// A missing channel is `NotFound`: reported to the caller, but not a
/// security event.
/// Closing this session never affects the publisher or other players.
pub async fn handle_play<S: Session>(
    registry: &ChannelRegistry,
    config: &RelayConfig,
    mut session: S,
) -> Result<()> {
    let peer = session.remote_address();
    let mut phase = PlayPhase::Authorizing;
    tracing::debug!(peer = %peer, phase = %phase, "play session accepted");

    let info = match session.handshake(SessionRole::Play).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(peer = %peer, error = %e, "play handshake failed");
            session.close().await;
            return Err(e);
        }
    };

    if config.requires_token() && info.token.as_deref() != Some(config.token.as_str()) {
        phase = PlayPhase::Rejected;
        tracing::warn!(channel = %info.path, peer = %peer, phase = %phase, "play forbidden: invalid token");
        session.close().await;
        return Err(RelayError::Rejected);
    }

    phase = PlayPhase::Locating;
    tracing::debug!(channel = %info.path, peer = %peer, phase = %phase, "locating channel");

    let Some(channel) = registry.lookup(&info.path).await else {
        phase = PlayPhase::NotFound;
        tracing::info!(channel = %info.path, peer = %peer, phase = %phase, "play not found");
        session.close().await;
        return Err(RelayError::NotFound(info.path));
    };

    phase = PlayPhase::Streaming;
    tracing::info!(channel = %info.path, peer = %peer, phase = %phase, "play started");

    let cursor = channel.new_cursor().await;
    let mut chain = FilterChain::new(cursor);
    if channel.has_video() {
        chain = chain.push(WaitKeyFrame::new());
    }
    chain = chain.push(FixTime::start_from_zero());

    let result = async {
        session.write_header(channel.streams()).await?;

        loop {
            match chain.read_packet().await? {
                Some(packet) => session.write_packet(packet).await?,
                None => return Ok(()),
            }
        }
    }
    .await;

    if let Err(e) = &result {
        tracing::warn!(channel = %info.path, peer = %peer, error = %e, "play transport error");
    }

    session.close().await;

    phase = PlayPhase::Closed;
    tracing::info!(channel = %info.path, peer = %peer, phase = %phase, "play stopped");

    result
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;

    use crate::packet::{Packet, StreamDescriptor};
    use crate::session::mock::MockSession;

    use super::*;

    fn descriptors() -> Vec<StreamDescriptor> {
        vec![
            StreamDescriptor::video("h264", None),
            StreamDescriptor::audio("aac"),
        ]
    }

    const TARGET: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_not_found() {
        let registry = ChannelRegistry::new();
        let config = RelayConfig::default();

        let (session, observed) = MockSession::player("/live/missing", None);
        let result = handle_play(&registry, &config, session).await;

        assert!(matches!(result, Err(RelayError::NotFound(_))));
        assert!(observed.is_closed());
    }

    #[tokio::test]
    async fn test_rejected_on_bad_token() {
        let registry = ChannelRegistry::new();
        let config = RelayConfig::new().token("s3cret");

        registry
            .claim_publish("/live/a", descriptors(), TARGET)
            .await
            .unwrap();

        let (session, observed) = MockSession::player("/live/a", None);
        let result = handle_play(&registry, &config, session).await;

        assert!(matches!(result, Err(RelayError::Rejected)));
        assert!(observed.is_closed());
        // The channel itself is untouched
        assert!(registry.lookup("/live/a").await.is_some());
    }

    #[tokio::test]
    async fn test_video_playback_starts_at_key_frame_with_zero_base() {
        let registry = ChannelRegistry::new();
        let config = RelayConfig::new().token("s3cret");

        let channel = registry
            .claim_publish("/live/a", descriptors(), TARGET)
            .await
            .unwrap();

        for (ts, key) in [(1000, false), (1040, true), (1080, false)] {
            channel
                .queue()
                .append(Packet::video(0, ts, key, Bytes::from_static(&[0x17])))
                .await
                .unwrap();
        }
        channel.queue().close().await;

        let (session, observed) = MockSession::player("/live/a", Some("s3cret"));
        handle_play(&registry, &config, session).await.unwrap();

        // The mid-GOP prefix is dropped and the zero point anchors to the
        // key frame, not the queue's oldest packet
        assert_eq!(observed.written_timestamps(), vec![0, 40]);

        let header = observed.header().expect("header was written");
        assert_eq!(header.len(), 2);
        assert!(header[0].is_video());
        assert!(observed.is_closed());
    }

    #[tokio::test]
    async fn test_audio_only_channel_has_no_key_frame_gate() {
        let registry = ChannelRegistry::new();
        let config = RelayConfig::default();

        let channel = registry
            .claim_publish("/live/radio", vec![StreamDescriptor::audio("aac")], TARGET)
            .await
            .unwrap();

        for ts in [500, 540, 580] {
            channel
                .queue()
                .append(Packet::audio(0, ts, Bytes::from_static(&[0xaf])))
                .await
                .unwrap();
        }
        channel.queue().close().await;

        let (session, observed) = MockSession::player("/live/radio", None);
        handle_play(&registry, &config, session).await.unwrap();

        assert_eq!(observed.written_timestamps(), vec![0, 40, 80]);
    }

    #[tokio::test]
    async fn test_write_failure_closes_only_this_player() {
        let registry = ChannelRegistry::new();
        let config = RelayConfig::default();

        let channel = registry
            .claim_publish("/live/a", descriptors(), TARGET)
            .await
            .unwrap();
        channel
            .queue()
            .append(Packet::video(0, 0, true, Bytes::from_static(&[0x17])))
            .await
            .unwrap();

        let (session, observed) = MockSession::player("/live/a", None);
        let result = handle_play(&registry, &config, session.fail_writes()).await;

        assert!(matches!(result, Err(RelayError::Transport(_))));
        assert!(observed.is_closed());

        // Publisher side is unaffected
        assert!(registry.lookup("/live/a").await.is_some());
        assert!(!channel.queue().is_closed().await);
    }
}
