//! Publish session orchestration

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::registry::ChannelRegistry;

use super::state::PublishPhase;
use super::{Session, SessionRole};

/// Drive a publishing session against the registry until it ends
///
/// Claims the channel atomically, drains the session's packets into the
/// channel queue, and on any termination (clean end, transport error) always
/// releases the name *before* closing the queue: the name becomes
/// immediately reclaimable and every attached player sees an explicit
/// end-of-stream instead of an indefinite block.
///
/// Rejections (bad token, path outside the namespace, empty descriptor set,
/// lost claim) terminate this session without any channel side effects.
pub async fn handle_publish<S: Session>(
    registry: &ChannelRegistry,
    config: &RelayConfig,
    mut session: S,
) -> Result<()> {
    let peer = session.remote_address();
    let mut phase = PublishPhase::Authorizing;
    tracing::debug!(peer = %peer, phase = %phase, "publish session accepted");

    let info = match session.handshake(SessionRole::Publish).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(peer = %peer, error = %e, "publish handshake failed");
            session.close().await;
            return Err(e);
        }
    };

    // Auth failure and namespace mismatch map to the same error so the peer
    // cannot tell which check fired.
    if config.requires_token() && info.token.as_deref() != Some(config.token.as_str()) {
        phase = PublishPhase::Rejected;
        tracing::warn!(channel = %info.path, peer = %peer, phase = %phase, "publish forbidden: invalid token");
        session.close().await;
        return Err(RelayError::Rejected);
    }

    if !info.path.starts_with(&config.app) {
        phase = PublishPhase::Rejected;
        tracing::warn!(channel = %info.path, peer = %peer, phase = %phase, "publish forbidden: path outside namespace");
        session.close().await;
        return Err(RelayError::Rejected);
    }

    if info.streams.is_empty() {
        phase = PublishPhase::Rejected;
        tracing::warn!(channel = %info.path, peer = %peer, phase = %phase, "publish invalid: no streams announced");
        session.close().await;
        return Err(RelayError::Rejected);
    }

    phase = PublishPhase::ClaimingChannel;
    tracing::debug!(channel = %info.path, peer = %peer, phase = %phase, "claiming channel");

    let channel = match registry
        .claim_publish(&info.path, info.streams, config.target_duration)
        .await
    {
        Ok(channel) => channel,
        Err(e) => {
            phase = PublishPhase::Rejected;
            tracing::warn!(channel = %info.path, peer = %peer, phase = %phase, "publish conflict: already publishing");
            session.close().await;
            return Err(e);
        }
    };

    phase = PublishPhase::Streaming;
    tracing::info!(channel = %info.path, peer = %peer, phase = %phase, "publish started");
    for descriptor in channel.streams() {
        tracing::info!(channel = %info.path, stream = %descriptor, "publish stream");
    }

    let result = loop {
        match session.read_packet().await {
            Ok(Some(packet)) => {
                if let Err(e) = channel.queue().append(packet).await {
                    break Err(e);
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => {
                tracing::warn!(channel = %info.path, peer = %peer, error = %e, "publish transport error");
                break Err(e);
            }
        }
    };

    phase = PublishPhase::Releasing;
    tracing::debug!(channel = %info.path, phase = %phase, "releasing channel");

    // Order matters: remove the name first so a new publisher can claim it
    // immediately, then close the queue so players unblock with end-of-stream.
    registry.release(&info.path).await;
    channel.queue().close().await;
    session.close().await;

    phase = PublishPhase::Closed;
    tracing::info!(channel = %info.path, peer = %peer, phase = %phase, "publish stopped");

    result
}
