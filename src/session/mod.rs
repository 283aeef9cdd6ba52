//! Session seam and publish/play orchestration
//!
//! A [`Session`] is the already-handshaken transport/protocol collaborator:
//! something that turned a raw connection into a stream of typed media
//! packets. The relay never sees wire framing; it drives a session against a
//! channel through this trait. [`handle_publish`] and [`handle_play`] are
//! the two orchestration loops, one tokio task each, with no pump tasks in
//! between.

mod play;
mod publish;
mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use play::handle_play;
pub use publish::handle_publish;
pub use state::{PlayPhase, PublishPhase};

use std::future::Future;
use std::net::SocketAddr;

use crate::error::Result;
use crate::packet::{Packet, StreamDescriptor};

/// Role a session asks for during its handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRole {
    /// The session will produce packets into a channel
    Publish,
    /// The session will consume packets from a channel
    Play,
}

/// What the protocol layer learned from the handshake
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Requested channel path, e.g. "/live/garden"
    pub path: String,
    /// Access token extracted by the protocol layer, if the peer sent one
    pub token: Option<String>,
    /// Stream descriptors announced by a publisher; empty for players
    pub streams: Vec<StreamDescriptor>,
}

/// An established media session, publisher or player
///
/// Implemented by the transport layer (and by test doubles). `read_packet`
/// returns `Ok(None)` on a clean end-of-stream; transport failures are
/// errors. All methods are driven from the session's own task.
pub trait Session: Send {
    /// Address of the remote peer, for logging
    fn remote_address(&self) -> SocketAddr;

    /// Complete the protocol handshake for the given role
    fn handshake(
        &mut self,
        role: SessionRole,
    ) -> impl Future<Output = Result<SessionInfo>> + Send;

    /// Read the next packet from a publishing peer
    fn read_packet(&mut self) -> impl Future<Output = Result<Option<Packet>>> + Send;

    /// Send the stream descriptors to a playing peer
    fn write_header(
        &mut self,
        streams: &[StreamDescriptor],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Send a packet to a playing peer
    fn write_packet(&mut self, packet: Packet) -> impl Future<Output = Result<()>> + Send;

    /// Tear down the underlying connection
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
