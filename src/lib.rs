//! In-memory live-media relay
//!
//! One publisher per named channel, any number of players, each joining at
//! its own point in time. Packets flow through a duration-windowed queue
//! with independent read cursors, so a late joiner catches up from the
//! buffered backlog (fast-forwarded to a key frame, timestamps rebased to
//! zero) while memory stays bounded no matter how long the stream runs.
//!
//! The wire protocol, codec parsing and transport listener live behind the
//! [`Session`](session::Session) seam; this crate is the relay core:
//! registry, queue, filters, and the publish/play orchestration loops.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use bytes::Bytes;
//! use streamrelay::filter::{FilterChain, FixTime, WaitKeyFrame};
//! use streamrelay::{ChannelRegistry, Packet, PacketSource, StreamDescriptor};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> streamrelay::Result<()> {
//! let registry = ChannelRegistry::new();
//!
//! // The publish side claims a name and appends packets
//! let channel = registry
//!     .claim_publish(
//!         "/live/garden",
//!         vec![StreamDescriptor::video("h264", None)],
//!         Duration::from_secs(2),
//!     )
//!     .await?;
//! channel
//!     .queue()
//!     .append(Packet::video(0, 0, true, Bytes::from_static(&[0x17])))
//!     .await?;
//!
//! // A player attaches at the oldest retained packet, behind its filters
//! let mut player = FilterChain::new(channel.new_cursor().await)
//!     .push(WaitKeyFrame::new())
//!     .push(FixTime::start_from_zero());
//!
//! let first = player.read_packet().await?.expect("a packet is buffered");
//! assert!(first.is_key_frame);
//! assert_eq!(first.timestamp, 0);
//! # registry.release("/live/garden").await;
//! # channel.queue().close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod packet;
pub mod queue;
pub mod registry;
pub mod session;

pub use config::{RelayConfig, DEFAULT_TARGET_DURATION};
pub use error::{RelayError, Result};
pub use packet::{MediaKind, Packet, PacketSource, StreamDescriptor};
pub use queue::{Cursor, DurationQueue};
pub use registry::{Channel, ChannelRegistry, ChannelStats};
pub use session::{handle_play, handle_publish, Session, SessionInfo, SessionRole};
