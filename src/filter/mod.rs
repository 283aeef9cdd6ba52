//! Per-cursor packet filters
//!
//! Filters transform the packet stream a player reads, lazily, at read time.
//! Each cursor gets its own filter instances; nothing here is shared across
//! players or touches the queue itself.
//!
//! Order matters: key-frame gating runs before time rebasing, so the zero
//! point is anchored to the first packet actually emitted to the player, not
//! the queue's raw oldest packet.

mod fix_time;
mod wait_key_frame;

pub use fix_time::FixTime;
pub use wait_key_frame::WaitKeyFrame;

use crate::error::Result;
use crate::packet::{Packet, PacketSource};

/// A single packet transformer
///
/// Returns `None` to drop the packet, or a (possibly rewritten) packet to
/// pass downstream.
pub trait Filter: Send {
    /// Apply the filter to one packet
    fn filter(&mut self, packet: Packet) -> Option<Packet>;
}

/// An ordered filter pipeline over a packet source
///
/// Itself a [`PacketSource`], so orchestration code can pump a filtered
/// cursor and a raw cursor through the same interface.
pub struct FilterChain<S> {
    source: S,
    filters: Vec<Box<dyn Filter>>,
}

impl<S: PacketSource + Send> FilterChain<S> {
    /// Create an empty chain over a source
    pub fn new(source: S) -> Self {
        Self {
            source,
            filters: Vec::new(),
        }
    }

    /// Append a filter to the end of the chain
    pub fn push(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl<S: PacketSource + Send> PacketSource for FilterChain<S> {
    async fn read_packet(&mut self) -> Result<Option<Packet>> {
        'next: loop {
            let Some(mut packet) = self.source.read_packet().await? else {
                return Ok(None);
            };

            for filter in &mut self.filters {
                match filter.filter(packet) {
                    Some(out) => packet = out,
                    None => continue 'next,
                }
            }

            return Ok(Some(packet));
        }
    }
}
