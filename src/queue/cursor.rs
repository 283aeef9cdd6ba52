//! Read cursor over a duration queue

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;
use crate::packet::{Packet, PacketSource};

use super::duration::Shared;

/// An independent read position into a channel's packet sequence
///
/// Owned by exactly one reader. Reading suspends the calling task until a
/// packet is available or the queue is closed; the wake comes from the
/// queue's tail signal, never from polling.
///
/// A cursor that falls behind the retained window (the queue evicted entries
/// it had not yet read) is silently re-anchored to the new head. That is a
/// recoverable *overrun*, not an error; it is counted and observable via
/// [`overrun_count`](Cursor::overrun_count).
pub struct Cursor {
    shared: Arc<Shared>,
    tail_rx: watch::Receiver<u64>,
    next_index: u64,
    overruns: u64,
}

impl Cursor {
    pub(super) fn new(shared: Arc<Shared>, tail_rx: watch::Receiver<u64>, next_index: u64) -> Self {
        Self {
            shared,
            tail_rx,
            next_index,
            overruns: 0,
        }
    }

    /// Read the next packet in append order
    ///
    /// Returns `None` once the queue is closed and all retained packets have
    /// been delivered. Never returns the same packet twice; skips packets
    /// only across a counted overrun.
    pub async fn read(&mut self) -> Option<Packet> {
        loop {
            {
                let inner = self.shared.inner.lock().await;

                if self.next_index < inner.head_index {
                    // Eviction passed us by: re-anchor to the oldest retained
                    self.overruns += inner.head_index - self.next_index;
                    self.next_index = inner.head_index;
                }

                if self.next_index < inner.tail_index {
                    let offset = (self.next_index - inner.head_index) as usize;
                    let packet = inner.packets[offset].clone();
                    self.next_index += 1;
                    return Some(packet);
                }

                if inner.closed {
                    return None;
                }
            }

            // No packet at our position yet; suspend until the tail moves or
            // the queue closes. The watch channel reports any bump we missed
            // between releasing the lock and parking here.
            if self.tail_rx.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Number of packets skipped over due to eviction
    pub fn overrun_count(&self) -> u64 {
        self.overruns
    }

    /// Index of the next packet this cursor will read
    pub fn position(&self) -> u64 {
        self.next_index
    }
}

impl PacketSource for Cursor {
    async fn read_packet(&mut self) -> Result<Option<Packet>> {
        Ok(self.read().await)
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.shared.cursors.fetch_sub(1, Ordering::Relaxed);
    }
}
