//! Duration queue implementation

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};

use crate::error::{RelayError, Result};
use crate::packet::{Packet, StreamDescriptor};

use super::cursor::Cursor;

/// Append-only, time-windowed packet sequence with multiple read cursors
///
/// Single-writer: only the owning publish session calls [`write_header`],
/// [`append`] and [`close`]. Cursors only read. Indices once assigned are
/// never reused; eviction advances the head index and never mutates retained
/// entries, which is what makes handing out `Packet` clones to every cursor
/// safe.
///
/// [`write_header`]: DurationQueue::write_header
/// [`append`]: DurationQueue::append
/// [`close`]: DurationQueue::close
pub struct DurationQueue {
    shared: Arc<Shared>,
}

pub(super) struct Shared {
    pub(super) inner: Mutex<Inner>,

    /// Wake-on-write signal: bumped on every append and on close
    pub(super) tail_tx: watch::Sender<u64>,

    /// Number of live cursors, for introspection
    pub(super) cursors: AtomicUsize,
}

pub(super) struct Inner {
    /// Retained packets; front is the oldest
    pub(super) packets: VecDeque<Packet>,

    /// Index of the packet at the front of `packets`
    pub(super) head_index: u64,

    /// Index the next appended packet will receive
    pub(super) tail_index: u64,

    /// Stream descriptors, written once at publish start
    pub(super) streams: Option<Arc<[StreamDescriptor]>>,

    /// No more appends; cursors drain the remainder and then end
    pub(super) closed: bool,

    /// Retention window in milliseconds
    target_millis: i64,
}

impl DurationQueue {
    /// Create a queue with the given target retention duration
    pub fn new(target: Duration) -> Self {
        let (tail_tx, _) = watch::channel(0);

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    packets: VecDeque::new(),
                    head_index: 0,
                    tail_index: 0,
                    streams: None,
                    closed: false,
                    target_millis: target.as_millis() as i64,
                }),
                tail_tx,
                cursors: AtomicUsize::new(0),
            }),
        }
    }

    /// Record the stream descriptors; fails if called twice
    pub async fn write_header(&self, streams: Arc<[StreamDescriptor]>) -> Result<()> {
        let mut inner = self.shared.inner.lock().await;

        if inner.streams.is_some() {
            return Err(RelayError::HeaderAlreadyWritten);
        }
        inner.streams = Some(streams);

        Ok(())
    }

    /// The stream descriptors, if the header has been written
    pub async fn streams(&self) -> Option<Arc<[StreamDescriptor]>> {
        self.shared.inner.lock().await.streams.clone()
    }

    /// Append a packet and evict from the head until the retained window
    /// fits the target duration again
    ///
    /// Wakes every cursor blocked waiting for new data. Fails once the queue
    /// has been closed.
    pub async fn append(&self, packet: Packet) -> Result<()> {
        let tail = {
            let mut inner = self.shared.inner.lock().await;

            if inner.closed {
                return Err(RelayError::QueueClosed);
            }

            inner.packets.push_back(packet);
            inner.tail_index += 1;

            // Evict from the head while the window invariant is violated.
            // The newest packet is always retained, even if it alone exceeds
            // the window.
            while inner.packets.len() > 1 {
                let newest = inner.packets.back().map(|p| p.timestamp).unwrap_or(0);
                let oldest = inner.packets.front().map(|p| p.timestamp).unwrap_or(0);
                if newest.saturating_sub(oldest) <= inner.target_millis {
                    break;
                }
                inner.packets.pop_front();
                inner.head_index += 1;
            }

            inner.tail_index
        };

        // Wake blocked cursors after the lock is released
        let _ = self.shared.tail_tx.send(tail);

        Ok(())
    }

    /// Create a cursor positioned at the current head (oldest retained)
    ///
    /// Not at the tail: a newly joined player receives the buffered backlog
    /// before live data.
    pub async fn new_cursor(&self) -> Cursor {
        let inner = self.shared.inner.lock().await;

        self.shared.cursors.fetch_add(1, Ordering::Relaxed);
        Cursor::new(
            Arc::clone(&self.shared),
            self.shared.tail_tx.subscribe(),
            inner.head_index,
        )
    }

    /// Close the queue, unblocking all waiting cursors with end-of-stream
    ///
    /// Cursors drain the retained packets and then end. Idempotent;
    /// subsequent appends fail.
    pub async fn close(&self) {
        let tail = {
            let mut inner = self.shared.inner.lock().await;
            inner.closed = true;
            inner.tail_index
        };

        let _ = self.shared.tail_tx.send(tail);
    }

    /// Whether the queue has been closed
    pub async fn is_closed(&self) -> bool {
        self.shared.inner.lock().await.closed
    }

    /// Number of currently retained packets
    pub async fn retained(&self) -> usize {
        self.shared.inner.lock().await.packets.len()
    }

    /// Timestamp span between the oldest and newest retained packets
    pub async fn span(&self) -> Duration {
        let inner = self.shared.inner.lock().await;

        match (inner.packets.front(), inner.packets.back()) {
            (Some(oldest), Some(newest)) => {
                Duration::from_millis(newest.timestamp.saturating_sub(oldest.timestamp).max(0) as u64)
            }
            _ => Duration::ZERO,
        }
    }

    /// Number of live cursors attached to this queue
    pub fn cursor_count(&self) -> usize {
        self.shared.cursors.load(Ordering::Relaxed)
    }
}
