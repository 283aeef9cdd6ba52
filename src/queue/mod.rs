//! Duration-windowed packet queue with independent read cursors
//!
//! The queue is the only structure shared between a channel's publisher task
//! and its player tasks. One writer appends; any number of cursors read at
//! their own pace, each starting from the oldest retained packet so a late
//! joiner gets the buffered backlog before live data.
//!
//! # Architecture
//!
//! ```text
//!                    DurationQueue (Arc<Shared>)
//!                ┌──────────────────────────────┐
//!   [Publisher]──► append()  packets: VecDeque  │
//!                │           head_idx..tail_idx │
//!                │           tail watch channel │
//!                └──────┬──────────┬────────────┘
//!                       │          │
//!                       ▼          ▼
//!                  [Cursor]    [Cursor]      one per player,
//!                  read()      read()        clamped to head on overrun
//! ```
//!
//! # Memory bound
//!
//! After every append the head is evicted until the retained window spans no
//! more than the target duration, so memory stays bounded regardless of how
//! long the stream runs. Packets are `Bytes`-backed; eviction drops the
//! queue's reference, not a copy held by a slow reader.

mod cursor;
mod duration;

pub use cursor::Cursor;
pub use duration::DurationQueue;
