//! Channel registry for publish/play routing
//!
//! The registry maps channel names to live [`Channel`]s. Publishing claims a
//! name atomically (create-if-absent under the write lock, never
//! lookup-then-insert), so two racing publishers can never both believe they
//! won. Playing is a read-locked lookup. The lock is only ever held for
//! O(1) map work, never across a blocking read.
//!
//! The registry is an explicit object handed to every session handler, not
//! ambient global state: multiple relay instances can coexist in one process
//! and tests instantiate isolated registries.

mod channel;
mod store;

pub use channel::{Channel, ChannelStats};
pub use store::ChannelRegistry;
