//! Key-frame gate for late joiners

use crate::packet::Packet;

use super::Filter;

/// Drops every packet until the first video key frame is observed
///
/// A decoder fed mid-GOP data cannot produce a valid picture, so a player
/// joining a live channel is fast-forwarded to the next decode start point.
/// Only added to a pipeline when the channel carries video.
#[derive(Debug, Default)]
pub struct WaitKeyFrame {
    passed: bool,
}

impl WaitKeyFrame {
    /// Create a gate that has not yet seen a key frame
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for WaitKeyFrame {
    fn filter(&mut self, packet: Packet) -> Option<Packet> {
        if !self.passed {
            if !(packet.is_video && packet.is_key_frame) {
                return None;
            }
            self.passed = true;
        }

        Some(packet)
    }
}
