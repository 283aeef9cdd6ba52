//! Timestamp renormalization

use crate::packet::Packet;

use super::Filter;

/// Rewrites timestamps so the first forwarded packet reads as zero
///
/// A player's own clock tracking must not see the arbitrary offset inherited
/// from how long the channel has been live. Inter-packet spacing is
/// preserved; only the base shifts.
#[derive(Debug, Default)]
pub struct FixTime {
    start_from_zero: bool,
    base: Option<i64>,
}

impl FixTime {
    /// Create a pass-through instance (no rebasing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance that rebases the stream to start at zero
    pub fn start_from_zero() -> Self {
        Self {
            start_from_zero: true,
            base: None,
        }
    }
}

impl Filter for FixTime {
    fn filter(&mut self, packet: Packet) -> Option<Packet> {
        if !self.start_from_zero {
            return Some(packet);
        }

        let base = *self.base.get_or_insert(packet.timestamp);
        Some(packet.with_timestamp(packet.timestamp - base))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn video(ts: i64) -> Packet {
        Packet::video(0, ts, false, Bytes::from_static(&[0x17]))
    }

    #[test]
    fn test_start_from_zero() {
        let mut fix = FixTime::start_from_zero();

        let out: Vec<i64> = [1000, 1040, 1080]
            .into_iter()
            .filter_map(|ts| fix.filter(video(ts)))
            .map(|p| p.timestamp)
            .collect();

        assert_eq!(out, vec![0, 40, 80]);
    }

    #[test]
    fn test_pass_through_when_disabled() {
        let mut fix = FixTime::new();

        assert_eq!(fix.filter(video(1000)).unwrap().timestamp, 1000);
        assert_eq!(fix.filter(video(1040)).unwrap().timestamp, 1040);
    }
}
