#[cfg(test)]
#[path = "stash_test.rs"]
mod stash_test;

use bytes::BytesMut;
use std::collections::VecDeque;

/// A small bounded queue of raw handshake packets observed before the local
/// parameters were ready (e.g. the peer's first flight racing ahead of local
/// certificate configuration).
///
/// Packets are replayed in arrival order when the handshake starts, then the
/// stash is cleared. Both the packet count and the byte total are bounded;
/// overflow evicts the oldest entry.
pub struct PacketStash {
    packets: VecDeque<BytesMut>,
    max_packets: usize,
    max_bytes: usize,
    bytes: usize,
}

impl PacketStash {
    pub fn new(max_packets: usize, max_bytes: usize) -> Self {
        Self {
            packets: VecDeque::new(),
            max_packets,
            max_bytes,
            bytes: 0,
        }
    }

    pub fn push(&mut self, packet: BytesMut) {
        self.bytes += packet.len();
        self.packets.push_back(packet);
        while self.packets.len() > self.max_packets || self.bytes > self.max_bytes {
            match self.packets.pop_front() {
                Some(evicted) => self.bytes -= evicted.len(),
                None => break,
            }
        }
    }

    /// Adds the packet unless an identical one is already stashed. Retransmits
    /// of the same flight arrive with identical bytes and should not occupy
    /// additional slots.
    pub fn push_if_unique(&mut self, packet: BytesMut) {
        let hash = fnv1a(&packet);
        if self.packets.iter().any(|p| fnv1a(p) == hash) {
            return;
        }
        self.push(packet);
    }

    /// Removes and returns all stashed packets in arrival order.
    pub fn drain(&mut self) -> Vec<BytesMut> {
        self.bytes = 0;
        self.packets.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.bytes = 0;
        self.packets.clear();
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn byte_len(&self) -> usize {
        self.bytes
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for b in data {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
