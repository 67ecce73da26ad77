use bytes::BytesMut;
use log::warn;
use std::collections::VecDeque;

use shared::error::{Error, Result};

/// State of the bridge; `Closed` is terminal, consistent with a best-effort
/// datagram channel.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamState {
    #[default]
    Open,
    Closed,
}

/// A bridge between the packet-oriented transport below and the
/// stream-consuming cryptographic engine above.
///
/// Inbound datagrams are pushed with [`on_packet_received`](Self::on_packet_received)
/// and pulled by the engine with [`read`](Self::read) one datagram at a time,
/// preserving record boundaries. Engine output written with
/// [`write`](Self::write) is queued as discrete packets and drained by the
/// orchestrator with [`poll_transmit`](Self::poll_transmit), which decides
/// whether each packet goes out as its own datagram or rides inside a
/// connectivity check.
///
/// The inbound queue is capacity-limited; overflow under a packet flood drops
/// the oldest entry.
pub struct StreamBridge {
    packets: VecDeque<BytesMut>,
    transmits: VecDeque<BytesMut>,
    capacity: usize,
    state: StreamState,
}

impl StreamBridge {
    pub fn new(capacity: usize) -> Self {
        Self {
            packets: VecDeque::new(),
            transmits: VecDeque::new(),
            capacity,
            state: StreamState::Open,
        }
    }

    /// Push in a packet; this gets pulled out from [`read`](Self::read).
    pub fn on_packet_received(&mut self, packet: BytesMut) -> Result<()> {
        if self.state == StreamState::Closed {
            return Err(Error::ErrStreamClosed);
        }
        if self.packets.len() == self.capacity {
            warn!("stream bridge full, dropping oldest buffered packet");
            self.packets.pop_front();
        }
        self.packets.push_back(packet);
        Ok(())
    }

    /// Next buffered inbound datagram, in arrival order.
    pub fn read(&mut self) -> Option<BytesMut> {
        if self.state == StreamState::Closed {
            return None;
        }
        self.packets.pop_front()
    }

    /// Queue engine output for sending.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.state == StreamState::Closed {
            return Err(Error::ErrStreamClosed);
        }
        self.transmits.push_back(BytesMut::from(data));
        Ok(data.len())
    }

    /// Next outbound packet produced by the engine.
    pub fn poll_transmit(&mut self) -> Option<BytesMut> {
        self.transmits.pop_front()
    }

    /// No-op; the channel below is best-effort.
    pub fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn close(&mut self) {
        self.state = StreamState::Closed;
        self.packets.clear();
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn buffered_packets(&self) -> usize {
        self.packets.len()
    }
}
