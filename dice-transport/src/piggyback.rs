#[cfg(test)]
#[path = "piggyback_test.rs"]
mod piggyback_test;

use bytes::{Bytes, BytesMut};
use log::debug;
use std::collections::BTreeSet;
use std::fmt;

use crate::message::BindingKind;
use crate::record;

/// Whether the peer supports carrying DTLS flights inside connectivity-check
/// messages.
///
/// Starts `Unknown`, resolves to `Supported` on the first confirmed embedded
/// exchange or to `NotSupported` after a bounded number of unanswered
/// attempts, and is terminal once the handshake completes:
/// `CompletedViaPiggyback` if the handshake finished while still embedding,
/// otherwise the state freezes where it was.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PiggybackState {
    #[default]
    Unknown,
    Supported,
    NotSupported,
    CompletedViaPiggyback,
}

impl fmt::Display for PiggybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            PiggybackState::Unknown => "unknown",
            PiggybackState::Supported => "supported",
            PiggybackState::NotSupported => "not-supported",
            PiggybackState::CompletedViaPiggyback => "completed-via-piggyback",
        };
        write!(f, "{s}")
    }
}

/// Decides, per outbound connectivity-check message, whether to attach
/// pending handshake bytes, and extracts embedded handshake bytes from
/// inbound messages.
///
/// Embedding is opportunistic: the controller never delays or blocks a
/// connectivity check, it only offers data when asked. When the peer turns
/// out not to support embedding the handshake degrades to ordinary datagrams.
pub struct PiggybackController {
    state: PiggybackState,
    handshake_complete: bool,

    /// Latest unacknowledged outbound flight, cached for embedding.
    pending_flight: Option<Bytes>,
    /// `message_seq` values the cached flight carries; once the peer has
    /// acked all of them the flight is dropped.
    pending_seqs: Vec<u16>,

    /// Handshake messages received so far, acked back to the peer.
    received_seqs: BTreeSet<u16>,

    /// Binding responses seen without embedded data or acks while support was
    /// still unknown.
    unanswered: u32,
    max_unanswered: u32,
}

impl PiggybackController {
    pub fn new(max_unanswered: u32) -> Self {
        Self {
            state: PiggybackState::default(),
            handshake_complete: false,
            pending_flight: None,
            pending_seqs: vec![],
            received_seqs: BTreeSet::new(),
            unanswered: 0,
            max_unanswered,
        }
    }

    pub fn state(&self) -> PiggybackState {
        self.state
    }

    /// Whether flights should still be captured for embedding.
    pub fn is_embedding(&self) -> bool {
        !self.handshake_complete
            && matches!(
                self.state,
                PiggybackState::Unknown | PiggybackState::Supported
            )
    }

    /// Caches an outbound flight so it can ride inside the next
    /// connectivity-check message.
    pub fn capture_flight(&mut self, packet: &[u8]) {
        if !self.is_embedding() {
            return;
        }
        self.pending_seqs = record::handshake_acks(packet).unwrap_or_default();
        self.pending_flight = Some(Bytes::copy_from_slice(packet));
    }

    /// The cached flight, for the supplemental retransmit.
    pub fn pending_flight(&self) -> Option<&Bytes> {
        self.pending_flight.as_ref()
    }

    /// Handshake bytes to embed in an outbound connectivity-check message,
    /// if any. The final flight keeps riding along after local completion
    /// until the peer acknowledges it.
    pub fn data_to_attach(&mut self, _kind: BindingKind) -> Option<Bytes> {
        if self.state == PiggybackState::NotSupported {
            return None;
        }
        self.pending_flight.clone()
    }

    /// Ack payload to embed in an outbound connectivity-check message. Acks
    /// keep flowing after completion so the peer's final flight stops
    /// retransmitting.
    pub fn ack_to_attach(&mut self, _kind: BindingKind) -> Option<Bytes> {
        if self.state == PiggybackState::NotSupported || self.received_seqs.is_empty() {
            return None;
        }
        let seqs: Vec<u16> = self.received_seqs.iter().copied().collect();
        Some(Bytes::from(record::encode_acks(&seqs)))
    }

    /// Reports the piggyback attributes of an inbound connectivity-check
    /// message; the owning layer calls this for every binding request and
    /// response it processes, passing `None` for absent attributes.
    ///
    /// Returns embedded handshake bytes that must be fed to the stream bridge
    /// before normal processing.
    pub fn report_piggybacked(
        &mut self,
        kind: BindingKind,
        data: Option<&[u8]>,
        acks: Option<&[u8]>,
    ) -> Option<BytesMut> {
        if data.is_none() && acks.is_none() {
            if self.state == PiggybackState::Unknown
                && kind == BindingKind::Response
                && self.pending_flight.is_some()
            {
                self.unanswered += 1;
                if self.unanswered >= self.max_unanswered {
                    debug!("peer does not answer embedded handshake data, disabling piggyback");
                    self.state = PiggybackState::NotSupported;
                    self.pending_flight = None;
                    self.pending_seqs.clear();
                }
            }
            return None;
        }

        if self.state == PiggybackState::Unknown {
            debug!("peer supports dtls-in-stun");
            self.state = PiggybackState::Supported;
        }

        if let Some(ack_bytes) = acks {
            if let Some(acked) = record::decode_acks(ack_bytes) {
                if !self.pending_seqs.is_empty()
                    && self.pending_seqs.iter().all(|seq| acked.contains(seq))
                {
                    // Whole flight acknowledged, nothing left to embed.
                    self.pending_flight = None;
                    self.pending_seqs.clear();
                }
            }
        }

        let payload = data?;
        if let Some(seqs) = record::handshake_acks(payload) {
            self.received_seqs.extend(seqs);
        }
        Some(BytesMut::from(payload))
    }

    /// Terminal transition when the handshake finishes. The cached final
    /// flight is kept until the peer acks it.
    pub fn set_handshake_complete(&mut self) {
        self.handshake_complete = true;
        if self.state == PiggybackState::Supported {
            self.state = PiggybackState::CompletedViaPiggyback;
        }
    }

    /// Stops embedding after a fatal handshake error.
    pub fn set_handshake_failed(&mut self) {
        self.handshake_complete = true;
        self.pending_flight = None;
        self.pending_seqs.clear();
    }
}
