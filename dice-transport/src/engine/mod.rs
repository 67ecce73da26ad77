#[cfg(test)]
pub(crate) mod fake;

use bytes::{Bytes, BytesMut};
use std::time::Instant;

use crate::certificate::Certificate;
use crate::role::DtlsRole;
use crate::srtp::SrtpProfile;
use crate::stream_bridge::StreamBridge;
use shared::error::Result;

/// Events surfaced while driving the engine.
pub enum EngineEvent {
    /// The handshake finished. Fingerprint verification is the transport's
    /// job and happens after this event.
    HandshakeComplete,
    /// A decrypted application payload.
    ApplicationData(BytesMut),
}

/// The cryptographic engine running the actual DTLS state machine, treated as
/// a black box behind a stream interface.
///
/// The engine performs no I/O of its own: it pulls inbound datagrams from the
/// [`StreamBridge`] and pushes the records it produces (flights, alerts,
/// encrypted application data) back into it. Record encryption, handshake
/// message parsing and its own per-flight retransmit clock all live behind
/// this trait.
///
/// Fatal handshake failures are returned as errors from [`process`](Self::process)
/// or [`handle_timeout`](Self::handle_timeout); the transport maps them onto
/// its error taxonomy and moves to the failed state.
pub trait HandshakeEngine {
    /// Begins the handshake in the given role. A client engine emits its
    /// first flight into the bridge before returning.
    fn start(
        &mut self,
        role: DtlsRole,
        certificate: &Certificate,
        bridge: &mut StreamBridge,
        now: Instant,
    ) -> Result<()>;

    /// Consumes buffered inbound datagrams from the bridge, advancing the
    /// handshake or decrypting application data.
    fn process(&mut self, bridge: &mut StreamBridge, now: Instant) -> Result<Vec<EngineEvent>>;

    /// Encrypts an application payload into the bridge. Only valid once the
    /// handshake completed.
    fn write(&mut self, data: &[u8], bridge: &mut StreamBridge) -> Result<usize>;

    /// Drives the engine's internal retransmit clock.
    fn handle_timeout(&mut self, now: Instant, bridge: &mut StreamBridge) -> Result<()>;

    /// When the engine next wants [`handle_timeout`](Self::handle_timeout).
    fn poll_timeout(&self) -> Option<Instant>;

    /// Emits a close_notify if appropriate and drops handshake state.
    fn close(&mut self, bridge: &mut StreamBridge);

    /// DER chain presented by the peer; empty until the handshake completed.
    fn peer_certificates(&self) -> Vec<Bytes>;

    /// Negotiated TLS cipher suite, by IANA number.
    fn ssl_cipher_suite(&self) -> Option<u16>;

    /// Negotiated protocol version bytes (e.g. 0xfefd for DTLS 1.2).
    fn ssl_version_bytes(&self) -> Option<u16>;

    /// Signature scheme the peer used, per the IANA TLS SignatureScheme
    /// registry; `None` if not applicable.
    fn peer_signature_algorithm(&self) -> Option<u16>;

    /// SRTP protection profile negotiated through the use_srtp extension.
    fn selected_srtp_profile(&self) -> Option<SrtpProfile>;

    /// Keying material export per RFC 5705. Deterministic for a completed
    /// handshake: the same label and length yield the same bytes.
    fn export_keying_material(&self, label: &str, length: usize) -> Result<Vec<u8>>;
}
