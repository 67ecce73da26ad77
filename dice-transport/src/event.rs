use std::fmt;

use crate::state::DtlsTransportState;
use shared::error::Error;
use shared::TransportContext;

/// Events from the underlying connectivity-check transport, delivered by the
/// owning layer in arrival order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IceEvent {
    /// The candidate pair became writable or stopped being writable.
    WritableChanged(bool),
    /// The candidate pair started or stopped receiving.
    ReceivingChanged(bool),
    /// The selected candidate pair changed.
    NetworkRouteChanged(TransportContext),
}

/// Classification of a fatal handshake failure, reported exactly once via
/// [`DtlsTransportEvent::HandshakeError`]. The transport does not retry; the
/// owning layer must tear it down and restart negotiation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    VersionMismatch,
    IncompatibleCipherSuite,
    FingerprintMismatch,
    NoRemoteCertificate,
    Timeout,
    Other,
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            HandshakeError::VersionMismatch => "version mismatch",
            HandshakeError::IncompatibleCipherSuite => "incompatible cipher suite",
            HandshakeError::FingerprintMismatch => "fingerprint mismatch",
            HandshakeError::NoRemoteCertificate => "no remote certificate",
            HandshakeError::Timeout => "timeout",
            HandshakeError::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl From<&Error> for HandshakeError {
    fn from(err: &Error) -> Self {
        match err {
            Error::ErrHandshakeVersionMismatch => HandshakeError::VersionMismatch,
            Error::ErrIncompatibleCipherSuite | Error::ErrNoSrtpProtectionProfile => {
                HandshakeError::IncompatibleCipherSuite
            }
            Error::ErrNoMatchingCertificateFingerprint => HandshakeError::FingerprintMismatch,
            Error::ErrNoRemoteCertificate => HandshakeError::NoRemoteCertificate,
            Error::ErrHandshakeTimeout => HandshakeError::Timeout,
            _ => HandshakeError::Other,
        }
    }
}

/// Notifications produced by the transport, polled by the owning layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DtlsTransportEvent {
    StateChange(DtlsTransportState),
    HandshakeError(HandshakeError),
    WritableChanged(bool),
    ReceivingChanged(bool),
    NetworkRouteChanged(TransportContext),
}
