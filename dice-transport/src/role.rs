use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of this endpoint in the DTLS handshake.
///
/// Negotiated once by the session layer (for SDP, per
/// <https://tools.ietf.org/html/rfc5763> `setup` attributes) and immutable
/// after the handshake begins.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtlsRole {
    /// Acts as the DTLS client: sends the initial ClientHello.
    #[serde(rename = "client")]
    Client,

    /// Acts as the DTLS server: waits for the peer's ClientHello.
    #[serde(rename = "server")]
    Server,
}

impl fmt::Display for DtlsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DtlsRole::Client => write!(f, "client"),
            DtlsRole::Server => write!(f, "server"),
        }
    }
}
