use std::fmt;

/// Indicates the state of the DTLS transport.
///
/// The typical connection progresses `New → Connecting → Connected`; a fatal
/// handshake error moves it to `Failed`, an intentional shutdown to `Closed`.
/// `Failed` is terminal: the transport does not self-heal, the owning layer
/// must tear it down and create a new one.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DtlsTransportState {
    /// DTLS has not started negotiating yet.
    #[default]
    New,

    /// DTLS is in the process of negotiating a secure connection and
    /// verifying the remote fingerprint.
    Connecting,

    /// DTLS has completed negotiation of a secure connection and verified the
    /// remote fingerprint.
    Connected,

    /// The transport has been closed intentionally.
    Closed,

    /// The transport has failed as the result of an error, such as receipt of
    /// an error alert or failure to validate the remote fingerprint.
    Failed,
}

const DTLS_TRANSPORT_STATE_NEW_STR: &str = "new";
const DTLS_TRANSPORT_STATE_CONNECTING_STR: &str = "connecting";
const DTLS_TRANSPORT_STATE_CONNECTED_STR: &str = "connected";
const DTLS_TRANSPORT_STATE_CLOSED_STR: &str = "closed";
const DTLS_TRANSPORT_STATE_FAILED_STR: &str = "failed";

impl fmt::Display for DtlsTransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            DtlsTransportState::New => DTLS_TRANSPORT_STATE_NEW_STR,
            DtlsTransportState::Connecting => DTLS_TRANSPORT_STATE_CONNECTING_STR,
            DtlsTransportState::Connected => DTLS_TRANSPORT_STATE_CONNECTED_STR,
            DtlsTransportState::Closed => DTLS_TRANSPORT_STATE_CLOSED_STR,
            DtlsTransportState::Failed => DTLS_TRANSPORT_STATE_FAILED_STR,
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dtls_transport_state_string() {
        let tests = vec![
            (DtlsTransportState::New, "new"),
            (DtlsTransportState::Connecting, "connecting"),
            (DtlsTransportState::Connected, "connected"),
            (DtlsTransportState::Closed, "closed"),
            (DtlsTransportState::Failed, "failed"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string)
        }
    }
}
