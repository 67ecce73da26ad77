use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    //Configuration errors: rejected synchronously, no state change.
    #[error("dtls is not active: no local certificate has been set")]
    ErrDtlsNotActive,
    #[error("local certificate cannot be changed once set")]
    ErrCertificateAlreadySet,
    #[error("remote fingerprint cannot change once the handshake has started")]
    ErrFingerprintChangedAfterHandshake,
    #[error("dtls role cannot change once the handshake has started")]
    ErrRoleChangedAfterHandshake,
    #[error("unsupported fingerprint hash algorithm")]
    ErrUnsupportedFingerprintAlgorithm,
    #[error("fingerprint digest length does not match the hash algorithm")]
    ErrInvalidFingerprintLength,
    #[error("malformed fingerprint")]
    ErrInvalidFingerprint,

    //Send-path errors: reported per call, no state change.
    #[error("dtls handshake has not completed")]
    ErrSendBeforeDtlsConnected,
    #[error("dtls transport is in the failed state")]
    ErrTransportFailed,
    #[error("dtls transport is closed")]
    ErrTransportClosed,

    //Fatal handshake errors: move the transport to the failed state.
    #[error("peer did not present a certificate")]
    ErrNoRemoteCertificate,
    #[error("remote certificate does not match the remote fingerprint")]
    ErrNoMatchingCertificateFingerprint,
    #[error("dtls version mismatch")]
    ErrHandshakeVersionMismatch,
    #[error("no mutually supported cipher suite")]
    ErrIncompatibleCipherSuite,
    #[error("dtls handshake timed out")]
    ErrHandshakeTimeout,
    #[error("alert is fatal or close notify")]
    ErrAlertFatalOrClose,

    //Engine/stream errors.
    #[error("dtls handshake has not started")]
    ErrHandshakeNotStarted,
    #[error("dtls handshake already started")]
    ErrHandshakeAlreadyStarted,
    #[error("stream bridge is closed")]
    ErrStreamClosed,
    #[error("no srtp protection profile negotiated")]
    ErrNoSrtpProtectionProfile,
    #[error("tls handshake is in progress")]
    HandshakeInProgress,

    #[error("certificate: {0}")]
    Certificate(String),
    #[error("{0}")]
    Other(String),
}

impl From<rcgen::Error> for Error {
    fn from(e: rcgen::Error) -> Self {
        Error::Certificate(e.to_string())
    }
}
