use bytes::BytesMut;

/// Send flag requesting unencrypted pass-through for traffic that is already
/// protected (e.g. SRTP packets when the keys were exported to an external
/// media-encryption layer).
pub const FLAG_SRTP_BYPASS: u32 = 1;

/// Class of connectivity-check message a piggybacked payload was carried in,
/// or is about to be attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindingKind {
    Request,
    Response,
}

/// Inbound traffic from the underlying transport.
pub enum DtlsTransportIn {
    /// A raw datagram delivered on the candidate pair.
    Datagram(BytesMut),

    /// Attributes lifted out of a connectivity-check message by the owning
    /// layer: embedded handshake bytes and/or handshake acks. The owner
    /// reports every binding request/response it processes, passing `None`
    /// for absent attributes, so that peer support can be resolved.
    StunBinding {
        kind: BindingKind,
        data: Option<BytesMut>,
        acks: Option<BytesMut>,
    },
}

/// An application send request, the write-side input of the transport.
pub struct SendRequest {
    pub payload: BytesMut,
    /// Bitwise or of `FLAG_*` values.
    pub flags: u32,
}
