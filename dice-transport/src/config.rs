use std::time::Duration;

pub(crate) const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const DEFAULT_MAX_RETRANSMITS: u32 = 8;
pub(crate) const DEFAULT_INITIAL_RETRANSMIT_DELAY: Duration = Duration::from_secs(1);
pub(crate) const MAX_RETRANSMIT_DELAY: Duration = Duration::from_secs(8);
pub(crate) const DEFAULT_MAX_PIGGYBACK_ATTEMPTS: u32 = 2;
pub(crate) const DEFAULT_STASH_MAX_PACKETS: usize = 8;
pub(crate) const DEFAULT_STASH_MAX_BYTES: usize = 16 * 1024;
pub(crate) const DEFAULT_BRIDGE_CAPACITY: usize = 64;

/// Configuration of a [`DtlsTransport`](crate::transport::DtlsTransport),
/// passed at construction.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Name of the underlying transport, used in log output.
    pub transport_name: String,

    /// ICE component this transport runs on (1 for RTP).
    pub component: u16,

    /// Whether outbound handshake flights may be embedded in connectivity
    /// checks to save a round trip. Peer support is probed at runtime; when
    /// the peer does not answer with embedded data the transport degrades to
    /// ordinary datagrams.
    pub enable_piggybacking: bool,

    /// Budget for the supplemental flight retransmit that runs while
    /// piggybacking is in use. Exhausting it fails the handshake.
    pub max_retransmits: u32,

    /// Delay before the first supplemental retransmit; doubles per attempt.
    pub initial_retransmit_delay: Duration,

    /// Hard deadline for the whole handshake once it has started.
    pub handshake_timeout: Duration,

    /// Binding responses without embedded data or acks tolerated before the
    /// peer is assumed not to support piggybacking.
    pub max_piggyback_attempts: u32,

    /// Bounds of the pre-handshake packet stash.
    pub stash_max_packets: usize,
    pub stash_max_bytes: usize,

    /// Inbound packet capacity of the stream bridge.
    pub bridge_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            transport_name: String::new(),
            component: 1,
            enable_piggybacking: false,
            max_retransmits: DEFAULT_MAX_RETRANSMITS,
            initial_retransmit_delay: DEFAULT_INITIAL_RETRANSMIT_DELAY,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            max_piggyback_attempts: DEFAULT_MAX_PIGGYBACK_ATTEMPTS,
            stash_max_packets: DEFAULT_STASH_MAX_PACKETS,
            stash_max_bytes: DEFAULT_STASH_MAX_BYTES,
            bridge_capacity: DEFAULT_BRIDGE_CAPACITY,
        }
    }
}
