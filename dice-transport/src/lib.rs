//! # dice-transport — sans-io DTLS transport
//!
//! A DTLS transport layer in the **sans-I/O** style: it turns an unreliable,
//! packet-oriented connectivity channel (an ICE candidate pair) into a
//! secured, connection-oriented channel, and classifies and forwards
//! application packets (e.g. SRTP media) once the handshake completes.
//!
//! The crate performs no networking, spawns no threads and sets no timers.
//! The owning layer:
//!
//! - delivers inbound datagrams and connectivity-check payloads via
//!   [`Handler::handle_read`](shared::Handler::handle_read),
//! - delivers writability/receiving transitions via
//!   [`Handler::handle_event`](shared::Handler::handle_event),
//! - drains outbound datagrams with [`Handler::poll_write`](shared::Handler::poll_write)
//!   and state/error notifications with [`Handler::poll_event`](shared::Handler::poll_event),
//! - drives time with [`Handler::poll_timeout`](shared::Handler::poll_timeout) /
//!   [`Handler::handle_timeout`](shared::Handler::handle_timeout).
//!
//! Three packet kinds share the one channel and are demultiplexed by the
//! RFC 7983 first-byte convention: DTLS records (`[20..=63]`) are routed into
//! the handshake machinery, everything else is forwarded to the application
//! data sink. The cryptographic engine itself is a black box behind the
//! [`HandshakeEngine`](engine::HandshakeEngine) trait; this layer feeds it
//! through the [`StreamBridge`](stream_bridge::StreamBridge) and handles
//! everything around it: start-once sequencing, packet stashing, the
//! DTLS-in-STUN piggyback optimization, supplemental retransmits, fingerprint
//! verification and SRTP keying-material export.

#![warn(rust_2018_idioms)]

pub mod certificate;
pub mod config;
pub mod engine;
pub mod event;
pub mod fingerprint;
pub mod message;
pub mod piggyback;
pub mod record;
pub mod role;
pub mod srtp;
pub mod stash;
pub mod state;
pub mod stream_bridge;
pub mod transport;

pub use certificate::Certificate;
pub use config::TransportConfig;
pub use engine::{EngineEvent, HandshakeEngine};
pub use event::{DtlsTransportEvent, HandshakeError, IceEvent};
pub use fingerprint::{Fingerprint, HashAlgorithm, RemoteFingerprint};
pub use message::{BindingKind, DtlsTransportIn, SendRequest, FLAG_SRTP_BYPASS};
pub use piggyback::{PiggybackController, PiggybackState};
pub use role::DtlsRole;
pub use srtp::SrtpProfile;
pub use state::DtlsTransportState;
pub use stream_bridge::{StreamBridge, StreamState};
pub use transport::DtlsTransport;
