
use bytes::{Bytes, BytesMut};
use log::{debug, error, warn};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crate::certificate::Certificate;
use crate::config::{TransportConfig, MAX_RETRANSMIT_DELAY};
use crate::engine::{EngineEvent, HandshakeEngine};
use crate::event::{DtlsTransportEvent, HandshakeError, IceEvent};
use crate::fingerprint::RemoteFingerprint;
use crate::message::{BindingKind, DtlsTransportIn, SendRequest, FLAG_SRTP_BYPASS};
use crate::piggyback::{PiggybackController, PiggybackState};
use crate::record;
use crate::role::DtlsRole;
use crate::srtp::{SrtpProfile, SRTP_EXPORT_LABEL};
use crate::stash::PacketStash;
use crate::state::DtlsTransportState;
use crate::stream_bridge::StreamBridge;
use shared::error::{Error, Result};
use shared::{Handler, TaggedBytesMut, Transmit, TransportContext};

/// A DTLS transport on top of an ICE-style connectivity channel.
///
/// Layering, top to bottom:
///
/// ```text
///   DtlsTransport {
///       Box<dyn HandshakeEngine> engine {
///           StreamBridge bridge   // packets in/out of the engine
///       }
///       PiggybackController       // flights riding inside connectivity checks
///       PacketStash               // flights that arrived too early
///   }
/// ```
///
/// - Inbound datagrams are classified by first byte: DTLS records go into the
///   bridge for the engine, everything else is forwarded to the application
///   data sink ([`Handler::poll_read`]).
/// - Application sends go through the engine once connected, directly to the
///   wire in passthrough mode or with the bypass flag.
/// - Engine output leaves through the bridge and is either sent as datagrams
///   or cached for embedding in connectivity checks.
///
/// DTLS is *active* once a local certificate was set. Without one the
/// transport acts in passthrough mode, forwarding packets unmodified.
///
/// All methods must be called from the single network-processing context that
/// owns the transport; the type is deliberately `!Sync` plain `&mut self`
/// state with no interior locking.
pub struct DtlsTransport {
    config: TransportConfig,
    state: DtlsTransportState,

    dtls_active: bool,
    local_certificate: Option<Certificate>,
    remote_fingerprint: Option<RemoteFingerprint>,
    dtls_role: Option<DtlsRole>,

    engine: Box<dyn HandshakeEngine>,
    engine_started: bool,
    bridge: StreamBridge,
    piggyback: PiggybackController,
    stash: PacketStash,

    ice_writable: bool,
    /// Once true, never reset. DTLS-in-STUN can complete the handshake before
    /// ICE reports writable; this keeps a spurious un-writable transition
    /// distinguishable from "never was writable".
    ice_has_been_writable: bool,
    /// The peer initiated the handshake through an embedded flight.
    piggybacked_hello_seen: bool,

    writable: bool,
    receiving: bool,

    remote_certificates: Vec<Bytes>,

    handshake_deadline: Option<Instant>,
    next_retransmit: Option<Instant>,
    retransmit_delay: Duration,
    retransmit_attempts: u32,

    retransmission_count: u32,
    stun_data_count: u32,
    handshake_error_reported: bool,

    transport: TransportContext,

    events: VecDeque<DtlsTransportEvent>,
    routs: VecDeque<TaggedBytesMut>,
    wouts: VecDeque<TaggedBytesMut>,
}

impl DtlsTransport {
    pub fn new(config: TransportConfig, engine: Box<dyn HandshakeEngine>) -> Self {
        let bridge = StreamBridge::new(config.bridge_capacity);
        let piggyback = PiggybackController::new(config.max_piggyback_attempts);
        let stash = PacketStash::new(config.stash_max_packets, config.stash_max_bytes);
        let retransmit_delay = config.initial_retransmit_delay;

        Self {
            config,
            state: DtlsTransportState::New,
            dtls_active: false,
            local_certificate: None,
            remote_fingerprint: None,
            dtls_role: None,
            engine,
            engine_started: false,
            bridge,
            piggyback,
            stash,
            ice_writable: false,
            ice_has_been_writable: false,
            piggybacked_hello_seen: false,
            writable: false,
            receiving: false,
            remote_certificates: vec![],
            handshake_deadline: None,
            next_retransmit: None,
            retransmit_delay,
            retransmit_attempts: 0,
            retransmission_count: 0,
            stun_data_count: 0,
            handshake_error_reported: false,
            transport: TransportContext::default(),
            events: VecDeque::new(),
            routs: VecDeque::new(),
            wouts: VecDeque::new(),
        }
    }

    /// Setting the local certificate is what makes DTLS active; without one
    /// the transport stays in passthrough mode. Must be called before
    /// [`set_remote_fingerprint`](Self::set_remote_fingerprint). Re-setting
    /// the identical certificate is a no-op; the certificate can never be
    /// replaced.
    pub fn set_local_certificate(&mut self, certificate: &Certificate) -> Result<()> {
        if let Some(existing) = &self.local_certificate {
            if existing == certificate {
                return Ok(());
            }
            return Err(Error::ErrCertificateAlreadySet);
        }
        self.local_certificate = Some(certificate.clone());
        self.dtls_active = true;
        Ok(())
    }

    pub fn local_certificate(&self) -> Option<&Certificate> {
        self.local_certificate.as_ref()
    }

    /// DTLS is active if a local certificate was set. Otherwise the transport
    /// forwards packets unmodified.
    pub fn is_dtls_active(&self) -> bool {
        self.dtls_active
    }

    /// Fixes this side's handshake role. The role is negotiated once by the
    /// session layer and cannot change after the handshake begins.
    pub fn set_dtls_role(&mut self, now: Instant, role: DtlsRole) -> Result<()> {
        if let Some(existing) = self.dtls_role {
            if existing == role {
                return Ok(());
            }
            if self.engine_started {
                return Err(Error::ErrRoleChangedAfterHandshake);
            }
        }
        self.dtls_role = Some(role);
        self.maybe_start_dtls(now)
    }

    pub fn dtls_role(&self) -> Option<DtlsRole> {
        self.dtls_role
    }

    /// Supplies the peer's certificate digest from the signaling channel and
    /// triggers the handshake once every prerequisite is met. Must be called
    /// after [`set_local_certificate`](Self::set_local_certificate).
    /// Re-setting the identical digest is a no-op; a different digest is
    /// rejected once the handshake has started.
    pub fn set_remote_fingerprint(
        &mut self,
        now: Instant,
        algorithm: &str,
        digest: &[u8],
    ) -> Result<()> {
        if !self.dtls_active {
            return Err(Error::ErrDtlsNotActive);
        }
        let fingerprint = RemoteFingerprint::new(algorithm, digest)?;
        if let Some(existing) = &self.remote_fingerprint {
            if *existing == fingerprint {
                return Ok(());
            }
            if self.engine_started {
                return Err(Error::ErrFingerprintChangedAfterHandshake);
            }
        }
        self.remote_fingerprint = Some(fingerprint);
        self.maybe_start_dtls(now)
    }

    pub fn remote_fingerprint(&self) -> Option<&RemoteFingerprint> {
        self.remote_fingerprint.as_ref()
    }

    /// Richer form of [`set_remote_fingerprint`](Self::set_remote_fingerprint)
    /// that also fixes this side's role. Validates everything before mutating
    /// any state.
    pub fn set_remote_parameters(
        &mut self,
        now: Instant,
        algorithm: &str,
        digest: &[u8],
        role: Option<DtlsRole>,
    ) -> Result<()> {
        if !self.dtls_active {
            return Err(Error::ErrDtlsNotActive);
        }
        let fingerprint = RemoteFingerprint::new(algorithm, digest)?;
        if self.engine_started {
            if let Some(existing) = &self.remote_fingerprint {
                if *existing != fingerprint {
                    return Err(Error::ErrFingerprintChangedAfterHandshake);
                }
            }
            if let (Some(role), Some(existing)) = (role, self.dtls_role) {
                if role != existing {
                    return Err(Error::ErrRoleChangedAfterHandshake);
                }
            }
        }

        if let Some(role) = role {
            self.set_dtls_role(now, role)?;
        }
        self.set_remote_fingerprint(now, algorithm, digest)
    }

    /// Sends an application packet according to the current mode: forwarded
    /// unmodified in passthrough mode or with [`FLAG_SRTP_BYPASS`], encrypted
    /// through the engine once connected, rejected otherwise.
    pub fn send_packet(&mut self, now: Instant, payload: &[u8], flags: u32) -> Result<usize> {
        if !self.dtls_active {
            self.push_wout(now, BytesMut::from(payload));
            return Ok(payload.len());
        }

        match self.state {
            DtlsTransportState::Failed => Err(Error::ErrTransportFailed),
            DtlsTransportState::Closed => Err(Error::ErrTransportClosed),
            DtlsTransportState::Connected if flags & FLAG_SRTP_BYPASS == 0 => {
                let written = self.engine.write(payload, &mut self.bridge)?;
                self.flush_bridge(now);
                Ok(written)
            }
            _ if flags & FLAG_SRTP_BYPASS != 0 => {
                self.push_wout(now, BytesMut::from(payload));
                Ok(payload.len())
            }
            _ => Err(Error::ErrSendBeforeDtlsConnected),
        }
    }

    /// Stops and closes the transport. Further sends fail fast.
    pub fn stop(&mut self, now: Instant) -> Result<()> {
        if self.state == DtlsTransportState::Closed {
            return Ok(());
        }
        if self.engine_started {
            self.engine.close(&mut self.bridge);
            self.flush_bridge(now);
        }
        self.bridge.close();
        self.handshake_deadline = None;
        self.next_retransmit = None;
        self.set_dtls_state(DtlsTransportState::Closed);
        self.set_writable(false);
        Ok(())
    }

    pub fn state(&self) -> DtlsTransportState {
        self.state
    }

    /// Tells if the DTLS handshake has finished. This may be true while
    /// [`writable`](Self::writable) is still false, when the handshake rode
    /// in on connectivity checks before ICE reported writable.
    pub fn is_dtls_connected(&self) -> bool {
        self.state == DtlsTransportState::Connected
    }

    pub fn writable(&self) -> bool {
        self.writable
    }

    pub fn receiving(&self) -> bool {
        self.receiving
    }

    /// Negotiated TLS cipher suite, by IANA number.
    pub fn ssl_cipher_suite(&self) -> Option<u16> {
        self.engine.ssl_cipher_suite()
    }

    /// Negotiated protocol version bytes (e.g. 0xfefd for DTLS 1.2).
    pub fn ssl_version_bytes(&self) -> Option<u16> {
        self.engine.ssl_version_bytes()
    }

    /// Signature scheme used by the peer, per the IANA TLS SignatureScheme
    /// registry.
    pub fn ssl_peer_signature_algorithm(&self) -> Option<u16> {
        self.engine.peer_signature_algorithm()
    }

    /// SRTP protection profile negotiated through the use_srtp extension.
    pub fn srtp_profile(&self) -> Option<SrtpProfile> {
        self.engine.selected_srtp_profile()
    }

    /// Certificate chain presented by the remote peer, empty until the
    /// handshake completed and the fingerprint was verified.
    pub fn remote_ssl_certificates(&self) -> &[Bytes] {
        &self.remote_certificates
    }

    /// Extracts the keys negotiated during the DTLS handshake for use by an
    /// external SRTP layer. Length is fixed by the negotiated profile; the
    /// result is deterministic for a completed handshake.
    pub fn export_srtp_keying_material(&self) -> Result<Vec<u8>> {
        if self.state != DtlsTransportState::Connected {
            return Err(Error::HandshakeInProgress);
        }
        let profile = self
            .engine
            .selected_srtp_profile()
            .ok_or(Error::ErrNoSrtpProtectionProfile)?;
        self.engine
            .export_keying_material(SRTP_EXPORT_LABEL, profile.keying_material_len())
    }

    /// Number of times the supplemental flight retransmit has fired.
    pub fn retransmission_count(&self) -> u32 {
        self.retransmission_count
    }

    /// Number of times handshake data has been received inside a
    /// connectivity-check message.
    pub fn stun_data_count(&self) -> u32 {
        self.stun_data_count
    }

    // Piggyback capability queries, for diagnostics and testing.
    pub fn piggyback_state(&self) -> PiggybackState {
        self.piggyback.state()
    }

    pub fn is_piggyback_supported_by_peer(&self) -> bool {
        matches!(
            self.piggyback.state(),
            PiggybackState::Supported | PiggybackState::CompletedViaPiggyback
        )
    }

    pub fn was_completed_by_piggybacking(&self) -> bool {
        self.piggyback.state() == PiggybackState::CompletedViaPiggyback
    }

    /// Handshake bytes to embed in the outbound connectivity-check message
    /// the owning layer is about to send, if any.
    pub fn piggyback_data_to_attach(&mut self, kind: BindingKind) -> Option<Bytes> {
        if !self.config.enable_piggybacking {
            return None;
        }
        self.piggyback.data_to_attach(kind)
    }

    /// Ack payload to embed in the outbound connectivity-check message.
    pub fn piggyback_ack_to_attach(&mut self, kind: BindingKind) -> Option<Bytes> {
        if !self.config.enable_piggybacking {
            return None;
        }
        self.piggyback.ack_to_attach(kind)
    }

    fn handle_packet(&mut self, now: Instant, data: BytesMut) -> Result<()> {
        if data.is_empty() {
            error!("{self}: drop invalid packet due to zero length");
            return Ok(());
        }
        if !self.dtls_active {
            // Passthrough: forward unmodified, no encryption.
            self.push_rout(now, data);
            return Ok(());
        }
        if record::is_dtls_packet(&data) {
            self.handle_dtls_packet(now, data)
        } else {
            debug!("{self}: forwarding non-dtls packet to the data sink");
            self.push_rout(now, data);
            Ok(())
        }
    }

    fn handle_stun_binding(
        &mut self,
        now: Instant,
        kind: BindingKind,
        data: Option<BytesMut>,
        acks: Option<BytesMut>,
    ) -> Result<()> {
        if !self.config.enable_piggybacking {
            debug!("{self}: piggybacking disabled, ignoring embedded attributes");
            return Ok(());
        }
        let payload =
            self.piggyback
                .report_piggybacked(kind, data.as_deref(), acks.as_deref());
        if let Some(payload) = payload {
            self.stun_data_count += 1;
            if !self.engine_started && record::is_client_hello(&payload) {
                self.piggybacked_hello_seen = true;
            }
            self.handle_dtls_packet(now, payload)?;
            self.maybe_start_dtls(now)?;
        }
        Ok(())
    }

    fn handle_dtls_packet(&mut self, now: Instant, data: BytesMut) -> Result<()> {
        if self.engine_started {
            if let Err(err) = self.bridge.on_packet_received(data) {
                debug!("{self}: dropping dtls packet: {err}");
                return Ok(());
            }
            self.drive_engine(now);
            return Ok(());
        }

        if record::is_client_hello(&data) {
            // The peer's first flight raced ahead of our configuration;
            // stash it for replay once the handshake starts.
            debug!("{self}: caching client hello received before handshake start");
            self.stash.push_if_unique(data);
            self.maybe_start_dtls(now)
        } else {
            debug!("{self}: dropping dtls record received before handshake start");
            Ok(())
        }
    }

    /// Begins the handshake exactly once, when the cryptographic parameters
    /// are set and either the underlying transport is writable or the
    /// handshake can ride inside connectivity checks.
    fn maybe_start_dtls(&mut self, now: Instant) -> Result<()> {
        if self.engine_started || self.state != DtlsTransportState::New {
            return Ok(());
        }
        if !self.dtls_active
            || self.remote_fingerprint.is_none()
            || self.dtls_role.is_none()
        {
            return Ok(());
        }
        let can_start = self.ice_writable
            || self.piggybacked_hello_seen
            || self.config.enable_piggybacking;
        if !can_start {
            return Ok(());
        }
        self.start_dtls(now);
        Ok(())
    }

    fn start_dtls(&mut self, now: Instant) {
        let (Some(role), Some(certificate)) = (self.dtls_role, self.local_certificate.as_ref())
        else {
            return;
        };
        debug!(
            "DtlsTransport[{}|{}]: starting dtls handshake as {role}",
            self.config.transport_name, self.config.component
        );

        if let Err(err) = self
            .engine
            .start(role, certificate, &mut self.bridge, now)
        {
            error!("{self}: failed to start dtls handshake: {err}");
            self.fail_handshake(&err);
            return;
        }

        self.engine_started = true;
        self.set_dtls_state(DtlsTransportState::Connecting);
        self.handshake_deadline = Some(now + self.config.handshake_timeout);
        self.retransmit_delay = self.config.initial_retransmit_delay;

        // Replay stashed packets in arrival order, then the stash stays
        // empty; future packets take the normal path.
        for packet in self.stash.drain() {
            let _ = self.bridge.on_packet_received(packet);
        }
        self.drive_engine(now);
    }

    fn drive_engine(&mut self, now: Instant) {
        let events = match self.engine.process(&mut self.bridge, now) {
            Ok(events) => events,
            Err(err) => {
                error!("{self}: dtls engine error: {err}");
                self.fail_handshake(&err);
                return;
            }
        };
        // Flush before acting on completion so a final flight produced in the
        // same pass is still captured for embedding.
        self.flush_bridge(now);
        for event in events {
            match event {
                EngineEvent::HandshakeComplete => self.on_handshake_complete(),
                EngineEvent::ApplicationData(data) => {
                    debug!("{self}: decrypted application data, {} bytes", data.len());
                    self.push_rout(now, data);
                }
            }
        }
    }

    /// Routes engine output: while connecting with piggybacking in play the
    /// flight is cached for embedding; datagrams only go out while the
    /// underlying transport is writable, otherwise the engine's own
    /// retransmit clock recovers once it is.
    fn flush_bridge(&mut self, now: Instant) {
        while let Some(packet) = self.bridge.poll_transmit() {
            if self.state == DtlsTransportState::Connecting
                && self.config.enable_piggybacking
                && self.piggyback.is_embedding()
            {
                self.piggyback.capture_flight(&packet);
                self.retransmit_attempts = 0;
                self.retransmit_delay = self.config.initial_retransmit_delay;
                self.next_retransmit = Some(now + self.retransmit_delay);
                if self.ice_writable {
                    self.push_wout(now, packet);
                } else {
                    debug!("{self}: holding dtls flight for piggybacking");
                }
            } else if self.ice_writable || self.state == DtlsTransportState::Connected {
                self.push_wout(now, packet);
            } else {
                warn!("{self}: dropping dtls packet, transport not writable");
            }
        }
    }

    fn on_handshake_complete(&mut self) {
        if self.state == DtlsTransportState::Connected {
            return;
        }

        let chain = self.engine.peer_certificates();
        if chain.is_empty() {
            self.fail_handshake(&Error::ErrNoRemoteCertificate);
            return;
        }
        let verified = match &self.remote_fingerprint {
            Some(fingerprint) => fingerprint.matches(&chain[0]),
            None => false,
        };
        if !verified {
            error!("{self}: remote certificate does not match the fingerprint");
            self.fail_handshake(&Error::ErrNoMatchingCertificateFingerprint);
            return;
        }

        debug!("{self}: dtls handshake complete");
        self.remote_certificates = chain;
        self.piggyback.set_handshake_complete();
        self.handshake_deadline = None;
        self.next_retransmit = None;
        self.set_dtls_state(DtlsTransportState::Connected);
        if self.ice_has_been_writable {
            self.set_writable(true);
        }
    }

    fn fail_handshake(&mut self, err: &Error) {
        if matches!(
            self.state,
            DtlsTransportState::Failed | DtlsTransportState::Closed
        ) {
            return;
        }
        error!("{self}: dtls handshake failed: {err}");
        self.piggyback.set_handshake_failed();
        self.handshake_deadline = None;
        self.next_retransmit = None;
        self.bridge.close();
        self.set_dtls_state(DtlsTransportState::Failed);
        if !self.handshake_error_reported {
            self.handshake_error_reported = true;
            self.events
                .push_back(DtlsTransportEvent::HandshakeError(HandshakeError::from(err)));
        }
        self.set_writable(false);
    }

    fn set_dtls_state(&mut self, state: DtlsTransportState) {
        if self.state == state {
            return;
        }
        debug!("{self}: state change {} -> {state}", self.state);
        self.state = state;
        self.events
            .push_back(DtlsTransportEvent::StateChange(state));
    }

    fn set_writable(&mut self, writable: bool) {
        if self.writable == writable {
            return;
        }
        debug!("{self}: writable -> {writable}");
        self.writable = writable;
        self.events
            .push_back(DtlsTransportEvent::WritableChanged(writable));
    }

    fn set_receiving(&mut self, receiving: bool) {
        if self.receiving == receiving {
            return;
        }
        debug!("{self}: receiving -> {receiving}");
        self.receiving = receiving;
        self.events
            .push_back(DtlsTransportEvent::ReceivingChanged(receiving));
    }

    fn push_rout(&mut self, now: Instant, message: BytesMut) {
        self.routs.push_back(TaggedBytesMut {
            now,
            transport: self.transport,
            message,
        });
    }

    fn push_wout(&mut self, now: Instant, message: BytesMut) {
        self.wouts.push_back(TaggedBytesMut {
            now,
            transport: self.transport,
            message,
        });
    }
}

impl Handler for DtlsTransport {
    type Ein = IceEvent;
    type Eout = DtlsTransportEvent;
    type Rin = DtlsTransportIn;
    type Rout = BytesMut;
    type Win = SendRequest;
    type Wout = BytesMut;

    fn handle_read(&mut self, msg: Transmit<Self::Rin>) -> Result<()> {
        self.transport = msg.transport;
        match msg.message {
            DtlsTransportIn::Datagram(data) => self.handle_packet(msg.now, data),
            DtlsTransportIn::StunBinding { kind, data, acks } => {
                self.handle_stun_binding(msg.now, kind, data, acks)
            }
        }
    }

    fn poll_read(&mut self) -> Option<Transmit<Self::Rout>> {
        self.routs.pop_front()
    }

    fn handle_write(&mut self, msg: Transmit<Self::Win>) -> Result<()> {
        let SendRequest { payload, flags } = msg.message;
        self.send_packet(msg.now, &payload, flags)?;
        Ok(())
    }

    fn poll_write(&mut self) -> Option<Transmit<Self::Wout>> {
        self.wouts.pop_front()
    }

    fn handle_event(&mut self, now: Instant, evt: Self::Ein) -> Result<()> {
        match evt {
            IceEvent::WritableChanged(writable) => {
                debug!("{self}: ice writable changed: {writable}");
                self.ice_writable = writable;
                if writable {
                    self.ice_has_been_writable = true;
                }
                if !self.dtls_active {
                    self.set_writable(writable);
                    return Ok(());
                }
                if writable {
                    self.maybe_start_dtls(now)?;
                    if self.state == DtlsTransportState::Connected {
                        self.set_writable(true);
                    }
                } else if self.state == DtlsTransportState::Connected {
                    self.set_writable(false);
                }
                Ok(())
            }
            IceEvent::ReceivingChanged(receiving) => {
                self.set_receiving(receiving);
                Ok(())
            }
            IceEvent::NetworkRouteChanged(route) => {
                debug!("{self}: network route changed");
                self.transport = route;
                self.events
                    .push_back(DtlsTransportEvent::NetworkRouteChanged(route));
                Ok(())
            }
        }
    }

    fn poll_event(&mut self) -> Option<Self::Eout> {
        self.events.pop_front()
    }

    fn handle_timeout(&mut self, now: Instant) -> Result<()> {
        if self.state == DtlsTransportState::Connecting {
            if let Some(deadline) = self.handshake_deadline {
                if now >= deadline {
                    self.fail_handshake(&Error::ErrHandshakeTimeout);
                    return Ok(());
                }
            }
            if let Some(at) = self.next_retransmit {
                if now >= at {
                    self.retransmit_pending_flight(now);
                }
            }
        }

        if self.engine_started
            && !matches!(
                self.state,
                DtlsTransportState::Failed | DtlsTransportState::Closed
            )
        {
            if let Err(err) = self.engine.handle_timeout(now, &mut self.bridge) {
                error!("{self}: dtls engine timeout error: {err}");
                self.fail_handshake(&err);
                return Ok(());
            }
            self.flush_bridge(now);
        }
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Instant> {
        let mut eto: Option<Instant> = None;
        let mut merge = |candidate: Option<Instant>| {
            eto = match (eto, candidate) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (None, b) => b,
                (a, None) => a,
            };
        };

        if self.state == DtlsTransportState::Connecting {
            merge(self.handshake_deadline);
            merge(self.next_retransmit);
        }
        if self.engine_started
            && !matches!(
                self.state,
                DtlsTransportState::Failed | DtlsTransportState::Closed
            )
        {
            merge(self.engine.poll_timeout());
        }
        eto
    }
}

impl DtlsTransport {
    /// Resends the cached flight while the handshake rides on the
    /// connectivity-check cadence. This supplements the engine's own
    /// retransmit clock, which cannot account for the embedded delivery path.
    fn retransmit_pending_flight(&mut self, now: Instant) {
        let Some(flight) = self.piggyback.pending_flight().cloned() else {
            self.next_retransmit = None;
            return;
        };
        if self.retransmit_attempts >= self.config.max_retransmits {
            warn!("{self}: retransmit budget exhausted");
            self.fail_handshake(&Error::ErrHandshakeTimeout);
            return;
        }
        self.retransmit_attempts += 1;
        self.retransmission_count += 1;
        debug!(
            "{self}: retransmitting dtls flight, attempt {}",
            self.retransmit_attempts
        );
        if self.ice_writable {
            self.push_wout(now, BytesMut::from(&flight[..]));
        }
        self.retransmit_delay = (self.retransmit_delay * 2).min(MAX_RETRANSMIT_DELAY);
        self.next_retransmit = Some(now + self.retransmit_delay);
    }
}

impl fmt::Display for DtlsTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let receiving = if self.receiving { "R" } else { "_" };
        let writable = if self.writable { "W" } else { "_" };
        write!(
            f,
            "DtlsTransport[{}|{}|{receiving}{writable}]",
            self.config.transport_name, self.config.component
        )
    }
}
