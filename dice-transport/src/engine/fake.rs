//! A scripted engine for tests: speaks just enough of the record layout for
//! classification and ack extraction to work, and "encrypts" application
//! data by prefixing the application-data content type.

use bytes::{Bytes, BytesMut};
use std::time::Instant;

use super::{EngineEvent, HandshakeEngine};
use crate::certificate::Certificate;
use crate::record::{test_handshake_record, CONTENT_TYPE_APPLICATION_DATA, CONTENT_TYPE_HANDSHAKE};
use crate::role::DtlsRole;
use crate::srtp::SrtpProfile;
use crate::stream_bridge::StreamBridge;
use shared::error::{Error, Result};

pub(crate) struct FakeEngine {
    role: Option<DtlsRole>,
    complete: bool,
    closed: bool,
    inbound_flights: usize,
    peer_certificate: Bytes,
    cipher_suite: u16,
    version_bytes: u16,
    peer_signature_algorithm: u16,
    srtp_profile: SrtpProfile,
    keying_seed: u8,
    fail_with: Option<Error>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            role: None,
            complete: false,
            closed: false,
            inbound_flights: 0,
            peer_certificate: Bytes::from_static(b"fake peer certificate"),
            cipher_suite: 0xc02b, // TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256
            version_bytes: 0xfefd,
            peer_signature_algorithm: 0x0403, // ecdsa_secp256r1_sha256
            srtp_profile: SrtpProfile::Aes128CmHmacSha1_80,
            keying_seed: 0x2a,
            fail_with: None,
        }
    }

    pub(crate) fn with_peer_certificate(mut self, der: Bytes) -> Self {
        self.peer_certificate = der;
        self
    }

    pub(crate) fn with_failure(mut self, err: Error) -> Self {
        self.fail_with = Some(err);
        self
    }

    fn flights_needed(&self) -> usize {
        match self.role {
            Some(DtlsRole::Client) => 1,
            _ => 2,
        }
    }
}

impl HandshakeEngine for FakeEngine {
    fn start(
        &mut self,
        role: DtlsRole,
        _certificate: &Certificate,
        bridge: &mut StreamBridge,
        _now: Instant,
    ) -> Result<()> {
        if self.closed {
            return Err(Error::ErrStreamClosed);
        }
        if self.role.is_some() {
            return Err(Error::ErrHandshakeAlreadyStarted);
        }
        self.role = Some(role);
        if role == DtlsRole::Client {
            bridge.write(&test_handshake_record(1, 0))?; // client hello
        }
        Ok(())
    }

    fn process(&mut self, bridge: &mut StreamBridge, _now: Instant) -> Result<Vec<EngineEvent>> {
        let mut events = vec![];
        while let Some(packet) = bridge.read() {
            if let Some(err) = self.fail_with.take() {
                return Err(err);
            }
            if packet.is_empty() {
                continue;
            }
            if self.complete {
                if packet[0] == CONTENT_TYPE_APPLICATION_DATA {
                    events.push(EngineEvent::ApplicationData(BytesMut::from(&packet[1..])));
                }
                continue;
            }
            if packet[0] != CONTENT_TYPE_HANDSHAKE {
                continue;
            }

            self.inbound_flights += 1;
            if self.inbound_flights >= self.flights_needed() {
                self.complete = true;
                bridge.write(&test_handshake_record(20, 3))?; // finished
                events.push(EngineEvent::HandshakeComplete);
            } else {
                bridge.write(&test_handshake_record(2, 1))?; // server flight
            }
        }
        Ok(events)
    }

    fn write(&mut self, data: &[u8], bridge: &mut StreamBridge) -> Result<usize> {
        if !self.complete {
            return Err(Error::HandshakeInProgress);
        }
        let mut record = Vec::with_capacity(data.len() + 1);
        record.push(CONTENT_TYPE_APPLICATION_DATA);
        record.extend_from_slice(data);
        bridge.write(&record)?;
        Ok(data.len())
    }

    fn handle_timeout(&mut self, _now: Instant, _bridge: &mut StreamBridge) -> Result<()> {
        Ok(())
    }

    fn poll_timeout(&self) -> Option<Instant> {
        None
    }

    fn close(&mut self, _bridge: &mut StreamBridge) {
        self.closed = true;
    }

    fn peer_certificates(&self) -> Vec<Bytes> {
        if self.complete {
            vec![self.peer_certificate.clone()]
        } else {
            vec![]
        }
    }

    fn ssl_cipher_suite(&self) -> Option<u16> {
        self.complete.then_some(self.cipher_suite)
    }

    fn ssl_version_bytes(&self) -> Option<u16> {
        self.complete.then_some(self.version_bytes)
    }

    fn peer_signature_algorithm(&self) -> Option<u16> {
        self.complete.then_some(self.peer_signature_algorithm)
    }

    fn selected_srtp_profile(&self) -> Option<SrtpProfile> {
        self.complete.then_some(self.srtp_profile)
    }

    fn export_keying_material(&self, label: &str, length: usize) -> Result<Vec<u8>> {
        if !self.complete {
            return Err(Error::HandshakeInProgress);
        }
        let mut seed = self.keying_seed;
        for b in label.as_bytes() {
            seed = seed.wrapping_add(*b);
        }
        Ok((0..length)
            .map(|i| seed.wrapping_add(i as u8))
            .collect())
    }
}
