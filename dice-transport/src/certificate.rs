use bytes::Bytes;
use rand::Rng;
use rcgen::{CertificateParams, KeyPair};
use std::time::SystemTime;

use crate::fingerprint::{colon_hex, Fingerprint, HashAlgorithm};
use shared::error::{Error, Result};

/// Local DTLS identity: a self-signed X.509 certificate chain and the
/// PKCS#8-encoded key pair the cryptographic engine signs the handshake with.
///
/// Identity generation itself is out of scope for the transport; this type
/// only carries what the handshake and fingerprint verification need.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// DER-encoded certificate chain, leaf first.
    certificates: Vec<Bytes>,

    /// PKCS#8 document of the key pair, consumed by the engine.
    private_key_der: Vec<u8>,

    /// Timestamp after which this certificate is no longer valid.
    expires: SystemTime,
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.certificates == other.certificates
    }
}

impl Certificate {
    /// Generates a self-signed ECDSA P-256 certificate with a random common
    /// name, the default identity for a DTLS transport.
    pub fn generate() -> Result<Self> {
        let key_pair = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256)?;
        Self::from_key_pair(key_pair)
    }

    /// Builds a certificate from an existing key pair.
    pub fn from_key_pair(key_pair: KeyPair) -> Result<Self> {
        if !(key_pair.is_compatible(&rcgen::PKCS_ED25519)
            || key_pair.is_compatible(&rcgen::PKCS_ECDSA_P256_SHA256))
        {
            return Err(Error::Certificate("unsupported key pair".to_owned()));
        }

        let params = CertificateParams::new(vec![rand_alpha(16)])?;
        let not_after = params.not_after;
        let x509_cert = params.self_signed(&key_pair)?;
        let private_key_der = key_pair.serialize_der();

        Ok(Self {
            certificates: vec![Bytes::copy_from_slice(x509_cert.der())],
            private_key_der,
            expires: not_after.into(),
        })
    }

    /// DER-encoded certificate chain, leaf first.
    pub fn der_chain(&self) -> &[Bytes] {
        &self.certificates
    }

    /// PKCS#8 document of the key pair.
    pub fn private_key_der(&self) -> &[u8] {
        &self.private_key_der
    }

    pub fn expires(&self) -> SystemTime {
        self.expires
    }

    /// The sha-256 fingerprint of the leaf certificate, formatted for
    /// signaling (lowercase colon-separated hex).
    pub fn fingerprint(&self) -> Fingerprint {
        let digest = HashAlgorithm::Sha256.digest(&self.certificates[0]);
        Fingerprint {
            algorithm: HashAlgorithm::Sha256.to_string(),
            value: colon_hex(&digest),
        }
    }
}

fn rand_alpha(n: usize) -> String {
    const RUNES: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            let idx = rng.random_range(0..RUNES.len());
            RUNES[idx] as char
        })
        .collect()
}
