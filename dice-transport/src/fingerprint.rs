use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;

use shared::error::{Error, Result};

/// Hash algorithms accepted for certificate fingerprints, by the textual
/// names of the 'Hash function Textual Names' registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha-384" => Ok(HashAlgorithm::Sha384),
            "sha-512" => Ok(HashAlgorithm::Sha512),
            _ => Err(Error::ErrUnsupportedFingerprintAlgorithm),
        }
    }

    pub fn digest_len(&self) -> usize {
        match *self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match *self {
            HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            HashAlgorithm::Sha256 => "sha-256",
            HashAlgorithm::Sha384 => "sha-384",
            HashAlgorithm::Sha512 => "sha-512",
        };
        write!(f, "{s}")
    }
}

/// Fingerprint specifies the hash function algorithm and certificate
/// fingerprint as described in <https://tools.ietf.org/html/rfc4572>.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Algorithm specifies one of the hash function algorithms defined in
    /// the 'Hash function Textual Names' registry.
    pub algorithm: String,

    /// Value specifies the value of the certificate fingerprint in lowercase
    /// colon-separated hex, per the syntax of 'fingerprint' in
    /// <https://tools.ietf.org/html/rfc4572#section-5>.
    pub value: String,
}

impl TryFrom<&str> for Fingerprint {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let fields: Vec<&str> = value.split_whitespace().collect();
        if fields.len() == 2 {
            Ok(Self {
                algorithm: fields[0].to_string(),
                value: fields[1].to_string(),
            })
        } else {
            Err(Error::ErrInvalidFingerprint)
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.algorithm, self.value)
    }
}

pub(crate) fn colon_hex(digest: &[u8]) -> String {
    let values: Vec<String> = digest.iter().map(|x| format!("{x:02x}")).collect();
    values.join(":")
}

/// The peer's certificate digest, as received from the signaling channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFingerprint {
    pub algorithm: HashAlgorithm,
    pub digest: Vec<u8>,
}

impl RemoteFingerprint {
    pub fn new(algorithm: &str, digest: &[u8]) -> Result<Self> {
        let algorithm = HashAlgorithm::from_name(algorithm)?;
        if digest.len() != algorithm.digest_len() {
            return Err(Error::ErrInvalidFingerprintLength);
        }
        Ok(Self {
            algorithm,
            digest: digest.to_vec(),
        })
    }

    /// Checks a DER-encoded certificate against this fingerprint.
    pub fn matches(&self, certificate_der: &[u8]) -> bool {
        self.algorithm.digest(certificate_der) == self.digest
    }
}
