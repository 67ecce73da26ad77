use std::fmt;

/// Label for the TLS keying material exporter used by DTLS-SRTP,
/// per <https://tools.ietf.org/html/rfc5764#section-4.2>.
pub const SRTP_EXPORT_LABEL: &str = "EXTRACTOR-dtls_srtp";

/// SRTP protection profiles negotiable through the DTLS use_srtp extension.
///
/// Only the profiles offered by default are represented; the profile decides
/// the length of the keying material exported for the SRTP layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SrtpProfile {
    Aes128CmHmacSha1_80,
    AeadAes128Gcm,
}

impl SrtpProfile {
    /// Master key length in bytes.
    pub fn key_len(&self) -> usize {
        match *self {
            SrtpProfile::Aes128CmHmacSha1_80 => 16,
            SrtpProfile::AeadAes128Gcm => 16,
        }
    }

    /// Master salt length in bytes.
    pub fn salt_len(&self) -> usize {
        match *self {
            SrtpProfile::Aes128CmHmacSha1_80 => 14,
            SrtpProfile::AeadAes128Gcm => 12,
        }
    }

    /// Total keying material exported for SRTP: a key and a salt for each
    /// direction, per <https://tools.ietf.org/html/rfc5764#section-4.2>.
    pub fn keying_material_len(&self) -> usize {
        2 * (self.key_len() + self.salt_len())
    }
}

impl fmt::Display for SrtpProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            SrtpProfile::Aes128CmHmacSha1_80 => "SRTP_AES128_CM_HMAC_SHA1_80",
            SrtpProfile::AeadAes128Gcm => "SRTP_AEAD_AES_128_GCM",
        };
        write!(f, "{s}")
    }
}
