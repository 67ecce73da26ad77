#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;

use byteorder::{BigEndian, ByteOrder};

/// DTLS record content types that can appear in cleartext records.
pub const CONTENT_TYPE_CHANGE_CIPHER_SPEC: u8 = 20;
pub const CONTENT_TYPE_ALERT: u8 = 21;
pub const CONTENT_TYPE_HANDSHAKE: u8 = 22;
pub const CONTENT_TYPE_APPLICATION_DATA: u8 = 23;

/// DTLS record header: content type (1), version (2), epoch (2),
/// sequence number (6), length (2).
pub const RECORD_HEADER_LEN: usize = 13;

/// DTLS handshake fragment header: msg type (1), length (3), message_seq (2),
/// fragment_offset (3), fragment_length (3).
pub const HANDSHAKE_HEADER_LEN: usize = 12;

const HANDSHAKE_TYPE_CLIENT_HELLO: u8 = 1;

/// Demux ranges as described in RFC 7983
/// <https://tools.ietf.org/html/rfc7983>
///              +----------------+
///              |        [0..3] -+--> forward to STUN
///              |                |
///              |      [16..19] -+--> forward to ZRTP
///              |                |
///  packet -->  |      [20..63] -+--> forward to DTLS
///              |                |
///              |      [64..79] -+--> forward to TURN Channel
///              |                |
///              |    [128..191] -+--> forward to RTP/RTCP
///              +----------------+
///
/// is_dtls_packet accepts packets with the first byte in [20..63]. Runs on
/// every inbound packet, so it stays a single range check.
#[inline]
pub fn is_dtls_packet(buf: &[u8]) -> bool {
    !buf.is_empty() && (20..=63).contains(&buf[0])
}

/// Whether the packet starts with a cleartext DTLS handshake record carrying
/// a ClientHello, i.e. the packet a peer opens the handshake with.
pub fn is_client_hello(buf: &[u8]) -> bool {
    buf.len() > RECORD_HEADER_LEN
        && buf[0] == CONTENT_TYPE_HANDSHAKE
        && buf[RECORD_HEADER_LEN] == HANDSHAKE_TYPE_CLIENT_HELLO
}

/// Extracts the `message_seq` of every cleartext handshake fragment in the
/// datagram, used to acknowledge flights carried inside connectivity checks.
///
/// Returns `None` for packets that violate the record layout (truncated
/// bodies, trailing garbage, malformed fragments). A datagram that opens with
/// something other than a cleartext content type (e.g. a DTLS 1.3 encrypted
/// record with its unified header) cannot be parsed and yields the acks
/// collected so far rather than an error.
pub fn handshake_acks(packet: &[u8]) -> Option<Vec<u16>> {
    let mut acks = vec![];
    let mut rem = packet;

    loop {
        if rem.is_empty() {
            return Some(acks);
        }
        if rem.len() < RECORD_HEADER_LEN {
            return None;
        }

        let content_type = rem[0];
        if !(CONTENT_TYPE_CHANGE_CIPHER_SPEC..=CONTENT_TYPE_APPLICATION_DATA)
            .contains(&content_type)
        {
            // Opaque (encrypted) record framing; nothing more to collect.
            return Some(acks);
        }

        let epoch = BigEndian::read_u16(&rem[3..5]);
        let record_len = BigEndian::read_u16(&rem[11..13]) as usize;
        if rem.len() < RECORD_HEADER_LEN + record_len {
            return None;
        }

        if content_type == CONTENT_TYPE_HANDSHAKE && epoch == 0 {
            let mut body = &rem[RECORD_HEADER_LEN..RECORD_HEADER_LEN + record_len];
            while !body.is_empty() {
                if body.len() < HANDSHAKE_HEADER_LEN {
                    return None;
                }
                let message_seq = BigEndian::read_u16(&body[4..6]);
                let fragment_len = BigEndian::read_u24(&body[9..12]) as usize;
                if body.len() < HANDSHAKE_HEADER_LEN + fragment_len {
                    return None;
                }
                acks.push(message_seq);
                body = &body[HANDSHAKE_HEADER_LEN + fragment_len..];
            }
        }

        rem = &rem[RECORD_HEADER_LEN + record_len..];
    }
}

/// Serializes handshake acks for embedding in a connectivity-check attribute:
/// each `message_seq` as big-endian u16, concatenated.
pub fn encode_acks(acks: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(acks.len() * 2);
    for ack in acks {
        out.extend_from_slice(&ack.to_be_bytes());
    }
    out
}

/// Parses an ack attribute payload. `None` if the length is not a multiple
/// of two.
pub fn decode_acks(buf: &[u8]) -> Option<Vec<u16>> {
    if buf.len() % 2 != 0 {
        return None;
    }
    Some(
        buf.chunks_exact(2)
            .map(|c| BigEndian::read_u16(c))
            .collect(),
    )
}

#[cfg(test)]
pub(crate) fn test_handshake_record(msg_type: u8, message_seq: u16) -> Vec<u8> {
    let mut packet = vec![0u8; RECORD_HEADER_LEN + HANDSHAKE_HEADER_LEN];
    packet[0] = CONTENT_TYPE_HANDSHAKE;
    packet[1] = 0xfe;
    packet[2] = 0xfd;
    BigEndian::write_u16(&mut packet[11..13], HANDSHAKE_HEADER_LEN as u16);
    packet[RECORD_HEADER_LEN] = msg_type;
    BigEndian::write_u16(
        &mut packet[RECORD_HEADER_LEN + 4..RECORD_HEADER_LEN + 6],
        message_seq,
    );
    packet
}
