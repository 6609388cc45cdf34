//! Wire codec for the fixed 48-byte NTP header.
//!
//! Offsets (all multi-byte fields big-endian):
//! - `[0]`      LI(2) | VN(3) | Mode(3)
//! - `[1]`      Stratum
//! - `[2]`      Poll (i8)
//! - `[3]`      Precision (i8)
//! - `[4-7]`    Root delay
//! - `[8-11]`   Root dispersion
//! - `[12-15]`  Reference ID
//! - `[16-23]`  Reference timestamp
//! - `[24-31]`  Originate timestamp
//! - `[32-39]`  Receive timestamp
//! - `[40-47]`  Transmit timestamp

use crate::domain::ntp::{LeapIndicator, Mode, NtpPacket, NtpTimestamp};
use crate::error::StratumdError;

/// Size of an NTP header on the wire.
pub const PACKET_LEN: usize = 48;

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn timestamp(bytes: &[u8], at: usize) -> NtpTimestamp {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    NtpTimestamp(raw)
}

/// Decode a datagram. Anything other than exactly 48 bytes is rejected.
pub fn decode(bytes: &[u8]) -> Result<NtpPacket, StratumdError> {
    if bytes.len() != PACKET_LEN {
        return Err(StratumdError::MalformedPacket { len: bytes.len() });
    }

    let settings = bytes[0];
    Ok(NtpPacket {
        leap_indicator: LeapIndicator::from_bits(settings >> 6),
        version: (settings >> 3) & 0b111,
        mode: Mode::from_bits(settings),
        stratum: bytes[1],
        poll: bytes[2] as i8,
        precision: bytes[3] as i8,
        root_delay: be_u32(bytes, 4),
        root_dispersion: be_u32(bytes, 8),
        reference_id: be_u32(bytes, 12),
        reference_timestamp: timestamp(bytes, 16),
        origin_timestamp: timestamp(bytes, 24),
        receive_timestamp: timestamp(bytes, 32),
        transmit_timestamp: timestamp(bytes, 40),
    })
}

/// Encode a packet into its 48-byte wire form.
pub fn encode(packet: &NtpPacket) -> [u8; PACKET_LEN] {
    let mut buf = [0u8; PACKET_LEN];
    buf[0] = packet.settings();
    buf[1] = packet.stratum;
    buf[2] = packet.poll as u8;
    buf[3] = packet.precision as u8;
    buf[4..8].copy_from_slice(&packet.root_delay.to_be_bytes());
    buf[8..12].copy_from_slice(&packet.root_dispersion.to_be_bytes());
    buf[12..16].copy_from_slice(&packet.reference_id.to_be_bytes());
    buf[16..24].copy_from_slice(packet.reference_timestamp.as_bytes());
    buf[24..32].copy_from_slice(packet.origin_timestamp.as_bytes());
    buf[32..40].copy_from_slice(packet.receive_timestamp.as_bytes());
    buf[40..48].copy_from_slice(packet.transmit_timestamp.as_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes() -> [u8; PACKET_LEN] {
        let mut b = [0u8; PACKET_LEN];
        b[0] = 0xe3; // LI=3, VN=4, client
        b[1] = 2;
        b[2] = 6;
        b[3] = 0xe9; // -23
        b[4..8].copy_from_slice(&0x0001_8000u32.to_be_bytes());
        b[8..12].copy_from_slice(&0x0000_0400u32.to_be_bytes());
        b[12..16].copy_from_slice(b"GPS\0");
        for (i, byte) in b[16..].iter_mut().enumerate() {
            *byte = i as u8 + 1;
        }
        b
    }

    #[test]
    fn decodes_every_field() {
        let p = decode(&sample_bytes()).unwrap();
        assert_eq!(p.leap_indicator, LeapIndicator::Unsynchronized);
        assert_eq!(p.version, 4);
        assert_eq!(p.mode, Mode::Client);
        assert_eq!(p.stratum, 2);
        assert_eq!(p.poll, 6);
        assert_eq!(p.precision, -23);
        assert_eq!(p.root_delay, 0x0001_8000);
        assert_eq!(p.root_dispersion, 0x0000_0400);
        assert_eq!(p.reference_id, u32::from_be_bytes(*b"GPS\0"));
        assert_eq!(p.reference_timestamp.0, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(p.origin_timestamp.0, [9, 10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(p.receive_timestamp.0, [17, 18, 19, 20, 21, 22, 23, 24]);
        assert_eq!(p.transmit_timestamp.0, [25, 26, 27, 28, 29, 30, 31, 32]);
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let original = sample_bytes();
        assert_eq!(encode(&decode(&original).unwrap()), original);

        // every value of the packed settings byte survives
        let mut b = original;
        for settings in 0..=u8::MAX {
            b[0] = settings;
            assert_eq!(encode(&decode(&b).unwrap()), b);
        }
    }

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0, 1, 47, 49, 68] {
            let bytes = vec![0x1b; len];
            match decode(&bytes) {
                Err(StratumdError::MalformedPacket { len: got }) => assert_eq!(got, len),
                other => panic!("expected malformed error for {len} bytes, got {other:?}"),
            }
        }
    }

    #[test]
    fn settings_byte_packs_li_vn_mode() {
        let mut p = decode(&[0u8; PACKET_LEN]).unwrap();
        p.leap_indicator = LeapIndicator::NoWarning;
        p.version = 4;
        p.mode = Mode::Server;
        assert_eq!(p.settings(), 0x24);
        assert_eq!(encode(&p)[0], 0x24);

        p.version = 3;
        p.mode = Mode::Client;
        assert_eq!(p.settings(), 0x1b);
    }
}
