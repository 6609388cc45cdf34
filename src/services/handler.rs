use chrono::{DateTime, Utc};

use crate::domain::ntp::{LeapIndicator, Mode, NtpPacket};
use crate::ntp::timestamp;

/// Version advertised in every response.
pub const RESPONSE_VERSION: u8 = 4;

/// Stratum advertised in every response: a primary source.
pub const RESPONSE_STRATUM: u8 = 1;

/// Outcome of handling one decoded request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandleResult {
    /// Packet to encode and send back to the requester.
    Response(NtpPacket),
    /// Nothing is sent; carries the mode that had no defined response.
    NoResponse(Mode),
}

/// Compute the reply to `request` as observed at `now`.
///
/// Only client requests get an answer. The originate timestamp is the
/// request's transmit timestamp, copied byte for byte.
pub fn handle_request(request: &NtpPacket, now: DateTime<Utc>) -> HandleResult {
    match request.mode {
        Mode::Client => HandleResult::Response(build_server_response(request, now)),
        Mode::Reserved
        | Mode::SymmetricActive
        | Mode::SymmetricPassive
        | Mode::Server
        | Mode::Broadcast
        | Mode::Control
        | Mode::Private => HandleResult::NoResponse(request.mode),
    }
}

fn build_server_response(request: &NtpPacket, now: DateTime<Utc>) -> NtpPacket {
    let now = timestamp::encode(now);
    NtpPacket {
        leap_indicator: LeapIndicator::NoWarning,
        version: RESPONSE_VERSION,
        mode: Mode::Server,
        stratum: RESPONSE_STRATUM,
        poll: request.poll,
        precision: request.precision,
        root_delay: 0,
        root_dispersion: 0,
        reference_id: 0,
        reference_timestamp: now,
        origin_timestamp: request.transmit_timestamp,
        receive_timestamp: now,
        transmit_timestamp: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ntp::NtpTimestamp;
    use crate::ntp::packet::{self, PACKET_LEN};

    fn request(settings: u8) -> NtpPacket {
        let mut b = [0u8; PACKET_LEN];
        b[0] = settings;
        b[1] = 3;
        b[2] = 4;
        b[3] = (-6i8) as u8;
        b[4..8].copy_from_slice(&0xdead_beefu32.to_be_bytes());
        b[12..16].copy_from_slice(b"LOCL");
        b[40..48].copy_from_slice(&[0xe8, 0x1c, 0x2a, 0x11, 0x80, 0x00, 0x00, 0x01]);
        packet::decode(&b).unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 250_000_000).unwrap()
    }

    #[test]
    fn client_request_gets_server_response() {
        let req = request(0x1b);
        let HandleResult::Response(resp) = handle_request(&req, fixed_now()) else {
            panic!("client request must be answered");
        };

        assert_eq!(resp.settings(), 0x24);
        assert_eq!(resp.stratum, 1);
        assert_eq!(resp.poll, 4);
        assert_eq!(resp.precision, -6);
        assert_eq!(resp.root_delay, 0);
        assert_eq!(resp.root_dispersion, 0);
        assert_eq!(resp.reference_id, 0);
        assert_eq!(resp.origin_timestamp, req.transmit_timestamp);

        let now = timestamp::encode(fixed_now());
        assert_eq!(resp.reference_timestamp, now);
        assert_eq!(resp.receive_timestamp, now);
        assert_eq!(resp.transmit_timestamp, now);
        assert_eq!(packet::encode(&resp).len(), PACKET_LEN);
    }

    #[test]
    fn response_ignores_request_leap_and_version() {
        // LI=3, VN=1, client
        let req = request(0xcb);
        let HandleResult::Response(resp) = handle_request(&req, fixed_now()) else {
            panic!("client request must be answered");
        };
        assert_eq!(resp.leap_indicator, LeapIndicator::NoWarning);
        assert_eq!(resp.version, 4);
    }

    #[test]
    fn zero_transmit_timestamp_is_echoed() {
        let mut req = request(0x23);
        req.transmit_timestamp = NtpTimestamp::ZERO;
        match handle_request(&req, fixed_now()) {
            HandleResult::Response(resp) => assert_eq!(resp.origin_timestamp, NtpTimestamp::ZERO),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn other_modes_get_no_response() {
        for mode in [0u8, 1, 2, 4, 5, 6, 7] {
            let req = request(0x20 | mode);
            assert_eq!(
                handle_request(&req, fixed_now()),
                HandleResult::NoResponse(Mode::from_bits(mode))
            );
        }
    }
}
