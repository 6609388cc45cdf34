use std::fmt;

#[cfg(feature = "json")]
use serde::Serialize;

/// Two-bit leap warning carried in the top of header byte 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub enum LeapIndicator {
    #[default]
    NoWarning,
    AddOne,
    SubOne,
    Unsynchronized,
}

impl LeapIndicator {
    /// Build from the two low bits of `bits`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::AddOne,
            2 => LeapIndicator::SubOne,
            _ => LeapIndicator::Unsynchronized,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            LeapIndicator::NoWarning => 0,
            LeapIndicator::AddOne => 1,
            LeapIndicator::SubOne => 2,
            LeapIndicator::Unsynchronized => 3,
        }
    }
}

/// Three-bit association mode carried in the bottom of header byte 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub enum Mode {
    Reserved,
    SymmetricActive,
    SymmetricPassive,
    Client,
    Server,
    Broadcast,
    Control,
    Private,
}

impl Mode {
    /// Build from the three low bits of `bits`.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Mode::Reserved,
            1 => Mode::SymmetricActive,
            2 => Mode::SymmetricPassive,
            3 => Mode::Client,
            4 => Mode::Server,
            5 => Mode::Broadcast,
            6 => Mode::Control,
            _ => Mode::Private,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Mode::Reserved => 0,
            Mode::SymmetricActive => 1,
            Mode::SymmetricPassive => 2,
            Mode::Client => 3,
            Mode::Server => 4,
            Mode::Broadcast => 5,
            Mode::Control => 6,
            Mode::Private => 7,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Reserved => "reserved",
            Mode::SymmetricActive => "symmetric-active",
            Mode::SymmetricPassive => "symmetric-passive",
            Mode::Client => "client",
            Mode::Server => "server",
            Mode::Broadcast => "broadcast",
            Mode::Control => "control",
            Mode::Private => "private",
        };
        write!(f, "{name} ({})", self.bits())
    }
}

/// 32.32 fixed-point seconds since 1900-01-01T00:00:00Z, kept in wire order.
///
/// Inbound timestamps are never reinterpreted; they are carried as the raw
/// eight bytes the peer sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct NtpTimestamp(pub [u8; 8]);

impl NtpTimestamp {
    pub const ZERO: NtpTimestamp = NtpTimestamp([0; 8]);

    pub fn from_parts(seconds: u32, fraction: u32) -> Self {
        let mut raw = [0u8; 8];
        raw[..4].copy_from_slice(&seconds.to_be_bytes());
        raw[4..].copy_from_slice(&fraction.to_be_bytes());
        NtpTimestamp(raw)
    }

    pub fn seconds(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn fraction(&self) -> u32 {
        u32::from_be_bytes([self.0[4], self.0[5], self.0[6], self.0[7]])
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Display for NtpTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}.{:08x}", self.seconds(), self.fraction())
    }
}

/// One 48-byte NTP header. Built fresh for every datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct NtpPacket {
    pub leap_indicator: LeapIndicator,
    /// Three bits on the wire.
    pub version: u8,
    pub mode: Mode,
    pub stratum: u8,
    /// log2 seconds between polls.
    pub poll: i8,
    /// log2 seconds of clock precision.
    pub precision: i8,
    /// 16.16 fixed point.
    pub root_delay: u32,
    /// 16.16 fixed point.
    pub root_dispersion: u32,
    pub reference_id: u32,
    pub reference_timestamp: NtpTimestamp,
    pub origin_timestamp: NtpTimestamp,
    pub receive_timestamp: NtpTimestamp,
    pub transmit_timestamp: NtpTimestamp,
}

impl NtpPacket {
    /// Header byte 0: `LI << 6 | VN << 3 | Mode`.
    pub fn settings(&self) -> u8 {
        (self.leap_indicator.bits() << 6) | ((self.version & 0b111) << 3) | self.mode.bits()
    }
}
