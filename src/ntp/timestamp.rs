//! Conversion from calendar time to the 32.32 NTP timestamp format.
//!
//! The seconds field is truncated to 32 bits, so encoded values wrap in
//! February 2036 (era 1). That limitation is kept as-is.

use chrono::{DateTime, Utc};

use crate::domain::ntp::NtpTimestamp;

/// Seconds from 1900-01-01T00:00:00Z to the Unix epoch.
pub const NTP_UNIX_OFFSET: i64 = 2_208_988_800;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Encode `time` as whole seconds since 1900 plus the sub-second remainder
/// scaled by 2^32.
pub fn encode(time: DateTime<Utc>) -> NtpTimestamp {
    let seconds = time.timestamp().wrapping_add(NTP_UNIX_OFFSET) as u32;
    // chrono represents a leap second as nanos >= 1e9; clamp, no correction.
    let nanos = u64::from(time.timestamp_subsec_nanos()).min(NANOS_PER_SEC - 1);
    let fraction = ((nanos << 32) / NANOS_PER_SEC) as u32;
    NtpTimestamp::from_parts(seconds, fraction)
}

impl From<DateTime<Utc>> for NtpTimestamp {
    fn from(time: DateTime<Utc>) -> Self {
        encode(time)
    }
}
