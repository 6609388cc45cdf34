use crate::error::StratumdError;
#[cfg(feature = "json")]
use serde::Serialize;

/// Counters kept by the listener for the lifetime of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct ServeStats {
    pub received: u64,
    pub responded: u64,
    pub malformed: u64,
    pub unsupported_mode: u64,
    pub receive_errors: u64,
    pub send_errors: u64,
}

impl ServeStats {
    /// Count a per-request failure under its kind.
    pub fn record_error(&mut self, err: &StratumdError) {
        match err {
            StratumdError::MalformedPacket { .. } => self.malformed += 1,
            StratumdError::UnsupportedMode(_) => self.unsupported_mode += 1,
            StratumdError::Receive(_) => self.receive_errors += 1,
            StratumdError::Send { .. } => self.send_errors += 1,
            _ => {}
        }
    }

    /// Datagrams that were read but not answered.
    pub fn dropped(&self) -> u64 {
        self.malformed + self.unsupported_mode + self.send_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ntp::Mode;
    use std::io;

    #[test]
    fn errors_land_in_their_counter() {
        let mut stats = ServeStats::default();
        stats.record_error(&StratumdError::MalformedPacket { len: 12 });
        stats.record_error(&StratumdError::UnsupportedMode(Mode::Broadcast));
        stats.record_error(&StratumdError::UnsupportedMode(Mode::Control));
        stats.record_error(&StratumdError::Receive(io::Error::other("boom")));
        stats.record_error(&StratumdError::Send {
            peer: "127.0.0.1:123".parse().unwrap(),
            source: io::Error::other("boom"),
        });
        stats.record_error(&StratumdError::Config("ignored".into()));

        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.unsupported_mode, 2);
        assert_eq!(stats.receive_errors, 1);
        assert_eq!(stats.send_errors, 1);
        assert_eq!(stats.dropped(), 4);
    }
}
