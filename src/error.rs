use std::net::SocketAddr;

use thiserror::Error;

use crate::domain::ntp::Mode;

/// Top-level error type for the stratumd library.
#[derive(Error, Debug)]
pub enum StratumdError {
    /// Listen address could not be resolved.
    #[error("dns: {0}")]
    AddressResolution(String),
    /// UDP socket could not be bound.
    #[error("bind {addr}: {source}")]
    SocketBind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Datagram is not a 48-byte NTP header.
    #[error("malformed packet: expected 48 bytes, got {len}")]
    MalformedPacket { len: usize },
    /// Transient socket read failure.
    #[error("receive: {0}")]
    Receive(#[source] std::io::Error),
    /// Transient socket write failure.
    #[error("send to {peer}: {source}")]
    Send {
        peer: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Request mode has no defined response.
    #[error("unsupported mode: {0}")]
    UnsupportedMode(Mode),
    /// Invalid configuration value or file.
    #[error("config: {0}")]
    Config(String),
    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratumdError {
    /// Startup failures the server cannot proceed past.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StratumdError::AddressResolution(_) | StratumdError::SocketBind { .. }
        )
    }
}
