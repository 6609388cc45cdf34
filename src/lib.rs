//! stratumd: a minimal stratum-1 NTP responder.
//!
//! Client requests are answered from the local system clock; every other
//! mode is dropped.

pub mod adapters;
pub mod config;
pub mod domain;
mod error;
pub mod fmt;
pub mod logging;
pub mod ntp;
pub mod services;
pub mod stats;

pub use config::ServerConfig;
pub use domain::ntp::{LeapIndicator, Mode, NtpPacket, NtpTimestamp};
pub use error::StratumdError;
pub use services::handler::{HandleResult, handle_request};
pub use services::listener::Listener;
