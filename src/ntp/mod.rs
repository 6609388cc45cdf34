//! NTP wire formats: header codec and timestamp encoding.

pub mod packet;
pub mod timestamp;
