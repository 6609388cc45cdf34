use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::error::StratumdError;

/// Parsed view of a listen string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddr<'a> {
    pub host: &'a str,
    pub port: Option<u16>,
    pub is_ipv6_literal: bool,
}

/// Port parsing with range check (0..=65535, 0 meaning ephemeral).
fn parse_port(s: &str) -> Result<u16, StratumdError> {
    let raw = u32::from_str(s)
        .map_err(|_| StratumdError::Config(format!("invalid port: '{s}'")))?;
    u16::try_from(raw)
        .map_err(|_| StratumdError::Config(format!("port out of range [0..65535]: {raw}")))
}

#[inline]
fn colon_count(s: &str) -> usize {
    s.as_bytes().iter().filter(|&&b| b == b':').count()
}

/// Parse a listen string.
///
/// Supported forms:
/// - "0.0.0.0", "localhost"
/// - "0.0.0.0:123"
/// - "[::]" and "[::1]:123"
/// - "::" (bare IPv6, no port)
pub fn parse_listen(input: &str) -> Result<ListenAddr<'_>, StratumdError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(StratumdError::Config("empty listen address".into()));
    }

    if let Some(rest) = s.strip_prefix('[') {
        let Some(bracket_pos) = rest.find(']') else {
            return Err(StratumdError::Config(format!(
                "missing closing ']' in '{s}'"
            )));
        };
        let host = &rest[..bracket_pos];
        let tail = &rest[bracket_pos + 1..];

        let port = if let Some(p) = tail.strip_prefix(':') {
            Some(parse_port(p)?)
        } else if tail.is_empty() {
            None
        } else {
            return Err(StratumdError::Config(format!(
                "unexpected trailing characters in '{s}'"
            )));
        };

        return Ok(ListenAddr {
            host,
            port,
            is_ipv6_literal: true,
        });
    }

    match colon_count(s) {
        0 => Ok(ListenAddr {
            host: s,
            port: None,
            is_ipv6_literal: false,
        }),
        1 => {
            let (host, port_str) = s.rsplit_once(':').unwrap_or((s, ""));
            if host.is_empty() {
                return Err(StratumdError::Config(format!(
                    "missing host before port in '{s}'"
                )));
            }
            Ok(ListenAddr {
                host,
                port: Some(parse_port(port_str)?),
                is_ipv6_literal: false,
            })
        }
        _ => Ok(ListenAddr {
            host: s,
            port: None,
            is_ipv6_literal: true,
        }),
    }
}

/// Resolve the address to bind. IPv4 results are preferred unless
/// `ipv6_only` is set.
pub fn resolve_bind_addr(
    host: &str,
    port: u16,
    ipv6_only: bool,
) -> Result<SocketAddr, StratumdError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|e| StratumdError::AddressResolution(format!("'{host}': {e}")))?
        .collect();

    let filtered: Vec<SocketAddr> = if ipv6_only {
        addrs.into_iter().filter(SocketAddr::is_ipv6).collect()
    } else {
        let (v4, v6): (Vec<_>, Vec<_>) = addrs.into_iter().partition(SocketAddr::is_ipv4);
        v4.into_iter().chain(v6).collect()
    };

    filtered.into_iter().next().ok_or_else(|| {
        if ipv6_only {
            StratumdError::AddressResolution(format!("No IPv6 address found for '{host}'"))
        } else {
            StratumdError::AddressResolution(format!("No IP address found for '{host}'"))
        }
    })
}
