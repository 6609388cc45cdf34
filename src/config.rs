//! Server configuration: built-in defaults, optionally overlaid by a TOML
//! file and then by command line flags.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0"
//! port = 123
//! ipv6_only = false
//! resample_transmit = false
//!
//! [log]
//! level = "info"
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use toml::{Table, Value};

use crate::adapters::resolver::{parse_listen, resolve_bind_addr};
use crate::error::StratumdError;
use crate::logging::LogLevel;

pub const DEFAULT_LISTEN: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 123;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host, IP literal or `host:port` to bind.
    pub listen: String,
    /// Used unless `listen` carries its own port.
    pub port: u16,
    pub ipv6_only: bool,
    /// Take a fresh clock sample for the transmit timestamp right before
    /// sending instead of reusing the receipt time.
    pub resample_transmit: bool,
    pub log_level: LogLevel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            port: DEFAULT_PORT,
            ipv6_only: false,
            resample_transmit: false,
            log_level: LogLevel::default(),
        }
    }
}

impl ServerConfig {
    /// Read a TOML file. A missing file is an error: it was asked for.
    pub fn load(path: &Path) -> Result<Self, StratumdError> {
        let content = fs::read_to_string(path).map_err(|e| {
            StratumdError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, StratumdError> {
        let root: Table = toml::from_str(content)
            .map_err(|e| StratumdError::Config(format!("invalid config file: {e}")))?;
        parse_table(&root)
    }

    /// Resolve the socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, StratumdError> {
        let parsed = parse_listen(&self.listen)?;
        let ipv6_only = self.ipv6_only || parsed.is_ipv6_literal;
        resolve_bind_addr(parsed.host, parsed.port.unwrap_or(self.port), ipv6_only)
    }
}

fn invalid(key: &str, expected: &str) -> StratumdError {
    StratumdError::Config(format!("'{key}' must be {expected}"))
}

fn section<'a>(root: &'a Table, name: &str) -> Result<Option<&'a Table>, StratumdError> {
    match root.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_table()
            .map(Some)
            .ok_or_else(|| invalid(name, "a table")),
    }
}

fn parse_table(root: &Table) -> Result<ServerConfig, StratumdError> {
    let mut cfg = ServerConfig::default();

    if let Some(server) = section(root, "server")? {
        if let Some(listen) = server.get("listen") {
            cfg.listen = listen
                .as_str()
                .ok_or_else(|| invalid("server.listen", "a string"))?
                .to_string();
        }
        if let Some(port) = server.get("port") {
            let raw = port
                .as_integer()
                .ok_or_else(|| invalid("server.port", "an integer"))?;
            cfg.port = u16::try_from(raw)
                .map_err(|_| invalid("server.port", "in range [0..65535]"))?;
        }
        if let Some(ipv6) = server.get("ipv6_only") {
            cfg.ipv6_only = ipv6
                .as_bool()
                .ok_or_else(|| invalid("server.ipv6_only", "a boolean"))?;
        }
        if let Some(resample) = server.get("resample_transmit") {
            cfg.resample_transmit = resample
                .as_bool()
                .ok_or_else(|| invalid("server.resample_transmit", "a boolean"))?;
        }
    }

    if let Some(log) = section(root, "log")? {
        if let Some(level) = log.get("level") {
            cfg.log_level = level
                .as_str()
                .ok_or_else(|| invalid("log.level", "a string"))?
                .parse()?;
        }
    }

    Ok(cfg)
}

impl From<&ServerConfig> for Value {
    fn from(cfg: &ServerConfig) -> Self {
        let mut server = Table::new();
        server.insert("listen".into(), Value::String(cfg.listen.clone()));
        server.insert("port".into(), Value::Integer(i64::from(cfg.port)));
        server.insert("ipv6_only".into(), Value::Boolean(cfg.ipv6_only));
        server.insert(
            "resample_transmit".into(),
            Value::Boolean(cfg.resample_transmit),
        );
        let mut log = Table::new();
        log.insert("level".into(), Value::String(cfg.log_level.as_str().into()));
        let mut root = Table::new();
        root.insert("server".into(), Value::Table(server));
        root.insert("log".into(), Value::Table(log));
        Value::Table(root)
    }
}
