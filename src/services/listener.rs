//! UDP listener driving the request handler.
//!
//! One task owns the socket and serves datagrams strictly in arrival order:
//! a response is fully sent before the next receive starts. Per-request
//! failures are logged and counted; only resolving and binding can fail the
//! server.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use chrono::Utc;
use tokio::net::UdpSocket;
use tracing::{debug, info, instrument, warn};

use crate::adapters::privileges;
use crate::config::ServerConfig;
use crate::error::StratumdError;
use crate::fmt::text::render_packet;
use crate::ntp::{packet, timestamp};
use crate::stats::ServeStats;

use super::handler::{HandleResult, handle_request};

/// Large enough that oversize datagrams show up as malformed rather than
/// being truncated to a valid-looking header.
pub const RECV_BUFFER_LEN: usize = 512;

pub struct Listener {
    sock: UdpSocket,
    resample_transmit: bool,
    stats: ServeStats,
}

impl Listener {
    /// Resolve and bind the configured address. Both failures are fatal.
    #[instrument(skip(config), fields(listen = %config.listen, port = config.port))]
    pub async fn bind(config: &ServerConfig) -> Result<Self, StratumdError> {
        let addr = config.bind_addr()?;
        if privileges::needs_privilege(addr.port()) {
            warn!(
                "port {} is privileged and the process is not root; bind may fail",
                addr.port()
            );
        }
        let sock = UdpSocket::bind(addr)
            .await
            .map_err(|source| StratumdError::SocketBind { addr, source })?;
        info!("NTP responder listening on {}", sock.local_addr()?);

        Ok(Self {
            sock,
            resample_transmit: config.resample_transmit,
            stats: ServeStats::default(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    pub fn stats(&self) -> &ServeStats {
        &self.stats
    }

    /// Receive one datagram and answer it if it is a client request.
    pub async fn serve_one(&mut self) -> Result<(), StratumdError> {
        let mut buf = [0u8; RECV_BUFFER_LEN];
        let (len, peer) = self
            .sock
            .recv_from(&mut buf)
            .await
            .map_err(StratumdError::Receive)?;
        let now = Utc::now();
        self.stats.received += 1;

        let request = packet::decode(&buf[..len]).inspect_err(|_| {
            debug!(%peer, len, "dropping malformed datagram");
        })?;
        debug!(%peer, "received {}", render_packet(&request));

        let mut response = match handle_request(&request, now) {
            HandleResult::Response(response) => response,
            HandleResult::NoResponse(mode) => {
                debug!(%peer, %mode, "no response for mode");
                return Err(StratumdError::UnsupportedMode(mode));
            }
        };
        if self.resample_transmit {
            response.transmit_timestamp = timestamp::encode(Utc::now());
        }

        let bytes = packet::encode(&response);
        self.sock
            .send_to(&bytes, peer)
            .await
            .map_err(|source| StratumdError::Send { peer, source })?;
        self.stats.responded += 1;
        debug!(%peer, "sent {}", render_packet(&response));
        Ok(())
    }

    fn report(&mut self, err: StratumdError) {
        self.stats.record_error(&err);
        match err {
            StratumdError::Receive(_) | StratumdError::Send { .. } => warn!("{err}"),
            _ => debug!("{err}"),
        }
    }

    /// Serve until `shutdown` resolves, then hand back the counters.
    pub async fn run_until<F>(mut self, shutdown: F) -> ServeStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let outcome = tokio::select! {
                _ = &mut shutdown => None,
                res = self.serve_one() => Some(res),
            };
            match outcome {
                None => break,
                Some(Ok(())) => {}
                Some(Err(err)) => self.report(err),
            }
        }
        info!(
            received = self.stats.received,
            responded = self.stats.responded,
            "NTP responder stopped"
        );
        self.stats
    }

    /// Serve forever.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await;
    }
}
