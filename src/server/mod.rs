//! Datagram request loop.
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Transport │──▶│ Request loop │──▶│ GpioService  │──▶ GpioPort
//! │ (recv)    │   │  polls       │   │ (interpreter)│
//! └───────────┘   │  Control     │   └──────────────┘
//!       ▲         └──────────────┘           │
//!       └──────────────── reply ─────────────┘
//! ```
//!
//! Strictly one request at a time: receive, interpret, reply, repeat.
//! Between datagrams (and on every receive timeout) the loop checks the
//! [`Control`] flags for shutdown and reload.  A reload builds a fresh
//! table and swaps it into the service; the table is never edited in place.

pub mod transport;

use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::app::commands::REPLY_CAPACITY;
use crate::app::events::AppEvent;
use crate::app::ports::{ConfigPort, EventSink, GpioPort, PowerPort};
use crate::app::service::GpioService;
use crate::config::DaemonConfig;
use crate::control::Control;
use transport::Transport;

/// Datagrams are read into a buffer of this size; longer ones are
/// truncated by the socket.
pub const RECV_BUF_SIZE: usize = 50;

/// Pause after a failed receive so a broken socket cannot spin the loop.
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Loop behaviour taken from the daemon settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerOptions {
    pub nul_terminate: bool,
    pub request_interval: Option<Duration>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            nul_terminate: true,
            request_interval: None,
        }
    }
}

impl From<&DaemonConfig> for ServerOptions {
    fn from(config: &DaemonConfig) -> Self {
        Self {
            nul_terminate: config.nul_terminate_replies,
            request_interval: config.request_interval(),
        }
    }
}

/// What one [`Server::poll_once`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A request was answered (or the reply failed to send).
    Served,
    /// Nothing arrived before the timeout, or the receive failed.
    Idle,
    /// Shutdown was requested.
    Stop,
}

/// Everything the loop drives.  Fields are public so callers assemble it
/// with a struct literal.
pub struct Server<T, G, P, C, S> {
    pub transport: T,
    pub gpio: G,
    pub power: P,
    pub config: C,
    pub sink: S,
    pub service: GpioService,
    pub control: Control,
    pub options: ServerOptions,
}

impl<T, G, P, C, S> Server<T, G, P, C, S>
where
    T: Transport,
    G: GpioPort,
    P: PowerPort,
    C: ConfigPort,
    S: EventSink,
{
    /// Serve until shutdown is requested.  Returns the number of requests
    /// handled.
    pub fn run(&mut self) -> u64 {
        self.sink.emit(&AppEvent::Started {
            listen: self.transport.describe(),
        });
        while self.poll_once() != Poll::Stop {}
        let requests = self.service.request_count();
        self.sink.emit(&AppEvent::Stopped { requests });
        requests
    }

    /// One loop iteration: control flags, then at most one datagram.
    pub fn poll_once(&mut self) -> Poll {
        self.control.poll_signals();
        if self.control.shutdown_requested() {
            return Poll::Stop;
        }
        if self.control.take_reload() {
            self.reload();
        }

        let mut buf = [0u8; RECV_BUF_SIZE];
        let (len, peer) = match self.transport.recv(&mut buf) {
            Ok(Some(received)) => received,
            Ok(None) => return Poll::Idle,
            Err(e) => {
                warn!("{}", e);
                thread::sleep(RECV_ERROR_BACKOFF);
                return Poll::Idle;
            }
        };

        let reply = self
            .service
            .handle(&buf[..len], &mut self.gpio, &mut self.power, &mut self.sink);
        debug!("{} -> {:?}", peer, reply.as_str());

        let mut datagram: heapless::Vec<u8, { REPLY_CAPACITY + 1 }> = heapless::Vec::new();
        // A reply is at most REPLY_CAPACITY bytes, so the NUL always fits.
        let _ = datagram.extend_from_slice(reply.as_bytes());
        if self.options.nul_terminate {
            let _ = datagram.push(0);
        }
        if let Err(e) = self.transport.send(&datagram, peer) {
            warn!("reply to {}: {}", peer, e);
        }

        if let Some(pause) = self.options.request_interval {
            thread::sleep(pause);
        }
        Poll::Served
    }

    /// Re-read the pin configuration and swap it in.  On failure the
    /// previous table stays in effect.
    pub fn reload(&mut self) {
        match self.config.load_roles() {
            Ok(roles) => self.service.replace_roles(roles, &mut self.sink),
            Err(e) => self.sink.emit(&AppEvent::ConfigReloadFailed(e.to_string())),
        }
    }
}
