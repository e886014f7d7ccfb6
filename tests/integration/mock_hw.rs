//! Mock adapters for integration tests.
//!
//! Records every GPIO and power call so tests can assert on the full
//! command history without touching real pins.

use std::collections::VecDeque;

use pinrelay::app::events::AppEvent;
use pinrelay::app::ports::{
    ConfigPort, Direction, EventSink, GpioPort, Mode, PinState, PowerError, PowerPort,
};
use pinrelay::error::{ConfigError, GpioError, TransportError};
use pinrelay::pins::PIN_COUNT;
use pinrelay::roles::PinRoleTable;
use pinrelay::server::transport::Transport;

// ── GPIO call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    SetMode { pin: u8, mode: Mode },
    WriteLevel { pin: u8, level: PinState },
    ReadLevel { pin: u8 },
    ReadDirection { pin: u8 },
}

// ── MockGpio ──────────────────────────────────────────────────

/// Pin bank that remembers levels and directions and logs every call.
pub struct MockGpio {
    pub calls: Vec<GpioCall>,
    levels: [PinState; PIN_COUNT as usize],
    directions: [Direction; PIN_COUNT as usize],
    /// When set, every operation on this pin fails.
    pub failing_pin: Option<u8>,
}

#[allow(dead_code)]
impl MockGpio {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            levels: [PinState::Low; PIN_COUNT as usize],
            directions: [Direction::Input; PIN_COUNT as usize],
            failing_pin: None,
        }
    }

    pub fn level(&self, pin: u8) -> PinState {
        self.levels[pin as usize]
    }

    pub fn set_level(&mut self, pin: u8, level: PinState) {
        self.levels[pin as usize] = level;
    }

    pub fn set_direction(&mut self, pin: u8, direction: Direction) {
        self.directions[pin as usize] = direction;
    }

    pub fn writes(&self) -> Vec<(u8, PinState)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                GpioCall::WriteLevel { pin, level } => Some((pin, level)),
                _ => None,
            })
            .collect()
    }

    pub fn mutations(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpioCall::WriteLevel { .. } | GpioCall::SetMode { .. }))
            .count()
    }

    fn check(&self, pin: u8) -> Result<usize, GpioError> {
        if pin >= PIN_COUNT || self.failing_pin == Some(pin) {
            Err(GpioError::InvalidPin(pin))
        } else {
            Ok(pin as usize)
        }
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioPort for MockGpio {
    fn set_mode(&mut self, pin: u8, mode: Mode) -> Result<(), GpioError> {
        self.calls.push(GpioCall::SetMode { pin, mode });
        let i = self.check(pin)?;
        self.directions[i] = match mode {
            Mode::Output => Direction::Output,
            Mode::Input => Direction::Input,
        };
        Ok(())
    }

    fn write_level(&mut self, pin: u8, level: PinState) -> Result<(), GpioError> {
        self.calls.push(GpioCall::WriteLevel { pin, level });
        let i = self.check(pin)?;
        self.levels[i] = level;
        Ok(())
    }

    fn read_level(&mut self, pin: u8) -> Result<PinState, GpioError> {
        self.calls.push(GpioCall::ReadLevel { pin });
        let i = self.check(pin)?;
        Ok(self.levels[i])
    }

    fn read_direction(&mut self, pin: u8) -> Result<Direction, GpioError> {
        self.calls.push(GpioCall::ReadDirection { pin });
        let i = self.check(pin)?;
        Ok(self.directions[i])
    }
}

// ── MockPower ─────────────────────────────────────────────────

/// Counts power requests.  `enabled = false` behaves like the daemon's
/// default refusing adapter.
pub struct MockPower {
    pub enabled: bool,
    pub restarts: u32,
    pub shutdowns: u32,
}

#[allow(dead_code)]
impl MockPower {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            restarts: 0,
            shutdowns: 0,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::enabled()
        }
    }
}

impl PowerPort for MockPower {
    fn restart(&mut self) -> Result<(), PowerError> {
        if !self.enabled {
            return Err(PowerError::Disabled);
        }
        self.restarts += 1;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), PowerError> {
        if !self.enabled {
            return Err(PowerError::Disabled);
        }
        self.shutdowns += 1;
        Ok(())
    }
}

// ── MockTransport ─────────────────────────────────────────────

/// One scripted receive outcome.
#[allow(dead_code)]
pub enum Inbound {
    Datagram(Vec<u8>),
    Timeout,
    Error,
}

/// Serves scripted datagrams, then times out forever.  Once the script
/// runs dry it can raise shutdown through `on_drained`.
pub struct MockTransport {
    pub inbox: VecDeque<Inbound>,
    pub sent: Vec<(Vec<u8>, u32)>,
    /// Number of upcoming sends that fail.
    pub failing_sends: usize,
    pub on_drained: Option<pinrelay::control::Control>,
    next_peer: u32,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(requests: &[&str]) -> Self {
        Self {
            inbox: requests
                .iter()
                .map(|r| Inbound::Datagram(r.as_bytes().to_vec()))
                .collect(),
            sent: Vec::new(),
            failing_sends: 0,
            on_drained: None,
            next_peer: 0,
        }
    }

    /// Replies as strings, trailing NUL stripped.
    pub fn replies(&self) -> Vec<String> {
        self.sent
            .iter()
            .map(|(data, _)| {
                let body = data.strip_suffix(b"\0").unwrap_or(data.as_slice());
                String::from_utf8_lossy(body).into_owned()
            })
            .collect()
    }
}

impl Transport for MockTransport {
    type Peer = u32;

    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, u32)>, TransportError> {
        match self.inbox.pop_front() {
            Some(Inbound::Datagram(d)) => {
                let n = d.len().min(buf.len());
                buf[..n].copy_from_slice(&d[..n]);
                self.next_peer += 1;
                Ok(Some((n, self.next_peer)))
            }
            Some(Inbound::Timeout) => Ok(None),
            Some(Inbound::Error) => Err(TransportError::Recv(std::io::Error::other("mock recv"))),
            None => {
                if let Some(control) = &self.on_drained {
                    control.request_shutdown();
                }
                Ok(None)
            }
        }
    }

    fn send(&mut self, data: &[u8], peer: u32) -> Result<(), TransportError> {
        if self.failing_sends > 0 {
            self.failing_sends -= 1;
            return Err(TransportError::Send(std::io::Error::other("mock send")));
        }
        self.sent.push((data.to_vec(), peer));
        Ok(())
    }

    fn describe(&self) -> String {
        "mock".into()
    }
}

// ── MockConfig ────────────────────────────────────────────────

/// Hands out queued load results; an empty queue is a read error.
pub struct MockConfig {
    pub loads: VecDeque<Result<PinRoleTable, ConfigError>>,
}

#[allow(dead_code)]
impl MockConfig {
    pub fn new() -> Self {
        Self {
            loads: VecDeque::new(),
        }
    }

    pub fn then(mut self, result: Result<PinRoleTable, ConfigError>) -> Self {
        self.loads.push_back(result);
        self
    }
}

impl ConfigPort for MockConfig {
    fn load_roles(&mut self) -> Result<PinRoleTable, ConfigError> {
        self.loads
            .pop_front()
            .unwrap_or(Err(ConfigError::Invalid("no configuration queued")))
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Collects emitted events.
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
