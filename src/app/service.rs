//! Application service — the command interpreter.
//!
//! [`GpioService`] owns the live [`PinRoleTable`] and turns one request
//! datagram into one reply.  All I/O flows through port traits passed in
//! at the call site, so the whole interpreter is testable with mocks.
//!
//! ```text
//!  request ──▶ decode ──▶ ┌──────────────┐ ──▶ GpioPort
//!                         │  GpioService │ ──▶ PowerPort
//!  reply   ◀──────────────│  role table  │ ──▶ EventSink
//!                         └──────────────┘
//! ```
//!
//! Every failure inside the interpreter ends as the `-1` reply.  Nothing
//! propagates to the caller.

use core::fmt;

use log::{debug, error, info, warn};

use super::commands::{self, DecodeError, Reply, Request, SetAction};
use super::events::{AppEvent, PowerAction, RoleCounts};
use super::init;
use super::ports::{EventSink, GpioPort, PinState, PowerError, PowerPort, level_char};
use crate::error::GpioError;
use crate::pins::{ALL_PINS, HEADER_PINS, PIN_COUNT};
use crate::roles::PinRoleTable;

// ───────────────────────────────────────────────────────────────
// Rejections
// ───────────────────────────────────────────────────────────────

/// Internal reason a request was answered with `-1`.
#[derive(Debug)]
enum Rejection {
    Decode(DecodeError),
    NotOutput(u8),
    Gpio(GpioError),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "{e}"),
            Self::NotOutput(pin) => write!(f, "pin {pin} is not a configured output"),
            Self::Gpio(e) => write!(f, "{e}"),
        }
    }
}

impl From<DecodeError> for Rejection {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<GpioError> for Rejection {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ───────────────────────────────────────────────────────────────
// GpioService
// ───────────────────────────────────────────────────────────────

pub struct GpioService {
    roles: PinRoleTable,
    requests: u64,
    rejected: u64,
}

impl GpioService {
    pub fn new(roles: PinRoleTable) -> Self {
        Self {
            roles,
            requests: 0,
            rejected: 0,
        }
    }

    // ── Role table ────────────────────────────────────────────

    pub fn roles(&self) -> &PinRoleTable {
        &self.roles
    }

    /// Apply the current table to the hardware.  Call once at startup.
    pub fn initialize(
        &self,
        gpio: &mut impl GpioPort,
        sink: &mut impl EventSink,
    ) -> Result<(), GpioError> {
        init::apply_roles(&self.roles, gpio)?;
        sink.emit(&AppEvent::RolesApplied(RoleCounts::from(&self.roles)));
        Ok(())
    }

    /// Substitute a reloaded table.  Forced levels are not re-applied;
    /// the new table governs authorization from the next request on.
    pub fn replace_roles(&mut self, roles: PinRoleTable, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::ConfigReloaded(RoleCounts::from(&roles)));
        self.roles = roles;
    }

    // ── Request handling ──────────────────────────────────────

    /// Interpret one request datagram and build its reply.
    pub fn handle(
        &mut self,
        raw: &[u8],
        gpio: &mut impl GpioPort,
        power: &mut impl PowerPort,
        sink: &mut impl EventSink,
    ) -> Reply {
        self.requests += 1;

        let outcome = commands::decode(raw)
            .map_err(Rejection::from)
            .and_then(|request| self.execute(request, gpio, power, sink));

        match outcome {
            Ok(reply) => reply,
            Err(rejection) => {
                self.rejected += 1;
                match &rejection {
                    Rejection::Gpio(e) => warn!("request {:?}: {}", raw_text(raw), e),
                    _ => debug!("request {:?} rejected: {}", raw_text(raw), rejection),
                }
                commands::error_reply()
            }
        }
    }

    fn execute(
        &self,
        request: Request,
        gpio: &mut impl GpioPort,
        power: &mut impl PowerPort,
        sink: &mut impl EventSink,
    ) -> Result<Reply, Rejection> {
        match request {
            Request::Set { pin, action } => {
                if !self.roles.is_output(pin) {
                    return Err(Rejection::NotOutput(pin));
                }
                let level = match action {
                    SetAction::Low => PinState::Low,
                    SetAction::High => PinState::High,
                    SetAction::Toggle => !gpio.read_level(pin)?,
                };
                gpio.write_level(pin, level)?;
                let reported = match action {
                    // Report what the line reads back after the flip.
                    SetAction::Toggle => gpio.read_level(pin)?,
                    _ => level,
                };
                Ok(commands::pin_reply(pin, level_char(reported)))
            }

            Request::Read { pin } if pin == ALL_PINS => {
                let mut reply = Reply::new();
                for line in 0..PIN_COUNT {
                    let c = level_char(gpio.read_level(line)?);
                    // 32 characters always fit.
                    let _ = reply.push(c);
                }
                Ok(reply)
            }
            Request::Read { pin } => Ok(commands::pin_reply(pin, level_char(gpio.read_level(pin)?))),

            Request::State { pin } if pin == ALL_PINS => {
                let mut reply = Reply::new();
                for line in HEADER_PINS {
                    let _ = reply.push(gpio.read_direction(line)?.as_char());
                }
                Ok(reply)
            }
            Request::State { pin } => {
                Ok(commands::pin_reply(pin, gpio.read_direction(pin)?.as_char()))
            }

            Request::Ping { power: None } => Ok(commands::ping_reply()),
            Request::Ping {
                power: Some(action),
            } => {
                run_power_action(action, power, sink);
                Ok(commands::ping_reply())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Requests handled since startup.
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    /// Requests answered with `-1` since startup.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}

fn run_power_action(action: PowerAction, power: &mut impl PowerPort, sink: &mut impl EventSink) {
    let result = match action {
        PowerAction::Restart => power.restart(),
        PowerAction::Shutdown => power.shutdown(),
    };
    let executed = match result {
        Ok(()) => {
            info!("power: {:?} issued", action);
            true
        }
        Err(PowerError::Disabled) => {
            warn!("power: {:?} requested but power commands are disabled", action);
            false
        }
        Err(e) => {
            error!("power: {:?} failed: {}", action, e);
            false
        }
    };
    sink.emit(&AppEvent::PowerRequested { action, executed });
}

fn raw_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
