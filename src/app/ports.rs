//! Port traits — the hexagonal boundary between the command core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GpioService (domain)
//! ```
//!
//! Driven adapters (GPIO backends, the power controller, event sinks)
//! implement these traits.  [`GpioService`](super::service::GpioService)
//! consumes them via generics, so the protocol core never touches
//! hardware directly and every test runs against mocks.

pub use embedded_hal::digital::PinState;

use crate::error::{ConfigError, GpioError};
use crate::roles::PinRoleTable;

// ───────────────────────────────────────────────────────────────
// Pin mode / direction
// ───────────────────────────────────────────────────────────────

/// Mode requested by the device initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Output,
    Input,
}

/// Current function of a line as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Output,
    Input,
    /// Claimed by a peripheral (UART, SPI, PWM ...).
    Alternate,
}

impl Direction {
    /// State-query character: anything driving the line reports `O`.
    pub fn as_char(self) -> char {
        match self {
            Self::Output | Self::Alternate => 'O',
            Self::Input => 'I',
        }
    }
}

/// Reply digit for a level.
pub fn level_char(level: PinState) -> char {
    match level {
        PinState::High => '1',
        PinState::Low => '0',
    }
}

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain ↔ pin driver)
// ───────────────────────────────────────────────────────────────

/// Digital GPIO capability.  Calls are synchronous and expected to be
/// fast; the request loop holds no locks while calling them.
pub trait GpioPort {
    /// Configure a line as input or output.
    fn set_mode(&mut self, pin: u8, mode: Mode) -> Result<(), GpioError>;

    /// Drive a line to `level`.
    fn write_level(&mut self, pin: u8, level: PinState) -> Result<(), GpioError>;

    /// Sample a line.  Works regardless of the line's configured role.
    fn read_level(&mut self, pin: u8) -> Result<PinState, GpioError>;

    /// Query the line's current function.
    fn read_direction(&mut self, pin: u8) -> Result<Direction, GpioError>;
}

// ───────────────────────────────────────────────────────────────
// Power port (driven adapter: domain → host OS)
// ───────────────────────────────────────────────────────────────

/// Privileged machine power control reachable through `XX50` / `XX70`.
///
/// # Security
///
/// The datagram protocol is unauthenticated.  Anyone who can reach the
/// port can reboot or halt the host when this capability is live, which
/// is why the daemon wires in a refusing implementation unless
/// `--allow-power-commands` is given.
pub trait PowerPort {
    /// Restart the machine.
    fn restart(&mut self) -> Result<(), PowerError>;

    /// Halt the machine.
    fn shutdown(&mut self) -> Result<(), PowerError>;
}

/// Errors from [`PowerPort`] operations.
#[derive(Debug)]
pub enum PowerError {
    /// Power commands are not enabled in the daemon configuration.
    Disabled,
    /// The power command could not be run or exited unsuccessfully.
    CommandFailed(String),
}

impl core::fmt::Display for PowerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disabled => write!(f, "power commands are disabled"),
            Self::CommandFailed(msg) => write!(f, "power command failed: {}", msg),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← pin configuration)
// ───────────────────────────────────────────────────────────────

/// Source of the pin role table, read at startup and on every reload.
///
/// Implementations MUST return a validated table or an error; a failed
/// load never yields a partial table.
pub trait ConfigPort {
    fn load_roles(&mut self) -> Result<PinRoleTable, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The service emits lifecycle [`AppEvent`](super::events::AppEvent)s
/// through this port.  Protocol rejections are not events.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
