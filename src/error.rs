//! Unified error types for the pinrelay daemon.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level startup and reload paths uniform.  Protocol-level rejections
//! never appear here: the command interpreter reports those to the client
//! as the `-1` reply and nothing else.

use core::fmt;
use std::io;

// ---------------------------------------------------------------------------
// Top-level daemon error
// ---------------------------------------------------------------------------

/// Every fallible operation outside the interpreter funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The pin configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// The GPIO backend refused an operation.
    Gpio(GpioError),
    /// The datagram transport failed.
    Transport(TransportError),
    /// PID file, signal handler or other process-lifecycle failure.
    Lifecycle(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Lifecycle(msg) => write!(f, "lifecycle: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Gpio(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Lifecycle(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while loading a pin configuration source.
///
/// Individual malformed lines are not errors: the parser skips them and
/// records a diagnostic.  Only conditions that invalidate the whole table
/// surface here.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration source could not be read.
    Io { path: String, source: io::Error },
    /// A pin is listed as both forced-high and forced-low.
    ConflictingLevel { pin: u8 },
    /// Daemon settings are out of range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::ConflictingLevel { pin } => {
                write!(f, "pin {pin} is listed as both forced-high and forced-low")
            }
            Self::Invalid(msg) => write!(f, "invalid setting: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum GpioError {
    /// The pin identifier is not addressable by this backend.
    InvalidPin(u8),
    /// The backend returned a value it could not interpret.
    UnexpectedValue { pin: u8, value: String },
    /// Underlying I/O failed (sysfs write, permission, etc.).
    Io { pin: u8, source: io::Error },
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "pin {pin} is not addressable"),
            Self::UnexpectedValue { pin, value } => {
                write!(f, "pin {pin}: unexpected value {value:?}")
            }
            Self::Io { pin, source } => write!(f, "pin {pin}: {source}"),
        }
    }
}

impl std::error::Error for GpioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum TransportError {
    /// The socket could not be bound.  Fatal at startup.
    Bind { addr: String, source: io::Error },
    /// A receive failed for a reason other than timeout.
    Recv(io::Error),
    /// A send failed or wrote a short datagram.
    Send(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "could not bind to {addr}: {source}"),
            Self::Recv(e) => write!(f, "receive failed: {e}"),
            Self::Send(e) => write!(f, "send failed: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Recv(source) | Self::Send(source) => Some(source),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
