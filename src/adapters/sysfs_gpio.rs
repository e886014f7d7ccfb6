//! Linux sysfs GPIO backend (`/sys/class/gpio`).
//!
//! Pin identifiers are wiringPi numbers and are translated to BCM lines
//! through [`crate::pins::bcm_line`].  Lines are exported on first use.
//!
//! sysfs refuses writes to the `value` of an input line, so a level
//! written before the line is an output is held here and applied
//! atomically with the direction change (`echo high > direction`).  That
//! is what makes the initializer's "levels before modes" order
//! glitch-free on this backend.  Deferral only applies to lines this
//! backend has not yet switched to output; a line it configured as output
//! that reads back as input (reconfigured behind the daemon's back) gets
//! its direction re-asserted with the requested level.
//!
//! sysfs cannot see alternate functions; such lines report whatever
//! direction the kernel shows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::app::ports::{Direction, GpioPort, Mode, PinState};
use crate::error::GpioError;
use crate::pins::{PIN_COUNT, bcm_line};

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

pub struct SysfsGpio {
    root: PathBuf,
    exported: [bool; PIN_COUNT as usize],
    pending: [Option<PinState>; PIN_COUNT as usize],
    /// Lines this backend has set to output.
    driven: [bool; PIN_COUNT as usize],
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exported: [false; PIN_COUNT as usize],
            pending: [None; PIN_COUNT as usize],
            driven: [false; PIN_COUNT as usize],
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn line_path(&self, line: u8, attr: &str) -> PathBuf {
        self.root.join(format!("gpio{line}")).join(attr)
    }

    /// BCM line for `pin`, exporting it if needed.
    fn line(&mut self, pin: u8) -> Result<u8, GpioError> {
        let line = bcm_line(pin).ok_or(GpioError::InvalidPin(pin))?;
        if !self.exported[pin as usize] {
            if !self.root.join(format!("gpio{line}")).exists() {
                debug!("sysfs: exporting BCM {} for pin {}", line, pin);
                fs::write(self.root.join("export"), line.to_string()).map_err(io_err(pin))?;
            }
            self.exported[pin as usize] = true;
        }
        Ok(line)
    }

    fn read_attr(&mut self, pin: u8, attr: &str) -> Result<String, GpioError> {
        let line = self.line(pin)?;
        let text = fs::read_to_string(self.line_path(line, attr)).map_err(io_err(pin))?;
        Ok(text.trim().to_owned())
    }

    fn write_attr(&mut self, pin: u8, attr: &str, value: &str) -> Result<(), GpioError> {
        let line = self.line(pin)?;
        trace!("sysfs: gpio{}/{} <- {}", line, attr, value);
        fs::write(self.line_path(line, attr), value).map_err(io_err(pin))
    }
}

fn io_err(pin: u8) -> impl Fn(io::Error) -> GpioError {
    move |source| GpioError::Io { pin, source }
}

/// Direction value that switches a line to output at `level`.
fn direction_with_level(level: PinState) -> &'static str {
    match level {
        PinState::High => "high",
        PinState::Low => "low",
    }
}

impl GpioPort for SysfsGpio {
    fn set_mode(&mut self, pin: u8, mode: Mode) -> Result<(), GpioError> {
        let value = match mode {
            Mode::Input => "in",
            Mode::Output => match self.pending.get_mut(pin as usize).and_then(Option::take) {
                Some(level) => direction_with_level(level),
                None => "out",
            },
        };
        self.write_attr(pin, "direction", value)?;
        self.driven[pin as usize] = mode == Mode::Output;
        Ok(())
    }

    fn write_level(&mut self, pin: u8, level: PinState) -> Result<(), GpioError> {
        if self.read_direction(pin)? == Direction::Output {
            let value = match level {
                PinState::High => "1",
                PinState::Low => "0",
            };
            self.write_attr(pin, "value", value)
        } else if self.driven[pin as usize] {
            warn!("sysfs: pin {} was switched to input externally, restoring output", pin);
            self.write_attr(pin, "direction", direction_with_level(level))
        } else {
            self.pending[pin as usize] = Some(level);
            Ok(())
        }
    }

    fn read_level(&mut self, pin: u8) -> Result<PinState, GpioError> {
        match self.read_attr(pin, "value")?.as_str() {
            "0" => Ok(PinState::Low),
            "1" => Ok(PinState::High),
            other => Err(GpioError::UnexpectedValue {
                pin,
                value: other.to_owned(),
            }),
        }
    }

    fn read_direction(&mut self, pin: u8) -> Result<Direction, GpioError> {
        match self.read_attr(pin, "direction")?.as_str() {
            "out" => Ok(Direction::Output),
            "in" => Ok(Direction::Input),
            other => Err(GpioError::UnexpectedValue {
                pin,
                value: other.to_owned(),
            }),
        }
    }
}
