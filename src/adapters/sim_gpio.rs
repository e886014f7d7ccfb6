//! In-memory GPIO bank.
//!
//! Backs `--simulate` runs and unit tests.  Output latches hold their
//! level regardless of direction, like real hardware: a level written to
//! an input line is remembered and appears once the line becomes an
//! output.  Unconfigured lines read low and report direction input.

use log::trace;

use crate::app::ports::{Direction, GpioPort, Mode, PinState};
use crate::error::GpioError;
use crate::pins::{PIN_COUNT, is_addressable};

pub struct SimGpio {
    levels: [PinState; PIN_COUNT as usize],
    directions: [Direction; PIN_COUNT as usize],
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimGpio {
    pub fn new() -> Self {
        Self {
            levels: [PinState::Low; PIN_COUNT as usize],
            directions: [Direction::Input; PIN_COUNT as usize],
        }
    }

    /// Mark a line as claimed by a peripheral.
    pub fn set_alternate(&mut self, pin: u8) -> Result<(), GpioError> {
        self.directions[index(pin)?] = Direction::Alternate;
        Ok(())
    }

    /// Drive an input line from "outside", as a sensor would.
    pub fn set_input_level(&mut self, pin: u8, level: PinState) -> Result<(), GpioError> {
        self.levels[index(pin)?] = level;
        Ok(())
    }

    /// Current level of a line; low for unknown pins.
    pub fn level(&self, pin: u8) -> PinState {
        index(pin).map_or(PinState::Low, |i| self.levels[i])
    }

    /// Current direction of a line; input for unknown pins.
    pub fn direction(&self, pin: u8) -> Direction {
        index(pin).map_or(Direction::Input, |i| self.directions[i])
    }
}

fn index(pin: u8) -> Result<usize, GpioError> {
    if is_addressable(pin) {
        Ok(pin as usize)
    } else {
        Err(GpioError::InvalidPin(pin))
    }
}

impl GpioPort for SimGpio {
    fn set_mode(&mut self, pin: u8, mode: Mode) -> Result<(), GpioError> {
        trace!("sim: pin {} mode {:?}", pin, mode);
        self.directions[index(pin)?] = match mode {
            Mode::Output => Direction::Output,
            Mode::Input => Direction::Input,
        };
        Ok(())
    }

    fn write_level(&mut self, pin: u8, level: PinState) -> Result<(), GpioError> {
        trace!("sim: pin {} <- {:?}", pin, level);
        self.levels[index(pin)?] = level;
        Ok(())
    }

    fn read_level(&mut self, pin: u8) -> Result<PinState, GpioError> {
        Ok(self.levels[index(pin)?])
    }

    fn read_direction(&mut self, pin: u8) -> Result<Direction, GpioError> {
        Ok(self.directions[index(pin)?])
    }
}
