//! One-shot device initialization from the role table.
//!
//! Order matters: every forced level is written before any line is
//! switched to output, otherwise a pin can briefly drive whatever level
//! its output latch held when its direction flips.

use log::{debug, info};

use super::ports::{GpioPort, Mode, PinState};
use crate::error::GpioError;
use crate::roles::PinRoleTable;

/// Apply `table` to the hardware: high levels, low levels, output modes,
/// input modes, in that order.  Stops at the first backend error.
pub fn apply_roles(table: &PinRoleTable, gpio: &mut impl GpioPort) -> Result<(), GpioError> {
    for pin in table.high.iter() {
        debug!("init: pin {} forced high", pin);
        gpio.write_level(pin, PinState::High)?;
    }
    for pin in table.low.iter() {
        debug!("init: pin {} forced low", pin);
        gpio.write_level(pin, PinState::Low)?;
    }
    for pin in table.out.iter() {
        gpio.set_mode(pin, Mode::Output)?;
    }
    for pin in table.input.iter() {
        gpio.set_mode(pin, Mode::Input)?;
    }

    info!(
        "init: {} output(s), {} input(s), {} forced high, {} forced low",
        table.out.len(),
        table.input.len(),
        table.high.len(),
        table.low.len()
    );
    Ok(())
}
