//! Pin state reporting (--get and --dump)

use std::error::Error;
use std::io::Write;

use cbusctl_core::{CbusDevice, CbusPin, Controller};

/// Print one pin as `CBUSn: FUNCTION`, with its live level if in IOMODE
pub fn print_pin<D: CbusDevice + ?Sized, W: Write>(
    ctrl: &mut Controller<'_, D>,
    pin: CbusPin,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let state = ctrl.pin_state(pin)?;
    writeln!(out, "{}", state)?;
    Ok(())
}

/// Print the chip identity followed by every CBUS pin
pub fn run_dump<D: CbusDevice + ?Sized, W: Write>(
    ctrl: &mut Controller<'_, D>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let info = ctrl.chip_info()?;
    writeln!(out, "Chip: {}", info)?;

    for pin in CbusPin::all() {
        print_pin(ctrl, pin, out)?;
    }

    Ok(())
}
