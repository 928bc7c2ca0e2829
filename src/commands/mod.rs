//! Command dispatch
//!
//! A run applies every requested operation in a fixed order, regardless of
//! the order the flags were given in:
//!
//! 1. function changes (`--set`), written to the EEPROM if anything changed
//! 2. `--high`, `--low`, `--toggle`, `--input`, each as a batch
//! 3. `--get`
//! 4. `--dump`
//!
//! An EEPROM write ends the run after step 1, since the chip only picks up
//! new functions after a power cycle. So does `--detach`.

mod dump;

use std::error::Error;
use std::io::Write;

use cbusctl_core::{CbusDevice, CbusPin, Controller, FunctionAssignment, Level};

pub use dump::{print_pin, run_dump};

/// Everything requested on the command line
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Function changes
    pub set: Vec<FunctionAssignment>,
    /// Pins to drive high
    pub high: Vec<i32>,
    /// Pins to drive low
    pub low: Vec<i32>,
    /// Pins to invert
    pub toggle: Vec<i32>,
    /// Pins to return to input
    pub input: Vec<i32>,
    /// Pin to query
    pub get: Option<i32>,
    /// Print chip ID and all pins
    pub dump: bool,
    /// Stop before any pin operation
    pub detach: bool,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The EEPROM was rewritten; pin operations were skipped
    PowerCycleRequired,
    /// `--detach` was given; pin operations were skipped
    Detached,
    /// All requested operations ran
    Done,
}

/// Valid pins out of a list of raw numbers; out-of-range entries are dropped
fn pins(nums: &[i32]) -> impl Iterator<Item = CbusPin> + '_ {
    nums.iter().filter_map(|&num| CbusPin::new(num))
}

/// Read the EEPROM and carry out `request`, reporting to `out`
pub fn run<D: CbusDevice, W: Write>(
    device: &mut D,
    request: &Request,
    out: &mut W,
) -> Result<Outcome, Box<dyn Error>> {
    device.read_eeprom()?;

    let mut ctrl = Controller::new(device);

    for assignment in &request.set {
        ctrl.assign(assignment);
    }

    if ctrl.commit()? {
        writeln!(out, "settings has been changed, FTDI power cycle is required")?;
        return Ok(Outcome::PowerCycleRequired);
    }

    if request.detach {
        log::info!("Detach requested, skipping pin operations");
        return Ok(Outcome::Detached);
    }

    for pin in pins(&request.high) {
        writeln!(out, "set HIGH {}", pin)?;
        ctrl.drive(pin, Level::High)?;
    }

    for pin in pins(&request.low) {
        writeln!(out, "set LOW {}", pin)?;
        ctrl.drive(pin, Level::Low)?;
    }

    for pin in pins(&request.toggle) {
        writeln!(out, "toggle {}", pin)?;
        ctrl.toggle(pin)?;
    }

    for pin in pins(&request.input) {
        writeln!(out, "set input {}", pin)?;
        ctrl.set_input(pin)?;
    }

    if let Some(pin) = request.get.and_then(CbusPin::new) {
        print_pin(&mut ctrl, pin, out)?;
    }

    if request.dump {
        run_dump(&mut ctrl, out)?;
    }

    Ok(Outcome::Done)
}
