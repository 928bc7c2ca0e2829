//! CBUS pin controller
//!
//! The [`Controller`] borrows an opened [`CbusDevice`] for the duration of a
//! run. It owns the bitbang shadow byte and a dirty flag for EEPROM function
//! changes.
//!
//! Function changes and pin I/O do not mix within a run: the chip only picks
//! up new CBUS functions after a power cycle, so callers are expected to stop
//! once [`commit`](Controller::commit) reports a write.

use std::fmt;

use crate::device::{CbusDevice, ChipInfo};
use crate::error::Result;
use crate::function::{function_name, CbusFunction, FunctionAssignment, IOMODE};
use crate::pins::{CbusPin, Level, PinShadow};

/// Configured function and live level of one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinState {
    /// The pin described
    pub pin: CbusPin,
    /// EEPROM function code of the pin
    pub function: u8,
    /// Live level, only sampled for pins in IOMODE
    pub level: Option<Level>,
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CBUS{}: {}", self.pin, function_name(self.function))?;
        if let Some(level) = self.level {
            write!(f, " ({})", level)?;
        }
        Ok(())
    }
}

/// Applies function changes and pin operations to a device
pub struct Controller<'a, D: CbusDevice + ?Sized> {
    device: &'a mut D,
    shadow: PinShadow,
    dirty: bool,
}

impl<'a, D: CbusDevice + ?Sized> Controller<'a, D> {
    /// Create a controller; every pin starts out as an input
    pub fn new(device: &'a mut D) -> Self {
        Self {
            device,
            shadow: PinShadow::new(),
            dirty: false,
        }
    }

    /// Current shadow byte
    pub fn shadow(&self) -> PinShadow {
        self.shadow
    }

    /// Whether any function change is waiting for [`commit`](Self::commit)
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Stage a function change in the EEPROM image
    ///
    /// Out-of-range pins and unknown function names are skipped. Returns
    /// `true` only if the image actually changed.
    pub fn assign(&mut self, assignment: &FunctionAssignment) -> bool {
        let Some(pin) = CbusPin::new(assignment.pin) else {
            log::debug!("Ignoring --set for out-of-range pin {}", assignment.pin);
            return false;
        };
        let Some(func) = CbusFunction::by_name(&assignment.function) else {
            log::debug!("Ignoring unknown CBUS function '{}'", assignment.function);
            return false;
        };

        let current = self.device.cbus_function(pin);
        if current == func.code {
            log::debug!("CBUS{} already set to {}", pin, func);
            return false;
        }

        log::debug!(
            "CBUS{}: {} -> {}",
            pin,
            function_name(current),
            func
        );
        self.device.set_cbus_function(pin, func.code);
        self.dirty = true;
        true
    }

    /// Flash staged function changes to the EEPROM
    ///
    /// Returns `true` if a write happened. Nothing is written when no change
    /// is pending.
    pub fn commit(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }

        log::info!("Writing CBUS function changes to EEPROM");
        self.device.write_eeprom()?;
        self.dirty = false;
        Ok(true)
    }

    /// Make `pin` an output at `level`
    pub fn drive(&mut self, pin: CbusPin, level: Level) -> Result<()> {
        self.shadow.set_output(pin, level);
        self.flush()
    }

    /// Invert the live level of `pin`, returning the new level
    pub fn toggle(&mut self, pin: CbusPin) -> Result<Level> {
        let level = !self.level(pin)?;
        self.drive(pin, level)?;
        Ok(level)
    }

    /// Return `pin` to input
    pub fn set_input(&mut self, pin: CbusPin) -> Result<()> {
        self.shadow.set_input(pin);
        self.flush()
    }

    /// Sample the live level of `pin`
    pub fn level(&mut self, pin: CbusPin) -> Result<Level> {
        let pins = self.device.read_pins()?;
        log::trace!("Pin read: 0x{:02X}", pins);
        Ok(Level::from_pins(pins, pin))
    }

    /// Configured function of `pin`, plus its level when it is in IOMODE
    pub fn pin_state(&mut self, pin: CbusPin) -> Result<PinState> {
        let function = self.device.cbus_function(pin);
        let level = if function == IOMODE {
            Some(self.level(pin)?)
        } else {
            None
        };
        Ok(PinState {
            pin,
            function,
            level,
        })
    }

    /// Chip family and identifier
    pub fn chip_info(&mut self) -> Result<ChipInfo> {
        self.device.chip_info()
    }

    fn flush(&mut self) -> Result<()> {
        let bits = self.shadow.bits();
        log::debug!("Setting CBUS bitmode 0x{:02X}", bits);
        self.device.set_cbus_bits(bits)
    }
}
