//! Hardware capability trait
//!
//! [`CbusDevice`] is the narrow interface the controller needs from an
//! adapter. It mirrors the handful of library calls the tool makes and
//! nothing more.

use std::fmt;

use crate::error::Result;
use crate::pins::CbusPin;

/// Identity of the connected chip, as shown by a dump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipInfo {
    /// Chip family name as reported by the backend
    pub chip_type: String,
    /// FTDIChip-ID burned into the silicon
    pub chip_id: u32,
}

impl fmt::Display for ChipInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID 0x{:08X})", self.chip_type, self.chip_id)
    }
}

/// An opened adapter with CBUS pins
///
/// Implementations own the decoded EEPROM image. Changes made with
/// [`set_cbus_function`](Self::set_cbus_function) only touch that image until
/// [`write_eeprom`](Self::write_eeprom) is called.
pub trait CbusDevice {
    /// Read the EEPROM from the device and decode it into the image
    fn read_eeprom(&mut self) -> Result<()>;

    /// Function code currently held in the image for `pin`
    fn cbus_function(&self, pin: CbusPin) -> u8;

    /// Change the function code held in the image for `pin`
    fn set_cbus_function(&mut self, pin: CbusPin, code: u8);

    /// Encode the image and flash it to the device
    fn write_eeprom(&mut self) -> Result<()>;

    /// Enter CBUS bitbang mode with the given direction/level byte
    fn set_cbus_bits(&mut self, bits: u8) -> Result<()>;

    /// Sample the pin levels; bit N is CBUS N
    fn read_pins(&mut self) -> Result<u8>;

    /// Read the chip family and identifier
    fn chip_info(&mut self) -> Result<ChipInfo>;

    /// Release the device
    fn close(self) -> Result<()>
    where
        Self: Sized;
}
