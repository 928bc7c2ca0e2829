//! CBUS function table
//!
//! Each CBUS pin of an FT-X chip is assigned a function in the EEPROM. Only a
//! handful of them are useful for GPIO work, and those are the ones that can
//! be named on the command line. Any other code read back from a device is
//! shown as its raw number.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A named CBUS function and its EEPROM code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CbusFunction {
    /// Name used on the command line and in dumps
    pub name: &'static str,
    /// Code stored in the EEPROM CBUS slot
    pub code: u8,
}

/// Code for software-controlled GPIO (CBUS bitbang)
pub const IOMODE: u8 = 8;
/// Code for "keep awake" (FT-X only)
pub const KEEP_AWAKE: u8 = 21;
/// Code for a pin permanently driven low
pub const DRIVE_0: u8 = 6;
/// Code for a pin permanently driven high
pub const DRIVE_1: u8 = 7;
/// Code for a high-impedance pin
pub const TRISTATE: u8 = 0;

/// Functions that can be assigned by name
pub static FUNCTIONS: &[CbusFunction] = &[
    CbusFunction { name: "IOMODE", code: IOMODE },
    CbusFunction { name: "KEEP_AWAKE", code: KEEP_AWAKE },
    CbusFunction { name: "DRIVE_0", code: DRIVE_0 },
    CbusFunction { name: "DRIVE_1", code: DRIVE_1 },
    CbusFunction { name: "TRISTATE", code: TRISTATE },
];

impl CbusFunction {
    /// Look up a function by its exact (case-sensitive) name
    pub fn by_name(name: &str) -> Option<&'static CbusFunction> {
        FUNCTIONS.iter().find(|f| f.name == name)
    }

    /// Look up a function by its EEPROM code
    pub fn by_code(code: u8) -> Option<&'static CbusFunction> {
        FUNCTIONS.iter().find(|f| f.code == code)
    }
}

impl fmt::Display for CbusFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Render an EEPROM code as a function name, or its decimal value if unnamed
pub fn function_name(code: u8) -> Cow<'static, str> {
    match CbusFunction::by_code(code) {
        Some(func) => Cow::Borrowed(func.name),
        None => Cow::Owned(code.to_string()),
    }
}

/// Error returned when a `NUM:FUNCTION` argument is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAssignmentError {
    /// No `:` separator
    #[error("expected NUM:FUNCTION, got '{0}'")]
    MissingSeparator(String),

    /// The part before `:` is not an integer
    #[error("invalid pin number '{0}'")]
    InvalidPin(String),
}

/// A requested function change, as given on the command line
///
/// The pin is kept as the raw integer the operator typed. Range checking is
/// deferred to [`Controller::assign`](crate::Controller::assign), which skips
/// out-of-range pins without complaint. The same goes for unknown function
/// names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAssignment {
    /// Requested CBUS pin
    pub pin: i32,
    /// Requested function name
    pub function: String,
}

impl FromStr for FunctionAssignment {
    type Err = ParseAssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pin, function) = s
            .split_once(':')
            .ok_or_else(|| ParseAssignmentError::MissingSeparator(s.to_owned()))?;

        let pin = pin
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseAssignmentError::InvalidPin(pin.to_owned()))?;

        Ok(Self {
            pin,
            function: function.to_owned(),
        })
    }
}

impl fmt::Display for FunctionAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pin, self.function)
    }
}
