//! Error types for cbusctl-core
//!
//! Backends convert their own errors into this type at the [`CbusDevice`]
//! boundary, so the controller and the CLI only ever see one error type.
//!
//! [`CbusDevice`]: crate::CbusDevice

use thiserror::Error;

/// Errors reported by a CBUS device or the controller driving it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The adapter could not be found or opened
    #[error("failed to open device: {0}")]
    Open(String),

    /// The adapter could not be released cleanly
    #[error("failed to close device: {0}")]
    Close(String),

    /// Reading the EEPROM contents failed
    #[error("EEPROM read failed: {0}")]
    EepromRead(String),

    /// The EEPROM image could not be decoded (bad checksum, unknown size)
    #[error("EEPROM decode failed: {0}")]
    EepromDecode(String),

    /// Building or flashing the EEPROM image failed
    #[error("EEPROM write failed: {0}")]
    EepromWrite(String),

    /// Setting the CBUS bitbang byte failed
    #[error("failed to set CBUS bitmode 0x{bits:02X}: {reason}")]
    Bitmode {
        /// The byte that was being written
        bits: u8,
        /// Backend description of the failure
        reason: String,
    },

    /// Sampling the pin levels failed
    #[error("failed to read pins: {0}")]
    ReadPins(String),

    /// Reading the chip identifier failed
    #[error("failed to read chip ID: {0}")]
    ChipId(String),
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
