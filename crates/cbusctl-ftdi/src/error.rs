//! Error types for the FT-X CBUS backend

use cbusctl_core::Error as CoreError;
use thiserror::Error;

/// Result type for FT-X backend operations
pub type Result<T> = std::result::Result<T, FtdiError>;

/// Errors that can occur while talking to the adapter
#[derive(Debug, Error)]
pub enum FtdiError {
    /// No adapter with the expected VID/PID is attached
    #[error("no device with VID {vid:04X} PID {pid:04X} found")]
    DeviceNotFound { vid: u16, pid: u16 },

    /// The adapter was found but could not be opened
    #[error("{0}")]
    OpenFailed(#[source] rs_ftdi::Error),

    /// Reading the raw EEPROM failed
    #[error("{0}")]
    EepromRead(#[source] rs_ftdi::Error),

    /// The raw EEPROM could not be decoded
    #[error("{0}")]
    EepromDecode(#[source] rs_ftdi::Error),

    /// Encoding the EEPROM image failed
    #[error("{0}")]
    EepromBuild(#[source] rs_ftdi::Error),

    /// Flashing the EEPROM image failed
    #[error("{0}")]
    EepromWrite(#[source] rs_ftdi::Error),

    /// Setting CBUS bitbang mode failed
    #[error("bitmode 0x{bits:02X}: {source}")]
    Bitmode {
        bits: u8,
        #[source]
        source: rs_ftdi::Error,
    },

    /// Reading the pin levels failed
    #[error("{0}")]
    ReadPins(#[source] rs_ftdi::Error),

    /// Reading the FTDIChip-ID failed
    #[error("{0}")]
    ChipId(#[source] rs_ftdi::Error),
}

impl From<FtdiError> for CoreError {
    fn from(e: FtdiError) -> Self {
        match e {
            FtdiError::DeviceNotFound { .. } | FtdiError::OpenFailed(_) => {
                CoreError::Open(e.to_string())
            }
            FtdiError::EepromRead(_) => CoreError::EepromRead(e.to_string()),
            FtdiError::EepromDecode(_) => CoreError::EepromDecode(e.to_string()),
            FtdiError::EepromBuild(_) | FtdiError::EepromWrite(_) => {
                CoreError::EepromWrite(e.to_string())
            }
            FtdiError::Bitmode { bits, source } => CoreError::Bitmode {
                bits,
                reason: source.to_string(),
            },
            FtdiError::ReadPins(_) => CoreError::ReadPins(e.to_string()),
            FtdiError::ChipId(_) => CoreError::ChipId(e.to_string()),
        }
    }
}
