//! cbusctl-ftdi - FTDI FT-X CBUS backend
//!
//! This crate implements [`CbusDevice`](cbusctl_core::CbusDevice) for FTDI
//! FT-X adapters (FT230X, FT231X, FT234XD) using the pure-Rust `rs-ftdi`
//! crate on top of `nusb`. All USB and EEPROM encoding work is done by
//! `rs-ftdi`; this crate only maps the calls.
//!
//! # Supported Devices
//!
//! - FTDI FT-X family, VID 0x0403 PID 0x6015
//!
//! # Example
//!
//! ```no_run
//! use cbusctl_core::CbusDevice;
//! use cbusctl_ftdi::FtdiCbus;
//!
//! let mut dev = FtdiCbus::open_default()?;
//! dev.read_eeprom()?;
//! let info = dev.chip_info()?;
//! println!("{}", info);
//! dev.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod device;
mod error;
mod protocol;

pub use device::{FtdiCbus, FtdiCbusConfig};
pub use error::{FtdiError, Result};
pub use protocol::{FTDI_VID, FT_X_PID};
