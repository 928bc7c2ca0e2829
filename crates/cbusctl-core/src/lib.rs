//! cbusctl-core - CBUS pin configuration logic
//!
//! This crate holds everything about CBUS pin handling that does not touch
//! USB: the table of CBUS functions, validated pin indices, the shadow byte
//! used for CBUS bitbang, and the [`Controller`] that applies a requested set
//! of changes to a device.
//!
//! Hardware access goes through the [`CbusDevice`] trait. The real adapter
//! lives in `cbusctl-ftdi`; an in-memory emulator lives in `cbusctl-dummy`.
//!
//! # Example
//!
//! ```ignore
//! use cbusctl_core::{CbusPin, Controller, Level};
//!
//! let mut ctrl = Controller::new(&mut device);
//! if let Some(pin) = CbusPin::new(0) {
//!     ctrl.drive(pin, Level::High)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod controller;
pub mod device;
pub mod error;
pub mod function;
pub mod pins;

pub use controller::{Controller, PinState};
pub use device::{CbusDevice, ChipInfo};
pub use error::{Error, Result};
pub use function::{CbusFunction, FunctionAssignment, ParseAssignmentError, FUNCTIONS};
pub use pins::{CbusPin, Level, PinShadow, CBUS_PIN_COUNT};
