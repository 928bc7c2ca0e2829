//! FT-X CBUS device implementation using rs-ftdi
//!
//! This module provides the `FtdiCbus` struct, a thin wrapper around
//! `rs_ftdi::FtdiDevice` that implements the `CbusDevice` trait. rs-ftdi
//! handles USB communication, kernel driver detach and the EEPROM format.

use cbusctl_core::error::Result as CoreResult;
use cbusctl_core::{CbusDevice, CbusPin, ChipInfo};
use nusb::MaybeFuture;
use rs_ftdi::{BitMode, FtdiDevice};

use crate::error::{FtdiError, Result};
use crate::protocol::{product_name, FTDI_VID, FT_X_PID};

/// Configuration for opening an FT-X adapter
#[derive(Debug, Clone)]
pub struct FtdiCbusConfig {
    /// USB vendor ID
    pub vendor_id: u16,
    /// USB product ID
    pub product_id: u16,
}

impl Default for FtdiCbusConfig {
    fn default() -> Self {
        Self {
            vendor_id: FTDI_VID,
            product_id: FT_X_PID,
        }
    }
}

/// An opened FT-X adapter
pub struct FtdiCbus {
    /// rs-ftdi device context
    device: FtdiDevice,
}

impl FtdiCbus {
    /// Open the first adapter matching the configuration
    pub fn open(config: &FtdiCbusConfig) -> Result<Self> {
        log::debug!(
            "Looking for FTDI device VID={:04X} PID={:04X}",
            config.vendor_id,
            config.product_id
        );

        let device = match FtdiDevice::open_with_interface(
            config.vendor_id,
            config.product_id,
            rs_ftdi::Interface::A,
        ) {
            Ok(device) => device,
            Err(rs_ftdi::Error::DeviceNotFound) => {
                log_attached_devices();
                return Err(FtdiError::DeviceNotFound {
                    vid: config.vendor_id,
                    pid: config.product_id,
                });
            }
            Err(e) => return Err(FtdiError::OpenFailed(e)),
        };

        log::info!(
            "Opened FTDI {:?} VID={:04X} PID={:04X}",
            device.chip_type(),
            config.vendor_id,
            config.product_id
        );

        Ok(Self { device })
    }

    /// Open the FT-X adapter at its default VID/PID
    pub fn open_default() -> Result<Self> {
        Self::open(&FtdiCbusConfig::default())
    }

    fn load_eeprom(&mut self) -> Result<()> {
        self.device.read_eeprom().map_err(FtdiError::EepromRead)?;
        log::debug!("Read EEPROM, size {} bytes", self.device.eeprom().size);

        self.device
            .eeprom_decode()
            .map_err(FtdiError::EepromDecode)?;

        log::debug!(
            "CBUS functions: {:?}",
            &self.device.eeprom().cbus_function[..cbusctl_core::CBUS_PIN_COUNT]
        );
        Ok(())
    }

    fn store_eeprom(&mut self) -> Result<()> {
        let free = self
            .device
            .eeprom_build()
            .map_err(FtdiError::EepromBuild)?;
        log::debug!("Built EEPROM image, {} bytes left for user data", free);

        self.device.write_eeprom().map_err(FtdiError::EepromWrite)
    }

    fn cbus_bitmode(&mut self, bits: u8) -> Result<()> {
        self.device
            .set_bitmode(bits, BitMode::Cbus)
            .map_err(|source| FtdiError::Bitmode { bits, source })
    }
}

impl CbusDevice for FtdiCbus {
    fn read_eeprom(&mut self) -> CoreResult<()> {
        Ok(self.load_eeprom()?)
    }

    fn cbus_function(&self, pin: CbusPin) -> u8 {
        self.device.eeprom().cbus_function[pin.index()]
    }

    fn set_cbus_function(&mut self, pin: CbusPin, code: u8) {
        self.device.eeprom_mut().cbus_function[pin.index()] = code;
    }

    fn write_eeprom(&mut self) -> CoreResult<()> {
        Ok(self.store_eeprom()?)
    }

    fn set_cbus_bits(&mut self, bits: u8) -> CoreResult<()> {
        Ok(self.cbus_bitmode(bits)?)
    }

    fn read_pins(&mut self) -> CoreResult<u8> {
        let pins = self.device.read_pins().map_err(FtdiError::ReadPins)?;
        Ok(pins)
    }

    fn chip_info(&mut self) -> CoreResult<ChipInfo> {
        let chip_id = self.device.read_chipid().map_err(FtdiError::ChipId)?;
        Ok(ChipInfo {
            chip_type: format!("{:?}", self.device.chip_type()),
            chip_id,
        })
    }

    fn close(self) -> CoreResult<()> {
        // rs-ftdi releases the interface when the handle is dropped; the CBUS
        // bitbang byte stays latched in the chip
        log::debug!("Closing FTDI device");
        drop(self.device);
        Ok(())
    }
}

/// Log the FTDI devices that are attached, to help when the expected one is missing
fn log_attached_devices() {
    let devices = match nusb::list_devices().wait() {
        Ok(devices) => devices,
        Err(e) => {
            log::warn!("Could not enumerate USB devices: {}", e);
            return;
        }
    };

    let mut found = false;
    for dev in devices.filter(|d| d.vendor_id() == FTDI_VID) {
        found = true;
        log::warn!(
            "Found FTDI {} (PID {:04X}) at bus {} address {}, not supported",
            product_name(dev.product_id()).unwrap_or("device"),
            dev.product_id(),
            dev.busnum(),
            dev.device_address()
        );
    }
    if !found {
        log::warn!("No FTDI devices attached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbusctl_core::Error as CoreError;

    #[test]
    fn test_default_config_is_ft_x() {
        let config = FtdiCbusConfig::default();
        assert_eq!(config.vendor_id, 0x0403);
        assert_eq!(config.product_id, 0x6015);
    }

    #[test]
    fn test_bitmode_error_maps_to_core() {
        let e = FtdiError::Bitmode {
            bits: 0x11,
            source: rs_ftdi::Error::DeviceUnavailable,
        };
        let core: CoreError = e.into();
        assert_eq!(
            core,
            CoreError::Bitmode {
                bits: 0x11,
                reason: "USB device unavailable".into()
            }
        );
    }
}
