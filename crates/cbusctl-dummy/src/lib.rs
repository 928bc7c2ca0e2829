//! cbusctl-dummy - In-memory CBUS adapter emulator for testing
//!
//! This crate provides a dummy adapter that emulates the parts of an FT-X
//! chip the CBUS tool talks to: the EEPROM CBUS slots, the bitbang byte and
//! the pin levels. It's useful for testing without real hardware.
//!
//! Like the real chip, the dummy keeps using the CBUS functions it powered up
//! with until [`DummyCbus::power_cycle`] is called, even after the EEPROM has
//! been rewritten.

use cbusctl_core::error::{Error, Result};
use cbusctl_core::function::{DRIVE_0, DRIVE_1, IOMODE};
use cbusctl_core::{CbusDevice, CbusPin, ChipInfo, Level, CBUS_PIN_COUNT};

/// Configuration for the dummy adapter
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Chip family reported in dumps
    pub chip_type: String,
    /// FTDIChip-ID
    pub chip_id: u32,
    /// CBUS functions stored in the EEPROM at power-up
    pub functions: [u8; CBUS_PIN_COUNT],
    /// Levels applied to the pins from outside while they are inputs
    pub inputs: [Level; CBUS_PIN_COUNT],
    /// Make `close` fail
    pub fail_close: bool,
    /// Make `read_eeprom` fail
    pub fail_eeprom_read: bool,
    /// Make `chip_info` fail
    pub fail_chip_id: bool,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            chip_type: "Ft230X".to_string(),
            chip_id: 0x1234_5678,
            functions: [0; CBUS_PIN_COUNT],
            inputs: [Level::Low; CBUS_PIN_COUNT],
            fail_close: false,
            fail_eeprom_read: false,
            fail_chip_id: false,
        }
    }
}

impl DummyConfig {
    /// Set the power-up CBUS function of one pin
    pub fn function(mut self, pin: usize, code: u8) -> Self {
        self.functions[pin] = code;
        self
    }

    /// Set the external level seen on one pin
    pub fn input(mut self, pin: usize, level: Level) -> Self {
        self.inputs[pin] = level;
        self
    }
}

/// Dummy CBUS adapter
///
/// Emulates an FT-X chip in memory for testing purposes.
#[derive(Debug)]
pub struct DummyCbus {
    config: DummyConfig,
    /// Contents of the EEPROM CBUS slots
    persisted: [u8; CBUS_PIN_COUNT],
    /// Functions the chip is running with
    active: [u8; CBUS_PIN_COUNT],
    /// Decoded image held by the handle
    image: [u8; CBUS_PIN_COUNT],
    /// Last bitbang byte, `None` outside CBUS bitbang mode
    bits: Option<u8>,
    bitmode_history: Vec<u8>,
    eeprom_reads: usize,
    eeprom_writes: usize,
    pin_reads: usize,
}

impl DummyCbus {
    /// Create a new dummy adapter with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let functions = config.functions;
        Self {
            config,
            persisted: functions,
            active: functions,
            image: [0; CBUS_PIN_COUNT],
            bits: None,
            bitmode_history: Vec::new(),
            eeprom_reads: 0,
            eeprom_writes: 0,
            pin_reads: 0,
        }
    }

    /// Create a new dummy adapter with every pin TRISTATE
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// CBUS functions currently stored in the EEPROM
    pub fn persisted_functions(&self) -> [u8; CBUS_PIN_COUNT] {
        self.persisted
    }

    /// Number of EEPROM writes performed
    pub fn eeprom_writes(&self) -> usize {
        self.eeprom_writes
    }

    /// Number of EEPROM reads performed
    pub fn eeprom_reads(&self) -> usize {
        self.eeprom_reads
    }

    /// Number of pin reads performed
    pub fn pin_reads(&self) -> usize {
        self.pin_reads
    }

    /// Every bitbang byte written, oldest first
    pub fn bitmode_history(&self) -> &[u8] {
        &self.bitmode_history
    }

    /// Last bitbang byte written
    pub fn bits(&self) -> Option<u8> {
        self.bits
    }

    /// Change the level applied to a pin from outside
    pub fn set_input(&mut self, pin: usize, level: Level) {
        self.config.inputs[pin] = level;
    }

    /// Reload the CBUS functions from the EEPROM and leave bitbang mode
    pub fn power_cycle(&mut self) {
        self.active = self.persisted;
        self.bits = None;
    }

    fn pin_level(&self, pin: CbusPin) -> Level {
        let idx = pin.index();
        match self.active[idx] {
            DRIVE_0 => Level::Low,
            DRIVE_1 => Level::High,
            IOMODE => match self.bits {
                Some(bits) if bits & pin.output_mask() != 0 => Level::from_pins(bits, pin),
                _ => self.config.inputs[idx],
            },
            _ => self.config.inputs[idx],
        }
    }
}

impl CbusDevice for DummyCbus {
    fn read_eeprom(&mut self) -> Result<()> {
        if self.config.fail_eeprom_read {
            return Err(Error::EepromRead("emulated read failure".into()));
        }
        self.eeprom_reads += 1;
        self.image = self.persisted;
        Ok(())
    }

    fn cbus_function(&self, pin: CbusPin) -> u8 {
        self.image[pin.index()]
    }

    fn set_cbus_function(&mut self, pin: CbusPin, code: u8) {
        self.image[pin.index()] = code;
    }

    fn write_eeprom(&mut self) -> Result<()> {
        self.eeprom_writes += 1;
        self.persisted = self.image;
        log::debug!("Dummy EEPROM now {:?}", self.persisted);
        Ok(())
    }

    fn set_cbus_bits(&mut self, bits: u8) -> Result<()> {
        self.bits = Some(bits);
        self.bitmode_history.push(bits);
        Ok(())
    }

    fn read_pins(&mut self) -> Result<u8> {
        self.pin_reads += 1;
        let pins = CbusPin::all()
            .filter(|&pin| self.pin_level(pin).is_high())
            .fold(0u8, |acc, pin| acc | pin.level_mask());
        Ok(pins)
    }

    fn chip_info(&mut self) -> Result<ChipInfo> {
        if self.config.fail_chip_id {
            return Err(Error::ChipId("emulated chip ID failure".into()));
        }
        Ok(ChipInfo {
            chip_type: self.config.chip_type.clone(),
            chip_id: self.config.chip_id,
        })
    }

    fn close(self) -> Result<()> {
        if self.config.fail_close {
            return Err(Error::Close("emulated close failure".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbusctl_core::function::{KEEP_AWAKE, TRISTATE};
    use cbusctl_core::{Controller, FunctionAssignment};

    fn pin(n: i32) -> CbusPin {
        CbusPin::new(n).unwrap()
    }

    fn assignment(s: &str) -> FunctionAssignment {
        s.parse().unwrap()
    }

    fn opened(config: DummyConfig) -> DummyCbus {
        let mut dev = DummyCbus::new(config);
        dev.read_eeprom().unwrap();
        dev
    }

    #[test]
    fn test_assign_and_commit() {
        let mut dev = opened(DummyConfig::default());
        let mut ctrl = Controller::new(&mut dev);

        assert!(ctrl.assign(&assignment("0:IOMODE")));
        assert!(ctrl.is_dirty());
        assert!(ctrl.commit().unwrap());
        assert!(!ctrl.is_dirty());

        assert_eq!(dev.eeprom_writes(), 1);
        assert_eq!(dev.persisted_functions(), [IOMODE, 0, 0, 0]);
    }

    #[test]
    fn test_assign_same_value_is_idempotent() {
        let mut dev = opened(DummyConfig::default().function(1, KEEP_AWAKE));
        let mut ctrl = Controller::new(&mut dev);

        assert!(!ctrl.assign(&assignment("1:KEEP_AWAKE")));
        assert!(!ctrl.commit().unwrap());
        assert_eq!(dev.eeprom_writes(), 0);
    }

    #[test]
    fn test_assign_ignores_bad_input() {
        let mut dev = opened(DummyConfig::default());
        let mut ctrl = Controller::new(&mut dev);

        assert!(!ctrl.assign(&assignment("4:IOMODE")));
        assert!(!ctrl.assign(&assignment("-1:IOMODE")));
        assert!(!ctrl.assign(&assignment("0:iomode")));
        assert!(!ctrl.assign(&assignment("0:TXLED")));
        assert!(!ctrl.is_dirty());
        assert_eq!(dev.persisted_functions(), [TRISTATE; 4]);
    }

    #[test]
    fn test_drive_writes_shadow_byte() {
        let mut dev = opened(DummyConfig::default().function(0, IOMODE));
        let mut ctrl = Controller::new(&mut dev);

        ctrl.drive(pin(0), Level::High).unwrap();
        assert_eq!(ctrl.shadow().bits(), 0x11);
        ctrl.drive(pin(2), Level::Low).unwrap();
        assert_eq!(ctrl.shadow().bits(), 0x51);

        assert_eq!(dev.bitmode_history(), &[0x11, 0x51]);
    }

    #[test]
    fn test_toggle_reads_live_level() {
        let config = DummyConfig::default()
            .function(3, IOMODE)
            .input(3, Level::High);
        let mut dev = opened(config);
        let mut ctrl = Controller::new(&mut dev);

        assert_eq!(ctrl.toggle(pin(3)).unwrap(), Level::Low);
        assert_eq!(ctrl.shadow().bits(), 0x80);
        assert_eq!(ctrl.toggle(pin(3)).unwrap(), Level::High);
        assert_eq!(ctrl.shadow().bits(), 0x88);
        assert_eq!(dev.pin_reads(), 2);
    }

    #[test]
    fn test_set_input_releases_pin() {
        let mut dev = opened(
            DummyConfig::default()
                .function(1, IOMODE)
                .input(1, Level::High),
        );
        let mut ctrl = Controller::new(&mut dev);

        ctrl.drive(pin(1), Level::Low).unwrap();
        assert_eq!(ctrl.level(pin(1)).unwrap(), Level::Low);

        ctrl.set_input(pin(1)).unwrap();
        assert_eq!(ctrl.shadow().bits(), 0x00);
        assert_eq!(ctrl.level(pin(1)).unwrap(), Level::High);
    }

    #[test]
    fn test_input_follows_external_level() {
        let mut dev = opened(DummyConfig::default().function(0, IOMODE));

        assert_eq!(Controller::new(&mut dev).level(pin(0)).unwrap(), Level::Low);
        dev.set_input(0, Level::High);
        assert_eq!(Controller::new(&mut dev).level(pin(0)).unwrap(), Level::High);
        assert_eq!(dev.pin_reads(), 2);
    }

    #[test]
    fn test_pin_state_samples_only_iomode() {
        let config = DummyConfig::default()
            .function(1, DRIVE_1)
            .function(2, IOMODE)
            .input(2, Level::High);
        let mut dev = opened(config);
        let mut ctrl = Controller::new(&mut dev);

        let state = ctrl.pin_state(pin(1)).unwrap();
        assert_eq!(state.level, None);
        assert_eq!(state.to_string(), "CBUS1: DRIVE_1");

        let state = ctrl.pin_state(pin(2)).unwrap();
        assert_eq!(state.level, Some(Level::High));
        assert_eq!(state.to_string(), "CBUS2: IOMODE (HIGH)");

        assert_eq!(dev.pin_reads(), 1);
    }

    #[test]
    fn test_new_function_needs_power_cycle() {
        let mut dev = opened(DummyConfig::default().input(0, Level::Low));
        {
            let mut ctrl = Controller::new(&mut dev);
            ctrl.assign(&assignment("0:IOMODE"));
            ctrl.commit().unwrap();
        }

        // Still TRISTATE until the chip restarts
        dev.set_cbus_bits(0x11).unwrap();
        assert_eq!(dev.read_pins().unwrap(), 0x00);

        dev.power_cycle();
        dev.read_eeprom().unwrap();
        dev.set_cbus_bits(0x11).unwrap();
        assert_eq!(dev.read_pins().unwrap(), 0x01);
    }

    #[test]
    fn test_chip_info_and_close() {
        let mut dev = opened(DummyConfig::default());
        assert_eq!(dev.eeprom_reads(), 1);
        let info = dev.chip_info().unwrap();
        assert_eq!(info.to_string(), "Ft230X (ID 0x12345678)");
        assert!(dev.close().is_ok());

        let dev = DummyCbus::new(DummyConfig {
            fail_close: true,
            ..DummyConfig::default()
        });
        assert!(matches!(dev.close(), Err(Error::Close(_))));
    }

    #[test]
    fn test_chip_id_failure() {
        let mut dev = DummyCbus::new(DummyConfig {
            fail_chip_id: true,
            ..DummyConfig::default()
        });
        assert!(matches!(dev.chip_info(), Err(Error::ChipId(_))));
    }
}
