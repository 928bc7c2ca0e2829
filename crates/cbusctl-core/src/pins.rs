//! CBUS pin indices, levels and the bitbang shadow byte
//!
//! In CBUS bitbang mode the chip takes a single byte: the low nibble holds
//! the output level of CBUS0..3, the high nibble enables the output driver
//! for the same pins. The chip cannot report the high nibble back, so the
//! last written byte is kept in a [`PinShadow`].

use std::fmt;
use std::ops::Not;

/// Number of CBUS pins usable for bitbang
pub const CBUS_PIN_COUNT: usize = 4;

/// A validated CBUS pin index (0..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CbusPin(u8);

impl CbusPin {
    /// Validate a raw pin number, returning `None` when it is out of range
    pub fn new(num: i32) -> Option<Self> {
        if (0..CBUS_PIN_COUNT as i32).contains(&num) {
            Some(Self(num as u8))
        } else {
            None
        }
    }

    /// Iterate over all CBUS pins in order
    pub fn all() -> impl Iterator<Item = CbusPin> {
        (0..CBUS_PIN_COUNT as u8).map(CbusPin)
    }

    /// Pin index as a `usize`, for array indexing
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Bit of this pin's level in the bitbang byte
    pub fn level_mask(self) -> u8 {
        1 << self.0
    }

    /// Bit of this pin's output enable in the bitbang byte
    pub fn output_mask(self) -> u8 {
        1 << (self.0 + 4)
    }
}

impl fmt::Display for CbusPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Extract a pin's level from a byte returned by a pin read
    pub fn from_pins(pins: u8, pin: CbusPin) -> Self {
        Self::from(pins & pin.level_mask() != 0)
    }

    /// Whether this is [`Level::High`]
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("LOW"),
            Level::High => f.write_str("HIGH"),
        }
    }
}

/// Last-written CBUS bitbang byte
///
/// Starts with every pin as an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinShadow {
    bits: u8,
}

impl PinShadow {
    /// Create a shadow with every pin as an input
    pub fn new() -> Self {
        Self::default()
    }

    /// The byte to hand to the chip
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Make `pin` an output driving `level`
    pub fn set_output(&mut self, pin: CbusPin, level: Level) {
        self.bits &= !pin.level_mask();
        self.bits |= pin.output_mask();
        if level.is_high() {
            self.bits |= pin.level_mask();
        }
    }

    /// Return `pin` to input
    pub fn set_input(&mut self, pin: CbusPin) {
        self.bits &= !(pin.output_mask() | pin.level_mask());
    }

    /// Whether `pin` is currently configured as an output
    pub fn is_output(&self, pin: CbusPin) -> bool {
        self.bits & pin.output_mask() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pin(n: i32) -> CbusPin {
        CbusPin::new(n).unwrap()
    }

    #[test]
    fn test_pin_range() {
        assert!(CbusPin::new(-1).is_none());
        assert!(CbusPin::new(4).is_none());
        assert_eq!(CbusPin::all().count(), CBUS_PIN_COUNT);
        assert_eq!(pin(3).index(), 3);
        assert_eq!(pin(2).level_mask(), 0x04);
        assert_eq!(pin(2).output_mask(), 0x40);
    }

    #[test]
    fn test_high_sets_direction_and_level() {
        let mut shadow = PinShadow::new();
        shadow.set_output(pin(0), Level::High);
        assert_eq!(shadow.bits(), 0x11);
        assert!(shadow.is_output(pin(0)));
    }

    #[test]
    fn test_low_keeps_direction() {
        let mut shadow = PinShadow::new();
        shadow.set_output(pin(1), Level::High);
        shadow.set_output(pin(1), Level::Low);
        assert_eq!(shadow.bits(), 0x20);
    }

    #[test]
    fn test_pins_are_independent() {
        let mut shadow = PinShadow::new();
        shadow.set_output(pin(0), Level::High);
        shadow.set_output(pin(3), Level::Low);
        assert_eq!(shadow.bits(), 0x91);

        shadow.set_input(pin(0));
        assert_eq!(shadow.bits(), 0x80);
        assert!(!shadow.is_output(pin(0)));
        assert!(shadow.is_output(pin(3)));
    }

    #[test]
    fn test_level_helpers() {
        assert_eq!(!Level::High, Level::Low);
        assert_eq!(Level::from_pins(0x04, pin(2)), Level::High);
        assert_eq!(Level::from_pins(0xFB, pin(2)), Level::Low);
        assert_eq!(Level::High.to_string(), "HIGH");
        assert_eq!(Level::Low.to_string(), "LOW");
    }

    proptest! {
        #[test]
        fn out_of_range_pins_are_rejected(num in any::<i32>()) {
            prop_assert_eq!(CbusPin::new(num).is_some(), (0..=3).contains(&num));
        }
    }
}
