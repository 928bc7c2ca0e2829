//! FT-X USB identifiers

/// FTDI vendor ID
pub const FTDI_VID: u16 = 0x0403;

/// FT-X series product ID (FT230X, FT231X, FT234XD, ...)
pub const FT_X_PID: u16 = 0x6015;

/// Returns a human-readable name for a known FTDI product ID
pub fn product_name(pid: u16) -> Option<&'static str> {
    match pid {
        0x6001 => Some("FT232R/FT245R"),
        0x6010 => Some("FT2232"),
        0x6011 => Some("FT4232H"),
        0x6014 => Some("FT232H"),
        FT_X_PID => Some("FT-X"),
        _ => None,
    }
}
