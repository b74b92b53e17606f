pub mod line;
pub mod reading;

pub use reading::{Severity, VitalReading};

/// Baud rate the receiving board is expected to listen at.
pub const SERIAL_BAUD: u32 = 115_200;
