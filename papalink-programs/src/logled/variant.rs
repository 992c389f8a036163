//! LogLED hardware variants
//!
//! Model numbers encode the driver chain: the first digit is the number of
//! drivers, the rest the bits per driver (311 = three drivers, 11 bits).

use papalink_core::registers::RegisterValue;

/// Version reported by every LogLED variant
pub const PROGRAM_VERSION: u8 = 1;

/// A LogLED build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogLedVariant {
    /// Three 11-bit drivers
    #[default]
    Model311,
    /// One 11-bit driver
    Model111,
    /// One 3-bit driver
    Model103,
}

impl LogLedVariant {
    /// Program name reported to the host
    pub fn name(self) -> &'static str {
        match self {
            LogLedVariant::Model311 => "dj-logled-311",
            LogLedVariant::Model111 => "dj-logled-111",
            LogLedVariant::Model103 => "dj-logled-103",
        }
    }

    /// Default `(n_bits, high_bit, n_drivers)`
    pub fn default_topology(self) -> (RegisterValue, RegisterValue, RegisterValue) {
        match self {
            LogLedVariant::Model311 => (11, 12, 3),
            LogLedVariant::Model111 => (11, 12, 1),
            LogLedVariant::Model103 => (3, 12, 1),
        }
    }
}
