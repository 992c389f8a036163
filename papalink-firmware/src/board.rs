//! Board wiring
//!
//! Pico-style LogLED board:
//!
//! | signal          | GPIO      |
//! |-----------------|-----------|
//! | data lines 0-12 | GP0-GP12  |
//! | aux channel A   | GP13      |
//! | aux channel B   | GP14      |
//! | BNC value input | GP26/ADC0 |
//! | BNC gain input  | GP27/ADC1 |

use papalink_hal::PinArray;
use papalink_hal_rp2040::{FlashEeprom, FlexPin, Rp2040Adc};
use papalink_programs::logled::{LogLed, LogLedConfig, LogLedVariant};

/// Data lines wired on this board
pub const DATA_LINES: usize = 13;

/// ADC channels wired on this board (value, gain)
pub const ADC_CHANNELS: usize = 2;

/// Variant selected by the `logled-*` Cargo features
#[cfg(feature = "logled-311")]
pub const VARIANT: LogLedVariant = LogLedVariant::Model311;
#[cfg(feature = "logled-111")]
pub const VARIANT: LogLedVariant = LogLedVariant::Model111;
#[cfg(feature = "logled-103")]
pub const VARIANT: LogLedVariant = LogLedVariant::Model103;

/// Program configuration for this board
pub fn config() -> LogLedConfig {
    LogLedConfig {
        variant: VARIANT,
        value_channel: 0,
        gain_channel: 1,
    }
}

/// Output lines of this board
pub type Bank = PinArray<FlexPin<'static>, DATA_LINES>;

/// The program this firmware hosts
pub type Program = LogLed<'static, Bank, Rp2040Adc<'static, ADC_CHANNELS>, FlashEeprom<'static>>;
