//! RP2040 HAL for PapaLink devices
//!
//! Implements the `papalink-hal` traits on top of `embassy-rp`:
//!
//! - [`gpio::FlexPin`] - driver output lines
//! - [`adc::Rp2040Adc`] - BNC value and gain inputs
//! - [`flash::FlashEeprom`] - EEPROM emulation on the last flash sectors

#![no_std]

pub mod adc;
pub mod flash;
pub mod gpio;

pub use adc::Rp2040Adc;
pub use flash::FlashEeprom;
pub use gpio::FlexPin;

// Re-export shared traits from papalink-hal for convenience
pub use papalink_hal::{AnalogInputs, ByteStore, OutputPin};
