//! PapaLink Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that device programs are
//! written against. Chip-specific crates (RP2040, ...) implement them, so the
//! same program runs on any board that can provide the lines, converters and
//! storage it needs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Device programs (papalink-programs)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  papalink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ papalink-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::OutputBank`] - Digital outputs
//! - [`adc::AnalogInputs`] - Analog sampling
//! - [`eeprom::ByteStore`] - Byte-wide persistent storage

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adc;
pub mod eeprom;
pub mod gpio;
#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogInputs};
pub use eeprom::{ByteStore, EepromError, RamEeprom};
pub use gpio::{OutputBank, OutputLine, OutputPin, PinArray};
